use serde::{Deserialize, Serialize};

/// Which character of the scene a persona field belongs to.
/// Role A is the `User` side, role B the `Bot` side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonaSide {
    User,
    Bot,
}

impl PersonaSide {
    pub fn label(&self) -> &'static str {
        match self {
            PersonaSide::User => "Role A",
            PersonaSide::Bot => "Role B",
        }
    }
}

/// Character metadata sent along with every chat request.
///
/// Field names follow the CharacterGLM `meta` payload, so the struct
/// serializes straight into the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaMeta {
    pub user_name: String,
    pub user_info: String,
    pub bot_name: String,
    pub bot_info: String,
}

impl PersonaMeta {
    pub fn name(&self, side: PersonaSide) -> &str {
        match side {
            PersonaSide::User => &self.user_name,
            PersonaSide::Bot => &self.bot_name,
        }
    }

    pub fn info(&self, side: PersonaSide) -> &str {
        match side {
            PersonaSide::User => &self.user_info,
            PersonaSide::Bot => &self.bot_info,
        }
    }

    pub fn set_name(&mut self, side: PersonaSide, name: impl Into<String>) {
        match side {
            PersonaSide::User => self.user_name = name.into(),
            PersonaSide::Bot => self.bot_name = name.into(),
        }
    }

    pub fn set_info(&mut self, side: PersonaSide, info: impl Into<String>) {
        match side {
            PersonaSide::User => self.user_info = info.into(),
            PersonaSide::Bot => self.bot_info = info.into(),
        }
    }

    /// Both characters have a derived info summary
    pub fn is_complete(&self) -> bool {
        !self.user_info.is_empty() && !self.bot_info.is_empty()
    }
}
