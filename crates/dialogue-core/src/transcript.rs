//! Plain-text transcript export.
//!
//! One line per message: `A：` for the user side, `B：` for the assistant
//! side (full-width colon). Display names are not written.

use dialogue_types::message::{Message, Role};

pub const TRANSCRIPT_FILE_NAME: &str = "chat_history.txt";

pub fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::User => "A",
        Role::Assistant => "B",
    }
}

pub fn export_transcript(history: &[Message]) -> String {
    let mut out = String::new();
    for msg in history {
        out.push_str(speaker_label(msg.role));
        out.push('：');
        out.push_str(&msg.content);
        out.push('\n');
    }
    out
}
