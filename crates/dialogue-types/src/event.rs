use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};
use crate::persona::PersonaSide;

/// Events emitted by the dialogue driver and persona resolver.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DialogueEvent {
    /// A run began with this many rounds
    DialogueStart { rounds: u32 },

    /// A turn is waiting on the LLM
    TurnStart { role: Role },

    /// Partial text of the pending turn
    LlmDelta { token: String },

    /// A line was appended to the history
    MessageAppended { message: Message },

    /// The LLM produced nothing for this turn; it was discarded
    TurnFailed { role: Role },

    /// A round finished; `remaining` rounds are left
    RoundEnd { remaining: u32 },

    /// Preconditions failed and the run was aborted
    ValidationFailed { message: String },

    /// The run is over, normally or by abort
    DialogueEnd,

    /// Persona generation started for one side
    PersonaResolving { side: PersonaSide },

    /// Persona generation finished for one side
    PersonaResolved { side: PersonaSide, info: String },

    /// Non-fatal condition worth showing (e.g. missing API key)
    Warning { message: String },

    /// An error occurred
    Error { message: String },
}
