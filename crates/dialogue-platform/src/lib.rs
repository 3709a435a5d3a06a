//! Browser adapters for the dialogue core ports.

pub mod llm;
pub mod storage;
pub mod download;
