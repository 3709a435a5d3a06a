pub mod message;
pub mod persona;
pub mod event;
pub mod config;
pub mod error;
pub mod session;


pub use error::DialogueError;
pub type Result<T> = std::result::Result<T, DialogueError>;
