pub mod chat;
pub mod controls;
pub mod persona;
pub mod settings;
