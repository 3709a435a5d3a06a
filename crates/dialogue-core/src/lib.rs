//! Dialogue core: everything that decides what the two characters say,
//! independent of the browser.

pub mod ports;
pub mod event_bus;
pub mod driver;
pub mod persona;
pub mod transcript;
pub mod persistence;
