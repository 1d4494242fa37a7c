//! Small helpers shared by pages and state.

pub mod notify;
pub mod ui_persistence;
