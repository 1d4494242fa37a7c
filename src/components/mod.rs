//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read shared state from the context providers installed by
//! `app::App`; none of them owns session state.

pub mod nav;
pub mod progress_bar;
pub mod toast;
