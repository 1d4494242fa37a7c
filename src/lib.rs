//! # attendance-console
//!
//! Leptos + WASM front end for the institutional management console
//! (users, schedules, sections, devices, attendance).
//!
//! The crate centres on the session lifecycle: `state::session` owns the
//! authentication state machine, `net::auth` performs the network side of
//! login/logout/identity checks, and `router::guard` gates every route
//! transition on the confirmed session. Pages and components are thin views
//! over those pieces.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;
pub mod util;

#[cfg(test)]
pub mod test_helpers;

/// Browser entry point: installs console hooks and mounts [`app::App`].
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
