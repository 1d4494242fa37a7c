//! Route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Public pages (sign-in, sign-up, forgot-password) talk to the session store
//! directly. Protected pages render inside `components::nav::ConsoleShell` and
//! read collections through `net::resource`.

pub mod dashboard;
pub mod forgot_password;
pub mod not_found;
pub mod profile;
pub mod section;
pub mod sign_in;
pub mod sign_up;
