//! Client-side state owned outside the view tree.

pub mod session;
