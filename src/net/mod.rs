//! Network layer: transport, wire types, the auth gateway and CRUD
//! resources.
//!
//! ARCHITECTURE
//! ============
//! `api` is the only module that touches the browser's HTTP stack. `auth`
//! and `resource` speak to it through the [`api::ResourceClient`] trait, which
//! tests replace with a scripted client.

pub mod api;
pub mod auth;
pub mod resource;
pub mod types;
