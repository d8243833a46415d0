//! HTTP handlers, split by surface: the public countdown page and the admin
//! panel.

pub mod admin;
pub mod public;
