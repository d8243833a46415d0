//! Core types and trait definitions for the vigil deadline countdown.
//!
//! Deliberately free of HTTP and database dependencies; every other crate
//! depends on this one. The only async machinery here is the store trait
//! and the watch channel it hands out.

// Store implementations write native `async fn` bodies against the
// `impl Future` trait methods; silence the advisory lint that suggests
// desugaring them.
#![allow(async_fn_in_trait)]

pub mod countdown;
pub mod editor;
pub mod error;
pub mod record;
pub mod store;

pub use error::{Error, Result};
