//! Core types and trait definitions for Scramblelist.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the derangement generator that pairs givers with receivers, the domain
//! types that carry its results, and the [`store::ExchangeStore`] abstraction
//! implemented by storage backends.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod derange;
pub mod error;
pub mod exchange;
pub mod participant;
pub mod store;

pub use error::{Error, InvalidInput, Result};
