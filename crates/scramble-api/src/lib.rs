//! JSON REST API for Scramblelist.
//!
//! Exposes an axum [`Router`] backed by any [`scramble_core::store::ExchangeStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", scramble_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod exchanges;
pub mod health;
pub mod participants;

use std::sync::Arc;

use axum::{Router, routing::get};
use scramble_core::store::ExchangeStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ExchangeStore + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<S>))
    // Roster
    .route(
      "/participants",
      get(participants::list::<S>)
        .post(participants::create::<S>)
        .delete(participants::clear::<S>),
    )
    .route(
      "/participants/{id}",
      get(participants::get_one::<S>).delete(participants::remove_one::<S>),
    )
    // Exchanges
    .route("/exchanges", get(exchanges::list::<S>).post(exchanges::create::<S>))
    .route("/exchanges/{id}", get(exchanges::get_one::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
