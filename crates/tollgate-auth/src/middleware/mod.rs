//! HTTP middleware.
//!
//! - [`gate`] - per-request revocation gate
//! - [`error`] - `IntoResponse` for [`AuthError`](crate::AuthError)

pub mod error;
pub mod gate;

pub use gate::{GateState, bearer_token, revocation_gate};
