//! # ManualBot Gateway
//!
//! Small axum server for the WhatsApp Cloud API webhook: the verification
//! handshake (GET) and message notifications (POST). Parsed messages are
//! pushed onto the channel's event stream — the gateway itself holds no
//! assistant logic.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, serve};
