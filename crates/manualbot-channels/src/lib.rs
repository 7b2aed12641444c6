//! # ManualBot Channels
//!
//! Messaging channel implementations. WhatsApp (Business Cloud API) is the
//! channel the assistant ships on; everything upstream consumes the
//! `Channel` trait and the `ChannelEvent` stream, not the concrete type.

pub mod whatsapp;

pub use whatsapp::{WebhookHandle, WhatsAppChannel};
