//! Gemini relay - forwards a user message to the Gemini generative-language
//! API and relays the first text answer back.
//!
//! Upstream models are tried in a fixed priority order until one answers;
//! every failure is answered with a structured JSON error.

pub mod ai;
pub mod config;
pub mod error;
pub mod models;
pub mod probe;
pub mod relay;
pub mod server;

pub use error::{Error, RelayError, Result};
