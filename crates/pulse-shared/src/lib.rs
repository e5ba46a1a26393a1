//! # Pulse Shared
//!
//! Wire types shared between the API server and its clients.
//! Kept free of server-only dependencies so it can also target WASM.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
