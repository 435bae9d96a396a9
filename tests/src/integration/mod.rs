//! Cross-crate choreography tests for the custody protocol.

pub mod support;

mod flows;
mod handshake;
