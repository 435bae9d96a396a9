//! # Vaultgate Test Suite
//!
//! Unified test crate for cross-crate protocol choreography.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── support.rs    # In-memory vault-context harness
//!     ├── handshake.rs  # Bootstrap, correlation, dispatch ordering
//!     └── flows.rs      # Interactive popup flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vaultgate-tests
//! cargo test -p vaultgate-tests integration::handshake::
//! cargo test -p vaultgate-tests integration::flows::
//! ```

pub mod integration;
