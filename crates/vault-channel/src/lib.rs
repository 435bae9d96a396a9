//! # Vault Channel - Message-Delivery Surfaces
//!
//! The custody protocol reaches the vault context over two surfaces:
//!
//! ```text
//! ┌──────────────┐   FrameChannel (steady state)   ┌───────────────┐
//! │     Host     │ ──────────────────────────────► │ Vault Context │
//! │              │                                 │  (embedded)   │
//! │              │   PopupSurface (interactive)    ├───────────────┤
//! │              │ ──────────────────────────────► │ Vault Context │
//! └──────────────┘                                 │   (popup)     │
//!                                                  └───────────────┘
//! ```
//!
//! - [`ChannelTransport`] is the generic "deliver this envelope across a
//!   context boundary" seam.
//! - [`FrameChannel`] wraps a transport with the bootstrap queue: requests
//!   issued before the frame signals readiness are buffered and flushed in
//!   FIFO order, exactly once, on the readiness signal.
//! - [`PopupSurface`] opens a separate top-level window for interactive
//!   flows and carries replies back to it.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod frame;
pub mod popup;
pub mod transport;

// Re-export main types
pub use frame::FrameChannel;
pub use popup::{CallerWindow, PopupSurface, WindowHandle, WindowSpec};
pub use transport::{memory_transport, ChannelError, ChannelTransport, MemoryTransport};

/// Default buffer size for in-memory transports.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
