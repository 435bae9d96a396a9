//! Popup-window surface for interactive flows.
//!
//! Interactive flows (login, approval) open the vault context in a separate
//! top-level window, sized to fixed dimensions and centered over the
//! caller's window rather than the whole screen. The surface is a platform
//! seam: the protocol layer opens windows, posts replies to them, and
//! closes them, without knowing what a "window" is.

use crate::transport::ChannelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;
use vault_types::Envelope;

/// Fixed popup width, matching the vault context's layout.
pub const DEFAULT_POPUP_WIDTH: u32 = 800;
/// Fixed popup height.
pub const DEFAULT_POPUP_HEIGHT: u32 = 1000;

/// Opaque handle to an open popup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    /// Wrap a surface-assigned raw handle.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Current geometry of the caller's window, queried at launch time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallerWindow {
    /// Outer width of the caller window.
    pub outer_width: u32,
    /// Outer height of the caller window.
    pub outer_height: u32,
    /// Horizontal screen offset of the caller window.
    pub screen_x: i32,
    /// Vertical screen offset of the caller window.
    pub screen_y: i32,
}

/// Placement of a popup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Popup width.
    pub width: u32,
    /// Popup height.
    pub height: u32,
    /// Distance from the top of the screen.
    pub top: i32,
    /// Distance from the left of the screen.
    pub left: i32,
}

impl WindowSpec {
    /// Center a `width` x `height` popup over the caller's window.
    pub fn centered(width: u32, height: u32, caller: &CallerWindow) -> Self {
        let top = caller.outer_height as i32 / 2 + caller.screen_y - height as i32 / 2;
        let left = caller.outer_width as i32 / 2 + caller.screen_x - width as i32 / 2;
        Self {
            width,
            height,
            top,
            left,
        }
    }
}

/// Platform binding for the popup channel.
#[async_trait]
pub trait PopupSurface: Send + Sync {
    /// Current geometry of the caller's window.
    fn caller_window(&self) -> CallerWindow;

    /// Open a popup at `url` with the given placement.
    async fn open(&self, url: &Url, spec: &WindowSpec) -> Result<WindowHandle, ChannelError>;

    /// Post a protocol reply to an open popup.
    async fn post(&self, handle: WindowHandle, envelope: Envelope) -> Result<(), ChannelError>;

    /// Close a popup.
    async fn close(&self, handle: WindowHandle) -> Result<(), ChannelError>;
}

/// In-memory popup surface for tests and demos.
pub mod memory {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Records opens, posted replies, and closes instead of touching a
    /// real windowing system.
    pub struct MemoryPopupSurface {
        caller: CallerWindow,
        next_handle: AtomicU64,
        opened: Mutex<Vec<(WindowHandle, Url, WindowSpec)>>,
        posted: Mutex<Vec<(WindowHandle, Envelope)>>,
        closed: Mutex<Vec<WindowHandle>>,
    }

    impl MemoryPopupSurface {
        /// Create a surface reporting the given caller geometry.
        pub fn new(caller: CallerWindow) -> Self {
            Self {
                caller,
                next_handle: AtomicU64::new(1),
                opened: Mutex::new(Vec::new()),
                posted: Mutex::new(Vec::new()),
                closed: Mutex::new(Vec::new()),
            }
        }

        /// Windows opened so far.
        pub fn opened(&self) -> Vec<(WindowHandle, Url, WindowSpec)> {
            self.opened.lock().clone()
        }

        /// Replies posted to popups so far.
        pub fn posted(&self) -> Vec<(WindowHandle, Envelope)> {
            self.posted.lock().clone()
        }

        /// Windows closed so far.
        pub fn closed(&self) -> Vec<WindowHandle> {
            self.closed.lock().clone()
        }
    }

    impl Default for MemoryPopupSurface {
        fn default() -> Self {
            Self::new(CallerWindow {
                outer_width: 1920,
                outer_height: 1080,
                screen_x: 0,
                screen_y: 0,
            })
        }
    }

    #[async_trait]
    impl PopupSurface for MemoryPopupSurface {
        fn caller_window(&self) -> CallerWindow {
            self.caller
        }

        async fn open(&self, url: &Url, spec: &WindowSpec) -> Result<WindowHandle, ChannelError> {
            let handle = WindowHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed));
            self.opened.lock().push((handle, url.clone(), *spec));
            Ok(handle)
        }

        async fn post(&self, handle: WindowHandle, envelope: Envelope) -> Result<(), ChannelError> {
            self.posted.lock().push((handle, envelope));
            Ok(())
        }

        async fn close(&self, handle: WindowHandle) -> Result<(), ChannelError> {
            self.closed.lock().push(handle);
            Ok(())
        }
    }
}
