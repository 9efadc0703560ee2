//! Browser engine abstraction
//!
//! The bridge never talks to a browser engine directly; it goes through the
//! `BrowserEngine` / `BrowserSession` traits so backends are swappable. The
//! engine owns its own process machinery (worker and IO threads, subprocess
//! spawning) opaquely; the one contract the bridge relies on is that client
//! callbacks are delivered only inside `do_message_loop_work`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bridge::client::RenderClient;
use crate::settings::BridgeConfig;
use crate::Result;

// Deterministic in-memory backend used by tests, benches and the demo driver
#[cfg(feature = "harness")]
pub mod harness;

/// Log severity forwarded to the engine at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Info,
    Warning,
    Error,
}

/// Process-wide engine settings assembled once at startup.
///
/// The directory paths are opaque to the bridge; they are derived from the
/// engine's own module location and handed straight back to it.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub log_severity: LogSeverity,
    pub release_dcheck_enabled: bool,
    pub debug: bool,
    pub locales_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub subprocess_path: PathBuf,
}

impl EngineSettings {
    /// Build settings for an engine whose support files live under
    /// `module_dir`, taking the tunable flags from `config`.
    pub fn for_module_dir(module_dir: &Path, config: &BridgeConfig) -> Self {
        Self {
            log_severity: config.log_severity,
            release_dcheck_enabled: config.release_dcheck_enabled,
            debug: config.debug,
            locales_dir: module_dir.join("locales"),
            resources_dir: module_dir.to_path_buf(),
            subprocess_path: module_dir.join("subprocess"),
        }
    }
}

/// Native window binding for a browser session.
///
/// Off-screen sessions still anchor their compositing context to a real
/// window handle supplied by the host windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    handle: u64,
    offscreen: bool,
}

impl WindowInfo {
    /// Render to a memory buffer instead of the window itself
    pub fn offscreen(handle: u64) -> Self {
        Self {
            handle,
            offscreen: true,
        }
    }

    /// Render into the window directly (unused by the bridge, kept for
    /// backends that also drive visible windows)
    pub fn windowed(handle: u64) -> Self {
        Self {
            handle,
            offscreen: false,
        }
    }

    pub fn handle(&self) -> u64 {
        self.handle
    }

    pub fn is_offscreen(&self) -> bool {
        self.offscreen
    }
}

/// Per-session browser settings, passed through to the engine untouched
#[derive(Debug, Clone, Default)]
pub struct BrowserSettings {
    /// Paint cadence cap for windowless rendering, frames per second
    pub windowless_frame_rate: Option<u32>,
    /// Background color painted before the page loads, RGBA
    pub background_color: Option<[u8; 4]>,
}

/// Supplies the fallback native window handle when a surface is created
/// without an explicit one.
pub trait HostWindow {
    fn native_handle(&self) -> Option<u64>;
}

/// Client handle shared between a surface and the engine that calls back
/// into it. Single-threaded by design: callbacks only fire during the pump
/// tick, never from another thread.
pub type SharedClient = Rc<RefCell<dyn RenderClient>>;

/// One live browser instance, owned by exactly one `PaintSurface`.
///
/// Dropping the session releases the browser; there is no explicit close
/// beyond process-wide shutdown.
pub trait BrowserSession {
    /// Register the callback handler the engine paints through
    fn set_client(&mut self, client: SharedClient);

    /// Forward a focus change to the browser
    fn send_focus_event(&mut self, focused: bool);

    /// Tell the browser its view changed size; it re-queries the client's
    /// view rect before its next internal paint
    fn was_resized(&mut self);
}

/// Core trait for browser engine backends
pub trait BrowserEngine {
    type Session: BrowserSession;

    /// Initialize the engine process machinery. Must be called exactly once
    /// before any session is created.
    fn initialize(&mut self, settings: &EngineSettings) -> Result<()>;

    /// Tear the engine down. No callback fires after this returns.
    fn shutdown(&mut self);

    /// Run one slice of the engine's internal message loop, synchronously.
    /// All paint/load callbacks are delivered inside this call.
    fn do_message_loop_work(&mut self);

    /// Directory the engine's support files (locales, resources, subprocess
    /// executable) are resolved against
    fn module_directory(&self) -> PathBuf;

    /// Synchronously create a browser session bound to the given window
    fn create_browser(
        &mut self,
        window: &WindowInfo,
        settings: &BrowserSettings,
        url: &str,
    ) -> Result<Self::Session>;
}
