//! webtex — off-screen browser texture bridge
//!
//! Embeds an off-screen web-browser rendering surface into a real-time
//! renderer as a texture. The crate's core is the frame bridge: the
//! synchronization between a browser engine's asynchronous paint events
//! and the texture upload/resize lifecycle consumed by a host frame loop.
//!
//! Browser engines plug in behind the [`engine::BrowserEngine`] trait;
//! the bundled [`engine::harness`] backend (feature `harness`, on by
//! default) is a deterministic stand-in used by tests and the demo
//! driver.
//!
//! # Example
//!
//! ```
//! use webtex::engine::harness::HarnessEngine;
//! use webtex::{BridgeConfig, CooperativeScheduler, EngineLifecycle, PaintSurface, SurfaceOptions};
//!
//! # fn main() -> webtex::Result<()> {
//! let mut scheduler = CooperativeScheduler::new();
//! let mut lifecycle = EngineLifecycle::new(HarnessEngine::new());
//! lifecycle.start(&BridgeConfig::default(), &mut scheduler)?;
//!
//! let engine = lifecycle.engine();
//! let opts = SurfaceOptions::new("https://example.com")
//!     .with_size(800, 600)
//!     .with_window_handle(0x10);
//! let surface = PaintSurface::create(&mut *engine.borrow_mut(), None, opts)?;
//!
//! // one pump tick delivers the initial paint
//! scheduler.run_frame();
//! assert_eq!(surface.view_rect().width, 800);
//! assert!(surface.snapshot().iter().any(|&p| p != 0));
//!
//! lifecycle.stop(&mut scheduler);
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod settings;

pub use bridge::{
    DirtyRect, LoadEndEvent, MessageLoopPump, PaintElement, PaintSurface, PixelBuffer,
    RenderClient, RowOrigin, SurfaceClient, SurfaceOptions, TaskSignal, TextureTarget, ViewRect,
};
pub use engine::{
    BrowserEngine, BrowserSession, BrowserSettings, EngineSettings, HostWindow, LogSeverity,
    WindowInfo,
};
pub use error::{Error, Result};
pub use lifecycle::{CooperativeScheduler, EngineLifecycle, FrameScheduler};
pub use settings::BridgeConfig;
