//! Frame bridge between a browser engine's paint callbacks and a host
//! renderer's texture memory
//!
//! Composition, leaves first: the host frame loop ticks the
//! [`MessageLoopPump`](pump::MessageLoopPump), the engine decides a repaint
//! is needed and calls back into the surface's
//! [`RenderClient`](client::RenderClient), which writes the pixels into the
//! [`PaintSurface`](surface::PaintSurface)'s backing store; the next render
//! pass samples the now-current texture. Resizing flows the other way:
//! the host resizes the surface, the engine re-queries the view rect and
//! repaints at the new size.

pub mod buffer;
pub mod client;
pub mod pump;
pub mod surface;

pub use buffer::{PixelBuffer, RowOrigin};
pub use client::{LoadEndEvent, RenderClient, SurfaceClient};
pub use pump::{MessageLoopPump, TaskSignal};
pub use surface::{PaintSurface, SurfaceOptions};

/// Paint element type reported by the engine.
///
/// Only `View` is supported; popup overlays are out of scope and fail the
/// paint loudly rather than being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintElement {
    View,
    Popup,
}

/// The rectangle the browser should render at, queried by the engine
/// before painting. Always anchored at the origin; computed on demand from
/// the surface's current buffer dimensions and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Changed sub-region of a frame. Carried through paint callbacks for
/// completeness but unused: every paint is applied as a full view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Adapter to the host renderer's texture-upload API.
///
/// The surface exposes its pixels through this seam instead of inheriting
/// from a renderer-specific texture base type, so the bridge stays free of
/// any one renderer's class hierarchy.
pub trait TextureTarget {
    /// Receive the surface's current RGBA pixels, rows ordered bottom-left
    fn upload_rgba(&mut self, width: u32, height: u32, data: &[u8]);
}
