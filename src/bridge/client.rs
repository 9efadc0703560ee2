//! Callback handler bridging engine events to a paint surface

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::trace;

use crate::bridge::buffer::{PixelBuffer, RowOrigin};
use crate::bridge::{DirtyRect, PaintElement, ViewRect};
use crate::{Error, Result};

/// Informational event forwarded when a frame finishes loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEndEvent {
    pub frame: String,
    pub http_code: u16,
}

pub type LoadEndHook = Rc<dyn Fn(&LoadEndEvent)>;

/// The engine's client-callback contract.
///
/// Backends invoke these only from inside `do_message_loop_work`; nothing
/// here is expected to be thread-safe. Paint data arrives with rows
/// ordered bottom-left to match the buffer convention. Errors returned
/// from a callback are reported upward by the engine and never tear down
/// the session; the surface keeps serving its last good frame.
pub trait RenderClient {
    /// New pixel data is ready. `dirty_rects` describes the changed
    /// sub-regions but every paint is applied as a full view.
    fn on_paint(
        &mut self,
        element: PaintElement,
        dirty_rects: &[DirtyRect],
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<()>;

    /// The dimensions the engine should render at before its next paint
    fn view_rect(&self) -> ViewRect;

    /// View-local to screen coordinate conversion; `None` means not
    /// handled (always, in off-screen mode)
    fn screen_point(&self, view_x: i32, view_y: i32) -> Option<(i32, i32)>;

    /// A frame finished loading with the given HTTP status
    fn on_load_end(&mut self, frame: &str, http_code: u16);

    /// A navigation or load attempt failed
    fn on_load_error(
        &mut self,
        frame: &str,
        error_code: i32,
        error_text: &str,
        failed_url: &str,
    ) -> Result<()>;
}

/// Concrete handler binding one browser session to one surface's buffer.
///
/// Holds only a weak back-reference; it owns neither the session nor the
/// surface.
pub struct SurfaceClient {
    buffer: Weak<RefCell<PixelBuffer>>,
    on_load_end: Option<LoadEndHook>,
}

impl SurfaceClient {
    pub(crate) fn new(buffer: Weak<RefCell<PixelBuffer>>) -> Self {
        Self {
            buffer,
            on_load_end: None,
        }
    }

    pub(crate) fn set_load_end_hook(&mut self, hook: LoadEndHook) {
        self.on_load_end = Some(hook);
    }

    fn buffer(&self) -> Option<Rc<RefCell<PixelBuffer>>> {
        self.buffer.upgrade()
    }
}

impl RenderClient for SurfaceClient {
    fn on_paint(
        &mut self,
        element: PaintElement,
        _dirty_rects: &[DirtyRect],
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<()> {
        if element != PaintElement::View {
            return Err(Error::UnsupportedElement(element));
        }
        let Some(buffer) = self.buffer() else {
            trace!("paint after surface teardown, dropped ({width}x{height})");
            return Ok(());
        };
        let result = buffer.borrow_mut().write_paint(data, RowOrigin::BottomLeft);
        result
    }

    fn view_rect(&self) -> ViewRect {
        match self.buffer() {
            Some(buffer) => buffer.borrow().view_rect(),
            // only reachable mid-teardown, after the surface released the buffer
            None => ViewRect::new(0, 0),
        }
    }

    fn screen_point(&self, _view_x: i32, _view_y: i32) -> Option<(i32, i32)> {
        None
    }

    fn on_load_end(&mut self, frame: &str, http_code: u16) {
        trace!("load end: frame={frame} http_code={http_code}");
        if let Some(hook) = &self.on_load_end {
            hook(&LoadEndEvent {
                frame: frame.to_string(),
                http_code,
            });
        }
    }

    fn on_load_error(
        &mut self,
        frame: &str,
        error_code: i32,
        error_text: &str,
        failed_url: &str,
    ) -> Result<()> {
        Err(Error::Load {
            frame: frame.to_string(),
            code: error_code,
            text: error_text.to_string(),
            url: failed_url.to_string(),
        })
    }
}
