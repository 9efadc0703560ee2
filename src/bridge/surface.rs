//! Off-screen browser surface backed by a pixel buffer

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::bridge::buffer::{PixelBuffer, RowOrigin};
use crate::bridge::client::{LoadEndEvent, SurfaceClient};
use crate::bridge::{TextureTarget, ViewRect};
use crate::engine::{BrowserEngine, BrowserSession, BrowserSettings, HostWindow, WindowInfo};
use crate::settings::{BridgeConfig, DEFAULT_TEXTURE_HEIGHT, DEFAULT_TEXTURE_WIDTH};
use crate::{Error, Result};

/// Construction parameters for a [`PaintSurface`]
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    pub width: u32,
    pub height: u32,
    /// Native window handle anchoring the off-screen compositing context;
    /// resolved from the injected [`HostWindow`] when absent
    pub window_handle: Option<u64>,
    pub browser_settings: BrowserSettings,
    /// Initial navigation URL
    pub url: String,
}

impl SurfaceOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            width: DEFAULT_TEXTURE_WIDTH,
            height: DEFAULT_TEXTURE_HEIGHT,
            window_handle: None,
            browser_settings: BrowserSettings::default(),
            url: url.into(),
        }
    }

    /// Start from configured texture dimensions instead of the built-in
    /// defaults
    pub fn from_config(config: &BridgeConfig, url: impl Into<String>) -> Self {
        Self {
            width: config.texture_width,
            height: config.texture_height,
            ..Self::new(url)
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_window_handle(mut self, handle: u64) -> Self {
        self.window_handle = Some(handle);
        self
    }

    pub fn with_browser_settings(mut self, settings: BrowserSettings) -> Self {
        self.browser_settings = settings;
        self
    }
}

/// One off-screen browser rendering into one RGBA texture.
///
/// Owns the pixel buffer and the browser session for its whole lifetime;
/// dropping the surface drops both. The buffer is shared with the session's
/// callback handler through a weak reference, so a paint that arrives
/// mid-teardown finds nothing to write into.
pub struct PaintSurface<S: BrowserSession> {
    buffer: Rc<RefCell<PixelBuffer>>,
    client: Rc<RefCell<SurfaceClient>>,
    session: S,
}

impl<S: BrowserSession> std::fmt::Debug for PaintSurface<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintSurface").finish_non_exhaustive()
    }
}

impl<S: BrowserSession> PaintSurface<S> {
    /// Allocate the buffer, create the browser session in off-screen mode,
    /// wire up the callback handler, focus the session, and issue the
    /// initial resize notification so the engine's viewport matches the
    /// buffer before the first paint.
    ///
    /// Construction errors abort entirely; no partially-initialized
    /// surface is ever returned.
    pub fn create<E>(
        engine: &mut E,
        host: Option<&dyn HostWindow>,
        opts: SurfaceOptions,
    ) -> Result<Self>
    where
        E: BrowserEngine<Session = S>,
    {
        let handle = opts
            .window_handle
            .or_else(|| host.and_then(|h| h.native_handle()))
            .ok_or(Error::WindowResolution)?;

        let buffer = Rc::new(RefCell::new(PixelBuffer::new(opts.width, opts.height)?));
        let window = WindowInfo::offscreen(handle);
        let mut session = engine.create_browser(&window, &opts.browser_settings, &opts.url)?;

        let client = Rc::new(RefCell::new(SurfaceClient::new(Rc::downgrade(&buffer))));
        session.send_focus_event(true);
        session.set_client(client.clone());
        // viewport must match the buffer before the engine's first paint
        session.was_resized();
        debug!(
            "created {}x{} off-screen surface for {}",
            opts.width, opts.height, opts.url
        );

        Ok(Self {
            buffer,
            client,
            session,
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.borrow().width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.borrow().height()
    }

    pub fn view_rect(&self) -> ViewRect {
        self.buffer.borrow().view_rect()
    }

    /// Resize the buffer width and notify the browser so it re-queries the
    /// view rect on its next internal paint
    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.buffer.borrow_mut().set_width(width)?;
        self.session.was_resized();
        Ok(())
    }

    /// Resize the buffer height and notify the browser
    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.buffer.borrow_mut().set_height(height)?;
        self.session.was_resized();
        Ok(())
    }

    /// Resize both dimensions with a single notification
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.buffer.borrow_mut().resize(width, height)?;
        self.session.was_resized();
        Ok(())
    }

    /// Write one full-view frame of raw pixels into the backing store.
    /// See [`PixelBuffer::write_paint`] for the shape contract.
    pub fn write_paint_data(&mut self, data: &[u8], origin: RowOrigin) -> Result<()> {
        self.buffer.borrow_mut().write_paint(data, origin)
    }

    /// Push the current pixels to the host renderer
    pub fn present_to(&self, target: &mut dyn TextureTarget) {
        let buffer = self.buffer.borrow();
        target.upload_rgba(buffer.width(), buffer.height(), buffer.bytes());
    }

    /// Copy of the current pixels, rows ordered bottom-left
    pub fn snapshot(&self) -> Vec<u8> {
        self.buffer.borrow().bytes().to_vec()
    }

    /// Forward a focus change to the browser session
    pub fn set_focused(&mut self, focused: bool) {
        self.session.send_focus_event(focused);
    }

    /// Subscribe to the informational load-end passthrough
    pub fn on_load_end(&mut self, hook: impl Fn(&LoadEndEvent) + 'static) {
        self.client.borrow_mut().set_load_end_hook(Rc::new(hook));
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }
}
