//! Deterministic in-memory engine backend.
//!
//! Stands in for a real browser process in tests, benches and the demo
//! driver: it honors the bridge's scheduling contract (callbacks fire only
//! during `do_message_loop_work`), repaints at the client-reported view
//! rect after a resize notification, and delivers scripted load events.
//! Callback errors are recorded instead of tearing anything down, the same
//! way a real embedding would report them without killing the host.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, warn};

use crate::bridge::{DirtyRect, PaintElement};
use crate::engine::{
    BrowserEngine, BrowserSession, BrowserSettings, EngineSettings, SharedClient, WindowInfo,
};
use crate::{Error, Result};

/// Scripted event delivered to a session's client on the next pump tick
#[derive(Debug, Clone)]
pub enum HarnessEvent {
    Paint {
        element: PaintElement,
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
    LoadEnd {
        frame: String,
        http_code: u16,
    },
    LoadError {
        frame: String,
        code: i32,
        text: String,
        url: String,
    },
}

struct SessionState {
    url: String,
    client: Option<SharedClient>,
    focused: bool,
    repaint_pending: bool,
    queued: VecDeque<HarnessEvent>,
}

/// Session handle owned by a `PaintSurface`; shares state with the engine
/// that created it
pub struct HarnessSession {
    state: Rc<RefCell<SessionState>>,
}

impl BrowserSession for HarnessSession {
    fn set_client(&mut self, client: SharedClient) {
        self.state.borrow_mut().client = Some(client);
    }

    fn send_focus_event(&mut self, focused: bool) {
        self.state.borrow_mut().focused = focused;
    }

    fn was_resized(&mut self) {
        self.state.borrow_mut().repaint_pending = true;
    }
}

/// Deterministic engine backend
pub struct HarnessEngine {
    initialized: bool,
    ticks: u64,
    module_dir: PathBuf,
    settings: Option<EngineSettings>,
    sessions: Vec<Rc<RefCell<SessionState>>>,
    errors: Vec<Error>,
}

impl HarnessEngine {
    pub fn new() -> Self {
        let module_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            initialized: false,
            ticks: 0,
            module_dir,
            settings: None,
            sessions: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dir = dir.into();
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Pump ticks observed since initialization
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Settings captured at initialization
    pub fn settings(&self) -> Option<&EngineSettings> {
        self.settings.as_ref()
    }

    pub fn session_url(&self, session: usize) -> Option<String> {
        self.sessions
            .get(session)
            .map(|s| s.borrow().url.clone())
    }

    pub fn session_focused(&self, session: usize) -> bool {
        self.sessions
            .get(session)
            .map(|s| s.borrow().focused)
            .unwrap_or(false)
    }

    /// Script an event for delivery on the next pump tick. Events queued
    /// for an unknown session are dropped with a warning.
    pub fn queue_event(&mut self, session: usize, event: HarnessEvent) {
        match self.sessions.get(session) {
            Some(state) => state.borrow_mut().queued.push_back(event),
            None => warn!("queue_event: no session {session}, event dropped"),
        }
    }

    /// Drain the callback errors recorded so far
    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    fn dispatch(&mut self, state: &Rc<RefCell<SessionState>>) {
        let (client, repaint, events) = {
            let mut s = state.borrow_mut();
            let Some(client) = s.client.clone() else {
                return;
            };
            let repaint = std::mem::take(&mut s.repaint_pending);
            let events: Vec<HarnessEvent> = s.queued.drain(..).collect();
            (client, repaint, events)
        };

        if repaint {
            // the engine re-queries the view rect before rendering, so a
            // resize and its repaint can never disagree on dimensions
            let rect = client.borrow().view_rect();
            let frame = test_pattern(rect.width, rect.height);
            let dirty = [DirtyRect {
                x: 0,
                y: 0,
                width: rect.width,
                height: rect.height,
            }];
            let outcome = client.borrow_mut().on_paint(
                PaintElement::View,
                &dirty,
                &frame,
                rect.width,
                rect.height,
            );
            self.record(outcome);
        }

        for event in events {
            let outcome = match event {
                HarnessEvent::Paint {
                    element,
                    data,
                    width,
                    height,
                } => {
                    let dirty = [DirtyRect {
                        x: 0,
                        y: 0,
                        width,
                        height,
                    }];
                    client
                        .borrow_mut()
                        .on_paint(element, &dirty, &data, width, height)
                }
                HarnessEvent::LoadEnd { frame, http_code } => {
                    client.borrow_mut().on_load_end(&frame, http_code);
                    Ok(())
                }
                HarnessEvent::LoadError {
                    frame,
                    code,
                    text,
                    url,
                } => client.borrow_mut().on_load_error(&frame, code, &text, &url),
            };
            self.record(outcome);
        }
    }

    fn record(&mut self, outcome: Result<()>) {
        if let Err(err) = outcome {
            warn!("callback error: {err}");
            self.errors.push(err);
        }
    }
}

impl Default for HarnessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserEngine for HarnessEngine {
    type Session = HarnessSession;

    fn initialize(&mut self, settings: &EngineSettings) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyStarted);
        }
        debug!(
            "harness engine up (resources: {})",
            settings.resources_dir.display()
        );
        self.settings = Some(settings.clone());
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.initialized = false;
        self.sessions.clear();
    }

    fn do_message_loop_work(&mut self) {
        if !self.initialized {
            return;
        }
        self.ticks += 1;
        let sessions: Vec<_> = self.sessions.to_vec();
        for state in &sessions {
            self.dispatch(state);
        }
    }

    fn module_directory(&self) -> PathBuf {
        self.module_dir.clone()
    }

    fn create_browser(
        &mut self,
        window: &WindowInfo,
        _settings: &BrowserSettings,
        url: &str,
    ) -> Result<Self::Session> {
        if !self.initialized {
            return Err(Error::Initialization(
                "engine not initialized; create the session after start()".to_string(),
            ));
        }
        if !window.is_offscreen() {
            return Err(Error::Initialization(
                "harness engine only supports off-screen windows".to_string(),
            ));
        }
        let state = Rc::new(RefCell::new(SessionState {
            url: url.to_string(),
            client: None,
            focused: false,
            repaint_pending: false,
            queued: VecDeque::new(),
        }));
        self.sessions.push(state.clone());
        Ok(HarnessSession { state })
    }
}

/// Deterministic full-view frame: a coordinate gradient with opaque alpha,
/// rows ordered bottom-left
pub fn test_pattern(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.push((x & 0xff) as u8);
            data.push((y & 0xff) as u8);
            data.push(((x ^ y) & 0xff) as u8);
            data.push(0xff);
        }
    }
    data
}
