//! Process-wide engine lifecycle and host scheduler integration

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::bridge::pump::{MessageLoopPump, TaskSignal};
use crate::engine::{BrowserEngine, EngineSettings};
use crate::settings::BridgeConfig;
use crate::{Error, Result};

/// The host's named recurring-task registration API.
///
/// The bridge registers exactly one task (the message loop pump) and
/// removes it by name on shutdown.
pub trait FrameScheduler {
    fn add_task(&mut self, name: &str, task: Box<dyn FnMut() -> TaskSignal>);
    fn remove_task(&mut self, name: &str);
}

/// Explicit start/stop lifecycle for the browser engine.
///
/// Replaces ambient process-wide engine state: the engine is injected
/// here and handed to collaborators as a shared handle. Double-start is
/// an error; stop removes the pump task before engine teardown so no
/// callback is driven into a half-torn-down surface.
pub struct EngineLifecycle<E: BrowserEngine> {
    engine: Rc<RefCell<E>>,
    started: bool,
}

impl<E: BrowserEngine + 'static> EngineLifecycle<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
            started: false,
        }
    }

    /// Shared handle to the engine, for creating surfaces and inspecting
    /// backend state
    pub fn engine(&self) -> Rc<RefCell<E>> {
        self.engine.clone()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Initialize the engine and register the pump with the host
    /// scheduler
    pub fn start(
        &mut self,
        config: &BridgeConfig,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<()> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        let settings = {
            let engine = self.engine.borrow();
            EngineSettings::for_module_dir(&engine.module_directory(), config)
        };
        self.engine.borrow_mut().initialize(&settings)?;

        let mut pump = MessageLoopPump::new(self.engine.clone());
        scheduler.add_task(
            MessageLoopPump::<E>::TASK_NAME,
            Box::new(move || pump.pump_once()),
        );
        self.started = true;
        debug!("engine started, pump registered");
        Ok(())
    }

    /// Remove the pump task, then shut the engine down. A no-op when not
    /// started.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.started {
            return;
        }
        // pump first: once the engine starts tearing down, a tick must
        // not drive callbacks anymore
        scheduler.remove_task(MessageLoopPump::<E>::TASK_NAME);
        self.engine.borrow_mut().shutdown();
        self.started = false;
        debug!("engine stopped, pump removed");
    }
}

/// Minimal single-threaded scheduler running every registered task once
/// per frame. Stands in for the host engine's own task manager in tests
/// and the demo driver.
#[derive(Default)]
pub struct CooperativeScheduler {
    tasks: Vec<(String, Box<dyn FnMut() -> TaskSignal>)>,
}

impl CooperativeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run each task once, dropping the ones that signal `Done`
    pub fn run_frame(&mut self) {
        let mut i = 0;
        while i < self.tasks.len() {
            match (self.tasks[i].1)() {
                TaskSignal::Continue => i += 1,
                TaskSignal::Done => {
                    self.tasks.remove(i);
                }
            }
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.tasks.iter().any(|(n, _)| n == name)
    }
}

impl FrameScheduler for CooperativeScheduler {
    fn add_task(&mut self, name: &str, task: Box<dyn FnMut() -> TaskSignal>) {
        self.tasks.push((name.to_string(), task));
    }

    fn remove_task(&mut self, name: &str) {
        self.tasks.retain(|(n, _)| n != name);
    }
}
