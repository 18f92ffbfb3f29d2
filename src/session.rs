//! A running keypad: state, deferred actions and a renderer.

use crate::calculator::{CalculatorState, Engine, Input, Outcome};
use crate::config::Config;
use crate::display::{DisplayRenderer, Frame};
use crate::scheduler::{Scheduler, TimerHandle};
use tracing::{debug, info};

/// Work deferred to a later point on the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Reset after an error has been on screen long enough.
    Clear,
}

pub struct Session<R: DisplayRenderer> {
    engine: Engine,
    state: CalculatorState,
    config: Config,
    scheduler: Scheduler<Deferred>,
    pending_clear: Option<TimerHandle>,
    renderer: R,
}

impl<R: DisplayRenderer> Session<R> {
    pub fn new(config: Config, renderer: R) -> Self {
        Self {
            engine: Engine::new(config.engine.clone()),
            state: CalculatorState::new(),
            config,
            scheduler: Scheduler::new(),
            pending_clear: None,
            renderer,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Milliseconds elapsed on the session clock.
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// The scheduled post-error reset, if one is waiting.
    pub fn pending_clear(&self) -> Option<TimerHandle> {
        self.pending_clear
            .filter(|handle| self.scheduler.is_pending(*handle))
    }

    /// The frame for the current state.
    pub fn frame(&self) -> Frame {
        Frame::from_state(&self.state, &self.config.display)
    }

    /// Render the current state without changing it.
    pub fn refresh(&mut self) -> Frame {
        let frame = self.frame();
        self.renderer.render(&frame);
        frame
    }

    /// Feed one input and render the result.
    ///
    /// Rejected inputs render nothing. A division by zero renders the error
    /// frame and schedules a reset.
    pub fn dispatch(&mut self, input: Input) -> Frame {
        let outcome = self.engine.apply(&mut self.state, input);

        match outcome {
            Outcome::Updated => {
                if input == Input::Clear
                    && let Some(handle) = self.pending_clear.take()
                {
                    self.scheduler.cancel(handle);
                }
                let frame = self.frame();
                self.renderer.render(&frame);
                frame
            }
            Outcome::Unchanged => self.frame(),
            Outcome::DivideByZero => {
                let delay = self.engine.config().error_clear_delay_ms;
                info!(delay_ms = delay, "Division by zero, resetting after delay");

                if let Some(handle) = self.pending_clear.take() {
                    self.scheduler.cancel(handle);
                }
                self.pending_clear = Some(self.scheduler.schedule(delay, Deferred::Clear));

                let frame = Frame::error(&self.state, &self.config.display);
                self.renderer.render(&frame);
                frame
            }
        }
    }

    /// Feed several inputs, returning the last frame.
    pub fn dispatch_all(&mut self, inputs: impl IntoIterator<Item = Input>) -> Frame {
        inputs
            .into_iter()
            .map(|input| self.dispatch(input))
            .last()
            .unwrap_or_else(|| self.frame())
    }

    /// Move the session clock forward and run whatever fell due.
    ///
    /// Returns the number of deferred actions that ran.
    pub fn advance(&mut self, delta_ms: u64) -> usize {
        let due = self.scheduler.advance(delta_ms);
        let ran = due.len();

        for action in due {
            match action {
                Deferred::Clear => {
                    debug!("Running deferred clear");
                    self.pending_clear = None;
                    self.engine.clear(&mut self.state);
                    let frame = self.frame();
                    self.renderer.render(&frame);
                }
            }
        }
        ran
    }

    /// Run every pending deferred action regardless of its due time.
    pub fn flush(&mut self) -> usize {
        let remaining = self
            .scheduler
            .pending()
            .last()
            .map(|timer| timer.due_at.saturating_sub(self.scheduler.now_ms()))
            .unwrap_or(0);
        self.advance(remaining)
    }
}
