//! What the keypad shows after every input.
//!
//! The engine hands a [`Frame`] to a [`DisplayRenderer`] after each event.
//! Renderers owe nothing back: a frame they cannot draw is simply dropped.

mod terminal;

pub use terminal::{OutputFormat, TerminalRenderer};

use crate::calculator::number::{parse_operand, to_precision};
use crate::calculator::{CalculatorState, Operator};
use crate::config::DisplayConfig;
use serde::Serialize;

/// Animation cue attached to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Brief scale-up after a normal update.
    Pop,
    /// Horizontal shake on error.
    Shake,
}

/// Font size class chosen from the display text length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Normal,
    Small,
    Tiny,
}

/// One rendered state of the keypad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Main display, already trimmed to fit.
    pub display: String,
    /// Expression preview above the display.
    pub expression: String,
    /// Operator button to highlight.
    pub active_operator: Option<Operator>,
    pub cue: Cue,
    pub scale: Scale,
    /// Whether the display holds the error text instead of a number.
    pub is_error: bool,
}

impl Frame {
    /// Build a frame for a normal update.
    pub fn from_state(state: &CalculatorState, config: &DisplayConfig) -> Self {
        let (display, expression) = state.frame_text();
        let display = fit_display(display, config);

        Self {
            scale: scale_for(&display, config),
            display,
            expression: expression.to_string(),
            active_operator: state.active_operator(),
            cue: Cue::Pop,
            is_error: false,
        }
    }

    /// Build the error frame shown after a division by zero. The expression
    /// preview is left as it was.
    pub fn error(state: &CalculatorState, config: &DisplayConfig) -> Self {
        let display = config.error_text.clone();

        Self {
            scale: scale_for(&display, config),
            display,
            expression: state.expression.clone(),
            active_operator: state.active_operator(),
            cue: Cue::Shake,
            is_error: true,
        }
    }
}

/// Receives a frame after every keypad event.
pub trait DisplayRenderer {
    fn render(&mut self, frame: &Frame);
}

impl<R: DisplayRenderer + ?Sized> DisplayRenderer for &mut R {
    fn render(&mut self, frame: &Frame) {
        (**self).render(frame)
    }
}

/// Renderer that keeps every frame, for tests and scripting.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl DisplayRenderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Shorten long numbers so they fit the display.
///
/// Text that is not a number (or is short enough) passes through unchanged.
pub fn fit_display(text: &str, config: &DisplayConfig) -> String {
    if text.chars().count() <= config.trim_above {
        return text.to_string();
    }

    let value = parse_operand(text);
    if value.is_nan() {
        return text.to_string();
    }

    let formatted = to_precision(value, config.trim_precision);
    if formatted.contains('e') || !formatted.contains('.') {
        formatted
    } else {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn scale_for(text: &str, config: &DisplayConfig) -> Scale {
    let len = text.chars().count();
    if len > config.tiny_above {
        Scale::Tiny
    } else if len > config.small_above {
        Scale::Small
    } else {
        Scale::Normal
    }
}
