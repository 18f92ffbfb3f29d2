//! Keypad calculator engine.
//!
//! The engine is a reducer over an explicit [`calculator::CalculatorState`].
//! A [`session::Session`] wires it to a [`display::DisplayRenderer`] and a
//! virtual clock for the delayed reset after a division by zero.

pub mod calculator;
pub mod config;
pub mod display;
pub mod input;
pub mod scheduler;
pub mod session;

pub use calculator::{CalculatorState, Engine, Input, Operator, Outcome};
pub use config::Config;
pub use session::Session;
