//! Calculator engine.
//!
//! This module provides:
//! - The keypad state machine (`CalculatorState` and its `Engine` reducer)
//! - The closed set of operators and inputs it understands
//! - Operand parsing and number formatting

mod engine;
mod event;
pub mod number;
mod operator;

pub use engine::{CalculatorState, DigitKey, Engine};
pub use event::{Digit, Input, Outcome};
pub use operator::{ArithmeticError, Operator};
