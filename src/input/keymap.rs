//! Key table and line tokenizer.

use crate::calculator::{Digit, Input, Operator};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown key `{0}`")]
    UnknownKey(String),
}

lazy_static! {
    /// A named key (`Enter`, `sign`) or any other single non-space character.
    static ref KEY_TOKEN: Regex = Regex::new(r"[A-Za-z]{2,}|\S").unwrap();
}

/// Look up a single key by name.
///
/// Accepts keyboard keys (`0`-`9`, `.`, `,`, `+`, `-`, `*`, `/`, `=`, `%`,
/// `Enter`, `Backspace`, `Escape`, `Delete`) and keypad button names
/// (`dot`, `equals`, `clear`, `sign`, `percent`, `backspace`, `±`).
/// Named keys match case-insensitively.
pub fn map_key(key: &str) -> Option<Input> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return map_char(c);
    }

    match key.to_ascii_lowercase().as_str() {
        "enter" | "equals" | "return" => Some(Input::Equals),
        "backspace" => Some(Input::Backspace),
        "escape" | "esc" | "delete" | "clear" => Some(Input::Clear),
        "percent" => Some(Input::Percent),
        "sign" | "negate" => Some(Input::ToggleSign),
        "dot" | "point" => Some(Input::Point),
        _ => None,
    }
}

fn map_char(c: char) -> Option<Input> {
    if let Some(digit) = Digit::from_char(c) {
        return Some(Input::Digit(digit));
    }

    match c {
        '.' | ',' => Some(Input::Point),
        '=' => Some(Input::Equals),
        '%' => Some(Input::Percent),
        '±' => Some(Input::ToggleSign),
        _ => Operator::from_char(c).map(Input::Operator),
    }
}

/// Split a typed line into inputs.
///
/// `"12+3="` and `"1 2 + 3 Enter"` both yield the same five inputs.
pub fn tokenize(line: &str) -> Result<Vec<Input>, InputError> {
    KEY_TOKEN
        .find_iter(line)
        .map(|m| map_key(m.as_str()).ok_or_else(|| InputError::UnknownKey(m.as_str().to_string())))
        .collect()
}
