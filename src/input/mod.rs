//! Input source for the keypad.
//!
//! Maps key names and button labels to engine inputs, and splits typed lines
//! into key presses.

mod keymap;

pub use keymap::{InputError, map_key, tokenize};
