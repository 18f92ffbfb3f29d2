//! The keypad state machine.
//!
//! `CalculatorState` is a plain value and `Engine` holds the limits the
//! reducer works under. Every operation mutates the state in place and
//! reports an [`Outcome`]; [`Engine::reduce`] wraps the same logic as a pure
//! function for callers that prefer to keep states immutable.

use super::number::{format_number, parse_operand, round_significant};
use super::{ArithmeticError, Digit, Input, Operator, Outcome};
use crate::config::EngineConfig;
use tracing::debug;

/// Everything the keypad remembers between inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    /// Operand being composed, kept exactly as typed.
    pub current_input: String,
    /// Operand captured when the pending operator was chosen.
    pub previous_input: String,
    pub operator: Option<Operator>,
    /// Next digit starts a new operand instead of extending the current one.
    pub awaiting_new_operand: bool,
    /// The display holds a finished result.
    pub just_calculated: bool,
    /// Expression preview shown above the display.
    pub expression: String,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_input: "0".to_string(),
            previous_input: String::new(),
            operator: None,
            awaiting_new_operand: false,
            just_calculated: false,
            expression: String::new(),
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `(display, expression)` pair to hand to a renderer.
    pub fn frame_text(&self) -> (&str, &str) {
        (&self.current_input, &self.expression)
    }

    /// Operator to highlight. Stays lit until the calculation finishes or
    /// the keypad is cleared.
    pub fn active_operator(&self) -> Option<Operator> {
        self.operator
    }
}

/// Which digit-like key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitKey {
    Digit(Digit),
    Point,
}

impl DigitKey {
    fn as_char(self) -> char {
        match self {
            Self::Digit(d) => d.as_char(),
            Self::Point => '.',
        }
    }
}

/// Reducer over [`CalculatorState`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one input to a copy of `state`.
    pub fn reduce(&self, state: &CalculatorState, input: Input) -> (CalculatorState, Outcome) {
        let mut next = state.clone();
        let outcome = self.apply(&mut next, input);
        (next, outcome)
    }

    /// Apply one input in place.
    pub fn apply(&self, state: &mut CalculatorState, input: Input) -> Outcome {
        let outcome = match input {
            Input::Digit(d) => self.input_digit(state, DigitKey::Digit(d)),
            Input::Point => self.input_digit(state, DigitKey::Point),
            Input::Operator(op) => self.set_operator(state, op),
            Input::Equals => self.calculate(state, true),
            Input::Clear => self.clear(state),
            Input::ToggleSign => self.toggle_sign(state),
            Input::Percent => self.percent(state),
            Input::Backspace => self.backspace(state),
        };

        debug!(
            ?input,
            ?outcome,
            current = %state.current_input,
            expression = %state.expression,
            "Reduced input"
        );
        outcome
    }

    pub fn input_digit(&self, state: &mut CalculatorState, key: DigitKey) -> Outcome {
        let is_point = key == DigitKey::Point;

        if state.just_calculated && !is_point {
            state.current_input = key.as_char().to_string();
            state.just_calculated = false;
            state.expression.clear();
        } else if state.awaiting_new_operand {
            state.current_input = if is_point {
                "0.".to_string()
            } else {
                key.as_char().to_string()
            };
            state.awaiting_new_operand = false;
        } else {
            if is_point && state.current_input.contains('.') {
                return Outcome::Unchanged;
            }
            if state.current_input == "0" && !is_point {
                state.current_input = key.as_char().to_string();
            } else {
                if state.current_input.chars().count() >= self.config.max_input_len {
                    return Outcome::Unchanged;
                }
                state.current_input.push(key.as_char());
            }
        }

        Outcome::Updated
    }

    /// Select an operator, first collapsing any pending computation so
    /// chains evaluate left to right.
    pub fn set_operator(&self, state: &mut CalculatorState, op: Operator) -> Outcome {
        if state.operator.is_some()
            && !state.awaiting_new_operand
            && self.calculate(state, false) == Outcome::DivideByZero
        {
            return Outcome::DivideByZero;
        }

        state.previous_input = state.current_input.clone();
        state.operator = Some(op);
        state.awaiting_new_operand = true;
        state.just_calculated = false;
        state.expression = format!("{} {}", state.previous_input, op.symbol());

        Outcome::Updated
    }

    /// Combine the captured operand with the current one.
    ///
    /// A non-final calculation only replaces the current operand; the
    /// operator, flags and preview are left for `set_operator` to overwrite.
    pub fn calculate(&self, state: &mut CalculatorState, is_final: bool) -> Outcome {
        let Some(op) = state.operator else {
            return Outcome::Unchanged;
        };
        if state.awaiting_new_operand {
            return Outcome::Unchanged;
        }

        let lhs = parse_operand(&state.previous_input);
        let rhs = parse_operand(&state.current_input);
        let value = match op.apply(lhs, rhs) {
            Ok(value) => value,
            Err(ArithmeticError::DivideByZero) => return Outcome::DivideByZero,
        };
        let result = format_number(round_significant(value, self.config.result_precision));

        if is_final {
            state.expression = format!(
                "{} {} {} =",
                state.previous_input,
                op.symbol(),
                state.current_input
            );
        }

        state.current_input = result;

        if is_final {
            state.operator = None;
            state.just_calculated = true;
            state.awaiting_new_operand = false;
        }

        Outcome::Updated
    }

    pub fn clear(&self, state: &mut CalculatorState) -> Outcome {
        *state = CalculatorState::default();
        Outcome::Updated
    }

    pub fn toggle_sign(&self, state: &mut CalculatorState) -> Outcome {
        if state.current_input == "0" {
            return Outcome::Unchanged;
        }

        state.current_input = match state.current_input.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{}", state.current_input),
        };
        Outcome::Updated
    }

    pub fn percent(&self, state: &mut CalculatorState) -> Outcome {
        let value = parse_operand(&state.current_input);
        if value.is_nan() {
            return Outcome::Unchanged;
        }

        state.current_input = format_number(value / 100.0);
        Outcome::Updated
    }

    /// Delete the last typed character. A finished result cannot be edited
    /// and resets to `0` instead.
    pub fn backspace(&self, state: &mut CalculatorState) -> Outcome {
        if state.just_calculated || state.current_input.chars().count() <= 1 {
            state.current_input = "0".to_string();
            return Outcome::Updated;
        }

        state.current_input.pop();
        if state.current_input.is_empty() || state.current_input == "-" {
            state.current_input = "0".to_string();
        }
        Outcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(n: u8) -> Input {
        Input::Digit(Digit::new(n).unwrap())
    }

    fn run(engine: &Engine, inputs: &[Input]) -> CalculatorState {
        let mut state = CalculatorState::new();
        for &input in inputs {
            engine.apply(&mut state, input);
        }
        state
    }

    fn with_current(current: &str) -> CalculatorState {
        CalculatorState {
            current_input: current.to_string(),
            ..CalculatorState::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = CalculatorState::new();
        assert_eq!(state.frame_text(), ("0", ""));
        assert_eq!(state.operator, None);
        assert!(!state.awaiting_new_operand);
        assert!(!state.just_calculated);
    }

    #[test]
    fn test_leading_zero_is_replaced() {
        let engine = Engine::default();
        let state = run(&engine, &[digit(0), digit(7)]);
        assert_eq!(state.current_input, "7");
    }

    #[test]
    fn test_single_decimal_point() {
        let engine = Engine::default();
        let mut state = CalculatorState::new();
        assert_eq!(engine.apply(&mut state, Input::Point), Outcome::Updated);
        engine.apply(&mut state, digit(5));
        assert_eq!(engine.apply(&mut state, Input::Point), Outcome::Unchanged);
        engine.apply(&mut state, digit(2));
        assert_eq!(state.current_input, "0.52");
    }

    #[test]
    fn test_no_two_decimal_points_in_any_sequence() {
        let engine = Engine::default();
        let keys = [Input::Point, digit(1), Input::Point, digit(2), digit(3)];
        for start in 0..keys.len() {
            let mut state = CalculatorState::new();
            for &input in keys.iter().cycle().skip(start).take(20) {
                engine.apply(&mut state, input);
                assert!(state.current_input.matches('.').count() <= 1);
                assert!(state.current_input.len() <= 14);
            }
        }
    }

    #[test]
    fn test_length_limit() {
        let engine = Engine::default();
        let mut state = with_current("1234567890123");
        assert_eq!(engine.apply(&mut state, digit(4)), Outcome::Updated);
        assert_eq!(state.current_input.len(), 14);
        assert_eq!(engine.apply(&mut state, digit(5)), Outcome::Unchanged);
        assert_eq!(state.current_input, "12345678901234");
    }

    #[test]
    fn test_addition() {
        let engine = Engine::default();
        let state = run(&engine, &[digit(2), Operator::Add.into(), digit(3), Input::Equals]);
        assert_eq!(state.current_input, "5");
        assert_eq!(state.expression, "2 + 3 =");
        assert_eq!(state.operator, None);
        assert!(state.just_calculated);
        assert!(!state.awaiting_new_operand);
    }

    #[test]
    fn test_calculate_from_captured_operands() {
        let engine = Engine::default();
        let mut state = CalculatorState {
            previous_input: "2".to_string(),
            current_input: "3".to_string(),
            operator: Some(Operator::Add),
            ..CalculatorState::default()
        };
        assert_eq!(engine.calculate(&mut state, true), Outcome::Updated);
        assert_eq!(state.current_input, "5");
    }

    #[test]
    fn test_set_operator_preview() {
        let engine = Engine::default();
        let state = run(&engine, &[digit(1), digit(2), Operator::Divide.into()]);
        assert_eq!(state.expression, "12 ÷");
        assert_eq!(state.previous_input, "12");
        assert!(state.awaiting_new_operand);
        assert_eq!(state.active_operator(), Some(Operator::Divide));
    }

    #[test]
    fn test_operator_highlight_lasts_until_result() {
        let engine = Engine::default();
        let mut state = run(&engine, &[digit(8), Operator::Divide.into(), digit(2)]);
        assert_eq!(state.active_operator(), Some(Operator::Divide));

        engine.apply(&mut state, Input::Equals);
        assert_eq!(state.active_operator(), None);
    }

    #[test]
    fn test_rounding_tie_goes_up() {
        let engine = Engine::default();
        let mut inputs = vec![digit(1)];
        inputs.extend([digit(0); 11]);
        inputs.extend([Operator::Add.into(), Input::Point, digit(5), Input::Equals]);

        let state = run(&engine, &inputs);
        assert_eq!(state.current_input, "100000000001");
    }

    #[test]
    fn test_chained_evaluation_is_left_to_right() {
        let engine = Engine::default();
        let state = run(
            &engine,
            &[
                digit(2),
                Operator::Add.into(),
                digit(3),
                Operator::Multiply.into(),
                digit(4),
                Input::Equals,
            ],
        );
        assert_eq!(state.current_input, "20");
        assert_eq!(state.expression, "5 × 4 =");
    }

    #[test]
    fn test_chained_addition() {
        let engine = Engine::default();
        let mut state = CalculatorState::new();
        for input in [digit(2), Operator::Add.into(), digit(3), Operator::Add.into()] {
            engine.apply(&mut state, input);
        }
        assert_eq!(state.current_input, "5");
        assert_eq!(state.expression, "5 +");

        engine.apply(&mut state, digit(4));
        engine.apply(&mut state, Input::Equals);
        assert_eq!(state.current_input, "9");
    }

    #[test]
    fn test_operator_change_does_not_evaluate() {
        let engine = Engine::default();
        let state = run(
            &engine,
            &[digit(6), Operator::Add.into(), Operator::Subtract.into()],
        );
        assert_eq!(state.current_input, "6");
        assert_eq!(state.operator, Some(Operator::Subtract));
        assert_eq!(state.expression, "6 −");
    }

    #[test]
    fn test_calculate_without_operand_is_noop() {
        let engine = Engine::default();
        let mut state = run(&engine, &[digit(4)]);
        assert_eq!(engine.apply(&mut state, Input::Equals), Outcome::Unchanged);

        let mut state = run(&engine, &[digit(4), Operator::Add.into()]);
        let before = state.clone();
        assert_eq!(engine.apply(&mut state, Input::Equals), Outcome::Unchanged);
        assert_eq!(state, before);
    }

    #[test]
    fn test_divide_by_zero_leaves_state() {
        let engine = Engine::default();
        let mut state = CalculatorState {
            previous_input: "8".to_string(),
            current_input: "0".to_string(),
            operator: Some(Operator::Divide),
            expression: "8 ÷".to_string(),
            ..CalculatorState::default()
        };
        let before = state.clone();
        assert_eq!(engine.apply(&mut state, Input::Equals), Outcome::DivideByZero);
        assert_eq!(state, before);
    }

    #[test]
    fn test_divide_by_zero_while_chaining() {
        let engine = Engine::default();
        let mut state = run(&engine, &[digit(8), Operator::Divide.into(), digit(0)]);
        let before = state.clone();
        assert_eq!(
            engine.apply(&mut state, Operator::Add.into()),
            Outcome::DivideByZero
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_floating_point_noise_is_rounded() {
        let engine = Engine::default();
        let state = run(
            &engine,
            &[
                Input::Point,
                digit(1),
                Operator::Add.into(),
                Input::Point,
                digit(2),
                Input::Equals,
            ],
        );
        assert_eq!(state.current_input, "0.3");
        assert_eq!(state.expression, "0.1 + 0.2 =");
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let engine = Engine::default();
        let mut state = run(&engine, &[digit(2), Operator::Add.into(), digit(3), Input::Equals]);
        engine.apply(&mut state, digit(7));
        assert_eq!(state.current_input, "7");
        assert_eq!(state.expression, "");
        assert!(!state.just_calculated);
    }

    #[test]
    fn test_point_after_result_extends_result() {
        let engine = Engine::default();
        let mut state = run(&engine, &[digit(2), Operator::Add.into(), digit(3), Input::Equals]);
        engine.apply(&mut state, Input::Point);
        assert_eq!(state.current_input, "5.");
        assert!(state.just_calculated);
    }

    #[test]
    fn test_point_after_operator() {
        let engine = Engine::default();
        let state = run(&engine, &[digit(9), Operator::Subtract.into(), Input::Point]);
        assert_eq!(state.current_input, "0.");
        assert!(!state.awaiting_new_operand);
    }

    #[test]
    fn test_toggle_sign_is_involution() {
        let engine = Engine::default();
        for current in ["5", "-5", "0.25", "0.", "123"] {
            let mut state = with_current(current);
            engine.toggle_sign(&mut state);
            assert_ne!(state.current_input, current);
            engine.toggle_sign(&mut state);
            assert_eq!(state.current_input, current);
        }
    }

    #[test]
    fn test_toggle_sign_on_zero_is_noop() {
        let engine = Engine::default();
        let mut state = CalculatorState::new();
        assert_eq!(engine.toggle_sign(&mut state), Outcome::Unchanged);
        assert_eq!(state, CalculatorState::new());
    }

    #[test]
    fn test_percent() {
        let engine = Engine::default();
        let mut state = with_current("50");
        engine.percent(&mut state);
        assert_eq!(state.current_input, "0.5");

        let mut state = with_current("-");
        assert_eq!(engine.percent(&mut state), Outcome::Unchanged);
    }

    #[test]
    fn test_backspace() {
        let engine = Engine::default();
        let mut state = with_current("12");
        engine.backspace(&mut state);
        assert_eq!(state.current_input, "1");
        engine.backspace(&mut state);
        assert_eq!(state.current_input, "0");

        let mut state = with_current("-5");
        engine.backspace(&mut state);
        assert_eq!(state.current_input, "0");
    }

    #[test]
    fn test_backspace_after_result_resets() {
        let engine = Engine::default();
        let mut state = run(
            &engine,
            &[digit(1), digit(2), Operator::Multiply.into(), digit(3), Input::Equals],
        );
        assert_eq!(state.current_input, "36");
        engine.backspace(&mut state);
        assert_eq!(state.current_input, "0");
    }

    #[test]
    fn test_clear_restores_initial_state() {
        let engine = Engine::default();
        let sequences: [&[Input]; 4] = [
            &[digit(3), Operator::Add.into()],
            &[digit(3), Operator::Add.into(), digit(4), Input::Equals],
            &[Input::Point, digit(5), Input::ToggleSign, Input::Percent],
            &[digit(8), Operator::Divide.into(), digit(0), Input::Equals],
        ];
        for inputs in sequences {
            let mut state = run(&engine, inputs);
            engine.apply(&mut state, Input::Clear);
            assert_eq!(state, CalculatorState::new());
        }
    }

    #[test]
    fn test_reduce_is_pure() {
        let engine = Engine::default();
        let state = CalculatorState::new();
        let (next, outcome) = engine.reduce(&state, digit(4));
        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(next.current_input, "4");
        assert_eq!(state, CalculatorState::new());
    }

    #[test]
    fn test_custom_length_limit() {
        let engine = Engine::new(EngineConfig {
            max_input_len: 3,
            ..EngineConfig::default()
        });
        let state = run(&engine, &[digit(1), digit(2), digit(3), digit(4)]);
        assert_eq!(state.current_input, "123");
    }
}
