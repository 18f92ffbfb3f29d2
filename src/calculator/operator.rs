//! Binary operators supported by the keypad.

use serde::Serialize;
use thiserror::Error;

/// Failure while applying an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivideByZero,
}

/// A pending binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators in keypad order.
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Symbol shown in the expression preview.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// The ASCII key that selects this operator.
    pub fn key(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Look up an operator by key or display symbol.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Subtract),
            '*' | '×' | 'x' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply the operator to two operands.
    ///
    /// Dividing by zero (either sign) is the only failure; every other
    /// combination, including NaN and infinite operands, yields a value.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Add => Ok(lhs + rhs),
            Self::Subtract => Ok(lhs - rhs),
            Self::Multiply => Ok(lhs * rhs),
            Self::Divide => {
                if rhs == 0.0 {
                    Err(ArithmeticError::DivideByZero)
                } else {
                    Ok(lhs / rhs)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(Operator::Add.apply(2.0, 3.0), Ok(5.0));
        assert_eq!(Operator::Subtract.apply(2.0, 3.0), Ok(-1.0));
        assert_eq!(Operator::Multiply.apply(4.0, 2.5), Ok(10.0));
        assert_eq!(Operator::Divide.apply(9.0, 3.0), Ok(3.0));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            Operator::Divide.apply(8.0, 0.0),
            Err(ArithmeticError::DivideByZero)
        );
        assert_eq!(
            Operator::Divide.apply(8.0, -0.0),
            Err(ArithmeticError::DivideByZero)
        );
    }

    #[test]
    fn test_key_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_char(op.key()), Some(op));
        }
        assert_eq!(Operator::from_char('÷'), Some(Operator::Divide));
        assert_eq!(Operator::from_char('%'), None);
    }
}
