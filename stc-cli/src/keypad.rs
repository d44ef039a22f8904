//! Four-function calculator keypad.
//!
//! The keypad is a value-type state machine: [`KeypadState::press`] takes a
//! key and returns the next state, leaving the current one untouched. A
//! failed press (division by zero, overflow) therefore costs nothing; the
//! caller keeps the state it already had.
//!
//! Operators chain left to right with no precedence, the way a desk
//! calculator does:
//!
//! ```
//! use stc_cli::keypad::{KeypadState, parse_keys};
//!
//! let keys = parse_keys(["2+3*4="]).unwrap();
//! let state = KeypadState::default().press_all(&keys).unwrap();
//!
//! assert_eq!(state.display(), "20");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

/// Errors raised by the keypad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeypadError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is out of range")]
    Overflow,

    #[error("display '{0}' is not a number")]
    MalformedOperand(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn apply(
        self,
        left: Decimal,
        right: Decimal,
    ) -> Result<Decimal, KeypadError> {
        let result = match self {
            Operator::Add => left.checked_add(right),
            Operator::Subtract => left.checked_sub(right),
            Operator::Multiply => left.checked_mul(right),
            Operator::Divide if right.is_zero() => return Err(KeypadError::DivisionByZero),
            Operator::Divide => left.checked_div(right),
        };
        result.ok_or(KeypadError::Overflow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Operator(Operator),
    Equals,
    Clear,
    Negate,
    Backspace,
}

impl FromStr for Key {
    type Err = KeypadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "." => Key::Point,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "*" | "x" => Key::Operator(Operator::Multiply),
            "/" => Key::Operator(Operator::Divide),
            "=" => Key::Equals,
            "C" | "c" => Key::Clear,
            "±" | "neg" => Key::Negate,
            "<" | "back" => Key::Backspace,
            _ => match s.as_bytes() {
                [digit @ b'0'..=b'9'] => Key::Digit(digit - b'0'),
                _ => return Err(KeypadError::UnknownKey(s.to_string())),
            },
        };
        Ok(key)
    }
}

/// Turns command-line tokens into keys.
///
/// A token that names a key (`neg`, `back`, `±`, ...) is one key; any other
/// token is read one character per key, so `"12+3="` is five keys.
pub fn parse_keys<I, S>(tokens: I) -> Result<Vec<Key>, KeypadError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keys = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        match token.parse::<Key>() {
            Ok(key) => keys.push(key),
            Err(_) => {
                for ch in token.chars() {
                    keys.push(ch.encode_utf8(&mut [0; 4]).parse()?);
                }
            }
        }
    }
    Ok(keys)
}

/// Current keypad state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadState {
    display: String,
    stored: Option<Decimal>,
    pending: Option<Operator>,
    last_was_operator: bool,
}

impl Default for KeypadState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            stored: None,
            pending: None,
            last_was_operator: false,
        }
    }
}

impl KeypadState {
    /// Text currently shown on the display.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn pending(&self) -> Option<Operator> {
        self.pending
    }

    /// Returns the state after pressing `key`.
    ///
    /// # Errors
    ///
    /// [`KeypadError::DivisionByZero`] or [`KeypadError::Overflow`] when an
    /// operation cannot be evaluated.
    pub fn press(
        &self,
        key: Key,
    ) -> Result<Self, KeypadError> {
        let mut next = self.clone();

        match key {
            Key::Digit(digit) => next.push_digit(digit),
            Key::Point => next.push_point(),
            Key::Operator(op) => next.apply_operator(op)?,
            Key::Equals => next.evaluate()?,
            Key::Clear => next = Self::default(),
            Key::Negate => next.negate(),
            Key::Backspace => next.backspace(),
        }

        trace!(?key, display = %next.display, "key pressed");
        Ok(next)
    }

    /// Presses each key in turn, stopping at the first error.
    pub fn press_all(
        &self,
        keys: &[Key],
    ) -> Result<Self, KeypadError> {
        keys.iter().try_fold(self.clone(), |state, key| state.press(*key))
    }

    fn operand(&self) -> Result<Decimal, KeypadError> {
        self.display
            .trim_end_matches('.')
            .parse()
            .map_err(|_| KeypadError::MalformedOperand(self.display.clone()))
    }

    fn show(
        &mut self,
        value: Decimal,
    ) {
        self.display = value.normalize().to_string();
    }

    fn push_digit(
        &mut self,
        digit: u8,
    ) {
        let ch = char::from(b'0' + digit);
        if self.last_was_operator {
            self.display = ch.to_string();
        } else if self.display == "0" {
            self.display = ch.to_string();
        } else if self.display == "-0" {
            self.display = format!("-{ch}");
        } else {
            self.display.push(ch);
        }
        self.last_was_operator = false;
    }

    fn push_point(&mut self) {
        if self.last_was_operator {
            self.display = "0.".to_string();
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
        self.last_was_operator = false;
    }

    fn apply_operator(
        &mut self,
        op: Operator,
    ) -> Result<(), KeypadError> {
        if self.last_was_operator && self.pending.is_some() {
            self.pending = Some(op);
            return Ok(());
        }

        let current = self.operand()?;
        let left = match (self.stored, self.pending) {
            (Some(stored), Some(pending)) => pending.apply(stored, current)?,
            _ => current,
        };

        self.show(left);
        self.stored = Some(left);
        self.pending = Some(op);
        self.last_was_operator = true;
        Ok(())
    }

    fn evaluate(&mut self) -> Result<(), KeypadError> {
        if let (Some(stored), Some(pending)) = (self.stored, self.pending) {
            let result = pending.apply(stored, self.operand()?)?;
            self.show(result);
        }
        self.stored = None;
        self.pending = None;
        self.last_was_operator = true;
        Ok(())
    }

    fn negate(&mut self) {
        if self.last_was_operator && self.pending.is_some() {
            // Starts the next operand as a negative number.
            self.display = "-0".to_string();
            self.last_was_operator = false;
        } else if let Some(positive) = self.display.strip_prefix('-') {
            self.display = positive.to_string();
        } else {
            self.display.insert(0, '-');
        }
    }

    fn backspace(&mut self) {
        if self.last_was_operator {
            return;
        }
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = "0".to_string();
        }
    }
}

impl fmt::Display for KeypadState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.display)
    }
}
