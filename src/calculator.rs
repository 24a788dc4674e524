//! Four-function calculator behind the keypad panel.
//!
//! The page forwards each button label to [`Calculator::press`] and re-renders
//! whatever [`Calculator::display`] reports.

use std::str::FromStr;

use wasm_bindgen::prelude::wasm_bindgen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide if rhs == 0.0 => 0.0,
            Operator::Divide => lhs / rhs,
        }
    }
}

/// A keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Negate,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let key = match label {
            "." => Key::Decimal,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "*" => Key::Operator(Operator::Multiply),
            "/" => Key::Operator(Operator::Divide),
            "=" => Key::Equals,
            "C" => Key::Clear,
            "+/-" => Key::Negate,
            "%" => Key::Percent,
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(digit), None) if digit.is_ascii_digit() => Key::Digit(digit),
                    _ => return Err(UnknownKey(label.to_string())),
                }
            }
        };
        Ok(key)
    }
}

#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
    accumulator: f64,
    pending: Option<Operator>,
    awaiting_operand: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            accumulator: 0.0,
            pending: None,
            awaiting_operand: false,
        }
    }
}

#[wasm_bindgen]
impl Calculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current display text.
    pub fn display(&self) -> String {
        self.display.clone()
    }

    /// Feeds one button label; unknown labels are logged and ignored.
    pub fn press(&mut self, label: &str) {
        match label.parse::<Key>() {
            Ok(key) => self.apply(key),
            Err(err) => log::warn!("calculator: {err}"),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Calculator {
    pub fn apply(&mut self, key: Key) {
        match key {
            Key::Digit(digit) => self.push_digit(digit),
            Key::Decimal => self.push_decimal(),
            Key::Operator(op) => self.set_operator(op),
            Key::Equals => self.evaluate(),
            Key::Clear => self.clear(),
            Key::Negate => self.negate(),
            Key::Percent => self.percent(),
        }
    }

    fn value(&self) -> f64 {
        self.display.parse().unwrap_or(0.0)
    }

    fn push_digit(&mut self, digit: char) {
        if self.awaiting_operand || self.display == "0" {
            self.display = digit.to_string();
            self.awaiting_operand = false;
        } else {
            self.display.push(digit);
        }
    }

    fn push_decimal(&mut self) {
        if self.awaiting_operand {
            self.display = "0.".to_string();
            self.awaiting_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    fn set_operator(&mut self, op: Operator) {
        // Consecutive operators: the last one pressed wins.
        if self.awaiting_operand && self.pending.is_some() {
            self.pending = Some(op);
            return;
        }
        if self.pending.is_some() {
            self.evaluate();
        }
        self.accumulator = self.value();
        self.pending = Some(op);
        self.awaiting_operand = true;
    }

    fn evaluate(&mut self) {
        let Some(op) = self.pending.take() else {
            return;
        };
        let result = op.apply(self.accumulator, self.value());
        self.display = result.to_string();
        self.accumulator = result;
        self.awaiting_operand = true;
    }

    fn negate(&mut self) {
        let value = self.value();
        if value != 0.0 {
            self.display = (-value).to_string();
        }
    }

    fn percent(&mut self) {
        self.display = (self.value() / 100.0).to_string();
        self.awaiting_operand = true;
    }
}
