use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// `[prefix][integer-or-decimal][suffix]`, e.g. `₹47Cr+`, `4.9/5`, `99.99%`
static DISPLAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\D*)(\d+(?:\.(\d+))?)(.*)$").expect("display pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CounterParseError {
    #[error("No number found in display value {input:?}")]
    NoNumber { input: String },
    #[error("Invalid numeric literal {literal:?}")]
    InvalidNumber { literal: String },
}

/// A stat display split into its animated number and the text around it
#[derive(Debug, Clone, PartialEq)]
pub struct CounterValue {
    pub prefix: String,
    pub value: f64,
    /// Digits after the decimal point in the original literal
    pub decimals: usize,
    pub suffix: String,
    literal: String,
}

impl CounterValue {
    pub fn parse(input: &str) -> Result<Self, CounterParseError> {
        let captures = DISPLAY_PATTERN
            .captures(input)
            .ok_or_else(|| CounterParseError::NoNumber {
                input: input.to_string(),
            })?;

        let literal = captures[2].to_string();
        let value = literal
            .parse::<f64>()
            .map_err(|_| CounterParseError::InvalidNumber {
                literal: literal.clone(),
            })?;

        Ok(Self {
            prefix: captures[1].to_string(),
            value,
            decimals: captures.get(3).map_or(0, |m| m.as_str().len()),
            suffix: captures[4].to_string(),
            literal,
        })
    }

    pub fn is_decimal(&self) -> bool {
        self.decimals > 0
    }

    /// Render an intermediate value with the original prefix, suffix and precision.
    /// Integers are floored so the count never overshoots.
    pub fn render(&self, current: f64) -> String {
        let number = if self.is_decimal() {
            format!("{:.*}", self.decimals, current)
        } else {
            format!("{:.0}", current.floor())
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }

    /// The original display string, byte for byte
    pub fn render_final(&self) -> String {
        format!("{}{}{}", self.prefix, self.literal, self.suffix)
    }
}
