//! Contamination rate control surface

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected control input. The prompt reports it and asks again.
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("contamination {0} is outside [{min}, {max}]", min = Contamination::MIN, max = Contamination::MAX)]
    OutOfRange(f64),
}

/// Assumed outlier fraction, bounded to `[MIN, MAX]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Contamination(f64);

impl Contamination {
    pub const MIN: f64 = 0.01;
    pub const MAX: f64 = 0.50;
    pub const DEFAULT: f64 = 0.10;

    pub fn new(value: f64) -> Result<Self, ControlError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ControlError::OutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Contamination {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Contamination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Contamination {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| ControlError::NotANumber(s.trim().to_string()))?;
        Self::new(value)
    }
}

/// One parsed line of user input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Refit and render at the given contamination
    Run(Contamination),
    /// Leave the session
    Quit,
}

impl Command {
    /// Parse a prompt line. An empty line selects `default`.
    pub fn parse(line: &str, default: Contamination) -> Result<Self, ControlError> {
        match line.trim() {
            "" => Ok(Command::Run(default)),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => other.parse().map(Command::Run),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Contamination::new(0.01).is_ok());
        assert!(Contamination::new(0.50).is_ok());
        assert_eq!(
            Contamination::new(0.005),
            Err(ControlError::OutOfRange(0.005))
        );
        assert_eq!(Contamination::new(0.6), Err(ControlError::OutOfRange(0.6)));
        assert_eq!(Contamination::default().value(), 0.10);
    }

    #[test]
    fn test_parse_command() {
        let default = Contamination::default();
        assert_eq!(Command::parse("", default), Ok(Command::Run(default)));
        assert_eq!(Command::parse("  q ", default), Ok(Command::Quit));
        assert_eq!(
            Command::parse("0.25", default),
            Ok(Command::Run(Contamination::new(0.25).unwrap()))
        );
        assert_eq!(
            Command::parse("lots", default),
            Err(ControlError::NotANumber("lots".to_string()))
        );
        assert!(matches!(
            Command::parse("0.9", default),
            Err(ControlError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Contamination::new(0.1).unwrap().to_string(), "0.10");
    }
}
