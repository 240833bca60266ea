//! Movie runtime in minutes.
//!
//! Stored as a plain `integer` column; exchanged in JSON as `"<n> mins"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid runtime format: expected \"<minutes> mins\", got {0:?}")]
pub struct RuntimeFormatError(String);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    sqlx::Type,
    Serialize,
    Deserialize,
)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl FromStr for Runtime {
    type Err = RuntimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuntimeFormatError(s.to_string());

        let (minutes, unit) = s.split_once(' ').ok_or_else(invalid)?;
        if unit != "mins" {
            return Err(invalid());
        }
        minutes.parse::<i32>().map(Runtime).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Runtime {
    type Error = RuntimeFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Runtime> for String {
    fn from(runtime: Runtime) -> Self {
        runtime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_unit() {
        assert_eq!(
            serde_json::to_value(Runtime(102)).unwrap(),
            serde_json::json!("102 mins")
        );
    }

    #[test]
    fn parses_minutes_with_unit() {
        let runtime: Runtime = serde_json::from_str("\"107 mins\"").unwrap();
        assert_eq!(runtime.minutes(), 107);
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["107", "107 minutes", "mins", "107  mins", "abc mins", ""] {
            assert_eq!(bad.parse::<Runtime>(), Err(RuntimeFormatError(bad.to_string())));
        }
        assert!(serde_json::from_str::<Runtime>("107").is_err());
    }

    #[test]
    fn zero_detection() {
        assert!(Runtime::default().is_zero());
        assert!(!Runtime(1).is_zero());
    }
}
