use std::fmt;

use serde::Deserialize;

/// A `get_prop` value. The firmware reports some numeric properties as
/// strings and others as numbers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Property {
    Text(String),
    Number(u64),
}

impl Property {
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Property::Text(text) => text.trim().parse().ok(),
            Property::Number(number) => Some(*number),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Text(text) => f.write_str(text),
            Property::Number(number) => write!(f, "{number}"),
        }
    }
}
