use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{
    de::{value, IntoDeserializer},
    Deserialize, Serialize,
};

pub const PREFIX: &str = "yuba";

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Climate,
    Light,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize(f)
    }
}

impl FromStr for Platform {
    type Err = value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

pub fn state_topic(host: Ipv4Addr, platform: Platform) -> String {
    format!("{PREFIX}/{host}/{platform}/state")
}

pub fn attributes_topic(host: Ipv4Addr, platform: Platform) -> String {
    format!("{PREFIX}/{host}/{platform}/attributes")
}

pub fn action_filters() -> [String; 2] {
    [
        format!("{PREFIX}/+/{}/set/+", Platform::Climate),
        format!("{PREFIX}/+/{}/set/+", Platform::Light),
    ]
}
