use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug)]
pub enum Error {
    MissingVariable(&'static str),
    InvalidHost(std::net::AddrParseError),
    InvalidToken(xiaomi::InvalidToken),
    InvalidFlag(&'static str, String),
    UnknownTopic(String),
    UnknownDevice(Ipv4Addr),
    Json(serde_json::Error),
}

impl From<std::net::AddrParseError> for Error {
    fn from(err: std::net::AddrParseError) -> Self {
        Self::InvalidHost(err)
    }
}

impl From<xiaomi::InvalidToken> for Error {
    fn from(err: xiaomi::InvalidToken) -> Self {
        Self::InvalidToken(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVariable(name) => write!(f, "set ENV variable {name}"),
            Self::InvalidHost(err) => write!(f, "invalid host: {err}"),
            Self::InvalidToken(err) => write!(f, "invalid token: {err}"),
            Self::InvalidFlag(name, value) => write!(f, "invalid {name} value {value:?}"),
            Self::UnknownTopic(topic) => write!(f, "unknown topic {topic}"),
            Self::UnknownDevice(host) => write!(f, "no device registered for {host}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
