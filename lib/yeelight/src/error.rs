use std::fmt;

#[derive(Debug)]
pub enum Error {
    NotReady(xiaomi::Error),
}

impl From<xiaomi::Error> for Error {
    fn from(err: xiaomi::Error) -> Self {
        Self::NotReady(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady(err) => write!(f, "device is not ready: {err}"),
        }
    }
}

impl std::error::Error for Error {}
