mod device;
mod hello;
mod message;

mod error;
pub use error::Error;

pub use crypto::{parse_token, InvalidToken, Token};
pub use device::{Device, DeviceError, DeviceInfo};

pub type Result<T> = std::result::Result<T, Error>;
