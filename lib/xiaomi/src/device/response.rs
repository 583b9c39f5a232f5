use std::fmt;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, PartialEq)]
pub enum Response {
    Ok { id: u32, result: Value },
    Err { id: u32, error: DeviceError },
}

impl Response {
    pub fn id(&self) -> u32 {
        match self {
            Response::Ok { id, .. } | Response::Err { id, .. } => *id,
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    id: u32,
    result: Option<Value>,
    error: Option<DeviceError>,
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let RawResponse { id, result, error } = RawResponse::deserialize(deserializer)?;

        match (result, error) {
            (Some(result), None) => Ok(Response::Ok { id, result }),
            (None, Some(error)) => Ok(Response::Err { id, error }),
            (None, None) => Err(D::Error::missing_field("result")),
            (Some(_), Some(_)) => Err(D::Error::custom("got both result and error")),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DeviceError {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for DeviceError {}
