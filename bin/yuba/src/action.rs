use std::net::Ipv4Addr;

use serde::de::DeserializeOwned;
use yeelight::{ClimateMode, FanSpeed};

use crate::topic::{Platform, PREFIX};
use crate::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Climate(ClimateAction),
    Light(LightAction),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClimateAction {
    SetMode(ClimateMode),
    SetFanSpeed(FanSpeed),
    SetPower(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub enum LightAction {
    SetPower(bool),
    SetBrightness(u8),
}

impl Action {
    /// Parses `yuba/<host>/<platform>/set/<feature>` with a JSON payload.
    pub fn parse(topic: &str, payload: &[u8]) -> Result<(Ipv4Addr, Action), Error> {
        let unknown_topic = || Error::UnknownTopic(topic.to_string());

        let parts: Vec<&str> = topic.split('/').collect();
        let [prefix, host, platform, "set", feature] = parts[..] else {
            return Err(unknown_topic());
        };

        if prefix != PREFIX {
            return Err(unknown_topic());
        }

        let host: Ipv4Addr = host.parse()?;
        let platform: Platform = platform.parse().map_err(|_| unknown_topic())?;

        let action: Action = match (platform, feature) {
            (Platform::Climate, "mode") => ClimateAction::SetMode(json(payload)?).into(),
            (Platform::Climate, "fan_speed") => ClimateAction::SetFanSpeed(json(payload)?).into(),
            (Platform::Climate, "power") => ClimateAction::SetPower(json(payload)?).into(),
            (Platform::Light, "power") => LightAction::SetPower(json(payload)?).into(),
            (Platform::Light, "brightness") => LightAction::SetBrightness(json(payload)?).into(),
            _ => return Err(unknown_topic()),
        };

        Ok((host, action))
    }

    pub fn platform(&self) -> Platform {
        match self {
            Action::Climate(_) => Platform::Climate,
            Action::Light(_) => Platform::Light,
        }
    }
}

impl From<ClimateAction> for Action {
    fn from(action: ClimateAction) -> Self {
        Action::Climate(action)
    }
}

impl From<LightAction> for Action {
    fn from(action: LightAction) -> Self {
        Action::Light(action)
    }
}

fn json<T: DeserializeOwned>(payload: &[u8]) -> Result<T, Error> {
    Ok(serde_json::from_slice(payload)?)
}
