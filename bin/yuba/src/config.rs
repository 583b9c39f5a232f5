use std::net::Ipv4Addr;

use xiaomi::{parse_token, Token};
use yeelight::{AdapterConfig, DEFAULT_NAME};

use crate::Error;

const HOST: &str = "YUBA_HOST";
const TOKEN: &str = "YUBA_TOKEN";
const NAME: &str = "YUBA_NAME";
const UPDATE_INSTANT: &str = "YUBA_UPDATE_INSTANT";
const MQTT_ADDRESS: &str = "MQTT_ADDRESS";

#[derive(Debug)]
pub struct Config {
    pub host: Ipv4Addr,
    pub token: Token<16>,
    pub name: String,
    pub update_instant: bool,
    pub mqtt_address: String,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let required = |name: &'static str| var(name).ok_or(Error::MissingVariable(name));

        let host = required(HOST)?.parse()?;
        let token = parse_token::<16>(&required(TOKEN)?)?;
        let name = var(NAME).unwrap_or_else(|| DEFAULT_NAME.to_string());

        let update_instant = match var(UPDATE_INSTANT) {
            Some(value) => parse_flag(&value).ok_or(Error::InvalidFlag(UPDATE_INSTANT, value))?,
            None => true,
        };

        let mqtt_address = required(MQTT_ADDRESS)?;

        Ok(Config {
            host,
            token,
            name,
            update_instant,
            mqtt_address,
        })
    }

    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            name: self.name.clone(),
            update_instant: self.update_instant,
        }
    }

    /// First 5 hex chars of the token, enough to tell tokens apart in logs.
    pub fn token_hint(&self) -> String {
        let hex: String = self.token[..3].iter().map(|b| format!("{b:02x}")).collect();
        hex[..5].to_string()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enable" => Some(true),
        "0" | "false" | "no" | "off" | "disable" => Some(false),
        _ => None,
    }
}
