use std::collections::BTreeMap;

use log::{debug, error};
use serde::Serialize;
use serde_json::Value;
use xiaomi::DeviceInfo;

use crate::entity::Entity;
use crate::property::Property;
use crate::{AdapterConfig, Command, DeviceClient, Result};

const PROPERTIES: &[&str] = &["power", "bright"];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LightState {
    pub is_on: bool,
    pub brightness: u8,
    pub available: bool,
}

impl LightState {
    fn decode(result: Value) -> serde_json::Result<LightState> {
        use serde::de::Error;

        let (power, bright): (String, Property) = serde_json::from_value(result)?;

        let percent = bright
            .as_number()
            .ok_or_else(|| serde_json::Error::custom(format!("invalid bright {bright}")))?;

        Ok(LightState {
            is_on: power == "on",
            brightness: brightness_from_percent(percent.min(100) as u8),
            available: true,
        })
    }
}

/// Scales a 0-100 device percentage to 0-255, rounding up.
pub fn brightness_from_percent(percent: u8) -> u8 {
    let percent = percent.min(100) as u16;
    ((255 * percent + 99) / 100) as u8
}

/// Scales 0-255 brightness to the 1-100 percentage `set_bright` accepts.
/// Anything below 1% is clamped to 1%; `LightAdapter::set_brightness` turns
/// the light off for zero instead.
pub fn percent_from_brightness(brightness: u8) -> u8 {
    let percent = (brightness as u16 * 100 + 127) / 255;
    percent.clamp(1, 100) as u8
}

/// Integrated light of a Yeelight Yuba.
pub struct LightAdapter<C> {
    entity: Entity<C>,
    state: LightState,
}

impl<C: DeviceClient> LightAdapter<C> {
    pub async fn setup(client: C, config: AdapterConfig) -> Result<Self> {
        let entity = Entity::setup(client, config).await?;

        Ok(Self {
            entity,
            state: LightState::default(),
        })
    }

    pub fn new(client: C, config: AdapterConfig, info: DeviceInfo) -> Self {
        Self {
            entity: Entity::new(client, config, info),
            state: LightState::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn unique_id(&self) -> String {
        self.entity.unique_id()
    }

    pub fn info(&self) -> &DeviceInfo {
        self.entity.info()
    }

    pub fn state_attributes(&self) -> BTreeMap<&'static str, String> {
        self.entity.state_attributes()
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn available(&self) -> bool {
        self.state.available
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on
    }

    pub fn brightness(&self) -> u8 {
        self.state.brightness
    }

    pub fn supports_brightness(&self) -> bool {
        true
    }

    pub async fn refresh(&mut self) {
        // On state change the device doesn't provide the new state immediately.
        if self.entity.take_skip_update() {
            debug!("skipping light update");
            return;
        }

        let result = match self.entity.fetch(Command::GetProperties(PROPERTIES)).await {
            Ok(result) => result,
            Err(err) => {
                self.state.available = false;
                error!("Got exception while fetching the state: {}", err);
                return;
            }
        };

        match LightState::decode(result) {
            Ok(state) => self.state = state,
            Err(err) => {
                self.state.available = false;
                error!("Got malformed state: {}", err);
            }
        }
    }

    pub async fn turn_on(&mut self) -> bool {
        self.set_power(true, "Turning the miio device on failed.").await
    }

    pub async fn turn_off(&mut self) -> bool {
        self.set_power(false, "Turning the miio device off failed.").await
    }

    async fn set_power(&mut self, is_on: bool, mask_error: &str) -> bool {
        if self
            .entity
            .try_command(mask_error, Command::SetPower(is_on))
            .await
        {
            self.state.is_on = is_on;
            true
        } else {
            false
        }
    }

    /// Zero brightness turns the light off instead of dimming it.
    pub async fn set_brightness(&mut self, brightness: u8) -> bool {
        if brightness == 0 {
            return self.turn_off().await;
        }

        let percent = percent_from_brightness(brightness);

        if self
            .entity
            .try_command(
                "Setting the brightness of the miio device failed.",
                Command::SetBright(percent),
            )
            .await
        {
            self.state.brightness = brightness_from_percent(percent);
            true
        } else {
            false
        }
    }
}
