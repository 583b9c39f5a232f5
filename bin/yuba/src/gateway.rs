use std::collections::BTreeMap;
use std::fmt::Debug;
use std::net::Ipv4Addr;

use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use yeelight::{ClimateAdapter, DeviceClient, LightAdapter, Registry};

use crate::topic::{attributes_topic, state_topic, Platform};
use crate::{Action, ClimateAction, Error, LightAction, Storage};

#[derive(Debug, PartialEq)]
pub struct Publication {
    pub topic: String,
    pub payload: Vec<u8>,
}

#[derive(Serialize)]
struct Attributes<'a> {
    name: &'a str,
    unique_id: String,
    #[serde(flatten)]
    device: BTreeMap<&'static str, String>,
    #[serde(flatten)]
    features: Value,
}

/// Connects registered adapters with MQTT topics.
pub struct Gateway<C> {
    climates: Registry<Mutex<ClimateAdapter<C>>>,
    lights: Registry<Mutex<LightAdapter<C>>>,
    storage: Mutex<Storage>,
}

impl<C: DeviceClient> Gateway<C> {
    pub fn new(
        climates: Registry<Mutex<ClimateAdapter<C>>>,
        lights: Registry<Mutex<LightAdapter<C>>>,
    ) -> Self {
        Self {
            climates,
            lights,
            storage: Mutex::new(Storage::new()),
        }
    }

    /// Describes every adapter: name, unique id, device details and supported
    /// features. These don't change after setup.
    pub async fn attributes(&self) -> Vec<Publication> {
        let mut publications = vec![];

        for host in self.climates.hosts() {
            let Some(climate) = self.climates.get(host) else {
                continue;
            };
            let climate = climate.lock().await;

            let attributes = Attributes {
                name: climate.name(),
                unique_id: climate.unique_id(),
                device: climate.state_attributes(),
                features: json!({
                    "hvac_modes": climate.hvac_modes(),
                    "fan_modes": climate.fan_modes(),
                }),
            };

            let topic = attributes_topic(*host, Platform::Climate);
            publications.extend(self.publication(topic, &attributes).await);
        }

        for host in self.lights.hosts() {
            let Some(light) = self.lights.get(host) else {
                continue;
            };
            let light = light.lock().await;

            let attributes = Attributes {
                name: light.name(),
                unique_id: light.unique_id(),
                device: light.state_attributes(),
                features: json!({ "supports_brightness": light.supports_brightness() }),
            };

            let topic = attributes_topic(*host, Platform::Light);
            publications.extend(self.publication(topic, &attributes).await);
        }

        publications
    }

    /// Refreshes every adapter and returns the states that changed since they
    /// were last published.
    pub async fn refresh(&self) -> Vec<Publication> {
        let mut publications = vec![];

        for host in self.climates.hosts() {
            if let Some(publication) = self.refresh_platform(*host, Platform::Climate).await {
                publications.push(publication);
            }
        }

        for host in self.lights.hosts() {
            if let Some(publication) = self.refresh_platform(*host, Platform::Light).await {
                publications.push(publication);
            }
        }

        publications
    }

    async fn refresh_platform(&self, host: Ipv4Addr, platform: Platform) -> Option<Publication> {
        let topic = state_topic(host, platform);

        match platform {
            Platform::Climate => {
                let mut climate = self.climates.get(&host)?.lock().await;
                climate.refresh().await;
                self.publication(topic, climate.state()).await
            }
            Platform::Light => {
                let mut light = self.lights.get(&host)?.lock().await;
                light.refresh().await;
                self.publication(topic, light.state()).await
            }
        }
    }

    /// Applies `action` and returns the updated state if it changed.
    pub async fn perform(
        &self,
        host: Ipv4Addr,
        action: Action,
    ) -> Result<Option<Publication>, Error> {
        info!("{} wants {:?}", host, action);

        match action {
            Action::Climate(action) => {
                let mut climate = self
                    .climates
                    .get(&host)
                    .ok_or(Error::UnknownDevice(host))?
                    .lock()
                    .await;

                let success = match action {
                    ClimateAction::SetMode(mode) => climate.set_hvac_mode(mode).await,
                    ClimateAction::SetFanSpeed(fan_speed) => climate.set_fan_mode(fan_speed).await,
                    ClimateAction::SetPower(true) => climate.turn_on().await,
                    ClimateAction::SetPower(false) => climate.turn_off().await,
                };

                log_result(host, &action, success);

                let topic = state_topic(host, Platform::Climate);
                Ok(self.publication(topic, climate.state()).await)
            }
            Action::Light(action) => {
                let mut light = self
                    .lights
                    .get(&host)
                    .ok_or(Error::UnknownDevice(host))?
                    .lock()
                    .await;

                let success = match action {
                    LightAction::SetPower(true) => light.turn_on().await,
                    LightAction::SetPower(false) => light.turn_off().await,
                    LightAction::SetBrightness(brightness) => {
                        light.set_brightness(brightness).await
                    }
                };

                log_result(host, &action, success);

                let topic = state_topic(host, Platform::Light);
                Ok(self.publication(topic, light.state()).await)
            }
        }
    }

    async fn publication<S: Serialize>(&self, topic: String, payload: &S) -> Option<Publication> {
        let payload = match serde_json::to_vec(payload) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("unable to serialize {}: {}", topic, err);
                return None;
            }
        };

        let mut storage = self.storage.lock().await;

        if storage.apply_state(&topic, &payload) {
            Some(Publication { topic, payload })
        } else {
            None
        }
    }
}

fn log_result<A: Debug>(host: Ipv4Addr, action: &A, success: bool) {
    if success {
        info!("ok {} {:?}", host, action);
    } else {
        warn!("failed {} {:?}", host, action);
    }
}
