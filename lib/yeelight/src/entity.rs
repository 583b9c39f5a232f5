use std::collections::BTreeMap;

use log::{error, info};
use serde_json::Value;
use xiaomi::DeviceInfo;

use crate::{Command, DeviceClient, Result};

pub const DEFAULT_NAME: &str = "Xiaomi Miio Device";

const SUCCESS: &str = "ok";

#[derive(Clone, Debug, PartialEq)]
pub struct AdapterConfig {
    pub name: String,
    /// When disabled, the poll right after a successful command is skipped,
    /// since the device reports the new state with a delay.
    pub update_instant: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            update_instant: true,
        }
    }
}

/// Polling and command dispatch shared by the climate and light adapters.
pub(crate) struct Entity<C> {
    client: C,
    info: DeviceInfo,
    config: AdapterConfig,
    skip_update: bool,
}

impl<C: DeviceClient> Entity<C> {
    pub async fn setup(mut client: C, config: AdapterConfig) -> Result<Self> {
        let info = client.info().await?;

        info!(
            "{} {} {} detected",
            info.model, info.firmware_version, info.hardware_version
        );

        Ok(Self::new(client, config, info))
    }

    pub fn new(client: C, config: AdapterConfig, info: DeviceInfo) -> Self {
        Self {
            client,
            info,
            config,
            skip_update: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.info.model, self.info.mac_address)
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn state_attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("model", self.info.model.clone()),
            ("firmware_version", self.info.firmware_version.clone()),
            ("hardware_version", self.info.hardware_version.clone()),
        ])
    }

    /// Returns true once after a successful command when instant updates are
    /// disabled.
    pub fn take_skip_update(&mut self) -> bool {
        if !self.config.update_instant && self.skip_update {
            self.skip_update = false;
            true
        } else {
            false
        }
    }

    pub async fn fetch(&mut self, command: Command) -> xiaomi::Result<Value> {
        self.client.execute(command).await
    }

    /// Runs a command and reports whether the device acknowledged it with
    /// `["ok"]`. Errors are logged and never returned.
    pub async fn try_command(&mut self, mask_error: &str, command: Command) -> bool {
        match self.client.execute(command).await {
            Ok(result) => {
                info!("Response received from miio device: {}", result);

                let success = is_success(&result);
                if success {
                    self.skip_update = true;
                }

                success
            }
            Err(err) => {
                error!("{mask_error}: {err}");
                false
            }
        }
    }
}

fn is_success(result: &Value) -> bool {
    matches!(result.as_array().map(Vec::as_slice), Some([value]) if value == SUCCESS)
}
