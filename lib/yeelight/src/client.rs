use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use xiaomi::{Device, DeviceInfo, Result};

#[cfg(test)]
use mockall::automock;

use crate::Command;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeviceClient {
    async fn execute(&mut self, command: Command) -> Result<Value>;
    async fn info(&mut self) -> Result<DeviceInfo>;
}

#[async_trait]
impl DeviceClient for Device {
    async fn execute(&mut self, command: Command) -> Result<Value> {
        let params = serde_json::to_value(&command)?;
        debug!("{} {} {}", self.ip(), command.name(), params);

        self.send(command.name(), params).await
    }

    async fn info(&mut self) -> Result<DeviceInfo> {
        Device::info(self).await
    }
}
