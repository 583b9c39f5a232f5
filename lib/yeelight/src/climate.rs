mod fan_speed;
pub use fan_speed::{decode_fan_speed, FanSpeed};

mod mode;
pub use mode::ClimateMode;

use std::collections::BTreeMap;

use log::{debug, error, warn};
use serde::Serialize;
use serde_json::Value;
use xiaomi::DeviceInfo;

use crate::entity::Entity;
use crate::property::Property;
use crate::{AdapterConfig, Command, DeviceClient, Result};

const PROPERTIES: &[&str] = &["bh_mode", "fan_speed_idx"];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClimateState {
    pub mode: Option<ClimateMode>,
    pub fan_speed: Option<FanSpeed>,
    pub available: bool,
}

impl ClimateState {
    fn decode(result: Value) -> serde_json::Result<ClimateState> {
        let (bh_mode, fan_speed_idx): (String, Property) = serde_json::from_value(result)?;

        let mode = ClimateMode::from_bh_mode(&bh_mode);
        if mode.is_none() {
            warn!("unknown bh_mode {}", bh_mode);
        }

        Ok(ClimateState {
            mode,
            fan_speed: decode_fan_speed(mode, &fan_speed_idx.to_string()),
            available: true,
        })
    }
}

/// Heater and fan unit of a Yeelight Yuba.
pub struct ClimateAdapter<C> {
    entity: Entity<C>,
    state: ClimateState,
}

impl<C: DeviceClient> ClimateAdapter<C> {
    pub async fn setup(client: C, config: AdapterConfig) -> Result<Self> {
        let entity = Entity::setup(client, config).await?;

        Ok(Self {
            entity,
            state: ClimateState::default(),
        })
    }

    pub fn new(client: C, config: AdapterConfig, info: DeviceInfo) -> Self {
        Self {
            entity: Entity::new(client, config, info),
            state: ClimateState::default(),
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

    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    pub fn available(&self) -> bool {
        self.state.available
    }

    pub fn hvac_mode(&self) -> Option<ClimateMode> {
        self.state.mode
    }

    pub fn fan_mode(&self) -> Option<FanSpeed> {
        self.state.fan_speed
    }

    pub fn hvac_modes(&self) -> &'static [ClimateMode] {
        &ClimateMode::ALL
    }

    pub fn fan_modes(&self) -> &'static [FanSpeed] {
        &FanSpeed::ALL
    }

    pub async fn refresh(&mut self) {
        // On state change the device doesn't provide the new state immediately.
        if self.entity.take_skip_update() {
            debug!("skipping climate update");
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

        match ClimateState::decode(result) {
            Ok(state) => self.state = state,
            Err(err) => {
                self.state.available = false;
                error!("Got malformed state: {}", err);
            }
        }
    }

    pub async fn set_hvac_mode(&mut self, mode: ClimateMode) -> bool {
        let mask_error = match mode {
            ClimateMode::Off => "Turning the miio device off failed.",
            _ => "Turning the miio device on failed.",
        };

        let command = Command::SetBhMode(mode.bh_mode());

        if self.entity.try_command(mask_error, command).await {
            self.state.mode = Some(mode);
            true
        } else {
            false
        }
    }

    pub async fn set_fan_mode(&mut self, fan_speed: FanSpeed) -> bool {
        let Some(index) = self
            .state
            .mode
            .and_then(|mode| fan_speed.gear_index(mode))
        else {
            warn!(
                "fan speed {} is not available in mode {:?}",
                fan_speed, self.state.mode
            );
            return false;
        };

        let command = Command::SetGearsIdx(index);

        if self
            .entity
            .try_command("Setting the fan speed of the miio device failed.", command)
            .await
        {
            self.state.fan_speed = Some(fan_speed);
            true
        } else {
            false
        }
    }

    pub async fn turn_on(&mut self) -> bool {
        self.set_hvac_mode(ClimateMode::Dehumidify).await
    }

    pub async fn turn_off(&mut self) -> bool {
        self.set_hvac_mode(ClimateMode::Off).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockDeviceClient;
    use crate::entity::tests::{device_info, io_error};
    use serde_json::json;

    fn adapter(client: MockDeviceClient) -> ClimateAdapter<MockDeviceClient> {
        ClimateAdapter::new(client, AdapterConfig::default(), device_info())
    }

    fn expect_status(client: &mut MockDeviceClient, status: Value) {
        client
            .expect_execute()
            .withf(|command| *command == Command::GetProperties(&["bh_mode", "fan_speed_idx"]))
            .times(1)
            .returning(move |_| Ok(status.clone()));
    }

    fn expect_command(client: &mut MockDeviceClient, expected: Command, reply: Value) {
        client
            .expect_execute()
            .withf(move |command| *command == expected)
            .times(1)
            .returning(move |_| Ok(reply.clone()));
    }

    #[tokio::test]
    async fn test_refresh() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["warmwind", "0100"]));

        let mut adapter = adapter(client);
        assert!(!adapter.available());

        adapter.refresh().await;

        assert_eq!(
            adapter.state(),
            &ClimateState {
                mode: Some(ClimateMode::Heat),
                fan_speed: Some(FanSpeed::Low),
                available: true,
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_every_bh_mode() {
        let cases = [
            ("bh_off", ClimateMode::Off),
            ("warmwind", ClimateMode::Heat),
            ("venting", ClimateMode::Cool),
            ("drying", ClimateMode::Dehumidify),
            ("drying_cloth", ClimateMode::Dehumidify),
            ("coolwind", ClimateMode::Ventilate),
        ];

        for (bh_mode, mode) in cases {
            let mut client = MockDeviceClient::new();
            expect_status(&mut client, json!([bh_mode, "0000"]));

            let mut adapter = adapter(client);
            adapter.refresh().await;

            assert_eq!(adapter.hvac_mode(), Some(mode));
            assert_eq!(adapter.fan_mode(), Some(FanSpeed::Low));
        }
    }

    #[tokio::test]
    async fn test_refresh_numeric_fan_speed_idx() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["venting", 90]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert_eq!(adapter.hvac_mode(), Some(ClimateMode::Cool));
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::TopHigh));
    }

    #[tokio::test]
    async fn test_refresh_unknown_mode() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["anion", "0222"]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert_eq!(
            adapter.state(),
            &ClimateState {
                mode: None,
                fan_speed: Some(FanSpeed::Low),
                available: true,
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_state() {
        let mut client = MockDeviceClient::new();
        let mut seq = mockall::Sequence::new();

        client
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!(["coolwind", "2000"])));
        client
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(io_error()));

        let mut adapter = adapter(client);

        adapter.refresh().await;
        assert!(adapter.available());

        adapter.refresh().await;

        assert_eq!(
            adapter.state(),
            &ClimateState {
                mode: Some(ClimateMode::Ventilate),
                fan_speed: Some(FanSpeed::High),
                available: false,
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_malformed_response() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!({"bh_mode": "warmwind"}));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert_eq!(adapter.state(), &ClimateState::default());
    }

    #[tokio::test]
    async fn test_set_hvac_mode() {
        let cases = [
            (ClimateMode::Off, "bh_off"),
            (ClimateMode::Heat, "warmwind"),
            (ClimateMode::Cool, "venting"),
            (ClimateMode::Dehumidify, "drying"),
            (ClimateMode::Ventilate, "coolwind"),
        ];

        for (mode, bh_mode) in cases {
            let mut client = MockDeviceClient::new();
            expect_command(&mut client, Command::SetBhMode(bh_mode), json!(["ok"]));

            let mut adapter = adapter(client);

            assert!(adapter.set_hvac_mode(mode).await);
            assert_eq!(adapter.hvac_mode(), Some(mode));
        }
    }

    #[tokio::test]
    async fn test_set_hvac_mode_rejected() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["warmwind", "0001"]));
        expect_command(&mut client, Command::SetBhMode("venting"), json!(["error"]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert!(!adapter.set_hvac_mode(ClimateMode::Cool).await);
        assert_eq!(adapter.hvac_mode(), Some(ClimateMode::Heat));
    }

    #[tokio::test]
    async fn test_set_hvac_mode_device_error() {
        let mut client = MockDeviceClient::new();
        client
            .expect_execute()
            .times(1)
            .returning(|_| Err(io_error()));

        let mut adapter = adapter(client);

        assert!(!adapter.set_hvac_mode(ClimateMode::Heat).await);
        assert_eq!(adapter.hvac_mode(), None);
    }

    #[tokio::test]
    async fn test_set_fan_mode() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["warmwind", "0000"]));
        expect_command(&mut client, Command::SetGearsIdx(2), json!(["ok"]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert_eq!(adapter.hvac_mode(), Some(ClimateMode::Heat));
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::Low));

        assert!(adapter.set_fan_mode(FanSpeed::High).await);
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::High));
    }

    #[tokio::test]
    async fn test_set_fan_mode_top_high_in_cool() {
        let mut client = MockDeviceClient::new();
        expect_command(&mut client, Command::SetBhMode("venting"), json!(["ok"]));
        expect_command(&mut client, Command::SetGearsIdx(9), json!(["ok"]));

        let mut adapter = adapter(client);

        assert!(adapter.set_hvac_mode(ClimateMode::Cool).await);
        assert!(adapter.set_fan_mode(FanSpeed::TopHigh).await);
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::TopHigh));
    }

    #[tokio::test]
    async fn test_set_fan_mode_rejected() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["drying", "0000"]));
        expect_command(&mut client, Command::SetGearsIdx(1), json!([]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert!(!adapter.set_fan_mode(FanSpeed::Medium).await);
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::Low));
    }

    #[tokio::test]
    async fn test_set_fan_mode_is_noop_when_off() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["bh_off", "0000"]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        for speed in FanSpeed::ALL {
            assert!(!adapter.set_fan_mode(speed).await);
        }
    }

    #[tokio::test]
    async fn test_set_fan_mode_is_noop_without_mode() {
        let mut client = MockDeviceClient::new();
        client.expect_execute().never();

        let mut adapter = adapter(client);

        assert!(!adapter.set_fan_mode(FanSpeed::Low).await);
    }

    #[tokio::test]
    async fn test_top_high_is_noop_outside_cool() {
        let mut client = MockDeviceClient::new();
        expect_status(&mut client, json!(["warmwind", "0000"]));

        let mut adapter = adapter(client);
        adapter.refresh().await;

        assert!(!adapter.set_fan_mode(FanSpeed::TopHigh).await);
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::Low));
    }

    #[tokio::test]
    async fn test_turn_on_and_off() {
        let mut client = MockDeviceClient::new();
        expect_command(&mut client, Command::SetBhMode("drying"), json!(["ok"]));
        expect_command(&mut client, Command::SetBhMode("bh_off"), json!(["ok"]));

        let mut adapter = adapter(client);

        assert!(adapter.turn_on().await);
        assert_eq!(adapter.hvac_mode(), Some(ClimateMode::Dehumidify));

        assert!(adapter.turn_off().await);
        assert_eq!(adapter.hvac_mode(), Some(ClimateMode::Off));
    }

    #[tokio::test]
    async fn test_skip_update_after_command() {
        let mut client = MockDeviceClient::new();
        expect_command(&mut client, Command::SetBhMode("warmwind"), json!(["ok"]));
        expect_status(&mut client, json!(["warmwind", "0002"]));

        let config = AdapterConfig {
            update_instant: false,
            ..Default::default()
        };
        let mut adapter = ClimateAdapter::new(client, config, device_info());

        assert!(adapter.set_hvac_mode(ClimateMode::Heat).await);

        adapter.refresh().await;
        assert_eq!(adapter.fan_mode(), None);

        adapter.refresh().await;
        assert_eq!(adapter.fan_mode(), Some(FanSpeed::High));
    }

    #[test]
    fn test_supported_modes() {
        let adapter = adapter(MockDeviceClient::new());

        assert_eq!(adapter.hvac_modes().len(), 5);
        assert_eq!(adapter.fan_modes().len(), 4);
        assert_eq!(adapter.name(), crate::DEFAULT_NAME);
    }
}
