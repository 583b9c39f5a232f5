mod client;
pub use client::DeviceClient;

mod command;
pub use command::Command;

mod entity;
pub use entity::{AdapterConfig, DEFAULT_NAME};

mod property;

pub mod climate;
pub use climate::{ClimateAdapter, ClimateMode, ClimateState, FanSpeed};

pub mod light;
pub use light::{LightAdapter, LightState};

mod registry;
pub use registry::Registry;

mod error;
pub use error::Error;

pub use xiaomi::DeviceInfo;

pub type Result<T> = std::result::Result<T, Error>;
