mod action;
pub use action::{Action, ClimateAction, LightAction};

mod config;
pub use config::Config;

mod error;
pub use error::Error;

mod gateway;
pub use gateway::{Gateway, Publication};

mod storage;
pub use storage::Storage;

pub mod topic;
pub use topic::Platform;

pub type ErasedError = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, ErasedError>;
