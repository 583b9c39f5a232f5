use serde::Deserialize;

/// Identity reported by `miIO.info`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DeviceInfo {
    pub model: String,
    #[serde(rename = "fw_ver")]
    pub firmware_version: String,
    #[serde(rename = "hw_ver")]
    pub hardware_version: String,
    #[serde(rename = "mac")]
    pub mac_address: String,
}
