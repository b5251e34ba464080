//! Smart plug control through a device cloud
//!
//! The orchestrator only sees `DeviceController` and `DeviceHandle`; the
//! cloud client in `cloud` is the production implementation.

pub mod cloud;

pub use cloud::CloudDeviceController;

use crate::error::{NordplugError, Result};
use serde::{Deserialize, Serialize};

/// Desired relay state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device as listed by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(alias = "did")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Local network address, when the cloud reports one
    #[serde(default, alias = "localip")]
    pub ip: Option<String>,

    #[serde(default)]
    pub model: Option<String>,
}

/// A resolved, controllable plug
#[async_trait::async_trait]
pub trait DeviceHandle: Send + Sync {
    fn info(&self) -> &DeviceInfo;

    async fn set_power(&self, state: PowerState) -> Result<()>;
}

/// Resolves a configured device id into a controllable plug
#[async_trait::async_trait]
pub trait DeviceController: Send + Sync {
    async fn resolve_device(&self, device_id: &str) -> Result<Box<dyn DeviceHandle>>;
}

/// Pick `device_id` out of an account's device list
pub fn find_device(devices: Vec<DeviceInfo>, device_id: &str) -> Result<DeviceInfo> {
    let ids: Vec<String> = devices.iter().map(|d| d.id.clone()).collect();
    devices
        .into_iter()
        .find(|d| d.id == device_id)
        .ok_or_else(|| NordplugError::device_not_found(device_id, ids))
}
