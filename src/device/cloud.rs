use super::{DeviceController, DeviceHandle, DeviceInfo, PowerState, find_device};
use crate::config::{CloudSettings, Credentials};
use crate::error::{NordplugError, Result};
use crate::logging::get_logger;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::json;

const CLIENT_AGENT: &str = concat!("nordplug/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct DeviceListResponse {
    #[serde(default)]
    devices: Vec<DeviceInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
}

/// Device cloud speaking JSON over HTTPS
///
/// `POST /login` exchanges the account credentials for a bearer token,
/// `GET /devices` lists the account's devices and
/// `POST /devices/<id>/rpc` forwards a miIO-style method call to a device.
pub struct CloudDeviceController {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    logger: crate::logging::StructuredLogger,
}

impl CloudDeviceController {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8787";

    pub fn new(settings: &CloudSettings, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials,
            logger: get_logger("cloud"),
        })
    }

    async fn login(&self) -> Result<String> {
        let resp = self
            .http
            .post(format!("{}/login", self.base_url))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .json(&json!({
                "username": self.credentials.username,
                "password": self.credentials.password,
            }))
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NordplugError::auth(format!(
                "Device cloud rejected the credentials for {}",
                self.credentials.username
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NordplugError::auth(format!(
                "Device cloud login failed: HTTP {} {}",
                status, body
            )));
        }

        let login: LoginResponse = resp.json().await?;
        self.logger.debug("Logged in to device cloud");
        Ok(login.token)
    }

    async fn list_devices(&self, token: &str) -> Result<Vec<DeviceInfo>> {
        let resp = self
            .http
            .get(format!("{}/devices", self.base_url))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NordplugError::network(format!(
                "Device list request failed: HTTP {} {}",
                status, body
            )));
        }

        let list: DeviceListResponse = resp.json().await?;
        self.logger
            .debug(&format!("Account lists {} device(s)", list.devices.len()));
        Ok(list.devices)
    }
}

#[async_trait::async_trait]
impl DeviceController for CloudDeviceController {
    async fn resolve_device(&self, device_id: &str) -> Result<Box<dyn DeviceHandle>> {
        let token = self.login().await?;
        let devices = self.list_devices(&token).await?;
        let info = find_device(devices, device_id)?;
        self.logger.info(&format!(
            "Resolved device {} ({}, model {})",
            info.id,
            info.name,
            info.model.as_deref().unwrap_or("unknown")
        ));
        Ok(Box::new(CloudPlug {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
            info,
            logger: self.logger.clone(),
        }))
    }
}

/// Plug reached through the cloud RPC relay
struct CloudPlug {
    http: reqwest::Client,
    base_url: String,
    token: String,
    info: DeviceInfo,
    logger: crate::logging::StructuredLogger,
}

#[async_trait::async_trait]
impl DeviceHandle for CloudPlug {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    async fn set_power(&self, state: PowerState) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/devices/{}/rpc", self.base_url, self.info.id))
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_AGENT)
            .json(&json!({ "method": "set_power", "params": [state.as_str()] }))
            .send()
            .await
            .map_err(|e| NordplugError::device_command(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| NordplugError::device_command(e.to_string()))?;
        if !status.is_success() {
            return Err(NordplugError::device_command(format!(
                "set_power {} on {} failed: HTTP {} {}",
                state, self.info.id, status, body
            )));
        }

        let reply: RpcResponse = if body.trim().is_empty() {
            RpcResponse::default()
        } else {
            serde_json::from_str(&body).map_err(|e| {
                NordplugError::device_command(format!("Unreadable RPC reply: {}", e))
            })?
        };
        if reply.code != 0 {
            return Err(NordplugError::device_command(format!(
                "set_power {} on {} returned code {}: {}",
                state,
                self.info.id,
                reply.code,
                reply.message.unwrap_or_default()
            )));
        }

        self.logger
            .info(&format!("Device {} switched {}", self.info.id, state));
        Ok(())
    }
}
