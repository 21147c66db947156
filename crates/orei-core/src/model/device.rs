use serde::Serialize;

use orei_api::DeviceStatus;

const FALLBACK_MODEL: &str = "OREI Matrix";

/// Identity of a connected matrix, from `get status`.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub host: String,
    /// Full status payload as reported by the device.
    pub status: DeviceStatus,
}

impl DeviceInfo {
    pub fn new(host: impl Into<String>, status: DeviceStatus) -> Self {
        Self {
            host: host.into(),
            status,
        }
    }

    /// Model string, falling back to the device type and then a generic name.
    pub fn model(&self) -> &str {
        self.status
            .model
            .as_deref()
            .or(self.status.device_type.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MODEL)
    }

    /// Human-readable title, e.g. `OREI UHD44-EXB400R-K (192.168.1.50)`.
    pub fn title(&self) -> String {
        format!("OREI {} ({})", self.model(), self.host)
    }
}
