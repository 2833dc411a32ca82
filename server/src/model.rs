use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::ChartData;

/// Fixed parameter identifiers devices report against.
pub const PARAM_TEMPERATURE: i32 = 1;
pub const PARAM_HUMIDITY: i32 = 2;

/// A stored sensor reading.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reading {
    pub device_id: String,
    pub param_id: i32,
    pub value: f64,
    pub device_timestamp: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
    pub entry_hash: Vec<u8>,
}

/// Reading payload as POSTed by a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReading {
    pub param_id: i32,
    pub value: f64,
    pub device_timestamp: DateTime<Utc>,
}

/// A registered device.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Device {
    pub id: String,
    pub location: String,
}

/// Create-device form fields.
#[derive(Debug, Deserialize)]
pub struct NewDevice {
    pub device_id: String,
    pub location: String,
}

/// Per-device view for the dashboard list.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatus {
    pub id: String,
    pub location: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub is_online: bool,
    pub last_seen_formatted: String,
    pub last_temperature: Option<f64>,
    pub last_humidity: Option<f64>,
}

/// Detail view: one device plus its recent-history charts.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceDetail {
    pub device: DeviceStatus,
    pub temperature: ChartData,
    pub humidity: ChartData,
}
