use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PARAM_TEMPERATURE: i32 = 1;
pub const PARAM_HUMIDITY: i32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub param_id: i32,
    pub value: f64,
    pub device_timestamp: DateTime<Utc>,
}
