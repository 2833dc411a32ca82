use crate::db;
use crate::errors::{Error, Result};
use crate::metrics::{
    DB_FAILURES_TOTAL, INGEST_LATENCY_SECONDS, INVALID_READINGS_TOTAL, READINGS_TOTAL,
    UNAUTHORIZED_TOTAL,
};
use crate::model::{NewReading, Reading};
use crate::rest::AppState;
use crate::validate::validate_reading;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;

pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// POST /weatherListener
///
/// The body is taken raw and parsed here rather than through the Json
/// extractor so malformed payloads map to 400 through the error enum.
pub async fn weather_listener(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let start = Instant::now();

    match ingest(&state, &headers, &body).await {
        Ok(()) => {
            READINGS_TOTAL.inc();
            INGEST_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
            Ok(StatusCode::CREATED)
        }
        Err(e) => {
            match &e {
                Error::Unauthorized(_) => UNAUTHORIZED_TOTAL.inc(),
                Error::BadRequest(_) | Error::Json(_) => INVALID_READINGS_TOTAL.inc(),
                Error::Database(_) => DB_FAILURES_TOTAL.inc(),
                _ => {}
            }
            Err(e)
        }
    }
}

async fn ingest(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let device_id = headers
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(Error::Unauthorized("who are you?"))?;

    if !db::device_exists(&state.pool, device_id).await? {
        return Err(Error::Unauthorized("unknown device"));
    }

    let payload: NewReading = serde_json::from_slice(body)?;
    validate_reading(&payload)?;

    let received_at = Utc::now();
    let reading = Reading {
        entry_hash: entry_hash(
            device_id,
            payload.param_id,
            payload.value,
            payload.device_timestamp,
        ),
        device_id: device_id.to_string(),
        param_id: payload.param_id,
        value: payload.value,
        device_timestamp: payload.device_timestamp,
        received_at,
    };

    db::insert_reading(&state.pool, &reading).await?;

    debug!(
        "Stored reading from {} (param {}, value {}, hash {})",
        reading.device_id,
        reading.param_id,
        reading.value,
        &hex::encode(&reading.entry_hash)[..12]
    );

    Ok(())
}

/// Deterministic digest over a reading's identifying fields, stored
/// alongside the row for later tamper/dedup detection. The textual
/// encoding is fixed: same inputs always produce the same bytes.
pub fn entry_hash(
    device_id: &str,
    param_id: i32,
    value: f64,
    device_timestamp: DateTime<Utc>,
) -> Vec<u8> {
    let input = format!(
        "{}:{}:{:.6}:{}",
        device_id,
        param_id,
        value,
        device_timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    );
    Sha256::digest(input.as_bytes()).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_hash_is_deterministic() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let a = entry_hash("esp32-001", 1, 21.5, ts);
        let b = entry_hash("esp32-001", 1, 21.5, ts);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_entry_hash_distinguishes_fields() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let base = entry_hash("esp32-001", 1, 21.5, ts);
        assert_ne!(entry_hash("esp32-002", 1, 21.5, ts), base);
        assert_ne!(entry_hash("esp32-001", 2, 21.5, ts), base);
        assert_ne!(entry_hash("esp32-001", 1, 21.6, ts), base);
        assert_ne!(
            entry_hash("esp32-001", 1, 21.5, ts + chrono::Duration::seconds(1)),
            base
        );
    }

    #[test]
    fn test_entry_hash_known_value() {
        // Pinned so the encoding cannot drift silently.
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let hash = entry_hash("esp32-001", 1, 21.5, ts);
        let input = "esp32-001:1:21.500000:2025-06-01T12:00:00.000000000Z";
        assert_eq!(hash, Sha256::digest(input.as_bytes()).to_vec());
    }
}
