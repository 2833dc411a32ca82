use crate::errors::{Error, Result};
use crate::model::{Device, Reading};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

pub async fn make_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    info!("Database connection established");
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed");

    Ok(pool)
}

pub async fn device_exists(pool: &PgPool, device_id: &str) -> Result<bool> {
    let row: Option<(String,)> = sqlx::query_as("SELECT id FROM devices WHERE id = $1")
        .bind(device_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

pub async fn insert_reading(pool: &PgPool, reading: &Reading) -> Result<()> {
    sqlx::query(
        "INSERT INTO readings (device_id, param_id, value, device_timestamp, received_at, entry_hash)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&reading.device_id)
    .bind(reading.param_id)
    .bind(reading.value)
    .bind(reading.device_timestamp)
    .bind(reading.received_at)
    .bind(&reading.entry_hash)
    .execute(pool)
    .await?;

    Ok(())
}

/// Newest-first window of `(value, device_timestamp)` samples for one
/// device and parameter.
pub async fn recent_samples(
    pool: &PgPool,
    device_id: &str,
    param_id: i32,
    limit: i64,
) -> Result<Vec<(f64, DateTime<Utc>)>> {
    let rows = sqlx::query_as(
        "SELECT value, device_timestamp
         FROM readings
         WHERE device_id = $1 AND param_id = $2
         ORDER BY device_timestamp DESC
         LIMIT $3",
    )
    .bind(device_id)
    .bind(param_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct DeviceRow {
    pub id: String,
    pub location: String,
    pub last_seen: Option<DateTime<Utc>>,
}

pub async fn devices_with_last_seen(pool: &PgPool) -> Result<Vec<DeviceRow>> {
    let rows = sqlx::query_as(
        "SELECT d.id, d.location, MAX(r.received_at) AS last_seen
         FROM devices d
         LEFT JOIN readings r ON d.id = r.device_id
         GROUP BY d.id, d.location
         ORDER BY d.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn device_with_last_seen(pool: &PgPool, device_id: &str) -> Result<Option<DeviceRow>> {
    let row = sqlx::query_as(
        "SELECT d.id, d.location, MAX(r.received_at) AS last_seen
         FROM devices d
         LEFT JOIN readings r ON d.id = r.device_id
         WHERE d.id = $1
         GROUP BY d.id, d.location",
    )
    .bind(device_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Latest stored value per (device, parameter) across the whole fleet,
/// in a single round-trip.
pub async fn latest_values(pool: &PgPool) -> Result<HashMap<(String, i32), f64>> {
    let rows: Vec<(String, i32, f64)> = sqlx::query_as(
        "SELECT DISTINCT ON (device_id, param_id) device_id, param_id, value
         FROM readings
         ORDER BY device_id, param_id, device_timestamp DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(d, p, v)| ((d, p), v)).collect())
}

/// Latest stored value per parameter for one device.
pub async fn latest_values_for(pool: &PgPool, device_id: &str) -> Result<HashMap<i32, f64>> {
    let rows: Vec<(i32, f64)> = sqlx::query_as(
        "SELECT DISTINCT ON (param_id) param_id, value
         FROM readings
         WHERE device_id = $1
         ORDER BY param_id, device_timestamp DESC",
    )
    .bind(device_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

pub async fn create_device(pool: &PgPool, id: &str, location: &str) -> Result<Device> {
    let result = sqlx::query("INSERT INTO devices (id, location) VALUES ($1, $2)")
        .bind(id)
        .bind(location)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(Device {
            id: id.to_string(),
            location: location.to_string(),
        }),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::BadRequest(
            "A device with this ID already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Deletes a device and its readings. Readings go first, the device row
/// references nothing. Returns false when no such device exists.
pub async fn delete_device(pool: &PgPool, device_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM readings WHERE device_id = $1")
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM devices WHERE id = $1")
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}
