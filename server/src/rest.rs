use crate::chart::{self, CHART_WINDOW};
use crate::dashboard;
use crate::db;
use crate::errors::{Error, Result};
use crate::ingest;
use crate::liveness;
use crate::model::{Device, DeviceDetail, DeviceStatus, NewDevice, PARAM_HUMIDITY, PARAM_TEMPERATURE};
use crate::validate;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
}

pub fn create_router(pool: PgPool) -> Router {
    let state = AppState { pool };

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/weatherListener", post(ingest::weather_listener))
        .route("/api/v1/devices", get(list_devices).post(create_device))
        .route(
            "/api/v1/devices/:id",
            get(device_detail).delete(delete_device),
        )
        .with_state(state)
}

async fn list_devices(State(state): State<AppState>) -> Result<Json<Vec<DeviceStatus>>> {
    let now = Utc::now();
    let rows = db::devices_with_last_seen(&state.pool).await?;
    let latest = db::latest_values(&state.pool).await?;

    let devices = rows
        .into_iter()
        .map(|row| {
            let l = liveness::status(row.last_seen, now);
            DeviceStatus {
                last_temperature: latest.get(&(row.id.clone(), PARAM_TEMPERATURE)).copied(),
                last_humidity: latest.get(&(row.id.clone(), PARAM_HUMIDITY)).copied(),
                id: row.id,
                location: row.location,
                last_seen: row.last_seen,
                is_online: l.is_online,
                last_seen_formatted: l.formatted,
            }
        })
        .collect();

    Ok(Json(devices))
}

async fn create_device(
    State(state): State<AppState>,
    Form(form): Form<NewDevice>,
) -> Result<(StatusCode, Json<Device>)> {
    let (id, location) = validate::validate_new_device(&form.device_id, &form.location)?;
    let device = db::create_device(&state.pool, &id, &location).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

async fn device_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceDetail>> {
    let row = db::device_with_last_seen(&state.pool, &id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("unknown device {}", id)))?;

    let latest = db::latest_values_for(&state.pool, &id).await?;
    let temp_samples = db::recent_samples(&state.pool, &id, PARAM_TEMPERATURE, CHART_WINDOW).await?;
    let humid_samples = db::recent_samples(&state.pool, &id, PARAM_HUMIDITY, CHART_WINDOW).await?;

    let l = liveness::status(row.last_seen, Utc::now());
    let device = DeviceStatus {
        id: row.id,
        location: row.location,
        last_seen: row.last_seen,
        is_online: l.is_online,
        last_seen_formatted: l.formatted,
        last_temperature: latest.get(&PARAM_TEMPERATURE).copied(),
        last_humidity: latest.get(&PARAM_HUMIDITY).copied(),
    };

    Ok(Json(DeviceDetail {
        device,
        temperature: chart::build_chart(&temp_samples),
        humidity: chart::build_chart(&humid_samples),
    }))
}

async fn delete_device(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    if db::delete_device(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound(format!("unknown device {}", id)))
    }
}
