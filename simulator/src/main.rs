mod reading;

use chrono::Utc;
use clap::Parser;
use rand::Rng;
use reading::{Reading, PARAM_HUMIDITY, PARAM_TEMPERATURE};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// Posts synthetic weather readings to the dashboard server, standing in
/// for a fleet of battery-powered sensor nodes.
#[derive(Parser, Debug)]
#[command(about = "Weather station simulator")]
struct Args {
    /// Base URL of the dashboard server
    #[arg(long, env = "SERVER_URL", default_value = "http://localhost:8000")]
    server_url: String,

    /// Number of simulated devices (ids sim-0 .. sim-N-1)
    #[arg(long, env = "DEVICES", default_value_t = 3)]
    devices: usize,

    /// Seconds between reporting rounds
    #[arg(long, env = "INTERVAL_SECS", default_value_t = 300)]
    interval_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting weather simulator");
    info!(
        "Server: {}, Devices: {}, Interval: {}s",
        args.server_url, args.devices, args.interval_secs
    );

    let client = reqwest::Client::new();

    // Register the simulated fleet; an id that already exists comes back 400.
    for i in 0..args.devices {
        let device_id = format!("sim-{}", i);
        let result = client
            .post(format!("{}/api/v1/devices", args.server_url))
            .form(&[
                ("device_id", device_id.as_str()),
                ("location", "Simulated"),
            ])
            .send()
            .await;

        match result {
            Ok(res) if res.status() == StatusCode::CREATED => {
                info!("Registered {}", device_id);
            }
            Ok(res) if res.status() == StatusCode::BAD_REQUEST => {
                debug!("{} already registered", device_id);
            }
            Ok(res) => {
                warn!("Unexpected status {} registering {}", res.status(), device_id);
            }
            Err(e) => {
                error!("Failed to register {}: {}", device_id, e);
            }
        }
    }

    let mut ticker = interval(Duration::from_secs(args.interval_secs));
    let mut rng = rand::thread_rng();
    let mut counter = 0u64;

    loop {
        ticker.tick().await;

        for i in 0..args.devices {
            let device_id = format!("sim-{}", i);

            for reading in [generate_temperature(&mut rng), generate_humidity(&mut rng)] {
                match post_reading(&client, &args.server_url, &device_id, &reading).await {
                    Ok(()) => counter += 1,
                    Err(e) => warn!("Failed to post reading for {}: {}", device_id, e),
                }
            }
        }

        info!("Posted {} readings so far", counter);
    }
}

async fn post_reading(
    client: &reqwest::Client,
    server_url: &str,
    device_id: &str,
    reading: &Reading,
) -> reqwest::Result<()> {
    let res = client
        .post(format!("{}/weatherListener", server_url))
        .header("X-Device-Id", device_id)
        .json(reading)
        .send()
        .await?;

    if res.status() != StatusCode::CREATED {
        warn!("Server answered {} for {}", res.status(), device_id);
    }

    Ok(())
}

fn generate_temperature(rng: &mut impl Rng) -> Reading {
    let value = if rng.gen_bool(0.05) {
        rng.gen_range(-20.0..45.0) // 5% outliers
    } else {
        rng.gen_range(15.0..35.0) // Normal range
    };

    Reading {
        param_id: PARAM_TEMPERATURE,
        value,
        device_timestamp: Utc::now(),
    }
}

fn generate_humidity(rng: &mut impl Rng) -> Reading {
    let value = if rng.gen_bool(0.05) {
        rng.gen_range(0.0..100.0) // 5% outliers
    } else {
        rng.gen_range(30.0..80.0) // Normal range
    };

    Reading {
        param_id: PARAM_HUMIDITY,
        value,
        device_timestamp: Utc::now(),
    }
}
