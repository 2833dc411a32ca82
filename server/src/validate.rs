use crate::errors::{Error, Result};
use crate::model::{NewReading, PARAM_HUMIDITY, PARAM_TEMPERATURE};

pub const MAX_DEVICE_ID_LEN: usize = 64;

/// Validates create-device form fields, returning the trimmed values.
pub fn validate_new_device(device_id: &str, location: &str) -> Result<(String, String)> {
    let device_id = device_id.trim();
    let location = location.trim();

    if device_id.is_empty() || location.is_empty() {
        return Err(Error::BadRequest(
            "Device ID and location are required".to_string(),
        ));
    }

    if device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(Error::BadRequest(format!(
            "Device ID must be {} characters or less",
            MAX_DEVICE_ID_LEN
        )));
    }

    Ok((device_id.to_string(), location.to_string()))
}

/// Validates a reading payload.
pub fn validate_reading(reading: &NewReading) -> Result<()> {
    if reading.param_id != PARAM_TEMPERATURE && reading.param_id != PARAM_HUMIDITY {
        return Err(Error::BadRequest(format!(
            "Unknown parameter id {}",
            reading.param_id
        )));
    }

    if !reading.value.is_finite() {
        return Err(Error::BadRequest(format!(
            "Value {} is not a finite number",
            reading.value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_valid_device() {
        let (id, location) = validate_new_device("  esp32-001 ", " Balcony ").unwrap();
        assert_eq!(id, "esp32-001");
        assert_eq!(location, "Balcony");
    }

    #[test]
    fn test_empty_device_id() {
        assert!(validate_new_device("", "Balcony").is_err());
        assert!(validate_new_device("   ", "Balcony").is_err());
    }

    #[test]
    fn test_empty_location() {
        assert!(validate_new_device("esp32-001", "").is_err());
    }

    #[test]
    fn test_device_id_too_long() {
        let long_id = "x".repeat(MAX_DEVICE_ID_LEN + 1);
        assert!(validate_new_device(&long_id, "Balcony").is_err());

        let max_id = "x".repeat(MAX_DEVICE_ID_LEN);
        assert!(validate_new_device(&max_id, "Balcony").is_ok());
    }

    #[test]
    fn test_valid_reading() {
        let reading = NewReading {
            param_id: PARAM_TEMPERATURE,
            value: 21.5,
            device_timestamp: Utc::now(),
        };
        assert!(validate_reading(&reading).is_ok());
    }

    #[test]
    fn test_unknown_param() {
        let reading = NewReading {
            param_id: 7,
            value: 21.5,
            device_timestamp: Utc::now(),
        };
        assert!(validate_reading(&reading).is_err());
    }

    #[test]
    fn test_non_finite_value() {
        let reading = NewReading {
            param_id: PARAM_HUMIDITY,
            value: f64::NAN,
            device_timestamp: Utc::now(),
        };
        assert!(validate_reading(&reading).is_err());

        let reading = NewReading {
            param_id: PARAM_HUMIDITY,
            value: f64::INFINITY,
            device_timestamp: Utc::now(),
        };
        assert!(validate_reading(&reading).is_err());
    }
}
