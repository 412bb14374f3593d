//! Turns the loosely typed `settings` object returned by the language model
//! into a [`StatePatch`]. Each field is checked on its own; a field with the
//! wrong type or an unknown enum value is dropped, the rest still apply.

use std::convert::TryFrom;
use std::str::FromStr;

use serde_json::{Map, Value};

use smart_aircon_device::state::patch::StatePatch;
use smart_aircon_device::state::types::{ACMode, FanSpeed, TargetTemperature};

fn boolean(key: &str, value: &Value) -> Option<bool> {
    let parsed = value.as_bool();
    if parsed.is_none() {
        warn!("dropping {}: expected a boolean, got {}", key, value);
    }
    parsed
}

fn named<T: FromStr>(key: &str, value: &Value) -> Option<T> {
    let parsed = value.as_str().and_then(|name| name.parse::<T>().ok());
    if parsed.is_none() {
        warn!("dropping {}: unknown value {}", key, value);
    }
    parsed
}

fn target_temp(value: &Value) -> Option<TargetTemperature> {
    match value.as_f64().map(TargetTemperature::try_from) {
        Some(Ok(temp)) => {
            if value.as_f64() != Some(temp.celsius()) {
                warn!("clamping targetTemp {} to {}", value, temp);
            }
            Some(temp)
        }
        _ => {
            warn!("dropping targetTemp: expected a number, got {}", value);
            None
        }
    }
}

fn timer(value: &Value) -> Option<Option<u32>> {
    match value {
        Value::Null => Some(None),
        _ => match value.as_u64().and_then(|minutes| u32::try_from(minutes).ok()) {
            Some(minutes) => Some(Some(minutes)),
            None => {
                warn!("dropping timer: expected minutes, got {}", value);
                None
            }
        },
    }
}

/// Validates every settable field in `raw`. Keys that are not settable (room
/// temperature, air quality, ...) are ignored.
pub fn validate(raw: &Map<String, Value>) -> StatePatch {
    let mut patch = StatePatch::default();
    for (key, value) in raw {
        match key.as_str() {
            "power" => patch.power = boolean(key, value),
            "mode" => patch.mode = named::<ACMode>(key, value),
            "targetTemp" => patch.target_temp = target_temp(value),
            "fanSpeed" => patch.fan_speed = named::<FanSpeed>(key, value),
            "swingVertical" => patch.swing_vertical = boolean(key, value),
            "swingHorizontal" => patch.swing_horizontal = boolean(key, value),
            "ecoMode" => patch.eco_mode = boolean(key, value),
            "sleepMode" => patch.sleep_mode = boolean(key, value),
            "turboMode" => patch.turbo_mode = boolean(key, value),
            "timer" => patch.timer = timer(value),
            other => debug!("ignoring non-settable field {}", other),
        }
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validate_value(value: Value) -> StatePatch {
        match value {
            Value::Object(map) => validate(&map),
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn accepts_well_typed_fields() {
        let patch = validate_value(json!({
            "power": true,
            "mode": "HEAT",
            "targetTemp": 23,
            "fanSpeed": "LOW",
            "sleepMode": true,
            "timer": 60
        }));
        assert_eq!(
            patch,
            StatePatch {
                power: Some(true),
                mode: Some(ACMode::Heat),
                target_temp: Some(TargetTemperature::new(23.0)),
                fan_speed: Some(FanSpeed::Low),
                sleep_mode: Some(true),
                timer: Some(Some(60)),
                ..StatePatch::default()
            }
        );
    }

    #[test]
    fn drops_fields_with_wrong_types_or_values() {
        let patch = validate_value(json!({
            "power": "yes",
            "mode": "WARM",
            "fanSpeed": 3,
            "ecoMode": true,
            "targetTemp": "cold",
            "timer": -5
        }));
        assert_eq!(
            patch,
            StatePatch {
                eco_mode: Some(true),
                ..StatePatch::default()
            }
        );
    }

    #[test]
    fn clamps_out_of_range_target() {
        let hot = validate_value(json!({ "targetTemp": 45 }));
        assert_eq!(hot.target_temp, Some(TargetTemperature::new(30.0)));
        let cold = validate_value(json!({ "targetTemp": 10.5 }));
        assert_eq!(cold.target_temp, Some(TargetTemperature::new(16.0)));
    }

    #[test]
    fn ignores_sensor_fields() {
        let patch = validate_value(json!({
            "roomTemp": 18,
            "outdoorTemp": 0,
            "airQuality": 400,
            "isCleaning": true
        }));
        assert!(patch.is_empty());
    }

    #[test]
    fn null_timer_clears_it() {
        let patch = validate_value(json!({ "timer": null }));
        assert_eq!(patch.timer, Some(None));
    }
}
