pub mod patch;
pub mod types;

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::Serialize;

use crate::state::patch::StatePatch;
use crate::state::types::{ACMode, FanSpeed, TargetTemperature};

const INITIAL_ROOM_TEMP: f64 = 28.0;
const INITIAL_OUTDOOR_TEMP: f64 = 32.0;
const INITIAL_AIR_QUALITY: u32 = 15;

/// Index below which the air is reported as excellent.
pub const GOOD_AIR_QUALITY: u32 = 50;

/// The authoritative record of appliance settings and simulated sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    pub power: bool,
    pub mode: ACMode,
    pub target_temp: TargetTemperature,
    pub room_temp: f64,
    pub outdoor_temp: f64,
    pub fan_speed: FanSpeed,
    pub swing_vertical: bool,
    pub swing_horizontal: bool,
    pub eco_mode: bool,
    pub sleep_mode: bool,
    pub turbo_mode: bool,
    /// Minutes remaining
    pub timer: Option<u32>,
    /// PM2.5-like index
    pub air_quality: u32,
    pub is_cleaning: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        DeviceState {
            power: false,
            mode: ACMode::Cool,
            target_temp: TargetTemperature::default(),
            room_temp: INITIAL_ROOM_TEMP,
            outdoor_temp: INITIAL_OUTDOOR_TEMP,
            fan_speed: FanSpeed::Auto,
            swing_vertical: false,
            swing_horizontal: false,
            eco_mode: false,
            sleep_mode: false,
            turbo_mode: false,
            timer: None,
            air_quality: INITIAL_AIR_QUALITY,
            is_cleaning: false,
        }
    }
}

impl DeviceState {
    /// Shallow merge: every field present in `patch` overwrites ours, the rest
    /// are left alone.
    pub fn apply(&mut self, patch: &StatePatch) {
        let StatePatch {
            power,
            mode,
            target_temp,
            fan_speed,
            swing_vertical,
            swing_horizontal,
            eco_mode,
            sleep_mode,
            turbo_mode,
            timer,
        } = patch.clone();

        if let Some(power) = power {
            self.power = power;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(target_temp) = target_temp {
            self.target_temp = target_temp;
        }
        if let Some(fan_speed) = fan_speed {
            self.fan_speed = fan_speed;
        }
        if let Some(swing_vertical) = swing_vertical {
            self.swing_vertical = swing_vertical;
        }
        if let Some(swing_horizontal) = swing_horizontal {
            self.swing_horizontal = swing_horizontal;
        }
        if let Some(eco_mode) = eco_mode {
            self.eco_mode = eco_mode;
        }
        if let Some(sleep_mode) = sleep_mode {
            self.sleep_mode = sleep_mode;
        }
        if let Some(turbo_mode) = turbo_mode {
            self.turbo_mode = turbo_mode;
        }
        if let Some(timer) = timer {
            self.timer = timer;
        }
    }

    pub fn air_quality_label(&self) -> &'static str {
        if self.air_quality < GOOD_AIR_QUALITY {
            "Excellent"
        } else {
            "Moderate"
        }
    }

    fn active_flags(&self) -> Vec<&'static str> {
        [
            (self.swing_vertical, "V-SWING"),
            (self.swing_horizontal, "H-SWING"),
            (self.eco_mode, "ECO"),
            (self.sleep_mode, "SLEEP"),
            (self.turbo_mode, "TURBO"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect()
    }
}

impl Display for DeviceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.power {
            write!(
                f,
                "ON {} {}°C fan {}",
                self.mode, self.target_temp, self.fan_speed
            )?;
            let flags = self.active_flags();
            if !flags.is_empty() {
                write!(f, " [{}]", flags.iter().join(" "))?;
            }
        } else {
            write!(f, "OFF")?;
        }
        if let Some(minutes) = self.timer {
            write!(f, " timer {}min", minutes)?;
        }
        write!(
            f,
            " | room {:.1}°C | outdoor {}°C | air {}",
            self.room_temp,
            self.outdoor_temp,
            self.air_quality_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_fixed_initial_values() {
        let state = DeviceState::default();
        assert!(!state.power);
        assert_eq!(state.mode, ACMode::Cool);
        assert_eq!(state.target_temp.celsius(), 25.0);
        assert_eq!(state.room_temp, 28.0);
        assert_eq!(state.outdoor_temp, 32.0);
        assert_eq!(state.fan_speed, FanSpeed::Auto);
        assert_eq!(state.timer, None);
        assert_eq!(state.air_quality, 15);
        assert_eq!(state.air_quality_label(), "Excellent");
    }

    #[test]
    fn serializes_with_camel_case_and_upper_case_enums() {
        let json = serde_json::to_value(DeviceState::default()).unwrap();
        assert_eq!(json["mode"], "COOL");
        assert_eq!(json["fanSpeed"], "AUTO");
        assert_eq!(json["targetTemp"], 25.0);
        assert_eq!(json["roomTemp"], 28.0);
        assert_eq!(json["timer"], serde_json::Value::Null);
        assert_eq!(json["isCleaning"], false);
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut state = DeviceState {
            power: true,
            mode: ACMode::Heat,
            target_temp: TargetTemperature::new(22.0),
            fan_speed: FanSpeed::High,
            swing_vertical: true,
            sleep_mode: true,
            ..DeviceState::default()
        };
        let before = state.clone();

        state.apply(&StatePatch {
            eco_mode: Some(true),
            ..StatePatch::default()
        });

        assert_eq!(
            state,
            DeviceState {
                eco_mode: true,
                ..before
            }
        );
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut state = DeviceState::default();
        state.apply(&StatePatch::default());
        assert_eq!(state, DeviceState::default());
    }

    #[test]
    fn summary_lists_active_modifiers() {
        let state = DeviceState {
            power: true,
            eco_mode: true,
            swing_horizontal: true,
            ..DeviceState::default()
        };
        assert_eq!(
            state.to_string(),
            "ON COOL 25°C fan AUTO [H-SWING ECO] | room 28.0°C | outdoor 32°C | air Excellent"
        );
        assert_eq!(
            DeviceState::default().to_string(),
            "OFF | room 28.0°C | outdoor 32°C | air Excellent"
        );
    }
}
