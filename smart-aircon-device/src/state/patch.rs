use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::state::types::{ACMode, FanSpeed, TargetTemperature};

/// A partial [`DeviceState`](crate::state::DeviceState) over the user-settable
/// fields. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub power: Option<bool>,
    pub mode: Option<ACMode>,
    pub target_temp: Option<TargetTemperature>,
    pub fan_speed: Option<FanSpeed>,
    pub swing_vertical: Option<bool>,
    pub swing_horizontal: Option<bool>,
    pub eco_mode: Option<bool>,
    pub sleep_mode: Option<bool>,
    pub turbo_mode: Option<bool>,
    /// `Some(None)` clears the timer
    pub timer: Option<Option<u32>>,
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        *self == StatePatch::default()
    }

    fn changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(power) = self.power {
            changes.push(format!("power={}", power));
        }
        if let Some(mode) = self.mode {
            changes.push(format!("mode={}", mode));
        }
        if let Some(temp) = self.target_temp {
            changes.push(format!("targetTemp={}", temp));
        }
        if let Some(speed) = self.fan_speed {
            changes.push(format!("fanSpeed={}", speed));
        }
        let toggles = [
            ("swingVertical", self.swing_vertical),
            ("swingHorizontal", self.swing_horizontal),
            ("ecoMode", self.eco_mode),
            ("sleepMode", self.sleep_mode),
            ("turboMode", self.turbo_mode),
        ];
        for (name, value) in toggles.iter() {
            if let Some(value) = value {
                changes.push(format!("{}={}", name, value));
            }
        }
        match self.timer {
            Some(Some(minutes)) => changes.push(format!("timer={}", minutes)),
            Some(None) => changes.push("timer=off".to_string()),
            None => {}
        }
        changes
    }
}

impl Display for StatePatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ {} }}", self.changes().iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_empty() {
        assert!(StatePatch::default().is_empty());
        assert!(!StatePatch {
            timer: Some(None),
            ..StatePatch::default()
        }
        .is_empty());
    }

    #[test]
    fn displays_only_present_fields() {
        let patch = StatePatch {
            mode: Some(ACMode::Dry),
            eco_mode: Some(true),
            ..StatePatch::default()
        };
        assert_eq!(patch.to_string(), "{ mode=DRY, ecoMode=true }");
    }
}
