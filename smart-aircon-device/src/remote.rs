use std::fmt::{Display, Formatter};
use std::str::FromStr;

use strum_macros::EnumIter;
use thiserror::Error;

use crate::state::patch::StatePatch;
use crate::state::DeviceState;

/// Buttons on the remote. Everything except power is ignored while the unit is
/// off.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter)]
pub enum RemoteAction {
    TogglePower,
    TempUp,
    TempDown,
    CycleMode,
    CycleFan,
    ToggleSwingVertical,
    ToggleSwingHorizontal,
    ToggleEco,
    ToggleSleep,
    ToggleTurbo,
}

impl RemoteAction {
    pub fn keyword(self) -> &'static str {
        match self {
            RemoteAction::TogglePower => "power",
            RemoteAction::TempUp => "up",
            RemoteAction::TempDown => "down",
            RemoteAction::CycleMode => "mode",
            RemoteAction::CycleFan => "fan",
            RemoteAction::ToggleSwingVertical => "vswing",
            RemoteAction::ToggleSwingHorizontal => "hswing",
            RemoteAction::ToggleEco => "eco",
            RemoteAction::ToggleSleep => "sleep",
            RemoteAction::ToggleTurbo => "turbo",
        }
    }

    /// The patch this button press produces against `state`, or `None` if
    /// the press has no effect.
    pub fn patch(self, state: &DeviceState) -> Option<StatePatch> {
        if !state.power && self != RemoteAction::TogglePower {
            return None;
        }
        let patch = match self {
            RemoteAction::TogglePower => StatePatch {
                power: Some(!state.power),
                ..StatePatch::default()
            },
            RemoteAction::TempUp => StatePatch {
                target_temp: Some(state.target_temp.up()),
                ..StatePatch::default()
            },
            RemoteAction::TempDown => StatePatch {
                target_temp: Some(state.target_temp.down()),
                ..StatePatch::default()
            },
            RemoteAction::CycleMode => StatePatch {
                mode: Some(state.mode.next()),
                ..StatePatch::default()
            },
            RemoteAction::CycleFan => StatePatch {
                fan_speed: Some(state.fan_speed.next()),
                ..StatePatch::default()
            },
            RemoteAction::ToggleSwingVertical => StatePatch {
                swing_vertical: Some(!state.swing_vertical),
                ..StatePatch::default()
            },
            RemoteAction::ToggleSwingHorizontal => StatePatch {
                swing_horizontal: Some(!state.swing_horizontal),
                ..StatePatch::default()
            },
            RemoteAction::ToggleEco => StatePatch {
                eco_mode: Some(!state.eco_mode),
                ..StatePatch::default()
            },
            RemoteAction::ToggleSleep => StatePatch {
                sleep_mode: Some(!state.sleep_mode),
                ..StatePatch::default()
            },
            RemoteAction::ToggleTurbo => StatePatch {
                turbo_mode: Some(!state.turbo_mode),
                ..StatePatch::default()
            },
        };
        Some(patch)
    }
}

impl Display for RemoteAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown remote button {0}")]
pub struct ParseRemoteActionError(String);

impl FromStr for RemoteAction {
    type Err = ParseRemoteActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "power" | "on" | "off" => Ok(RemoteAction::TogglePower),
            "up" | "+" => Ok(RemoteAction::TempUp),
            "down" | "-" => Ok(RemoteAction::TempDown),
            "mode" => Ok(RemoteAction::CycleMode),
            "fan" => Ok(RemoteAction::CycleFan),
            "vswing" => Ok(RemoteAction::ToggleSwingVertical),
            "hswing" => Ok(RemoteAction::ToggleSwingHorizontal),
            "eco" => Ok(RemoteAction::ToggleEco),
            "sleep" => Ok(RemoteAction::ToggleSleep),
            "turbo" => Ok(RemoteAction::ToggleTurbo),
            _ => Err(ParseRemoteActionError(s.to_string())),
        }
    }
}
