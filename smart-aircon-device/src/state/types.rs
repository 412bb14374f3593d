use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_traits::clamp;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ACMode {
    Cool,
    Heat,
    Dry,
    Fan,
    Auto,
}

impl Default for ACMode {
    fn default() -> Self {
        ACMode::Cool
    }
}

impl ACMode {
    /// The mode after this one in button order, wrapping back to `Cool`.
    pub fn next(self) -> ACMode {
        cycle(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            ACMode::Cool => "COOL",
            ACMode::Heat => "HEAT",
            ACMode::Dry => "DRY",
            ACMode::Fan => "FAN",
            ACMode::Auto => "AUTO",
        }
    }
}

impl Display for ACMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid AC mode")]
pub struct InvalidAcMode;

impl FromStr for ACMode {
    type Err = InvalidAcMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cool" => Ok(ACMode::Cool),
            "heat" => Ok(ACMode::Heat),
            "dry" => Ok(ACMode::Dry),
            "fan" => Ok(ACMode::Fan),
            "auto" => Ok(ACMode::Auto),
            _ => Err(InvalidAcMode),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FanSpeed {
    Auto,
    Low,
    Mid,
    High,
    Turbo,
}

impl Default for FanSpeed {
    fn default() -> Self {
        FanSpeed::Auto
    }
}

impl FanSpeed {
    pub fn next(self) -> FanSpeed {
        cycle(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            FanSpeed::Auto => "AUTO",
            FanSpeed::Low => "LOW",
            FanSpeed::Mid => "MID",
            FanSpeed::High => "HIGH",
            FanSpeed::Turbo => "TURBO",
        }
    }
}

impl Display for FanSpeed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid fan speed")]
pub struct InvalidFanSpeed;

impl FromStr for FanSpeed {
    type Err = InvalidFanSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(FanSpeed::Auto),
            "low" => Ok(FanSpeed::Low),
            "mid" => Ok(FanSpeed::Mid),
            "high" => Ok(FanSpeed::High),
            "turbo" => Ok(FanSpeed::Turbo),
            _ => Err(InvalidFanSpeed),
        }
    }
}

fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T) -> T {
    let items: Vec<T> = T::iter().collect();
    items
        .iter()
        .position(|item| *item == current)
        .map(|i| items[(i + 1) % items.len()])
        .unwrap_or(current)
}

/// Desired room temperature in °C, always within [`MIN`](Self::MIN) and
/// [`MAX`](Self::MAX).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(into = "f64")]
pub struct TargetTemperature(f64);

impl TargetTemperature {
    pub const MIN: f64 = 16.0;
    pub const MAX: f64 = 30.0;

    /// Clamps `celsius` into range. Non-finite input falls back to the minimum.
    pub fn new(celsius: f64) -> TargetTemperature {
        if celsius.is_finite() {
            TargetTemperature(clamp(celsius, Self::MIN, Self::MAX))
        } else {
            TargetTemperature(Self::MIN)
        }
    }

    pub fn celsius(self) -> f64 {
        self.0
    }

    pub fn adjust(self, delta: f64) -> TargetTemperature {
        Self::new(self.0 + delta)
    }

    pub fn up(self) -> TargetTemperature {
        self.adjust(1.0)
    }

    pub fn down(self) -> TargetTemperature {
        self.adjust(-1.0)
    }
}

impl Default for TargetTemperature {
    fn default() -> Self {
        TargetTemperature(25.0)
    }
}

impl Display for TargetTemperature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid temperature {0}")]
pub struct InvalidTemperature(pub f64);

impl TryFrom<f64> for TargetTemperature {
    type Error = InvalidTemperature;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() {
            Ok(TargetTemperature::new(value))
        } else {
            Err(InvalidTemperature(value))
        }
    }
}

impl From<TargetTemperature> for f64 {
    fn from(temp: TargetTemperature) -> Self {
        temp.0
    }
}

impl FromStr for TargetTemperature {
    type Err = InvalidTemperature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .map_err(|_| InvalidTemperature(f64::NAN))
            .and_then(TargetTemperature::try_from)
    }
}
