use structopt::StructOpt;

use smart_aircon_device::state::types::{ACMode, FanSpeed, TargetTemperature};
use smart_aircon_device::state::DeviceState;

/// Overrides for the state the unit starts in.
#[derive(StructOpt, Debug, Clone)]
pub struct InitialState {
    /// Start with the unit switched on
    #[structopt(short, long)]
    pub powered: bool,
    #[structopt(short, long, default_value = "cool")]
    pub mode: ACMode,
    /// Target temperature in °C, clamped to 16-30
    #[structopt(short, long, default_value = "25")]
    pub target: TargetTemperature,
    #[structopt(short, long, default_value = "auto")]
    pub fan: FanSpeed,
    /// Room temperature in °C
    #[structopt(long, default_value = "28")]
    pub room: f64,
    /// Outdoor temperature in °C
    #[structopt(long, default_value = "32")]
    pub outdoor: f64,
    #[structopt(long)]
    pub eco: bool,
    #[structopt(long)]
    pub turbo: bool,
}

impl From<InitialState> for DeviceState {
    fn from(
        InitialState {
            powered,
            mode,
            target,
            fan,
            room,
            outdoor,
            eco,
            turbo,
        }: InitialState,
    ) -> Self {
        DeviceState {
            power: powered,
            mode,
            target_temp: target,
            fan_speed: fan,
            room_temp: room,
            outdoor_temp: outdoor,
            eco_mode: eco,
            turbo_mode: turbo,
            ..DeviceState::default()
        }
    }
}
