//! Room temperature model advanced once per tick.
//!
//! While powered the unit only actively drives `Cool` and `Heat` toward the
//! target; the other modes hold the room where it is. While unpowered the room
//! drifts toward the outdoor temperature.

use std::time::Duration;

use crate::state::types::ACMode;
use crate::state::DeviceState;

pub const TICK_RATE: Duration = Duration::from_secs(2);

/// Fraction of the indoor/outdoor gap closed per tick while unpowered.
const DRIFT_RATE: f64 = 0.05;

/// Degrees moved per tick, keyed by `(turbo, eco)`. Sleep does not take part.
const EFFICIENCY: [((bool, bool), f64); 4] = [
    ((true, true), 0.4),
    ((true, false), 0.4),
    ((false, true), 0.1),
    ((false, false), 0.2),
];

pub fn efficiency(turbo: bool, eco: bool) -> f64 {
    EFFICIENCY
        .iter()
        .find(|(modifiers, _)| *modifiers == (turbo, eco))
        .map(|(_, rate)| *rate)
        .unwrap_or(0.2)
}

/// Rounds the exact decimal value of `value` to one place, ties away from zero.
fn round_tenth(value: f64) -> f64 {
    // exact ties are odd multiples of 0.25, where `{:.1}` would round to even
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0).round() / 10.0;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Room temperature after one tick from `state`, rounded to one decimal.
pub fn next_room_temp(state: &DeviceState) -> f64 {
    let room = state.room_temp;
    let target = state.target_temp.celsius();

    let next = if state.power {
        let rate = efficiency(state.turbo_mode, state.eco_mode);
        match state.mode {
            ACMode::Cool if room > target => target.max(room - rate),
            ACMode::Heat if room < target => target.min(room + rate),
            _ => room,
        }
    } else {
        room + (state.outdoor_temp - room) * DRIFT_RATE
    };

    round_tenth(next)
}

/// Advances `state` by one tick. Only `room_temp` changes.
pub fn tick(state: &mut DeviceState) {
    let next = next_room_temp(state);
    trace!("room temperature {} -> {}", state.room_temp, next);
    state.room_temp = next;
}
