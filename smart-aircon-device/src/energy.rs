use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq)]
pub struct EnergySample {
    pub time: &'static str,
    /// kWh
    pub usage: f64,
}

impl Display for EnergySample {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.1} kWh", self.time, self.usage)
    }
}

pub const DAILY_USAGE: [EnergySample; 7] = [
    EnergySample { time: "00:00", usage: 0.5 },
    EnergySample { time: "04:00", usage: 0.4 },
    EnergySample { time: "08:00", usage: 1.2 },
    EnergySample { time: "12:00", usage: 2.5 },
    EnergySample { time: "16:00", usage: 2.1 },
    EnergySample { time: "20:00", usage: 1.8 },
    EnergySample { time: "23:59", usage: 0.9 },
];

pub fn total_usage() -> f64 {
    DAILY_USAGE.iter().map(|sample| sample.usage).sum()
}
