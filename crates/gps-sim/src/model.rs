/// Simulated receiver models, used to generate a stream of navigation fixes.
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    coord::{meter_per_deg_lat, meter_per_deg_lon, wrap_lon, Heading},
    fix::NavigationFix,
    TGResult,
};

pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

/// API for stream of navigation fixes.
pub trait FixStream {
    /// Fix as observed at `now`.
    fn next_fix(&mut self, now: DateTime<Utc>) -> TGResult<NavigationFix>;
}

/// Time between emitted sentences, with [`Default`] and conversion from [`Duration`] for
/// convenience.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeDelta {
    msec: u32,
}

impl Default for TimeDelta {
    fn default() -> Self {
        Self { msec: 1000 }
    }
}

impl From<Duration> for TimeDelta {
    fn from(d: Duration) -> Self {
        Self {
            msec: d.as_millis() as u32,
        }
    }
}

impl TimeDelta {
    pub fn from_millis(msec: u32) -> Self {
        Self { msec }
    }

    pub fn seconds(&self) -> f64 {
        self.msec as f64 / 1000.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.msec as u64)
    }
}

//  ____  _        _   _
// / ___|| |_ __ _| |_(_) ___  _ __   __ _ _ __ _   _
// \___ \| __/ _` | __| |/ _ \| '_ \ / _` | '__| | | |
//  ___) | || (_| | |_| | (_) | | | | (_| | |  | |_| |
// |____/ \__\__,_|\__|_|\___/|_| |_|\__,_|_|   \__, |
//                                              |___/

/// Receiver that never moves: same position, speed and course, fresh timestamp.
pub struct Stationary {
    fix: NavigationFix,
}

impl Stationary {
    pub fn new(fix: NavigationFix) -> TGResult<Self> {
        fix.validate()?;
        Ok(Self { fix })
    }
}

impl FixStream for Stationary {
    fn next_fix(&mut self, now: DateTime<Utc>) -> TGResult<NavigationFix> {
        Ok(self.fix.at(now))
    }
}

//  ____                 _   ____           _              _
// |  _ \  ___  __ _  __| | |  _ \ ___  ___| | _____  _ __ (_)_ __   __ _
// | | | |/ _ \/ _` |/ _` | | |_) / _ \/ __| |/ / _ \| '_ \| | '_ \ / _` |
// | |_| |  __/ (_| | (_| | |  _ <  __/ (__|   < (_) | | | | | | | | (_| |
// |____/ \___|\__,_|\__,_| |_| \_\___|\___|_|\_\___/|_| |_|_|_| |_|\__, |
//                                                                  |___/

/// Receiver moving at constant speed and course. Position is advanced on every fix by the time
/// elapsed since the previous one.
pub struct DeadReckoning {
    fix: NavigationFix,
    heading: Heading,
    last_update: Option<DateTime<Utc>>,
}

impl DeadReckoning {
    pub fn new(start: NavigationFix) -> TGResult<Self> {
        start.validate()?;
        let heading = Heading::new(start.course_deg)?;
        Ok(Self {
            fix: start,
            heading,
            last_update: None,
        })
    }

    fn advance(&mut self, elapsed_s: f64) -> TGResult<()> {
        let dist_m = self.fix.speed_knots * METERS_PER_NAUTICAL_MILE / 3600.0 * elapsed_s;
        let north_m = dist_m * self.heading.to_radians().cos();
        let east_m = dist_m * self.heading.to_radians().sin();

        let lat = self.fix.latitude_deg;
        let delta_lat = north_m / meter_per_deg_lat(lat)?;
        // longitude is meaningless at the poles
        let m_per_lon = meter_per_deg_lon(lat)?;
        let delta_lon = if m_per_lon > 1.0 {
            east_m / m_per_lon
        } else {
            0.0
        };
        debug!(
            "delta_lat: {:.6} ({:.2} m), delta_lon: {:.6} ({:.2} m)",
            delta_lat, north_m, delta_lon, east_m
        );

        self.fix.latitude_deg = (lat + delta_lat).clamp(-90.0, 90.0);
        self.fix.longitude_deg = wrap_lon(self.fix.longitude_deg + delta_lon);
        Ok(())
    }
}

impl FixStream for DeadReckoning {
    fn next_fix(&mut self, now: DateTime<Utc>) -> TGResult<NavigationFix> {
        if let Some(last) = self.last_update {
            let elapsed_us = (now - last).num_microseconds().unwrap_or(0);
            if elapsed_us > 0 {
                self.advance(elapsed_us as f64 / 1e6)?;
            }
        }
        self.last_update = Some(now);
        Ok(self.fix.at(now))
    }
}
