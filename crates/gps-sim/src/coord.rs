/// Coordinate types and utilities.
use crate::{Error, TGResult};

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

/// Absolute value of an angle split into whole degrees, whole minutes and fractional seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dms {
    pub degrees: u16,
    pub minutes: u8,
    pub seconds: f64,
}

impl Dms {
    /// Minutes and seconds folded into a single decimal-minutes value, as NMEA wants it.
    pub fn decimal_minutes(&self) -> f64 {
        self.minutes as f64 + self.seconds / 60.0
    }

    /// Reassemble the (absolute) decimal degrees.
    pub fn to_degrees(&self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

/// Split decimal degrees into degrees, minutes and seconds. Operates on the absolute value; the
/// caller picks the hemisphere from the sign.
///
/// Fails for non-finite input or anything beyond +-180 degrees.
pub fn dms(value: f64) -> TGResult<Dms> {
    if !(-180.0..=180.0).contains(&value) {
        return Err(Error::InvalidFix(format!("angle {value}")));
    }
    let value_abs = value.abs();
    let degrees = value_abs.floor();
    let minutes = (value_abs - degrees) * 60.0;
    if minutes >= 60.0 {
        // rounding carried a full degree
        return Ok(Dms {
            degrees: degrees as u16 + 1,
            minutes: 0,
            seconds: 0.0,
        });
    }
    let whole_minutes = minutes.floor();
    Ok(Dms {
        degrees: degrees as u16,
        minutes: whole_minutes as u8,
        seconds: (minutes - whole_minutes) * 60.0,
    })
}

pub fn validate_lat(lat: f64) -> TGResult<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidFix(format!("latitude {lat}")));
    }
    Ok(())
}

pub fn validate_lon(lon: f64) -> TGResult<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidFix(format!("longitude {lon}")));
    }
    Ok(())
}

pub fn meter_per_deg_lat(lat_deg: f64) -> TGResult<f64> {
    validate_lat(lat_deg)?;
    // num meters to travel 1 degree on N-S line changes with latitude:
    // 111132.92 - 559.82 * cos(2 * lat_rad) + 1.175 * cos(4 * lat_rad) - 0.0023 * cos(6 * lat_rad)
    // Source: https://en.wikipedia.org/wiki/Geographic_coordinate_system
    let lat_rad = lat_deg.to_radians();
    Ok(
        111132.92 - 559.82 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
            - 0.0023 * (6.0 * lat_rad).cos(),
    )
}

pub fn meter_per_deg_lon(lat_deg: f64) -> TGResult<f64> {
    validate_lat(lat_deg)?;
    let lat_rad = lat_deg.to_radians();

    // Meters per degree of longitude on an E-W line depends on the circle of latitude.
    // m = 111412.84 * cos(lat_rad) - 93.5 * cos(3 * lat_rad) + 0.118 * cos(5 * lat_rad)
    Ok(
        111412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos()
            + 0.118 * (5.0 * lat_rad).cos(),
    )
}

/// Wrap a longitude back into [-180, 180].
pub fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// True heading in degrees, always in [0, 360).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Heading(f64);

impl Heading {
    pub fn new(deg: f64) -> TGResult<Self> {
        if !deg.is_finite() {
            return Err(Error::InvalidFix(format!("heading {deg}")));
        }
        let mut h = Self(0.0);
        h.rot(deg);
        Ok(h)
    }

    pub fn rot(&mut self, deg_cw: f64) {
        let deg = (self.0 + deg_cw).rem_euclid(360.0);
        // rem_euclid of a tiny negative value rounds to 360.0
        self.0 = if deg >= 360.0 { 0.0 } else { deg };
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    pub fn to_radians(&self) -> f64 {
        self.0.to_radians()
    }
}

impl From<Heading> for f64 {
    fn from(h: Heading) -> f64 {
        h.0
    }
}
