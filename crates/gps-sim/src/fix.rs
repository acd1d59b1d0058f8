/// Navigation fix: everything a receiver reports for one instant.
use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    coord::{validate_lat, validate_lon},
    Error, TGResult,
};

/// Receiver status, NMEA `A` (data valid) or `V` (navigation receiver warning).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum FixStatus {
    #[default]
    Valid,
    Invalid,
}

impl FixStatus {
    pub fn as_char(&self) -> char {
        match self {
            FixStatus::Valid => 'A',
            FixStatus::Invalid => 'V',
        }
    }
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFix {
    pub timestamp: DateTime<Utc>,
    /// Signed decimal degrees, >= 0 is north.
    pub latitude_deg: f64,
    /// Signed decimal degrees, >= 0 is east.
    pub longitude_deg: f64,
    pub status: FixStatus,
    pub speed_knots: f64,
    /// True course over ground, [0, 360).
    pub course_deg: f64,
}

impl NavigationFix {
    /// Copy of this fix stamped with a new time.
    pub fn at(&self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }

    /// Check every field is finite and within its documented range.
    pub fn validate(&self) -> TGResult<()> {
        validate_lat(self.latitude_deg)?;
        validate_lon(self.longitude_deg)?;
        if !(self.speed_knots.is_finite() && self.speed_knots >= 0.0) {
            return Err(Error::InvalidFix(format!("speed {} kn", self.speed_knots)));
        }
        if !(0.0..360.0).contains(&self.course_deg) {
            return Err(Error::InvalidFix(format!("course {} deg", self.course_deg)));
        }
        Ok(())
    }
}
