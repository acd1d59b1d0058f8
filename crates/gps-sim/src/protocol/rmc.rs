/// RMC: Recommended Minimum Navigation Information.
///
/// ```text
/// $GPRMC,hhmmss.ffffff,A,ddmm.mmmm,N,dddmm.mmmm,W,s.ss,c.cc,ddmmyy,*CC<CR><LF>
/// ```
///
/// Fields after the identifier: UTC time, status, latitude + hemisphere, longitude +
/// hemisphere, speed over ground (knots), course over ground (degrees true), UTC date, and
/// magnetic variation, which we never report and always leave empty.
///
/// Reference: <https://www.sparkfun.com/datasheets/GPS/NMEA%20Reference%20Manual1.pdf>
use std::fmt;

use tracing::trace;

use super::{nmea, FixMsg};
use crate::{coord::dms, fix::NavigationFix, TGResult};

pub const SENTENCE_ID: &str = "RMC";

/// An encoded RMC sentence, CRLF included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rmc {
    sentence: String,
}

impl Rmc {
    pub fn as_str(&self) -> &str {
        &self.sentence
    }
}

impl FixMsg for Rmc {
    fn from_fix(fix: &NavigationFix) -> TGResult<Self> {
        Ok(Self {
            sentence: encode_rmc(fix)?,
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.sentence.clone().into_bytes()
    }
}

/// Sentence text without the trailing CRLF.
impl fmt::Display for Rmc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentence.trim_end())
    }
}

/// Encode a fix as a complete, checksummed `$GPRMC` sentence.
pub fn encode_rmc(fix: &NavigationFix) -> TGResult<String> {
    fix.validate()?;

    let lat_dir = if fix.latitude_deg >= 0.0 { 'N' } else { 'S' };
    let lon_dir = if fix.longitude_deg >= 0.0 { 'E' } else { 'W' };

    let body = format!(
        "{}{},{},{},{},{},{},{},{:.2},{},{},",
        nmea::TALKER_GPS,
        SENTENCE_ID,
        fix.timestamp.format("%H%M%S%.6f"),
        fix.status,
        format_angle(fix.latitude_deg, 2)?,
        lat_dir,
        format_angle(fix.longitude_deg, 3)?,
        lon_dir,
        fix.speed_knots,
        format_course(fix.course_deg),
        fix.timestamp.format("%d%m%y"),
    );
    trace!("rmc body: {}", body);
    nmea::frame(&body)
}

/// `D..DMM.MMMM` for the absolute value of `deg`, degrees zero padded to `deg_width`.
///
/// A minutes value that rounds up to `60.0000` carries into the degree field.
fn format_angle(deg: f64, deg_width: usize) -> TGResult<String> {
    let parts = dms(deg)?;
    let minutes = format!("{:07.4}", parts.decimal_minutes());
    let (degrees, minutes) = if minutes == "60.0000" {
        (parts.degrees as u32 + 1, "00.0000".to_string())
    } else {
        (parts.degrees as u32, minutes)
    };
    Ok(format!("{:0width$}{}", degrees, minutes, width = deg_width))
}

/// Course to two decimals, `360.00` wrapped back to `0.00`.
fn format_course(course_deg: f64) -> String {
    let course = format!("{:.2}", course_deg);
    if course == "360.00" {
        "0.00".to_string()
    } else {
        course
    }
}
