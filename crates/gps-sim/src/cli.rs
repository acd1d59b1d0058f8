/// Command line handling for the `gps-sim` binary.
///
/// Options take their value either as the next argument (`--port 10110`) or inline
/// (`--port=10110`). Anything not starting with `--` is positional, so negative coordinates such
/// as `-0.1` need no escaping.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{
    coord::{validate_lat, validate_lon, Heading},
    fix::{FixStatus, NavigationFix},
    Error, TGResult,
};

pub const USAGE: &str = "\
usage: gps-sim [OPTIONS] LAT_DEG LON_DEG

Send NMEA 0183 RMC sentences for a fixed position over UDP.

arguments:
  LAT_DEG              latitude in decimal degrees, negative is south
  LON_DEG              longitude in decimal degrees, negative is west

options:
  --heading-deg DEG    heading in degrees true (default: 0.0)
  --host HOST          host to send NMEA sentences to (default: 127.0.0.1)
  --port PORT          port to send NMEA sentences to (default: 10110)
  --speed-knots KN     reported speed over ground (default: 0.1)
  --interval-ms MS     time between sentences (default: 1000)
  --count N            stop after N sentences (default: run forever)
  --invalid            report status V (receiver warning) instead of A
  --underway           move along the heading at the reported speed
  -h, --help           print this help
";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 10110;
/// Some consumers (OpenCPN) ignore the course when speed is zero.
pub const DEFAULT_SPEED_KNOTS: f64 = 0.1;
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub heading_deg: f64,
    pub host: String,
    pub port: u16,
    pub speed_knots: f64,
    pub interval_ms: u32,
    pub count: Option<u64>,
    pub invalid: bool,
    pub underway: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            lat_deg: 0.0,
            lon_deg: 0.0,
            heading_deg: 0.0,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            speed_knots: DEFAULT_SPEED_KNOTS,
            interval_ms: DEFAULT_INTERVAL_MS,
            count: None,
            invalid: false,
            underway: false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
}

impl Args {
    /// Starting fix described by these arguments.
    pub fn initial_fix(&self, now: DateTime<Utc>) -> TGResult<NavigationFix> {
        let fix = NavigationFix {
            timestamp: now,
            latitude_deg: self.lat_deg,
            longitude_deg: self.lon_deg,
            status: if self.invalid {
                FixStatus::Invalid
            } else {
                FixStatus::Valid
            },
            speed_knots: self.speed_knots,
            course_deg: self.heading_deg,
        };
        fix.validate()?;
        Ok(fix)
    }
}

fn arg_error(msg: impl Into<String>) -> Error {
    Error::ArgumentError(msg.into())
}

fn parse_value<T>(name: &str, value: &str) -> TGResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| arg_error(format!("invalid value {value:?} for {name}: {e}")))
}

/// Parse arguments, program name excluded.
pub fn parse<I, A>(args: I) -> TGResult<Command>
where
    I: IntoIterator<Item = A>,
    A: Into<String>,
{
    let mut out = Args::default();
    let mut positional = Vec::new();
    let mut iter = args.into_iter().map(Into::into);

    while let Some(arg) = iter.next() {
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        }
        if !arg.starts_with("--") {
            positional.push(arg);
            continue;
        }
        let opt = &arg[2..];
        let (name, inline) = match opt.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (opt, None),
        };

        match name {
            "invalid" | "underway" => {
                if inline.is_some() {
                    return Err(arg_error(format!("--{name} takes no value")));
                }
                if name == "invalid" {
                    out.invalid = true;
                } else {
                    out.underway = true;
                }
            }
            "heading-deg" | "host" | "port" | "speed-knots" | "interval-ms" | "count" => {
                let value = match inline {
                    Some(v) => v,
                    None => iter
                        .next()
                        .ok_or_else(|| arg_error(format!("--{name} requires a value")))?,
                };
                let opt_name = format!("--{name}");
                match name {
                    "heading-deg" => out.heading_deg = parse_value(&opt_name, &value)?,
                    "host" => out.host = value,
                    "port" => out.port = parse_value(&opt_name, &value)?,
                    "speed-knots" => out.speed_knots = parse_value(&opt_name, &value)?,
                    "interval-ms" => out.interval_ms = parse_value(&opt_name, &value)?,
                    _ => out.count = Some(parse_value(&opt_name, &value)?),
                }
            }
            _ => return Err(arg_error(format!("unknown option {arg:?}"))),
        }
    }

    let [lat, lon] = positional.as_slice() else {
        return Err(arg_error(format!(
            "expected LAT_DEG and LON_DEG, got {} positional argument(s)",
            positional.len()
        )));
    };
    out.lat_deg = parse_value("LAT_DEG", lat)?;
    out.lon_deg = parse_value("LON_DEG", lon)?;

    validate(&mut out)?;
    Ok(Command::Run(out))
}

fn validate(args: &mut Args) -> TGResult<()> {
    validate_lat(args.lat_deg).map_err(|e| arg_error(e.to_string()))?;
    validate_lon(args.lon_deg).map_err(|e| arg_error(e.to_string()))?;
    args.heading_deg = Heading::new(args.heading_deg)
        .map_err(|e| arg_error(e.to_string()))?
        .into();
    if !(args.speed_knots.is_finite() && args.speed_knots >= 0.0) {
        return Err(arg_error(format!("invalid speed {} kn", args.speed_knots)));
    }
    if args.port == 0 {
        return Err(arg_error("port must be between 1 and 65535"));
    }
    if args.interval_ms == 0 {
        return Err(arg_error("interval must be at least 1 ms"));
    }
    if args.host.is_empty() {
        return Err(arg_error("host must not be empty"));
    }
    Ok(())
}
