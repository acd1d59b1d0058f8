pub mod nmea;
pub mod rmc;

use crate::{fix::NavigationFix, TGResult};

/// Trait implemented by protocols for generating sentences from a navigation fix.
pub trait FixMsg: Sized {
    fn from_fix(fix: &NavigationFix) -> TGResult<Self>;
    fn to_bytes(&self) -> Vec<u8>;
}
