/// NMEA 0183 sentence framing.
///
/// A sentence is `$<body>*<checksum>\r\n`, where the body starts with the talker and sentence
/// identifier (e.g. `GPRMC`) followed by comma separated fields, and the checksum is the XOR of
/// every body byte written as two uppercase hex digits.
use crate::{Error, TGResult};

/// Talker identifier for a GPS receiver.
pub const TALKER_GPS: &str = "GP";

/// NMEA checksum: XOR of all bytes between `$` and `*`.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

pub fn checksum_hex(body: &str) -> String {
    format!("{:02X}", checksum(body))
}

/// Wrap a sentence body in `$`, `*<checksum>` and CRLF.
pub fn frame(body: &str) -> TGResult<String> {
    if let Some(c) = body.chars().find(|c| matches!(c, '$' | '*' | '\r' | '\n')) {
        return Err(Error::InvalidSentence(format!(
            "body contains reserved character {c:?}: {body:?}"
        )));
    }
    Ok(format!("${}*{}\r\n", body, checksum_hex(body)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reference_checksum() {
        let body = "GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W";
        assert_eq!(checksum(body), 0x6A);
        assert_eq!(checksum_hex(body), "6A");
    }

    #[test]
    fn test_checksum_hex_is_padded() {
        let test_cases = [
            ("", "00"),
            ("A", "41"),
            ("AA", "00"),
            ("AB", "03"),
            ("GNTXT,01,01,02,upcounting timer is at 1", "0C"),
        ];
        for (body, expected) in test_cases.iter() {
            assert_eq!(checksum_hex(body), *expected, "checksum_hex({:?})", body);
        }
    }

    #[test]
    fn test_frame() {
        assert_eq!(frame("AB").unwrap(), "$AB*03\r\n");
        for body in ["GP$RMC", "GPRMC*", "GPRMC\r", "GPRMC\n"] {
            assert!(matches!(frame(body), Err(Error::InvalidSentence(_))));
        }
    }
}
