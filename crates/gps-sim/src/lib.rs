/// Simulated GPS receiver library.
///
/// *Models* produce a stream of navigation fixes by implementing [`model::FixStream`].
/// *Protocols* turn a fix into a specific sentence format, by implementing
/// [`protocol::FixMsg`]. The [`transmit::Transmitter`] ties the two together and pushes the
/// encoded sentences through a [`transmit::Transport`].
use std::sync::Once;

use thiserror::Error;

pub mod cli;
pub mod coord;
pub mod fix;
pub mod model;
pub mod protocol;
pub mod transmit;

/// Result type for this library
pub type TGResult<T> = std::result::Result<T, Error>;

/// Error type for this library
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid fix: {0}")]
    InvalidFix(String),
    #[error("Invalid sentence: {0}")]
    InvalidSentence(String),
    #[error("Transmission error: {0}")]
    TransmissionError(#[from] std::io::Error),
    #[error("Argument error: {0}")]
    ArgumentError(String),
}

/// Test binary helper to init tracing. This is usually the responsibility of the consumer of the
/// library crate.
pub fn lazy_init_tracing() {
    {
        static INIT: Once = Once::new();
        &INIT
    }
    .call_once(|| {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    });
}
