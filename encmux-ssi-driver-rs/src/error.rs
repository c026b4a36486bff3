//! Error types for the encoder driver.

use core::fmt;

/// Errors that can occur when communicating with the encoder bus.
#[derive(Debug)]
pub enum SsiError<Spi, Pin> {
    /// Underlying SPI bus error.
    Spi(Spi),

    /// Chip-select pin error.
    Pin(Pin),

    /// Channel index out of valid range (must be below the bank's channel
    /// count).
    InvalidChannel,
}

impl<Spi: fmt::Debug, Pin: fmt::Debug> fmt::Display for SsiError<Spi, Pin> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SsiError::Spi(e) => write!(f, "SPI error: {:?}", e),
            SsiError::Pin(e) => write!(f, "chip-select pin error: {:?}", e),
            SsiError::InvalidChannel => write!(f, "invalid channel index"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<Spi: defmt::Format, Pin: defmt::Format> defmt::Format for SsiError<Spi, Pin> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SsiError::Spi(e) => defmt::write!(f, "SPI error: {}", e),
            SsiError::Pin(e) => defmt::write!(f, "chip-select pin error: {}", e),
            SsiError::InvalidChannel => defmt::write!(f, "invalid channel index"),
        }
    }
}
