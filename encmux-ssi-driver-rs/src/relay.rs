//! Cycle-block publisher toward the downstream bus master.

use embedded_hal_async::spi::SpiBus;

/// Publishes the assembled cycle block on the relay-side SPI interface.
///
/// The block is `channel_count × 16` bits, each word least-significant
/// byte first, with no header, length prefix, or checksum — the external
/// master knows the channel count a priori. One bulk transfer per cycle;
/// there is no queuing, so the previous block stays visible to the master
/// until the next publish overwrites it.
///
/// The hardware is expected to be configured as an SPI slave; the write
/// completes when the master has clocked the block out.
pub struct Relay<SPI> {
    spi: SPI,
}

impl<SPI> Relay<SPI>
where
    SPI: SpiBus<u8>,
{
    /// Create a relay publisher.
    ///
    /// # Arguments
    /// * `spi` — relay-side SPI peripheral (takes ownership for exclusive
    ///   access)
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Publish one cycle block.
    ///
    /// Blocks until the transfer has fully drained to the wire.
    pub async fn publish(&mut self, block: &[u8]) -> Result<(), SPI::Error> {
        self.spi.write(block).await?;
        self.spi.flush().await
    }
}
