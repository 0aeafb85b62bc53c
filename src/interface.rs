//! Bus interface for the MCF8316A
//!
//! This module implements the `device-driver` register traits on top of an
//! `embedded-hal` I2C bus. One register access is two bus transactions:
//!
//! 1. **Command phase**: a 3-byte write carrying the [`ControlWord`]
//! 2. **Data phase**: a read or write of the little-endian payload, followed
//!    by a CRC-8 byte when CRC is enabled
//!
//! The interface also holds the per-device session state: target address,
//! CRC flag and an optional text debug sink.

use core::fmt::Write;

use crate::control_word::{ControlWord, DataLength};
use crate::crc::Crc8;
use crate::{DEFAULT_I2C_ADDRESS, Error};
use device_driver::RegisterInterface;

/// Delay the device needs between the command and data phases
pub const INTER_PHASE_DELAY_US: u32 = 100;

/// Largest payload on the wire: 64-bit data plus CRC
const MAX_PAYLOAD_LEN: usize = 9;

/// Debug sink placeholder for interfaces without text output
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoDebug;

impl Write for NoDebug {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Ok(())
    }
}

/// I2C interface for the MCF8316A
///
/// `D` provides the inter-phase delay. `W` is an optional
/// [`core::fmt::Write`] sink receiving one hex line per control word, written
/// value and decoded result.
pub struct I2cInterface<I2C, D, W = NoDebug> {
    i2c: I2C,
    delay: D,
    address: u8,
    crc_enabled: bool,
    debug: Option<W>,
}

impl<I2C, D> I2cInterface<I2C, D> {
    /// Create a new I2C interface with the factory default address (0x01)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `delay` - Delay provider used between command and data phases
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c, delay);
    /// let mut motor = Mcf8316aDriver::new(interface)?;
    /// ```
    pub const fn default(i2c: I2C, delay: D) -> Self {
        Self::new(i2c, delay, DEFAULT_I2C_ADDRESS)
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `delay` - Delay provider used between command and data phases
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            crc_enabled: false,
            debug: None,
        }
    }
}

impl<I2C, D, W> I2cInterface<I2C, D, W> {
    /// Replace the debug sink type, attaching `sink`
    pub fn with_debug<W2: Write>(self, sink: W2) -> I2cInterface<I2C, D, W2> {
        I2cInterface {
            i2c: self.i2c,
            delay: self.delay,
            address: self.address,
            crc_enabled: self.crc_enabled,
            debug: Some(sink),
        }
    }

    /// Attach a debug sink
    pub fn enable_debug(&mut self, sink: W) {
        self.debug = Some(sink);
    }

    /// Detach the debug sink, returning it
    pub fn disable_debug(&mut self) -> Option<W> {
        self.debug.take()
    }

    /// Whether a debug sink is attached
    pub const fn debug_enabled(&self) -> bool {
        self.debug.is_some()
    }

    /// Current I2C target address
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Change the I2C target address used for subsequent transactions
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Whether payloads carry a CRC byte
    pub const fn crc_enabled(&self) -> bool {
        self.crc_enabled
    }

    /// Enable or disable payload CRC
    pub fn set_crc_enabled(&mut self, enabled: bool) {
        self.crc_enabled = enabled;
    }

    pub(crate) fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Consume the interface and return the I2C peripheral and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D, W: Write> I2cInterface<I2C, D, W> {
    fn payload_len(&self, length: DataLength) -> usize {
        length.byte_count() + usize::from(self.crc_enabled)
    }

    fn debug_line(&mut self, message: &str) {
        if let Some(sink) = self.debug.as_mut() {
            let _ = writeln!(sink, "{message}");
        }
    }

    /// Write a `label: 0x..` line to the debug sink
    pub(crate) fn debug_value(&mut self, label: &str, value: u64) {
        if let Some(sink) = self.debug.as_mut() {
            let _ = writeln!(sink, "{label}: 0x{value:X}");
        }
    }

    fn debug_hex(&mut self, op: &str, size_bits: u32, label: &str, value: u64) {
        if let Some(sink) = self.debug.as_mut() {
            let _ = writeln!(sink, "{op}{size_bits} {label}: 0x{value:X}");
        }
    }

    /// Resolve the data length and check the caller buffer against it
    fn start<E>(
        &mut self,
        is_read: bool,
        address: u32,
        size_bits: u32,
        data_len: usize,
    ) -> Result<(ControlWord, DataLength), Error<E>> {
        let length = DataLength::from_size_bits(size_bits)
            .filter(|length| length.byte_count() == data_len)
            .ok_or(Error::UnsupportedWidth(size_bits))?;
        let word = ControlWord::new(is_read, self.crc_enabled, length, address);

        #[cfg(feature = "defmt")]
        defmt::trace!("MCF8316A control word {=u32:#x}", word.bits());

        let op = if is_read { "Read" } else { "Write" };
        self.debug_hex(op, size_bits, "Control Word", u64::from(word.bits()));
        Ok((word, length))
    }

    /// Copy `data` into `buffer`, appending the CRC byte when enabled
    fn encode_payload(&mut self, size_bits: u32, data: &[u8], buffer: &mut [u8]) -> usize {
        self.debug_hex("Write", size_bits, "Data", le_value(data));
        buffer[..data.len()].copy_from_slice(data);
        if self.crc_enabled {
            buffer[data.len()] = Crc8::MCF8316A.checksum(data);
            data.len() + 1
        } else {
            data.len()
        }
    }

    /// Validate the CRC of a received payload and hand out the data bytes
    fn decode_payload<E>(
        &mut self,
        size_bits: u32,
        payload: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Error<E>> {
        let (data, trailer) = payload.split_at(read_data.len());
        if let Some(&received) = trailer.first() {
            let computed = Crc8::MCF8316A.checksum(data);
            if computed != received {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "MCF8316A CRC mismatch: computed {=u8:#x}, received {=u8:#x}",
                    computed,
                    received
                );

                self.debug_line("CRC mismatch!");
                return Err(Error::Crc { computed, received });
            }
        }
        read_data.copy_from_slice(data);
        self.debug_hex("Read", size_bits, "Result", le_value(data));
        Ok(())
    }
}

/// Little-endian bytes as an integer, for debug output
fn le_value(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .rev()
        .fold(0, |acc, &byte| (acc << 8) | u64::from(byte))
}

impl<I2C, D, W, E> RegisterInterface for I2cInterface<I2C, D, W>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
    D: embedded_hal::delay::DelayNs,
    W: Write,
{
    type Error = Error<E>;
    type AddressType = u32;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let (word, length) = self.start::<E>(true, address, size_bits, read_data.len())?;
        self.i2c.write(self.address, &word.to_bytes())?;
        self.delay.delay_us(INTER_PHASE_DELAY_US);

        let mut buffer = [0u8; MAX_PAYLOAD_LEN];
        let payload = &mut buffer[..self.payload_len(length)];
        self.i2c.read(self.address, payload)?;
        self.decode_payload(size_bits, payload, read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let (word, _) = self.start::<E>(false, address, size_bits, write_data.len())?;
        self.i2c.write(self.address, &word.to_bytes())?;
        self.delay.delay_us(INTER_PHASE_DELAY_US);

        let mut buffer = [0u8; MAX_PAYLOAD_LEN];
        let len = self.encode_payload(size_bits, write_data, &mut buffer);
        self.i2c.write(self.address, &buffer[..len])?;
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<I2C, D, W, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C, D, W>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
    D: embedded_hal_async::delay::DelayNs,
    W: Write,
{
    type Error = Error<E>;
    type AddressType = u32;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let (word, length) = self.start::<E>(true, address, size_bits, read_data.len())?;
        self.i2c.write(self.address, &word.to_bytes()).await?;
        self.delay.delay_us(INTER_PHASE_DELAY_US).await;

        let mut buffer = [0u8; MAX_PAYLOAD_LEN];
        let payload = &mut buffer[..self.payload_len(length)];
        self.i2c.read(self.address, payload).await?;
        self.decode_payload(size_bits, payload, read_data)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let (word, _) = self.start::<E>(false, address, size_bits, write_data.len())?;
        self.i2c.write(self.address, &word.to_bytes()).await?;
        self.delay.delay_us(INTER_PHASE_DELAY_US).await;

        let mut buffer = [0u8; MAX_PAYLOAD_LEN];
        let len = self.encode_payload(size_bits, write_data, &mut buffer);
        self.i2c.write(self.address, &buffer[..len]).await?;
        Ok(())
    }
}
