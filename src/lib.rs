#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod control_word;
pub mod crc;
pub mod device;
pub mod eeprom;
pub mod interface;
pub mod motor;
pub mod registers;

// Re-export main types
pub use control_word::{ControlWord, DataLength};
pub use crc::{CRC8_INIT, CRC8_POLY, Crc8};
pub use device::{DriverConfig, Mcf8316aDriver};
pub use eeprom::{EepromCommit, EepromOperation, EepromState};
pub use interface::{I2cInterface, NoDebug};
pub use motor::{
    AlgorithmState, BusMonitor, Direction, FaultStatus, MotorParameters, SpeedProfile, SpeedRange,
};

/// Factory default 7-bit I2C target address of the MCF8316A (0x01)
///
/// The address is stored in EEPROM and can be changed on the device. Use
/// [`I2cInterface::default()`] for this configuration.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x01;

/// Number of speed profiles addressable through [`Mcf8316aDriver::set_speed_profile`]
pub const SPEED_PROFILE_COUNT: u8 = 5;

/// Driver errors
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device (NACK, arbitration loss, short read)
    Bus(E),
    /// CRC-8 of a received payload did not match its trailing CRC byte
    Crc {
        /// CRC computed over the received data bytes
        computed: u8,
        /// CRC byte sent by the device
        received: u8,
    },
    /// `DEVICE_ID` read back as 0x0000 or 0xFFFF (contains the value read)
    InvalidDevice(u16),
    /// Invalid configuration parameter
    InvalidConfig,
    /// Speed profile index out of range (contains the rejected index)
    InvalidProfile(u8),
    /// Register width not expressible as a control word data length
    UnsupportedWidth(u32),
    /// EEPROM save/load did not report completion in time
    EepromTimeout {
        /// Time spent polling before giving up, in milliseconds
        waited_ms: u32,
    },
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
