//! Control word encoding
//!
//! Every MCF8316A register access starts with a 24-bit control word sent
//! before the data phase:
//!
//! | Bits  | Field        | Meaning                              |
//! |-------|--------------|--------------------------------------|
//! | 23    | `OP_R/W`     | 1 = read, 0 = write                  |
//! | 22    | `CRC_EN`     | 1 = payload carries a trailing CRC-8 |
//! | 21:20 | `DLEN`       | 0 = 16-bit, 1 = 32-bit, 2 = 64-bit   |
//! | 19:0  | `MEM_ADDR`   | register address                     |
//!
//! The word goes on the wire most-significant byte first.

/// Read flag (bit 23)
pub const READ_BIT: u32 = 1 << 23;

/// CRC enable flag (bit 22)
pub const CRC_ENABLE_BIT: u32 = 1 << 22;

/// Position of the data length field
pub const DATA_LENGTH_SHIFT: u32 = 20;

/// Mask applied to register addresses (20 bits)
pub const ADDRESS_MASK: u32 = 0x000F_FFFF;

/// Payload width of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataLength {
    /// 16-bit register
    Bits16 = 0,
    /// 32-bit register
    Bits32 = 1,
    /// 64-bit (two consecutive 32-bit registers)
    Bits64 = 2,
}

impl DataLength {
    /// Data length for a register of `size_bits` bits, if the protocol supports it
    #[must_use]
    pub const fn from_size_bits(size_bits: u32) -> Option<Self> {
        match size_bits {
            16 => Some(Self::Bits16),
            32 => Some(Self::Bits32),
            64 => Some(Self::Bits64),
            _ => None,
        }
    }

    /// Two-bit code placed in the `DLEN` field
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Payload size in bytes, excluding the CRC byte
    #[must_use]
    pub const fn byte_count(self) -> usize {
        match self {
            Self::Bits16 => 2,
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

/// A 24-bit MCF8316A control word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlWord(u32);

impl ControlWord {
    /// Build a control word
    ///
    /// Address bits above bit 19 are dropped.
    #[must_use]
    pub const fn new(is_read: bool, crc_enable: bool, length: DataLength, address: u32) -> Self {
        let mut word = 0;
        if is_read {
            word |= READ_BIT;
        }
        if crc_enable {
            word |= CRC_ENABLE_BIT;
        }
        word |= ((length.code() as u32) & 0x03) << DATA_LENGTH_SHIFT;
        word |= address & ADDRESS_MASK;
        Self(word)
    }

    /// Control word for reading `address`
    #[must_use]
    pub const fn read(address: u32, length: DataLength, crc_enable: bool) -> Self {
        Self::new(true, crc_enable, length, address)
    }

    /// Control word for writing `address`
    #[must_use]
    pub const fn write(address: u32, length: DataLength, crc_enable: bool) -> Self {
        Self::new(false, crc_enable, length, address)
    }

    /// Raw 24-bit value
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether this is a read request
    #[must_use]
    pub const fn is_read(self) -> bool {
        self.0 & READ_BIT != 0
    }

    /// Whether the payload carries a CRC byte
    #[must_use]
    pub const fn crc_enabled(self) -> bool {
        self.0 & CRC_ENABLE_BIT != 0
    }

    /// Data length field, `None` for the reserved code 3
    #[must_use]
    pub const fn data_length(self) -> Option<DataLength> {
        match (self.0 >> DATA_LENGTH_SHIFT) & 0x03 {
            0 => Some(DataLength::Bits16),
            1 => Some(DataLength::Bits32),
            2 => Some(DataLength::Bits64),
            _ => None,
        }
    }

    /// 20-bit register address
    #[must_use]
    pub const fn address(self) -> u32 {
        self.0 & ADDRESS_MASK
    }

    /// Wire representation, most-significant byte first
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        let [_, high, mid, low] = self.0.to_be_bytes();
        [high, mid, low]
    }

    /// Decode a control word from its wire representation
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }
}

impl From<ControlWord> for u32 {
    fn from(word: ControlWord) -> Self {
        word.bits()
    }
}
