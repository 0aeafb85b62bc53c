//! CRC-8 used by the MCF8316A I2C protocol
//!
//! When `CRC_EN` is set in the control word, every payload carries one
//! trailing CRC byte computed over the data bytes. The device uses a plain
//! MSB-first CRC-8: polynomial 0x07 (x^8 + x^2 + x + 1), initial value
//! 0xFF, no reflection and no final XOR.

/// Standard MCF8316A CRC-8 polynomial (x^8 + x^2 + x + 1)
pub const CRC8_POLY: u8 = 0x07;

/// CRC-8 initial register value
pub const CRC8_INIT: u8 = 0xFF;

/// Bitwise CRC-8 calculator with a configurable polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc8 {
    poly: u8,
    init: u8,
}

impl Default for Crc8 {
    fn default() -> Self {
        Self::MCF8316A
    }
}

impl Crc8 {
    /// Parameters used by the MCF8316A
    pub const MCF8316A: Self = Self::new(CRC8_POLY, CRC8_INIT);

    /// Create a calculator for `poly` starting from `init`
    #[must_use]
    pub const fn new(poly: u8, init: u8) -> Self {
        Self { poly, init }
    }

    /// Polynomial in normal (non-reflected) form
    #[must_use]
    pub const fn poly(&self) -> u8 {
        self.poly
    }

    /// Compute the CRC of `data`
    #[must_use]
    pub const fn checksum(&self, data: &[u8]) -> u8 {
        let mut crc = self.init;
        let mut i = 0;
        while i < data.len() {
            crc ^= data[i];
            let mut bit = 0;
            while bit < 8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ self.poly
                } else {
                    crc << 1
                };
                bit += 1;
            }
            i += 1;
        }
        crc
    }

    /// Check `data` against an expected CRC byte
    #[must_use]
    pub const fn verify(&self, data: &[u8], expected: u8) -> bool {
        self.checksum(data) == expected
    }
}

/// Compute the MCF8316A CRC-8 of `data`
#[must_use]
pub const fn crc8(data: &[u8]) -> u8 {
    Crc8::MCF8316A.checksum(data)
}
