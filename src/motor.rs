//! Motor control types and unit conversions
//!
//! The MCF8316A reports and accepts speed as electrical frequency in 0.1 Hz
//! units. Mechanical speed depends on the number of motor pole pairs:
//!
//! ```text
//! register = rpm / 60 * pole_pairs * 10
//! rpm      = register / 10 * 60 / pole_pairs
//! ```
//!
//! # Example
//!
//! ```
//! use mcf8316a::motor::{rpm_to_speed_register, speed_register_to_rpm};
//!
//! assert_eq!(rpm_to_speed_register(1200.0, 2), Some(400));
//! assert_eq!(speed_register_to_rpm(400, 2), 1200.0);
//! ```

/// Default motor pole pair count
pub const DEFAULT_POLE_PAIRS: u8 = 2;

/// Convert mechanical speed to the 0.1 Hz electrical frequency register value
///
/// Returns `None` for negative, non-finite or out-of-range speeds and for a
/// zero pole pair count.
#[must_use]
pub fn rpm_to_speed_register(rpm: f32, pole_pairs: u8) -> Option<u16> {
    if pole_pairs == 0 || !rpm.is_finite() || rpm < 0.0 {
        return None;
    }
    let hz = rpm / 60.0 * f32::from(pole_pairs);
    let raw = libm::truncf(hz * 10.0);
    if raw > f32::from(u16::MAX) {
        return None;
    }
    // Range checked above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let raw = raw as u16;
    Some(raw)
}

/// Convert a 0.1 Hz electrical frequency register value to mechanical RPM
///
/// A zero pole pair count yields 0.0.
#[must_use]
pub fn speed_register_to_rpm(raw: u16, pole_pairs: u8) -> f32 {
    if pole_pairs == 0 {
        return 0.0;
    }
    let hz = f32::from(raw) / 10.0;
    hz * 60.0 / f32::from(pole_pairs)
}

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Forward rotation (`DEV_CTRL` direction bit clear)
    #[default]
    Forward,
    /// Reverse rotation (`DEV_CTRL` direction bit set)
    Reverse,
}

impl Direction {
    /// Value of the `DEV_CTRL` direction bit
    #[must_use]
    pub const fn bit(self) -> bool {
        matches!(self, Self::Reverse)
    }

    /// Direction encoded by a `DEV_CTRL` direction bit
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Reverse } else { Self::Forward }
    }
}

/// Maximum electrical speed range (`CLOSED_LOOP1` bits 15:14)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedRange {
    /// Up to 120 Hz
    Hz120 = 0,
    /// Up to 400 Hz
    Hz400 = 1,
    /// Up to 800 Hz
    Hz800 = 2,
    /// Up to 1200 Hz
    Hz1200 = 3,
}

impl SpeedRange {
    /// Two-bit register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the two-bit register value (upper bits ignored)
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Hz120,
            1 => Self::Hz400,
            2 => Self::Hz800,
            _ => Self::Hz1200,
        }
    }

    /// Maximum electrical frequency in Hz
    #[must_use]
    pub const fn max_hz(self) -> u16 {
        match self {
            Self::Hz120 => 120,
            Self::Hz400 => 400,
            Self::Hz800 => 800,
            Self::Hz1200 => 1200,
        }
    }
}

/// Motor control algorithm state (`ALGO_STATUS` bits 15:13)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlgorithmState {
    /// Motor idle
    Idle,
    /// Open-loop startup in progress
    Startup,
    /// Running in closed loop
    ClosedLoop,
    /// Stopped on a fault
    Fault,
    /// State code not documented for this part
    Other(u8),
}

impl AlgorithmState {
    /// Decode the 3-bit state field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            0x00 => Self::Idle,
            0x01 => Self::Startup,
            0x02 => Self::ClosedLoop,
            0x03 => Self::Fault,
            other => Self::Other(other),
        }
    }

    /// Whether the motor is being driven (startup or closed loop)
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Startup | Self::ClosedLoop)
    }
}

/// Fault flags shared by the gate driver and controller fault registers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct FaultStatus {
    /// Supply undervoltage lockout (bit 0)
    pub undervoltage: bool,
    /// Overcurrent protection (bit 1)
    pub overcurrent: bool,
    /// Overtemperature (bit 2)
    pub overtemperature: bool,
    /// Motor lock (bit 3)
    pub lock: bool,
    /// Initial position detection fault (bit 4)
    pub ipd: bool,
    /// Abnormal speed (bit 5)
    pub abnormal_speed: bool,
    /// No motor connected (bit 6)
    pub no_motor: bool,
}

impl FaultStatus {
    /// Undervoltage lockout bit
    pub const UVLO: u16 = 1 << 0;
    /// Overcurrent bit
    pub const OCP: u16 = 1 << 1;
    /// Overtemperature bit
    pub const OT: u16 = 1 << 2;
    /// Motor lock bit
    pub const LOCK: u16 = 1 << 3;
    /// Initial position detection bit
    pub const IPD: u16 = 1 << 4;
    /// Abnormal speed bit
    pub const ABN_SPEED: u16 = 1 << 5;
    /// No motor bit
    pub const NO_MOTOR: u16 = 1 << 6;

    /// Decode fault bits from a raw register value
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            undervoltage: bits & Self::UVLO != 0,
            overcurrent: bits & Self::OCP != 0,
            overtemperature: bits & Self::OT != 0,
            lock: bits & Self::LOCK != 0,
            ipd: bits & Self::IPD != 0,
            abnormal_speed: bits & Self::ABN_SPEED != 0,
            no_motor: bits & Self::NO_MOTOR != 0,
        }
    }

    /// Encode as raw register bits
    #[must_use]
    pub const fn bits(&self) -> u16 {
        let mut bits = 0;
        if self.undervoltage {
            bits |= Self::UVLO;
        }
        if self.overcurrent {
            bits |= Self::OCP;
        }
        if self.overtemperature {
            bits |= Self::OT;
        }
        if self.lock {
            bits |= Self::LOCK;
        }
        if self.ipd {
            bits |= Self::IPD;
        }
        if self.abnormal_speed {
            bits |= Self::ABN_SPEED;
        }
        if self.no_motor {
            bits |= Self::NO_MOTOR;
        }
        bits
    }

    /// Combine two fault sets
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    /// Check if any fault is active
    #[must_use]
    pub const fn any(&self) -> bool {
        self.bits() != 0
    }
}

/// Motor electrical parameters (`MTR_PARAMS`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorParameters {
    /// Phase resistance in milliohms (bits 15:8)
    pub resistance_mohm: u8,
    /// Phase inductance in microhenries (bits 7:0)
    pub inductance_uh: u8,
}

/// Speed profile entry (`SPEED_PROFILESx`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedProfile {
    /// Target speed in Hz (bits 7:0)
    pub speed_hz: u8,
    /// Acceleration in Hz/s (bits 15:8)
    pub accel_hz_per_s: u8,
}

impl SpeedProfile {
    /// Pack into the 16-bit register layout
    #[must_use]
    pub const fn to_register(self) -> u16 {
        u16::from_le_bytes([self.speed_hz, self.accel_hz_per_s])
    }

    /// Unpack from the 16-bit register layout
    #[must_use]
    pub const fn from_register(raw: u16) -> Self {
        let [speed_hz, accel_hz_per_s] = raw.to_le_bytes();
        Self {
            speed_hz,
            accel_hz_per_s,
        }
    }
}

/// DC bus voltage and current sample (`DC_BUS_CURRENT`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusMonitor {
    /// Raw voltage (0.1 V units, bits 15:8)
    pub voltage_raw: u8,
    /// Raw current (0.01 A units, bits 7:0)
    pub current_raw: u8,
}

impl BusMonitor {
    /// Decode the packed register value
    #[must_use]
    pub const fn from_register(raw: u16) -> Self {
        let [current_raw, voltage_raw] = raw.to_le_bytes();
        Self {
            voltage_raw,
            current_raw,
        }
    }

    /// DC bus voltage in volts
    #[must_use]
    pub fn voltage(&self) -> f32 {
        f32::from(self.voltage_raw) * 0.1
    }

    /// DC bus current in amperes
    #[must_use]
    pub fn current(&self) -> f32 {
        f32::from(self.current_raw) * 0.01
    }
}
