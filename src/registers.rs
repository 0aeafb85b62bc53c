//! Register definitions for the MCF8316A
//!
//! The MCF8316A exposes a 20-bit address space through its I2C control word.
//! All registers used here are 16 bits wide and transferred least-significant
//! byte first.
//!
//! ## Memory Regions
//! - **EEPROM shadow (0x80-0xB2)**: non-volatile configuration (motor
//!   startup, closed loop, fault handling, speed profiles, pins, gate driver)
//! - **RAM (0xE0-0xF4)**: fault status, algorithm status, device control,
//!   speed and bus monitoring
//! - **RAM bank 2 (0x1E0-0x1E4)**: DAC status, device ID and EEPROM write
//!   completion
//!
//! `DEV_CTRL` and `STAT_STATUS` share address 0xEA and use
//! `ALLOW_ADDRESS_OVERLAP = true`.

/// `SPEED_PROFILES1` address, first of the indexable speed profile registers
pub const SPEED_PROFILES_BASE: u32 = 0x94;

device_driver::create_device!(
    device_name: Mcf8316a,
    dsl: {
        config {
            type RegisterAddressType = u32;
            type DefaultByteOrder = LE;
        }

        // ==================== EEPROM REGISTERS ====================

        /// ISD_CONFIG - Initial speed detection configuration (0x80)
        register IsdConfig {
            const ADDRESS = 0x80;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// REV_DRIVE_CONFIG - Reverse drive configuration (0x82)
        register RevDriveConfig {
            const ADDRESS = 0x82;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// MOTOR_STARTUP1 - Motor startup configuration 1 (0x84)
        register MotorStartup1 {
            const ADDRESS = 0x84;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// MOTOR_STARTUP2 - Motor startup configuration 2 (0x86)
        register MotorStartup2 {
            const ADDRESS = 0x86;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// CLOSED_LOOP1 - Closed loop configuration 1 (0x88)
        register ClosedLoop1 {
            const ADDRESS = 0x88;
            const SIZE_BITS = 16;

            reserved_13_0: uint = 0..14,
            /// Maximum speed range (0=120 Hz, 1=400 Hz, 2=800 Hz, 3=1200 Hz)
            speed_range: uint = 14..16,
        },

        /// CLOSED_LOOP2 - Closed loop configuration 2 (0x8A)
        register ClosedLoop2 {
            const ADDRESS = 0x8A;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// CLOSED_LOOP3 - Closed loop configuration 3 (0x8C)
        register ClosedLoop3 {
            const ADDRESS = 0x8C;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// CLOSED_LOOP4 - Closed loop configuration 4 (0x8E)
        register ClosedLoop4 {
            const ADDRESS = 0x8E;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// FAULT_CONFIG1 - Fault configuration 1 (0x90)
        register FaultConfig1 {
            const ADDRESS = 0x90;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// FAULT_CONFIG2 - Fault configuration 2 (0x92)
        register FaultConfig2 {
            const ADDRESS = 0x92;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// SPEED_PROFILES1 - Speed profile 1 (0x94)
        register SpeedProfiles1 {
            const ADDRESS = 0x94;
            const SIZE_BITS = 16;

            /// Target speed (Hz)
            speed: uint = 0..8,
            /// Acceleration (Hz/s)
            accel: uint = 8..16,
        },

        /// SPEED_PROFILES2 - Speed profile 2 (0x96)
        register SpeedProfiles2 {
            const ADDRESS = 0x96;
            const SIZE_BITS = 16;

            /// Target speed (Hz)
            speed: uint = 0..8,
            /// Acceleration (Hz/s)
            accel: uint = 8..16,
        },

        /// SPEED_PROFILES3 - Speed profile 3 (0x98)
        register SpeedProfiles3 {
            const ADDRESS = 0x98;
            const SIZE_BITS = 16;

            /// Target speed (Hz)
            speed: uint = 0..8,
            /// Acceleration (Hz/s)
            accel: uint = 8..16,
        },

        /// SPEED_PROFILES4 - Speed profile 4 (0x9A)
        register SpeedProfiles4 {
            const ADDRESS = 0x9A;
            const SIZE_BITS = 16;

            /// Target speed (Hz)
            speed: uint = 0..8,
            /// Acceleration (Hz/s)
            accel: uint = 8..16,
        },

        /// SPEED_PROFILES5 - Speed profile 5 (0x9C)
        register SpeedProfiles5 {
            const ADDRESS = 0x9C;
            const SIZE_BITS = 16;

            /// Target speed (Hz)
            speed: uint = 0..8,
            /// Acceleration (Hz/s)
            accel: uint = 8..16,
        },

        /// SPEED_PROFILES6 - Speed profile 6 (0x9E)
        register SpeedProfiles6 {
            const ADDRESS = 0x9E;
            const SIZE_BITS = 16;

            /// Target speed (Hz)
            speed: uint = 0..8,
            /// Acceleration (Hz/s)
            accel: uint = 8..16,
        },

        /// INT_ALGO_1 - Internal algorithm configuration 1 (0xA0)
        register IntAlgo1 {
            const ADDRESS = 0xA0;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// INT_ALGO_2 - Internal algorithm configuration 2 (0xA2)
        register IntAlgo2 {
            const ADDRESS = 0xA2;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// PIN_CONFIG - Pin configuration (0xA4)
        register PinConfig {
            const ADDRESS = 0xA4;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// DEVICE_CONFIG1 - Device configuration 1 (0xA6)
        register DeviceConfig1 {
            const ADDRESS = 0xA6;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// DEVICE_CONFIG2 - Device configuration 2 (0xA8)
        register DeviceConfig2 {
            const ADDRESS = 0xA8;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// PERI_CONFIG1 - Peripheral configuration (0xAA)
        register PeriConfig1 {
            const ADDRESS = 0xAA;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// GD_CONFIG1 - Gate driver configuration 1 (0xAC)
        register GdConfig1 {
            const ADDRESS = 0xAC;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// GD_CONFIG2 - Gate driver configuration 2 (0xAE)
        register GdConfig2 {
            const ADDRESS = 0xAE;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// CONFIG_DATA_1TO8 - Configuration data bytes 1-8 (0xB0)
        register ConfigDataLow {
            const ADDRESS = 0xB0;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// CONFIG_DATA_9TO16 - Configuration data bytes 9-16 (0xB2)
        register ConfigDataHigh {
            const ADDRESS = 0xB2;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        // ==================== RAM REGISTERS ====================

        /// GATE_DRIVER_FAULT_STATUS - Gate driver faults (0xE0)
        register GateDriverFaultStatus {
            const ADDRESS = 0xE0;
            const SIZE_BITS = 16;

            /// Supply undervoltage lockout
            uvlo: bool = 0,
            /// Overcurrent protection
            ocp: bool = 1,
            /// Overtemperature
            ot: bool = 2,
            /// Motor lock
            lock: bool = 3,
            /// Initial position detection fault
            ipd: bool = 4,
            /// Abnormal speed
            abn_speed: bool = 5,
            /// No motor connected
            no_motor: bool = 6,
            reserved_15_7: uint = 7..16,
        },

        /// CONTROLLER_FAULT_STATUS - Controller faults (0xE2)
        register ControllerFaultStatus {
            const ADDRESS = 0xE2;
            const SIZE_BITS = 16;

            /// Supply undervoltage lockout
            uvlo: bool = 0,
            /// Overcurrent protection
            ocp: bool = 1,
            /// Overtemperature
            ot: bool = 2,
            /// Motor lock
            lock: bool = 3,
            /// Initial position detection fault
            ipd: bool = 4,
            /// Abnormal speed
            abn_speed: bool = 5,
            /// No motor connected
            no_motor: bool = 6,
            reserved_15_7: uint = 7..16,
        },

        /// ALGO_STATUS - Algorithm status (0xE4)
        register AlgoStatus {
            const ADDRESS = 0xE4;
            const SIZE_BITS = 16;

            reserved_12_0: uint = 0..13,
            /// Algorithm state (0=idle, 1=startup, 2=closed loop, 3=fault)
            state: uint = 13..16,
        },

        /// MTR_PARAMS - Motor parameters (0xE6)
        register MtrParams {
            const ADDRESS = 0xE6;
            const SIZE_BITS = 16;

            /// Phase inductance (1 uH units)
            inductance: uint = 0..8,
            /// Phase resistance (1 mOhm units)
            resistance: uint = 8..16,
        },

        /// ALGO_STATUS_MPET - Motor parameter extraction status (0xE8)
        register AlgoStatusMpet {
            const ADDRESS = 0xE8;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// DEV_CTRL - Device control (0xEA)
        register DevCtrl {
            const ADDRESS = 0xEA;
            const SIZE_BITS = 16;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Run the motor
            run_motor: bool = 0,
            /// Direction (false=forward, true=reverse)
            direction: bool = 1,
            /// Apply brake
            brake: bool = 2,
            /// Clear latched faults
            clr_fault: bool = 3,
            /// Speed loop (true) or torque loop (false)
            speed_mode: bool = 4,
            reserved_7_5: uint = 5..8,
            /// Write shadow registers to EEPROM
            save_to_eeprom: bool = 8,
            /// Reload shadow registers from EEPROM
            load_from_eeprom: bool = 9,
            reserved_15_10: uint = 10..16,
        },

        /// STAT_STATUS - Status (0xEA, shares the DEV_CTRL address)
        register StatStatus {
            const ADDRESS = 0xEA;
            const SIZE_BITS = 16;
            const ALLOW_ADDRESS_OVERLAP = true;

            value: uint = 0..16,
        },

        /// MOTOR_SPEED - Measured speed (0xEC)
        register MotorSpeed {
            const ADDRESS = 0xEC;
            const SIZE_BITS = 16;

            /// Electrical frequency (0.1 Hz units)
            speed: uint = 0..16,
        },

        /// DC_BUS_CURRENT - DC bus monitoring (0xF0)
        register DcBusCurrent {
            const ADDRESS = 0xF0;
            const SIZE_BITS = 16;

            /// DC bus current (0.01 A units)
            current: uint = 0..8,
            /// DC bus voltage (0.1 V units)
            voltage: uint = 8..16,
        },

        /// SPEED_CONTROL - Speed command (0xF2)
        register SpeedControl {
            const ADDRESS = 0xF2;
            const SIZE_BITS = 16;

            /// Target electrical frequency (0.1 Hz units)
            speed: uint = 0..16,
        },

        /// ALGO_CTRL - Algorithm control (0xF4)
        register AlgoCtrl {
            const ADDRESS = 0xF4;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        // ==================== RAM BANK 2 ====================

        /// DAC_STATUS - DAC status (0x1E0)
        register DacStatus {
            const ADDRESS = 0x1E0;
            const SIZE_BITS = 16;

            value: uint = 0..16,
        },

        /// DEVICE_ID - Device identification (0x1E2)
        register DeviceId {
            const ADDRESS = 0x1E2;
            const SIZE_BITS = 16;

            /// Device ID (never 0x0000 or 0xFFFF on a responding part)
            id: uint = 0..16,
        },

        /// EEPROM_WR_DONE - EEPROM operation status (0x1E4)
        register EepromWrDone {
            const ADDRESS = 0x1E4;
            const SIZE_BITS = 16;

            /// EEPROM save/load complete
            done: bool = 0,
            reserved_15_1: uint = 1..16,
        }
    }
);
