//! High-level driver API for the MCF8316A
//!
//! This module provides a motor-oriented interface to the MCF8316A, built on
//! the generated register map and the two-phase I2C transaction engine in
//! [`crate::interface`].

use core::fmt::Write;

use crate::eeprom::{
    DEFAULT_EEPROM_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, EepromCommit, EepromOperation,
};
use crate::interface::{I2cInterface, NoDebug};
use crate::motor::{
    AlgorithmState, BusMonitor, DEFAULT_POLE_PAIRS, Direction, FaultStatus, MotorParameters,
    SpeedProfile, SpeedRange, rpm_to_speed_register, speed_register_to_rpm,
};
use crate::registers::{Mcf8316a as RegisterDevice, SPEED_PROFILES_BASE};
use crate::{Error, SPEED_PROFILE_COUNT};

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// Motor pole pairs used for RPM conversions
    pub pole_pairs: u8,
    /// Time allowed for EEPROM save/load completion (ms)
    pub eeprom_timeout_ms: u32,
    /// Interval between EEPROM completion polls (ms)
    pub eeprom_poll_interval_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            pole_pairs: DEFAULT_POLE_PAIRS,
            eeprom_timeout_ms: DEFAULT_EEPROM_TIMEOUT_MS,
            eeprom_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl DriverConfig {
    /// Check that conversions and EEPROM polling are well defined
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.pole_pairs != 0 && self.eeprom_poll_interval_ms != 0
    }
}

/// Decode one of the two fault status registers
macro_rules! fault_status_from {
    ($reg:expr) => {{
        let reg = $reg;
        FaultStatus {
            undervoltage: reg.uvlo(),
            overcurrent: reg.ocp(),
            overtemperature: reg.ot(),
            lock: reg.lock(),
            ipd: reg.ipd(),
            abnormal_speed: reg.abn_speed(),
            no_motor: reg.no_motor(),
        }
    }};
}

/// Main driver for the MCF8316A
pub struct Mcf8316aDriver<I2C, D, W = NoDebug> {
    device: RegisterDevice<I2cInterface<I2C, D, W>>,
    config: DriverConfig,
}

impl<I2C, D, W> Mcf8316aDriver<I2C, D, W> {
    /// Current driver configuration
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Change the I2C target address used for subsequent transactions
    pub fn set_i2c_address(&mut self, address: u8) {
        self.device.interface.set_address(address);
    }

    /// Current I2C target address
    pub const fn i2c_address(&self) -> u8 {
        self.device.interface.address()
    }

    /// Append a CRC-8 byte to every payload and verify it on reads
    pub fn enable_crc(&mut self) {
        self.device.interface.set_crc_enabled(true);
    }

    /// Send and accept payloads without CRC
    pub fn disable_crc(&mut self) {
        self.device.interface.set_crc_enabled(false);
    }

    /// Whether payload CRC is enabled
    pub const fn crc_enabled(&self) -> bool {
        self.device.interface.crc_enabled()
    }

    /// Attach a debug sink receiving one line per transaction step
    pub fn enable_debug(&mut self, sink: W) {
        self.device.interface.enable_debug(sink);
    }

    /// Detach the debug sink, returning it
    pub fn disable_debug(&mut self) -> Option<W> {
        self.device.interface.disable_debug()
    }

    /// Whether a debug sink is attached
    pub const fn debug_enabled(&self) -> bool {
        self.device.interface.debug_enabled()
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I2cInterface<I2C, D, W> {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I2cInterface<I2C, D, W>> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device
    ///
    /// Gives access to every register in the map, including those without a
    /// dedicated driver method.
    pub fn device_mut(&mut self) -> &mut RegisterDevice<I2cInterface<I2C, D, W>> {
        &mut self.device
    }

    fn speed_profile_address<E>(index: u8) -> Result<u32, Error<E>> {
        if index >= SPEED_PROFILE_COUNT {
            return Err(Error::InvalidProfile(index));
        }
        Ok(SPEED_PROFILES_BASE + u32::from(index) * 2)
    }

    fn new_commit(&self, timeout_ms: u32) -> EepromCommit {
        EepromCommit::new(timeout_ms, self.config.eeprom_poll_interval_ms)
    }
}

#[cfg(not(feature = "async"))]
impl<I2C, D, W, E> Mcf8316aDriver<I2C, D, W>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
    D: embedded_hal::delay::DelayNs,
    W: Write,
{
    /// Create a new MCF8316A driver instance with the default configuration
    ///
    /// This reads `DEVICE_ID` to confirm the device responds.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - `DEVICE_ID` reads as 0x0000 or 0xFFFF
    pub fn new(interface: I2cInterface<I2C, D, W>) -> Result<Self, Error<E>> {
        Self::with_config(interface, DriverConfig::default())
    }

    /// Create a new MCF8316A driver instance with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, communication fails
    /// or `DEVICE_ID` reads as 0x0000 or 0xFFFF.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = DriverConfig {
    ///     pole_pairs: 4,
    ///     ..Default::default()
    /// };
    /// let mut motor = Mcf8316aDriver::with_config(I2cInterface::default(i2c, delay), config)?;
    /// ```
    pub fn with_config(
        interface: I2cInterface<I2C, D, W>,
        config: DriverConfig,
    ) -> Result<Self, Error<E>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }
        let mut driver = Self {
            device: RegisterDevice::new(interface),
            config,
        };

        let device_id = driver.device_id()?;

        #[cfg(feature = "defmt")]
        defmt::info!("MCF8316A device ID: {=u16:#x}", device_id);

        driver
            .device
            .interface
            .debug_value("Device ID", u64::from(device_id));

        if device_id == 0x0000 || device_id == 0xFFFF {
            return Err(Error::InvalidDevice(device_id));
        }

        Ok(driver)
    }

    /// Replace the driver configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] and keeps the current configuration
    /// if `config` is invalid.
    pub fn set_config(&mut self, config: DriverConfig) -> Result<(), Error<E>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }
        self.config = config;
        Ok(())
    }

    /// Read the `DEVICE_ID` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn device_id(&mut self) -> Result<u16, Error<E>> {
        let reg = self.device.device_id().read()?;
        Ok(reg.id())
    }

    /// Read a 16-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn read_register16(&mut self, address: u32) -> Result<u16, Error<E>> {
        let mut buffer = [0u8; 2];
        self.device
            .interface
            .read_register(address, 16, &mut buffer)?;
        Ok(u16::from_le_bytes(buffer))
    }

    /// Write a 16-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_register16(&mut self, address: u32, value: u16) -> Result<(), Error<E>> {
        self.device
            .interface
            .write_register(address, 16, &value.to_le_bytes())
    }

    /// Read a 32-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn read_register32(&mut self, address: u32) -> Result<u32, Error<E>> {
        let mut buffer = [0u8; 4];
        self.device
            .interface
            .read_register(address, 32, &mut buffer)?;
        Ok(u32::from_le_bytes(buffer))
    }

    /// Write a 32-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_register32(&mut self, address: u32, value: u32) -> Result<(), Error<E>> {
        self.device
            .interface
            .write_register(address, 32, &value.to_le_bytes())
    }

    /// Start the motor (`DEV_CTRL` run bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn start(&mut self) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_run_motor(true);
        })?;
        Ok(())
    }

    /// Stop the motor (clear `DEV_CTRL` run bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn stop(&mut self) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_run_motor(false);
        })?;
        Ok(())
    }

    /// Let the motor coast to a stop
    ///
    /// The MCF8316A coasts whenever it is not driven, so this is [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn coast(&mut self) -> Result<(), Error<E>> {
        self.stop()
    }

    /// Engage the brake (`DEV_CTRL` brake bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn brake(&mut self) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_brake(true);
        })?;
        Ok(())
    }

    /// Command a mechanical speed in RPM
    ///
    /// The speed is converted to electrical frequency with the configured
    /// pole pair count and written to `SPEED_CONTROL` in 0.1 Hz units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for negative, non-finite or
    /// out-of-range speeds (no bus traffic), or a bus error.
    pub fn set_speed(&mut self, rpm: f32) -> Result<(), Error<E>> {
        let raw =
            rpm_to_speed_register(rpm, self.config.pole_pairs).ok_or(Error::InvalidConfig)?;
        self.device.speed_control().write(|w| {
            w.set_speed(raw);
        })?;
        Ok(())
    }

    /// Read the measured mechanical speed in RPM
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn speed(&mut self) -> Result<f32, Error<E>> {
        let reg = self.device.motor_speed().read()?;
        Ok(speed_register_to_rpm(reg.speed(), self.config.pole_pairs))
    }

    /// Select the maximum speed range (`CLOSED_LOOP1` bits 15:14)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_speed_range(&mut self, range: SpeedRange) -> Result<(), Error<E>> {
        self.device.closed_loop_1().modify(|w| {
            w.set_speed_range(range.bits());
        })?;
        Ok(())
    }

    /// Read the configured maximum speed range
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn speed_range(&mut self) -> Result<SpeedRange, Error<E>> {
        let reg = self.device.closed_loop_1().read()?;
        Ok(SpeedRange::from_bits(reg.speed_range()))
    }

    /// Set the rotation direction
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_direction(direction.bit());
        })?;
        Ok(())
    }

    /// Read the rotation direction
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn direction(&mut self) -> Result<Direction, Error<E>> {
        let reg = self.device.dev_ctrl().read()?;
        Ok(Direction::from_bit(reg.direction()))
    }

    /// Read gate driver and controller faults combined
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        let gate = self.gate_fault_status()?;
        let controller = self.controller_fault_status()?;
        Ok(gate.union(controller))
    }

    /// Read `GATE_DRIVER_FAULT_STATUS`
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn gate_fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        Ok(fault_status_from!(
            self.device.gate_driver_fault_status().read()?
        ))
    }

    /// Read `CONTROLLER_FAULT_STATUS`
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn controller_fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        Ok(fault_status_from!(
            self.device.controller_fault_status().read()?
        ))
    }

    /// Read the motor control algorithm state (`ALGO_STATUS` bits 15:13)
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn algorithm_state(&mut self) -> Result<AlgorithmState, Error<E>> {
        let reg = self.device.algo_status().read()?;
        Ok(AlgorithmState::from_bits(reg.state()))
    }

    /// Clear latched faults (`DEV_CTRL` clear fault bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn clear_faults(&mut self) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_clr_fault(true);
        })?;
        Ok(())
    }

    /// Check if any gate driver or controller fault is active
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn is_fault(&mut self) -> Result<bool, Error<E>> {
        Ok(self.fault_status()?.any())
    }

    /// Check if the motor is in startup or closed-loop operation
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn is_running(&mut self) -> Result<bool, Error<E>> {
        Ok(self.algorithm_state()?.is_running())
    }

    /// Write the shadow registers to EEPROM and wait for completion
    ///
    /// Returns the time spent waiting, in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EepromTimeout`] if the device does not report
    /// completion within the configured timeout, or a bus error when the
    /// command cannot be issued.
    pub fn save_to_eeprom(&mut self) -> Result<u32, Error<E>> {
        self.eeprom_operation(EepromOperation::Save)
    }

    /// Reload the shadow registers from EEPROM and wait for completion
    ///
    /// Returns the time spent waiting, in milliseconds.
    ///
    /// # Errors
    ///
    /// Same as [`save_to_eeprom`](Self::save_to_eeprom).
    pub fn load_from_eeprom(&mut self) -> Result<u32, Error<E>> {
        self.eeprom_operation(EepromOperation::Load)
    }

    /// Poll `EEPROM_WR_DONE` until set or `timeout_ms` elapses
    ///
    /// Returns the time spent waiting, in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EepromTimeout`] when the budget is spent.
    pub fn wait_for_eeprom_done(&mut self, timeout_ms: u32) -> Result<u32, Error<E>> {
        let mut commit = self.new_commit(timeout_ms);
        self.poll_eeprom(&mut commit)
    }

    fn eeprom_operation(&mut self, operation: EepromOperation) -> Result<u32, Error<E>> {
        let mut commit = self.new_commit(self.config.eeprom_timeout_ms);
        self.device.dev_ctrl().modify(|w| match operation {
            EepromOperation::Save => w.set_save_to_eeprom(true),
            EepromOperation::Load => w.set_load_from_eeprom(true),
        })?;
        commit.command_issued(operation);

        #[cfg(feature = "defmt")]
        defmt::debug!("EEPROM {} command issued", operation);

        self.poll_eeprom(&mut commit)
    }

    fn poll_eeprom(&mut self, commit: &mut EepromCommit) -> Result<u32, Error<E>> {
        commit.begin_polling();
        while commit.poll_due() {
            // The device may not answer while programming; treat that as busy
            let done = self
                .device
                .eeprom_wr_done()
                .read()
                .is_ok_and(|status| status.done());
            if commit.record(done) {
                #[cfg(feature = "defmt")]
                defmt::debug!("EEPROM done after {=u32} ms", commit.elapsed_ms());

                return Ok(commit.elapsed_ms());
            }
            self.device
                .interface
                .delay_mut()
                .delay_ms(commit.poll_interval_ms());
            commit.advance();
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("EEPROM timed out after {=u32} ms", commit.elapsed_ms());

        Err(Error::EepromTimeout {
            waited_ms: commit.elapsed_ms(),
        })
    }

    /// Write the motor electrical parameters (`MTR_PARAMS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_motor_parameters(&mut self, params: MotorParameters) -> Result<(), Error<E>> {
        self.device.mtr_params().write(|w| {
            w.set_resistance(params.resistance_mohm);
            w.set_inductance(params.inductance_uh);
        })?;
        Ok(())
    }

    /// Read the motor electrical parameters (`MTR_PARAMS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn motor_parameters(&mut self) -> Result<MotorParameters, Error<E>> {
        let reg = self.device.mtr_params().read()?;
        Ok(MotorParameters {
            resistance_mohm: reg.resistance(),
            inductance_uh: reg.inductance(),
        })
    }

    /// Enable closed-loop speed control (`DEV_CTRL` speed mode bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn enable_speed_loop(&mut self) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_speed_mode(true);
        })?;
        Ok(())
    }

    /// Switch back to torque control
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn disable_speed_loop(&mut self) -> Result<(), Error<E>> {
        self.device.dev_ctrl().modify(|w| {
            w.set_speed_mode(false);
        })?;
        Ok(())
    }

    /// Write speed profile `index` (0-4, `SPEED_PROFILES1`-`SPEED_PROFILES5`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] for an index above 4 before any bus
    /// traffic, or a bus error.
    pub fn set_speed_profile(&mut self, index: u8, profile: SpeedProfile) -> Result<(), Error<E>> {
        let address = Self::speed_profile_address::<E>(index)?;
        self.write_register16(address, profile.to_register())
    }

    /// Read speed profile `index` (0-4)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] for an index above 4, or a bus error.
    pub fn speed_profile(&mut self, index: u8) -> Result<SpeedProfile, Error<E>> {
        let address = Self::speed_profile_address::<E>(index)?;
        Ok(SpeedProfile::from_register(self.read_register16(address)?))
    }

    /// Read DC bus voltage and current together
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn bus_monitor(&mut self) -> Result<BusMonitor, Error<E>> {
        let reg = self.device.dc_bus_current().read()?;
        Ok(BusMonitor {
            voltage_raw: reg.voltage(),
            current_raw: reg.current(),
        })
    }

    /// Read DC bus voltage in volts
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn voltage(&mut self) -> Result<f32, Error<E>> {
        Ok(self.bus_monitor()?.voltage())
    }

    /// Read DC bus current in amperes
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub fn current(&mut self) -> Result<f32, Error<E>> {
        Ok(self.bus_monitor()?.current())
    }
}

#[cfg(feature = "async")]
impl<I2C, D, W, E> Mcf8316aDriver<I2C, D, W>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
    D: embedded_hal_async::delay::DelayNs,
    W: Write,
{
    /// Create a new MCF8316A driver instance with the default configuration
    ///
    /// This reads `DEVICE_ID` to confirm the device responds.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - `DEVICE_ID` reads as 0x0000 or 0xFFFF
    pub async fn new(interface: I2cInterface<I2C, D, W>) -> Result<Self, Error<E>> {
        Self::with_config(interface, DriverConfig::default()).await
    }

    /// Create a new MCF8316A driver instance with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, communication fails
    /// or `DEVICE_ID` reads as 0x0000 or 0xFFFF.
    pub async fn with_config(
        interface: I2cInterface<I2C, D, W>,
        config: DriverConfig,
    ) -> Result<Self, Error<E>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }
        let mut driver = Self {
            device: RegisterDevice::new(interface),
            config,
        };

        let device_id = driver.device_id().await?;

        #[cfg(feature = "defmt")]
        defmt::info!("MCF8316A device ID: {=u16:#x}", device_id);

        driver
            .device
            .interface
            .debug_value("Device ID", u64::from(device_id));

        if device_id == 0x0000 || device_id == 0xFFFF {
            return Err(Error::InvalidDevice(device_id));
        }

        Ok(driver)
    }

    /// Replace the driver configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] and keeps the current configuration
    /// if `config` is invalid.
    pub fn set_config(&mut self, config: DriverConfig) -> Result<(), Error<E>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }
        self.config = config;
        Ok(())
    }

    /// Read the `DEVICE_ID` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn device_id(&mut self) -> Result<u16, Error<E>> {
        let reg = self.device.device_id().read_async().await?;
        Ok(reg.id())
    }

    /// Read a 16-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn read_register16(&mut self, address: u32) -> Result<u16, Error<E>> {
        let mut buffer = [0u8; 2];
        self.device
            .interface
            .read_register(address, 16, &mut buffer)
            .await?;
        Ok(u16::from_le_bytes(buffer))
    }

    /// Write a 16-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn write_register16(&mut self, address: u32, value: u16) -> Result<(), Error<E>> {
        self.device
            .interface
            .write_register(address, 16, &value.to_le_bytes())
            .await
    }

    /// Read a 32-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn read_register32(&mut self, address: u32) -> Result<u32, Error<E>> {
        let mut buffer = [0u8; 4];
        self.device
            .interface
            .read_register(address, 32, &mut buffer)
            .await?;
        Ok(u32::from_le_bytes(buffer))
    }

    /// Write a 32-bit register at a raw 20-bit address
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn write_register32(&mut self, address: u32, value: u32) -> Result<(), Error<E>> {
        self.device
            .interface
            .write_register(address, 32, &value.to_le_bytes())
            .await
    }

    /// Start the motor (`DEV_CTRL` run bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn start(&mut self) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_run_motor(true);
            })
            .await?;
        Ok(())
    }

    /// Stop the motor (clear `DEV_CTRL` run bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn stop(&mut self) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_run_motor(false);
            })
            .await?;
        Ok(())
    }

    /// Let the motor coast to a stop
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn coast(&mut self) -> Result<(), Error<E>> {
        self.stop().await
    }

    /// Engage the brake (`DEV_CTRL` brake bit)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn brake(&mut self) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_brake(true);
            })
            .await?;
        Ok(())
    }

    /// Command a mechanical speed in RPM
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for negative, non-finite or
    /// out-of-range speeds (no bus traffic), or a bus error.
    pub async fn set_speed(&mut self, rpm: f32) -> Result<(), Error<E>> {
        let raw =
            rpm_to_speed_register(rpm, self.config.pole_pairs).ok_or(Error::InvalidConfig)?;
        self.device
            .speed_control()
            .write_async(|w| {
                w.set_speed(raw);
            })
            .await?;
        Ok(())
    }

    /// Read the measured mechanical speed in RPM
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn speed(&mut self) -> Result<f32, Error<E>> {
        let reg = self.device.motor_speed().read_async().await?;
        Ok(speed_register_to_rpm(reg.speed(), self.config.pole_pairs))
    }

    /// Select the maximum speed range (`CLOSED_LOOP1` bits 15:14)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_speed_range(&mut self, range: SpeedRange) -> Result<(), Error<E>> {
        self.device
            .closed_loop_1()
            .modify_async(|w| {
                w.set_speed_range(range.bits());
            })
            .await?;
        Ok(())
    }

    /// Read the configured maximum speed range
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn speed_range(&mut self) -> Result<SpeedRange, Error<E>> {
        let reg = self.device.closed_loop_1().read_async().await?;
        Ok(SpeedRange::from_bits(reg.speed_range()))
    }

    /// Set the rotation direction
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_direction(&mut self, direction: Direction) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_direction(direction.bit());
            })
            .await?;
        Ok(())
    }

    /// Read the rotation direction
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn direction(&mut self) -> Result<Direction, Error<E>> {
        let reg = self.device.dev_ctrl().read_async().await?;
        Ok(Direction::from_bit(reg.direction()))
    }

    /// Read gate driver and controller faults combined
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        let gate = self.gate_fault_status().await?;
        let controller = self.controller_fault_status().await?;
        Ok(gate.union(controller))
    }

    /// Read `GATE_DRIVER_FAULT_STATUS`
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn gate_fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        Ok(fault_status_from!(
            self.device.gate_driver_fault_status().read_async().await?
        ))
    }

    /// Read `CONTROLLER_FAULT_STATUS`
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn controller_fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        Ok(fault_status_from!(
            self.device.controller_fault_status().read_async().await?
        ))
    }

    /// Read the motor control algorithm state
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn algorithm_state(&mut self) -> Result<AlgorithmState, Error<E>> {
        let reg = self.device.algo_status().read_async().await?;
        Ok(AlgorithmState::from_bits(reg.state()))
    }

    /// Clear latched faults
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn clear_faults(&mut self) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_clr_fault(true);
            })
            .await?;
        Ok(())
    }

    /// Check if any gate driver or controller fault is active
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn is_fault(&mut self) -> Result<bool, Error<E>> {
        Ok(self.fault_status().await?.any())
    }

    /// Check if the motor is in startup or closed-loop operation
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn is_running(&mut self) -> Result<bool, Error<E>> {
        Ok(self.algorithm_state().await?.is_running())
    }

    /// Write the shadow registers to EEPROM and wait for completion
    ///
    /// # Errors
    ///
    /// Returns [`Error::EepromTimeout`] if the device does not report
    /// completion within the configured timeout, or a bus error.
    pub async fn save_to_eeprom(&mut self) -> Result<u32, Error<E>> {
        self.eeprom_operation(EepromOperation::Save).await
    }

    /// Reload the shadow registers from EEPROM and wait for completion
    ///
    /// # Errors
    ///
    /// Same as [`save_to_eeprom`](Self::save_to_eeprom).
    pub async fn load_from_eeprom(&mut self) -> Result<u32, Error<E>> {
        self.eeprom_operation(EepromOperation::Load).await
    }

    /// Poll `EEPROM_WR_DONE` until set or `timeout_ms` elapses
    ///
    /// # Errors
    ///
    /// Returns [`Error::EepromTimeout`] when the budget is spent.
    pub async fn wait_for_eeprom_done(&mut self, timeout_ms: u32) -> Result<u32, Error<E>> {
        let mut commit = self.new_commit(timeout_ms);
        self.poll_eeprom(&mut commit).await
    }

    async fn eeprom_operation(&mut self, operation: EepromOperation) -> Result<u32, Error<E>> {
        let mut commit = self.new_commit(self.config.eeprom_timeout_ms);
        self.device
            .dev_ctrl()
            .modify_async(|w| match operation {
                EepromOperation::Save => w.set_save_to_eeprom(true),
                EepromOperation::Load => w.set_load_from_eeprom(true),
            })
            .await?;
        commit.command_issued(operation);

        #[cfg(feature = "defmt")]
        defmt::debug!("EEPROM {} command issued", operation);

        self.poll_eeprom(&mut commit).await
    }

    async fn poll_eeprom(&mut self, commit: &mut EepromCommit) -> Result<u32, Error<E>> {
        commit.begin_polling();
        while commit.poll_due() {
            let done = self
                .device
                .eeprom_wr_done()
                .read_async()
                .await
                .is_ok_and(|status| status.done());
            if commit.record(done) {
                return Ok(commit.elapsed_ms());
            }
            self.device
                .interface
                .delay_mut()
                .delay_ms(commit.poll_interval_ms())
                .await;
            commit.advance();
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("EEPROM timed out after {=u32} ms", commit.elapsed_ms());

        Err(Error::EepromTimeout {
            waited_ms: commit.elapsed_ms(),
        })
    }

    /// Write the motor electrical parameters (`MTR_PARAMS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_motor_parameters(&mut self, params: MotorParameters) -> Result<(), Error<E>> {
        self.device
            .mtr_params()
            .write_async(|w| {
                w.set_resistance(params.resistance_mohm);
                w.set_inductance(params.inductance_uh);
            })
            .await?;
        Ok(())
    }

    /// Read the motor electrical parameters (`MTR_PARAMS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn motor_parameters(&mut self) -> Result<MotorParameters, Error<E>> {
        let reg = self.device.mtr_params().read_async().await?;
        Ok(MotorParameters {
            resistance_mohm: reg.resistance(),
            inductance_uh: reg.inductance(),
        })
    }

    /// Enable closed-loop speed control
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn enable_speed_loop(&mut self) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_speed_mode(true);
            })
            .await?;
        Ok(())
    }

    /// Switch back to torque control
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn disable_speed_loop(&mut self) -> Result<(), Error<E>> {
        self.device
            .dev_ctrl()
            .modify_async(|w| {
                w.set_speed_mode(false);
            })
            .await?;
        Ok(())
    }

    /// Write speed profile `index` (0-4)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] for an index above 4 before any bus
    /// traffic, or a bus error.
    pub async fn set_speed_profile(
        &mut self,
        index: u8,
        profile: SpeedProfile,
    ) -> Result<(), Error<E>> {
        let address = Self::speed_profile_address::<E>(index)?;
        self.write_register16(address, profile.to_register()).await
    }

    /// Read speed profile `index` (0-4)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] for an index above 4, or a bus error.
    pub async fn speed_profile(&mut self, index: u8) -> Result<SpeedProfile, Error<E>> {
        let address = Self::speed_profile_address::<E>(index)?;
        Ok(SpeedProfile::from_register(
            self.read_register16(address).await?,
        ))
    }

    /// Read DC bus voltage and current together
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn bus_monitor(&mut self) -> Result<BusMonitor, Error<E>> {
        let reg = self.device.dc_bus_current().read_async().await?;
        Ok(BusMonitor {
            voltage_raw: reg.voltage(),
            current_raw: reg.current(),
        })
    }

    /// Read DC bus voltage in volts
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn voltage(&mut self) -> Result<f32, Error<E>> {
        Ok(self.bus_monitor().await?.voltage())
    }

    /// Read DC bus current in amperes
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the CRC does not match.
    pub async fn current(&mut self) -> Result<f32, Error<E>> {
        Ok(self.bus_monitor().await?.current())
    }
}
