//! Unit tests for the two-phase register transaction

use crate::common::{
    Frame, MockBus, MockDelay, MockError, Operation, SharedLog, addr, create_debug_driver,
    create_mock_driver, create_mock_driver_with_delay,
};
use device_driver::RegisterInterface;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use mcf8316a::{Crc8, Error, I2cInterface, Mcf8316aDriver};

fn write_frame(bytes: &[u8]) -> Frame {
    Frame::Write {
        target: 0x01,
        bytes: bytes.to_vec(),
    }
}

fn read_frame(bytes: &[u8]) -> Frame {
    Frame::Read {
        target: 0x01,
        bytes: bytes.to_vec(),
    }
}

#[test]
fn test_read16_wire_format() {
    let (mut driver, bus) = create_mock_driver();

    let id = driver.device_id().unwrap();
    assert_eq!(id, 0x8316);

    // Command phase MSB first, payload LSB first
    assert_eq!(
        bus.frames(),
        vec![write_frame(&[0x80, 0x01, 0xE2]), read_frame(&[0x16, 0x83])]
    );
}

#[test]
fn test_read16_with_crc() {
    let (mut driver, bus) = create_mock_driver();
    driver.enable_crc();
    assert!(driver.crc_enabled());

    assert_eq!(driver.device_id().unwrap(), 0x8316);

    let crc = Crc8::MCF8316A.checksum(&[0x16, 0x83]);
    assert_eq!(
        bus.frames(),
        vec![
            write_frame(&[0xC0, 0x01, 0xE2]),
            read_frame(&[0x16, 0x83, crc])
        ]
    );
}

#[test]
fn test_write16_with_crc() {
    let (mut driver, bus) = create_mock_driver();
    driver.enable_crc();

    driver.write_register16(0x94, 0x1234).unwrap();

    assert_eq!(
        bus.frames(),
        vec![
            write_frame(&[0x40, 0x00, 0x94]),
            write_frame(&[0x34, 0x12, 0x04])
        ]
    );
    assert_eq!(bus.crc_rejections(), 0);
    assert_eq!(bus.get_register(0x94), Some(0x1234));
}

#[test]
fn test_write16_without_crc() {
    let (mut driver, bus) = create_mock_driver();

    driver.write_register16(0x94, 0x1234).unwrap();

    assert_eq!(
        bus.frames(),
        vec![
            write_frame(&[0x00, 0x00, 0x94]),
            write_frame(&[0x34, 0x12])
        ]
    );
}

#[test]
fn test_write32_with_crc() {
    let (mut driver, bus) = create_mock_driver();
    driver.enable_crc();

    driver.write_register32(0x80, 0x1234_5678).unwrap();

    assert_eq!(
        bus.frames(),
        vec![
            write_frame(&[0x50, 0x00, 0x80]),
            write_frame(&[0x78, 0x56, 0x34, 0x12, 0xD9])
        ]
    );
    assert_eq!(bus.get_register(0x80), Some(0x1234_5678));
}

#[test]
fn test_read32() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(0x80, 0xDEAD_BEEF);

    assert_eq!(driver.read_register32(0x80).unwrap(), 0xDEAD_BEEF);

    let frames = bus.frames();
    assert_eq!(frames[0], write_frame(&[0x90, 0x00, 0x80]));
    assert_eq!(frames[1], read_frame(&[0xEF, 0xBE, 0xAD, 0xDE]));
}

#[test]
fn test_register_roundtrip_with_and_without_crc() {
    let (mut driver, _bus) = create_mock_driver();

    driver.write_register16(0xE6, 0xA55A).unwrap();
    assert_eq!(driver.read_register16(0xE6).unwrap(), 0xA55A);

    driver.enable_crc();
    driver.write_register16(0xE6, 0x0190).unwrap();
    assert_eq!(driver.read_register16(0xE6).unwrap(), 0x0190);

    driver.disable_crc();
    assert!(!driver.crc_enabled());
    assert_eq!(driver.read_register16(0xE6).unwrap(), 0x0190);
}

#[test]
fn test_address_is_masked_to_20_bits() {
    let (mut driver, bus) = create_mock_driver();

    driver.read_register16(0xFFF0_00EA).unwrap();

    assert_eq!(bus.frames()[0], write_frame(&[0x80, 0x00, 0xEA]));
}

#[test]
fn test_inter_phase_delay() {
    let (mut driver, _bus, delay) = create_mock_driver_with_delay();
    let before = delay.us_calls().len();

    driver.read_register16(0xE4).unwrap();
    driver.write_register16(0xF2, 0).unwrap();

    // One fixed delay between command and data phase per access
    assert_eq!(delay.us_calls()[before..], [100, 100]);
    assert!(delay.ms_calls().is_empty());
}

#[test]
fn test_crc_mismatch_is_reported() {
    let (mut driver, bus, log) = create_debug_driver();
    driver.enable_crc();
    bus.corrupt_next_crc();

    let computed = Crc8::MCF8316A.checksum(&[0x16, 0x83]);
    let result = driver.device_id();
    assert_eq!(
        result,
        Err(Error::Crc {
            computed,
            received: computed ^ 0xFF,
        })
    );
    assert!(log.contents().contains("CRC mismatch!"));

    // Only the next read is corrupted
    assert_eq!(driver.device_id().unwrap(), 0x8316);
}

#[test]
fn test_debug_output_for_read() {
    let (mut driver, _bus, log) = create_debug_driver();
    log.clear();

    driver.device_id().unwrap();

    assert_eq!(
        log.lines(),
        vec!["Read16 Control Word: 0x8001E2", "Read16 Result: 0x8316"]
    );
}

#[test]
fn test_debug_output_for_write() {
    let (mut driver, _bus, log) = create_debug_driver();
    log.clear();
    driver.enable_crc();

    driver.write_register16(0xF2, 0x0190).unwrap();

    assert_eq!(
        log.lines(),
        vec!["Write16 Control Word: 0x4000F2", "Write16 Data: 0x190"]
    );
}

#[test]
fn test_debug_can_be_detached() {
    let (mut driver, _bus, log) = create_debug_driver();
    log.clear();
    assert!(driver.debug_enabled());

    let sink = driver.disable_debug();
    assert!(sink.is_some());
    assert!(!driver.debug_enabled());
    driver.device_id().unwrap();
    assert!(log.contents().is_empty());

    driver.enable_debug(log.clone());
    assert!(driver.debug_enabled());
    driver.device_id().unwrap();
    assert_eq!(log.lines().len(), 2);
}

#[test]
fn test_debug_output_reports_device_id_on_creation() {
    let (_driver, _bus, log) = create_debug_driver();

    assert_eq!(
        log.lines(),
        vec![
            "Read16 Control Word: 0x8001E2",
            "Read16 Result: 0x8316",
            "Device ID: 0x8316"
        ]
    );
}

#[test]
fn test_debug_output_reports_rejected_device_id() {
    let bus = MockBus::new();
    bus.set_register(addr::DEVICE_ID, 0xFFFF);
    let log = SharedLog::new();
    let interface = I2cInterface::default(bus, MockDelay::new()).with_debug(log.clone());

    let result = Mcf8316aDriver::new(interface);

    assert!(matches!(result, Err(Error::InvalidDevice(0xFFFF))));
    assert!(log.lines().contains(&"Device ID: 0xFFFF".to_owned()));
}

#[test]
fn test_unsupported_width_is_rejected_without_traffic() {
    let bus = MockBus::new();
    let mut interface = I2cInterface::default(bus.clone(), MockDelay::new());
    let mut buffer = [0u8; 3];

    let result = interface.read_register(0xE0, 24, &mut buffer);
    assert_eq!(result, Err(Error::UnsupportedWidth(24)));

    // Width and buffer length must agree
    let result = interface.write_register(0xE0, 32, &[0x00, 0x01]);
    assert_eq!(result, Err(Error::UnsupportedWidth(32)));

    assert!(bus.frames().is_empty());
}

#[test]
fn test_interface_64bit_access() {
    let bus = MockBus::new();
    let mut interface = I2cInterface::default(bus.clone(), MockDelay::new());
    interface.set_crc_enabled(true);

    let value: u64 = 0x0102_0304_0506_0708;
    interface
        .write_register(0x100, 64, &value.to_le_bytes())
        .unwrap();
    assert_eq!(bus.get_register(0x100), Some(value));

    let mut buffer = [0u8; 8];
    interface.read_register(0x100, 64, &mut buffer).unwrap();
    assert_eq!(u64::from_le_bytes(buffer), value);

    // Control word carries data length code 2
    assert_eq!(bus.frames()[0], write_frame(&[0x60, 0x01, 0x00]));
}

#[test]
fn test_set_i2c_address() {
    let (mut driver, bus) = create_mock_driver();
    assert_eq!(driver.i2c_address(), 0x01);

    bus.set_device_address(0x22);
    let result = driver.device_id();
    assert_eq!(
        result,
        Err(Error::Bus(MockError(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address
        ))))
    );

    driver.set_i2c_address(0x22);
    assert_eq!(driver.i2c_address(), 0x22);
    bus.clear_operations();
    assert_eq!(driver.device_id().unwrap(), 0x8316);
    assert!(bus.frames().iter().all(|frame| match frame {
        Frame::Write { target, .. } | Frame::Read { target, .. } => *target == 0x22,
    }));
}

#[test]
fn test_custom_address_interface() {
    let bus = MockBus::new();
    bus.set_device_address(0x40);
    let interface = I2cInterface::new(bus.clone(), MockDelay::new(), 0x40);

    let mut driver = Mcf8316aDriver::new(interface).unwrap();
    assert_eq!(driver.i2c_address(), 0x40);
    assert_eq!(driver.device_id().unwrap(), 0x8316);
}

#[test]
fn test_operations_log() {
    let (mut driver, bus) = create_mock_driver();

    driver.write_register16(0xF2, 400).unwrap();
    driver.read_register16(0xF2).unwrap();

    assert_eq!(
        bus.operations(),
        vec![
            Operation::WriteRegister {
                address: addr::SPEED_CONTROL,
                value: 400
            },
            Operation::ReadRegister {
                address: addr::SPEED_CONTROL,
                value: 400
            },
        ]
    );
}
