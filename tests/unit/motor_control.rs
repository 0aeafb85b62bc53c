//! Unit tests for DEV_CTRL based motor control

use crate::common::{Operation, addr, create_mock_driver};
use mcf8316a::{Direction, MotorParameters, SpeedProfile, SpeedRange};

#[test]
fn test_start_sets_run_bit() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(addr::DEV_CTRL, 0);

    driver.start().unwrap();

    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0x0001));
    // Read-modify-write
    assert_eq!(
        bus.operations(),
        vec![
            Operation::ReadRegister {
                address: addr::DEV_CTRL,
                value: 0
            },
            Operation::WriteRegister {
                address: addr::DEV_CTRL,
                value: 0x0001
            },
        ]
    );
}

#[test]
fn test_stop_preserves_other_bits() {
    let (mut driver, bus) = create_mock_driver();
    // run | direction | speed mode
    bus.set_register(addr::DEV_CTRL, 0b1_0011);

    driver.stop().unwrap();

    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0b1_0010));
}

#[test]
fn test_coast_clears_run_bit() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(addr::DEV_CTRL, 0x0001);

    driver.coast().unwrap();

    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0));
}

#[test]
fn test_brake_sets_brake_bit() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(addr::DEV_CTRL, 0x0001);

    driver.brake().unwrap();

    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0x0005));
}

#[test]
fn test_direction() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(addr::DEV_CTRL, 0x0001);

    assert_eq!(driver.direction().unwrap(), Direction::Forward);

    driver.set_direction(Direction::Reverse).unwrap();
    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0x0003));
    assert_eq!(driver.direction().unwrap(), Direction::Reverse);

    driver.set_direction(Direction::Forward).unwrap();
    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0x0001));
}

#[test]
fn test_speed_loop_toggle() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(addr::DEV_CTRL, 0);

    driver.enable_speed_loop().unwrap();
    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0x0010));

    driver.disable_speed_loop().unwrap();
    assert_eq!(bus.get_register(addr::DEV_CTRL), Some(0));
}

#[test]
fn test_motor_parameters() {
    let (mut driver, bus) = create_mock_driver();

    let params = MotorParameters {
        resistance_mohm: 0x12,
        inductance_uh: 0x34,
    };
    driver.set_motor_parameters(params).unwrap();

    // Resistance in the high byte, inductance in the low byte
    assert_eq!(bus.get_register(addr::MTR_PARAMS), Some(0x1234));
    assert_eq!(driver.motor_parameters().unwrap(), params);
}

#[test]
fn test_speed_range_preserves_low_bits() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(addr::CLOSED_LOOP1, 0x0123);

    driver.set_speed_range(SpeedRange::Hz800).unwrap();

    assert_eq!(bus.get_register(addr::CLOSED_LOOP1), Some(0x8123));
    assert_eq!(driver.speed_range().unwrap(), SpeedRange::Hz800);

    driver.set_speed_range(SpeedRange::Hz120).unwrap();
    assert_eq!(bus.get_register(addr::CLOSED_LOOP1), Some(0x0123));
}

#[test]
fn test_speed_profiles_map_to_consecutive_registers() {
    let (mut driver, bus) = create_mock_driver();

    let profile = SpeedProfile {
        speed_hz: 0x20,
        accel_hz_per_s: 0x10,
    };
    driver.set_speed_profile(0, profile).unwrap();
    driver.set_speed_profile(4, profile).unwrap();

    assert_eq!(bus.get_register(addr::SPEED_PROFILES1), Some(0x1020));
    assert_eq!(bus.get_register(addr::SPEED_PROFILES1 + 8), Some(0x1020));
    assert_eq!(bus.get_register(addr::SPEED_PROFILES1 + 2), None);

    assert_eq!(driver.speed_profile(4).unwrap(), profile);
}

#[test]
fn test_generated_register_access() {
    let (mut driver, bus) = create_mock_driver();
    bus.set_register(0x80, 0x1234);

    // Registers without a dedicated method stay reachable
    let isd = driver.device_mut().isd_config().read().unwrap();
    assert_eq!(isd.value(), 0x1234);

    driver
        .device_mut()
        .fault_config_1()
        .write(|w| {
            w.set_value(0xBEEF);
        })
        .unwrap();
    assert_eq!(bus.get_register(0x90), Some(0xBEEF));
}
