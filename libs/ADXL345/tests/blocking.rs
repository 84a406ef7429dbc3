use approx::assert_relative_eq;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

use ADXL345::{
    is_double_tap, is_single_tap, Address, Adxl345, DataFormat, DataRate, Error, I2cTransport,
    PowerControl, Range, Sample, TapConfig, WakeUp, TAP_AXES_X, TAP_AXES_Y,
};

const ADDR: u8 = 0x53;

fn driver(expectations: &[I2cTrans]) -> Adxl345<I2cTransport<I2cMock>> {
    Adxl345::from_i2c(I2cMock::new(expectations))
}

fn finish(driver: Adxl345<I2cTransport<I2cMock>>) {
    driver.release().release().done();
}

fn devid(value: u8) -> I2cTrans {
    I2cTrans::write_read(ADDR, vec![0x00], vec![value])
}

#[test]
fn detect_accepts_device_id() {
    let mut adxl = driver(&[devid(0xE5)]);
    assert!(adxl.detect());
    finish(adxl);
}

#[test]
fn detect_rejects_other_ids() {
    let mut adxl = driver(&[devid(0x00), devid(0xE4), devid(0xFF)]);
    assert!(!adxl.detect());
    assert!(!adxl.detect());
    assert!(!adxl.detect());
    finish(adxl);
}

#[test]
fn detect_is_false_on_bus_failure() {
    let mut adxl = driver(&[devid(0xE5).with_error(ErrorKind::Other)]);
    assert!(!adxl.detect());
    finish(adxl);
}

#[test]
fn verify_device_distinguishes_failures() {
    let mut adxl = driver(&[
        devid(0x12),
        devid(0xE5).with_error(ErrorKind::Other),
        devid(0xE5),
    ]);
    assert_eq!(adxl.verify_device(), Err(Error::DeviceNotFound(0x12)));
    assert_eq!(
        adxl.verify_device(),
        Err(Error::Transport(ErrorKind::Other))
    );
    assert_eq!(adxl.verify_device(), Ok(()));
    finish(adxl);
}

#[test]
fn alternate_address_is_used_on_the_bus() {
    let i2c = I2cMock::new(&[I2cTrans::write_read(0x1D, vec![0x00], vec![0xE5])]);
    let mut adxl = Adxl345::new_with_address(I2cTransport::new(i2c), Address::Alternate);
    assert_eq!(adxl.address(), Address::Alternate);
    assert!(adxl.detect());
    finish(adxl);
}

#[test]
fn configure_writes_16g_preset() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x31, 0b0000_0011]),
        I2cTrans::write(ADDR, vec![0x2C, 0x0A]),
    ]);
    adxl.configure().unwrap();
    finish(adxl);
}

#[test]
fn configure_writes_2g_preset() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x31, 0b0000_0000]),
        I2cTrans::write(ADDR, vec![0x2C, 0x0A]),
    ]);
    adxl.configure_with_range(Range::G2).unwrap();
    finish(adxl);
}

#[test]
fn set_data_format_writes_composed_bits() {
    let format = DataFormat {
        full_resolution: true,
        ..DataFormat::new(Range::G8)
    };
    let mut adxl = driver(&[I2cTrans::write(ADDR, vec![0x31, 0b0000_1010])]);
    adxl.set_data_format(format).unwrap();
    finish(adxl);
}

#[test]
fn set_output_rate_writes_every_code_verbatim() {
    let expectations: Vec<I2cTrans> = (0u8..16)
        .map(|code| I2cTrans::write(ADDR, vec![0x2C, code]))
        .collect();
    let mut adxl = driver(&expectations);
    for code in 0u8..16 {
        adxl.set_output_rate(code).unwrap();
    }
    finish(adxl);
}

#[test]
fn set_output_rate_does_not_validate() {
    let mut adxl = driver(&[I2cTrans::write(ADDR, vec![0x2C, 0xFF])]);
    adxl.set_output_rate(0xFF).unwrap();
    finish(adxl);
}

#[test]
fn set_data_rate_uses_rate_code() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x2C, 0b1111]),
        I2cTrans::write(ADDR, vec![0x2C, 0b0000]),
    ]);
    adxl.set_data_rate(DataRate::Hz3200).unwrap();
    adxl.set_data_rate(DataRate::Hz0_10).unwrap();
    finish(adxl);
}

#[test]
fn power_on_and_standby() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x2D, 0x08]),
        I2cTrans::write(ADDR, vec![0x2D, 0x00]),
        I2cTrans::write(ADDR, vec![0x2D, 0b0001_1010]),
    ]);
    adxl.power_on().unwrap();
    adxl.standby().unwrap();
    adxl.set_power_control(PowerControl {
        auto_sleep: true,
        measure: true,
        sleep: false,
        wakeup: WakeUp::Hz2,
    })
    .unwrap();
    finish(adxl);
}

#[test]
fn read_acceleration_decodes_signed_little_endian() {
    let mut adxl = driver(&[I2cTrans::write_read(
        ADDR,
        vec![0x32],
        vec![0x10, 0x00, 0xF0, 0xFF, 0x00, 0x80],
    )]);
    let sample = adxl.read_acceleration().unwrap();
    assert_eq!(
        sample,
        Sample {
            x: 16,
            y: -16,
            z: -32768
        }
    );
    finish(adxl);
}

#[test]
fn read_acceleration_keeps_high_byte_magnitude() {
    // A magnitude-plus-sign-byte decode would read these as -5, -1, 127.
    let mut adxl = driver(&[I2cTrans::write_read(
        ADDR,
        vec![0x32],
        vec![0x05, 0x01, 0xFF, 0x01, 0x7F, 0x00],
    )]);
    let sample = adxl.read_acceleration().unwrap();
    assert_eq!(
        sample,
        Sample {
            x: 261,
            y: 511,
            z: 127
        }
    );
    finish(adxl);
}

#[test]
fn read_acceleration_mps2_scales_by_range() {
    let mut adxl = driver(&[I2cTrans::write_read(
        ADDR,
        vec![0x32],
        vec![0x20, 0x00, 0xE0, 0xFF, 0x00, 0x00],
    )]);
    let (x, y, z) = adxl.read_acceleration_mps2(Range::G16).unwrap();
    assert_relative_eq!(x, 9.80665, epsilon = 1e-4);
    assert_relative_eq!(y, -9.80665, epsilon = 1e-4);
    assert_relative_eq!(z, 0.0);
    finish(adxl);
}

#[test]
fn read_interrupt_status_returns_raw_byte() {
    let mut adxl = driver(&[
        I2cTrans::write_read(ADDR, vec![0x30], vec![0x40]),
        I2cTrans::write_read(ADDR, vec![0x30], vec![0xE3]),
    ]);

    let status = adxl.read_interrupt_status().unwrap();
    assert_eq!(status, 0x40);
    assert!(is_single_tap(status));
    assert!(!is_double_tap(status));

    let status = adxl.read_interrupt_status().unwrap();
    assert_eq!(status, 0xE3);
    assert!(is_single_tap(status));
    assert!(is_double_tap(status));
    finish(adxl);
}

#[test]
fn tap_predicates() {
    assert!(is_single_tap(0x40));
    assert!(!is_single_tap(0x00));
    assert!(!is_single_tap(0xBF));
    assert!(is_double_tap(0x20));
    assert!(!is_double_tap(0xDF));
    assert!(!is_double_tap(0x00));
}

#[test]
fn read_tap_status_and_interrupt_map() {
    let mut adxl = driver(&[
        I2cTrans::write_read(ADDR, vec![0x2B], vec![0x01]),
        I2cTrans::write(ADDR, vec![0x2F, 0x20]),
    ]);
    assert_eq!(adxl.read_tap_status().unwrap(), 0x01);
    adxl.set_interrupt_map(0x20).unwrap();
    finish(adxl);
}

#[test]
fn enable_tap_detection_writes_preset() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x1D, 0x32]),
        I2cTrans::write(ADDR, vec![0x21, 0x0F]),
        I2cTrans::write(ADDR, vec![0x22, 0x78]),
        I2cTrans::write(ADDR, vec![0x23, 0xCB]),
        I2cTrans::write(ADDR, vec![0x2E, 0x60]),
        I2cTrans::write(ADDR, vec![0x2A, 0x01]),
    ]);
    adxl.enable_tap_detection().unwrap();
    finish(adxl);
}

#[test]
fn enable_tap_detection_with_custom_config() {
    let config = TapConfig {
        threshold: 0x40,
        duration: 0x10,
        latency: 0x50,
        window: 0xF0,
        axes: TAP_AXES_X | TAP_AXES_Y,
    };
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x1D, 0x40]),
        I2cTrans::write(ADDR, vec![0x21, 0x10]),
        I2cTrans::write(ADDR, vec![0x22, 0x50]),
        I2cTrans::write(ADDR, vec![0x23, 0xF0]),
        I2cTrans::write(ADDR, vec![0x2E, 0x60]),
        I2cTrans::write(ADDR, vec![0x2A, 0b0000_0110]),
    ]);
    adxl.enable_tap_detection_with(config).unwrap();
    finish(adxl);
}

#[test]
fn enable_tap_detection_rejects_bad_axes_before_bus_traffic() {
    let config = TapConfig {
        axes: 0b1000_0001,
        ..TapConfig::default()
    };
    let mut adxl = driver(&[]);
    assert_eq!(
        adxl.enable_tap_detection_with(config),
        Err(Error::InvalidConfiguration)
    );
    finish(adxl);
}

#[test]
fn write_failures_surface_as_transport_errors() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x2D, 0x08]).with_error(ErrorKind::Other),
        I2cTrans::write(ADDR, vec![0x2C, 0x0A]).with_error(ErrorKind::Other),
    ]);
    assert_eq!(adxl.power_on(), Err(Error::Transport(ErrorKind::Other)));
    assert_eq!(
        adxl.set_data_rate(DataRate::Hz100),
        Err(Error::Transport(ErrorKind::Other))
    );
    finish(adxl);
}

#[test]
fn read_failures_surface_as_transport_errors() {
    let mut adxl = driver(&[
        I2cTrans::write_read(ADDR, vec![0x32], vec![0; 6]).with_error(ErrorKind::Other),
        I2cTrans::write_read(ADDR, vec![0x30], vec![0x40]).with_error(ErrorKind::Other),
    ]);
    assert_eq!(
        adxl.read_acceleration(),
        Err(Error::Transport(ErrorKind::Other))
    );
    assert_eq!(
        adxl.read_interrupt_status(),
        Err(Error::Transport(ErrorKind::Other))
    );
    finish(adxl);
}

#[test]
fn configure_stops_at_first_failed_write() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x31, 0x03]).with_error(ErrorKind::Other),
        // Retried by the caller, not the driver
        I2cTrans::write(ADDR, vec![0x31, 0x03]),
        I2cTrans::write(ADDR, vec![0x2C, 0x0A]),
    ]);
    assert!(adxl.configure().is_err());
    adxl.configure().unwrap();
    finish(adxl);
}

#[test]
fn tap_preset_stops_at_first_failed_write() {
    let mut adxl = driver(&[
        I2cTrans::write(ADDR, vec![0x1D, 0x32]),
        I2cTrans::write(ADDR, vec![0x21, 0x0F]),
        I2cTrans::write(ADDR, vec![0x22, 0x78]).with_error(ErrorKind::Other),
    ]);
    assert_eq!(
        adxl.enable_tap_detection(),
        Err(Error::Transport(ErrorKind::Other))
    );
    finish(adxl);
}

#[test]
fn typical_session() {
    let mut adxl = driver(&[
        devid(0xE5),
        I2cTrans::write(ADDR, vec![0x31, 0x03]),
        I2cTrans::write(ADDR, vec![0x2C, 0x0A]),
        I2cTrans::write(ADDR, vec![0x2D, 0x08]),
        I2cTrans::write(ADDR, vec![0x1D, 0x32]),
        I2cTrans::write(ADDR, vec![0x21, 0x0F]),
        I2cTrans::write(ADDR, vec![0x22, 0x78]),
        I2cTrans::write(ADDR, vec![0x23, 0xCB]),
        I2cTrans::write(ADDR, vec![0x2E, 0x60]),
        I2cTrans::write(ADDR, vec![0x2A, 0x01]),
        I2cTrans::write_read(ADDR, vec![0x32], vec![0x01, 0x00, 0x02, 0x00, 0x20, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x30], vec![0x20]),
    ]);

    assert!(adxl.detect());
    adxl.configure().unwrap();
    adxl.power_on().unwrap();
    adxl.enable_tap_detection().unwrap();

    let sample = adxl.read_acceleration().unwrap();
    assert_eq!(sample, Sample { x: 1, y: 2, z: 32 });
    let (_, _, z) = sample.to_g(Range::G16);
    assert_relative_eq!(z, 1.0);

    let status = adxl.read_interrupt_status().unwrap();
    assert!(is_double_tap(status));
    assert!(!is_single_tap(status));
    finish(adxl);
}
