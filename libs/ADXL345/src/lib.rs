//! This is a driver for the ADXL345 accelerometer.
//!
//!- [Datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/ADXL345.pdf)
//!
//! The blocking driver lives at the crate root, the async one in [`asynch`].
//! Both talk to the device through a transport handed in at construction.

#![cfg_attr(not(test), no_std)]

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    };
}

pub mod asynch;
mod registers;
mod transport;

use embedded_hal::i2c::I2c;
pub use registers::*;
pub use transport::{I2cTransport, Transport};

const SENSORS_GRAVITY_EARTH: f32 = 9.80665; // m/s^2

/// BW_RATE code written by [`Adxl345::configure`]. Matches the power-on default.
pub const DEFAULT_DATA_RATE: DataRate = DataRate::Hz100;

/// Range written by [`Adxl345::configure`].
pub const DEFAULT_RANGE: Range = Range::G16;

/// Errors that can occur when communicating with the ADXL345.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transaction failed. The inner error comes from the transport.
    Transport(E),

    /// The `DEVID` register did not read `0xE5`. The value read is provided.
    DeviceNotFound(u8),

    /// A configuration value does not fit its register field.
    InvalidConfiguration,
}

/// Note: [`embedded_hal_async::i2c::ErrorKind`] is an alias for [`embedded_hal::i2c::ErrorKind`], so the one impl
/// covers both.
impl From<embedded_hal::i2c::ErrorKind> for Error<embedded_hal::i2c::ErrorKind> {
    fn from(error: embedded_hal::i2c::ErrorKind) -> Self {
        Error::Transport(error)
    }
}

/// One raw reading, in counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Sample {
    /// Decode `DATAX0..=DATAZ1`. Each axis is a little-endian two's
    /// complement 16-bit value.
    pub const fn from_le_bytes(raw: [u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    /// Scale to g. Only meaningful with FULL_RES cleared and right
    /// justification, which is what [`Adxl345::configure`] sets.
    pub fn to_g(&self, range: Range) -> (f32, f32, f32) {
        let lsb = range.lsb_per_g();
        (
            self.x as f32 / lsb,
            self.y as f32 / lsb,
            self.z as f32 / lsb,
        )
    }

    /// Scale to m/s^2. See [`Sample::to_g`].
    pub fn to_mps2(&self, range: Range) -> (f32, f32, f32) {
        let (x, y, z) = self.to_g(range);
        (
            x * SENSORS_GRAVITY_EARTH,
            y * SENSORS_GRAVITY_EARTH,
            z * SENSORS_GRAVITY_EARTH,
        )
    }
}

/// True if the single-tap bit is set in an `INT_SOURCE` value.
pub const fn is_single_tap(status: u8) -> bool {
    status & INT_SINGLE_TAP == INT_SINGLE_TAP
}

/// True if the double-tap bit is set in an `INT_SOURCE` value.
pub const fn is_double_tap(status: u8) -> bool {
    status & INT_DOUBLE_TAP == INT_DOUBLE_TAP
}

pub struct Adxl345<T> {
    transport: T,
    address: Address,
}

impl<I> Adxl345<I2cTransport<I>>
where
    I: I2c,
{
    /// Create a driver on an I2C bus at the default address.
    pub fn from_i2c(i2c: I) -> Self {
        Self::new(I2cTransport::new(i2c))
    }
}

impl<T, E> Adxl345<T>
where
    T: Transport<Error = E>,
{
    /// Create a new ADXL345 driver at the default address (0x53).
    pub fn new(transport: T) -> Self {
        Self::new_with_address(transport, Address::Default)
    }

    pub fn new_with_address(transport: T, address: Address) -> Self {
        Self { transport, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Consume the driver and return the transport.
    pub fn release(self) -> T {
        self.transport
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        trace!("write {} <- {:#x}", register, value);
        self.transport
            .write_register(self.address.into(), register.into(), value)
            .map_err(Error::Transport)
    }

    fn read_registers(&mut self, register: Register, buffer: &mut [u8]) -> Result<(), Error<E>> {
        trace!("read {} ({=usize} bytes)", register, buffer.len());
        self.transport
            .read_registers(self.address.into(), register.into(), buffer)
            .map_err(Error::Transport)
    }

    fn read_register(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buffer = [0];
        self.read_registers(register, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Read the device ID.
    pub fn read_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::DEVID)
    }

    /// Check that an ADXL345 answers at the configured address.
    pub fn verify_device(&mut self) -> Result<(), Error<E>> {
        let id = self.read_device_id()?;
        if id != DEVICE_ID {
            warn!("unexpected device id {:#x}", id);
            return Err(Error::DeviceNotFound(id));
        }
        Ok(())
    }

    /// Returns true if the device ID reads `0xE5`. A bus failure counts as
    /// not found; use [`Adxl345::verify_device`] to tell the two apart.
    pub fn detect(&mut self) -> bool {
        self.verify_device().is_ok()
    }

    /// Write the default data format (all flags cleared, ±16 g) and the
    /// default output data rate.
    pub fn configure(&mut self) -> Result<(), Error<E>> {
        self.configure_with_range(DEFAULT_RANGE)
    }

    /// Same as [`Adxl345::configure`] with a chosen measurement range.
    pub fn configure_with_range(&mut self, range: Range) -> Result<(), Error<E>> {
        self.set_data_format(DataFormat::new(range))?;
        self.set_data_rate(DEFAULT_DATA_RATE)
    }

    pub fn set_data_format(&mut self, format: DataFormat) -> Result<(), Error<E>> {
        debug!("data format {=u8:#x}", format.bits());
        self.write_register(Register::DATA_FORMAT, format.bits())
    }

    /// Write a raw BW_RATE code. The value is not checked.
    pub fn set_output_rate(&mut self, rate: u8) -> Result<(), Error<E>> {
        self.write_register(Register::BW_RATE, rate)
    }

    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<E>> {
        debug!("data rate {}", rate);
        self.set_output_rate(rate.into())
    }

    pub fn set_power_control(&mut self, power: PowerControl) -> Result<(), Error<E>> {
        self.write_register(Register::POWER_CTL, power.bits())
    }

    /// Start measuring. Call after [`Adxl345::configure`]; readings taken
    /// before this are zero or stale.
    pub fn power_on(&mut self) -> Result<(), Error<E>> {
        self.set_power_control(PowerControl::MEASUREMENT)
    }

    /// Stop measuring.
    pub fn standby(&mut self) -> Result<(), Error<E>> {
        self.set_power_control(PowerControl::STANDBY)
    }

    /// Read the X, Y, and Z acceleration values in counts.
    pub fn read_acceleration(&mut self) -> Result<Sample, Error<E>> {
        let mut buffer = [0; 6];
        self.read_registers(Register::DATAX0, &mut buffer)?;
        Ok(Sample::from_le_bytes(buffer))
    }

    /// Read the X, Y, and Z acceleration values in m/s^2. `range` must match
    /// the range the device was configured with.
    pub fn read_acceleration_mps2(&mut self, range: Range) -> Result<(f32, f32, f32), Error<E>> {
        Ok(self.read_acceleration()?.to_mps2(range))
    }

    /// Read `INT_SOURCE`. Decode with [`is_single_tap`] and [`is_double_tap`].
    pub fn read_interrupt_status(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::INT_SOURCE)
    }

    /// Read `ACT_TAP_STATUS`: which axis saw the first tap.
    pub fn read_tap_status(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::ACT_TAP_STATUS)
    }

    /// Write `INT_MAP`. A set bit routes that interrupt to INT2, clear to INT1.
    pub fn set_interrupt_map(&mut self, map: u8) -> Result<(), Error<E>> {
        self.write_register(Register::INT_MAP, map)
    }

    /// Enable single and double tap interrupts on the Z axis with the
    /// [`TapConfig::default`] timings.
    pub fn enable_tap_detection(&mut self) -> Result<(), Error<E>> {
        self.enable_tap_detection_with(TapConfig::default())
    }

    /// Enable single and double tap interrupts with custom timings and axes.
    pub fn enable_tap_detection_with(&mut self, config: TapConfig) -> Result<(), Error<E>> {
        config.validate::<E>()?;
        debug!("tap detection {}", config);
        for (register, value) in config.writes() {
            self.write_register(register, value)?;
        }
        Ok(())
    }

    /// Ask the transport to move the bus to other pins. A no-op on transports
    /// that cannot remap.
    pub fn init_pins(&mut self, sda: u8, scl: u8) -> Result<(), Error<E>> {
        self.transport.remap_pins(sda, scl).map_err(Error::Transport)
    }
}
