//! Register map and bitfield values for the ADXL345.
//!
//! Every control register value the driver writes is composed here from the
//! named bits below, so the driver itself only moves bytes.

use crate::Error;

/// Expected contents of the `DEVID` register.
pub const DEVICE_ID: u8 = 0xE5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// SDO/ALT ADDRESS pin low (0x53).
    #[default]
    Default,
    /// SDO/ALT ADDRESS pin high (0x1D).
    Alternate,
    Custom(u8),
}

impl From<Address> for u8 {
    /// Convert the address to a [`u8`] for I2C communication.
    fn from(address: Address) -> u8 {
        match address {
            Address::Default => 0x53,
            Address::Alternate => 0x1D,
            Address::Custom(addr) => addr,
        }
    }
}

impl Address {
    pub fn new_custom(addr: u8) -> Self {
        Address::Custom(addr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Register {
    DEVID = 0x00,
    THRESH_TAP = 0x1D,
    DUR = 0x21,
    LATENT = 0x22,
    WINDOW = 0x23,
    TAP_AXES = 0x2A,
    ACT_TAP_STATUS = 0x2B,
    BW_RATE = 0x2C,
    POWER_CTL = 0x2D,
    INT_ENABLE = 0x2E,
    INT_MAP = 0x2F,
    INT_SOURCE = 0x30,
    DATA_FORMAT = 0x31,
    DATAX0 = 0x32,
    DATAX1 = 0x33,
    DATAY0 = 0x34,
    DATAY1 = 0x35,
    DATAZ0 = 0x36,
    DATAZ1 = 0x37,
}

impl From<Register> for u8 {
    /// Convert a [`Register`] into its memory address for writing to the I2C bus.
    fn from(register: Register) -> u8 {
        register as u8
    }
}

// DATA_FORMAT bits
pub const SELF_TEST: u8 = 0b1000_0000;
pub const SPI_3WIRE: u8 = 0b0100_0000;
pub const INT_INVERT: u8 = 0b0010_0000;
pub const FULL_RES: u8 = 0b0000_1000;
pub const JUSTIFY: u8 = 0b0000_0100;

// POWER_CTL bits
pub const AUTO_SLEEP: u8 = 0b0001_0000;
pub const MEASURE: u8 = 0b0000_1000;
pub const SLEEP: u8 = 0b0000_0100;

// INT_ENABLE / INT_MAP / INT_SOURCE bits
pub const INT_SINGLE_TAP: u8 = 0b0100_0000;
pub const INT_DOUBLE_TAP: u8 = 0b0010_0000;

// TAP_AXES bits
pub const TAP_AXES_Z: u8 = 0b0000_0001;
pub const TAP_AXES_Y: u8 = 0b0000_0010;
pub const TAP_AXES_X: u8 = 0b0000_0100;
const TAP_AXES_MASK: u8 = TAP_AXES_X | TAP_AXES_Y | TAP_AXES_Z;

/// Measurement range, DATA_FORMAT bits 1:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Range {
    G2 = 0b00,
    G4 = 0b01,
    G8 = 0b10,
    G16 = 0b11,
}

impl Range {
    /// Counts per g with FULL_RES cleared (10-bit output).
    pub const fn lsb_per_g(self) -> f32 {
        match self {
            Range::G2 => 256.0,
            Range::G4 => 128.0,
            Range::G8 => 64.0,
            Range::G16 => 32.0,
        }
    }
}

impl From<Range> for u8 {
    fn from(range: Range) -> u8 {
        range as u8
    }
}

/// Output data rate, BW_RATE bits 3:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataRate {
    Hz3200 = 0b1111,
    Hz1600 = 0b1110,
    Hz800 = 0b1101,
    Hz400 = 0b1100,
    Hz200 = 0b1011,
    Hz100 = 0b1010,
    Hz50 = 0b1001,
    Hz25 = 0b1000,
    Hz12_5 = 0b0111,
    Hz6_25 = 0b0110,
    Hz3_13 = 0b0101,
    Hz1_56 = 0b0100,
    Hz0_78 = 0b0011,
    Hz0_39 = 0b0010,
    Hz0_20 = 0b0001,
    Hz0_10 = 0b0000,
}

impl From<DataRate> for u8 {
    fn from(rate: DataRate) -> u8 {
        rate as u8
    }
}

/// Reading frequency while asleep, POWER_CTL bits 1:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WakeUp {
    Hz8 = 0b00,
    Hz4 = 0b01,
    Hz2 = 0b10,
    Hz1 = 0b11,
}

/// DATA_FORMAT register contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataFormat {
    pub self_test: bool,
    pub spi_3wire: bool,
    pub int_invert: bool,
    pub full_resolution: bool,
    /// Left-justified (MSB) output when set.
    pub justify: bool,
    pub range: Range,
}

impl DataFormat {
    /// All flags cleared with the given range.
    pub const fn new(range: Range) -> Self {
        Self {
            self_test: false,
            spi_3wire: false,
            int_invert: false,
            full_resolution: false,
            justify: false,
            range,
        }
    }

    pub const fn bits(&self) -> u8 {
        let mut value = self.range as u8;
        if self.self_test {
            value |= SELF_TEST;
        }
        if self.spi_3wire {
            value |= SPI_3WIRE;
        }
        if self.int_invert {
            value |= INT_INVERT;
        }
        if self.full_resolution {
            value |= FULL_RES;
        }
        if self.justify {
            value |= JUSTIFY;
        }
        value
    }
}

/// POWER_CTL register contents. The link bit is never set by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerControl {
    pub auto_sleep: bool,
    pub measure: bool,
    pub sleep: bool,
    pub wakeup: WakeUp,
}

impl PowerControl {
    /// Measuring, never sleeping, 8 Hz wake-up.
    pub const MEASUREMENT: Self = Self {
        auto_sleep: false,
        measure: true,
        sleep: false,
        wakeup: WakeUp::Hz8,
    };

    pub const STANDBY: Self = Self {
        auto_sleep: false,
        measure: false,
        sleep: false,
        wakeup: WakeUp::Hz8,
    };

    pub const fn bits(&self) -> u8 {
        let mut value = self.wakeup as u8;
        if self.auto_sleep {
            value |= AUTO_SLEEP;
        }
        if self.measure {
            value |= MEASURE;
        }
        if self.sleep {
            value |= SLEEP;
        }
        value
    }
}

/// Tap detection thresholds and timing.
///
/// `threshold` is 62.5 mg/LSB. `duration`, `latency` and `window` are
/// 1.25 ms/LSB. `axes` is an OR of [`TAP_AXES_X`], [`TAP_AXES_Y`] and
/// [`TAP_AXES_Z`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapConfig {
    pub threshold: u8,
    pub duration: u8,
    pub latency: u8,
    pub window: u8,
    pub axes: u8,
}

impl Default for TapConfig {
    /// 3.125 g threshold, 18.75 ms duration, 150 ms latency, 253.75 ms
    /// window, Z axis only.
    fn default() -> Self {
        Self {
            threshold: 0x32,
            duration: 0x0F,
            latency: 0x78,
            window: 0xCB,
            axes: TAP_AXES_Z,
        }
    }
}

impl TapConfig {
    /// Reject axis masks that would touch the suppress bit or reserved bits.
    pub fn validate<E>(&self) -> Result<(), Error<E>> {
        if self.axes & !TAP_AXES_MASK != 0 {
            return Err(Error::InvalidConfiguration);
        }
        Ok(())
    }

    /// Register writes in the order they are issued.
    pub(crate) fn writes(&self) -> [(Register, u8); 6] {
        [
            (Register::THRESH_TAP, self.threshold),
            (Register::DUR, self.duration),
            (Register::LATENT, self.latency),
            (Register::WINDOW, self.window),
            (Register::INT_ENABLE, INT_SINGLE_TAP | INT_DOUBLE_TAP),
            (Register::TAP_AXES, self.axes),
        ]
    }
}
