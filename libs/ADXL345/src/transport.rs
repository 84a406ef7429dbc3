//! Bus access used by the driver.
//!
//! The driver never touches a bus peripheral directly; it is handed a
//! [`Transport`] at construction. [`I2cTransport`] covers any
//! `embedded-hal` I2C bus.

use embedded_hal::i2c::I2c;

/// Addressed single-register writes and multi-register reads.
pub trait Transport {
    type Error;

    /// Write `value` to `register` on the device at `device`.
    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read `buffer.len()` consecutive registers starting at `register`.
    ///
    /// The device auto-increments its register pointer, so one addressed
    /// write followed by a read of the whole buffer is enough. Implementations
    /// must fill the entire buffer or return an error.
    fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Route the bus to other data/clock pins.
    ///
    /// Most platforms fix the pins when the bus is created, so the default
    /// does nothing. Override on platforms that can reassign them at runtime.
    fn remap_pins(&mut self, sda: u8, scl: u8) -> Result<(), Self::Error> {
        let _ = (sda, scl);
        Ok(())
    }
}

/// [`Transport`] over an `embedded_hal::i2c::I2c` bus.
pub struct I2cTransport<I> {
    i2c: I,
}

impl<I> I2cTransport<I> {
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Consume the transport and return the I2C peripheral.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I, E> Transport for I2cTransport<I>
where
    I: I2c<Error = E>,
{
    type Error = E;

    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), E> {
        self.i2c.write(device, &[register, value])
    }

    fn read_registers(&mut self, device: u8, register: u8, buffer: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(device, &[register], buffer)
    }
}
