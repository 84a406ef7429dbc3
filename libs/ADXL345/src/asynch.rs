//! Async flavour of the driver, for executors such as embassy.
//!
//! Register semantics are identical to the blocking [`crate::Adxl345`].

use embedded_hal_async::i2c::I2c;

use crate::{
    Address, DataFormat, DataRate, Error, PowerControl, Range, Register, Sample, TapConfig,
    DEFAULT_DATA_RATE, DEFAULT_RANGE, DEVICE_ID,
};

/// Async counterpart of [`crate::Transport`].
#[allow(async_fn_in_trait)]
pub trait AsyncTransport {
    type Error;

    async fn write_register(&mut self, device: u8, register: u8, value: u8)
        -> Result<(), Self::Error>;

    async fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;

    async fn remap_pins(&mut self, sda: u8, scl: u8) -> Result<(), Self::Error> {
        let _ = (sda, scl);
        Ok(())
    }
}

/// [`AsyncTransport`] over an `embedded_hal_async::i2c::I2c` bus.
pub struct AsyncI2cTransport<I> {
    i2c: I,
}

impl<I> AsyncI2cTransport<I> {
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I, E> AsyncTransport for AsyncI2cTransport<I>
where
    I: I2c<Error = E>,
{
    type Error = E;

    async fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), E> {
        self.i2c.write(device, &[register, value]).await
    }

    async fn read_registers(
        &mut self,
        device: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), E> {
        self.i2c.write_read(device, &[register], buffer).await
    }
}

pub struct Adxl345<T> {
    transport: T,
    address: Address,
}

impl<I> Adxl345<AsyncI2cTransport<I>>
where
    I: I2c,
{
    pub fn from_i2c(i2c: I) -> Self {
        Self::new(AsyncI2cTransport::new(i2c))
    }
}

impl<T, E> Adxl345<T>
where
    T: AsyncTransport<Error = E>,
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

    pub fn release(self) -> T {
        self.transport
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        trace!("write {} <- {:#x}", register, value);
        self.transport
            .write_register(self.address.into(), register.into(), value)
            .await
            .map_err(Error::Transport)
    }

    async fn read_registers(
        &mut self,
        register: Register,
        buffer: &mut [u8],
    ) -> Result<(), Error<E>> {
        trace!("read {} ({=usize} bytes)", register, buffer.len());
        self.transport
            .read_registers(self.address.into(), register.into(), buffer)
            .await
            .map_err(Error::Transport)
    }

    async fn read_register(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buffer = [0];
        self.read_registers(register, &mut buffer).await?;
        Ok(buffer[0])
    }

    pub async fn read_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::DEVID).await
    }

    pub async fn verify_device(&mut self) -> Result<(), Error<E>> {
        let id = self.read_device_id().await?;
        if id != DEVICE_ID {
            warn!("unexpected device id {:#x}", id);
            return Err(Error::DeviceNotFound(id));
        }
        Ok(())
    }

    pub async fn detect(&mut self) -> bool {
        self.verify_device().await.is_ok()
    }

    pub async fn configure(&mut self) -> Result<(), Error<E>> {
        self.configure_with_range(DEFAULT_RANGE).await
    }

    pub async fn configure_with_range(&mut self, range: Range) -> Result<(), Error<E>> {
        self.set_data_format(DataFormat::new(range)).await?;
        self.set_data_rate(DEFAULT_DATA_RATE).await
    }

    pub async fn set_data_format(&mut self, format: DataFormat) -> Result<(), Error<E>> {
        debug!("data format {=u8:#x}", format.bits());
        self.write_register(Register::DATA_FORMAT, format.bits()).await
    }

    pub async fn set_output_rate(&mut self, rate: u8) -> Result<(), Error<E>> {
        self.write_register(Register::BW_RATE, rate).await
    }

    pub async fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<E>> {
        debug!("data rate {}", rate);
        self.set_output_rate(rate.into()).await
    }

    pub async fn set_power_control(&mut self, power: PowerControl) -> Result<(), Error<E>> {
        self.write_register(Register::POWER_CTL, power.bits()).await
    }

    pub async fn power_on(&mut self) -> Result<(), Error<E>> {
        self.set_power_control(PowerControl::MEASUREMENT).await
    }

    pub async fn standby(&mut self) -> Result<(), Error<E>> {
        self.set_power_control(PowerControl::STANDBY).await
    }

    pub async fn read_acceleration(&mut self) -> Result<Sample, Error<E>> {
        let mut buffer = [0; 6];
        self.read_registers(Register::DATAX0, &mut buffer).await?;
        Ok(Sample::from_le_bytes(buffer))
    }

    pub async fn read_acceleration_mps2(
        &mut self,
        range: Range,
    ) -> Result<(f32, f32, f32), Error<E>> {
        Ok(self.read_acceleration().await?.to_mps2(range))
    }

    pub async fn read_interrupt_status(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::INT_SOURCE).await
    }

    pub async fn read_tap_status(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::ACT_TAP_STATUS).await
    }

    pub async fn set_interrupt_map(&mut self, map: u8) -> Result<(), Error<E>> {
        self.write_register(Register::INT_MAP, map).await
    }

    pub async fn enable_tap_detection(&mut self) -> Result<(), Error<E>> {
        self.enable_tap_detection_with(TapConfig::default()).await
    }

    pub async fn enable_tap_detection_with(&mut self, config: TapConfig) -> Result<(), Error<E>> {
        config.validate::<E>()?;
        debug!("tap detection {}", config);
        for (register, value) in config.writes() {
            self.write_register(register, value).await?;
        }
        Ok(())
    }

    pub async fn init_pins(&mut self, sda: u8, scl: u8) -> Result<(), Error<E>> {
        self.transport
            .remap_pins(sda, scl)
            .await
            .map_err(Error::Transport)
    }
}
