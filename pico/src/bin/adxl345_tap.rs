#![no_main]
#![no_std]

use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, Async, I2c};
use embassy_rp::peripherals::{I2C0, USB};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_time::Timer;

use ADXL345::asynch::{Adxl345, AsyncI2cTransport};
use ADXL345::{is_double_tap, is_single_tap, Address, DataRate, Range};

use defmt_rtt as _;
use log::info;
use panic_probe as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
    I2C0_IRQ => embassy_rp::i2c::InterruptHandler<I2C0>;
});

// Async task for USB logging.
#[embassy_executor::task]
async fn logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let usb_driver = Driver::new(p.USB, Irqs);
    spawner.spawn(logger_task(usb_driver)).unwrap();

    // Give the host a moment to open the serial port
    Timer::after_secs(1).await;

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;

    let i2c0_sda = p.PIN_4;
    let i2c0_scl = p.PIN_5;
    let i2c0: I2c<'_, I2C0, Async> = I2c::new_async(p.I2C0, i2c0_scl, i2c0_sda, Irqs, i2c_config);

    spawner.spawn(adxl345_task(i2c0)).unwrap();
}

#[embassy_executor::task]
async fn adxl345_task(i2c: I2c<'static, I2C0, Async>) {
    let mut sensor = Adxl345::new_with_address(AsyncI2cTransport::new(i2c), Address::Default);

    loop {
        match sensor.verify_device().await {
            Ok(()) => break,
            Err(e) => {
                info!("ADXL345 not found: {:?}", e);
                Timer::after_millis(1000).await;
            }
        }
    }

    if let Err(e) = sensor.configure_with_range(Range::G16).await {
        info!("Error configuring ADXL345: {:?}", e);
    }
    if let Err(e) = sensor.set_data_rate(DataRate::Hz25).await {
        info!("Error setting data rate: {:?}", e);
    }
    if let Err(e) = sensor.power_on().await {
        info!("Error powering on: {:?}", e);
    }
    if let Err(e) = sensor.enable_tap_detection().await {
        info!("Error enabling tap detection: {:?}", e);
    }

    loop {
        match sensor.read_acceleration_mps2(Range::G16).await {
            Ok((x, y, z)) => info!("accel x: {} y: {} z: {}", x, y, z),
            Err(e) => info!("Error reading acceleration: {:?}", e),
        }

        match sensor.read_interrupt_status().await {
            Ok(status) if is_double_tap(status) => info!("double tap"),
            Ok(status) if is_single_tap(status) => info!("single tap"),
            Ok(_) => {}
            Err(e) => info!("Error reading interrupt status: {:?}", e),
        }

        Timer::after_millis(40).await; // 40 milliseconds delay for 25 Hz
    }
}
