//! Night-light firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                     │
//! │                                                            │
//! │  PinDriver ×3     DimmerDriver      Bh1750    SystemClock  │
//! │  (InputPin)       (DimmerPort)      (Lux)     (ClockPort)  │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌─────────── control task (APP core, 250 ms) ──────────┐  │
//! │  │  ControlLoop: InputMonitor · Automation · Dimmer     │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │            │ EventQueue            ▲ ManualHandle          │
//! │            ▼                       │ SharedConfig          │
//! │  ┌────────── event-log task (PRO core) ─────────────────┐  │
//! │  │  drain → LogEventSink                                │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::config::{Resolution, TimerConfig};
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use log::{debug, info, warn};

use nightlight::adapters::log_sink::LogEventSink;
use nightlight::adapters::time::SystemClock;
use nightlight::app::service::ControlLoop;
use nightlight::app::shared::Shared;
use nightlight::config::LightConfig;
use nightlight::drivers::dimmer::DimmerDriver;
use nightlight::drivers::inputs::InputMonitor;
use nightlight::drivers::task_pin::{CONTROL_TASK, EVENT_LOG_TASK, spawn_on_core};
use nightlight::pins;
use nightlight::sensors::bh1750::{self, Bh1750};

/// State shared by the control and event-log tasks.
static SHARED: Shared = Shared::new(LightConfig::DEFAULT);

type InputDriver = PinDriver<'static, AnyIOPin, Input>;

/// Active-low input with the internal pull-up enabled.
fn pulled_up_input(gpio: i32) -> Result<InputDriver> {
    // SAFETY: each GPIO number is claimed exactly once, from pins.rs.
    let pin = unsafe { AnyIOPin::new(gpio) };
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Nightlight v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;

    // ── 2. Inputs ─────────────────────────────────────────────
    let pir1 = pulled_up_input(pins::PIR1_GPIO)?;
    let pir2 = pulled_up_input(pins::PIR2_GPIO)?;
    let switch = pulled_up_input(pins::SWITCH_GPIO)?;

    // ── 3. Dimmer output (relay + LEDC) ───────────────────────
    // SAFETY: see `pulled_up_input`.
    let relay = PinDriver::output(unsafe { AnyOutputPin::new(pins::RELAY_GPIO) })?;
    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(pins::DIMMER_PWM_FREQ_HZ.Hz())
            .resolution(Resolution::Bits10),
    )?;
    let pwm = LedcDriver::new(peripherals.ledc.channel0, timer, unsafe {
        AnyOutputPin::new(pins::DIMMER_PWM_GPIO)
    })?;

    // ── 4. Lux sensor ─────────────────────────────────────────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        unsafe { AnyIOPin::new(pins::I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::I2C_SCL_GPIO) },
        &I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz()),
    )?;

    let clock = SystemClock::new();
    if !clock.is_synced() {
        warn!("Wall clock not set; ClockEnd timing and event stamps start at the epoch");
    }

    // ── 5. Event-log task ─────────────────────────────────────
    spawn_on_core(EVENT_LOG_TASK, || {
        let mut sink = LogEventSink::new();
        let period = Duration::from_millis(pins::EVENT_DRAIN_MS.into());
        loop {
            SHARED.events.drain_into(&mut sink);
            std::thread::sleep(period);
        }
    })?;

    // ── 6. Control task ───────────────────────────────────────
    let control = spawn_on_core(CONTROL_TASK, move || {
        let inputs = InputMonitor::new(Some(pir1), Some(pir2), Some(switch), &SHARED.inputs);
        let dimmer = DimmerDriver::new(relay, pwm, pins::DIMMER_DUTY_LOW, pins::DIMMER_DUTY_HIGH);
        let sensor = Bh1750::new(i2c, bh1750::DEFAULT_ADDRESS);
        let mut ctl = ControlLoop::new(&SHARED, inputs, dimmer, sensor, clock, pins::CONTROL_TICK_MS);
        ctl.start();

        let period = Duration::from_millis(pins::CONTROL_TICK_MS.into());
        let mut deadline = Instant::now();
        loop {
            ctl.tick();
            deadline += period;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                debug!("Control tick overran by {:?}", now - deadline);
                deadline = now;
            }
        }
    })?;

    info!("System ready.");
    control
        .join()
        .map(|_| ())
        .map_err(|_| anyhow!("control task panicked"))
}
