//! Control loop: the per-tick orchestrator.
//!
//! [`ControlLoop`] owns the input monitor, the automation engine (which in
//! turn owns the dimmer), the lux sensor and the clock. All hardware is
//! reached through port traits, so the whole loop runs on the host under
//! test with mock adapters.
//!
//! ```text
//!  InputPin ──▶ ┌──────────────────────────────┐ ──▶ EventQueue
//!  Lux     ──▶  │         ControlLoop          │
//!  Clock   ──▶  │ InputMonitor · Automation    │ ──▶ SharedStatus
//!  Manual  ──▶  └──────────────────────────────┘ ──▶ DimmerPort
//! ```
//!
//! Every control tick (250 ms) samples inputs, applies manual commands and
//! advances the dimmer ramp. The automation itself steps once per second;
//! its countdowns are in steps, i.e. seconds.

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::config::LightConfig;
use crate::drivers::inputs::{InputChannel, InputMonitor};
use crate::events::Event;
use crate::fsm::context::TickInput;
use crate::fsm::{Automation, Phase};
use crate::sensors::check_lux;

use super::commands::ManualCommand;
use super::ports::{ClockPort, DimmerPort, IlluminancePort};
use super::shared::Shared;
use super::status::StatusSnapshot;

/// Automation step period.
pub const STEP_PERIOD_MS: u32 = 1000;

pub struct ControlLoop<'a, P, D, S, C> {
    shared: &'a Shared,
    inputs: InputMonitor<'a, P>,
    automation: Automation<D>,
    sensor: S,
    clock: C,
    /// Control ticks per automation step.
    ticks_per_step: u32,
    /// Ticks until the next automation step; zero means "this tick".
    step_countdown: u32,
    tick_count: u64,
    lux: f32,
    manual_on: bool,
}

impl<'a, P, D, S, C> ControlLoop<'a, P, D, S, C>
where
    P: InputPin,
    D: DimmerPort,
    S: IlluminancePort,
    C: ClockPort,
{
    pub fn new(
        shared: &'a Shared,
        inputs: InputMonitor<'a, P>,
        dimmer: D,
        sensor: S,
        clock: C,
        tick_period_ms: u32,
    ) -> Self {
        let ticks_per_step = (STEP_PERIOD_MS / tick_period_ms.max(1)).max(1);
        Self {
            shared,
            inputs,
            automation: Automation::new(dimmer),
            sensor,
            clock,
            ticks_per_step,
            step_countdown: 0,
            tick_count: 0,
            lux: 0.0,
            manual_on: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the boot and take the first lux reading.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.shared.events.push(Event::HardwareReset, now);
        self.refresh_lux();
        self.publish();
        info!(
            "Control loop started at {} ({} ticks per step, {:.1} lx)",
            now.format("%Y-%m-%d %H:%M:%S"),
            self.ticks_per_step,
            self.lux
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One control tick. Never blocks.
    pub fn tick(&mut self) {
        self.tick_count += 1;
        let cfg = self.shared.config.snapshot();
        let now = self.clock.now();

        // 1. Debounce inputs
        self.inputs.tick(now, &cfg, &self.shared.events);

        // 2. Manual commands from the interactive context
        while let Some(cmd) = self.shared.manual.try_next() {
            self.apply_manual(cmd, &cfg, now);
        }

        // 3. Hardware switch toggles manual on/off
        if self.shared.inputs.take_activation(InputChannel::Switch) {
            self.toggle_manual(&cfg);
        }

        // 4. Automation step
        if self.step_countdown == 0 {
            self.step_countdown = self.ticks_per_step;
            self.refresh_lux();
            // Take both edges; a single step consumes them together.
            let pir1 = self.shared.inputs.take_activation(InputChannel::Pir1);
            let pir2 = self.shared.inputs.take_activation(InputChannel::Pir2);
            let input = TickInput {
                lux: self.lux,
                pir: pir1 || pir2,
                now,
            };
            self.automation.update(&input, &cfg, &self.shared.events);
        }
        self.step_countdown -= 1;

        // 5. Ramp
        self.automation.dimmer_mut().tick();

        // 6. Publish
        self.publish();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.automation.phase()
    }

    pub fn night_active(&self) -> bool {
        self.automation.night_active()
    }

    pub fn lux(&self) -> f32 {
        self.lux
    }

    pub fn manual_on(&self) -> bool {
        self.manual_on
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn ticks_per_step(&self) -> u32 {
        self.ticks_per_step
    }

    pub fn automation(&self) -> &Automation<D> {
        &self.automation
    }

    pub fn dimmer(&self) -> &D {
        self.automation.dimmer()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_manual(&mut self, cmd: ManualCommand, cfg: &LightConfig, now: chrono::NaiveDateTime) {
        debug!("Manual command: {:?}", cmd);
        let result = match cmd {
            ManualCommand::SetPercentSoft(p) => {
                self.automation.dimmer_mut().set_target_soft(p, cfg.ramp_step)
            }
            ManualCommand::SetPercentDirect(p) => self.automation.dimmer_mut().set_target_direct(p),
            ManualCommand::ForceOn => {
                self.force(true, cfg);
                if cfg.log_detection {
                    self.shared.events.push(Event::SwitchOn, now);
                }
                Ok(())
            }
            ManualCommand::ForceOff => {
                self.force(false, cfg);
                if cfg.log_detection {
                    self.shared.events.push(Event::SwitchOff, now);
                }
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!("Manual command {:?} rejected: {}", cmd, e);
        }
    }

    fn toggle_manual(&mut self, cfg: &LightConfig) {
        info!("Wall switch pressed");
        self.force(!self.manual_on, cfg);
    }

    fn force(&mut self, on: bool, cfg: &LightConfig) {
        if on {
            self.automation.force_on(cfg);
        } else {
            self.automation.force_off(cfg);
        }
        self.manual_on = on;
    }

    /// A failed or implausible read keeps the previous value.
    fn refresh_lux(&mut self) {
        match self.sensor.read_lux().and_then(check_lux) {
            Ok(lux) => self.lux = lux,
            Err(e) => warn!("Lux read failed ({}), keeping {:.1} lx", e, self.lux),
        }
    }

    fn publish(&self) {
        let dimmer = self.automation.dimmer();
        let countdowns = self.automation.countdowns();
        self.shared.status.publish(StatusSnapshot {
            phase: self.automation.phase(),
            percent: dimmer.percent(),
            target: dimmer.target(),
            relay_on: dimmer.relay_on(),
            night_active: self.automation.night_active(),
            lux: self.lux,
            countdown_a: countdowns.a,
            countdown_c: countdowns.c,
            countdown_e: countdowns.e,
            override_pending: self.automation.override_pending(),
            dropped_events: self.shared.events.dropped(),
        });
    }
}
