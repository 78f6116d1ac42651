//! ControlLoop → InputMonitor → Automation → DimmerDriver, end to end.
//!
//! Timing reminder: with a 250 ms tick the automation steps on ticks
//! 1, 5, 9, … after `start()`; inputs and the dimmer ramp run every tick.

use nightlight::config::LightConfig;
use nightlight::drivers::inputs::InputChannel;
use nightlight::error::{Error, ValidationError};
use nightlight::events::{Event, EVENT_QUEUE_CAP};
use nightlight::fsm::Phase;

use crate::mock_hw::{BRIGHT, DARK, RecordingSink, Rig, evening};

fn cfg() -> LightConfig {
    LightConfig {
        night_delay_ticks: 2,
        ..LightConfig::DEFAULT
    }
}

/// Rig that went night-active on tick 5.
fn night_rig() -> Rig {
    let mut rig = Rig::new(cfg());
    rig.ticks(5);
    assert!(rig.ctl.night_active());
    rig
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_announces_reset_and_starts_dark() {
    let rig = Rig::new(cfg());
    assert_eq!(rig.drain(), [Event::HardwareReset]);

    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::Off);
    assert_eq!(s.percent, 0);
    assert!(!s.relay_on);
    assert!(!rig.relay.get());
    assert_eq!(rig.ctl.ticks_per_step(), 4);
}

// ── Day/night ─────────────────────────────────────────────────

#[test]
fn night_arms_after_delay_and_ramps_up() {
    let mut rig = Rig::new(cfg());
    rig.ticks(4);
    assert!(!rig.ctl.night_active());
    assert_eq!(rig.percent(), 0);

    rig.tick();
    let s = rig.shared.status.snapshot();
    assert!(s.night_active);
    assert_eq!(s.phase, Phase::TimerA);
    assert_eq!(s.target, 75);
    assert_eq!(s.percent, 5);
    assert_eq!(s.countdown_a, 74);
    assert!(rig.relay.get());

    rig.ticks(14);
    assert_eq!(rig.percent(), 75);
    assert_eq!(rig.duty.get(), 767);
    assert_eq!(rig.drain(), [Event::HardwareReset, Event::NightActiveOn]);
}

#[test]
fn daylight_switches_off_and_ramps_down() {
    let mut rig = night_rig();
    rig.ticks(14);
    assert_eq!(rig.percent(), 75);

    rig.set_lux(BRIGHT);
    rig.ticks(2);
    let s = rig.shared.status.snapshot();
    assert!(!s.night_active);
    assert_eq!(s.phase, Phase::Off);
    assert_eq!(s.target, 0);
    assert_eq!(s.percent, 70);

    rig.ticks(14);
    assert_eq!(rig.percent(), 0);
    assert!(!rig.relay.get());
    assert_eq!(rig.duty.get(), 0);
    assert_eq!(
        rig.drain(),
        [Event::HardwareReset, Event::NightActiveOn, Event::NightActiveOff]
    );
}

#[test]
fn brief_dark_spell_does_not_trigger_night() {
    let mut rig = Rig::new(LightConfig {
        night_delay_ticks: 10,
        ..LightConfig::DEFAULT
    });
    rig.steps(9);
    assert!(!rig.ctl.night_active());
    rig.set_lux(BRIGHT);
    rig.steps(1);
    rig.set_lux(DARK);
    rig.steps(9);
    assert!(!rig.ctl.night_active());
    rig.steps(1);
    assert!(rig.ctl.night_active());
}

// ── Motion ────────────────────────────────────────────────────

#[test]
fn pir_edge_starts_boost() {
    let mut rig = night_rig();
    rig.hold(InputChannel::Pir1, 3);
    assert_eq!(rig.ctl.phase(), Phase::TimerA);
    assert!(rig.shared.inputs.last_activation(InputChannel::Pir1).is_some());

    rig.tick();
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::TimerC);
    assert_eq!(s.target, 100);
    assert_eq!(s.countdown_c, 29);
    assert_eq!(
        rig.drain(),
        [Event::HardwareReset, Event::NightActiveOn, Event::Pir1Detected]
    );
}

#[test]
fn pir_glitch_is_filtered() {
    let mut rig = night_rig();
    rig.hold(InputChannel::Pir1, 2);
    rig.steps(2);
    assert_eq!(rig.ctl.phase(), Phase::TimerA);
    assert_eq!(rig.drain(), [Event::HardwareReset, Event::NightActiveOn]);
}

#[test]
fn pir_by_day_is_logged_but_ignored() {
    let mut rig = Rig::new(cfg());
    rig.set_lux(BRIGHT);
    rig.hold(InputChannel::Pir2, 3);
    rig.steps(2);
    assert_eq!(rig.ctl.phase(), Phase::Off);
    assert_eq!(rig.percent(), 0);
    assert_eq!(rig.drain(), [Event::HardwareReset, Event::Pir2Detected]);
}

#[test]
fn absent_channels_stay_inert() {
    let mut rig = Rig::with_fitted(cfg(), [false, true, false]);
    assert!(!rig.shared.inputs.is_present(InputChannel::Pir1));
    assert!(rig.shared.inputs.is_present(InputChannel::Pir2));
    assert!(!rig.shared.inputs.is_present(InputChannel::Switch));

    rig.ticks(5);
    rig.hold(InputChannel::Pir1, 4);
    rig.hold(InputChannel::Switch, 4);
    assert_eq!(rig.ctl.phase(), Phase::TimerA);
    assert!(!rig.ctl.manual_on());

    rig.hold(InputChannel::Pir2, 4);
    assert_eq!(rig.ctl.phase(), Phase::TimerC);
}

// ── Manual control ────────────────────────────────────────────

#[test]
fn wall_switch_toggles_manual_on_off() {
    let mut rig = Rig::new(cfg());
    rig.set_lux(BRIGHT);

    rig.hold(InputChannel::Switch, 2);
    assert!(rig.ctl.manual_on());
    assert_eq!(rig.shared.status.snapshot().target, 100);
    rig.ticks(19);
    assert_eq!(rig.percent(), 100);
    assert_eq!(rig.ctl.phase(), Phase::Off, "manual on leaves the phase alone");

    rig.hold(InputChannel::Switch, 2);
    assert!(!rig.ctl.manual_on());
    let s = rig.shared.status.snapshot();
    assert_eq!(s.target, 0);
    assert!(s.override_pending);
    assert_eq!(
        rig.drain(),
        [Event::HardwareReset, Event::SwitchOn, Event::SwitchOn]
    );
}

#[test]
fn manual_handle_drives_dimmer() {
    let mut rig = Rig::new(cfg());
    rig.set_lux(BRIGHT);
    rig.tick();

    rig.shared.manual.set_percent_direct(40).unwrap();
    rig.tick();
    assert_eq!(rig.percent(), 40);

    rig.shared.manual.set_percent_soft(60).unwrap();
    rig.tick();
    assert_eq!(rig.percent(), 45);
    rig.ticks(3);
    assert_eq!(rig.percent(), 60);

    rig.shared.manual.set_percent_direct(0).unwrap();
    rig.tick();
    assert_eq!(rig.percent(), 0);
    assert!(!rig.relay.get());
}

#[test]
fn manual_handle_rejects_bad_percent() {
    let rig = Rig::new(cfg());
    assert_eq!(
        rig.shared.manual.set_percent_direct(150),
        Err(Error::Validation(ValidationError::PercentOutOfRange(150)))
    );
    assert_eq!(
        rig.shared.manual.set_percent_soft(101),
        Err(Error::Validation(ValidationError::PercentOutOfRange(101)))
    );
}

#[test]
fn software_force_logs_switch_events() {
    let mut rig = Rig::new(cfg());
    rig.set_lux(BRIGHT);

    rig.shared.manual.force_on().unwrap();
    rig.tick();
    assert!(rig.ctl.manual_on());
    assert_eq!(rig.shared.status.snapshot().target, 100);

    rig.shared.manual.force_off().unwrap();
    rig.tick();
    assert!(!rig.ctl.manual_on());
    assert_eq!(
        rig.drain(),
        [Event::HardwareReset, Event::SwitchOn, Event::SwitchOff]
    );
}

#[test]
fn full_mailbox_reports_queue_full() {
    let rig = Rig::new(cfg());
    for _ in 0..4 {
        rig.shared.manual.force_on().unwrap();
    }
    assert_eq!(rig.shared.manual.force_off(), Err(Error::QueueFull));
}

// ── Sensors, config, status ───────────────────────────────────

#[test]
fn lux_read_failure_keeps_previous_value() {
    let mut rig = Rig::new(cfg());
    rig.set_lux(BRIGHT);
    rig.tick();
    assert_eq!(rig.ctl.lux(), BRIGHT);

    rig.lux.set(None);
    rig.steps(3);
    assert_eq!(rig.ctl.lux(), BRIGHT);
    assert!(!rig.ctl.night_active());

    for bogus in [f32::NAN, f32::INFINITY, -3.0] {
        rig.set_lux(bogus);
        rig.steps(1);
        assert_eq!(rig.ctl.lux(), BRIGHT);
    }
    assert_eq!(rig.shared.status.snapshot().lux, BRIGHT);
}

#[test]
fn config_update_applies_on_next_step() {
    let mut rig = Rig::new(cfg());
    rig.tick();
    rig.shared
        .config
        .update(LightConfig { pwm_a: 30, ..cfg() })
        .unwrap();
    assert!(
        rig.shared
            .config
            .update(LightConfig { pwm_a: 101, ..cfg() })
            .is_err()
    );
    rig.ticks(4);
    assert_eq!(rig.shared.status.snapshot().target, 30);
}

#[test]
fn status_counts_dropped_events() {
    let mut rig = Rig::new(cfg());
    rig.set_lux(BRIGHT);
    for _ in 0..40 {
        rig.shared.events.push(Event::SwitchOff, evening(19, 0));
    }
    rig.tick();
    // One slot already held by the boot notice.
    let expected = 40 - (EVENT_QUEUE_CAP as u32 - 1);
    assert_eq!(rig.shared.status.snapshot().dropped_events, expected);
}

#[test]
fn events_drain_from_interactive_thread() {
    let mut rig = night_rig();
    rig.hold(InputChannel::Pir1, 3);
    rig.tick();

    let shared = rig.shared;
    let sink = std::thread::spawn(move || {
        let mut sink = RecordingSink::default();
        shared.events.drain_into(&mut sink);
        sink
    })
    .join()
    .unwrap();

    assert_eq!(
        sink.events(),
        [Event::HardwareReset, Event::NightActiveOn, Event::Pir1Detected]
    );
    let stamps: Vec<_> = sink.records.iter().map(|r| r.at).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]), "{stamps:?}");
    assert!(rig.shared.events.is_empty());
}
