//! Whole-night phase sequences through the wired control loop.
//!
//! Night goes active on tick 5 in every scenario (delay of 2 steps), and
//! steps then land on ticks 5 + 4k.

use nightlight::config::{ClockTime, ControlMode, LightConfig};
use nightlight::drivers::inputs::InputChannel;
use nightlight::events::Event;
use nightlight::fsm::Phase;

use crate::mock_hw::{BRIGHT, DARK, Rig};

fn night(cfg: LightConfig) -> Rig {
    let mut rig = Rig::new(LightConfig {
        night_delay_ticks: 2,
        ..cfg
    });
    rig.ticks(5);
    assert!(rig.ctl.night_active());
    rig
}

/// PIR edge on ticks 6-8, taken by the step on tick 9.
fn motion(rig: &mut Rig) {
    rig.hold(InputChannel::Pir1, 3);
    rig.tick();
}

#[test]
fn timer_a_expires_into_glow() {
    let mut rig = night(LightConfig {
        pwm_glow: 10,
        ..LightConfig::DEFAULT
    });
    rig.ticks(14);
    assert_eq!(rig.percent(), 75);

    rig.steps(73);
    assert_eq!(rig.ctl.phase(), Phase::TimerA);
    assert_eq!(rig.shared.status.snapshot().countdown_a, 1);

    rig.steps(1);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::NightGlow);
    assert_eq!(s.countdown_a, 0);
    assert_eq!(s.target, 10);

    rig.ticks(20);
    assert_eq!(rig.percent(), 10);
    assert!(rig.relay.get());
}

#[test]
fn motion_in_glow_boosts_again() {
    let mut rig = night(LightConfig {
        timer_a_secs: 3,
        ..LightConfig::DEFAULT
    });
    rig.steps(2);
    assert_eq!(rig.ctl.phase(), Phase::NightGlow);

    rig.hold(InputChannel::Pir2, 3);
    rig.tick();
    assert_eq!(rig.ctl.phase(), Phase::TimerC);
    assert_eq!(rig.shared.status.snapshot().target, 100);
}

#[test]
fn boost_winds_down_and_resumes_remaining_a() {
    let mut rig = night(LightConfig {
        timer_a_secs: 50,
        timer_c_secs: 5,
        timer_e_secs: 5,
        ..LightConfig::DEFAULT
    });
    assert_eq!(rig.shared.status.snapshot().countdown_a, 49);

    motion(&mut rig);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::TimerC);
    assert_eq!((s.countdown_a, s.countdown_c), (48, 4));

    rig.ticks(16);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::TimerE);
    assert_eq!((s.countdown_a, s.countdown_e), (44, 5));
    assert_eq!(s.target, 55);

    rig.steps(5);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::TimerA);
    assert_eq!(s.countdown_a, 39, "A keeps draining through C and E");
    assert_eq!(s.target, 75);

    rig.steps(38);
    assert_eq!(rig.ctl.phase(), Phase::TimerA);
    rig.steps(1);
    assert_eq!(rig.ctl.phase(), Phase::NightGlow);
}

#[test]
fn a_running_out_during_boost_ends_in_glow() {
    let mut rig = night(LightConfig {
        timer_a_secs: 3,
        timer_c_secs: 10,
        timer_e_secs: 5,
        pwm_glow: 20,
        ..LightConfig::DEFAULT
    });
    motion(&mut rig);
    assert_eq!(rig.ctl.phase(), Phase::TimerC);

    rig.ticks(36);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::TimerE);
    assert_eq!(s.countdown_a, 0);

    rig.steps(5);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::NightGlow);
    assert_eq!(s.target, 20);
}

#[test]
fn motion_during_wind_down_restarts_boost() {
    let mut rig = night(LightConfig {
        timer_c_secs: 2,
        ..LightConfig::DEFAULT
    });
    motion(&mut rig);
    rig.steps(2);
    assert_eq!(rig.ctl.phase(), Phase::TimerE);

    rig.hold(InputChannel::Pir1, 3);
    rig.ticks(1);
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::TimerC);
    assert_eq!(s.countdown_c, 1);
}

#[test]
fn clock_end_sets_timer_a_from_wall_clock() {
    let mut rig = night(LightConfig {
        mode: ControlMode::ClockEnd,
        clock_end: ClockTime::new(19, 2),
        ..LightConfig::DEFAULT
    });
    // Night rose at 19:00:01; 119 s to go, one already spent.
    assert_eq!(rig.shared.status.snapshot().countdown_a, 118);

    rig.steps(117);
    assert_eq!(rig.ctl.phase(), Phase::TimerA);
    rig.steps(1);
    assert_eq!(rig.ctl.phase(), Phase::NightGlow);
}

#[test]
fn clock_end_in_the_past_goes_straight_to_glow() {
    let rig = night(LightConfig {
        mode: ControlMode::ClockEnd,
        clock_end: ClockTime::new(18, 30),
        pwm_glow: 20,
        ..LightConfig::DEFAULT
    });
    let s = rig.shared.status.snapshot();
    assert_eq!(s.phase, Phase::NightGlow);
    assert_eq!(s.countdown_a, 0);
    assert_eq!(s.target, 20);
}

#[test]
fn manual_off_holds_until_next_night() {
    let mut rig = night(LightConfig::DEFAULT);
    rig.ticks(14);
    assert_eq!(rig.percent(), 75);

    rig.shared.manual.force_off().unwrap();
    rig.ticks(15);
    assert_eq!(rig.percent(), 0);
    assert!(rig.shared.status.snapshot().override_pending);
    assert_eq!(rig.ctl.phase(), Phase::TimerA, "automation keeps counting");

    // Day comes and goes; the pending override survives it.
    rig.set_lux(BRIGHT);
    rig.ticks(3);
    assert!(!rig.ctl.night_active());
    assert!(rig.shared.status.snapshot().override_pending);

    rig.set_lux(DARK);
    rig.ticks(8);
    let s = rig.shared.status.snapshot();
    assert!(s.night_active);
    assert_eq!(s.phase, Phase::TimerA);
    assert_eq!(s.target, 75);
    assert!(!s.override_pending);

    assert_eq!(
        rig.drain(),
        [
            Event::HardwareReset,
            Event::NightActiveOn,
            Event::SwitchOff,
            Event::NightActiveOff,
            Event::NightActiveOn,
        ]
    );
}

#[test]
fn silenced_logging_keeps_queue_empty() {
    let mut rig = night(LightConfig {
        log_night_active: false,
        log_detection: false,
        ..LightConfig::DEFAULT
    });
    motion(&mut rig);
    rig.hold(InputChannel::Switch, 2);
    rig.shared.manual.force_off().unwrap();
    rig.tick();
    assert_eq!(rig.drain(), [Event::HardwareReset]);
}
