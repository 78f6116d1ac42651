//! Phase handlers and table builder.
//!
//! Each phase is a pair of plain `fn` pointers: `on_enter` requests the
//! phase brightness (and arms its own countdown), `on_update` runs once per
//! automation step and names the next phase when its countdown expires.
//!
//! ```text
//!   OFF ──[night]──▶ TIMER_A ──[A=0]──▶ NIGHT_GLOW
//!                       │  ▲                ▲
//!                    [PIR] └──[E=0, A>0]─┐  │
//!                       ▼                │  │
//!   any ──[PIR]──▶  TIMER_C ──[C=0]──▶ TIMER_E ──[E=0, A=0]
//!
//!   any ──[day]──▶ OFF
//! ```
//!
//! TIMER_A's countdown is armed by the engine when leaving OFF, so that
//! resuming A from TIMER_E keeps whatever is left of it.

use super::context::AutomationContext;
use super::{Phase, PhaseDescriptor};

pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        PhaseDescriptor {
            id: Phase::Off,
            name: "Off",
            on_enter: off_enter,
            on_update: rest_update,
        },
        PhaseDescriptor {
            id: Phase::TimerA,
            name: "TimerA",
            on_enter: timer_a_enter,
            on_update: timer_a_update,
        },
        PhaseDescriptor {
            id: Phase::TimerC,
            name: "TimerC",
            on_enter: timer_c_enter,
            on_update: timer_c_update,
        },
        PhaseDescriptor {
            id: Phase::TimerE,
            name: "TimerE",
            on_enter: timer_e_enter,
            on_update: timer_e_update,
        },
        PhaseDescriptor {
            id: Phase::NightGlow,
            name: "NightGlow",
            on_enter: night_glow_enter,
            on_update: rest_update,
        },
    ]
}

// OFF / NIGHT_GLOW

fn off_enter(ctx: &mut AutomationContext) {
    ctx.request(0);
}

fn night_glow_enter(ctx: &mut AutomationContext) {
    ctx.request(ctx.config.pwm_glow);
}

fn rest_update(_ctx: &mut AutomationContext) -> Option<Phase> {
    None
}

// TIMER_A

fn timer_a_enter(ctx: &mut AutomationContext) {
    ctx.request(ctx.config.pwm_a);
}

fn timer_a_update(ctx: &mut AutomationContext) -> Option<Phase> {
    let t = &mut ctx.countdowns;
    t.a = t.a.saturating_sub(1);
    (t.a == 0).then_some(Phase::NightGlow)
}

// TIMER_C

fn timer_c_enter(ctx: &mut AutomationContext) {
    ctx.countdowns.c = ctx.config.timer_c_secs;
    ctx.request(ctx.config.pwm_c);
}

fn timer_c_update(ctx: &mut AutomationContext) -> Option<Phase> {
    let t = &mut ctx.countdowns;
    t.a = t.a.saturating_sub(1);
    t.c = t.c.saturating_sub(1);
    (t.c == 0).then_some(Phase::TimerE)
}

// TIMER_E

fn timer_e_enter(ctx: &mut AutomationContext) {
    ctx.countdowns.e = ctx.config.timer_e_secs;
    ctx.request(ctx.config.pwm_e);
}

fn timer_e_update(ctx: &mut AutomationContext) -> Option<Phase> {
    let t = &mut ctx.countdowns;
    t.a = t.a.saturating_sub(1);
    t.e = t.e.saturating_sub(1);
    if t.e > 0 {
        None
    } else if t.a > 0 {
        Some(Phase::TimerA)
    } else {
        Some(Phase::NightGlow)
    }
}
