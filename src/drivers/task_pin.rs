//! Core-pinned thread spawning for the two execution contexts.
//!
//! The control loop runs alone on the APP core at high priority so its
//! tick never waits behind the event-log writer, which runs on the PRO
//! core next to the network stacks.
//!
//! On ESP-IDF `std::thread` is backed by pthreads over FreeRTOS tasks;
//! `esp_pthread_set_cfg()` configures the *next* `pthread_create()` from the
//! calling thread, so the config/spawn pair must not interleave with other
//! thread creation. Off target, core and priority are ignored.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32-S3 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// PRO_CPU: WiFi / lwIP, event persistence.
    Pro = 0,
    /// APP_CPU: control loop.
    App = 1,
}

/// Placement of one execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
    /// NUL-terminated for FreeRTOS.
    pub name: &'static str,
}

/// Fixed-period control loop.
pub const CONTROL_TASK: TaskSpec = TaskSpec {
    core: Core::App,
    priority: 10,
    stack_kb: 8,
    name: "control\0",
};

/// Event drain + durable logging.
pub const EVENT_LOG_TASK: TaskSpec = TaskSpec {
    core: Core::Pro,
    priority: 3,
    stack_kb: 6,
    name: "event-log\0",
};

impl TaskSpec {
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

#[cfg(target_os = "espidf")]
pub fn spawn_on_core<T: Send + 'static>(
    spec: TaskSpec,
    f: impl FnOnce() -> T + Send + 'static,
) -> io::Result<JoinHandle<T>> {
    // SAFETY: the config struct outlives the call and `name` is 'static and
    // NUL-terminated.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = spec.priority as i32;
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
}

/// Host fallback: plain thread, core affinity and priority ignored.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core<T: Send + 'static>(
    spec: TaskSpec,
    f: impl FnOnce() -> T + Send + 'static,
) -> io::Result<JoinHandle<T>> {
    log::info!(
        "Spawning '{}' (host, no core pinning, stack={}KB)",
        spec.display_name(),
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
}
