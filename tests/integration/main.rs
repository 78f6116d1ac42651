//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that drives the wired control loop
//! against mock adapters. All tests run on the host with no real hardware.

#![cfg(not(target_os = "espidf"))]

mod automation_scenarios;
mod control_loop_tests;
