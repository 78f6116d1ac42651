//! Application core: control-loop orchestration and the state shared with
//! the interactive context.
//!
//! All interaction with hardware happens through **port traits** defined in
//! [`ports`], so this layer runs unchanged on the host under test.

pub mod commands;
pub mod ports;
pub mod service;
pub mod shared;
pub mod status;
