//! Output and input drivers plus task placement helpers.

pub mod dimmer;
pub mod inputs;
pub mod task_pin;
