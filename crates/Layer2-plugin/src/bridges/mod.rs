//! Bridge implementations shipped with the crate

mod simulated;

pub use simulated::{SimulatedBridge, RESULT_ACTION, SET_CONFIG_COMMAND};
