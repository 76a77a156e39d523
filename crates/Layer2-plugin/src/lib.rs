//! # datawedge-plugin
//!
//! Cross-platform binding for Zebra DataWedge.
//! One facade, two implementations selected at startup.
//!
//! ## Features
//! - Native implementation over a pluggable [`Bridge`]
//! - Web fallback that rejects every operation as unsupported
//! - Bounded `getAvailability` that never hangs
//! - Scan/result event fan-out with idempotent unsubscribe
//! - Simulated device for demos and tests

pub mod bridge;
pub mod bridges;
pub mod error;
pub mod facade;
pub mod platforms;
pub mod types;
pub mod r#trait;

// Facade
pub use facade::{
    plugin, register_plugin, try_register_plugin, DataWedge, Implementation, RemoveListener,
};

// Bridge seam
pub use bridge::{Bridge, BridgeMethod, EventEmitter};
pub use bridges::SimulatedBridge;

// Error and trait
pub use error::PluginError;
pub use r#trait::DataWedgePlugin;

// Types
pub use types::{
    AvailabilityOptions, AvailabilityResult, ConfigureOptions, ConfigureProfileOptions,
    ConfigureResult, DataWedgeAvailability, InitializeOptions, InitializeResult, ReadyResult,
    RegisterReceiverOptions, ScannerAvailability, ScannerInfo, ScannerStatus,
    ScannerStatusResult,
};

// Events (re-exported from foundation)
pub use datawedge_foundation::{
    DataWedgeResultEvent, EventName, ListenerHandle, ListenerId, Platform, PluginConfig,
    PluginEvent, ScanEvent,
};
