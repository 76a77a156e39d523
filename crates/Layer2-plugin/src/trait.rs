//! Plugin trait
//!
//! Every operation maps to one native invocation. Both platform
//! implementations (native bridge and web fallback) implement this trait.

use crate::error::PluginError;
use crate::types::{
    AvailabilityOptions, AvailabilityResult, ConfigureOptions, ConfigureProfileOptions,
    ConfigureResult, InitializeOptions, InitializeResult, ReadyResult, RegisterReceiverOptions,
    ScannerStatusResult,
};
use async_trait::async_trait;
use datawedge_foundation::{EventName, Listener, ListenerHandle, Platform};

/// DataWedge plugin interface
#[async_trait]
pub trait DataWedgePlugin: Send + Sync {
    /// Platform this implementation serves
    fn platform(&self) -> Platform;

    /// Enable the DataWedge service
    async fn enable(&self) -> Result<(), PluginError>;

    /// Disable the DataWedge service
    async fn disable(&self) -> Result<(), PluginError>;

    /// Enable the barcode scanner input plugin
    async fn enable_scanner(&self) -> Result<(), PluginError>;

    /// Disable the barcode scanner input plugin
    async fn disable_scanner(&self) -> Result<(), PluginError>;

    /// Press the soft scan trigger
    async fn start_scanning(&self) -> Result<(), PluginError>;

    /// Release the soft scan trigger
    async fn stop_scanning(&self) -> Result<(), PluginError>;

    /// Idempotent setup; returns the effective profile and intent action
    async fn initialize(
        &self,
        options: Option<InitializeOptions>,
    ) -> Result<InitializeResult, PluginError>;

    /// Snapshot of DataWedge/scanner state
    ///
    /// A query that runs past its timeout resolves with `timed_out` set
    /// instead of failing, so this is safe to call during app startup.
    async fn get_availability(
        &self,
        options: Option<AvailabilityOptions>,
    ) -> Result<AvailabilityResult, PluginError>;

    async fn is_ready(&self) -> Result<ReadyResult, PluginError>;

    async fn has_scanner(&self) -> Result<ScannerStatusResult, PluginError>;

    /// Create or update a named profile
    async fn configure(&self, options: ConfigureOptions) -> Result<ConfigureResult, PluginError>;

    /// Create or update a profile and toggle its barcode/keystroke/intent plugins
    async fn configure_profile(
        &self,
        options: ConfigureProfileOptions,
    ) -> Result<ConfigureResult, PluginError>;

    /// Register a callback for `scan` or `datawedgeResult` events
    ///
    /// The returned handle detaches exactly this callback.
    async fn add_listener(
        &self,
        event: EventName,
        listener: Listener,
    ) -> Result<ListenerHandle, PluginError>;

    /// Detach every registered callback
    async fn remove_all_listeners(&self) -> Result<(), PluginError>;

    /// Internal: (re)register the broadcast receiver for an intent action.
    ///
    /// Not part of the stable surface; may change without notice.
    #[doc(hidden)]
    async fn register_receiver(
        &self,
        options: Option<RegisterReceiverOptions>,
    ) -> Result<(), PluginError>;
}
