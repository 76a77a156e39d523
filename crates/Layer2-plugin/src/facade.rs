//! DataWedge facade - the single entry point applications use
//!
//! The facade picks the platform implementation once, at construction, and
//! forwards every operation to it unchanged. Errors are never caught,
//! retried or rewritten here.

use crate::{
    bridge::Bridge,
    error::PluginError,
    platforms::{NativePlugin, WebFallback},
    r#trait::DataWedgePlugin,
    types::{
        AvailabilityOptions, AvailabilityResult, ConfigureOptions, ConfigureProfileOptions,
        ConfigureResult, InitializeOptions, InitializeResult, ReadyResult,
        RegisterReceiverOptions, ScannerStatusResult,
    },
};
use datawedge_foundation::{
    EventName, Listener, ListenerHandle, ListenerRegistry, Platform, PluginConfig, PluginEvent,
    ScanEvent,
};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// The two platform implementations
pub enum Implementation {
    Native(NativePlugin),
    Web(WebFallback),
}

impl Implementation {
    fn as_plugin(&self) -> &dyn DataWedgePlugin {
        match self {
            Self::Native(native) => native,
            Self::Web(web) => web,
        }
    }
}

/// Handle returned by [`DataWedge::on_scan_result`]
///
/// Cancels exactly one subscription. `remove()` may be called any number of
/// times; only the first call has an effect. Dropping the handle keeps the
/// subscription alive.
#[derive(Debug)]
pub struct RemoveListener {
    handle: ListenerHandle,
}

impl RemoveListener {
    pub fn remove(&self) {
        self.handle.remove();
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Turn the handle into a plain zero-argument callback
    pub fn into_fn(self) -> impl Fn() + Send + Sync + 'static {
        move || self.remove()
    }
}

impl From<ListenerHandle> for RemoveListener {
    fn from(handle: ListenerHandle) -> Self {
        Self { handle }
    }
}

/// DataWedge plugin facade
pub struct DataWedge {
    implementation: Implementation,
    registry: Arc<ListenerRegistry>,
}

impl DataWedge {
    /// Probe the platform and pick the implementation
    ///
    /// The native implementation is used only on Android and only when a
    /// bridge is supplied; everything else gets the web fallback.
    pub fn new(bridge: Option<Arc<dyn Bridge>>) -> Self {
        Self::with_platform(Platform::detect(), bridge, &PluginConfig::default())
    }

    /// Like [`DataWedge::new`], with defaults taken from config
    pub fn from_config(config: &PluginConfig, bridge: Option<Arc<dyn Bridge>>) -> Self {
        Self::with_platform(Platform::detect(), bridge, config)
    }

    /// Use an explicit probe result instead of [`Platform::detect`]
    pub fn with_platform(
        platform: Platform,
        bridge: Option<Arc<dyn Bridge>>,
        config: &PluginConfig,
    ) -> Self {
        let registry = Arc::new(ListenerRegistry::new());

        let implementation = match (platform, bridge) {
            (Platform::Android, Some(bridge)) => {
                info!(bridge = bridge.name(), "Using native DataWedge bridge");
                Implementation::Native(NativePlugin::from_config(
                    bridge,
                    registry.clone(),
                    config,
                ))
            }
            (Platform::Android, None) => {
                info!("No native bridge registered, using web fallback");
                Implementation::Web(WebFallback::new(registry.clone()))
            }
            (Platform::Web, _) => {
                debug!("Web platform, using web fallback");
                Implementation::Web(WebFallback::new(registry.clone()))
            }
        };

        Self {
            implementation,
            registry,
        }
    }

    /// Native implementation over the given bridge, regardless of the probe
    pub fn native(bridge: Arc<dyn Bridge>) -> Self {
        Self::with_platform(Platform::Android, Some(bridge), &PluginConfig::default())
    }

    /// Web fallback, regardless of the probe
    pub fn web() -> Self {
        Self::with_platform(Platform::Web, None, &PluginConfig::default())
    }

    pub fn platform(&self) -> Platform {
        self.plugin().platform()
    }

    pub fn is_native(&self) -> bool {
        matches!(self.implementation, Implementation::Native(_))
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn listener_count(&self, event: EventName) -> usize {
        self.registry.listener_count(event)
    }

    fn plugin(&self) -> &dyn DataWedgePlugin {
        self.implementation.as_plugin()
    }

    // ========================================================================
    // Pass-through operations
    // ========================================================================

    pub async fn enable(&self) -> Result<(), PluginError> {
        self.plugin().enable().await
    }

    pub async fn disable(&self) -> Result<(), PluginError> {
        self.plugin().disable().await
    }

    pub async fn enable_scanner(&self) -> Result<(), PluginError> {
        self.plugin().enable_scanner().await
    }

    pub async fn disable_scanner(&self) -> Result<(), PluginError> {
        self.plugin().disable_scanner().await
    }

    pub async fn start_scanning(&self) -> Result<(), PluginError> {
        self.plugin().start_scanning().await
    }

    pub async fn stop_scanning(&self) -> Result<(), PluginError> {
        self.plugin().stop_scanning().await
    }

    pub async fn initialize(
        &self,
        options: Option<InitializeOptions>,
    ) -> Result<InitializeResult, PluginError> {
        self.plugin().initialize(options).await
    }

    pub async fn get_availability(
        &self,
        options: Option<AvailabilityOptions>,
    ) -> Result<AvailabilityResult, PluginError> {
        self.plugin().get_availability(options).await
    }

    pub async fn is_ready(&self) -> Result<ReadyResult, PluginError> {
        self.plugin().is_ready().await
    }

    pub async fn has_scanner(&self) -> Result<ScannerStatusResult, PluginError> {
        self.plugin().has_scanner().await
    }

    pub async fn configure(&self, options: ConfigureOptions) -> Result<ConfigureResult, PluginError> {
        self.plugin().configure(options).await
    }

    pub async fn configure_profile(
        &self,
        options: ConfigureProfileOptions,
    ) -> Result<ConfigureResult, PluginError> {
        self.plugin().configure_profile(options).await
    }

    pub async fn add_listener<F>(
        &self,
        event: EventName,
        listener: F,
    ) -> Result<ListenerHandle, PluginError>
    where
        F: Fn(&PluginEvent) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.plugin().add_listener(event, listener).await
    }

    pub async fn remove_all_listeners(&self) -> Result<(), PluginError> {
        self.plugin().remove_all_listeners().await
    }

    /// Internal: (re)register the native broadcast receiver.
    ///
    /// Not part of the stable surface; may change without notice.
    #[doc(hidden)]
    pub async fn register_receiver(
        &self,
        options: Option<RegisterReceiverOptions>,
    ) -> Result<(), PluginError> {
        self.plugin().register_receiver(options).await
    }

    // ========================================================================
    // Convenience
    // ========================================================================

    /// Subscribe to scan results with a typed callback
    ///
    /// ```ignore
    /// let unsubscribe = datawedge.on_scan_result(|scan| {
    ///     println!("Scanned: {}", scan.data);
    /// }).await?;
    ///
    /// unsubscribe.remove();
    /// ```
    pub async fn on_scan_result<F>(&self, callback: F) -> Result<RemoveListener, PluginError>
    where
        F: Fn(ScanEvent) + Send + Sync + 'static,
    {
        let handle = self
            .add_listener(EventName::Scan, move |event: &PluginEvent| {
                if let Some(scan) = event.as_scan() {
                    callback(scan.clone());
                }
            })
            .await?;

        Ok(RemoveListener::from(handle))
    }
}

impl fmt::Debug for DataWedge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataWedge")
            .field("platform", &self.platform())
            .field("native", &self.is_native())
            .field("registry", &self.registry)
            .finish()
    }
}

// ============================================================================
// 프로세스 전역 플러그인
// ============================================================================

static GLOBAL_PLUGIN: OnceLock<Arc<DataWedge>> = OnceLock::new();

/// Register the process-wide plugin
///
/// Returns the bridge back as `Err` when a plugin was already registered
/// (or created by [`plugin`]) and the bridge was not used.
pub fn try_register_plugin(
    bridge: Option<Arc<dyn Bridge>>,
) -> Result<Arc<DataWedge>, Arc<dyn Bridge>> {
    let mut pending = bridge;
    let plugin = GLOBAL_PLUGIN
        .get_or_init(|| Arc::new(DataWedge::new(pending.take())))
        .clone();

    match pending {
        Some(rejected) => Err(rejected),
        None => Ok(plugin),
    }
}

/// Register the process-wide plugin; later calls return the first instance
pub fn register_plugin(bridge: Option<Arc<dyn Bridge>>) -> Arc<DataWedge> {
    match try_register_plugin(bridge) {
        Ok(plugin) => plugin,
        Err(rejected) => {
            warn!(
                bridge = rejected.name(),
                "Plugin already registered, bridge ignored"
            );
            plugin()
        }
    }
}

/// Process-wide plugin (web fallback unless one was registered first)
pub fn plugin() -> Arc<DataWedge> {
    GLOBAL_PLUGIN
        .get_or_init(|| Arc::new(DataWedge::new(None)))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_platform_ignores_bridge() {
        let datawedge = DataWedge::with_platform(Platform::Web, None, &PluginConfig::default());
        assert!(!datawedge.is_native());
        assert_eq!(datawedge.platform(), Platform::Web);
    }

    #[test]
    fn test_android_without_bridge_falls_back() {
        let datawedge =
            DataWedge::with_platform(Platform::Android, None, &PluginConfig::default());
        assert!(!datawedge.is_native());
    }

    #[tokio::test]
    async fn test_remove_listener_into_fn() {
        let datawedge = DataWedge::web();
        let unsubscribe = datawedge.on_scan_result(|_scan| {}).await.unwrap();
        assert!(unsubscribe.is_active());

        let f = unsubscribe.into_fn();
        f();
        f();
        assert_eq!(datawedge.listener_count(EventName::Scan), 0);
    }

    #[test]
    fn test_late_bridge_is_handed_back() {
        let existing = plugin();
        let bridge: Arc<dyn Bridge> = Arc::new(crate::bridges::SimulatedBridge::default());

        let rejected = try_register_plugin(Some(bridge)).unwrap_err();
        assert_eq!(rejected.name(), "simulated");

        // register_plugin still hands out the first instance
        let registered = register_plugin(Some(rejected));
        assert!(Arc::ptr_eq(&existing, &registered));
    }

    #[test]
    fn test_global_plugin_is_shared() {
        let first = plugin();
        let second = register_plugin(None);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
