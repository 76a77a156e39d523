//! Web fallback - used when no native bridge is present
//!
//! Every state-changing or query operation fails immediately with
//! [`PluginError::Unsupported`], before doing anything else.

use crate::{
    error::PluginError,
    r#trait::DataWedgePlugin,
    types::{
        AvailabilityOptions, AvailabilityResult, ConfigureOptions, ConfigureProfileOptions,
        ConfigureResult, InitializeOptions, InitializeResult, ReadyResult,
        RegisterReceiverOptions, ScannerStatusResult,
    },
    BridgeMethod,
};
use async_trait::async_trait;
use datawedge_foundation::{EventName, Listener, ListenerHandle, ListenerRegistry, Platform};
use std::sync::Arc;
use tracing::debug;

/// Stand-in implementation for platforms without DataWedge
pub struct WebFallback {
    registry: Arc<ListenerRegistry>,
}

impl WebFallback {
    pub fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self { registry }
    }

    fn unsupported<T>(method: BridgeMethod) -> Result<T, PluginError> {
        debug!(method = %method, "Rejecting call on web fallback");
        Err(PluginError::unsupported(
            method.as_str(),
            Platform::Web.name(),
        ))
    }
}

impl Default for WebFallback {
    fn default() -> Self {
        Self::new(Arc::new(ListenerRegistry::new()))
    }
}

#[async_trait]
impl DataWedgePlugin for WebFallback {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    async fn enable(&self) -> Result<(), PluginError> {
        Self::unsupported(BridgeMethod::Enable)
    }

    async fn disable(&self) -> Result<(), PluginError> {
        Self::unsupported(BridgeMethod::Disable)
    }

    async fn enable_scanner(&self) -> Result<(), PluginError> {
        Self::unsupported(BridgeMethod::EnableScanner)
    }

    async fn disable_scanner(&self) -> Result<(), PluginError> {
        Self::unsupported(BridgeMethod::DisableScanner)
    }

    async fn start_scanning(&self) -> Result<(), PluginError> {
        Self::unsupported(BridgeMethod::StartScanning)
    }

    async fn stop_scanning(&self) -> Result<(), PluginError> {
        Self::unsupported(BridgeMethod::StopScanning)
    }

    async fn initialize(
        &self,
        _options: Option<InitializeOptions>,
    ) -> Result<InitializeResult, PluginError> {
        Self::unsupported(BridgeMethod::Initialize)
    }

    async fn get_availability(
        &self,
        _options: Option<AvailabilityOptions>,
    ) -> Result<AvailabilityResult, PluginError> {
        Self::unsupported(BridgeMethod::GetAvailability)
    }

    async fn is_ready(&self) -> Result<ReadyResult, PluginError> {
        Self::unsupported(BridgeMethod::IsReady)
    }

    async fn has_scanner(&self) -> Result<ScannerStatusResult, PluginError> {
        Self::unsupported(BridgeMethod::HasScanner)
    }

    async fn configure(&self, _options: ConfigureOptions) -> Result<ConfigureResult, PluginError> {
        Self::unsupported(BridgeMethod::Configure)
    }

    async fn configure_profile(
        &self,
        _options: ConfigureProfileOptions,
    ) -> Result<ConfigureResult, PluginError> {
        Self::unsupported(BridgeMethod::ConfigureProfile)
    }

    // Listeners still register; nothing ever emits on this platform.
    async fn add_listener(
        &self,
        event: EventName,
        listener: Listener,
    ) -> Result<ListenerHandle, PluginError> {
        Ok(self.registry.add(event, listener))
    }

    async fn remove_all_listeners(&self) -> Result<(), PluginError> {
        self.registry.remove_all(None);
        Ok(())
    }

    async fn register_receiver(
        &self,
        _options: Option<RegisterReceiverOptions>,
    ) -> Result<(), PluginError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datawedge_foundation::PluginEvent;

    #[tokio::test]
    async fn test_fire_and_confirm_operations_rejected() {
        let web = WebFallback::default();

        for (result, method) in [
            (web.enable().await, "enable"),
            (web.disable().await, "disable"),
            (web.enable_scanner().await, "enableScanner"),
            (web.disable_scanner().await, "disableScanner"),
            (web.start_scanning().await, "startScanning"),
            (web.stop_scanning().await, "stopScanning"),
        ] {
            let err = result.unwrap_err();
            assert!(err.is_unsupported());
            assert_eq!(err.operation(), Some(method));
        }
    }

    #[tokio::test]
    async fn test_queries_rejected() {
        let web = WebFallback::default();

        assert!(web.initialize(None).await.unwrap_err().is_unsupported());
        assert!(web
            .get_availability(Some(AvailabilityOptions::with_timeout_ms(5)))
            .await
            .unwrap_err()
            .is_unsupported());
        assert!(web.is_ready().await.unwrap_err().is_unsupported());
        assert!(web.has_scanner().await.unwrap_err().is_unsupported());
        assert!(web
            .configure(ConfigureOptions::new("Demo"))
            .await
            .unwrap_err()
            .is_unsupported());
        assert!(web
            .configure_profile(ConfigureProfileOptions::new("Demo"))
            .await
            .unwrap_err()
            .is_unsupported());
    }

    #[tokio::test]
    async fn test_register_receiver_is_silent_noop() {
        let web = WebFallback::default();
        assert!(web.register_receiver(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_listeners_register_on_web() {
        let registry = Arc::new(ListenerRegistry::new());
        let web = WebFallback::new(registry.clone());

        let handle = web
            .add_listener(EventName::Scan, Arc::new(|_event: &PluginEvent| {}))
            .await
            .unwrap();
        assert_eq!(registry.listener_count(EventName::Scan), 1);

        assert!(handle.remove());
        assert_eq!(registry.total_listeners(), 0);
    }
}
