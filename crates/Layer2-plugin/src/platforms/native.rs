//! Native implementation - forwards every operation to a [`Bridge`]

use crate::{
    bridge::{Bridge, BridgeMethod, EventEmitter},
    error::PluginError,
    r#trait::DataWedgePlugin,
    types::{
        AvailabilityOptions, AvailabilityResult, ConfigureOptions, ConfigureProfileOptions,
        ConfigureResult, InitializeOptions, InitializeResult, ReadyResult,
        RegisterReceiverOptions, ScannerStatusResult,
    },
};
use async_trait::async_trait;
use datawedge_foundation::{
    EventName, Listener, ListenerHandle, ListenerRegistry, Platform, PluginConfig,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

/// Plugin implementation backed by the native bridge
pub struct NativePlugin {
    bridge: Arc<dyn Bridge>,
    registry: Arc<ListenerRegistry>,
    default_availability_timeout: Duration,
    /// Serializes native channel opens; held across the bridge await
    channel_gate: AsyncMutex<()>,
}

impl NativePlugin {
    /// Create the native implementation and attach the bridge to the registry
    pub fn new(bridge: Arc<dyn Bridge>, registry: Arc<ListenerRegistry>) -> Self {
        bridge.attach(EventEmitter::new(registry.clone()));

        Self {
            bridge,
            registry,
            default_availability_timeout: PluginConfig::default().effective_availability_timeout(),
            channel_gate: AsyncMutex::new(()),
        }
    }

    /// Create from config (availability timeout default)
    pub fn from_config(
        bridge: Arc<dyn Bridge>,
        registry: Arc<ListenerRegistry>,
        config: &PluginConfig,
    ) -> Self {
        Self::new(bridge, registry)
            .with_availability_timeout(config.effective_availability_timeout())
    }

    /// Timeout used when `getAvailability` is called without one
    pub fn with_availability_timeout(mut self, timeout: Duration) -> Self {
        self.default_availability_timeout = timeout;
        self
    }

    pub fn bridge(&self) -> &Arc<dyn Bridge> {
        &self.bridge
    }

    fn encode<T: Serialize>(options: Option<&T>) -> Result<Value, PluginError> {
        match options {
            Some(options) => serde_json::to_value(options)
                .map_err(|e| PluginError::Serialization(e.to_string())),
            None => Ok(json!({})),
        }
    }

    fn decode<T: DeserializeOwned>(method: BridgeMethod, reply: Value) -> Result<T, PluginError> {
        serde_json::from_value(reply).map_err(|e| PluginError::InvalidResponse {
            method: method.to_string(),
            message: e.to_string(),
        })
    }

    async fn invoke(&self, method: BridgeMethod, options: Value) -> Result<Value, PluginError> {
        debug!(bridge = self.bridge.name(), method = %method, "Invoking bridge");
        self.bridge.call(method, options).await
    }

    /// Fire-and-confirm call; the reply body is ignored
    async fn fire(&self, method: BridgeMethod) -> Result<(), PluginError> {
        self.invoke(method, json!({})).await.map(|_| ())
    }

    async fn query<T: DeserializeOwned>(
        &self,
        method: BridgeMethod,
        options: Value,
    ) -> Result<T, PluginError> {
        let reply = self.invoke(method, options).await?;
        Self::decode(method, reply)
    }
}

#[async_trait]
impl DataWedgePlugin for NativePlugin {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn enable(&self) -> Result<(), PluginError> {
        self.fire(BridgeMethod::Enable).await
    }

    async fn disable(&self) -> Result<(), PluginError> {
        self.fire(BridgeMethod::Disable).await
    }

    async fn enable_scanner(&self) -> Result<(), PluginError> {
        self.fire(BridgeMethod::EnableScanner).await
    }

    async fn disable_scanner(&self) -> Result<(), PluginError> {
        self.fire(BridgeMethod::DisableScanner).await
    }

    async fn start_scanning(&self) -> Result<(), PluginError> {
        self.fire(BridgeMethod::StartScanning).await
    }

    async fn stop_scanning(&self) -> Result<(), PluginError> {
        self.fire(BridgeMethod::StopScanning).await
    }

    async fn initialize(
        &self,
        options: Option<InitializeOptions>,
    ) -> Result<InitializeResult, PluginError> {
        let options = Self::encode(options.as_ref())?;
        self.query(BridgeMethod::Initialize, options).await
    }

    async fn get_availability(
        &self,
        options: Option<AvailabilityOptions>,
    ) -> Result<AvailabilityResult, PluginError> {
        let timeout = options
            .and_then(|o| o.timeout_ms)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(self.default_availability_timeout);

        let options = AvailabilityOptions::with_timeout_ms(timeout.as_millis() as u64);
        let payload = Self::encode(Some(&options))?;

        match tokio::time::timeout(timeout, self.query(BridgeMethod::GetAvailability, payload))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "getAvailability timed out, resolving with partial result"
                );
                Ok(AvailabilityResult::timed_out())
            }
        }
    }

    async fn is_ready(&self) -> Result<ReadyResult, PluginError> {
        self.query(BridgeMethod::IsReady, json!({})).await
    }

    async fn has_scanner(&self) -> Result<ScannerStatusResult, PluginError> {
        self.query(BridgeMethod::HasScanner, json!({})).await
    }

    async fn configure(&self, options: ConfigureOptions) -> Result<ConfigureResult, PluginError> {
        let options = Self::encode(Some(&options))?;
        self.query(BridgeMethod::Configure, options).await
    }

    async fn configure_profile(
        &self,
        options: ConfigureProfileOptions,
    ) -> Result<ConfigureResult, PluginError> {
        let options = Self::encode(Some(&options))?;
        self.query(BridgeMethod::ConfigureProfile, options).await
    }

    async fn add_listener(
        &self,
        event: EventName,
        listener: Listener,
    ) -> Result<ListenerHandle, PluginError> {
        // One native channel per event name; later listeners fan out locally.
        // Marked open only after the bridge confirms.
        let _gate = self.channel_gate.lock().await;
        if !self.registry.is_channel_open(event) {
            debug!(bridge = self.bridge.name(), event = %event, "Opening native event channel");
            self.bridge.open_channel(event).await?;
            self.registry.open_channel(event);
        }

        Ok(self.registry.add(event, listener))
    }

    async fn remove_all_listeners(&self) -> Result<(), PluginError> {
        self.registry.remove_all(None);
        Ok(())
    }

    async fn register_receiver(
        &self,
        options: Option<RegisterReceiverOptions>,
    ) -> Result<(), PluginError> {
        let options = Self::encode(options.as_ref())?;
        self.invoke(BridgeMethod::RegisterReceiver, options)
            .await
            .map(|_| ())
    }
}
