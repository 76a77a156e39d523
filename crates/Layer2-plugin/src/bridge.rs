//! Native bridge boundary
//!
//! The bridge is the platform-side counterpart (the Android broadcast
//! receiver and intent sender). It is not implemented in this crate; native
//! glue implements [`Bridge`] and delivers events through [`EventEmitter`].

use crate::error::PluginError;
use async_trait::async_trait;
use datawedge_foundation::{EventName, ListenerRegistry, PluginEvent};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Method names understood by the native side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeMethod {
    Enable,
    Disable,
    EnableScanner,
    DisableScanner,
    StartScanning,
    StopScanning,
    Initialize,
    GetAvailability,
    IsReady,
    HasScanner,
    Configure,
    ConfigureProfile,
    /// Internal: (re)register the broadcast receiver
    RegisterReceiver,
}

impl BridgeMethod {
    pub const ALL: [BridgeMethod; 13] = [
        BridgeMethod::Enable,
        BridgeMethod::Disable,
        BridgeMethod::EnableScanner,
        BridgeMethod::DisableScanner,
        BridgeMethod::StartScanning,
        BridgeMethod::StopScanning,
        BridgeMethod::Initialize,
        BridgeMethod::GetAvailability,
        BridgeMethod::IsReady,
        BridgeMethod::HasScanner,
        BridgeMethod::Configure,
        BridgeMethod::ConfigureProfile,
        BridgeMethod::RegisterReceiver,
    ];

    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::EnableScanner => "enableScanner",
            Self::DisableScanner => "disableScanner",
            Self::StartScanning => "startScanning",
            Self::StopScanning => "stopScanning",
            Self::Initialize => "initialize",
            Self::GetAvailability => "getAvailability",
            Self::IsReady => "isReady",
            Self::HasScanner => "hasScanner",
            Self::Configure => "configure",
            Self::ConfigureProfile => "configureProfile",
            Self::RegisterReceiver => "__registerReceiver",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for BridgeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform bridge trait
///
/// Implement this trait to connect the plugin to a native DataWedge receiver.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Bridge name (for logging)
    fn name(&self) -> &str;

    /// Invoke a native method with JSON options and return its JSON reply
    async fn call(&self, method: BridgeMethod, options: Value) -> Result<Value, PluginError>;

    /// Ask the native side to start forwarding an event stream
    ///
    /// Called at most once per event name for the lifetime of the plugin.
    async fn open_channel(&self, _event: EventName) -> Result<(), PluginError> {
        Ok(())
    }

    /// Hand the bridge the emitter it should deliver events through
    fn attach(&self, _emitter: EventEmitter) {}
}

/// Cloneable handle the bridge uses to deliver events to listeners
#[derive(Clone)]
pub struct EventEmitter {
    registry: Arc<ListenerRegistry>,
}

impl EventEmitter {
    pub fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver a raw `(event name, payload)` pair from the native side
    ///
    /// Unknown event names and malformed payloads are logged and dropped.
    /// Returns the number of listeners the event reached.
    pub fn notify(&self, event_name: &str, payload: Value) -> usize {
        let name = match event_name.parse::<EventName>() {
            Ok(name) => name,
            Err(e) => {
                warn!("Dropping bridge event: {}", e);
                return 0;
            }
        };

        match PluginEvent::from_payload(name, payload) {
            Ok(event) => self.registry.emit(&event),
            Err(e) => {
                warn!("Dropping bridge event: {}", e);
                0
            }
        }
    }

    /// Deliver an already-typed event
    pub fn emit(&self, event: &PluginEvent) -> usize {
        self.registry.emit(event)
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_method_names() {
        assert_eq!(BridgeMethod::EnableScanner.as_str(), "enableScanner");
        assert_eq!(BridgeMethod::RegisterReceiver.as_str(), "__registerReceiver");
        for method in BridgeMethod::ALL {
            assert_eq!(BridgeMethod::from_name(method.as_str()), Some(method));
        }
        assert_eq!(BridgeMethod::from_name("reboot"), None);
    }

    #[test]
    fn test_emitter_drops_unknown_and_malformed_events() {
        let registry = Arc::new(ListenerRegistry::new());
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _handle = registry.add(
            EventName::Scan,
            Arc::new(move |_event: &PluginEvent| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let emitter = EventEmitter::new(registry);
        assert_eq!(emitter.notify("keystroke", json!({"data": "x"})), 0);
        assert_eq!(emitter.notify("scan", json!({"labelType": "QR"})), 0);
        assert_eq!(emitter.notify("scan", json!({"data": "x"})), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
