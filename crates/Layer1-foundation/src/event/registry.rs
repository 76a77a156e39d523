//! Listener Registry - 이벤트 이름별 리스너 관리
//!
//! 브리지에서 올라온 이벤트를 등록된 콜백들에게 fan-out 합니다.
//! 등록/해제는 동기 API이며, 콜백 호출은 락 밖에서 이루어지므로
//! 콜백 안에서 자기 자신을 해제해도 안전합니다.

use super::types::{EventName, PluginEvent};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// 리스너 콜백
pub type Listener = Arc<dyn Fn(&PluginEvent) + Send + Sync>;

// ============================================================================
// ListenerId
// ============================================================================

/// 리스너 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

// ============================================================================
// ListenerRegistry
// ============================================================================

/// 이벤트 리스너 레지스트리
///
/// ```ignore
/// let registry = Arc::new(ListenerRegistry::new());
/// let handle = registry.add(EventName::Scan, Arc::new(|event| println!("{:?}", event)));
///
/// registry.emit(&PluginEvent::Scan(ScanEvent::new("123")));
///
/// handle.remove();
/// handle.remove(); // no-op
/// ```
pub struct ListenerRegistry {
    /// 이벤트별 리스너 (등록 순서 유지)
    listeners: RwLock<HashMap<EventName, Vec<(ListenerId, Listener)>>>,

    /// 브리지에 이미 요청한 네이티브 채널
    channels: Mutex<HashSet<EventName>>,

    /// 리스너 ID 카운터
    listener_counter: AtomicU64,

    /// 전달된 이벤트 수
    event_count: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            channels: Mutex::new(HashSet::new()),
            listener_counter: AtomicU64::new(0),
            event_count: AtomicU64::new(0),
        }
    }

    /// 리스너 등록
    pub fn add(self: &Arc<Self>, event: EventName, listener: Listener) -> ListenerHandle {
        let id = ListenerId(self.listener_counter.fetch_add(1, Ordering::SeqCst));

        self.listeners
            .write()
            .entry(event)
            .or_default()
            .push((id, listener));

        debug!(listener_id = %id, event = %event, "Registered listener");

        ListenerHandle {
            id,
            event,
            registry: Arc::downgrade(self),
            removed: AtomicBool::new(false),
        }
    }

    /// 리스너 해제 - 해당 ID 하나만 제거
    pub fn remove(&self, event: EventName, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let Some(entries) = listeners.get_mut(&event) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        let removed = entries.len() != before;

        if entries.is_empty() {
            listeners.remove(&event);
        }

        if removed {
            debug!(listener_id = %id, event = %event, "Removed listener");
        }

        removed
    }

    /// 이벤트의 모든 리스너 해제 (None이면 전체)
    pub fn remove_all(&self, event: Option<EventName>) -> usize {
        let mut listeners = self.listeners.write();
        let removed = match event {
            Some(event) => listeners.remove(&event).map(|v| v.len()).unwrap_or(0),
            None => listeners.drain().map(|(_, v)| v.len()).sum(),
        };

        debug!(count = removed, "Removed all listeners");
        removed
    }

    /// 이벤트 전달 - 전달한 리스너 수 반환
    pub fn emit(&self, event: &PluginEvent) -> usize {
        let name = event.name();

        // 락을 잡은 채로 콜백을 호출하지 않는다
        let targets: Vec<(ListenerId, Listener)> = self
            .listeners
            .read()
            .get(&name)
            .cloned()
            .unwrap_or_default();

        self.event_count.fetch_add(1, Ordering::SeqCst);

        for (id, listener) in &targets {
            trace!(listener_id = %id, event = %name, "Delivering event to listener");
            listener(event);
        }

        targets.len()
    }

    /// 네이티브 채널 열림 표시 (브리지 확인 후) - 처음 표시하는 경우에만 true
    pub fn open_channel(&self, event: EventName) -> bool {
        self.channels.lock().insert(event)
    }

    pub fn is_channel_open(&self, event: EventName) -> bool {
        self.channels.lock().contains(&event)
    }

    pub fn contains(&self, event: EventName, id: ListenerId) -> bool {
        self.listeners
            .read()
            .get(&event)
            .map(|entries| entries.iter().any(|(existing, _)| *existing == id))
            .unwrap_or(false)
    }

    /// 이벤트별 리스너 수
    pub fn listener_count(&self, event: EventName) -> usize {
        self.listeners
            .read()
            .get(&event)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    /// 전체 리스너 수
    pub fn total_listeners(&self) -> usize {
        self.listeners.read().values().map(|v| v.len()).sum()
    }

    /// 총 전달된 이벤트 수
    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::SeqCst)
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.total_listeners())
            .field("channels", &*self.channels.lock())
            .field("event_count", &self.event_count())
            .finish()
    }
}

// ============================================================================
// ListenerHandle
// ============================================================================

/// 등록 하나를 해제할 수 있는 권한
///
/// `remove()`는 여러 번 호출해도 안전하며, 같은 이벤트의 다른 등록에는
/// 영향을 주지 않습니다. 핸들을 drop 해도 등록은 유지됩니다.
pub struct ListenerHandle {
    id: ListenerId,
    event: EventName,
    registry: Weak<ListenerRegistry>,
    removed: AtomicBool,
}

impl ListenerHandle {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn event(&self) -> EventName {
        self.event
    }

    /// 등록 해제 - 실제로 해제한 첫 호출만 true
    pub fn remove(&self) -> bool {
        if self.removed.swap(true, Ordering::SeqCst) {
            return false;
        }

        match self.registry.upgrade() {
            Some(registry) => registry.remove(self.event, self.id),
            None => false,
        }
    }

    /// 아직 레지스트리에 등록되어 있는지
    pub fn is_active(&self) -> bool {
        !self.removed.load(Ordering::SeqCst)
            && self
                .registry
                .upgrade()
                .map(|registry| registry.contains(self.event, self.id))
                .unwrap_or(false)
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("event", &self.event)
            .field("removed", &self.removed.load(Ordering::SeqCst))
            .finish()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::{DataWedgeResultEvent, ScanEvent};
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, Listener) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let listener: Listener = Arc::new(move |_event: &PluginEvent| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, listener)
    }

    fn scan(data: &str) -> PluginEvent {
        PluginEvent::Scan(ScanEvent::new(data))
    }

    #[test]
    fn test_registry_basic() {
        let registry = Arc::new(ListenerRegistry::new());
        let (count, listener) = counter();

        let handle = registry.add(EventName::Scan, listener);
        assert_eq!(registry.listener_count(EventName::Scan), 1);
        assert!(handle.is_active());

        assert_eq!(registry.emit(&scan("1")), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(handle.remove());
        assert_eq!(registry.total_listeners(), 0);
        assert!(!handle.is_active());
    }

    #[test]
    fn test_fan_out_each_exactly_once() {
        let registry = Arc::new(ListenerRegistry::new());
        let (first, l1) = counter();
        let (second, l2) = counter();

        let _h1 = registry.add(EventName::Scan, l1);
        let _h2 = registry.add(EventName::Scan, l2);

        registry.emit(&scan("A"));

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_twice_keeps_other_listeners() {
        let registry = Arc::new(ListenerRegistry::new());
        let (removed_count, l1) = counter();
        let (kept_count, l2) = counter();

        let h1 = registry.add(EventName::Scan, l1);
        let _h2 = registry.add(EventName::Scan, l2);

        assert!(h1.remove());
        assert!(!h1.remove());

        registry.emit(&scan("B"));

        assert_eq!(removed_count.load(Ordering::SeqCst), 0);
        assert_eq!(kept_count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.listener_count(EventName::Scan), 1);
    }

    #[test]
    fn test_events_routed_by_name() {
        let registry = Arc::new(ListenerRegistry::new());
        let (scans, l1) = counter();
        let (results, l2) = counter();

        let _h1 = registry.add(EventName::Scan, l1);
        let _h2 = registry.add(EventName::DataWedgeResult, l2);

        registry.emit(&PluginEvent::DataWedgeResult(DataWedgeResultEvent {
            action: "com.symbol.datawedge.api.RESULT_ACTION".to_string(),
            command_identifier: None,
            extras: serde_json::Value::Null,
        }));

        assert_eq!(scans.load(Ordering::SeqCst), 0);
        assert_eq!(results.load(Ordering::SeqCst), 1);
        assert_eq!(registry.event_count(), 1);
    }

    #[test]
    fn test_listener_can_remove_itself() {
        let registry = Arc::new(ListenerRegistry::new());
        let slot: Arc<Mutex<Option<ListenerHandle>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));

        let s = slot.clone();
        let c = count.clone();
        let handle = registry.add(
            EventName::Scan,
            Arc::new(move |_event: &PluginEvent| {
                c.fetch_add(1, Ordering::SeqCst);
                if let Some(h) = s.lock().as_ref() {
                    h.remove();
                }
            }),
        );
        *slot.lock() = Some(handle);

        registry.emit(&scan("once"));
        registry.emit(&scan("twice"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_channel_opened_once() {
        let registry = ListenerRegistry::new();
        assert!(registry.open_channel(EventName::Scan));
        assert!(!registry.open_channel(EventName::Scan));
        assert!(registry.is_channel_open(EventName::Scan));
        assert!(!registry.is_channel_open(EventName::DataWedgeResult));
    }

    #[test]
    fn test_remove_all() {
        let registry = Arc::new(ListenerRegistry::new());
        let (_, l1) = counter();
        let (_, l2) = counter();
        let (_, l3) = counter();

        let h1 = registry.add(EventName::Scan, l1);
        let _h2 = registry.add(EventName::Scan, l2);
        let _h3 = registry.add(EventName::DataWedgeResult, l3);

        assert_eq!(registry.remove_all(Some(EventName::Scan)), 2);
        assert_eq!(registry.total_listeners(), 1);
        assert!(!h1.is_active());
        assert!(!h1.remove());

        assert_eq!(registry.remove_all(None), 1);
    }

    #[test]
    fn test_handle_outlives_registry() {
        let registry = Arc::new(ListenerRegistry::new());
        let (_, listener) = counter();
        let handle = registry.add(EventName::Scan, listener);

        drop(registry);
        assert!(!handle.remove());
    }
}
