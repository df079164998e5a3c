use std::{cell::RefCell, collections::VecDeque, rc::Rc};

/// Receives change notifications from a replicated collection.
///
/// Notifications fire identically on the authoritative instance (from the
/// mutation API) and on mirrors (from snapshot and delta decoding). Every
/// method has an empty default so listeners only implement what they need.
///
/// Listeners are invoked synchronously, in registration order. A panicking
/// listener propagates its panic to the caller of the mutating or decoding
/// call; later listeners are not invoked for that notification.
pub trait SyncDictionaryListener<K, V> {
    fn on_insert(&mut self, _key: &K, _value: &V) {}

    fn on_remove(&mut self, _key: &K, _value: &V) {}

    fn on_set(&mut self, _key: &K, _old_value: &V, _new_value: &V) {}

    fn on_clear(&mut self) {}

    /// Fired once per external mutating call, snapshot, or applied delta batch
    fn on_change(&mut self) {}
}

// Lets application code keep a handle to a listener it registered
impl<K, V, L: SyncDictionaryListener<K, V>> SyncDictionaryListener<K, V> for Rc<RefCell<L>> {
    fn on_insert(&mut self, key: &K, value: &V) {
        self.borrow_mut().on_insert(key, value);
    }

    fn on_remove(&mut self, key: &K, value: &V) {
        self.borrow_mut().on_remove(key, value);
    }

    fn on_set(&mut self, key: &K, old_value: &V, new_value: &V) {
        self.borrow_mut().on_set(key, old_value, new_value);
    }

    fn on_clear(&mut self) {
        self.borrow_mut().on_clear();
    }

    fn on_change(&mut self) {
        self.borrow_mut().on_change();
    }
}

/// Handle returned on registration, used to remove the listener later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(u32);

/// Registered listeners of one collection, in registration order
pub struct ListenerSet<K, V> {
    next_key: u32,
    listeners: Vec<(ListenerKey, Box<dyn SyncDictionaryListener<K, V>>)>,
}

impl<K, V> ListenerSet<K, V> {
    pub fn new() -> Self {
        Self {
            next_key: 0,
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Box<dyn SyncDictionaryListener<K, V>>) -> ListenerKey {
        let key = ListenerKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        self.listeners.push((key, listener));
        key
    }

    /// Returns whether a listener was registered under this key
    pub fn remove(&mut self, key: &ListenerKey) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_key, _)| listener_key != key);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn inserted(&mut self, key: &K, value: &V) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_insert(key, value);
        }
    }

    pub(crate) fn removed(&mut self, key: &K, value: &V) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_remove(key, value);
        }
    }

    pub(crate) fn set(&mut self, key: &K, old_value: &V, new_value: &V) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_set(key, old_value, new_value);
        }
    }

    pub(crate) fn cleared(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_clear();
        }
    }

    pub(crate) fn changed(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_change();
        }
    }
}

impl<K, V> Default for ListenerSet<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A notification recorded by `DictionaryEventQueue`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DictionaryEvent<K, V> {
    Inserted(K, V),
    Removed(K, V),
    Set {
        key: K,
        old_value: V,
        new_value: V,
    },
    Cleared,
    Changed,
}

/// Listener that queues every notification for later inspection
pub struct DictionaryEventQueue<K, V> {
    events: VecDeque<DictionaryEvent<K, V>>,
}

impl<K, V> DictionaryEventQueue<K, V> {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Creates a queue behind `Rc<RefCell<_>>`. Register a clone and keep the
    /// original to read the recorded events.
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn take_events(&mut self) -> Vec<DictionaryEvent<K, V>> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, DictionaryEvent::Changed))
            .count()
    }
}

impl<K, V> Default for DictionaryEventQueue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> SyncDictionaryListener<K, V> for DictionaryEventQueue<K, V> {
    fn on_insert(&mut self, key: &K, value: &V) {
        self.events
            .push_back(DictionaryEvent::Inserted(key.clone(), value.clone()));
    }

    fn on_remove(&mut self, key: &K, value: &V) {
        self.events
            .push_back(DictionaryEvent::Removed(key.clone(), value.clone()));
    }

    fn on_set(&mut self, key: &K, old_value: &V, new_value: &V) {
        self.events.push_back(DictionaryEvent::Set {
            key: key.clone(),
            old_value: old_value.clone(),
            new_value: new_value.clone(),
        });
    }

    fn on_clear(&mut self) {
        self.events.push_back(DictionaryEvent::Cleared);
    }

    fn on_change(&mut self) {
        self.events.push_back(DictionaryEvent::Changed);
    }
}
