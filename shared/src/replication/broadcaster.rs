use std::hash::Hash;

use log::{debug, trace};

use crate::sync::sync_object::SyncObject;

use super::{error::BroadcasterError, payload::PayloadSections};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ObserverSync {
    NeedsSnapshot,
    Established,
}

/// Host-side driver of one replicated object.
///
/// Each `tick` produces the bytes every observer needs and then flushes the
/// object's Operation Log. Observers that need a snapshot (new, or recovering
/// from divergence) receive the snapshot followed by the same delta the
/// established observers get; the snapshot's pending count makes them skip
/// that delta.
///
/// Payloads must be delivered in order and without loss, per observer.
pub struct SyncBroadcaster<U: Copy + Eq + Hash> {
    observers: Vec<(U, ObserverSync)>,
}

impl<U: Copy + Eq + Hash> SyncBroadcaster<U> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: U) -> Result<(), BroadcasterError> {
        if self.has_observer(&observer) {
            return Err(BroadcasterError::ObserverAlreadyExists);
        }
        self.observers.push((observer, ObserverSync::NeedsSnapshot));
        Ok(())
    }

    pub fn remove_observer(&mut self, observer: &U) -> Result<(), BroadcasterError> {
        let index = self.index_of(observer)?;
        self.observers.remove(index);
        Ok(())
    }

    /// Sends a fresh snapshot to this observer on the next tick
    pub fn request_snapshot(&mut self, observer: &U) -> Result<(), BroadcasterError> {
        let index = self.index_of(observer)?;
        self.observers[index].1 = ObserverSync::NeedsSnapshot;
        Ok(())
    }

    pub fn has_observer(&self, observer: &U) -> bool {
        self.observers.iter().any(|(key, _)| key == observer)
    }

    pub fn needs_snapshot(&self, observer: &U) -> bool {
        self.observers
            .iter()
            .any(|(key, sync)| key == observer && *sync == ObserverSync::NeedsSnapshot)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn index_of(&self, observer: &U) -> Result<usize, BroadcasterError> {
        self.observers
            .iter()
            .position(|(key, _)| key == observer)
            .ok_or(BroadcasterError::ObserverNotFound)
    }

    /// Produces this tick's payloads, in observer registration order, then
    /// flushes the object. Observers with nothing to receive are left out.
    pub fn tick(&mut self, object: &mut dyn SyncObject) -> Vec<(U, Vec<u8>)> {
        let dirty = object.is_dirty();
        let mut delta_payload: Option<Vec<u8>> = None;
        let mut output = Vec::new();

        for (observer, sync) in self.observers.iter_mut() {
            match *sync {
                ObserverSync::NeedsSnapshot => {
                    let sections = PayloadSections {
                        snapshot: true,
                        delta: dirty,
                    };
                    output.push((*observer, sections.write(object)));
                    *sync = ObserverSync::Established;
                }
                ObserverSync::Established if dirty => {
                    let payload = delta_payload.get_or_insert_with(|| {
                        PayloadSections {
                            snapshot: false,
                            delta: true,
                        }
                        .write(object)
                    });
                    output.push((*observer, payload.clone()));
                }
                ObserverSync::Established => {}
            }
        }

        if dirty {
            trace!(
                "SyncBroadcaster flushed pending operations after writing {} payloads",
                output.len()
            );
        } else if !output.is_empty() {
            debug!("SyncBroadcaster sent {} snapshots", output.len());
        }

        object.flush();
        output
    }
}

impl<U: Copy + Eq + Hash> Default for SyncBroadcaster<U> {
    fn default() -> Self {
        Self::new()
    }
}
