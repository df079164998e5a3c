use std::{cell::RefCell, rc::Rc};

use tether_shared::{
    DictionaryEvent, DictionaryEventQueue, ReceiveOutcome, ReceiverError, SyncDictionary,
    SyncReceiver,
};

use crate::{helpers::test_host::ObserverId, local_link::LocalLink, test_protocol::Position};

/// Observer side of a test session: a mirror, its receiver, and every
/// notification the mirror raised
pub struct TestObserver {
    id: ObserverId,
    pub mirror: SyncDictionary<String, Position>,
    receiver: SyncReceiver,
    events: Rc<RefCell<DictionaryEventQueue<String, Position>>>,
}

impl TestObserver {
    pub fn new(id: ObserverId) -> Self {
        let events = DictionaryEventQueue::<String, Position>::shared();
        let mut mirror = SyncDictionary::new();
        mirror.add_listener(Box::new(events.clone()));

        Self {
            id,
            mirror,
            receiver: SyncReceiver::new(),
            events,
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn awaiting_snapshot(&self) -> bool {
        self.receiver.awaiting_snapshot()
    }

    /// Applies every payload queued for this observer, in order
    pub fn receive_all(
        &mut self,
        link: &mut LocalLink<ObserverId>,
    ) -> Vec<Result<ReceiveOutcome, ReceiverError>> {
        let mut outcomes = Vec::new();
        while let Some(payload) = link.receive(&self.id) {
            outcomes.push(self.receiver.receive(&mut self.mirror, &payload));
        }
        outcomes
    }

    pub fn take_events(&mut self) -> Vec<DictionaryEvent<String, Position>> {
        self.events.borrow_mut().take_events()
    }

    pub fn change_count(&self) -> usize {
        self.events.borrow().change_count()
    }

    pub fn get(&self, key: &str) -> Option<Position> {
        self.mirror.get(&key.to_string()).copied()
    }
}
