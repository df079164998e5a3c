/// PROPERTY-BASED TESTS: Mirror convergence
///
/// Uses proptest to verify replication properties hold across random
/// interleavings of host mutations, observer joins, ticks and deliveries.
///
/// Key invariants:
/// 1. Every observer that has received its payloads mirrors the host
/// 2. Late joiners never apply operations their snapshot already holds
/// 3. A damaged payload is always healed by the next snapshot

use proptest::prelude::*;
use tether_test::{
    assert_mirrors_host, contents, deliver, ObserverId, LocalLink, TestHost, TestObserver,
};

const KEYS: [&str; 5] = ["alpha", "bravo", "charlie", "delta", "echo"];
const OBSERVERS: ObserverId = 4;

#[derive(Clone, Debug)]
enum Action {
    Insert(usize, i32),
    Set(usize, i32),
    Remove(usize),
    Clear,
    Join(ObserverId),
    Tick,
    Deliver,
    Damage(ObserverId),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0..KEYS.len(), any::<i32>()).prop_map(|(key, x)| Action::Insert(key, x)),
        4 => (0..KEYS.len(), any::<i32>()).prop_map(|(key, x)| Action::Set(key, x)),
        2 => (0..KEYS.len()).prop_map(Action::Remove),
        1 => Just(Action::Clear),
        2 => (0..OBSERVERS).prop_map(Action::Join),
        3 => Just(Action::Tick),
        3 => Just(Action::Deliver),
    ]
}

fn damaging_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        8 => action_strategy(),
        1 => (0..OBSERVERS).prop_map(Action::Damage),
    ]
}

struct Session {
    host: TestHost,
    link: LocalLink<ObserverId>,
    observers: Vec<TestObserver>,
}

impl Session {
    fn new() -> Self {
        Self {
            host: TestHost::new(),
            link: LocalLink::new(),
            observers: Vec::new(),
        }
    }

    fn apply(&mut self, action: &Action) {
        match action {
            Action::Insert(key, x) => {
                if !self.host.dictionary.contains_key(&KEYS[*key].to_string()) {
                    self.host.insert(KEYS[*key], *x, 0);
                }
            }
            Action::Set(key, x) => self.host.set(KEYS[*key], *x, 1),
            Action::Remove(key) => self.host.remove(KEYS[*key]),
            Action::Clear => self.host.dictionary.clear().unwrap(),
            Action::Join(id) => {
                if self.observers.iter().all(|observer| observer.id() != *id) {
                    self.host.join(*id);
                    self.observers.push(TestObserver::new(*id));
                }
            }
            Action::Tick => {
                self.host.tick(&mut self.link);
            }
            Action::Deliver => self.deliver(),
            Action::Damage(id) => {
                self.link.truncate_next(id);
            }
        }
    }

    fn deliver(&mut self) {
        let mut observers: Vec<&mut TestObserver> = self.observers.iter_mut().collect();
        deliver(&mut self.host, &mut self.link, &mut observers);
    }

    // tick and deliver until every divergence has been answered with a snapshot
    fn settle(&mut self) {
        self.deliver();
        for _ in 0..2 {
            self.host.tick(&mut self.link);
            self.deliver();
        }
    }
}

proptest! {
    /// Without damage, every joined observer ends up equal to the host
    #[test]
    fn prop_observers_converge(actions in prop::collection::vec(action_strategy(), 1..60)) {
        let mut session = Session::new();
        for action in &actions {
            session.apply(action);
        }
        session.settle();

        for observer in &session.observers {
            prop_assert!(!observer.awaiting_snapshot());
            prop_assert_eq!(observer.mirror.changes_ahead(), 0);
            assert_mirrors_host(&session.host, observer);
        }
    }

    /// Damaged payloads are healed once the host answers the resync request
    #[test]
    fn prop_observers_recover_from_damage(
        actions in prop::collection::vec(damaging_strategy(), 1..60)
    ) {
        let mut session = Session::new();
        for action in &actions {
            session.apply(action);
        }
        session.settle();

        for observer in &session.observers {
            prop_assert!(!observer.awaiting_snapshot());
            assert_mirrors_host(&session.host, observer);
        }
    }

    /// Every observer sees the same contents after the same delivered ticks,
    /// regardless of when it joined
    #[test]
    fn prop_join_time_does_not_matter(
        before in prop::collection::vec((0..KEYS.len(), any::<i32>()), 0..10),
        after in prop::collection::vec((0..KEYS.len(), any::<i32>()), 0..10),
    ) {
        let mut session = Session::new();
        session.apply(&Action::Join(0));
        for (key, x) in &before {
            session.apply(&Action::Set(*key, *x));
        }
        session.apply(&Action::Join(1));
        for (key, x) in &after {
            session.apply(&Action::Set(*key, *x));
        }
        session.apply(&Action::Tick);
        session.apply(&Action::Deliver);

        prop_assert_eq!(
            contents(&session.observers[0].mirror),
            contents(&session.observers[1].mirror)
        );
        prop_assert_eq!(
            contents(&session.observers[1].mirror),
            contents(&session.host.dictionary)
        );
    }
}
