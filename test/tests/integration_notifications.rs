/// Integration tests for the notifications a mirror raises while it is kept
/// in sync

use tether_shared::DictionaryEvent;
use tether_test::{tick_and_deliver, LocalLink, Position, TestHost, TestObserver};

fn entry(key: &str, x: i32) -> (String, Position) {
    (key.to_string(), Position::new(x, 0))
}

#[test]
fn snapshot_notifies_each_entry_then_one_change() {
    let mut host = TestHost::new();
    let mut link = LocalLink::new();
    host.insert("a", 1, 0);
    host.dictionary.flush();

    let mut observer = TestObserver::new(1);
    host.join(1);
    tick_and_deliver(&mut host, &mut link, &mut [&mut observer]);

    let (key, value) = entry("a", 1);
    assert_eq!(
        observer.take_events(),
        vec![DictionaryEvent::Inserted(key, value), DictionaryEvent::Changed]
    );
}

#[test]
fn delta_notifies_in_log_order() {
    let mut host = TestHost::new();
    let mut link = LocalLink::new();
    let mut observer = TestObserver::new(1);
    host.join(1);
    tick_and_deliver(&mut host, &mut link, &mut [&mut observer]);
    observer.take_events();

    host.insert("a", 1, 0);
    host.set("a", 2, 0);
    host.remove("a");
    tick_and_deliver(&mut host, &mut link, &mut [&mut observer]);

    assert_eq!(
        observer.take_events(),
        vec![
            DictionaryEvent::Inserted("a".to_string(), Position::new(1, 0)),
            DictionaryEvent::Set {
                key: "a".to_string(),
                old_value: Position::new(1, 0),
                new_value: Position::new(2, 0),
            },
            DictionaryEvent::Removed("a".to_string(), Position::new(2, 0)),
            DictionaryEvent::Changed,
        ]
    );
}

#[test]
fn operations_already_in_snapshot_are_not_notified() {
    let mut host = TestHost::new();
    let mut link = LocalLink::new();
    host.insert("a", 1, 0);
    host.insert("b", 2, 0);

    let mut observer = TestObserver::new(1);
    host.join(1);
    tick_and_deliver(&mut host, &mut link, &mut [&mut observer]);

    let events = observer.take_events();
    let inserted = events
        .iter()
        .filter(|event| matches!(event, DictionaryEvent::Inserted(..)))
        .count();

    // two from the snapshot, none from the skipped delta
    assert_eq!(inserted, 2);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, DictionaryEvent::Changed))
            .count(),
        1
    );
}

#[test]
fn clear_reaches_mirror() {
    let mut host = TestHost::new();
    let mut link = LocalLink::new();
    let mut observer = TestObserver::new(1);
    host.insert("a", 1, 0);
    host.join(1);
    tick_and_deliver(&mut host, &mut link, &mut [&mut observer]);
    observer.take_events();

    host.dictionary.clear().unwrap();
    tick_and_deliver(&mut host, &mut link, &mut [&mut observer]);

    assert!(observer.mirror.is_empty());
    assert_eq!(
        observer.take_events(),
        vec![DictionaryEvent::Cleared, DictionaryEvent::Changed]
    );
}
