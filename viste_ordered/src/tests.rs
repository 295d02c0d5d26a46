use crate::adapter::{ListAdapter, Notification};
use crate::compare::{group_by, natural_group_order, order_by};
use crate::config::AdapterConfig;
use crate::containers::{Container, GroupedContainer, OrderedContainer};
use crate::elements::{Element, ElementKey};
use crate::events::{Entry, Event};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

pub(crate) fn init_logging() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

fn random_events(seed: u64, count: usize, keys: u64) -> Vec<Event<u64, u64>> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            let key = rng.next(keys);
            let value = rng.next(40);
            if rng.next(3) == 0 {
                Event::delete(key, value)
            } else {
                Event::upsert(key, value)
            }
        })
        .collect()
}

fn by_bucket(a: &Entry<u64, u64>, b: &Entry<u64, u64>) -> std::cmp::Ordering {
    (a.value / 4).cmp(&(b.value / 4))
}

fn decade_adapter() -> ListAdapter<u64, u64, u64> {
    ListAdapter::new(
        AdapterConfig::grouped(|e: &Entry<u64, u64>| e.value / 10)
            .comparator(by_bucket)
            .with_header(true)
            .with_footer(true),
    )
}

#[test]
fn test_size_tracks_live_keys() {
    init_logging();
    let mut adapter = ListAdapter::new(AdapterConfig::flat().comparator(by_bucket));
    let mut live = HashMap::new();
    for event in random_events(7, 400, 30) {
        if event.is(crate::events::EventKind::Upsert) {
            live.insert(event.key, event.value);
        } else {
            live.remove(&event.key);
        }
        adapter.on_next(event).unwrap();
        assert_eq!(adapter.entry_count(), live.len());
        assert_eq!(adapter.len(), live.len());
    }
}

#[test]
fn test_positions_round_trip() {
    let mut adapter = decade_adapter();
    for event in random_events(11, 300, 25) {
        adapter.on_next(event).unwrap();
        for p in 0..adapter.len() {
            match adapter.get(p) {
                Some(Element::Data { entry, .. }) => {
                    assert_eq!(adapter.position_of(&entry.key), Some(p))
                }
                Some(_) => (),
                None => panic!("no element at {}", p),
            }
        }
        assert!(adapter.get(adapter.len()).is_none());
    }
}

#[test]
fn test_equal_entries_stay_in_arrival_order() {
    let mut container = OrderedContainer::with_comparator(order_by(by_bucket));
    let mut rng = Lcg(3);
    for key in 0..60 {
        let value = rng.next(20);
        container.put(Entry::new(key, value)).unwrap();
    }
    let placed: Vec<&Entry<u64, u64>> = container.iter().collect();
    for pair in placed.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.value / 4 <= b.value / 4);
        if a.value / 4 == b.value / 4 {
            assert!(a.key < b.key, "{:?} placed before {:?}", a, b);
        }
    }
}

#[test]
fn test_deleting_absent_keys_changes_nothing() {
    let mut adapter = decade_adapter();
    for event in random_events(5, 50, 10) {
        adapter.on_next(event).unwrap();
    }
    let before: Vec<_> = adapter.elements().cloned().collect();
    let seen = Rc::new(RefCell::new(0));
    let s = seen.clone();
    adapter.add_listener(move |_: &Notification| *s.borrow_mut() += 1);
    for key in 100..110 {
        adapter.on_next(Event::delete(key, 0)).unwrap();
    }
    assert_eq!(adapter.elements().cloned().collect::<Vec<_>>(), before);
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn test_groups_live_while_populated() {
    let mut container = GroupedContainer::new(
        group_by(|e: &Entry<u64, u64>| e.value / 10),
        natural_group_order(),
        Some(order_by(by_bucket)),
    );
    let mut adapter = decade_adapter();
    let mut live: HashMap<u64, u64> = HashMap::new();
    for event in random_events(13, 400, 20) {
        if event.is(crate::events::EventKind::Upsert) {
            live.insert(event.key, event.value / 10);
            container.put(event.clone().into_entry()).unwrap();
        } else {
            live.remove(&event.key);
            container.remove(&event.key);
        }
        adapter.on_next(event).unwrap();

        let expected: BTreeSet<u64> = live.values().copied().collect();
        let registered: Vec<u64> = container.groups().copied().collect();
        assert_eq!(registered, expected.iter().copied().collect::<Vec<_>>());
        let headers: Vec<u64> = adapter
            .elements()
            .filter_map(|e| match e {
                Element::Header { group } => Some(*group),
                _ => None,
            })
            .collect();
        assert_eq!(headers, registered);
        assert_eq!(adapter.len(), live.len() + 2 * registered.len());
    }
}

// Replays notifications on a copy of the previous layout. Elements the notifications did
// not touch must end up exactly where the adapter has them.
#[test]
fn test_notifications_replay_layout() {
    let mut adapter = decade_adapter();
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let n = notifications.clone();
    adapter.add_listener(move |notification: &Notification| n.borrow_mut().push(*notification));

    let mut shadow: Vec<ElementKey<u64, u64>> = Vec::new();
    for event in random_events(17, 500, 25) {
        adapter.on_next(event).unwrap();
        let mut replay: Vec<Option<ElementKey<u64, u64>>> =
            shadow.drain(..).map(Some).collect();
        for notification in notifications.borrow_mut().drain(..) {
            match notification {
                Notification::Inserted(p) => replay.insert(p, None),
                Notification::Removed(p) => {
                    replay.remove(p);
                }
                Notification::Changed(p) => replay[p] = None,
                Notification::Moved { from, to } => {
                    let moved = replay.remove(from);
                    replay.insert(to, moved);
                }
            }
        }
        assert_eq!(replay.len(), adapter.len());
        for (p, expected) in replay.into_iter().enumerate() {
            let actual = adapter.get(p).map(|e| e.key());
            if let Some(key) = expected {
                assert_eq!(actual, Some(key));
            }
        }
        shadow = adapter.elements().map(|e| e.key()).collect();
    }
}
