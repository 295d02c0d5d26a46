#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Upsert,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event<K, V> {
    pub kind: EventKind,
    pub key: K,
    pub value: V,
}

impl<K, V> Event<K, V> {
    pub fn new(kind: EventKind, key: K, value: V) -> Self {
        Event { kind, key, value }
    }

    pub fn upsert(key: K, value: V) -> Self {
        Event::new(EventKind::Upsert, key, value)
    }

    pub fn delete(key: K, value: V) -> Self {
        Event::new(EventKind::Delete, key, value)
    }

    pub fn is(&self, kind: EventKind) -> bool {
        self.kind == kind
    }

    pub fn into_entry(self) -> Entry<K, V> {
        Entry::new(self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }
}

impl<K, V> From<Event<K, V>> for Entry<K, V> {
    fn from(event: Event<K, V>) -> Self {
        event.into_entry()
    }
}
