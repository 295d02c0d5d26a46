use crate::errors::Rejection;
use crate::events::Entry;

pub mod grouped;
pub mod ordered;

pub use grouped::GroupedContainer;
pub use ordered::OrderedContainer;

/// Where a `put` left its entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Placement {
    Inserted(usize),
    Changed(usize),
    /// Existing key, taken out at `from` and reinserted at `to` of the resulting list.
    Moved { from: usize, to: usize },
}

impl Placement {
    pub fn position(&self) -> usize {
        match *self {
            Placement::Inserted(p) | Placement::Changed(p) => p,
            Placement::Moved { to, .. } => to,
        }
    }

    pub fn previous(&self) -> Option<usize> {
        match *self {
            Placement::Inserted(_) => None,
            Placement::Changed(p) => Some(p),
            Placement::Moved { from, .. } => Some(from),
        }
    }

    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Placement::Inserted(p) => Placement::Inserted(p + offset),
            Placement::Changed(p) => Placement::Changed(p + offset),
            Placement::Moved { from, to } => Placement::Moved {
                from: from + offset,
                to: to + offset,
            },
        }
    }
}

/// Lookups never fail loudly: out of range positions and unknown keys yield `None`.
/// `put` either applies completely or returns the rejection with the container untouched.
pub trait Container<K, V> {
    fn get(&self, position: usize) -> Option<&Entry<K, V>>;
    fn index_of_key(&self, key: &K) -> Option<usize>;
    fn put(&mut self, entry: Entry<K, V>) -> Result<Placement, Rejection>;
    /// Removing an absent key is a no-op.
    fn remove(&mut self, key: &K) -> Option<(usize, Entry<K, V>)>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &K) -> bool {
        self.index_of_key(key).is_some()
    }

    fn get_by_key(&self, key: &K) -> Option<&Entry<K, V>> {
        self.index_of_key(key).and_then(|p| self.get(p))
    }
}
