use crate::compare::EntryOrder;
use crate::containers::{Container, Placement};
use crate::errors::Rejection;
use crate::events::Entry;
use slab::Slab;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Position search result, computed before anything is mutated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Plan {
    existing: Option<(usize, usize)>,
    /// Target position in the order list once the existing entry (if any) is taken out.
    target: usize,
}

impl Plan {
    pub(crate) fn insert_at(target: usize) -> Self {
        Plan {
            existing: None,
            target,
        }
    }
}

/// Entries live in a slab, `order` holds their slots in visible order.
///
/// Without a comparator the order is arrival order and a replaced entry keeps its slot.
/// With one, new entries are placed after every entry comparing equal to them.
pub struct OrderedContainer<K, V> {
    entries: Slab<Entry<K, V>>,
    slots: HashMap<K, usize>,
    order: Vec<usize>,
    comparator: Option<EntryOrder<K, V>>,
}

impl<K: Eq + Hash + Clone, V> OrderedContainer<K, V> {
    pub fn new() -> Self {
        Self::from_order(None)
    }

    pub fn with_comparator(comparator: EntryOrder<K, V>) -> Self {
        Self::from_order(Some(comparator))
    }

    pub fn from_order(comparator: Option<EntryOrder<K, V>>) -> Self {
        OrderedContainer {
            entries: Slab::new(),
            slots: HashMap::new(),
            order: Vec::new(),
            comparator,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        self.order.iter().map(move |&slot| &self.entries[slot])
    }

    pub(crate) fn plan(&self, entry: &Entry<K, V>) -> Result<Plan, Rejection> {
        let existing = self
            .slots
            .get(&entry.key)
            .and_then(|&slot| self.position_of_slot(slot).map(|p| (slot, p)));
        let target = match (&self.comparator, existing) {
            (Some(comparator), Some((_, from))) => {
                if self.still_ordered(comparator, entry, from)? {
                    from
                } else {
                    self.upper_bound(comparator, entry, Some(from))?
                }
            }
            (Some(comparator), None) => self.upper_bound(comparator, entry, None)?,
            (None, Some((_, from))) => from,
            (None, None) => self.order.len(),
        };
        Ok(Plan { existing, target })
    }

    pub(crate) fn apply(&mut self, plan: Plan, entry: Entry<K, V>) -> Placement {
        match plan.existing {
            Some((slot, from)) => {
                self.entries[slot] = entry;
                if from == plan.target {
                    Placement::Changed(from)
                } else {
                    self.order.remove(from);
                    self.order.insert(plan.target, slot);
                    Placement::Moved {
                        from,
                        to: plan.target,
                    }
                }
            }
            None => {
                let key = entry.key.clone();
                let slot = self.entries.insert(entry);
                self.slots.insert(key, slot);
                self.order.insert(plan.target, slot);
                Placement::Inserted(plan.target)
            }
        }
    }

    fn entry_at(&self, position: usize) -> &Entry<K, V> {
        &self.entries[self.order[position]]
    }

    /// An updated entry stays where it is while its neighbours still bracket it, so an update
    /// that does not change the order is reported as `Changed` rather than a remove and insert.
    fn still_ordered(
        &self,
        comparator: &EntryOrder<K, V>,
        entry: &Entry<K, V>,
        position: usize,
    ) -> Result<bool, Rejection> {
        if position > 0 && comparator(self.entry_at(position - 1), entry)? == Ordering::Greater {
            return Ok(false);
        }
        if position + 1 < self.order.len()
            && comparator(entry, self.entry_at(position + 1))? == Ordering::Greater
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// First position whose entry sorts strictly after `entry`, searching the order list as if
    /// the position `skip` were not there.
    fn upper_bound(
        &self,
        comparator: &EntryOrder<K, V>,
        entry: &Entry<K, V>,
        skip: Option<usize>,
    ) -> Result<usize, Rejection> {
        let at = |i: usize| match skip {
            Some(s) if i >= s => self.order[i + 1],
            _ => self.order[i],
        };
        let (mut lo, mut hi) = (0, self.order.len() - skip.map_or(0, |_| 1));
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if comparator(entry, &self.entries[at(mid)])? == Ordering::Less {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(lo)
    }

    fn lower_bound(
        &self,
        comparator: &EntryOrder<K, V>,
        entry: &Entry<K, V>,
    ) -> Result<usize, Rejection> {
        let (mut lo, mut hi) = (0, self.order.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if comparator(self.entry_at(mid), entry)? == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }

    fn position_of_slot(&self, slot: usize) -> Option<usize> {
        if let Some(comparator) = &self.comparator {
            let hit = self
                .lower_bound(comparator, &self.entries[slot])
                .ok()
                .and_then(|start| {
                    self.order[start..]
                        .iter()
                        .position(|&s| s == slot)
                        .map(|p| p + start)
                });
            if hit.is_some() {
                return hit;
            }
        }
        self.order.iter().position(|&s| s == slot)
    }
}

impl<K: Eq + Hash + Clone, V> Container<K, V> for OrderedContainer<K, V> {
    fn get(&self, position: usize) -> Option<&Entry<K, V>> {
        self.order.get(position).map(|&slot| &self.entries[slot])
    }

    fn index_of_key(&self, key: &K) -> Option<usize> {
        let slot = *self.slots.get(key)?;
        self.position_of_slot(slot)
    }

    fn put(&mut self, entry: Entry<K, V>) -> Result<Placement, Rejection> {
        let plan = self.plan(&entry)?;
        Ok(self.apply(plan, entry))
    }

    fn remove(&mut self, key: &K) -> Option<(usize, Entry<K, V>)> {
        let slot = *self.slots.get(key)?;
        let position = self.position_of_slot(slot)?;
        self.slots.remove(key);
        self.order.remove(position);
        Some((position, self.entries.remove(slot)))
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedContainer<K, V> {
    fn default() -> Self {
        OrderedContainer::new()
    }
}
