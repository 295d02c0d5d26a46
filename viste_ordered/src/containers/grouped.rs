use crate::compare::{EntryOrder, GroupKeyFn, GroupOrder};
use crate::containers::ordered::Plan;
use crate::containers::{Container, OrderedContainer, Placement};
use crate::errors::Rejection;
use crate::events::Entry;
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// One `OrderedContainer` per group plus the registry of live groups in group order.
///
/// A group is registered exactly as long as its container holds an entry. Global positions
/// are the sizes of all preceding groups plus the position inside the group.
pub struct GroupedContainer<K, V, G> {
    groups: HashMap<G, OrderedContainer<K, V>>,
    registry: Vec<G>,
    memberships: HashMap<K, G>,
    group_key: GroupKeyFn<K, V, G>,
    group_order: GroupOrder<G>,
    comparator: Option<EntryOrder<K, V>>,
    len: usize,
}

impl<K: Eq + Hash + Clone, V, G: Eq + Hash + Clone + Debug> GroupedContainer<K, V, G> {
    pub fn new(
        group_key: GroupKeyFn<K, V, G>,
        group_order: GroupOrder<G>,
        comparator: Option<EntryOrder<K, V>>,
    ) -> Self {
        GroupedContainer {
            groups: HashMap::new(),
            registry: Vec::new(),
            memberships: HashMap::new(),
            group_key,
            group_order,
            comparator,
            len: 0,
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &G> {
        self.registry.iter()
    }

    pub fn group_len(&self, group: &G) -> usize {
        self.groups.get(group).map_or(0, |c| c.len())
    }

    pub fn group_of(&self, key: &K) -> Option<&G> {
        self.memberships.get(key)
    }

    pub fn has_group(&self, group: &G) -> bool {
        self.groups.contains_key(group)
    }

    fn offset_of(&self, group: &G) -> usize {
        self.registry
            .iter()
            .take_while(|g| *g != group)
            .map(|g| self.group_len(g))
            .sum()
    }

    fn register(&mut self, group: G) {
        let order = &self.group_order;
        let at = self
            .registry
            .partition_point(|g| order(g, &group) != Ordering::Greater);
        debug!("Creating group {:?} at {}", group, at);
        self.registry.insert(at, group.clone());
        self.groups
            .insert(group, OrderedContainer::from_order(self.comparator.clone()));
    }

    fn unregister(&mut self, group: &G) {
        debug!("Destroying group {:?}", group);
        self.groups.remove(group);
        self.registry.retain(|g| g != group);
    }

    /// Stores an entry that is in no group yet. `plan` was computed against the group's
    /// container, or is `None` when the group does not exist.
    fn attach(&mut self, group: G, entry: Entry<K, V>, plan: Option<Plan>) -> usize {
        if !self.groups.contains_key(&group) {
            self.register(group.clone());
        }
        let key = entry.key.clone();
        let local = match self.groups.get_mut(&group) {
            Some(container) => container
                .apply(plan.unwrap_or_else(|| Plan::insert_at(0)), entry)
                .position(),
            None => 0,
        };
        self.memberships.insert(key, group.clone());
        self.len += 1;
        self.offset_of(&group) + local
    }

    fn detach(&mut self, key: &K) -> Option<(usize, Entry<K, V>)> {
        let group = self.memberships.get(key)?.clone();
        let offset = self.offset_of(&group);
        let container = self.groups.get_mut(&group)?;
        let (local, entry) = container.remove(key)?;
        let emptied = container.is_empty();
        self.memberships.remove(key);
        self.len -= 1;
        if emptied {
            self.unregister(&group);
        }
        Some((offset + local, entry))
    }
}

impl<K: Eq + Hash + Clone, V, G: Eq + Hash + Clone + Debug> Container<K, V>
    for GroupedContainer<K, V, G>
{
    fn get(&self, position: usize) -> Option<&Entry<K, V>> {
        let mut remaining = position;
        for group in &self.registry {
            let container = self.groups.get(group)?;
            if remaining < container.len() {
                return container.get(remaining);
            }
            remaining -= container.len();
        }
        None
    }

    fn index_of_key(&self, key: &K) -> Option<usize> {
        let group = self.memberships.get(key)?;
        let local = self.groups.get(group)?.index_of_key(key)?;
        Some(self.offset_of(group) + local)
    }

    fn put(&mut self, entry: Entry<K, V>) -> Result<Placement, Rejection> {
        let group = (self.group_key)(&entry)?;
        let previous = self.memberships.get(&entry.key).cloned();
        if previous.as_ref() == Some(&group) {
            let offset = self.offset_of(&group);
            if let Some(container) = self.groups.get_mut(&group) {
                return Ok(container.put(entry)?.shifted(offset));
            }
        }

        let plan = match self.groups.get(&group) {
            Some(container) => Some(container.plan(&entry)?),
            None => None,
        };
        let detached = match previous {
            Some(_) => self.detach(&entry.key),
            None => None,
        };
        match detached {
            Some((from, _)) => {
                let to = self.attach(group, entry, plan);
                if from == to {
                    Ok(Placement::Changed(to))
                } else {
                    Ok(Placement::Moved { from, to })
                }
            }
            None => Ok(Placement::Inserted(self.attach(group, entry, plan))),
        }
    }

    fn remove(&mut self, key: &K) -> Option<(usize, Entry<K, V>)> {
        self.detach(key)
    }

    fn len(&self) -> usize {
        self.len
    }
}
