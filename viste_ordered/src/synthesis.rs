use crate::compare::GroupKeyFn;
use crate::config::AdapterConfig;
use crate::elements::Element;
use crate::errors::Rejection;
use crate::events::{Entry, Event, EventKind};
use crate::Data;
use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tinyvec::TinyVec;

#[derive(Debug, Clone, PartialEq)]
pub struct Emission<K, V, G> {
    pub kind: EventKind,
    pub element: Element<K, V, G>,
}

impl<K, V, G> Emission<K, V, G> {
    pub fn new(kind: EventKind, element: Element<K, V, G>) -> Self {
        Emission { kind, element }
    }
}

impl<K, V, G> Default for Emission<K, V, G> {
    fn default() -> Self {
        Emission::new(EventKind::Upsert, Element::Empty)
    }
}

pub type Emissions<K, V, G> = TinyVec<[Emission<K, V, G>; 4]>;

#[derive(Debug, Clone, PartialEq)]
enum Transition<K, G> {
    Join {
        key: K,
        group: G,
        previous: Option<G>,
    },
    Leave {
        key: K,
        group: G,
    },
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch<K, V, G> {
    emissions: Emissions<K, V, G>,
    transition: Transition<K, G>,
}

impl<K, V, G> Batch<K, V, G> {
    fn nothing() -> Self {
        Batch {
            emissions: Emissions::default(),
            transition: Transition::Nothing,
        }
    }

    pub fn emissions(&self) -> &[Emission<K, V, G>] {
        &self.emissions
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }
}

/// Headers and footers are emitted when a group appears or disappears, never for changes
/// inside a group.
pub struct ElementSynthesis<K, V, G> {
    group_key: GroupKeyFn<K, V, G>,
    has_header: bool,
    has_footer: bool,
    has_empty: bool,
    counts: HashMap<G, usize>,
    memberships: HashMap<K, G>,
}

impl<K, V, G> ElementSynthesis<K, V, G>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone + PartialEq + Debug,
    G: Clone + Eq + Hash + Debug,
{
    pub fn new(group_key: GroupKeyFn<K, V, G>) -> Self {
        ElementSynthesis {
            group_key,
            has_header: false,
            has_footer: false,
            has_empty: false,
            counts: HashMap::new(),
            memberships: HashMap::new(),
        }
    }

    pub fn from_config(config: &AdapterConfig<K, V, G>) -> Self {
        Self::new(config.group_key.clone())
            .with_header(config.has_header)
            .with_footer(config.has_footer)
            .with_empty(config.has_empty)
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_footer(mut self, has_footer: bool) -> Self {
        self.has_footer = has_footer;
        self
    }

    pub fn with_empty(mut self, has_empty: bool) -> Self {
        self.has_empty = has_empty;
        self
    }

    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    pub fn group_count(&self, group: &G) -> usize {
        self.counts.get(group).copied().unwrap_or(0)
    }

    pub fn groups(&self) -> impl Iterator<Item = &G> {
        self.counts.keys()
    }

    pub fn group_of(&self, key: &K) -> Option<&G> {
        self.memberships.get(key)
    }

    /// Computes the elements for `event` without touching any state.
    ///
    /// Only upserts consult the group key function. Deletes use the group the key was
    /// recorded under and are empty batches for absent keys.
    pub fn prepare(&self, event: &Event<K, V>) -> Result<Batch<K, V, G>, Rejection> {
        match event.kind {
            EventKind::Upsert => self.prepare_upsert(event),
            EventKind::Delete => Ok(self.prepare_delete(event)),
        }
    }

    pub fn commit(&mut self, batch: Batch<K, V, G>) -> Emissions<K, V, G> {
        match batch.transition {
            Transition::Join {
                key,
                group,
                previous,
            } => {
                if previous.as_ref() != Some(&group) {
                    if let Some(old) = previous {
                        self.release(&old);
                    }
                    let count = self.counts.entry(group.clone()).or_insert(0);
                    *count += 1;
                    if *count == 1 {
                        debug!("Group {:?} appeared", group);
                    }
                }
                self.memberships.insert(key, group);
            }
            Transition::Leave { key, group } => {
                self.memberships.remove(&key);
                self.release(&group);
            }
            Transition::Nothing => (),
        }
        batch.emissions
    }

    pub fn process(&mut self, event: &Event<K, V>) -> Result<Emissions<K, V, G>, Rejection> {
        let batch = self.prepare(event)?;
        Ok(self.commit(batch))
    }

    fn prepare_upsert(&self, event: &Event<K, V>) -> Result<Batch<K, V, G>, Rejection> {
        let entry = Entry::new(event.key.clone(), event.value.cheap_clone());
        let group = (self.group_key)(&entry)?;
        let previous = self.memberships.get(&entry.key).cloned();
        let mut emissions = Emissions::default();

        if previous.is_none() && self.memberships.is_empty() && self.has_empty {
            emissions.push(Emission::new(EventKind::Delete, Element::Empty));
        }
        emissions.push(Emission::new(
            EventKind::Upsert,
            Element::Data {
                group: group.clone(),
                entry,
            },
        ));
        if previous.as_ref() != Some(&group) {
            if let Some(old) = &previous {
                if self.group_count(old) == 1 {
                    self.push_boundaries(&mut emissions, EventKind::Delete, old);
                }
            }
            if self.group_count(&group) == 0 {
                self.push_boundaries(&mut emissions, EventKind::Upsert, &group);
            }
        }

        Ok(Batch {
            emissions,
            transition: Transition::Join {
                key: event.key.clone(),
                group,
                previous,
            },
        })
    }

    fn prepare_delete(&self, event: &Event<K, V>) -> Batch<K, V, G> {
        let group = match self.memberships.get(&event.key) {
            Some(group) => group.clone(),
            None => return Batch::nothing(),
        };
        let mut emissions = Emissions::default();
        emissions.push(Emission::new(
            EventKind::Delete,
            Element::Data {
                group: group.clone(),
                entry: Entry::new(event.key.clone(), event.value.cheap_clone()),
            },
        ));
        if self.group_count(&group) == 1 {
            self.push_boundaries(&mut emissions, EventKind::Delete, &group);
        }
        if self.memberships.len() == 1 && self.has_empty {
            emissions.push(Emission::new(EventKind::Upsert, Element::Empty));
        }

        Batch {
            emissions,
            transition: Transition::Leave {
                key: event.key.clone(),
                group,
            },
        }
    }

    fn push_boundaries(&self, emissions: &mut Emissions<K, V, G>, kind: EventKind, group: &G) {
        if self.has_header {
            emissions.push(Emission::new(
                kind,
                Element::Header {
                    group: group.clone(),
                },
            ));
        }
        if self.has_footer {
            emissions.push(Emission::new(
                kind,
                Element::Footer {
                    group: group.clone(),
                },
            ));
        }
    }

    fn release(&mut self, group: &G) {
        if let Some(count) = self.counts.get_mut(group) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(group);
                debug!("Group {:?} disappeared", group);
            }
        }
    }
}
