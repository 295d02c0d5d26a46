use crate::compare::{EntryOrder, GroupOrder};
use crate::errors::Rejection;
use crate::events::Entry;
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Element<K, V, G> {
    Data { group: G, entry: Entry<K, V> },
    Header { group: G },
    Footer { group: G },
    /// Stands in for the whole list while it holds no entries.
    Empty,
}

impl<K, V, G> Default for Element<K, V, G> {
    fn default() -> Self {
        Element::Empty
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ElementKey<K, G> {
    Data(K),
    Header(G),
    Footer(G),
    Empty,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ViewType {
    Data(u32),
    Header,
    Footer,
    Empty,
}

impl<K: Clone, V, G: Clone> Element<K, V, G> {
    pub fn key(&self) -> ElementKey<K, G> {
        match self {
            Element::Data { entry, .. } => ElementKey::Data(entry.key.clone()),
            Element::Header { group } => ElementKey::Header(group.clone()),
            Element::Footer { group } => ElementKey::Footer(group.clone()),
            Element::Empty => ElementKey::Empty,
        }
    }
}

impl<K, V, G> Element<K, V, G> {
    pub fn group(&self) -> Option<&G> {
        match self {
            Element::Data { group, .. } | Element::Header { group } | Element::Footer { group } => {
                Some(group)
            }
            Element::Empty => None,
        }
    }

    pub fn entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Element::Data { entry, .. } => Some(entry),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Element::Data { .. })
    }

    pub fn view_type(&self, local: u32) -> ViewType {
        match self {
            Element::Data { .. } => ViewType::Data(local),
            Element::Header { .. } => ViewType::Header,
            Element::Footer { .. } => ViewType::Footer,
            Element::Empty => ViewType::Empty,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Element::Header { .. } => 0,
            Element::Data { .. } => 1,
            Element::Footer { .. } => 2,
            Element::Empty => 3,
        }
    }
}

/// Orders elements: by group, then header, data rows, footer. Data rows compare with the
/// entry comparator, or not at all, which keeps them in arrival order.
pub struct ElementOrder<K, V, G> {
    entries: Option<EntryOrder<K, V>>,
    groups: GroupOrder<G>,
}

impl<K, V, G> Clone for ElementOrder<K, V, G> {
    fn clone(&self) -> Self {
        ElementOrder {
            entries: self.entries.clone(),
            groups: self.groups.clone(),
        }
    }
}

impl<K, V, G> ElementOrder<K, V, G> {
    pub fn new(entries: Option<EntryOrder<K, V>>, groups: GroupOrder<G>) -> Self {
        ElementOrder { entries, groups }
    }

    pub fn compare(
        &self,
        a: &Element<K, V, G>,
        b: &Element<K, V, G>,
    ) -> Result<Ordering, Rejection> {
        match (a.group(), b.group()) {
            (Some(ga), Some(gb)) => {
                let by_group = (self.groups)(ga, gb);
                if by_group != Ordering::Equal {
                    return Ok(by_group);
                }
            }
            (None, None) => return Ok(Ordering::Equal),
            (None, Some(_)) => return Ok(Ordering::Less),
            (Some(_), None) => return Ok(Ordering::Greater),
        }
        match (a, b, &self.entries) {
            (Element::Data { entry: ea, .. }, Element::Data { entry: eb, .. }, Some(order)) => {
                order(ea, eb)
            }
            _ => Ok(a.rank().cmp(&b.rank())),
        }
    }
}

impl<K: 'static, V: 'static, G: 'static> ElementOrder<K, V, G> {
    pub fn into_entry_order(self) -> EntryOrder<ElementKey<K, G>, Element<K, V, G>> {
        Rc::new(
            move |a: &Entry<ElementKey<K, G>, Element<K, V, G>>,
                  b: &Entry<ElementKey<K, G>, Element<K, V, G>>| {
                self.compare(&a.value, &b.value)
            },
        )
    }
}
