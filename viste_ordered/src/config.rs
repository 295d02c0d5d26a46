use crate::compare::{group_by, natural_group_order, order_by, try_group_by, try_order_by};
use crate::compare::{EntryOrder, GroupKeyFn, GroupOrder};
use crate::errors::Rejection;
use crate::events::Entry;
use std::cmp::Ordering;
use std::rc::Rc;

pub type DataViewTypeFn<K, V> = Rc<dyn Fn(&Entry<K, V>) -> u32>;

pub struct AdapterConfig<K, V, G = ()> {
    pub(crate) comparator: Option<EntryOrder<K, V>>,
    pub(crate) group_key: GroupKeyFn<K, V, G>,
    pub(crate) group_order: GroupOrder<G>,
    pub(crate) grouped: bool,
    pub(crate) has_header: bool,
    pub(crate) has_footer: bool,
    pub(crate) has_empty: bool,
    pub(crate) data_view_type: Option<DataViewTypeFn<K, V>>,
}

impl<K: 'static, V: 'static> AdapterConfig<K, V, ()> {
    /// A single implicit group. Entries are in arrival order until a comparator is set.
    pub fn flat() -> Self {
        AdapterConfig {
            comparator: None,
            group_key: group_by(|_: &Entry<K, V>| ()),
            group_order: Rc::new(|_: &(), _: &()| Ordering::Equal),
            grouped: false,
            has_header: false,
            has_footer: false,
            has_empty: false,
            data_view_type: None,
        }
    }
}

impl<K: 'static, V: 'static, G: Ord + 'static> AdapterConfig<K, V, G> {
    pub fn grouped<F>(key_fn: F) -> Self
    where
        F: Fn(&Entry<K, V>) -> G + 'static,
    {
        Self::from_group_key(group_by(key_fn))
    }

    pub fn try_grouped<F>(key_fn: F) -> Self
    where
        F: Fn(&Entry<K, V>) -> Result<G, Rejection> + 'static,
    {
        Self::from_group_key(try_group_by(key_fn))
    }

    fn from_group_key(group_key: GroupKeyFn<K, V, G>) -> Self {
        AdapterConfig {
            comparator: None,
            group_key,
            group_order: natural_group_order(),
            grouped: true,
            has_header: false,
            has_footer: false,
            has_empty: false,
            data_view_type: None,
        }
    }
}

impl<K: 'static, V: 'static, G: 'static> AdapterConfig<K, V, G> {
    pub fn comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Entry<K, V>, &Entry<K, V>) -> Ordering + 'static,
    {
        self.comparator = Some(order_by(comparator));
        self
    }

    pub fn try_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Entry<K, V>, &Entry<K, V>) -> Result<Ordering, Rejection> + 'static,
    {
        self.comparator = Some(try_order_by(comparator));
        self
    }

    pub fn entry_order(mut self, comparator: EntryOrder<K, V>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn group_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&G, &G) -> Ordering + 'static,
    {
        self.group_order = Rc::new(comparator);
        self
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

    pub fn data_view_type<F>(mut self, view_type: F) -> Self
    where
        F: Fn(&Entry<K, V>) -> u32 + 'static,
    {
        self.data_view_type = Some(Rc::new(view_type));
        self
    }
}

impl<K, V, G> AdapterConfig<K, V, G> {
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn has_footer(&self) -> bool {
        self.has_footer
    }

    pub fn has_empty(&self) -> bool {
        self.has_empty
    }

    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }
}

impl<K, V, G> Clone for AdapterConfig<K, V, G> {
    fn clone(&self) -> Self {
        AdapterConfig {
            comparator: self.comparator.clone(),
            group_key: self.group_key.clone(),
            group_order: self.group_order.clone(),
            grouped: self.grouped,
            has_header: self.has_header,
            has_footer: self.has_footer,
            has_empty: self.has_empty,
            data_view_type: self.data_view_type.clone(),
        }
    }
}

impl<K: 'static, V: 'static> Default for AdapterConfig<K, V, ()> {
    fn default() -> Self {
        AdapterConfig::flat()
    }
}
