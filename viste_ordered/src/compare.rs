use crate::errors::Rejection;
use crate::events::Entry;
use std::cmp::Ordering;
use std::rc::Rc;

pub type EntryOrder<K, V> = Rc<dyn Fn(&Entry<K, V>, &Entry<K, V>) -> Result<Ordering, Rejection>>;

pub type GroupKeyFn<K, V, G> = Rc<dyn Fn(&Entry<K, V>) -> Result<G, Rejection>>;

pub type GroupOrder<G> = Rc<dyn Fn(&G, &G) -> Ordering>;

pub fn order_by<K: 'static, V: 'static, F>(comparator: F) -> EntryOrder<K, V>
where
    F: Fn(&Entry<K, V>, &Entry<K, V>) -> Ordering + 'static,
{
    Rc::new(move |a: &Entry<K, V>, b: &Entry<K, V>| {
        Ok::<Ordering, Rejection>(comparator(a, b))
    })
}

pub fn try_order_by<K: 'static, V: 'static, F>(comparator: F) -> EntryOrder<K, V>
where
    F: Fn(&Entry<K, V>, &Entry<K, V>) -> Result<Ordering, Rejection> + 'static,
{
    Rc::new(comparator)
}

/// Natural key order. With monotonically increasing keys (timestamps, sequence numbers)
/// this is arrival order.
pub fn order_by_key<K: Ord + 'static, V: 'static>() -> EntryOrder<K, V> {
    order_by(|a: &Entry<K, V>, b: &Entry<K, V>| a.key.cmp(&b.key))
}

pub fn group_by<K: 'static, V: 'static, G: 'static, F>(key_fn: F) -> GroupKeyFn<K, V, G>
where
    F: Fn(&Entry<K, V>) -> G + 'static,
{
    Rc::new(move |e: &Entry<K, V>| Ok::<G, Rejection>(key_fn(e)))
}

pub fn try_group_by<K: 'static, V: 'static, G: 'static, F>(key_fn: F) -> GroupKeyFn<K, V, G>
where
    F: Fn(&Entry<K, V>) -> Result<G, Rejection> + 'static,
{
    Rc::new(key_fn)
}

pub fn natural_group_order<G: Ord + 'static>() -> GroupOrder<G> {
    Rc::new(|a: &G, b: &G| a.cmp(b))
}
