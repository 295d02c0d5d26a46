use std::fmt::Debug;

pub mod adapter;
pub mod compare;
pub mod config;
pub mod containers;
pub mod elements;
pub mod errors;
pub mod events;
pub mod listeners;
pub mod synthesis;

#[cfg(test)]
mod tests;

pub use adapter::{Fault, Inlet, ListAdapter, Notification, StreamItem};
pub use compare::{
    group_by, natural_group_order, order_by, order_by_key, try_group_by, try_order_by,
    EntryOrder, GroupKeyFn, GroupOrder,
};
pub use config::{AdapterConfig, DataViewTypeFn};
pub use containers::{Container, GroupedContainer, OrderedContainer, Placement};
pub use elements::{Element, ElementKey, ElementOrder, ViewType};
pub use errors::{AdapterError, Rejection, Termination};
pub use events::{Entry, Event, EventKind};
pub use listeners::{Listener, ListenerToken, Listeners};
pub use synthesis::{Batch, ElementSynthesis, Emission, Emissions};

pub trait Data: Debug {
    fn changed(&self, other: &Self) -> bool;
    fn cheap_clone(&self) -> Self;
}

impl<T: Debug + Clone + PartialEq> Data for T {
    fn changed(&self, other: &T) -> bool {
        self != other
    }

    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}
