use crate::compare::try_group_by;
use crate::config::{AdapterConfig, DataViewTypeFn};
use crate::containers::{Container, GroupedContainer, OrderedContainer, Placement};
use crate::elements::{Element, ElementKey, ElementOrder, ViewType};
use crate::errors::{AdapterError, Rejection, Termination};
use crate::events::{Entry, Event, EventKind};
use crate::listeners::{Listener, ListenerToken, Listeners};
use crate::synthesis::{ElementSynthesis, Emission};
use crate::Data;
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

/// A positional change of the visible list, valid against the list as it is after every
/// notification delivered before it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Notification {
    Inserted(usize),
    Removed(usize),
    Changed(usize),
    Moved { from: usize, to: usize },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Fault {
    Malformed(Rejection),
    Stream(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem<K, V> {
    Next(Event<K, V>),
    Completed,
    Failed(String),
}

pub struct Inlet<K, V>(Rc<RefCell<VecDeque<StreamItem<K, V>>>>);

impl<K, V> Inlet<K, V> {
    fn new() -> Self {
        Inlet(Rc::new(RefCell::new(VecDeque::new())))
    }

    pub fn send(&self, item: StreamItem<K, V>) {
        self.0.borrow_mut().push_back(item);
    }

    pub fn upsert(&self, key: K, value: V) {
        self.send(StreamItem::Next(Event::upsert(key, value)));
    }

    pub fn delete(&self, key: K, value: V) {
        self.send(StreamItem::Next(Event::delete(key, value)));
    }

    pub fn complete(&self) {
        self.send(StreamItem::Completed);
    }

    pub fn fail(&self, reason: impl Into<String>) {
        self.send(StreamItem::Failed(reason.into()));
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().len()
    }

    fn pop(&self) -> Option<StreamItem<K, V>> {
        self.0.borrow_mut().pop_front()
    }
}

impl<K, V> Clone for Inlet<K, V> {
    fn clone(&self) -> Self {
        Inlet(self.0.clone())
    }
}

type ElementStore<K, V, G> = Box<dyn Container<ElementKey<K, G>, Element<K, V, G>>>;

/// Every event is applied completely or not at all. Listeners are called once it has been.
pub struct ListAdapter<K, V, G = ()> {
    synthesis: ElementSynthesis<K, V, G>,
    store: ElementStore<K, V, G>,
    placeholder: bool,
    empty: Element<K, V, G>,
    data_view_type: Option<DataViewTypeFn<K, V>>,
    inlet: Inlet<K, V>,
    termination: Option<Termination>,
    notification_listeners: Listeners<Notification>,
    element_listeners: Listeners<Emission<K, V, G>>,
    fault_listeners: Listeners<Fault>,
}

impl<K, V, G> ListAdapter<K, V, G>
where
    K: Clone + Eq + Hash + Debug + 'static,
    V: Clone + PartialEq + Debug + 'static,
    G: Clone + Eq + Hash + Debug + 'static,
{
    pub fn new(config: AdapterConfig<K, V, G>) -> Self {
        let order = ElementOrder::new(config.comparator.clone(), config.group_order.clone())
            .into_entry_order();
        let store: ElementStore<K, V, G> = if config.grouped {
            Box::new(GroupedContainer::new(
                try_group_by(|e: &Entry<ElementKey<K, G>, Element<K, V, G>>| {
                    e.value.group().cloned().ok_or_else(|| {
                        Rejection::GroupKey(String::from("the empty element has no group"))
                    })
                }),
                config.group_order.clone(),
                Some(order),
            ))
        } else {
            Box::new(OrderedContainer::with_comparator(order))
        };
        ListAdapter {
            synthesis: ElementSynthesis::from_config(&config),
            store,
            placeholder: config.has_empty,
            empty: Element::Empty,
            data_view_type: config.data_view_type,
            inlet: Inlet::new(),
            termination: None,
            notification_listeners: Listeners::new(),
            element_listeners: Listeners::new(),
            fault_listeners: Listeners::new(),
        }
    }

    pub fn inlet(&self) -> Inlet<K, V> {
        self.inlet.clone()
    }

    /// Handles queued items in arrival order until the queue is empty. Returns how many
    /// items were taken off the queue.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(item) = self.inlet.pop() {
            handled += 1;
            if let Err(AdapterError::Terminated(termination)) = self.handle(item) {
                warn!("Discarding queued item, {}", termination);
            }
        }
        handled
    }

    pub fn handle(&mut self, item: StreamItem<K, V>) -> Result<(), AdapterError> {
        match item {
            StreamItem::Next(event) => self.on_next(event),
            StreamItem::Completed => self.on_completed(),
            StreamItem::Failed(reason) => self.on_error(reason),
        }
    }

    pub fn on_next(&mut self, event: Event<K, V>) -> Result<(), AdapterError> {
        self.ensure_open()?;
        let batch = match self.synthesis.prepare(&event) {
            Ok(batch) => batch,
            Err(rejection) => return Err(self.reject(rejection)),
        };
        let notifications = match self.apply(batch.emissions()) {
            Ok(notifications) => notifications,
            Err(rejection) => return Err(self.reject(rejection)),
        };
        let emissions = self.synthesis.commit(batch);
        debug!(
            "Applied {:?} of {:?}: {} elements, {} notifications",
            event.kind,
            event.key,
            emissions.len(),
            notifications.len()
        );
        for emission in emissions.iter() {
            self.element_listeners.call_all(emission);
        }
        for notification in &notifications {
            self.notification_listeners.call_all(notification);
        }
        Ok(())
    }

    /// The list stays as it is.
    pub fn on_completed(&mut self) -> Result<(), AdapterError> {
        self.ensure_open()?;
        info!("Event stream completed with {} entries", self.synthesis.len());
        self.termination = Some(Termination::Completed);
        Ok(())
    }

    pub fn on_error(&mut self, reason: impl Into<String>) -> Result<(), AdapterError> {
        self.ensure_open()?;
        let reason = reason.into();
        error!("Event stream failed: {}", reason);
        self.termination = Some(Termination::Failed(reason.clone()));
        self.fault_listeners.call_all(&Fault::Stream(reason));
        Ok(())
    }

    /// Number of visible elements, including headers, footers and the empty element.
    pub fn len(&self) -> usize {
        self.store.len() + self.placeholder as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry_count(&self) -> usize {
        self.synthesis.len()
    }

    pub fn get(&self, position: usize) -> Option<&Element<K, V, G>> {
        if self.placeholder {
            return if position == 0 { Some(&self.empty) } else { None };
        }
        self.store.get(position).map(|e| &e.value)
    }

    pub fn view_type_of(&self, position: usize) -> Option<ViewType> {
        let element = self.get(position)?;
        let local = match (&self.data_view_type, element.entry()) {
            (Some(view_type), Some(entry)) => view_type(entry),
            _ => 0,
        };
        Some(element.view_type(local))
    }

    pub fn position_of(&self, key: &K) -> Option<usize> {
        self.store.index_of_key(&ElementKey::Data(key.clone()))
    }

    pub fn group_of(&self, key: &K) -> Option<&G> {
        self.synthesis.group_of(key)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element<K, V, G>> + '_ {
        (0..self.len()).filter_map(move |p| self.get(p))
    }

    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn add_listener<L: Listener<Notification> + 'static>(
        &mut self,
        listener: L,
    ) -> ListenerToken {
        self.notification_listeners.add_listener(listener)
    }

    pub fn remove_listener(&mut self, listener: ListenerToken) -> bool {
        self.notification_listeners.remove_listener(listener)
    }

    pub fn add_element_listener<L: Listener<Emission<K, V, G>> + 'static>(
        &mut self,
        listener: L,
    ) -> ListenerToken {
        self.element_listeners.add_listener(listener)
    }

    pub fn remove_element_listener(&mut self, listener: ListenerToken) -> bool {
        self.element_listeners.remove_listener(listener)
    }

    pub fn add_fault_listener<L: Listener<Fault> + 'static>(
        &mut self,
        listener: L,
    ) -> ListenerToken {
        self.fault_listeners.add_listener(listener)
    }

    pub fn remove_fault_listener(&mut self, listener: ListenerToken) -> bool {
        self.fault_listeners.remove_listener(listener)
    }

    fn ensure_open(&self) -> Result<(), AdapterError> {
        match &self.termination {
            Some(termination) => Err(AdapterError::Terminated(termination.clone())),
            None => Ok(()),
        }
    }

    fn reject(&self, rejection: Rejection) -> AdapterError {
        warn!("Dropping event: {}", rejection);
        self.fault_listeners.call_all(&Fault::Malformed(rejection.clone()));
        AdapterError::Malformed(rejection)
    }

    // Only the data upsert can be refused and no store mutation precedes it.
    fn apply(
        &mut self,
        emissions: &[Emission<K, V, G>],
    ) -> Result<Vec<Notification>, Rejection> {
        let placeholder = self.placeholder;
        let mut notifications = Vec::with_capacity(emissions.len() + 1);
        for emission in emissions {
            if let Err(rejection) = self.apply_one(emission, &mut notifications) {
                self.placeholder = placeholder;
                return Err(rejection);
            }
        }
        Ok(notifications)
    }

    fn apply_one(
        &mut self,
        emission: &Emission<K, V, G>,
        notifications: &mut Vec<Notification>,
    ) -> Result<(), Rejection> {
        match (emission.kind, &emission.element) {
            (EventKind::Upsert, Element::Empty) => {
                if !self.placeholder {
                    self.placeholder = true;
                    notifications.push(Notification::Inserted(0));
                }
            }
            (EventKind::Delete, Element::Empty) => {
                if self.placeholder {
                    self.placeholder = false;
                    notifications.push(Notification::Removed(0));
                }
            }
            (EventKind::Upsert, element) => {
                let key = element.key();
                let changed = self
                    .store
                    .get_by_key(&key)
                    .map_or(true, |old| old.value.changed(element));
                match self.store.put(Entry::new(key, element.cheap_clone()))? {
                    Placement::Inserted(p) => notifications.push(Notification::Inserted(p)),
                    Placement::Changed(p) => {
                        if changed {
                            notifications.push(Notification::Changed(p));
                        }
                    }
                    Placement::Moved { from, to } => {
                        notifications.push(Notification::Moved { from, to });
                        if changed {
                            notifications.push(Notification::Changed(to));
                        }
                    }
                }
            }
            (EventKind::Delete, element) => {
                if let Some((p, _)) = self.store.remove(&element.key()) {
                    notifications.push(Notification::Removed(p));
                }
            }
        }
        Ok(())
    }
}
