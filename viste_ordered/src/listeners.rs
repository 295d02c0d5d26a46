use slab::Slab;

pub trait Listener<T> {
    fn call(&self, data: &T);
}

impl<T, F: Fn(&T)> Listener<T> for F {
    fn call(&self, data: &T) {
        self(data)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ListenerToken(usize);

pub struct Listeners<T>(Slab<Box<dyn Listener<T>>>);

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self(Slab::new())
    }

    pub fn call_all(&self, data: &T) {
        self.0.iter().for_each(|(_, l)| l.call(data));
    }

    pub fn add_listener<L: Listener<T> + 'static>(&mut self, listener: L) -> ListenerToken {
        ListenerToken(self.0.insert(Box::new(listener)))
    }

    pub fn remove_listener(&mut self, listener: ListenerToken) -> bool {
        if self.0.contains(listener.0) {
            self.0.remove(listener.0);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Listeners::new()
    }
}
