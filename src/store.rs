use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use crate::status::LoadingStatus;

type Subscriber = Rc<dyn Fn(LoadingStatus)>;

/// Shared loading status for one `<ImageRoot/>`.
///
/// Clones are handles to the same store. The probe writes it, the image and fallback
/// slots read it through subscriptions.
#[derive(Clone, Default)]
pub struct StatusStore(Rc<StoreInner>);

#[derive(Default)]
struct StoreInner {
    status: Cell<LoadingStatus>,
    disposed: Cell<bool>,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> LoadingStatus {
        self.0.status.get()
    }

    /// Stores `status` and notifies every subscriber with it.
    ///
    /// Ignored once the store has been disposed.
    pub fn set(&self, status: LoadingStatus) {
        if self.0.disposed.get() {
            log::trace!("ignoring `{status}` on a disposed status store");
            return;
        }

        let previous = self.0.status.replace(status);
        log::trace!("image status {previous} -> {status}");

        // Snapshot so subscribers may subscribe/unsubscribe while being notified.
        let subscribers: Vec<Subscriber> = self
            .0
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();

        for subscriber in subscribers {
            subscriber(status);
        }
    }

    pub fn subscribe(&self, subscriber: impl Fn(LoadingStatus) + 'static) -> Subscription {
        let id = self.0.next_id.get();
        self.0.next_id.set(id + 1);
        self.0
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));

        Subscription {
            store: Rc::downgrade(&self.0),
            id,
        }
    }

    /// Tears the store down with its owning root. Later writes are dropped.
    pub fn dispose(&self) {
        self.0.disposed.set(true);
        let subscribers = std::mem::take(&mut *self.0.subscribers.borrow_mut());
        drop(subscribers);
    }

    pub fn is_disposed(&self) -> bool {
        self.0.disposed.get()
    }

    /// True if both handles point at the same store.
    pub fn ptr_eq(&self, other: &StatusStore) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for StatusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusStore")
            .field("status", &self.get())
            .field("disposed", &self.is_disposed())
            .field("subscribers", &self.0.subscribers.borrow().len())
            .finish()
    }
}

/// Unsubscribes from its [`StatusStore`] when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
