//! # Synchronized list store
//!
//! [`ListStore`] is the process-wide container behind each list view: the
//! last-known entities for one kind plus a loading flag. Every write builds a
//! fresh immutable snapshot (`Arc<Vec<T>>`) and broadcasts it to subscribers,
//! so dependent views re-render deterministically and never observe in-place
//! mutation.
//!
//! Writes are the dispatch half of the contract: [`replace_all`](ListStore::replace_all)
//! and [`set_loading`](ListStore::set_loading) are used by the gateways for
//! authoritative state, while [`insert_front`](ListStore::insert_front),
//! [`remove`](ListStore::remove), and [`replace`](ListStore::replace) are the
//! optimistic mutators applied before remote confirmation. The read half is
//! [`snapshot`](ListStore::snapshot) plus [`subscribe`](ListStore::subscribe),
//! which yields the current snapshot immediately and every later one in order.
//!
//! The loading flag is deliberately minimal: idle → loading → idle. There is
//! no "never loaded" state and no request bookkeeping beyond it.

use std::sync::{Arc, Mutex};

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};

/// Entities stored in a [`ListStore`] expose their identifier through this.
pub trait Identified {
    fn id(&self) -> &str;
}

/// One immutable view of a list store: the items and the loading flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<T> {
    pub items: Arc<Vec<T>>,
    pub loading: bool,
}

struct Inner<T> {
    items: Arc<Vec<T>>,
    loading: bool,
    senders: Vec<UnboundedSender<Snapshot<T>>>,
}

/// Shared snapshot container for one entity kind.
pub struct ListStore<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for ListStore<T> {
    fn clone(&self) -> Self {
        ListStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        ListStore {
            inner: Arc::new(Mutex::new(Inner {
                items: Arc::new(Vec::new()),
                loading: false,
                senders: Vec::new(),
            })),
        }
    }
}

impl<T: Identified + Clone> ListStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        let inner = self.inner.lock().unwrap();
        Snapshot {
            items: Arc::clone(&inner.items),
            loading: inner.loading,
        }
    }

    pub fn items(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.inner.lock().unwrap().items)
    }

    pub fn loading(&self) -> bool {
        self.inner.lock().unwrap().loading
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.inner
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Subscribe to snapshots. The current one is delivered immediately.
    pub fn subscribe(&self) -> UnboundedReceiver<Snapshot<T>> {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.lock().unwrap();
        let _ = tx.unbounded_send(Snapshot {
            items: Arc::clone(&inner.items),
            loading: inner.loading,
        });
        inner.senders.push(tx);
        rx
    }

    /// Replace the list wholesale with authoritative contents.
    pub fn replace_all(&self, items: Vec<T>) {
        self.write(|inner| inner.items = Arc::new(items));
    }

    pub fn set_loading(&self, loading: bool) {
        self.write(|inner| inner.loading = loading);
    }

    /// Optimistic insert at the front of the list.
    pub fn insert_front(&self, item: T) {
        self.write(|inner| {
            let mut items = Vec::with_capacity(inner.items.len() + 1);
            items.push(item);
            items.extend(inner.items.iter().cloned());
            inner.items = Arc::new(items);
        });
    }

    /// Optimistic removal by id.
    pub fn remove(&self, id: &str) {
        self.write(|inner| {
            let items = inner
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect();
            inner.items = Arc::new(items);
        });
    }

    /// Optimistic in-place replacement of the entity with the same id.
    /// No-op if the id is absent.
    pub fn replace(&self, item: T) {
        self.write(|inner| {
            let items = inner
                .items
                .iter()
                .map(|existing| {
                    if existing.id() == item.id() {
                        item.clone()
                    } else {
                        existing.clone()
                    }
                })
                .collect();
            inner.items = Arc::new(items);
        });
    }

    fn write(&self, mutate: impl FnOnce(&mut Inner<T>)) {
        let mut inner = self.inner.lock().unwrap();
        mutate(&mut inner);
        let snapshot = Snapshot {
            items: Arc::clone(&inner.items),
            loading: inner.loading,
        };
        inner
            .senders
            .retain(|tx| tx.unbounded_send(snapshot.clone()).is_ok());
    }
}
