// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed publish/subscribe: register handlers per event kind and owner, emit synchronously.
//!
//! ## Usage
//!
//! 1) Allocate a [`ListenerOwner`] per subscribing object with [`ListenerOwner::next`].
//! 2) Register handlers with [`Emitter::on`]; keep the returned [`SubscriptionId`] if you
//!    need to remove a single handler later.
//! 3) Publish with [`Emitter::emit`]; handlers run synchronously in registration order.
//! 4) Tear down with [`Emitter::off`], [`Emitter::off_kinds`] or [`Emitter::off_owner`].
//!
//! ## Reentrancy
//!
//! Handlers may call back into the emitter while it dispatches. The handler list is
//! snapshotted before any handler runs and no borrow is held across a handler call:
//!
//! - A handler removed during a dispatch is not invoked later in that dispatch.
//! - A handler added during a dispatch is first invoked by the next [`Emitter::emit`].
//! - Nested emits are allowed and dispatch depth-first.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_event_state::emitter::{Emitter, ListenerOwner};
//!
//! let emitter: Emitter<&'static str, u32> = Emitter::new();
//! let owner = ListenerOwner::next();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let l = log.clone();
//! let first = emitter.on("tick", owner, move |n: &u32| l.borrow_mut().push(*n));
//! let l = log.clone();
//! emitter.on("tock", owner, move |n: &u32| l.borrow_mut().push(*n * 10));
//!
//! emitter.emit("tick", &1);
//! emitter.emit("tock", &2);
//! assert!(emitter.off(first));
//! emitter.emit("tick", &3);
//!
//! assert_eq!(*log.borrow(), vec![1, 20]);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use smallvec::SmallVec;

/// A shared event handler.
pub type Handler<P> = Rc<dyn Fn(&P)>;

/// The context a subscription is registered under.
///
/// One owner typically corresponds to one subscribing object, so that the object can
/// remove everything it registered in one call with [`Emitter::off_owner`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerOwner(usize);

impl ListenerOwner {
    /// Allocates a process-unique owner.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies a single registered handler on one [`Emitter`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Listener<K, P> {
    id: SubscriptionId,
    kind: K,
    owner: ListenerOwner,
    handler: Handler<P>,
}

/// Synchronous publish/subscribe keyed by an event kind `K`, carrying payloads of type `P`.
///
/// All methods take `&self`; the emitter is meant to be shared (for example behind an
/// [`Rc`]) between the publisher and its subscribers on a single thread.
pub struct Emitter<K, P> {
    listeners: RefCell<Vec<Listener<K, P>>>,
    next_id: Cell<u64>,
}

impl<K: Copy + Eq, P> Emitter<K, P> {
    /// Creates an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Registers `handler` for `kind` under `owner`.
    pub fn on<F>(&self, kind: K, owner: ListenerOwner, handler: F) -> SubscriptionId
    where
        F: Fn(&P) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            kind,
            owner,
            handler: Rc::new(handler),
        });
        id
    }

    /// Removes one subscription. Returns `false` if it was not registered.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.remove_where(|l| l.id == id) > 0
    }

    /// Removes every subscription registered under `owner`.
    pub fn off_owner(&self, owner: ListenerOwner) -> usize {
        self.remove_where(|l| l.owner == owner)
    }

    /// Removes the subscriptions `owner` registered for any of `kinds`.
    pub fn off_kinds(&self, owner: ListenerOwner, kinds: &[K]) -> usize {
        self.remove_where(|l| l.owner == owner && kinds.contains(&l.kind))
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Invokes the handlers registered for `kind` and returns how many ran.
    pub fn emit(&self, kind: K, payload: &P) -> usize {
        let snapshot: SmallVec<[(SubscriptionId, Handler<P>); 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| (l.id, Rc::clone(&l.handler)))
            .collect();

        let mut invoked = 0;
        for (id, handler) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            handler(payload);
            invoked += 1;
        }
        invoked
    }

    /// Returns `true` while the subscription is registered.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow().iter().any(|l| l.id == id)
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: K) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Number of handlers registered under `owner`.
    #[must_use]
    pub fn owner_count(&self, owner: ListenerOwner) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.owner == owner)
            .count()
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    fn remove_where(&self, mut pred: impl FnMut(&Listener<K, P>) -> bool) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| !pred(l));
        before - listeners.len()
    }
}

impl<K: Copy + Eq, P> Default for Emitter<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, P> fmt::Debug for Emitter<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        f.debug_struct("Emitter")
            .field(
                "listeners",
                &listeners
                    .iter()
                    .map(|l| (l.id, &l.kind, l.owner))
                    .collect::<Vec<_>>(),
            )
            .field("next_id", &self.next_id.get())
            .finish()
    }
}
