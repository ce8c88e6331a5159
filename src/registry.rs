use std::cell::RefCell;
use std::rc::{Rc, Weak};

use itertools::Itertools as _;

use crate::events::{DefaultAction, PointerEvent, PointerEventKind};

type Listener = Rc<RefCell<dyn FnMut(&PointerEvent) -> DefaultAction>>;

/// Identifies one registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Entry {
    kind: PointerEventKind,
    listener: Listener,
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    listeners: ahash::HashMap<ListenerId, Entry>,

    /// Registration order, used for delivery.
    order: Vec<ListenerId>,
}

impl RegistryInner {
    fn remove(&mut self, id: ListenerId) -> bool {
        if self.listeners.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);
        true
    }
}

/// The process-wide pointer listener registry.
///
/// Listeners are held for as long as their [`Subscription`] is alive. Cloning the registry
/// yields another handle to the same listener table.
#[derive(Clone, Default)]
pub struct PointerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl std::fmt::Debug for PointerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerRegistry")
            .field("move_listeners", &self.listener_count(PointerEventKind::Move))
            .field(
                "release_listeners",
                &self.listener_count(PointerEventKind::Release),
            )
            .finish()
    }
}

/// Result of [`PointerRegistry::dispatch`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// How many listeners ran.
    pub notified: usize,

    /// At least one listener returned [`DefaultAction::Prevent`].
    pub default_prevented: bool,
}

impl PointerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`.
    ///
    /// The listener stays registered until the returned [`Subscription`] is dropped.
    pub fn subscribe(
        &self,
        kind: PointerEventKind,
        listener: impl FnMut(&PointerEvent) -> DefaultAction + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id = inner.next_id.wrapping_add(1);
        let id = ListenerId(inner.next_id);
        let listener: Listener = Rc::new(RefCell::new(listener));
        inner.listeners.insert(id, Entry { kind, listener });
        inner.order.push(id);
        log::trace!("pointer listener {id:?} registered for {kind:?}");

        Subscription {
            id,
            kind,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every listener of the matching kind, in registration order.
    ///
    /// Listeners may subscribe or unsubscribe while the event is being delivered. A listener
    /// removed by an earlier listener is not called. A listener that is already running
    /// (because it dispatched recursively) is skipped.
    pub fn dispatch(&self, event: &PointerEvent) -> DispatchOutcome {
        let kind = event.kind();

        // Snapshot, so no borrow of the table is held while listeners run.
        let targets = {
            let inner = self.inner.borrow();
            inner
                .order
                .iter()
                .filter_map(|id| {
                    let entry = inner.listeners.get(id)?;
                    (entry.kind == kind).then(|| (*id, Rc::clone(&entry.listener)))
                })
                .collect_vec()
        };

        let mut outcome = DispatchOutcome::default();
        for (id, listener) in targets {
            if !self.inner.borrow().listeners.contains_key(&id) {
                continue;
            }
            let Ok(mut listener) = listener.try_borrow_mut() else {
                log::warn!(
                    "pointer listener {id:?} is already running; skipping re-entrant {kind:?}"
                );
                continue;
            };
            outcome.notified += 1;
            if (&mut *listener)(event) == DefaultAction::Prevent {
                outcome.default_prevented = true;
            }
        }
        outcome
    }

    pub fn listener_count(&self, kind: PointerEventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// `true` if no listener of any kind is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().listeners.is_empty()
    }
}

/// Keeps one listener registered. Dropping it unregisters the listener.
#[must_use = "dropping a Subscription unregisters its listener immediately"]
pub struct Subscription {
    id: ListenerId,
    kind: PointerEventKind,
    registry: Weak<RefCell<RegistryInner>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn kind(&self) -> PointerEventKind {
        self.kind
    }

    /// `false` once the listener has been removed or the registry is gone.
    pub fn is_registered(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|inner| inner.borrow().listeners.contains_key(&self.id))
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        // The removed listener may be in the middle of running; it stays alive in the
        // dispatch snapshot until it returns.
        let removed = inner.borrow_mut().remove(self.id);
        if removed {
            log::trace!("pointer listener {:?} ({:?}) unregistered", self.id, self.kind);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
