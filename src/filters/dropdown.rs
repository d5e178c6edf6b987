use ratatui::layout::{Position, Rect};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropdownKind {
    Coin,
    Exchange,
}

#[derive(Debug)]
struct Listener {
    id: u64,
    owner: DropdownKind,
    bounds: Rect,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Screen-wide click detector. Only open dropdowns hold a listener, and a
/// listener lives exactly as long as its [`OutsideClickSubscription`].
#[derive(Debug, Clone, Default)]
pub struct OutsideClickRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl OutsideClickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, owner: DropdownKind) -> OutsideClickSubscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push(Listener {
            id,
            owner,
            bounds: Rect::default(),
        });
        debug!("Outside-click listener {} attached for {:?}", id, owner);
        OutsideClickSubscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn active(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Owners whose region does not contain the click.
    pub fn dispatch(&self, column: u16, row: u16) -> Vec<DropdownKind> {
        let point = Position::new(column, row);
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| !l.bounds.contains(point))
            .map(|l| l.owner)
            .collect()
    }
}

/// Detaches its listener when dropped.
#[derive(Debug)]
pub struct OutsideClickSubscription {
    id: u64,
    registry: Weak<RefCell<RegistryInner>>,
}

impl OutsideClickSubscription {
    /// Records where the dropdown was last drawn, trigger included.
    pub fn set_bounds(&self, bounds: Rect) {
        if let Some(inner) = self.registry.upgrade() {
            if let Some(listener) = inner
                .borrow_mut()
                .listeners
                .iter_mut()
                .find(|l| l.id == self.id)
            {
                listener.bounds = bounds;
            }
        }
    }
}

impl Drop for OutsideClickSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().listeners.retain(|l| l.id != self.id);
            debug!("Outside-click listener {} detached", self.id);
        }
    }
}

#[derive(Debug)]
pub struct Dropdown {
    kind: DropdownKind,
    subscription: Option<OutsideClickSubscription>,
}

impl Dropdown {
    pub fn new(kind: DropdownKind) -> Self {
        Self {
            kind,
            subscription: None,
        }
    }

    pub fn kind(&self) -> DropdownKind {
        self.kind
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn open(&mut self, registry: &OutsideClickRegistry) {
        if self.subscription.is_none() {
            self.subscription = Some(registry.subscribe(self.kind));
        }
    }

    pub fn close(&mut self) {
        self.subscription = None;
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if let Some(sub) = &self.subscription {
            sub.set_bounds(bounds);
        }
    }
}
