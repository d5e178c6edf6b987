use std::collections::BTreeSet;
use tracing::debug;

/// Which part of a row received the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Main,
    Star,
}

#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    target: RowTarget,
    propagation_stopped: bool,
}

impl ClickEvent {
    pub fn new(target: RowTarget) -> Self {
        Self {
            target,
            propagation_stopped: false,
        }
    }

    pub fn target(&self) -> RowTarget {
        self.target
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Expansion and watchlist membership for one catalog. The two sets are orthogonal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowToggles {
    expanded: BTreeSet<u32>,
    watchlist: BTreeSet<u32>,
}

impl RowToggles {
    pub fn with_expanded(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            expanded: ids.into_iter().collect(),
            watchlist: BTreeSet::new(),
        }
    }

    pub fn expanded(&self) -> &BTreeSet<u32> {
        &self.expanded
    }

    pub fn watchlist(&self) -> &BTreeSet<u32> {
        &self.watchlist
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.expanded.contains(&id)
    }

    pub fn is_watchlisted(&self, id: u32) -> bool {
        self.watchlist.contains(&id)
    }

    pub fn reset_expanded(&mut self, ids: impl IntoIterator<Item = u32>) {
        self.expanded = ids.into_iter().collect();
    }

    pub fn toggle_expand(&mut self, id: u32) {
        let now = flip(&mut self.expanded, id);
        debug!("Row {} {}", id, if now { "expanded" } else { "collapsed" });
    }

    /// Star handler. Consumes the click so the row underneath never sees it.
    pub fn toggle_watchlist(&mut self, id: u32, event: &mut ClickEvent) {
        event.stop_propagation();
        let now = flip(&mut self.watchlist, id);
        debug!("Opportunity {} {} watchlist", id, if now { "added to" } else { "removed from" });
    }

    /// Delivers a click to the star (if hit) and then bubbles it to the row.
    pub fn dispatch_click(&mut self, id: u32, mut event: ClickEvent) {
        if event.target() == RowTarget::Star {
            self.toggle_watchlist(id, &mut event);
        }
        if !event.is_propagation_stopped() {
            self.toggle_expand(id);
        }
    }
}

fn flip(set: &mut BTreeSet<u32>, id: u32) -> bool {
    if set.remove(&id) {
        false
    } else {
        set.insert(id);
        true
    }
}
