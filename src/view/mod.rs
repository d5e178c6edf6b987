pub mod rows;
pub mod sort;

use tracing::debug;

use crate::catalog::types::{Opportunity, Tab};
use rows::{ClickEvent, RowTarget, RowToggles};
use sort::{partition, sorted_view, SortColumn, SortState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Watchlist,
    Regular,
}

#[derive(Debug, Clone, Copy)]
pub struct DisplayedRow<'a> {
    pub section: Section,
    pub opportunity: &'a Opportunity,
    pub expanded: bool,
    pub starred: bool,
}

/// What the table draws: starred rows first, then the rest, both in sort order.
#[derive(Debug, Clone)]
pub struct OpportunityView<'a> {
    pub watchlisted: Vec<&'a Opportunity>,
    pub regular: Vec<&'a Opportunity>,
    toggles: &'a RowToggles,
}

impl<'a> OpportunityView<'a> {
    pub fn len(&self) -> usize {
        self.watchlisted.len() + self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_watchlist_section(&self) -> bool {
        !self.watchlisted.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = DisplayedRow<'a>> + '_ {
        let toggles = self.toggles;
        self.watchlisted
            .iter()
            .map(|o| (Section::Watchlist, *o))
            .chain(self.regular.iter().map(|o| (Section::Regular, *o)))
            .map(move |(section, opportunity)| DisplayedRow {
                section,
                opportunity,
                expanded: toggles.is_expanded(opportunity.id),
                starred: toggles.is_watchlisted(opportunity.id),
            })
    }

    pub fn id_at(&self, index: usize) -> Option<u32> {
        self.watchlisted
            .iter()
            .chain(self.regular.iter())
            .nth(index)
            .map(|o| o.id)
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.watchlisted
            .iter()
            .chain(self.regular.iter())
            .position(|o| o.id == id)
    }
}

/// Sort order is shared by both tabs; expansion and watchlist are kept per tab.
#[derive(Debug, Clone)]
pub struct ListState {
    active: Tab,
    sort: SortState,
    perp_perp: RowToggles,
    carry_trade: RowToggles,
    expansion_seed: Vec<u32>,
    cursor: usize,
}

impl ListState {
    pub fn new(active: Tab, expansion_seed: Vec<u32>) -> Self {
        let mut state = Self {
            active,
            sort: SortState::default(),
            perp_perp: RowToggles::default(),
            carry_trade: RowToggles::default(),
            expansion_seed,
            cursor: 0,
        };
        let seed = state.expansion_seed.clone();
        state.toggles_mut().reset_expanded(seed);
        state
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// Entering a tab collapses it back to the seed rows; its watchlist survives.
    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == self.active {
            return;
        }
        self.active = tab;
        self.cursor = 0;
        let seed = self.expansion_seed.clone();
        self.toggles_mut().reset_expanded(seed);
        debug!("Switched to {} tab", tab);
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, column: SortColumn) {
        self.sort.set_sort(column);
    }

    pub fn toggles(&self) -> &RowToggles {
        match self.active {
            Tab::PerpPerp => &self.perp_perp,
            Tab::CarryTrade => &self.carry_trade,
        }
    }

    pub fn toggles_for(&self, tab: Tab) -> &RowToggles {
        match tab {
            Tab::PerpPerp => &self.perp_perp,
            Tab::CarryTrade => &self.carry_trade,
        }
    }

    fn toggles_mut(&mut self) -> &mut RowToggles {
        match self.active {
            Tab::PerpPerp => &mut self.perp_perp,
            Tab::CarryTrade => &mut self.carry_trade,
        }
    }

    pub fn view<'a>(&'a self, catalog: &'a [Opportunity]) -> OpportunityView<'a> {
        let toggles = self.toggles();
        let sorted = sorted_view(catalog, self.sort);
        let (watchlisted, regular) = partition(&sorted, toggles.watchlist());
        OpportunityView {
            watchlisted,
            regular,
            toggles,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize, catalog: &[Opportunity]) {
        let len = catalog.len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn click(&mut self, id: u32, target: RowTarget) {
        self.toggles_mut().dispatch_click(id, ClickEvent::new(target));
    }

    /// Acts on the row under the cursor. The cursor follows the row if it changes section.
    pub fn click_at_cursor(&mut self, target: RowTarget, catalog: &[Opportunity]) {
        let Some(id) = self.view(catalog).id_at(self.cursor) else {
            return;
        };
        self.click(id, target);
        let moved_to = self.view(catalog).index_of(id);
        if let Some(idx) = moved_to {
            self.cursor = idx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{carry_trade_fixtures, perp_perp_fixtures};

    fn ids(rows: &[&Opportunity]) -> Vec<u32> {
        rows.iter().map(|o| o.id).collect()
    }

    #[test]
    fn watchlisted_row_moves_to_top_section() {
        let catalog = perp_perp_fixtures();
        let mut list = ListState::new(Tab::PerpPerp, vec![1]);
        assert!(!list.view(&catalog).has_watchlist_section());

        list.click(2, RowTarget::Star);
        for column in [SortColumn::None, SortColumn::LeveredApy, SortColumn::UnleveredApy] {
            list.set_sort(column);
            let view = list.view(&catalog);
            assert_eq!(ids(&view.watchlisted), vec![2]);
            assert_eq!(ids(&view.regular), vec![1]);
        }
    }

    #[test]
    fn rows_flag_expansion_and_star() {
        let catalog = perp_perp_fixtures();
        let mut list = ListState::new(Tab::PerpPerp, vec![1]);
        list.click(2, RowTarget::Star);
        let rows: Vec<_> = list
            .view(&catalog)
            .rows()
            .map(|r| (r.section, r.opportunity.id, r.expanded, r.starred))
            .collect();
        assert_eq!(
            rows,
            vec![(Section::Watchlist, 2, false, true), (Section::Regular, 1, true, false)]
        );
    }

    #[test]
    fn tab_switch_resets_expansion_but_keeps_watchlist_and_sort() {
        let mut list = ListState::new(Tab::PerpPerp, vec![1]);
        list.set_sort(SortColumn::LeveredApy);
        list.click(2, RowTarget::Main);
        list.click(2, RowTarget::Star);
        assert_eq!(list.toggles().expanded().len(), 2);

        list.switch_tab(Tab::CarryTrade);
        assert!(list.toggles().watchlist().is_empty());
        assert!(list.toggles().is_expanded(1));

        list.switch_tab(Tab::PerpPerp);
        assert_eq!(list.toggles().expanded().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert!(list.toggles().is_watchlisted(2));
        assert_eq!(list.sort().column, SortColumn::LeveredApy);
    }

    #[test]
    fn cursor_follows_starred_row() {
        let catalog = carry_trade_fixtures();
        let mut list = ListState::new(Tab::CarryTrade, vec![]);
        list.move_cursor(5, &catalog);
        assert_eq!(list.cursor(), 1);

        list.click_at_cursor(RowTarget::Star, &catalog);
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.view(&catalog).id_at(0), Some(2));
        assert!(list.toggles().expanded().is_empty());

        list.click_at_cursor(RowTarget::Main, &catalog);
        assert!(list.toggles().is_expanded(2));
    }

    #[test]
    fn cursor_on_empty_catalog() {
        let mut list = ListState::new(Tab::PerpPerp, vec![]);
        list.move_cursor(1, &[]);
        list.click_at_cursor(RowTarget::Main, &[]);
        assert_eq!(list.cursor(), 0);
        assert!(list.view(&[]).is_empty());
    }
}
