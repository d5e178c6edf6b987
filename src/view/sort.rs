use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::types::Opportunity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    None,
    UnleveredApy,
    LeveredApy,
}

impl SortColumn {
    fn key(&self, opp: &Opportunity) -> Option<f64> {
        match self {
            SortColumn::None => None,
            SortColumn::UnleveredApy => Some(opp.unlevered_apy),
            SortColumn::LeveredApy => Some(opp.levered_apy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips direction; a new column starts descending.
    pub fn set_sort(&mut self, column: SortColumn) {
        if column == SortColumn::None {
            *self = SortState::default();
        } else if column == self.column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = SortDirection::Desc;
        }
        debug!("Sort set to {:?} {:?}", self.column, self.direction);
    }
}

/// Stable sort of a borrowed copy; the catalog itself is never reordered.
pub fn sorted_view(catalog: &[Opportunity], sort: SortState) -> Vec<&Opportunity> {
    let mut rows: Vec<&Opportunity> = catalog.iter().collect();
    if sort.column == SortColumn::None {
        return rows;
    }

    rows.sort_by(|a, b| {
        let (ka, kb) = match (sort.column.key(a), sort.column.key(b)) {
            (Some(ka), Some(kb)) => (ka, kb),
            _ => return std::cmp::Ordering::Equal,
        };
        match sort.direction {
            SortDirection::Asc => ka.total_cmp(&kb),
            SortDirection::Desc => kb.total_cmp(&ka),
        }
    });
    rows
}

/// Splits into (watchlisted, regular), each keeping the incoming order.
pub fn partition<'a>(
    sorted: &[&'a Opportunity],
    watchlist: &BTreeSet<u32>,
) -> (Vec<&'a Opportunity>, Vec<&'a Opportunity>) {
    sorted.iter().copied().partition(|opp| watchlist.contains(&opp.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::perp_perp_fixtures;

    fn ids(rows: &[&Opportunity]) -> Vec<u32> {
        rows.iter().map(|o| o.id).collect()
    }

    #[test]
    fn sort_state_machine() {
        let mut sort = SortState::default();
        assert_eq!(sort.column, SortColumn::None);

        sort.set_sort(SortColumn::LeveredApy);
        assert_eq!(sort, SortState { column: SortColumn::LeveredApy, direction: SortDirection::Desc });
        sort.set_sort(SortColumn::LeveredApy);
        assert_eq!(sort.direction, SortDirection::Asc);
        sort.set_sort(SortColumn::LeveredApy);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.set_sort(SortColumn::LeveredApy);
        sort.set_sort(SortColumn::UnleveredApy);
        assert_eq!(sort, SortState { column: SortColumn::UnleveredApy, direction: SortDirection::Desc });
    }

    #[test]
    fn levered_sort_orders_fixtures() {
        let catalog = perp_perp_fixtures();
        let mut sort = SortState::default();
        sort.set_sort(SortColumn::LeveredApy);
        assert_eq!(ids(&sorted_view(&catalog, sort)), vec![1, 2]);
        sort.set_sort(SortColumn::LeveredApy);
        assert_eq!(ids(&sorted_view(&catalog, sort)), vec![2, 1]);
        assert_eq!(catalog[0].id, 1);
    }

    #[test]
    fn equal_keys_keep_catalog_order() {
        let mut catalog = perp_perp_fixtures();
        let mut third = catalog[0].clone();
        third.id = 3;
        catalog.push(third);
        catalog[1].levered_apy = 17.2;

        for direction in [SortDirection::Desc, SortDirection::Asc] {
            let sort = SortState { column: SortColumn::LeveredApy, direction };
            assert_eq!(ids(&sorted_view(&catalog, sort)), vec![1, 2, 3]);
        }
    }

    #[test]
    fn unsorted_view_is_fixture_order() {
        let catalog = perp_perp_fixtures();
        assert_eq!(ids(&sorted_view(&catalog, SortState::default())), vec![1, 2]);
    }

    #[test]
    fn partition_keeps_sort_order() {
        let catalog = perp_perp_fixtures();
        let sort = SortState { column: SortColumn::UnleveredApy, direction: SortDirection::Asc };
        let sorted = sorted_view(&catalog, sort);

        let (starred, regular) = partition(&sorted, &BTreeSet::new());
        assert!(starred.is_empty());
        assert_eq!(ids(&regular), vec![2, 1]);

        let (starred, regular) = partition(&sorted, &BTreeSet::from([2]));
        assert_eq!(ids(&starred), vec![2]);
        assert_eq!(ids(&regular), vec![1]);
    }
}
