pub mod assets;
pub mod file;
pub mod fixtures;
pub mod traits;
pub mod types;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::DashboardError;
use crate::filters::ExchangeCode;
use traits::OpportunitySource;
use types::{Opportunity, Tab};

/// Immutable opportunity lists, one per tab, fixed for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct OpportunityCatalog {
    perp_perp: Arc<[Opportunity]>,
    carry_trade: Arc<[Opportunity]>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl OpportunityCatalog {
    pub fn new(
        perp_perp: Vec<Opportunity>,
        carry_trade: Vec<Opportunity>,
        source: impl Into<String>,
    ) -> Result<Self, DashboardError> {
        validate(Tab::PerpPerp, &perp_perp)?;
        validate(Tab::CarryTrade, &carry_trade)?;

        Ok(Self {
            perp_perp: perp_perp.into(),
            carry_trade: carry_trade.into(),
            source: source.into(),
            loaded_at: Utc::now(),
        })
    }

    pub async fn load(source: &dyn OpportunitySource) -> Result<Self> {
        let perp_perp = source.load(Tab::PerpPerp).await?;
        let carry_trade = source.load(Tab::CarryTrade).await?;
        debug!(
            "Loaded {} perp-perp and {} carry-trade opportunities from {}",
            perp_perp.len(),
            carry_trade.len(),
            source.name()
        );
        Ok(Self::new(perp_perp, carry_trade, source.name())?)
    }

    pub fn get(&self, tab: Tab) -> &[Opportunity] {
        match tab {
            Tab::PerpPerp => &self.perp_perp,
            Tab::CarryTrade => &self.carry_trade,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn seconds_since_load(&self, now: DateTime<Utc>) -> i64 {
        (now - self.loaded_at).num_seconds().max(0)
    }
}

fn validate(tab: Tab, records: &[Opportunity]) -> Result<(), DashboardError> {
    let mut seen = HashSet::new();
    for opp in records {
        if opp.tab() != tab {
            return Err(DashboardError::WrongVariant { tab, id: opp.id });
        }
        if !seen.insert(opp.id) {
            return Err(DashboardError::DuplicateOpportunityId { tab, id: opp.id });
        }
        let short = &opp.short_leg().exchange;
        if short.parse::<ExchangeCode>().is_err() {
            warn!("Opportunity {} ({}) uses unknown exchange {}, using fallback icon", opp.id, tab, short);
        }
        if let types::OpportunityKind::PerpPerp(details) = &opp.kind {
            if details.long.exchange.parse::<ExchangeCode>().is_err() {
                warn!(
                    "Opportunity {} ({}) uses unknown exchange {}, using fallback icon",
                    opp.id, tab, details.long.exchange
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::{carry_trade_fixtures, perp_perp_fixtures, StaticSource};
    use file::JsonFileSource;

    #[tokio::test]
    async fn static_source_fills_both_tabs() -> Result<()> {
        let catalog = OpportunityCatalog::load(&StaticSource).await?;
        let perp: Vec<u32> = catalog.get(Tab::PerpPerp).iter().map(|o| o.id).collect();
        let carry: Vec<u32> = catalog.get(Tab::CarryTrade).iter().map(|o| o.id).collect();
        assert_eq!(perp, vec![1, 2]);
        assert_eq!(carry, vec![1, 2]);
        assert_eq!(catalog.get(Tab::PerpPerp)[0].levered_apy, 17.2);
        assert_eq!(catalog.source(), "static fixtures");
        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut records = perp_perp_fixtures();
        records[1].id = 1;
        let err = OpportunityCatalog::new(records, carry_trade_fixtures(), "test").unwrap_err();
        assert!(matches!(err, DashboardError::DuplicateOpportunityId { tab: Tab::PerpPerp, id: 1 }));
    }

    #[test]
    fn records_must_match_their_tab() {
        let err = OpportunityCatalog::new(carry_trade_fixtures(), carry_trade_fixtures(), "test").unwrap_err();
        assert!(matches!(err, DashboardError::WrongVariant { tab: Tab::PerpPerp, .. }));
    }

    #[test]
    fn capital_pool_depends_on_variant() {
        let perp = &perp_perp_fixtures()[0];
        let carry = &carry_trade_fixtures()[0];
        assert_eq!(perp.capital_pool(), 4.0);
        assert_eq!(perp.capital_split_label(), "Split 50 / 50");
        assert_eq!(carry.capital_pool(), 4.0);
        assert_eq!(carry.capital_split_label(), "75.00% spot / 25.00% margin");
        assert_eq!(carry.footer_levered_apy(), 11.55);
    }

    #[tokio::test]
    async fn json_file_source_reads_tagged_records() -> Result<()> {
        let doc = serde_json::json!({
            "perp-perp": perp_perp_fixtures(),
            "carry-trade": carry_trade_fixtures(),
        });
        assert_eq!(doc["carry-trade"][0]["kind"], "carry-trade");

        let path = std::env::temp_dir().join(format!("fra-catalog-{}.json", std::process::id()));
        std::fs::write(&path, doc.to_string())?;
        let catalog = OpportunityCatalog::load(&JsonFileSource::new(&path)).await;
        std::fs::remove_file(&path)?;

        let catalog = catalog?;
        assert_eq!(catalog.get(Tab::PerpPerp), perp_perp_fixtures().as_slice());
        assert_eq!(catalog.get(Tab::CarryTrade), carry_trade_fixtures().as_slice());
        Ok(())
    }

    #[tokio::test]
    async fn missing_catalog_file_is_an_error() {
        let source = JsonFileSource::new("/nonexistent/fra-catalog.json");
        assert!(OpportunityCatalog::load(&source).await.is_err());
    }

    #[tokio::test]
    async fn empty_catalog_file_is_rejected() -> Result<()> {
        let path = std::env::temp_dir().join(format!("fra-empty-catalog-{}.json", std::process::id()));
        std::fs::write(&path, "{}")?;
        let loaded = OpportunityCatalog::load(&JsonFileSource::new(&path)).await;
        std::fs::remove_file(&path)?;

        let err = loaded.unwrap_err();
        assert!(matches!(err.downcast_ref::<DashboardError>(), Some(DashboardError::Catalog(_))));
        Ok(())
    }
}
