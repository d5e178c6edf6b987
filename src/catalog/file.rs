use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use super::traits::OpportunitySource;
use super::types::{Opportunity, Tab};
use crate::error::DashboardError;

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(rename = "perp-perp", default)]
    perp_perp: Vec<Opportunity>,
    #[serde(rename = "carry-trade", default)]
    carry_trade: Vec<Opportunity>,
}

/// Reads both catalogs from one JSON document keyed by tab name.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl OpportunitySource for JsonFileSource {
    fn name(&self) -> &str {
        self.path.to_str().unwrap_or("catalog file")
    }

    async fn load(&self, tab: Tab) -> Result<Vec<Opportunity>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading catalog {}", self.path.display()))?;
        let file: CatalogFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", self.path.display()))?;
        if file.perp_perp.is_empty() && file.carry_trade.is_empty() {
            return Err(DashboardError::Catalog(format!("{} holds no opportunities", self.path.display())).into());
        }
        Ok(match tab {
            Tab::PerpPerp => file.perp_perp,
            Tab::CarryTrade => file.carry_trade,
        })
    }
}
