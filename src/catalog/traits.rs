use async_trait::async_trait;
use anyhow::Result;
use super::types::{Opportunity, Tab};

/// Read-only supplier of opportunity records, injected into the catalog.
#[async_trait]
pub trait OpportunitySource: Send + Sync {
    fn name(&self) -> &str;
    async fn load(&self, tab: Tab) -> Result<Vec<Opportunity>>;
}
