use crate::catalog::types::Tab;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Unknown coin: {0}")]
    UnknownCoin(String),

    #[error("Unknown exchange: {0}")]
    UnknownExchange(String),

    #[error("Unknown estimation window: {0}")]
    UnknownWindow(String),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("Duplicate opportunity id {id} in {tab} catalog")]
    DuplicateOpportunityId { tab: Tab, id: u32 },

    #[error("Opportunity {id} has the wrong shape for the {tab} catalog")]
    WrongVariant { tab: Tab, id: u32 },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
