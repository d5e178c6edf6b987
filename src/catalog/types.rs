use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// The two catalogs the dashboard can show. Their id spaces are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    PerpPerp,
    CarryTrade,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::PerpPerp, Tab::CarryTrade];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::PerpPerp => "perp-perp",
            Tab::CarryTrade => "carry-trade",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::PerpPerp => "Perp–Perp",
            Tab::CarryTrade => "Carry Trade",
        }
    }

    pub fn other(&self) -> Tab {
        match self {
            Tab::PerpPerp => Tab::CarryTrade,
            Tab::CarryTrade => Tab::PerpPerp,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "perp-perp" => Ok(Tab::PerpPerp),
            "carry-trade" => Ok(Tab::CarryTrade),
            other => Err(DashboardError::UnknownTab(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingSide {
    Pay,
    Collect,
}

impl FundingSide {
    pub fn label(&self) -> &'static str {
        match self {
            FundingSide::Pay => "Pay",
            FundingSide::Collect => "Collect",
        }
    }
}

/// A futures leg quoted on a derivatives venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpLeg {
    pub exchange: String,
    pub pair: String,
}

/// A spot holding, e.g. a liquid staking token on its issuing platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotLeg {
    pub asset: String,
    pub platform: String,
}

/// Sizing of one futures position. Monetary fields are in millions, funding in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpPosition {
    pub collateral: f64,
    pub notional: f64,
    pub leverage: u32,
    pub funding: f64,
    pub funding_side: FundingSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpPerpDetails {
    pub long: PerpLeg,
    pub short: PerpLeg,
    pub long_position: PerpPosition,
    pub short_position: PerpPosition,
    pub net_funding_spread: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryTradeDetails {
    pub long: SpotLeg,
    pub short: PerpLeg,
    pub capital_pool: f64,
    pub spot_percent: u32,
    pub margin_percent: u32,
    pub allocation: f64,
    pub staking_apy: f64,
    /// `collateral` is shown as the margin posted on the short venue.
    pub short_position: PerpPosition,
    pub staking_yield: f64,
    pub funding_collected: f64,
    pub levered_apy_footer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OpportunityKind {
    PerpPerp(PerpPerpDetails),
    CarryTrade(CarryTradeDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: u32,
    pub unlevered_apy: f64,
    pub levered_apy: f64,
    pub wallet: f64,
    pub arkis_borrow: f64,
    pub borrow_rate: f64,
    /// Thousands per year.
    pub borrow_cost_yearly: u32,
    #[serde(flatten)]
    pub kind: OpportunityKind,
}

impl Opportunity {
    pub fn tab(&self) -> Tab {
        match self.kind {
            OpportunityKind::PerpPerp(_) => Tab::PerpPerp,
            OpportunityKind::CarryTrade(_) => Tab::CarryTrade,
        }
    }

    pub fn short_leg(&self) -> &PerpLeg {
        match &self.kind {
            OpportunityKind::PerpPerp(d) => &d.short,
            OpportunityKind::CarryTrade(d) => &d.short,
        }
    }

    pub fn capital_pool(&self) -> f64 {
        match &self.kind {
            OpportunityKind::PerpPerp(_) => self.wallet + self.arkis_borrow,
            OpportunityKind::CarryTrade(d) => d.capital_pool,
        }
    }

    pub fn capital_split_label(&self) -> String {
        match &self.kind {
            OpportunityKind::PerpPerp(_) => "Split 50 / 50".to_string(),
            OpportunityKind::CarryTrade(d) => format!(
                "{}.00% spot / {}.00% margin",
                d.spot_percent, d.margin_percent
            ),
        }
    }

    /// Levered APY shown in the expanded footer.
    pub fn footer_levered_apy(&self) -> f64 {
        match &self.kind {
            OpportunityKind::PerpPerp(_) => self.levered_apy,
            OpportunityKind::CarryTrade(d) => d.levered_apy_footer,
        }
    }
}
