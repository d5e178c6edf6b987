use anyhow::Result;
use async_trait::async_trait;

use super::traits::OpportunitySource;
use super::types::{
    CarryTradeDetails, FundingSide, Opportunity, OpportunityKind, PerpLeg, PerpPerpDetails,
    PerpPosition, SpotLeg, Tab,
};

/// The built-in catalog: two perp-perp and two carry-trade records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource;

#[async_trait]
impl OpportunitySource for StaticSource {
    fn name(&self) -> &str {
        "static fixtures"
    }

    async fn load(&self, tab: Tab) -> Result<Vec<Opportunity>> {
        Ok(match tab {
            Tab::PerpPerp => perp_perp_fixtures(),
            Tab::CarryTrade => carry_trade_fixtures(),
        })
    }
}

fn perp(exchange: &str, pair: &str) -> PerpLeg {
    PerpLeg {
        exchange: exchange.to_string(),
        pair: pair.to_string(),
    }
}

fn position(collateral: f64, notional: f64, leverage: u32, funding: f64, funding_side: FundingSide) -> PerpPosition {
    PerpPosition {
        collateral,
        notional,
        leverage,
        funding,
        funding_side,
    }
}

pub fn perp_perp_fixtures() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: 1,
            unlevered_apy: 4.02,
            levered_apy: 17.2,
            wallet: 1.0,
            arkis_borrow: 3.0,
            borrow_rate: 5.0,
            borrow_cost_yearly: 150,
            kind: OpportunityKind::PerpPerp(PerpPerpDetails {
                long: perp("BITGET", "BTC-USDT"),
                short: perp("HUOBI", "BTC-USDT"),
                long_position: position(2.0, 4.0, 2, 0.39, FundingSide::Pay),
                short_position: position(2.0, 4.0, 2, 8.44, FundingSide::Collect),
                net_funding_spread: 8.05,
            }),
        },
        Opportunity {
            id: 2,
            unlevered_apy: 3.33,
            levered_apy: 11.6,
            wallet: 1.0,
            arkis_borrow: 3.0,
            borrow_rate: 5.0,
            borrow_cost_yearly: 150,
            kind: OpportunityKind::PerpPerp(PerpPerpDetails {
                long: perp("BINANCE", "BTC-USDT"),
                short: perp("HUOBI", "BTC-USDT"),
                long_position: position(2.0, 4.0, 2, 0.28, FundingSide::Pay),
                short_position: position(2.0, 4.0, 2, 6.95, FundingSide::Collect),
                net_funding_spread: 6.67,
            }),
        },
    ]
}

pub fn carry_trade_fixtures() -> Vec<Opportunity> {
    let carry = |id: u32, asset: &str, platform: &str, unlevered_apy: f64, levered_apy: f64, footer: f64| {
        Opportunity {
            id,
            unlevered_apy,
            levered_apy,
            wallet: 1.0,
            arkis_borrow: 3.0,
            borrow_rate: 5.0,
            borrow_cost_yearly: 150,
            kind: OpportunityKind::CarryTrade(CarryTradeDetails {
                long: SpotLeg {
                    asset: asset.to_string(),
                    platform: platform.to_string(),
                },
                short: perp("HUOBI", "BTC-USDT"),
                capital_pool: 4.0,
                spot_percent: 75,
                margin_percent: 25,
                allocation: 3.0,
                staking_apy: 0.41,
                short_position: position(1.0, 3.0, 3, 8.44, FundingSide::Collect),
                staking_yield: 0.41,
                funding_collected: 8.44,
                levered_apy_footer: footer,
            }),
        }
    };

    vec![
        carry(1, "LBTC", "Lombard", 6.64, 11.5, 11.55),
        carry(2, "Naked Spot", "Binance", 6.33, 10.3, 10.3),
    ]
}
