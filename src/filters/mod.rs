pub mod dropdown;
pub mod numeric;

use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use dropdown::{Dropdown, DropdownKind, OutsideClickRegistry};
use numeric::{NumericField, NumericKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coin {
    Avax,
    Btc,
    Eth,
    Hype,
    Lit,
    Sol,
}

impl Coin {
    pub const ALL: [Coin; 6] = [Coin::Avax, Coin::Btc, Coin::Eth, Coin::Hype, Coin::Lit, Coin::Sol];

    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Avax => "AVAX",
            Coin::Btc => "BTC",
            Coin::Eth => "ETH",
            Coin::Hype => "HYPE",
            Coin::Lit => "LIT",
            Coin::Sol => "SOL",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Coin::Avax => "A",
            Coin::Btc => "₿",
            Coin::Eth => "Ξ",
            Coin::Hype => "H",
            Coin::Lit => "L",
            Coin::Sol => "◎",
        }
    }

    pub fn icon_path(&self) -> &'static str {
        match self {
            Coin::Avax => "/icons/tokens/avax.png",
            Coin::Btc => "/icons/tokens/btc.png",
            Coin::Eth => "/icons/tokens/eth.png",
            Coin::Hype => "/icons/tokens/hype.png",
            Coin::Lit => "/icons/tokens/lit.png",
            Coin::Sol => "/icons/tokens/sol.png",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Coin {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Coin::ALL
            .into_iter()
            .find(|c| c.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownCoin(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeCode {
    Hyperliquid,
    Bybit,
    Binance,
    Bitget,
    Okx,
    Huobi,
    Lighter,
}

impl ExchangeCode {
    pub const ALL: [ExchangeCode; 7] = [
        ExchangeCode::Hyperliquid,
        ExchangeCode::Bybit,
        ExchangeCode::Binance,
        ExchangeCode::Bitget,
        ExchangeCode::Okx,
        ExchangeCode::Huobi,
        ExchangeCode::Lighter,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ExchangeCode::Hyperliquid => "HYPERLIQUID",
            ExchangeCode::Bybit => "BYBIT",
            ExchangeCode::Binance => "BINANCE",
            ExchangeCode::Bitget => "BITGET",
            ExchangeCode::Okx => "OKX",
            ExchangeCode::Huobi => "HUOBI",
            ExchangeCode::Lighter => "LIGHTER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExchangeCode::Hyperliquid => "Hyperliquid",
            ExchangeCode::Bybit => "Bybit",
            ExchangeCode::Binance => "Binance",
            ExchangeCode::Bitget => "Bitget",
            ExchangeCode::Okx => "OKX",
            ExchangeCode::Huobi => "Huobi",
            ExchangeCode::Lighter => "Lighter",
        }
    }

    pub fn icon_path(&self) -> &'static str {
        match self {
            ExchangeCode::Hyperliquid => "/icons/exchanges/hyperliquid.png",
            ExchangeCode::Bybit => "/icons/exchanges/bybit.png",
            ExchangeCode::Binance => "/icons/exchanges/binance.png",
            ExchangeCode::Bitget => "/icons/exchanges/bitget.png",
            ExchangeCode::Okx => "/icons/exchanges/okx.png",
            ExchangeCode::Huobi => "/icons/exchanges/huobi.png",
            ExchangeCode::Lighter => "/icons/exchanges/lighter.png",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            ExchangeCode::Hyperliquid => "HL",
            ExchangeCode::Bybit => "BY",
            ExchangeCode::Binance => "BN",
            ExchangeCode::Bitget => "BG",
            ExchangeCode::Okx => "OK",
            ExchangeCode::Huobi => "HB",
            ExchangeCode::Lighter => "LT",
        }
    }
}

impl FromStr for ExchangeCode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExchangeCode::ALL
            .into_iter()
            .find(|e| e.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownExchange(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimationWindow {
    OneDay,
    ThreeDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
    ThreeMonths,
}

impl EstimationWindow {
    pub const ALL: [EstimationWindow; 6] = [
        EstimationWindow::OneDay,
        EstimationWindow::ThreeDays,
        EstimationWindow::OneWeek,
        EstimationWindow::TwoWeeks,
        EstimationWindow::OneMonth,
        EstimationWindow::ThreeMonths,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EstimationWindow::OneDay => "1D",
            EstimationWindow::ThreeDays => "3D",
            EstimationWindow::OneWeek => "1W",
            EstimationWindow::TwoWeeks => "2W",
            EstimationWindow::OneMonth => "1M",
            EstimationWindow::ThreeMonths => "3M",
        }
    }

    pub fn shifted(&self, by: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let idx = Self::ALL.iter().position(|w| w == self).unwrap_or(0) as isize;
        Self::ALL[(idx + by).rem_euclid(len) as usize]
    }
}

impl FromStr for EstimationWindow {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EstimationWindow::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownWindow(wanted.to_string()))
    }
}

/// User-chosen coin, venues, window and position sizing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    selected_coin: Coin,
    /// Insertion order is kept for chip display.
    selected_exchanges: Vec<ExchangeCode>,
    estimation_window: EstimationWindow,
    futures_leverage: NumericField,
    borrow_capital: NumericField,
    borrow_cost: NumericField,
    min_trade_apy: NumericField,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_coin: Coin::Btc,
            selected_exchanges: ExchangeCode::ALL.to_vec(),
            estimation_window: EstimationWindow::OneWeek,
            futures_leverage: NumericField::new(NumericKind::FuturesLeverage, 2.0),
            borrow_capital: NumericField::new(NumericKind::BorrowCapital, 3.0),
            borrow_cost: NumericField::new(NumericKind::BorrowCost, 0.05),
            min_trade_apy: NumericField::new(NumericKind::MinTradeApy, 0.1),
        }
    }
}

impl FilterState {
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let mut selected_exchanges = Vec::new();
        for code in &config.exchanges {
            let exchange: ExchangeCode = code.parse()?;
            if !selected_exchanges.contains(&exchange) {
                selected_exchanges.push(exchange);
            }
        }

        Ok(Self {
            selected_coin: config.coin.parse()?,
            selected_exchanges,
            estimation_window: config.estimation_window.parse()?,
            futures_leverage: NumericField::new(NumericKind::FuturesLeverage, config.futures_leverage),
            borrow_capital: NumericField::new(NumericKind::BorrowCapital, config.borrow_capital),
            borrow_cost: NumericField::new(NumericKind::BorrowCost, config.borrow_cost),
            min_trade_apy: NumericField::new(NumericKind::MinTradeApy, config.min_trade_apy),
        })
    }

    pub fn selected_coin(&self) -> Coin {
        self.selected_coin
    }

    pub fn select_coin(&mut self, coin: Coin) {
        debug!("Coin selected: {}", coin);
        self.selected_coin = coin;
    }

    pub fn estimation_window(&self) -> EstimationWindow {
        self.estimation_window
    }

    pub fn set_estimation_window(&mut self, window: EstimationWindow) {
        debug!("Estimation window: {}", window.label());
        self.estimation_window = window;
    }

    pub fn selected_exchanges(&self) -> &[ExchangeCode] {
        &self.selected_exchanges
    }

    pub fn is_exchange_selected(&self, exchange: ExchangeCode) -> bool {
        self.selected_exchanges.contains(&exchange)
    }

    pub fn toggle_exchange(&mut self, exchange: ExchangeCode) {
        if let Some(idx) = self.selected_exchanges.iter().position(|e| *e == exchange) {
            self.selected_exchanges.remove(idx);
        } else {
            self.selected_exchanges.push(exchange);
        }
        debug!("Exchange {} toggled, {} selected", exchange.code(), self.selected_exchanges.len());
    }

    pub fn select_all_exchanges(&mut self) {
        self.selected_exchanges = ExchangeCode::ALL.to_vec();
    }

    pub fn clear_all_exchanges(&mut self) {
        self.selected_exchanges.clear();
    }

    pub fn all_exchanges_selected(&self) -> bool {
        ExchangeCode::ALL.iter().all(|e| self.selected_exchanges.contains(e))
    }

    /// The "All" entry: clears a full selection, otherwise fills it.
    pub fn toggle_all_exchanges(&mut self) {
        if self.all_exchanges_selected() {
            self.clear_all_exchanges();
        } else {
            self.select_all_exchanges();
        }
    }

    /// First two selected exchanges plus how many more are hidden behind `+N`.
    pub fn exchange_chips(&self) -> (&[ExchangeCode], usize) {
        let shown = self.selected_exchanges.len().min(2);
        (&self.selected_exchanges[..shown], self.selected_exchanges.len() - shown)
    }

    pub fn field(&self, kind: NumericKind) -> &NumericField {
        match kind {
            NumericKind::FuturesLeverage => &self.futures_leverage,
            NumericKind::BorrowCapital => &self.borrow_capital,
            NumericKind::BorrowCost => &self.borrow_cost,
            NumericKind::MinTradeApy => &self.min_trade_apy,
        }
    }

    pub fn field_mut(&mut self, kind: NumericKind) -> &mut NumericField {
        match kind {
            NumericKind::FuturesLeverage => &mut self.futures_leverage,
            NumericKind::BorrowCapital => &mut self.borrow_capital,
            NumericKind::BorrowCost => &mut self.borrow_cost,
            NumericKind::MinTradeApy => &mut self.min_trade_apy,
        }
    }
}

/// Case-insensitive substring match on the symbol; the enum itself is untouched.
pub fn search_coins(query: &str) -> Vec<Coin> {
    let needle = query.trim().to_lowercase();
    Coin::ALL
        .into_iter()
        .filter(|c| c.symbol().to_lowercase().contains(&needle))
        .collect()
}

/// Filter state plus the two dropdowns that edit it.
#[derive(Debug)]
pub struct FilterPanel {
    pub state: FilterState,
    coin_dropdown: Dropdown,
    exchange_dropdown: Dropdown,
    coin_search: String,
    outside_clicks: OutsideClickRegistry,
}

impl FilterPanel {
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            coin_dropdown: Dropdown::new(DropdownKind::Coin),
            exchange_dropdown: Dropdown::new(DropdownKind::Exchange),
            coin_search: String::new(),
            outside_clicks: OutsideClickRegistry::new(),
        }
    }

    pub fn dropdown(&self, kind: DropdownKind) -> &Dropdown {
        match kind {
            DropdownKind::Coin => &self.coin_dropdown,
            DropdownKind::Exchange => &self.exchange_dropdown,
        }
    }

    pub fn is_open(&self, kind: DropdownKind) -> bool {
        self.dropdown(kind).is_open()
    }

    pub fn open_listeners(&self) -> usize {
        self.outside_clicks.active()
    }

    pub fn open(&mut self, kind: DropdownKind) {
        match kind {
            DropdownKind::Coin => {
                self.close(DropdownKind::Exchange);
                self.coin_dropdown.open(&self.outside_clicks);
            }
            DropdownKind::Exchange => {
                self.close(DropdownKind::Coin);
                self.exchange_dropdown.open(&self.outside_clicks);
            }
        }
    }

    pub fn close(&mut self, kind: DropdownKind) {
        match kind {
            DropdownKind::Coin => {
                self.coin_dropdown.close();
                self.coin_search.clear();
            }
            DropdownKind::Exchange => self.exchange_dropdown.close(),
        }
    }

    pub fn toggle(&mut self, kind: DropdownKind) {
        if self.is_open(kind) {
            self.close(kind);
        } else {
            self.open(kind);
        }
    }

    pub fn close_all(&mut self) {
        self.close(DropdownKind::Coin);
        self.close(DropdownKind::Exchange);
    }

    /// Closes every open dropdown the click landed outside of. Returns whether any closed.
    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        let outside = self.outside_clicks.dispatch(column, row);
        for kind in &outside {
            debug!("Click outside {:?} dropdown", kind);
            self.close(*kind);
        }
        !outside.is_empty()
    }

    pub fn coin_search(&self) -> &str {
        &self.coin_search
    }

    pub fn set_coin_search(&mut self, query: impl Into<String>) {
        self.coin_search = query.into();
    }

    pub fn coin_candidates(&self) -> Vec<Coin> {
        search_coins(&self.coin_search)
    }

    /// Picking a coin closes the dropdown, which also clears the query.
    pub fn pick_coin(&mut self, coin: Coin) {
        self.state.select_coin(coin);
        self.close(DropdownKind::Coin);
    }
}
