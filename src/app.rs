use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::cell::RefCell;
use tracing::debug;

use crate::catalog::types::{Opportunity, Tab};
use crate::catalog::OpportunityCatalog;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::filters::dropdown::DropdownKind;
use crate::filters::numeric::NumericKind;
use crate::filters::{Coin, EstimationWindow, ExchangeCode, FilterPanel, FilterState};
use crate::view::rows::RowTarget;
use crate::view::sort::SortColumn;
use crate::view::ListState;

/// Which control receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tabs,
    Coin,
    Exchanges,
    Window,
    Numeric(NumericKind),
    Table,
}

impl Focus {
    const ORDER: [Focus; 9] = [
        Focus::Tabs,
        Focus::Coin,
        Focus::Exchanges,
        Focus::Window,
        Focus::Numeric(NumericKind::FuturesLeverage),
        Focus::Numeric(NumericKind::BorrowCapital),
        Focus::Numeric(NumericKind::BorrowCost),
        Focus::Numeric(NumericKind::MinTradeApy),
        Focus::Table,
    ];

    fn shifted(&self, by: isize) -> Focus {
        let len = Self::ORDER.len() as isize;
        let idx = Self::ORDER.iter().position(|f| f == self).unwrap_or(0) as isize;
        Self::ORDER[(idx + by).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropdownItem {
    Coin(Coin),
    AllExchanges,
    Exchange(ExchangeCode),
}

/// Clickable things recorded while drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Tab(Tab),
    Sort(SortColumn),
    DropdownTrigger(DropdownKind),
    DropdownItem(DropdownItem),
    RemoveChip(ExchangeCode),
    Window(EstimationWindow),
    Preset(NumericKind, f64),
    Slider(NumericKind),
    TextInput(NumericKind),
    Row(u32),
    Star(u32),
}

/// Regions drawn in the last frame. Later entries sit on top.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Hit)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, hit: Hit) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, hit));
        }
    }

    pub fn at(&self, column: u16, row: u16) -> Option<(Rect, Hit)> {
        let point = Position::new(column, row);
        self.regions.iter().rev().find(|(r, _)| r.contains(point)).copied()
    }

    pub fn find(&self, hit: Hit) -> Option<Rect> {
        self.regions.iter().find(|(_, h)| *h == hit).map(|(r, _)| *r)
    }
}

/// Text being typed into a slider's numeric twin.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericInput {
    pub kind: NumericKind,
    pub buffer: String,
    /// Set once a key changes the buffer. An untouched buffer only holds the rounded display text.
    pub dirty: bool,
}

pub struct App {
    pub catalog: OpportunityCatalog,
    pub filters: FilterPanel,
    pub list: ListState,
    pub hits: RefCell<HitMap>,
    focus: Focus,
    editing: Option<NumericInput>,
    dropdown_cursor: usize,
    should_quit: bool,
}

impl App {
    pub fn new(catalog: OpportunityCatalog, config: &DashboardConfig) -> Result<Self, DashboardError> {
        Ok(Self {
            catalog,
            filters: FilterPanel::new(FilterState::from_config(config)?),
            list: ListState::new(config.tab, config.expanded_on_open.clone()),
            hits: RefCell::new(HitMap::default()),
            focus: Focus::Table,
            editing: None,
            dropdown_cursor: 0,
            should_quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn editing(&self) -> Option<&NumericInput> {
        self.editing.as_ref()
    }

    pub fn dropdown_cursor(&self) -> usize {
        self.dropdown_cursor
    }

    pub fn active_catalog(&self) -> &[Opportunity] {
        self.catalog.get(self.list.active_tab())
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.list.switch_tab(tab);
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if focus == self.focus {
            return;
        }
        self.commit_editing();
        self.filters.close_all();
        self.focus = focus;
    }

    pub fn begin_editing(&mut self, kind: NumericKind) {
        self.set_focus(Focus::Numeric(kind));
        self.editing = Some(NumericInput {
            kind,
            buffer: self.filters.state.field(kind).text_value(),
            dirty: false,
        });
    }

    /// Blur of the numeric twin: the typed text is clamped into range.
    pub fn commit_editing(&mut self) {
        if let Some(input) = self.editing.take() {
            let field = self.filters.state.field_mut(input.kind);
            let value = if input.dirty {
                field.commit_text(&input.buffer)
            } else {
                let current = field.value();
                field.commit_value(current)
            };
            debug!("{} committed at {}", input.kind.label(), value);
        }
    }

    fn edit_buffer(&mut self, change: impl FnOnce(&mut String)) {
        if let Some(input) = self.editing.as_mut() {
            change(&mut input.buffer);
            input.dirty = true;
            let text = input.buffer.clone();
            self.filters.state.field_mut(input.kind).set_text(&text);
        }
    }

    fn open_dropdown(&mut self, kind: DropdownKind) {
        self.filters.open(kind);
        self.dropdown_cursor = 0;
    }

    fn toggle_dropdown(&mut self, kind: DropdownKind) {
        if self.filters.is_open(kind) {
            self.filters.close(kind);
        } else {
            self.open_dropdown(kind);
        }
    }

    fn select_dropdown_item(&mut self, item: DropdownItem) {
        match item {
            DropdownItem::Coin(coin) => self.filters.pick_coin(coin),
            DropdownItem::AllExchanges => self.filters.state.toggle_all_exchanges(),
            DropdownItem::Exchange(exchange) => self.filters.state.toggle_exchange(exchange),
        }
    }

    fn dropdown_items(&self, kind: DropdownKind) -> Vec<DropdownItem> {
        match kind {
            DropdownKind::Coin => self
                .filters
                .coin_candidates()
                .into_iter()
                .map(DropdownItem::Coin)
                .collect(),
            DropdownKind::Exchange => std::iter::once(DropdownItem::AllExchanges)
                .chain(ExchangeCode::ALL.into_iter().map(DropdownItem::Exchange))
                .collect(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.editing.is_some() {
            self.handle_editing_key(key);
            return;
        }
        if self.filters.is_open(DropdownKind::Coin) {
            self.handle_coin_dropdown_key(key);
            return;
        }
        if self.filters.is_open(DropdownKind::Exchange) {
            self.handle_exchange_dropdown_key(key);
            return;
        }

        let numeric_focused = matches!(self.focus, Focus::Numeric(_));
        match key.code {
            KeyCode::Char(c) if numeric_focused && (c.is_ascii_digit() || c == '.') => {
                self.handle_focused_key(key)
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.set_focus(self.focus.shifted(1)),
            KeyCode::BackTab => self.set_focus(self.focus.shifted(-1)),
            KeyCode::Char('1') => self.switch_tab(Tab::PerpPerp),
            KeyCode::Char('2') => self.switch_tab(Tab::CarryTrade),
            KeyCode::Char('u') => self.list.set_sort(SortColumn::UnleveredApy),
            KeyCode::Char('l') => self.list.set_sort(SortColumn::LeveredApy),
            KeyCode::Char('/') => {
                self.set_focus(Focus::Coin);
                self.open_dropdown(DropdownKind::Coin);
            }
            _ => self.handle_focused_key(key),
        }
    }

    fn handle_focused_key(&mut self, key: KeyEvent) {
        match self.focus {
            Focus::Tabs => {
                if matches!(key.code, KeyCode::Left | KeyCode::Right) {
                    let other = self.list.active_tab().other();
                    self.switch_tab(other);
                }
            }
            Focus::Coin => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.open_dropdown(DropdownKind::Coin);
                }
            }
            Focus::Exchanges => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.open_dropdown(DropdownKind::Exchange),
                KeyCode::Backspace | KeyCode::Delete => {
                    if let Some(last) = self.filters.state.selected_exchanges().last().copied() {
                        self.filters.state.toggle_exchange(last);
                    }
                }
                _ => {}
            },
            Focus::Window => match key.code {
                KeyCode::Left => {
                    let w = self.filters.state.estimation_window().shifted(-1);
                    self.filters.state.set_estimation_window(w);
                }
                KeyCode::Right => {
                    let w = self.filters.state.estimation_window().shifted(1);
                    self.filters.state.set_estimation_window(w);
                }
                _ => {}
            },
            Focus::Numeric(kind) => match key.code {
                KeyCode::Left => self.filters.state.field_mut(kind).nudge(-1),
                KeyCode::Right => self.filters.state.field_mut(kind).nudge(1),
                KeyCode::Enter => self.begin_editing(kind),
                KeyCode::Char('p') => self.cycle_preset(kind),
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                    self.begin_editing(kind);
                    self.edit_buffer(|buf| {
                        buf.clear();
                        buf.push(c);
                    });
                }
                _ => {}
            },
            Focus::Table => {
                let catalog = self.catalog.get(self.list.active_tab());
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => self.list.move_cursor(-1, catalog),
                    KeyCode::Down | KeyCode::Char('j') => self.list.move_cursor(1, catalog),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.list.click_at_cursor(RowTarget::Main, catalog)
                    }
                    KeyCode::Char('w') | KeyCode::Char('*') => {
                        self.list.click_at_cursor(RowTarget::Star, catalog)
                    }
                    _ => {}
                }
            }
        }
    }

    fn cycle_preset(&mut self, kind: NumericKind) {
        let presets = kind.presets();
        if presets.is_empty() {
            return;
        }
        let current = self.filters.state.field(kind).value();
        let next = presets
            .iter()
            .find(|(_, v)| *v > current)
            .unwrap_or(&presets[0]);
        self.filters.state.field_mut(kind).apply_preset(next.1);
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.edit_buffer(|buf| buf.push(c))
            }
            KeyCode::Backspace => self.edit_buffer(|buf| {
                buf.pop();
            }),
            KeyCode::Enter | KeyCode::Esc => self.commit_editing(),
            KeyCode::Tab => {
                self.commit_editing();
                self.set_focus(self.focus.shifted(1));
            }
            KeyCode::BackTab => {
                self.commit_editing();
                self.set_focus(self.focus.shifted(-1));
            }
            _ => {}
        }
    }

    fn handle_coin_dropdown_key(&mut self, key: KeyEvent) {
        let items = self.dropdown_items(DropdownKind::Coin);
        match key.code {
            KeyCode::Esc => self.filters.close(DropdownKind::Coin),
            KeyCode::Tab => self.set_focus(self.focus.shifted(1)),
            KeyCode::BackTab => self.set_focus(self.focus.shifted(-1)),
            KeyCode::Up => self.dropdown_cursor = self.dropdown_cursor.saturating_sub(1),
            KeyCode::Down => {
                self.dropdown_cursor = (self.dropdown_cursor + 1).min(items.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                if let Some(item) = items.get(self.dropdown_cursor).copied() {
                    self.select_dropdown_item(item);
                }
            }
            KeyCode::Backspace => {
                let mut query = self.filters.coin_search().to_string();
                query.pop();
                self.filters.set_coin_search(query);
                self.dropdown_cursor = 0;
            }
            KeyCode::Char(c) if !c.is_control() => {
                let query = format!("{}{}", self.filters.coin_search(), c);
                self.filters.set_coin_search(query);
                self.dropdown_cursor = 0;
            }
            _ => {}
        }
    }

    fn handle_exchange_dropdown_key(&mut self, key: KeyEvent) {
        let items = self.dropdown_items(DropdownKind::Exchange);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.filters.close(DropdownKind::Exchange),
            KeyCode::Tab => self.set_focus(self.focus.shifted(1)),
            KeyCode::BackTab => self.set_focus(self.focus.shifted(-1)),
            KeyCode::Up => self.dropdown_cursor = self.dropdown_cursor.saturating_sub(1),
            KeyCode::Down => self.dropdown_cursor = (self.dropdown_cursor + 1).min(items.len() - 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(item) = items.get(self.dropdown_cursor).copied() {
                    self.select_dropdown_item(item);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);
        self.filters.handle_click(column, row);

        let hit = self.hits.borrow().at(column, row);
        let Some((area, hit)) = hit else {
            return;
        };
        debug!("Click at {},{} hit {:?}", column, row, hit);

        if !matches!(hit, Hit::TextInput(_)) {
            self.commit_editing();
        }
        match hit {
            Hit::Tab(tab) => self.switch_tab(tab),
            Hit::Sort(column) => self.list.set_sort(column),
            Hit::DropdownTrigger(kind) => {
                self.focus = match kind {
                    DropdownKind::Coin => Focus::Coin,
                    DropdownKind::Exchange => Focus::Exchanges,
                };
                self.toggle_dropdown(kind);
            }
            Hit::DropdownItem(item) => self.select_dropdown_item(item),
            Hit::RemoveChip(exchange) => self.filters.state.toggle_exchange(exchange),
            Hit::Window(window) => self.filters.state.set_estimation_window(window),
            Hit::Preset(kind, value) => self.filters.state.field_mut(kind).apply_preset(value),
            Hit::Slider(kind) => {
                self.focus = Focus::Numeric(kind);
                let ratio = if area.width > 1 {
                    f64::from(column - area.x) / f64::from(area.width - 1)
                } else {
                    0.0
                };
                self.filters.state.field_mut(kind).set_from_ratio(ratio);
            }
            Hit::TextInput(kind) => {
                if self.editing.as_ref().map(|e| e.kind) != Some(kind) {
                    self.begin_editing(kind);
                }
            }
            Hit::Row(id) => {
                self.focus = Focus::Table;
                self.list.click(id, RowTarget::Main);
            }
            Hit::Star(id) => {
                self.focus = Focus::Table;
                self.list.click(id, RowTarget::Star);
            }
        }
    }
}
