#[cfg(test)]
mod dashboard_tests {
    use crate::app::{App, DropdownItem, Focus, Hit};
    use crate::catalog::fixtures::StaticSource;
    use crate::catalog::types::Tab;
    use crate::catalog::OpportunityCatalog;
    use crate::config::DashboardConfig;
    use crate::filters::dropdown::DropdownKind;
    use crate::filters::numeric::NumericKind;
    use crate::filters::{Coin, ExchangeCode};
    use crate::ui;
    use crate::view::sort::SortColumn;
    use anyhow::{anyhow, Result};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};
    use std::collections::BTreeSet;
    use tracing::info;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    async fn new_app() -> Result<App> {
        init_logging();
        let catalog = OpportunityCatalog::load(&StaticSource).await?;
        Ok(App::new(catalog, &DashboardConfig::default())?)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn render(app: &App) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(140, 50))?;
        terminal.draw(|f| ui::draw(f, app))?;
        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        Ok(screen)
    }

    /// Clicks the first cell where `hit` is the topmost region.
    fn click(app: &mut App, hit: Hit) -> Result<()> {
        let (column, row) = {
            let hits = app.hits.borrow();
            let area = hits.find(hit).ok_or_else(|| anyhow!("{:?} not drawn", hit))?;
            (area.top()..area.bottom())
                .flat_map(|y| (area.left()..area.right()).map(move |x| (x, y)))
                .find(|&(x, y)| hits.at(x, y).map(|(_, h)| h) == Some(hit))
                .ok_or_else(|| anyhow!("{:?} is covered", hit))?
        };
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
        Ok(())
    }

    fn displayed_ids(app: &App) -> (Vec<u32>, Vec<u32>) {
        let view = app.list.view(app.active_catalog());
        (
            view.watchlisted.iter().map(|o| o.id).collect(),
            view.regular.iter().map(|o| o.id).collect(),
        )
    }

    #[tokio::test]
    async fn initial_screen_shows_perp_perp_catalog() -> Result<()> {
        let app = new_app().await?;
        let screen = render(&app)?;
        info!("Initial screen:\n{}", screen);

        for expected in [
            "FRA Dashboard",
            "Arkis Alpha",
            "Perp–Perp",
            "Position Settings",
            "2 opportunities",
            "1W window",
            "BTC-USDT Bitget",
            "4.02%",
            "17.2%",
            "Split 50 / 50",
            "3x @ 5.00% APR",
            "-$150K/yr",
            "Net Funding Spread",
            "Arkis. All rights reserved.",
        ] {
            assert!(screen.contains(expected), "missing {expected:?}");
        }
        assert!(!screen.contains("Watchlist ·"));
        assert!(!screen.contains("All Opportunities"));
        Ok(())
    }

    #[tokio::test]
    async fn star_click_does_not_expand_row() -> Result<()> {
        let mut app = new_app().await?;
        render(&app)?;

        let expanded_before = app.list.toggles().expanded().clone();
        click(&mut app, Hit::Star(2))?;
        assert_eq!(app.list.toggles().expanded(), &expanded_before);
        assert_eq!(app.list.toggles().watchlist(), &BTreeSet::from([2]));
        assert_eq!(displayed_ids(&app), (vec![2], vec![1]));

        let screen = render(&app)?;
        assert!(screen.contains("Watchlist · 1 opportunity"));
        assert!(screen.contains("All Opportunities"));
        Ok(())
    }

    #[tokio::test]
    async fn row_click_expands_and_header_click_sorts() -> Result<()> {
        let mut app = new_app().await?;
        render(&app)?;

        click(&mut app, Hit::Row(2))?;
        assert!(app.list.toggles().is_expanded(2));
        assert!(app.list.toggles().watchlist().is_empty());

        render(&app)?;
        click(&mut app, Hit::Sort(SortColumn::LeveredApy))?;
        assert_eq!(displayed_ids(&app).1, vec![1, 2]);
        render(&app)?;
        click(&mut app, Hit::Sort(SortColumn::LeveredApy))?;
        assert_eq!(displayed_ids(&app).1, vec![2, 1]);

        let screen = render(&app)?;
        assert!(screen.contains("Levered APY ↑"));
        assert!(screen.contains("Unlevered APY ↕"));
        Ok(())
    }

    #[tokio::test]
    async fn keyboard_table_navigation() -> Result<()> {
        let mut app = new_app().await?;
        assert_eq!(app.focus(), Focus::Table);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(displayed_ids(&app).1, vec![2, 1]);

        press(&mut app, KeyCode::Char('w'));
        assert_eq!(displayed_ids(&app), (vec![2], vec![1]));
        assert!(!app.list.toggles().is_expanded(2));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(!app.list.toggles().is_expanded(1));

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
        Ok(())
    }

    #[tokio::test]
    async fn tab_switch_resets_expansion_only() -> Result<()> {
        let mut app = new_app().await?;
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('*'));
        press(&mut app, KeyCode::Char('u'));

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.list.active_tab(), Tab::CarryTrade);
        let screen = render(&app)?;
        assert!(screen.contains("Carry Trade Opportunities"));
        assert!(screen.contains("75.00% spot / 25.00% margin"));
        assert!(screen.contains("Staking Yield"));
        assert!(screen.contains("LB LBTC Lombard"));
        assert!(!screen.contains("Watchlist ·"));

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.list.toggles().expanded(), &BTreeSet::from([1]));
        assert!(app.list.toggles().is_watchlisted(2));
        assert_eq!(app.list.sort().column, SortColumn::UnleveredApy);
        Ok(())
    }

    #[tokio::test]
    async fn numeric_inputs_clamp_on_commit() -> Result<()> {
        let mut app = new_app().await?;

        app.set_focus(Focus::Numeric(NumericKind::FuturesLeverage));
        type_text(&mut app, "9");
        assert_eq!(app.filters.state.field(NumericKind::FuturesLeverage).value(), 9.0);
        press(&mut app, KeyCode::Enter);
        assert!(app.editing().is_none());
        assert_eq!(app.filters.state.field(NumericKind::FuturesLeverage).value(), 5.0);

        app.set_focus(Focus::Numeric(NumericKind::BorrowCost));
        type_text(&mut app, "20");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.filters.state.field(NumericKind::BorrowCost).value(), 0.15);
        assert_eq!(app.focus(), Focus::Numeric(NumericKind::MinTradeApy));

        type_text(&mut app, "12");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filters.state.field(NumericKind::MinTradeApy).value(), 0.12);

        press(&mut app, KeyCode::Left);
        assert!((app.filters.state.field(NumericKind::MinTradeApy).value() - 0.11).abs() < 1e-9);

        app.set_focus(Focus::Numeric(NumericKind::BorrowCapital));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.filters.state.field(NumericKind::BorrowCapital).value(), 5.0);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.filters.state.field(NumericKind::BorrowCapital).value(), 2.0);
        Ok(())
    }

    #[tokio::test]
    async fn leaving_untouched_input_keeps_precise_value() -> Result<()> {
        let mut app = new_app().await?;
        app.set_focus(Focus::Numeric(NumericKind::MinTradeApy));
        type_text(&mut app, "12.5");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filters.state.field(NumericKind::MinTradeApy).value(), 0.125);

        press(&mut app, KeyCode::Enter);
        assert!(app.editing().is_some_and(|e| !e.dirty));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filters.state.field(NumericKind::MinTradeApy).value(), 0.125);

        app.set_focus(Focus::Numeric(NumericKind::FuturesLeverage));
        app.filters.state.field_mut(NumericKind::FuturesLeverage).set_value(2.25);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.filters.state.field(NumericKind::FuturesLeverage).value(), 2.25);
        assert_eq!(app.focus(), Focus::Numeric(NumericKind::BorrowCapital));
        Ok(())
    }

    #[tokio::test]
    async fn tab_leaves_open_dropdowns() -> Result<()> {
        let mut app = new_app().await?;
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "e");
        press(&mut app, KeyCode::Tab);
        assert!(!app.filters.is_open(DropdownKind::Coin));
        assert_eq!(app.filters.coin_search(), "");
        assert_eq!(app.focus(), Focus::Exchanges);
        assert_eq!(app.filters.open_listeners(), 0);

        press(&mut app, KeyCode::Enter);
        assert!(app.filters.is_open(DropdownKind::Exchange));
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert!(!app.filters.is_open(DropdownKind::Exchange));
        assert_eq!(app.focus(), Focus::Coin);
        assert_eq!(app.filters.open_listeners(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn coin_search_selects_from_filtered_list() -> Result<()> {
        let mut app = new_app().await?;
        press(&mut app, KeyCode::Char('/'));
        assert!(app.filters.is_open(DropdownKind::Coin));

        type_text(&mut app, "bt");
        assert_eq!(app.filters.coin_candidates(), vec![Coin::Btc]);
        let screen = render(&app)?;
        assert!(screen.contains("Search: bt"));

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "SO");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filters.state.selected_coin(), Coin::Sol);
        assert!(!app.filters.is_open(DropdownKind::Coin));
        assert_eq!(app.filters.coin_search(), "");
        assert_eq!(app.filters.open_listeners(), 0);

        let screen = render(&app)?;
        assert!(screen.contains("SOL · 1W window"));
        Ok(())
    }

    #[tokio::test]
    async fn exchange_all_toggle_from_keyboard() -> Result<()> {
        let mut app = new_app().await?;
        app.set_focus(Focus::Exchanges);
        press(&mut app, KeyCode::Enter);
        assert!(app.filters.is_open(DropdownKind::Exchange));

        press(&mut app, KeyCode::Enter);
        assert!(app.filters.state.selected_exchanges().is_empty());
        let screen = render(&app)?;
        assert!(screen.contains("None selected"));

        press(&mut app, KeyCode::Enter);
        assert!(app.filters.state.all_exchanges_selected());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.filters.state.is_exchange_selected(ExchangeCode::Hyperliquid));

        press(&mut app, KeyCode::Esc);
        assert!(!app.filters.is_open(DropdownKind::Exchange));
        assert_eq!(app.filters.open_listeners(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn exchange_dropdown_closes_on_outside_click() -> Result<()> {
        let mut app = new_app().await?;
        render(&app)?;

        click(&mut app, Hit::DropdownTrigger(DropdownKind::Exchange))?;
        assert!(app.filters.is_open(DropdownKind::Exchange));
        assert_eq!(app.filters.open_listeners(), 1);

        render(&app)?;
        click(&mut app, Hit::DropdownItem(DropdownItem::Exchange(ExchangeCode::Okx)))?;
        assert!(app.filters.is_open(DropdownKind::Exchange));
        assert!(!app.filters.state.is_exchange_selected(ExchangeCode::Okx));

        render(&app)?;
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 49,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!app.filters.is_open(DropdownKind::Exchange));
        assert_eq!(app.filters.open_listeners(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn chip_remove_and_window_click() -> Result<()> {
        let mut app = new_app().await?;
        render(&app)?;

        click(&mut app, Hit::RemoveChip(ExchangeCode::Hyperliquid))?;
        assert!(!app.filters.state.is_exchange_selected(ExchangeCode::Hyperliquid));
        let screen = render(&app)?;
        assert!(screen.contains("[Bybit ×] [Binance ×] +4"));

        click(&mut app, Hit::Window(crate::filters::EstimationWindow::ThreeMonths))?;
        let screen = render(&app)?;
        assert!(screen.contains("3M window"));
        Ok(())
    }
}
