use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{focus_style, ACCENT, MUTED};
use crate::app::{App, DropdownItem, Focus, Hit, HitMap};
use crate::catalog::assets::coin_icon;
use crate::filters::dropdown::DropdownKind;
use crate::filters::numeric::NumericKind;
use crate::filters::{EstimationWindow, ExchangeCode};
use crate::format;

pub const PANEL_HEIGHT: u16 = 8;

const COIN_WIDTH: u16 = 16;
const WINDOW_WIDTH: u16 = 30;

pub fn draw_filters(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Position Settings", Style::default().add_modifier(Modifier::BOLD)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Coin, exchanges, window
            Constraint::Length(1), // Heading
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let selectors = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(COIN_WIDTH),
            Constraint::Min(20),
            Constraint::Length(WINDOW_WIDTH),
        ])
        .split(rows[0]);

    {
        let mut hits = app.hits.borrow_mut();
        draw_coin_trigger(f, app, selectors[0], &mut hits);
        draw_exchange_trigger(f, app, selectors[1], &mut hits);
        draw_windows(f, app, selectors[2], &mut hits);

        f.render_widget(
            Paragraph::new(Span::styled("Position Sizing", Style::default().add_modifier(Modifier::BOLD))),
            rows[1],
        );
        for (kind, row) in NumericKind::ALL.into_iter().zip(rows[2..].iter()) {
            draw_numeric(f, app, kind, *row, &mut hits);
        }
    }

    if app.filters.is_open(DropdownKind::Coin) {
        draw_coin_dropdown(f, app, selectors[0]);
    }
    if app.filters.is_open(DropdownKind::Exchange) {
        draw_exchange_dropdown(f, app, selectors[1]);
    }
}

fn draw_coin_trigger(f: &mut Frame<'_>, app: &App, area: Rect, hits: &mut HitMap) {
    let coin = app.filters.state.selected_coin();
    let focused = app.focus() == Focus::Coin;
    let line = Line::from(vec![
        Span::styled("Coin: ", Style::default().fg(MUTED)),
        Span::styled(format!("{} {} ▾", coin_icon(coin.symbol()).glyph, coin), focus_style(focused).add_modifier(Modifier::BOLD)),
    ]);
    f.render_widget(Paragraph::new(line), area);
    hits.push(area, Hit::DropdownTrigger(DropdownKind::Coin));
}

fn draw_exchange_trigger(f: &mut Frame<'_>, app: &App, area: Rect, hits: &mut HitMap) {
    let state = &app.filters.state;
    let focused = app.focus() == Focus::Exchanges;
    hits.push(area, Hit::DropdownTrigger(DropdownKind::Exchange));

    let mut spans = vec![Span::styled("Exchange: ", Style::default().fg(MUTED))];
    let mut x = area.x + spans[0].width() as u16;
    let (chips, hidden) = state.exchange_chips();
    if chips.is_empty() {
        spans.push(Span::styled("None selected", Style::default().fg(MUTED)));
    }
    for exchange in chips {
        let chip = Span::styled(format!("[{} ", exchange.display_name()), focus_style(focused));
        x += chip.width() as u16;
        spans.push(chip);
        let remove = Span::styled("×", Style::default().fg(Color::White));
        if x < area.right() {
            hits.push(Rect::new(x, area.y, 1, 1), Hit::RemoveChip(*exchange));
        }
        spans.push(remove);
        spans.push(Span::styled("] ", focus_style(focused)));
        x += 3;
    }
    if hidden > 0 {
        spans.push(Span::styled(format!("+{} ", hidden), Style::default().fg(ACCENT)));
    }
    spans.push(Span::styled("▾", Style::default().fg(MUTED)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_windows(f: &mut Frame<'_>, app: &App, area: Rect, hits: &mut HitMap) {
    let current = app.filters.state.estimation_window();
    let focused = app.focus() == Focus::Window;
    let mut spans = Vec::new();
    let mut x = area.x;
    for window in EstimationWindow::ALL {
        let label = format!(" {} ", window.label());
        let style = if window == current {
            Style::default().fg(Color::White).bg(if focused { ACCENT } else { Color::Rgb(0x22, 0x24, 0x30) })
        } else {
            Style::default().fg(MUTED)
        };
        let width = label.len() as u16;
        if x + width <= area.right() {
            hits.push(Rect::new(x, area.y, width, 1), Hit::Window(window));
        }
        x += width;
        spans.push(Span::styled(label, style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_numeric(f: &mut Frame<'_>, app: &App, kind: NumericKind, area: Rect, hits: &mut HitMap) {
    let field = app.filters.state.field(kind);
    let focused = app.focus() == Focus::Numeric(kind);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Label
            Constraint::Length(20), // Presets
            Constraint::Min(10),    // Slider
            Constraint::Length(12), // Text twin
        ])
        .split(area);

    f.render_widget(Paragraph::new(Span::styled(kind.label(), focus_style(focused))), cols[0]);

    let mut spans = Vec::new();
    let mut x = cols[1].x;
    for (label, value) in kind.presets() {
        let text = format!("[{}]", label);
        let width = text.len() as u16;
        if x + width <= cols[1].right() {
            hits.push(Rect::new(x, cols[1].y, width, 1), Hit::Preset(kind, *value));
        }
        x += width + 1;
        spans.push(Span::styled(text, Style::default().fg(ACCENT)));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), cols[1]);

    let track_width = cols[2].width.saturating_sub(1);
    let track = Rect::new(cols[2].x, cols[2].y, track_width, 1);
    f.render_widget(
        Paragraph::new(Span::styled(format::slider(field.slider_ratio(), track_width), focus_style(focused))),
        track,
    );
    hits.push(track, Hit::Slider(kind));

    let (text, style) = match app.editing() {
        Some(input) if input.kind == kind => (
            format!("{}▏", input.buffer),
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        _ => (field.text_value(), Style::default().fg(Color::White)),
    };
    let twin = Line::from(vec![
        Span::styled(format!("{:>7}", text), style),
        Span::styled(format!(" {}", kind.unit()), Style::default().fg(MUTED)),
    ]);
    f.render_widget(Paragraph::new(twin), cols[3]);
    hits.push(cols[3], Hit::TextInput(kind));
}

fn overlay_area(frame: Rect, anchor: Rect, width: u16, height: u16) -> Rect {
    let y = anchor.bottom();
    let height = height.min(frame.bottom().saturating_sub(y));
    let width = width.min(frame.right().saturating_sub(anchor.x));
    Rect::new(anchor.x, y, width, height)
}

fn item_style(selected: bool, highlighted: bool) -> Style {
    let base = if selected {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::White)
    };
    if highlighted {
        base.bg(Color::Rgb(0x32, 0x34, 0x44))
    } else {
        base
    }
}

fn draw_coin_dropdown(f: &mut Frame<'_>, app: &App, anchor: Rect) {
    let candidates = app.filters.coin_candidates();
    let height = candidates.len().max(1) as u16 + 3;
    let area = overlay_area(f.area(), anchor, 22, height);
    app.filters.dropdown(DropdownKind::Coin).set_bounds(anchor.union(area));

    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let mut lines = vec![Line::from(vec![
        Span::styled("Search: ", Style::default().fg(MUTED)),
        Span::raw(app.filters.coin_search().to_string()),
        Span::styled("▏", Style::default().fg(ACCENT)),
    ])];
    if candidates.is_empty() {
        lines.push(Line::from(Span::styled("No coins found", Style::default().fg(MUTED))));
    }
    let selected = app.filters.state.selected_coin();
    let mut hits = app.hits.borrow_mut();
    for (idx, coin) in candidates.iter().enumerate() {
        let row = inner.y + 1 + idx as u16;
        if row < inner.bottom() {
            hits.push(Rect::new(inner.x, row, inner.width, 1), Hit::DropdownItem(DropdownItem::Coin(*coin)));
        }
        lines.push(Line::from(Span::styled(
            format!("{} {}", coin_icon(coin.symbol()).glyph, coin),
            item_style(*coin == selected, idx == app.dropdown_cursor()),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_exchange_dropdown(f: &mut Frame<'_>, app: &App, anchor: Rect) {
    let state = &app.filters.state;
    let height = ExchangeCode::ALL.len() as u16 + 3;
    let area = overlay_area(f.area(), anchor, 24, height);
    app.filters.dropdown(DropdownKind::Exchange).set_bounds(anchor.union(area));

    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let check = |on: bool| if on { "[x]" } else { "[ ]" };
    let mut lines = Vec::new();
    let mut hits = app.hits.borrow_mut();

    let all = state.all_exchanges_selected();
    lines.push(Line::from(Span::styled(
        format!("{} All", check(all)),
        item_style(all, app.dropdown_cursor() == 0),
    )));
    hits.push(Rect::new(inner.x, inner.y, inner.width, inner.height.min(1)), Hit::DropdownItem(DropdownItem::AllExchanges));

    for (idx, exchange) in ExchangeCode::ALL.iter().enumerate() {
        let on = state.is_exchange_selected(*exchange);
        let row = inner.y + 1 + idx as u16;
        if row < inner.bottom() {
            hits.push(Rect::new(inner.x, row, inner.width, 1), Hit::DropdownItem(DropdownItem::Exchange(*exchange)));
        }
        lines.push(Line::from(Span::styled(
            format!("{} {} {}", check(on), exchange.badge(), exchange.display_name()),
            item_style(on, app.dropdown_cursor() == idx + 1),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
