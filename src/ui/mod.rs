pub mod filters;
pub mod table;

use chrono::{Datelike, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus, Hit};
use crate::catalog::types::Tab;

pub const ACCENT: Color = Color::Rgb(0x61, 0x9e, 0xe1);
pub const MUTED: Color = Color::Rgb(0x6a, 0x72, 0x82);
pub const POSITIVE: Color = Color::Rgb(0x3e, 0xe0, 0xad);
pub const NEGATIVE: Color = Color::Rgb(0xd5, 0x70, 0x70);

pub fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn draw(f: &mut Frame<'_>, app: &App) {
    app.hits.borrow_mut().clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(3),  // Title and tabs
            Constraint::Length(filters::PANEL_HEIGHT),
            Constraint::Min(6),     // Opportunities
            Constraint::Length(1),  // Footer
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_tabs(f, app, chunks[1]);
    table::draw_table(f, app, chunks[3]);
    draw_footer(f, chunks[4]);
    // Drawn after the table so dropdown overlays land on top of it.
    filters::draw_filters(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame<'_>, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled("ARKIS", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("    "),
        Span::styled(" FRA Dashboard ", Style::default().fg(Color::Black).bg(Color::White)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_tabs(f: &mut Frame<'_>, app: &App, area: Rect) {
    let active = app.list.active_tab();
    let focused = app.focus() == Focus::Tabs;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title("Arkis Alpha");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut x = inner.x;
    let mut hits = app.hits.borrow_mut();
    for tab in Tab::ALL {
        let label = format!(" {} ", tab.label());
        let width = Span::raw(label.as_str()).width() as u16;
        let style = if tab == active {
            Style::default().fg(Color::White).bg(Color::Rgb(0x22, 0x24, 0x30)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        let rect = Rect::new(x, inner.y, width.min(inner.right().saturating_sub(x)), inner.height.min(1));
        f.render_widget(Paragraph::new(Span::styled(label, style)), rect);
        hits.push(rect, Hit::Tab(tab));
        x = x.saturating_add(width + 1);
    }
}

fn draw_footer(f: &mut Frame<'_>, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    f.render_widget(Paragraph::new(Span::styled("ARKIS", Style::default().fg(MUTED))), halves[0]);
    let copyright = format!("© {} Arkis. All rights reserved.", Utc::now().year());
    f.render_widget(
        Paragraph::new(Span::styled(copyright, Style::default().fg(MUTED))).alignment(Alignment::Right),
        halves[1],
    );
}
