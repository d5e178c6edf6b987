use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{focus_style, ACCENT, MUTED, NEGATIVE, POSITIVE};
use crate::app::{App, Focus, Hit};
use crate::catalog::assets::{exchange_display_name, exchange_icon, token_icon};
use crate::catalog::types::{FundingSide, Opportunity, OpportunityKind, PerpLeg, PerpPosition};
use crate::format;
use crate::view::sort::{SortColumn, SortDirection, SortState};
use crate::view::{DisplayedRow, Section};

const STAR_WIDTH: u16 = 4;
const ROW_BG: Color = Color::Rgb(0x22, 0x24, 0x30);
const EXPANDED_BG: Color = Color::Rgb(0x32, 0x34, 0x44);

/// Pads or truncates to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn sort_marker(sort: SortState, column: SortColumn) -> &'static str {
    if sort.column != column {
        return "↕";
    }
    match sort.direction {
        SortDirection::Desc => "↓",
        SortDirection::Asc => "↑",
    }
}

struct BodyLine {
    line: Line<'static>,
    row: Option<u32>,
}

pub fn draw_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tab = app.list.active_tab();
    let catalog = app.active_catalog();
    let view = app.list.view(catalog);
    let focused = app.focus() == Focus::Table;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(format!("{} Opportunities", tab.label()));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 || inner.width <= STAR_WIDTH {
        return;
    }

    let col = ((inner.width - STAR_WIDTH) / 4) as usize;
    let filters = &app.filters.state;

    let info = Line::from(vec![
        Span::styled("● ", Style::default().fg(ACCENT)),
        Span::styled(catalog.len().to_string(), Style::default().fg(Color::White)),
        Span::styled(" opportunities · ", Style::default().fg(MUTED)),
        Span::styled(filters.selected_coin().to_string(), Style::default().fg(ACCENT)),
        Span::styled(
            format!(
                " · {} window · fetched {}s ago",
                filters.estimation_window().label(),
                app.catalog.seconds_since_load(Utc::now())
            ),
            Style::default().fg(MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(info), Rect::new(inner.x, inner.y, inner.width, 1));

    let sort = app.list.sort();
    let header_y = inner.y + 1;
    let header = Line::from(vec![
        Span::raw(fit("", STAR_WIDTH as usize)),
        Span::styled(fit("Long", col), Style::default().fg(MUTED)),
        Span::styled(fit("Short", col), Style::default().fg(MUTED)),
        Span::styled(
            fit(&format!("Unlevered APY {}", sort_marker(sort, SortColumn::UnleveredApy)), col),
            focus_style(sort.column == SortColumn::UnleveredApy),
        ),
        Span::styled(
            fit(&format!("Levered APY {}", sort_marker(sort, SortColumn::LeveredApy)), col),
            focus_style(sort.column == SortColumn::LeveredApy),
        ),
    ]);
    f.render_widget(Paragraph::new(header), Rect::new(inner.x, header_y, inner.width, 1));
    {
        let mut hits = app.hits.borrow_mut();
        let unlevered_x = inner.x + STAR_WIDTH + 2 * col as u16;
        hits.push(Rect::new(unlevered_x, header_y, col as u16, 1), Hit::Sort(SortColumn::UnleveredApy));
        hits.push(Rect::new(unlevered_x + col as u16, header_y, col as u16, 1), Hit::Sort(SortColumn::LeveredApy));
    }

    let body_area = Rect::new(inner.x, inner.y + 2, inner.width, inner.height - 2);
    let cursor_id = view.id_at(app.list.cursor());
    let mut body = Vec::new();
    let mut cursor_line = 0;
    let mut section = None;

    for row in view.rows() {
        if section != Some(row.section) {
            section = Some(row.section);
            match row.section {
                Section::Watchlist => body.push(BodyLine {
                    line: Line::from(vec![
                        Span::styled("★ ", Style::default().fg(ACCENT)),
                        Span::styled("Watchlist", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!(" · {} {}", view.watchlisted.len(), format::count_noun(view.watchlisted.len())),
                            Style::default().fg(MUTED),
                        ),
                    ]),
                    row: None,
                }),
                Section::Regular if view.has_watchlist_section() => body.push(BodyLine {
                    line: Line::from(Span::styled(
                        "All Opportunities",
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    row: None,
                }),
                Section::Regular => {}
            }
        }

        let is_cursor = focused && cursor_id == Some(row.opportunity.id);
        if is_cursor {
            cursor_line = body.len();
        }
        body.push(BodyLine {
            line: main_line(&row, col, is_cursor),
            row: Some(row.opportunity.id),
        });
        if row.expanded {
            body.extend(detail_lines(row.opportunity).into_iter().map(|line| BodyLine { line, row: None }));
        }
    }

    let height = body_area.height as usize;
    let offset = if cursor_line >= height { cursor_line + 1 - height } else { 0 };
    let visible: Vec<&BodyLine> = body.iter().skip(offset).take(height).collect();

    let mut hits = app.hits.borrow_mut();
    for (idx, body_line) in visible.iter().enumerate() {
        if let Some(id) = body_line.row {
            let y = body_area.y + idx as u16;
            hits.push(Rect::new(body_area.x, y, body_area.width, 1), Hit::Row(id));
            hits.push(Rect::new(body_area.x, y, STAR_WIDTH, 1), Hit::Star(id));
        }
    }
    let lines: Vec<Line> = visible.into_iter().map(|b| b.line.clone()).collect();
    f.render_widget(Paragraph::new(lines), body_area);
}

fn perp_cell(leg: &PerpLeg) -> String {
    format!(
        "{} {} {}",
        exchange_icon(&leg.exchange).glyph,
        leg.pair,
        exchange_display_name(&leg.exchange)
    )
}

fn main_line(row: &DisplayedRow<'_>, col: usize, is_cursor: bool) -> Line<'static> {
    let opp = row.opportunity;
    let bg = if is_cursor {
        Color::Rgb(0x2a, 0x35, 0x48)
    } else if row.expanded {
        EXPANDED_BG
    } else {
        ROW_BG
    };
    let base = Style::default().bg(bg).fg(Color::White);

    let long = match &opp.kind {
        OpportunityKind::PerpPerp(d) => perp_cell(&d.long),
        OpportunityKind::CarryTrade(d) => {
            format!("{} {} {}", token_icon(&d.long.asset).glyph, d.long.asset, d.long.platform)
        }
    };
    let short = perp_cell(opp.short_leg());

    let headline = format::apy_headline(opp.levered_apy);
    let bar_width = col.saturating_sub(headline.len() + 2).min(10) as u16;
    let fraction = format::apy_bar_percent(opp.levered_apy) / 100.0;

    let star = if row.starred { " ★  " } else { " ☆  " };
    Line::from(vec![
        Span::styled(star, base.fg(if row.starred { ACCENT } else { MUTED })),
        Span::styled(fit(&long, col), base),
        Span::styled(fit(&short, col), base),
        Span::styled(fit(&format::apy(opp.unlevered_apy), col), base),
        Span::styled(format::bar(fraction, bar_width), base.fg(ACCENT)),
        Span::styled(fit(&format!(" {}", headline), col.saturating_sub(bar_width as usize)), base),
    ])
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<14}", text), Style::default().fg(MUTED))
}

fn value(text: String) -> Span<'static> {
    Span::styled(format!("{:<16}", text), Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

fn funding(position: &PerpPosition) -> Span<'static> {
    let color = match position.funding_side {
        FundingSide::Collect => POSITIVE,
        FundingSide::Pay => NEGATIVE,
    };
    Span::styled(
        format!("{:<16}", format!("{} {}", format::apy(position.funding), position.funding_side.label())),
        Style::default().fg(color),
    )
}

/// One row of the two side-by-side position cards.
fn card_row(left: Vec<Span<'static>>, right: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![Span::raw("      ")];
    if left.is_empty() {
        spans.push(Span::raw(" ".repeat(30)));
    } else {
        spans.extend(left);
    }
    spans.push(Span::raw("    "));
    spans.extend(right);
    Line::from(spans)
}

fn position_rows(position: &PerpPosition, size_label: &str) -> Vec<Vec<Span<'static>>> {
    vec![
        vec![label(size_label), value(format::millions(position.collateral))],
        vec![label("Notional"), value(format::millions(position.notional))],
        vec![label("Leverage"), value(format::leverage(position.leverage))],
        vec![label("Funding"), funding(position)],
    ]
}

fn side_header(long: bool, name: String) -> Vec<Span<'static>> {
    let (arrow, text, color) = if long {
        ("▲", "Long ", POSITIVE)
    } else {
        ("▼", "Short", NEGATIVE)
    };
    vec![
        Span::styled(format!("{} {} ", arrow, text), Style::default().fg(color)),
        Span::styled(format!("{:<22}", name), Style::default().fg(Color::White)),
    ]
}

pub fn detail_lines(opp: &Opportunity) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "    ┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄",
        Style::default().fg(MUTED),
    ))];

    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled("Wallet ", Style::default().fg(MUTED)),
        Span::styled("USDC collateral ", Style::default().fg(MUTED)),
        Span::styled(format::millions(opp.wallet), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("  →  ", Style::default().fg(MUTED)),
        Span::styled("Arkis Borrow ", Style::default().fg(MUTED)),
        Span::styled(format!("{} ", format::borrow_terms(opp.arkis_borrow, opp.borrow_rate)), Style::default().fg(MUTED)),
        Span::styled(format::added_millions(opp.arkis_borrow), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("  →  ", Style::default().fg(MUTED)),
        Span::styled("Capital Pool ", Style::default().fg(MUTED)),
        Span::styled(format!("{} ", opp.capital_split_label()), Style::default().fg(MUTED)),
        Span::styled(format::millions(opp.capital_pool()), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ]));

    let borrow_cost = vec![
        Span::styled("Borrow Cost ", Style::default().fg(MUTED)),
        Span::styled(format!("{}   ", format::yearly_cost(opp.borrow_cost_yearly)), Style::default().fg(Color::Rgb(0xff, 0x60, 0x60))),
    ];
    let levered = vec![
        Span::styled("Levered APY ", Style::default().fg(MUTED)),
        Span::styled(format::apy(opp.footer_levered_apy()), Style::default().fg(POSITIVE)),
    ];

    match &opp.kind {
        OpportunityKind::PerpPerp(d) => {
            lines.push(card_row(
                side_header(true, perp_cell(&d.long)),
                side_header(false, perp_cell(&d.short)),
            ));
            for (left, right) in position_rows(&d.long_position, "Collateral")
                .into_iter()
                .zip(position_rows(&d.short_position, "Collateral"))
            {
                lines.push(card_row(left, right));
            }

            let mut footer = vec![
                Span::raw("    "),
                Span::styled("Net Funding Spread ", Style::default().fg(MUTED)),
                Span::styled(format!("{}   ", format::apy(d.net_funding_spread)), Style::default().fg(Color::White)),
            ];
            footer.extend(borrow_cost);
            footer.extend(levered);
            lines.push(Line::from(footer));
        }
        OpportunityKind::CarryTrade(d) => {
            let icon = token_icon(&d.long.asset);
            lines.push(card_row(
                side_header(true, format!("{} {} {}", icon.glyph, d.long.asset, d.long.platform)),
                side_header(false, perp_cell(&d.short)),
            ));
            let spot = vec![
                vec![label("Allocation"), value(format::millions(d.allocation))],
                vec![
                    label("Staking APY"),
                    Span::styled(format!("{:<16}", format::apy(d.staking_apy)), Style::default().fg(POSITIVE)),
                ],
            ];
            let perp = position_rows(&d.short_position, "Margin");
            for (idx, right) in perp.into_iter().enumerate() {
                let left = spot.get(idx).cloned().unwrap_or_default();
                lines.push(card_row(left, right));
            }

            let mut footer = vec![
                Span::raw("    "),
                Span::styled("Staking Yield ", Style::default().fg(MUTED)),
                Span::styled(format!("{}   ", format::apy(d.staking_yield)), Style::default().fg(POSITIVE)),
                Span::styled("Funding Collected ", Style::default().fg(MUTED)),
                Span::styled(format!("{}   ", format::apy(d.funding_collected)), Style::default().fg(POSITIVE)),
            ];
            footer.extend(borrow_cost);
            footer.extend(levered);
            lines.push(Line::from(footer));
        }
    }

    lines
}
