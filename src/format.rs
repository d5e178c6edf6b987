//! Display formatting for table cells and detail cards.

/// Levered APY that fills the whole bar.
pub const APY_BAR_SCALE: f64 = 20.0;

pub fn apy(value: f64) -> String {
    format!("{:.2}%", value)
}

/// The large levered figure in the table row.
pub fn apy_headline(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Amounts held in millions, e.g. `$1.00M`.
pub fn millions(value: f64) -> String {
    format!("${:.2}M", value)
}

pub fn added_millions(value: f64) -> String {
    format!("+${:.2}M", value)
}

/// Yearly cost held in thousands, shown as a deduction.
pub fn yearly_cost(thousands: u32) -> String {
    format!("-${}K/yr", thousands)
}

pub fn borrow_terms(multiple: f64, rate: f64) -> String {
    format!("{:.0}x @ {:.2}% APR", multiple, rate)
}

pub fn leverage(multiple: u32) -> String {
    format!("{}x", multiple)
}

/// Percentage of the APY bar to fill, capped at 100.
pub fn apy_bar_percent(levered_apy: f64) -> f64 {
    (levered_apy / APY_BAR_SCALE * 100.0).clamp(0.0, 100.0)
}

/// Number of filled cells out of `width` for a fill fraction in [0, 1].
pub fn filled_cells(fraction: f64, width: u16) -> u16 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * f64::from(width)).round() as u16
}

pub fn bar(fraction: f64, width: u16) -> String {
    let filled = filled_cells(fraction, width);
    let mut out = "█".repeat(filled as usize);
    out.push_str(&"░".repeat((width - filled) as usize));
    out
}

/// Slider track with a knob at the current position.
pub fn slider(fraction: f64, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    let knob = filled_cells(fraction, width - 1) as usize;
    (0..width as usize)
        .map(|i| match i.cmp(&knob) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        })
        .collect()
}

pub fn count_noun(count: usize) -> &'static str {
    if count == 1 {
        "opportunity"
    } else {
        "opportunities"
    }
}
