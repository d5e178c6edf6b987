use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How the numeric text twin of a slider presents the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextScale {
    /// Shown and typed as stored, e.g. a leverage multiplier.
    Raw,
    /// Stored as a fraction, shown and typed in percent.
    Percent,
}

impl TextScale {
    fn to_stored(self, typed: f64) -> f64 {
        match self {
            TextScale::Raw => typed,
            TextScale::Percent => typed / 100.0,
        }
    }

    fn to_display(self, stored: f64) -> f64 {
        match self {
            TextScale::Raw => stored,
            TextScale::Percent => stored * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    FuturesLeverage,
    BorrowCapital,
    BorrowCost,
    MinTradeApy,
}

impl NumericKind {
    pub const ALL: [NumericKind; 4] = [
        NumericKind::FuturesLeverage,
        NumericKind::BorrowCapital,
        NumericKind::BorrowCost,
        NumericKind::MinTradeApy,
    ];

    pub fn bounds(&self) -> Bounds {
        match self {
            NumericKind::FuturesLeverage => Bounds { min: 1.0, max: 5.0 },
            NumericKind::BorrowCapital => Bounds { min: 0.0, max: 5.0 },
            NumericKind::BorrowCost => Bounds { min: 0.05, max: 0.15 },
            NumericKind::MinTradeApy => Bounds { min: 0.07, max: 0.30 },
        }
    }

    pub fn slider_step(&self) -> f64 {
        match self {
            NumericKind::FuturesLeverage | NumericKind::BorrowCapital => 0.1,
            NumericKind::BorrowCost | NumericKind::MinTradeApy => 0.01,
        }
    }

    pub fn text_scale(&self) -> TextScale {
        match self {
            NumericKind::FuturesLeverage | NumericKind::BorrowCapital => TextScale::Raw,
            NumericKind::BorrowCost | NumericKind::MinTradeApy => TextScale::Percent,
        }
    }

    fn text_decimals(&self) -> usize {
        match self {
            NumericKind::MinTradeApy => 0,
            _ => 1,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self.text_scale() {
            TextScale::Raw => "x",
            TextScale::Percent => "%",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumericKind::FuturesLeverage => "Futures Leverage",
            NumericKind::BorrowCapital => "Arkis Borrow Capital",
            NumericKind::BorrowCost => "Borrow Cost (APY)",
            NumericKind::MinTradeApy => "Min Trade APY",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            NumericKind::FuturesLeverage => "Multiplier applied to your futures positions",
            NumericKind::BorrowCapital => "Capital borrowed from Arkis as a multiple of your wallet",
            NumericKind::BorrowCost => "Annual cost of the borrowed capital",
            NumericKind::MinTradeApy => "Minimum acceptable annual return for trades",
        }
    }

    /// Shortcut buttons next to the slider, as (label, value).
    pub fn presets(&self) -> &'static [(&'static str, f64)] {
        match self {
            NumericKind::FuturesLeverage | NumericKind::BorrowCapital => {
                &[("x2", 2.0), ("x3", 3.0), ("Max x5", 5.0)]
            }
            NumericKind::BorrowCost | NumericKind::MinTradeApy => &[],
        }
    }
}

/// One slider with its numeric text twin.
///
/// The slider path cannot leave the bounds. Typing may store any finite value
/// until the input is committed, at which point it is clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericField {
    kind: NumericKind,
    value: f64,
}

impl NumericField {
    pub fn new(kind: NumericKind, initial: f64) -> Self {
        let mut field = Self {
            kind,
            value: kind.bounds().min,
        };
        field.commit_value(initial);
        field
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Live update while typing. Non-finite input is dropped and the previous value kept.
    pub fn set_value(&mut self, raw: f64) -> bool {
        if !raw.is_finite() {
            return false;
        }
        self.value = raw;
        true
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        match parse_number(text) {
            Some(typed) => self.set_value(self.kind.text_scale().to_stored(typed)),
            None => false,
        }
    }

    /// Applied when the text twin loses focus. Unparseable or low values reset to
    /// the minimum, high values to the maximum.
    pub fn commit_value(&mut self, raw: f64) -> f64 {
        let bounds = self.kind.bounds();
        let committed = if raw.is_nan() || raw < bounds.min {
            bounds.min
        } else if raw > bounds.max {
            bounds.max
        } else {
            raw
        };
        if committed != raw && !raw.is_nan() {
            info!("{} input {} clamped to {}", self.kind.label(), raw, committed);
        }
        self.value = committed;
        committed
    }

    pub fn commit_text(&mut self, text: &str) -> f64 {
        let raw = parse_number(text)
            .map(|typed| self.kind.text_scale().to_stored(typed))
            .unwrap_or(f64::NAN);
        self.commit_value(raw)
    }

    /// Moves the slider by whole steps, snapped to the step grid and clamped.
    pub fn nudge(&mut self, steps: i32) {
        let step = self.kind.slider_step();
        let moved = ((self.value + step * f64::from(steps)) / step).round() * step;
        self.value = self.kind.bounds().clamp(moved);
    }

    /// Slider drag or click at a fraction of the track.
    pub fn set_from_ratio(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            return;
        }
        let bounds = self.kind.bounds();
        let step = self.kind.slider_step();
        let raw = bounds.min + ratio.clamp(0.0, 1.0) * (bounds.max - bounds.min);
        self.value = bounds.clamp((raw / step).round() * step);
    }

    pub fn apply_preset(&mut self, value: f64) {
        self.commit_value(value);
    }

    /// Fill fraction of the slider track in [0, 1].
    pub fn slider_ratio(&self) -> f64 {
        let bounds = self.kind.bounds();
        ((self.value - bounds.min) / (bounds.max - bounds.min)).clamp(0.0, 1.0)
    }

    pub fn text_value(&self) -> String {
        format!(
            "{:.*}",
            self.kind.text_decimals(),
            self.kind.text_scale().to_display(self.value)
        )
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
