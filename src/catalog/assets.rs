use crate::filters::{Coin, ExchangeCode};

pub const FALLBACK_TOKEN_ICON: &str = "/icons/tokens/default.png";
pub const FALLBACK_EXCHANGE_ICON: &str = "/icons/exchanges/default.png";

/// Asset reference for a coin, token or venue. The terminal draws `glyph`;
/// `path` is the conventional image location for the same asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub glyph: String,
    pub path: String,
}

impl Icon {
    fn fallback(glyph: String, path: &str) -> Self {
        Self {
            glyph,
            path: path.to_string(),
        }
    }
}

/// Icon for an exchange code as it appears in opportunity data.
/// Unknown codes get the fallback image instead of a dangling reference.
pub fn exchange_icon(code: &str) -> Icon {
    match code.parse::<ExchangeCode>() {
        Ok(exchange) => Icon {
            glyph: exchange.badge().to_string(),
            path: exchange.icon_path().to_string(),
        },
        Err(_) => Icon::fallback(initials(code), FALLBACK_EXCHANGE_ICON),
    }
}

pub fn coin_icon(symbol: &str) -> Icon {
    match symbol.parse::<Coin>() {
        Ok(coin) => Icon {
            glyph: coin.glyph().to_string(),
            path: coin.icon_path().to_string(),
        },
        Err(_) => Icon::fallback(initials(symbol), FALLBACK_TOKEN_ICON),
    }
}

/// Spot assets are addressed by name: lowercased with whitespace removed.
pub fn token_icon(asset: &str) -> Icon {
    let slug: String = asset
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if slug.is_empty() {
        return Icon::fallback(initials(asset), FALLBACK_TOKEN_ICON);
    }
    Icon {
        glyph: initials(asset),
        path: format!("/icons/tokens/{}.png", slug),
    }
}

fn initials(name: &str) -> String {
    let badge: String = name.chars().filter(|c| c.is_alphanumeric()).take(2).collect();
    if badge.is_empty() {
        "??".to_string()
    } else {
        badge.to_uppercase()
    }
}

pub fn exchange_display_name(code: &str) -> String {
    match code.parse::<ExchangeCode>() {
        Ok(exchange) => exchange.display_name().to_string(),
        Err(_) => {
            let mut chars = code.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        }
    }
}
