use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::types::Tab;
use crate::error::DashboardError;
use crate::filters::ExchangeCode;

pub const CONFIG_ENV_VAR: &str = "FRA_DASHBOARD_CONFIG";

/// Where the active configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    EnvVar(PathBuf),
    UserFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::EnvVar(path) => write!(f, "{} (${})", path.display(), CONFIG_ENV_VAR),
            ConfigOrigin::UserFile(path) => write!(f, "{}", path.display()),
            ConfigOrigin::Defaults => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub tab: Tab,
    pub coin: String,
    pub exchanges: Vec<String>,
    pub estimation_window: String,
    pub futures_leverage: f64,
    pub borrow_capital: f64,
    pub borrow_cost: f64,
    pub min_trade_apy: f64,
    /// Rows shown expanded whenever a tab becomes active.
    pub expanded_on_open: Vec<u32>,
    pub catalog_path: Option<PathBuf>,
    pub log_dir: PathBuf,
    pub tick_rate_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tab: Tab::PerpPerp,
            coin: "BTC".to_string(),
            exchanges: ExchangeCode::ALL.iter().map(|e| e.code().to_string()).collect(),
            estimation_window: "1W".to_string(),
            futures_leverage: 2.0,
            borrow_capital: 3.0,
            borrow_cost: 0.05,
            min_trade_apy: 0.1,
            expanded_on_open: vec![1],
            catalog_path: None,
            log_dir: PathBuf::from("logs"),
            tick_rate_ms: 250,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, DashboardError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        if config.tick_rate_ms == 0 {
            return Err(DashboardError::Config("tick_rate_ms must be positive".to_string()));
        }
        Ok(config)
    }

    /// `$FRA_DASHBOARD_CONFIG`, then the per-user config file, then defaults.
    ///
    /// Runs before logging is installed, so the origin is returned for the caller to log.
    pub fn load() -> Result<(Self, ConfigOrigin), DashboardError> {
        Self::resolve(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from), Self::default_path())
    }

    fn resolve(
        env_path: Option<PathBuf>,
        user_path: Option<PathBuf>,
    ) -> Result<(Self, ConfigOrigin), DashboardError> {
        if let Some(path) = env_path {
            let config = Self::from_file(&path)?;
            return Ok((config, ConfigOrigin::EnvVar(path)));
        }

        match user_path {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                Ok((config, ConfigOrigin::UserFile(path)))
            }
            _ => Ok((Self::default(), ConfigOrigin::Defaults)),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fra-dashboard").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterState;

    #[test]
    fn partial_file_keeps_defaults() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("fra-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "tab": "carry-trade", "coin": "eth", "futures_leverage": 9 }"#)?;
        let config = DashboardConfig::from_file(&path);
        fs::remove_file(&path)?;

        let config = config?;
        assert_eq!(config.tab, Tab::CarryTrade);
        assert_eq!(config.estimation_window, "1W");
        assert_eq!(config.expanded_on_open, vec![1]);

        let filters = FilterState::from_config(&config)?;
        assert_eq!(filters.selected_coin().symbol(), "ETH");
        assert_eq!(
            filters.field(crate::filters::numeric::NumericKind::FuturesLeverage).value(),
            5.0
        );
        Ok(())
    }

    #[test]
    fn unknown_exchange_in_config_is_rejected() {
        let config = DashboardConfig {
            exchanges: vec!["KRAKEN".to_string()],
            ..DashboardConfig::default()
        };
        assert!(matches!(
            FilterState::from_config(&config),
            Err(DashboardError::UnknownExchange(_))
        ));
    }

    #[test]
    fn env_path_wins_over_user_file() -> anyhow::Result<()> {
        let env_path = std::env::temp_dir().join(format!("fra-config-env-{}.json", std::process::id()));
        fs::write(&env_path, r#"{ "coin": "SOL" }"#)?;
        let user_path = std::env::temp_dir().join("fra-config-missing-user.json");

        let resolved = DashboardConfig::resolve(Some(env_path.clone()), Some(user_path.clone()));
        fs::remove_file(&env_path)?;
        let (config, origin) = resolved?;
        assert_eq!(config.coin, "SOL");
        assert_eq!(origin, ConfigOrigin::EnvVar(env_path));

        let (config, origin) = DashboardConfig::resolve(None, Some(user_path))?;
        assert_eq!(config.coin, "BTC");
        assert_eq!(origin, ConfigOrigin::Defaults);
        assert_eq!(origin.to_string(), "built-in defaults");
        Ok(())
    }

    #[test]
    fn malformed_file_is_config_error() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("fra-config-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json")?;
        let result = DashboardConfig::from_file(&path);
        fs::remove_file(&path)?;
        assert!(matches!(result, Err(DashboardError::Config(_))));
        Ok(())
    }
}
