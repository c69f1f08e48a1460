use crate::domain::model::{AccountId, LedgerBackend, MAX_NUMBER};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RouletteError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LEDGER_PATH: &str = "./ledger.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub table: TableSection,
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub wheel: WheelSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSection {
    pub account_id: Option<AccountId>,
    /// Balance given to the account when the ledger has no record of it.
    pub opening_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSection {
    #[serde(default)]
    pub backend: LedgerBackend,
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> String {
    DEFAULT_LEDGER_PATH.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WheelSection {
    pub seed: Option<u64>,
    pub replay: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub json: Option<bool>,
}

impl TableConfig {
    /// Loads the table configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RouletteError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RouletteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RouletteError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_required_field("table.account_id", &self.table.account_id)?;

        if let Some(opening_balance) = self.table.opening_balance {
            validation::validate_non_negative_amount("table.opening_balance", opening_balance)?;
        }

        if self.ledger.backend == LedgerBackend::File {
            validation::validate_path("ledger.path", &self.ledger.path)?;
        }

        if let Some(replay) = &self.wheel.replay {
            if replay.is_empty() {
                return Err(RouletteError::InvalidConfigValueError {
                    field: "wheel.replay".to_string(),
                    value: "[]".to_string(),
                    reason: "Replay sequence cannot be empty".to_string(),
                });
            }
            for value in replay {
                validation::validate_range("wheel.replay", *value, 0, MAX_NUMBER)?;
            }
            if self.wheel.seed.is_some() {
                return Err(RouletteError::ConfigValidationError {
                    field: "wheel".to_string(),
                    message: "Set either a seed or a replay sequence, not both".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TableConfig {
    fn account_id(&self) -> Option<AccountId> {
        self.table.account_id
    }

    fn ledger_backend(&self) -> LedgerBackend {
        self.ledger.backend
    }

    fn ledger_path(&self) -> &str {
        &self.ledger.path
    }

    fn opening_balance(&self) -> Option<Decimal> {
        self.table.opening_balance
    }

    fn wheel_seed(&self) -> Option<u64> {
        self.wheel.seed
    }

    fn replay_spins(&self) -> &[u8] {
        self.wheel.replay.as_deref().unwrap_or(&[])
    }

    fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl Validate for TableConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
