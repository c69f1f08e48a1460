use crate::config::toml_config::TableConfig;
use crate::domain::model::{AccountId, LedgerBackend};
use crate::utils::error::Result;
use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "roulette")]
#[command(about = "Single-player European roulette table backed by an account ledger")]
pub struct CliConfig {
    /// Path to a TOML table configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Account to play against (prompted for when omitted)
    #[arg(short, long)]
    pub account_id: Option<AccountId>,

    /// Path of the JSON ledger file
    #[arg(long)]
    pub ledger: Option<String>,

    /// Keep the ledger in memory only
    #[arg(long)]
    pub memory_ledger: bool,

    /// Open the account with this balance if the ledger has no record of it
    #[arg(long)]
    pub opening_balance: Option<Decimal>,

    /// Seed the wheel for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,

    /// Replay a fixed sequence of results instead of spinning randomly
    #[arg(long, value_delimiter = ',')]
    pub replay: Vec<u8>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the TOML file when given, then lets command line flags override it.
    pub fn resolve(&self) -> Result<TableConfig> {
        let mut config = match &self.config {
            Some(path) => TableConfig::from_file(path)?,
            None => TableConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TableConfig) {
        if let Some(account_id) = self.account_id {
            config.table.account_id = Some(account_id);
        }
        if let Some(opening_balance) = self.opening_balance {
            config.table.opening_balance = Some(opening_balance);
        }
        if let Some(path) = &self.ledger {
            config.ledger.path = path.clone();
            config.ledger.backend = LedgerBackend::File;
        }
        if self.memory_ledger {
            config.ledger.backend = LedgerBackend::Memory;
        }
        if let Some(seed) = self.seed {
            config.wheel.seed = Some(seed);
            config.wheel.replay = None;
        }
        if !self.replay.is_empty() {
            config.wheel.replay = Some(self.replay.clone());
            config.wheel.seed = None;
        }
        if self.json_logs {
            config.logging.json = Some(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "roulette",
            "--account-id",
            "12",
            "--opening-balance",
            "99.5",
            "--replay",
            "17,0,32",
            "--memory-ledger",
        ]);

        let config = cli.resolve().unwrap();

        assert_eq!(config.account_id(), Some(12));
        assert_eq!(config.opening_balance(), Some(Decimal::new(995, 1)));
        assert_eq!(config.replay_spins(), &[17, 0, 32]);
        assert_eq!(config.ledger_backend(), LedgerBackend::Memory);
    }

    #[test]
    fn test_flags_override_file_settings() {
        let mut config =
            TableConfig::from_toml_str("[table]\naccount_id = 1\n[wheel]\nreplay = [5]\n").unwrap();
        let cli = CliConfig {
            account_id: Some(2),
            seed: Some(99),
            ledger: Some("./other.json".to_string()),
            ..Default::default()
        };

        cli.apply_overrides(&mut config);

        assert_eq!(config.account_id(), Some(2));
        assert_eq!(config.wheel_seed(), Some(99));
        assert!(config.replay_spins().is_empty());
        assert_eq!(config.ledger_path(), "./other.json");
    }
}
