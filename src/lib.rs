pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TableConfig;

pub use adapters::ledger::{FileLedger, LedgerBook, MemoryLedger};
pub use app::TableMenu;
pub use self::core::{evaluator, session::GameSession, wheel::Wheel};
pub use domain::model::{Bet, BetCategory, SpinReport, WheelNumber};
pub use domain::ports::{ConfigProvider, Ledger};
pub use utils::error::{Result, RouletteError};
