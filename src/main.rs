use anyhow::Context;
use clap::Parser;
use roulette_table::domain::model::LedgerBackend;
use roulette_table::utils::error::{ErrorSeverity, RouletteError};
use roulette_table::utils::{logger, validation::Validate};
use roulette_table::{
    CliConfig, ConfigProvider, FileLedger, GameSession, Ledger, MemoryLedger, TableConfig,
    TableMenu, Wheel,
};
use std::io::{BufRead, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    if cli.verbose {
        tracing::debug!("Table config: {:?}", config);
    }

    println!("=== ROULETTE GAME ===");
    println!("Welcome to the roulette table!");

    let stdin = std::io::stdin();
    let mut menu = TableMenu::new(stdin.lock(), std::io::stdout());

    if config.account_id().is_none() {
        match menu.ask_account_id().context("failed to read account id")? {
            Some(account_id) => config.table.account_id = Some(account_id),
            None => return Ok(()),
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let wheel = Wheel::from_config(&config).context("failed to set up the wheel")?;

    let result = match config.ledger_backend() {
        LedgerBackend::File => {
            tracing::info!("Using ledger file {}", config.ledger_path());
            play(&mut menu, &config, FileLedger::new(config.ledger_path()), wheel).await
        }
        LedgerBackend::Memory => {
            if config.opening_balance().is_none() {
                tracing::warn!("In-memory ledger without an opening balance; the account starts empty");
            }
            play(&mut menu, &config, MemoryLedger::new(), wheel).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Session ended with an error: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn play<L, R, W>(
    menu: &mut TableMenu<R, W>,
    config: &TableConfig,
    ledger: L,
    wheel: Wheel,
) -> Result<(), RouletteError>
where
    L: Ledger,
    R: BufRead,
    W: Write,
{
    let account_id = config
        .account_id()
        .ok_or_else(|| RouletteError::MissingConfigError {
            field: "table.account_id".to_string(),
        })?;

    if let Some(opening_balance) = config.opening_balance() {
        ledger.open_account(account_id, opening_balance).await?;
    }

    let mut session = GameSession::open(account_id, ledger, wheel).await?;
    menu.run(&mut session).await
}
