use crate::core::GameSession;
use crate::domain::model::{AccountId, Bet, BetCategory, SpinReport};
use crate::domain::ports::Ledger;
use crate::utils::error::{Result, RouletteError};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// What the player picked on the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ViewBalance,
    BettingOptions,
    PlaceBet,
    Spin,
    RefreshBalance,
    Exit,
}

impl MenuChoice {
    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            1 => Some(MenuChoice::ViewBalance),
            2 => Some(MenuChoice::BettingOptions),
            3 => Some(MenuChoice::PlaceBet),
            4 => Some(MenuChoice::Spin),
            5 => Some(MenuChoice::RefreshBalance),
            6 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Interactive table menu over any line-based input and output.
///
/// Bad input re-prompts and round errors are printed; neither ends the loop.
/// End of input ends the session like choosing Exit.
pub struct TableMenu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TableMenu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn ask_account_id(&mut self) -> Result<Option<AccountId>> {
        loop {
            let Some(line) = self.prompt("Please enter your Account ID: ")? else {
                return Ok(None);
            };
            match parse_field::<AccountId>(&line) {
                Ok(account_id) => return Ok(Some(account_id)),
                Err(_) => writeln!(self.output, "Invalid Account ID!")?,
            }
        }
    }

    pub async fn run<L: Ledger>(&mut self, session: &mut GameSession<L>) -> Result<()> {
        loop {
            self.show_main_menu()?;
            let Some(line) = self.prompt("Choose an option: ")? else {
                break;
            };

            let choice = match parse_field::<u8>(&line).map(MenuChoice::from_selector) {
                Ok(Some(choice)) => choice,
                Ok(None) => {
                    writeln!(self.output, "Invalid option!")?;
                    continue;
                }
                Err(_) => {
                    writeln!(self.output, "Invalid input!")?;
                    continue;
                }
            };

            let outcome = match choice {
                MenuChoice::ViewBalance | MenuChoice::RefreshBalance => {
                    self.show_balance(session).await
                }
                MenuChoice::BettingOptions => self.show_betting_options(),
                MenuChoice::PlaceBet => self.place_bet(session).await,
                MenuChoice::Spin => self.spin(session).await,
                MenuChoice::Exit => {
                    writeln!(self.output, "Thanks for playing!")?;
                    break;
                }
            };

            if let Err(e) = outcome {
                tracing::debug!("Menu action failed: {} ({:?})", e, e.category());
                writeln!(self.output, "{}", e.user_friendly_message())?;
            }
        }
        Ok(())
    }

    fn show_main_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== MAIN MENU ===")?;
        writeln!(self.output, "1. View balance")?;
        writeln!(self.output, "2. View betting options")?;
        writeln!(self.output, "3. Place bet")?;
        writeln!(self.output, "4. Spin wheel")?;
        writeln!(self.output, "5. Refresh balance from ledger")?;
        writeln!(self.output, "6. Exit")?;
        Ok(())
    }

    pub fn show_betting_options(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== BETTING OPTIONS ===")?;
        for category in BetCategory::ALL {
            writeln!(
                self.output,
                "{}. {} - {}",
                category.selector(),
                category.label(),
                category.odds_label()
            )?;
        }
        Ok(())
    }

    async fn show_balance<L: Ledger>(&mut self, session: &mut GameSession<L>) -> Result<()> {
        let balance = session.refresh_balance().await?;
        writeln!(self.output, "Current balance: ${}", balance)?;
        Ok(())
    }

    async fn place_bet<L: Ledger>(&mut self, session: &mut GameSession<L>) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== PLACE BET ===")?;

        let Some(line) = self.prompt("Enter bet amount: ")? else {
            return Ok(());
        };
        let stake = match parse_field::<Decimal>(&line) {
            Ok(stake) if stake > Decimal::ZERO => stake,
            _ => {
                writeln!(self.output, "Invalid amount!")?;
                return Ok(());
            }
        };

        self.show_betting_options()?;
        let Some(line) = self.prompt("Enter bet type: ")? else {
            return Ok(());
        };
        let Some(category) = parse_field::<u8>(&line)
            .ok()
            .and_then(BetCategory::from_selector)
        else {
            writeln!(self.output, "Invalid bet type!")?;
            return Ok(());
        };

        let bet = if category.requires_number() {
            let Some(line) = self.prompt("Enter number (0-36): ")? else {
                return Ok(());
            };
            match parse_field::<i64>(&line).and_then(|n| Bet::straight_up(n, stake)) {
                Ok(bet) => bet,
                Err(_) => {
                    writeln!(self.output, "Invalid number!")?;
                    return Ok(());
                }
            }
        } else {
            Bet::new(category, stake, None)?
        };

        let receipt = session.place_bet(bet).await?;
        writeln!(self.output, "Bet placed: {}", receipt.bet)?;
        Ok(())
    }

    async fn spin<L: Ledger>(&mut self, session: &mut GameSession<L>) -> Result<()> {
        let settlement = match session.spin().await? {
            SpinReport::NoBets => {
                writeln!(self.output, "No bets placed!")?;
                return Ok(());
            }
            SpinReport::Settled(settlement) => settlement,
        };

        writeln!(self.output)?;
        writeln!(self.output, "=== SPINNING THE WHEEL ===")?;
        writeln!(self.output, "The ball lands on: {}", settlement.result)?;
        writeln!(self.output, "Color: {}", settlement.color)?;
        for winner in &settlement.winners {
            writeln!(
                self.output,
                "WIN! {} bet pays ${}",
                winner.bet.category(),
                winner.payout
            )?;
        }
        writeln!(self.output, "Total winnings: ${}", settlement.total_payout)?;
        writeln!(self.output, "New balance: ${}", settlement.balance)?;
        Ok(())
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn parse_field<T: FromStr>(input: &str) -> Result<T> {
    input.parse::<T>().map_err(|_| RouletteError::InvalidInput {
        input: input.to_string(),
        reason: format!("expected a {}", std::any::type_name::<T>()),
    })
}
