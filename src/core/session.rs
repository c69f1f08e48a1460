use crate::core::evaluator;
use crate::core::wheel::{self, Wheel};
use crate::domain::model::{
    AccountId, Bet, BetReceipt, LedgerEntry, Settlement, SpinReport, WheelNumber, WinningBet,
};
use crate::domain::ports::Ledger;
use crate::utils::error::{Result, RouletteError};
use rust_decimal::Decimal;

/// One player at one table.
///
/// Every balance change goes through [`Ledger::apply`], so the cached balance
/// and pending bets only move after the ledger has accepted the posting.
pub struct GameSession<L: Ledger> {
    account_id: AccountId,
    ledger: L,
    wheel: Wheel,
    balance: Decimal,
    pending: Vec<Bet>,
    /// Result drawn for the pending bets whose payout has not been committed yet.
    unsettled: Option<WheelNumber>,
}

impl<L: Ledger> GameSession<L> {
    pub async fn open(account_id: AccountId, ledger: L, wheel: Wheel) -> Result<Self> {
        let balance = ledger.get_balance(account_id).await?;
        tracing::info!("Opened session for account {} with balance {}", account_id, balance);
        Ok(Self {
            account_id,
            ledger,
            wheel,
            balance,
            pending: Vec::new(),
            unsettled: None,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Balance as of the last ledger read or write.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn pending_bets(&self) -> &[Bet] {
        &self.pending
    }

    pub fn unsettled_result(&self) -> Option<WheelNumber> {
        self.unsettled
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub async fn refresh_balance(&mut self) -> Result<Decimal> {
        self.balance = self.ledger.get_balance(self.account_id).await?;
        tracing::debug!("Refreshed balance for account {}: {}", self.account_id, self.balance);
        Ok(self.balance)
    }

    pub async fn place_bet(&mut self, bet: Bet) -> Result<BetReceipt> {
        if let Some(result) = self.unsettled {
            return Err(RouletteError::InvalidBet {
                reason: format!("the previous spin ({}) has not been settled yet", result),
            });
        }

        let balance = self.refresh_balance().await?;
        if bet.stake() > balance {
            tracing::info!(
                "Rejected {} bet: stake {} exceeds balance {}",
                bet.category(),
                bet.stake(),
                balance
            );
            return Err(RouletteError::InsufficientFunds {
                stake: bet.stake(),
                balance,
            });
        }

        // Every pending bet could still win together; that total and the
        // balance it lands on must stay within the decimal range.
        let mut exposure = Vec::with_capacity(self.pending.len() + 1);
        for pending in self.pending.iter().chain(std::iter::once(&bet)) {
            exposure.push(pending.winning_payout()?);
        }
        let worst_case = evaluator::total_payout(&exposure)?;
        if (balance - bet.stake()).checked_add(worst_case).is_none() {
            return Err(RouletteError::AmountOverflow {
                operation: format!("balance after a {} payout", worst_case),
            });
        }

        let new_balance = self
            .ledger
            .apply(self.account_id, -bet.stake(), Some(LedgerEntry::bet(bet.category())))
            .await
            .map_err(|e| self.commit_failure("bet", e))?;

        self.balance = new_balance;
        self.pending.push(bet.clone());
        tracing::info!("Bet placed: {} (balance {})", bet, new_balance);

        Ok(BetReceipt {
            bet,
            balance: new_balance,
        })
    }

    pub async fn spin(&mut self) -> Result<SpinReport> {
        if self.pending.is_empty() {
            tracing::debug!("Spin requested with no pending bets");
            return Ok(SpinReport::NoBets);
        }

        let result = match self.unsettled.take() {
            Some(result) => {
                tracing::info!("Retrying settlement of earlier spin {}", result);
                result
            }
            None => self.wheel.spin(),
        };

        let (winners, total_payout) = match self.settle(result) {
            Ok(settled) => settled,
            Err(e) => {
                self.unsettled = Some(result);
                tracing::warn!("Could not total payouts for spin {}: {}", result, e);
                return Err(e);
            }
        };

        let entry = (total_payout > Decimal::ZERO).then(LedgerEntry::win);
        let balance = match self.ledger.apply(self.account_id, total_payout, entry).await {
            Ok(balance) => balance,
            Err(e) => {
                self.unsettled = Some(result);
                return Err(self.commit_failure("payout", e));
            }
        };

        let bets_resolved = self.pending.len();
        self.pending.clear();
        self.balance = balance;

        tracing::info!(
            "Spin {} settled {} bet(s), {} winner(s), payout {}",
            result,
            bets_resolved,
            winners.len(),
            total_payout
        );

        Ok(SpinReport::Settled(Settlement {
            result,
            color: wheel::color_of(result),
            winners,
            bets_resolved,
            total_payout,
            balance,
        }))
    }

    fn settle(&self, result: WheelNumber) -> Result<(Vec<WinningBet>, Decimal)> {
        let mut winners = Vec::new();
        for bet in self.pending.iter().filter(|bet| evaluator::is_winning(bet, result)) {
            winners.push(WinningBet {
                bet: bet.clone(),
                payout: bet.winning_payout()?,
            });
        }
        let total = evaluator::total_payout(winners.iter().map(|w| &w.payout))?;
        Ok((winners, total))
    }

    fn commit_failure(&self, what: &str, error: RouletteError) -> RouletteError {
        tracing::warn!(
            "Ledger rejected {} for account {}: {}",
            what,
            self.account_id,
            error
        );
        match error {
            RouletteError::InsufficientFunds { .. }
            | RouletteError::LedgerWrite { .. }
            | RouletteError::AmountOverflow { .. } => error,
            other => RouletteError::LedgerWrite {
                account_id: self.account_id,
                message: other.to_string(),
            },
        }
    }
}
