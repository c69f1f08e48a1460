use crate::utils::error::{Result, RouletteError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type AccountId = u32;

/// Highest number on a single-zero wheel.
pub const MAX_NUMBER: u8 = 36;

/// A pocket on the wheel, always within 0..=36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WheelNumber(u8);

impl WheelNumber {
    pub const ZERO: WheelNumber = WheelNumber(0);

    /// Every pocket in ascending order.
    pub const POCKETS: [WheelNumber; MAX_NUMBER as usize + 1] = pockets();

    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_NUMBER {
            return Err(RouletteError::InvalidNumber {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn all() -> impl Iterator<Item = WheelNumber> {
        Self::POCKETS.into_iter()
    }
}

const fn pockets() -> [WheelNumber; MAX_NUMBER as usize + 1] {
    let mut out = [WheelNumber(0); MAX_NUMBER as usize + 1];
    let mut i = 0;
    while i < out.len() {
        out[i] = WheelNumber(i as u8);
        i += 1;
    }
    out
}

impl TryFrom<u8> for WheelNumber {
    type Error = RouletteError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i64> for WheelNumber {
    type Error = RouletteError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_NUMBER)
            .map(WheelNumber)
            .ok_or(RouletteError::InvalidNumber { value })
    }
}

impl From<WheelNumber> for u8 {
    fn from(number: WheelNumber) -> Self {
        number.0
    }
}

impl fmt::Display for WheelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dozen {
    First,
    Second,
    Third,
}

impl Dozen {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Dozen::First),
            2 => Some(Dozen::Second),
            3 => Some(Dozen::Third),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    First,
    Second,
    Third,
}

impl Column {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Column::First),
            2 => Some(Column::Second),
            3 => Some(Column::Third),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
    Green,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Color::Red => "RED",
            Color::Black => "BLACK",
            Color::Green => "GREEN",
        };
        f.write_str(label)
    }
}

/// The closed set of wagers offered at the table, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetCategory {
    SingleNumber,
    Red,
    Black,
    Green,
    Even,
    Odd,
    FirstHalf,
    SecondHalf,
    FirstDozen,
    SecondDozen,
    ThirdDozen,
    FirstColumn,
    SecondColumn,
    ThirdColumn,
    Tiers,
    Orphelins,
    Voisins,
    ZeroNeighbors,
}

impl BetCategory {
    pub const ALL: [BetCategory; 18] = [
        BetCategory::SingleNumber,
        BetCategory::Red,
        BetCategory::Black,
        BetCategory::Green,
        BetCategory::Even,
        BetCategory::Odd,
        BetCategory::FirstHalf,
        BetCategory::SecondHalf,
        BetCategory::FirstDozen,
        BetCategory::SecondDozen,
        BetCategory::ThirdDozen,
        BetCategory::FirstColumn,
        BetCategory::SecondColumn,
        BetCategory::ThirdColumn,
        BetCategory::Tiers,
        BetCategory::Orphelins,
        BetCategory::Voisins,
        BetCategory::ZeroNeighbors,
    ];

    /// Maps the 1-based menu selector onto a category.
    pub fn from_selector(selector: u8) -> Option<Self> {
        let index = usize::from(selector).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn selector(self) -> u8 {
        // ALL has 18 entries, the position always fits.
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as u8 + 1
    }

    pub fn requires_number(self) -> bool {
        self == BetCategory::SingleNumber
    }

    /// Factor applied to the stake on a win. The payout replaces the stake.
    pub fn payout_multiplier(self) -> Decimal {
        match self {
            BetCategory::SingleNumber | BetCategory::Green => Decimal::from(36),
            BetCategory::Red
            | BetCategory::Black
            | BetCategory::Even
            | BetCategory::Odd
            | BetCategory::FirstHalf
            | BetCategory::SecondHalf => Decimal::from(2),
            BetCategory::FirstDozen
            | BetCategory::SecondDozen
            | BetCategory::ThirdDozen
            | BetCategory::FirstColumn
            | BetCategory::SecondColumn
            | BetCategory::ThirdColumn => Decimal::from(3),
            BetCategory::Tiers
            | BetCategory::Orphelins
            | BetCategory::Voisins
            | BetCategory::ZeroNeighbors => Decimal::from(36) / Decimal::from(5),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BetCategory::SingleNumber => "Single number (0-36)",
            BetCategory::Red => "Red",
            BetCategory::Black => "Black",
            BetCategory::Green => "Green (0)",
            BetCategory::Even => "Even",
            BetCategory::Odd => "Odd",
            BetCategory::FirstHalf => "First half (1-18)",
            BetCategory::SecondHalf => "Second half (19-36)",
            BetCategory::FirstDozen => "First dozen (1-12)",
            BetCategory::SecondDozen => "Second dozen (13-24)",
            BetCategory::ThirdDozen => "Third dozen (25-36)",
            BetCategory::FirstColumn => "First column",
            BetCategory::SecondColumn => "Second column",
            BetCategory::ThirdColumn => "Third column",
            BetCategory::Tiers => "Tiers du cylindre",
            BetCategory::Orphelins => "Orphelins",
            BetCategory::Voisins => "Voisins du zero",
            BetCategory::ZeroNeighbors => "Zero neighbors",
        }
    }

    pub fn odds_label(self) -> &'static str {
        match self {
            BetCategory::SingleNumber | BetCategory::Green => "36:1",
            BetCategory::Red
            | BetCategory::Black
            | BetCategory::Even
            | BetCategory::Odd
            | BetCategory::FirstHalf
            | BetCategory::SecondHalf => "2:1",
            BetCategory::FirstDozen
            | BetCategory::SecondDozen
            | BetCategory::ThirdDozen
            | BetCategory::FirstColumn
            | BetCategory::SecondColumn
            | BetCategory::ThirdColumn => "3:1",
            BetCategory::Tiers
            | BetCategory::Orphelins
            | BetCategory::Voisins
            | BetCategory::ZeroNeighbors => "~7:1",
        }
    }
}

impl fmt::Display for BetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An immutable wager. Only straight-up bets carry a target number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    category: BetCategory,
    target: Option<WheelNumber>,
    stake: Decimal,
    payout_multiplier: Decimal,
}

impl Bet {
    pub fn new(category: BetCategory, stake: Decimal, target: Option<WheelNumber>) -> Result<Self> {
        if stake <= Decimal::ZERO {
            return Err(RouletteError::InvalidBet {
                reason: format!("stake must be positive, got {}", stake),
            });
        }

        match (category.requires_number(), target) {
            (true, None) => {
                return Err(RouletteError::InvalidBet {
                    reason: "a single number bet needs a target number".to_string(),
                })
            }
            (false, Some(number)) => {
                return Err(RouletteError::InvalidBet {
                    reason: format!("{} bets do not take a number (got {})", category, number),
                })
            }
            _ => {}
        }

        let bet = Self {
            category,
            target,
            stake,
            payout_multiplier: category.payout_multiplier(),
        };
        bet.winning_payout()?;
        Ok(bet)
    }

    /// Straight-up bet from a raw number, rejecting anything outside 0..=36.
    pub fn straight_up(number: i64, stake: Decimal) -> Result<Self> {
        let target = WheelNumber::try_from(number).map_err(|_| RouletteError::InvalidBet {
            reason: format!("target number {} is outside 0-36", number),
        })?;
        Self::new(BetCategory::SingleNumber, stake, Some(target))
    }

    pub fn category(&self) -> BetCategory {
        self.category
    }

    pub fn target(&self) -> Option<WheelNumber> {
        self.target
    }

    pub fn stake(&self) -> Decimal {
        self.stake
    }

    pub fn payout_multiplier(&self) -> Decimal {
        self.payout_multiplier
    }

    /// Amount returned when this bet wins.
    pub fn winning_payout(&self) -> Result<Decimal> {
        self.stake
            .checked_mul(self.payout_multiplier)
            .ok_or_else(|| RouletteError::AmountOverflow {
                operation: format!("payout of {} at {}x", self.stake, self.payout_multiplier),
            })
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(number) => write!(f, "{} {} - ${}", self.category, number, self.stake),
            None => write!(f, "{} - ${}", self.category, self.stake),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "BET")]
    Bet,
    #[serde(rename = "WIN")]
    Win,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Bet => "BET",
            TransactionKind::Win => "WIN",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit line attached to a ledger posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub kind: TransactionKind,
    pub description: String,
}

impl LedgerEntry {
    pub fn bet(category: BetCategory) -> Self {
        Self {
            kind: TransactionKind::Bet,
            description: format!("Placed {} bet", category),
        }
    }

    pub fn win() -> Self {
        Self {
            kind: TransactionKind::Win,
            description: "Roulette winnings from spin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub account_id: AccountId,
    /// Negative for bets, positive for wins.
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetReceipt {
    pub bet: Bet,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningBet {
    pub bet: Bet,
    pub payout: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub result: WheelNumber,
    pub color: Color,
    pub winners: Vec<WinningBet>,
    pub bets_resolved: usize,
    pub total_payout: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinReport {
    /// Nothing was pending; no number was drawn.
    NoBets,
    Settled(Settlement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    #[default]
    File,
    Memory,
}
