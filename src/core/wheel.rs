//! Single-zero wheel layout and the classification queries bets are settled against.

use crate::domain::model::{Color, Column, Dozen, WheelNumber};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RouletteError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];
pub const BLACK_NUMBERS: [u8; 18] = [2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35];

/// Racetrack groupings. Order follows the wheel, membership is what matters.
pub const TIERS_NUMBERS: [u8; 12] = [27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33];
pub const ORPHELINS_NUMBERS: [u8; 8] = [17, 34, 6, 1, 20, 14, 31, 9];
pub const VOISINS_NUMBERS: [u8; 17] = [22, 18, 29, 7, 28, 12, 35, 3, 26, 0, 32, 15, 19, 4, 21, 2, 25];

pub fn is_red(n: WheelNumber) -> bool {
    RED_NUMBERS.contains(&n.value())
}

pub fn is_black(n: WheelNumber) -> bool {
    BLACK_NUMBERS.contains(&n.value())
}

pub fn is_green(n: WheelNumber) -> bool {
    n.is_zero()
}

pub fn color_of(n: WheelNumber) -> Color {
    if is_red(n) {
        Color::Red
    } else if is_black(n) {
        Color::Black
    } else {
        Color::Green
    }
}

// Zero has no parity.
pub fn is_even(n: WheelNumber) -> bool {
    !n.is_zero() && n.value() % 2 == 0
}

pub fn is_odd(n: WheelNumber) -> bool {
    !n.is_zero() && n.value() % 2 == 1
}

pub fn is_first_half(n: WheelNumber) -> bool {
    (1..=18).contains(&n.value())
}

pub fn is_second_half(n: WheelNumber) -> bool {
    (19..=36).contains(&n.value())
}

pub fn is_in_dozen(n: WheelNumber, dozen: Dozen) -> bool {
    let range = match dozen {
        Dozen::First => 1..=12,
        Dozen::Second => 13..=24,
        Dozen::Third => 25..=36,
    };
    range.contains(&n.value())
}

pub fn is_in_column(n: WheelNumber, column: Column) -> bool {
    if n.is_zero() {
        return false;
    }
    let remainder = match column {
        Column::First => 1,
        Column::Second => 2,
        Column::Third => 0,
    };
    n.value() % 3 == remainder
}

pub fn is_tiers(n: WheelNumber) -> bool {
    TIERS_NUMBERS.contains(&n.value())
}

pub fn is_orphelins(n: WheelNumber) -> bool {
    ORPHELINS_NUMBERS.contains(&n.value())
}

pub fn is_voisins(n: WheelNumber) -> bool {
    VOISINS_NUMBERS.contains(&n.value())
}

/// Where spin results come from.
pub trait SpinSource: Send {
    fn next_number(&mut self) -> WheelNumber;
}

/// Uniform draws over the 37 pockets from any `rand` generator.
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> SpinSource for RngSource<R> {
    fn next_number(&mut self) -> WheelNumber {
        let pockets = &WheelNumber::POCKETS;
        pockets[self.rng.gen_range(0..pockets.len())]
    }
}

/// Replays a fixed sequence of results, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct FixedSpins {
    results: Vec<WheelNumber>,
    cursor: usize,
}

impl FixedSpins {
    pub fn new(results: Vec<WheelNumber>) -> Result<Self> {
        if results.is_empty() {
            return Err(RouletteError::InvalidInput {
                input: "[]".to_string(),
                reason: "replay sequence cannot be empty".to_string(),
            });
        }
        Ok(Self { results, cursor: 0 })
    }

    pub fn from_values(values: &[u8]) -> Result<Self> {
        let results = values
            .iter()
            .map(|v| WheelNumber::new(*v))
            .collect::<Result<Vec<_>>>()?;
        Self::new(results)
    }
}

impl SpinSource for FixedSpins {
    fn next_number(&mut self) -> WheelNumber {
        let number = self.results[self.cursor];
        self.cursor = (self.cursor + 1) % self.results.len();
        number
    }
}

pub struct Wheel {
    source: Box<dyn SpinSource>,
}

impl Wheel {
    pub fn new(source: impl SpinSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(RngSource::new(StdRng::from_entropy()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RngSource::new(StdRng::seed_from_u64(seed)))
    }

    pub fn replay(values: &[u8]) -> Result<Self> {
        Ok(Self::new(FixedSpins::from_values(values)?))
    }

    /// Replay takes precedence, then a fixed seed, then OS entropy.
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let replay = config.replay_spins();
        if !replay.is_empty() {
            tracing::info!("Wheel replaying {} fixed result(s)", replay.len());
            return Self::replay(replay);
        }
        Ok(match config.wheel_seed() {
            Some(seed) => {
                tracing::info!("Wheel seeded with {}", seed);
                Self::seeded(seed)
            }
            None => Self::from_entropy(),
        })
    }

    pub fn spin(&mut self) -> WheelNumber {
        let number = self.source.next_number();
        tracing::debug!("Ball landed on {} ({})", number, color_of(number));
        number
    }
}
