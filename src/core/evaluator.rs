use crate::core::wheel;
use crate::domain::model::{Bet, BetCategory, Column, Dozen, WheelNumber};
use crate::utils::error::{Result, RouletteError};
use rust_decimal::Decimal;

/// Decides whether `bet` wins against `result`. Total over every category and pocket.
pub fn is_winning(bet: &Bet, result: WheelNumber) -> bool {
    match bet.category() {
        BetCategory::SingleNumber => bet.target() == Some(result),
        BetCategory::Red => wheel::is_red(result),
        BetCategory::Black => wheel::is_black(result),
        BetCategory::Green => wheel::is_green(result),
        BetCategory::Even => wheel::is_even(result),
        BetCategory::Odd => wheel::is_odd(result),
        BetCategory::FirstHalf => wheel::is_first_half(result),
        BetCategory::SecondHalf => wheel::is_second_half(result),
        BetCategory::FirstDozen => wheel::is_in_dozen(result, Dozen::First),
        BetCategory::SecondDozen => wheel::is_in_dozen(result, Dozen::Second),
        BetCategory::ThirdDozen => wheel::is_in_dozen(result, Dozen::Third),
        BetCategory::FirstColumn => wheel::is_in_column(result, Column::First),
        BetCategory::SecondColumn => wheel::is_in_column(result, Column::Second),
        BetCategory::ThirdColumn => wheel::is_in_column(result, Column::Third),
        BetCategory::Tiers => wheel::is_tiers(result),
        BetCategory::Orphelins => wheel::is_orphelins(result),
        BetCategory::Voisins => wheel::is_voisins(result),
        // Zero is already a Voisins pocket, so this matches Voisins exactly.
        BetCategory::ZeroNeighbors => result.is_zero() || wheel::is_voisins(result),
    }
}

/// Amount paid for `bet` on `result`; zero when it loses.
pub fn payout(bet: &Bet, result: WheelNumber) -> Result<Decimal> {
    if is_winning(bet, result) {
        bet.winning_payout()
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Sum of every payout, failing once it leaves the decimal range.
pub fn total_payout<'a>(payouts: impl IntoIterator<Item = &'a Decimal>) -> Result<Decimal> {
    payouts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, payout| {
            total.checked_add(*payout).ok_or_else(|| RouletteError::AmountOverflow {
                operation: "total payout".to_string(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: u8) -> WheelNumber {
        WheelNumber::new(value).unwrap()
    }

    fn outside(category: BetCategory, stake: i64) -> Bet {
        Bet::new(category, Decimal::from(stake), None).unwrap()
    }

    #[test]
    fn test_single_number() {
        let bet = Bet::straight_up(17, Decimal::from(10)).unwrap();
        assert!(is_winning(&bet, n(17)));
        assert!(!is_winning(&bet, n(18)));

        let zero = Bet::straight_up(0, Decimal::from(1)).unwrap();
        assert!(is_winning(&zero, WheelNumber::ZERO));
    }

    #[test]
    fn test_red_pays_double() {
        let bet = outside(BetCategory::Red, 10);
        assert!(is_winning(&bet, n(1)));
        assert_eq!(payout(&bet, n(1)).unwrap(), Decimal::from(20));
        assert_eq!(payout(&bet, n(2)).unwrap(), Decimal::ZERO);
        assert_eq!(payout(&bet, WheelNumber::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_first_dozen_boundary() {
        let bet = outside(BetCategory::FirstDozen, 5);
        assert!(is_winning(&bet, n(12)));
        assert!(!is_winning(&bet, n(13)));
        assert_eq!(payout(&bet, n(1)).unwrap(), Decimal::from(15));
    }

    #[test]
    fn test_zero_loses_every_even_money_bet() {
        for category in [
            BetCategory::Red,
            BetCategory::Black,
            BetCategory::Even,
            BetCategory::Odd,
            BetCategory::FirstHalf,
            BetCategory::SecondHalf,
        ] {
            assert!(!is_winning(&outside(category, 1), WheelNumber::ZERO), "{}", category);
        }
        assert!(is_winning(&outside(BetCategory::Green, 1), WheelNumber::ZERO));
    }

    #[test]
    fn test_zero_neighbors_matches_voisins() {
        let zero_neighbors = outside(BetCategory::ZeroNeighbors, 5);
        let voisins = outside(BetCategory::Voisins, 5);
        for result in WheelNumber::all() {
            assert_eq!(
                is_winning(&zero_neighbors, result),
                is_winning(&voisins, result),
                "pocket {}",
                result
            );
        }
    }

    #[test]
    fn test_racetrack_payout() {
        let tiers = outside(BetCategory::Tiers, 10);
        assert_eq!(payout(&tiers, n(27)).unwrap(), Decimal::from(72));
        assert_eq!(payout(&tiers, n(17)).unwrap(), Decimal::ZERO);

        let orphelins = outside(BetCategory::Orphelins, 10);
        assert!(is_winning(&orphelins, n(17)));
        assert!(!is_winning(&orphelins, WheelNumber::ZERO));
    }

    /// Winning rule for each category written out independently of `is_winning`.
    fn expected_win(category: BetCategory, target: WheelNumber, result: WheelNumber) -> bool {
        let v = result.value();
        let dozen = |k: u8| v != 0 && (v - 1) / 12 + 1 == k;
        let column = |k: u8| v != 0 && (v - 1) % 3 + 1 == k;
        match category {
            BetCategory::SingleNumber => target == result,
            BetCategory::Red => wheel::is_red(result),
            BetCategory::Black => wheel::is_black(result),
            BetCategory::Green => v == 0,
            BetCategory::Even => v != 0 && v % 2 == 0,
            BetCategory::Odd => v % 2 == 1,
            BetCategory::FirstHalf => (1..=18).contains(&v),
            BetCategory::SecondHalf => (19..=36).contains(&v),
            BetCategory::FirstDozen => dozen(1),
            BetCategory::SecondDozen => dozen(2),
            BetCategory::ThirdDozen => dozen(3),
            BetCategory::FirstColumn => column(1),
            BetCategory::SecondColumn => column(2),
            BetCategory::ThirdColumn => column(3),
            BetCategory::Tiers => wheel::is_tiers(result),
            BetCategory::Orphelins => wheel::is_orphelins(result),
            BetCategory::Voisins | BetCategory::ZeroNeighbors => wheel::is_voisins(result),
        }
    }

    #[test]
    fn test_every_category_against_every_pocket() {
        let target = n(17);
        for category in BetCategory::ALL {
            let bet = if category.requires_number() {
                Bet::straight_up(target.value().into(), Decimal::from(1)).unwrap()
            } else {
                outside(category, 1)
            };
            for result in WheelNumber::all() {
                assert_eq!(
                    is_winning(&bet, result),
                    expected_win(category, target, result),
                    "{} on pocket {}",
                    category,
                    result
                );
            }
        }
    }

    #[test]
    fn test_dozen_and_column_boundaries() {
        let cases = [
            (BetCategory::SecondDozen, 13, 24, 12, 25),
            (BetCategory::ThirdDozen, 25, 36, 24, 0),
            (BetCategory::FirstColumn, 1, 34, 2, 0),
            (BetCategory::SecondColumn, 2, 35, 3, 34),
            (BetCategory::ThirdColumn, 3, 36, 1, 35),
        ];
        for (category, low, high, miss, other_miss) in cases {
            let bet = outside(category, 2);
            assert!(is_winning(&bet, n(low)), "{} {}", category, low);
            assert!(is_winning(&bet, n(high)), "{} {}", category, high);
            assert!(!is_winning(&bet, n(miss)), "{} {}", category, miss);
            assert!(!is_winning(&bet, n(other_miss)), "{} {}", category, other_miss);
            assert_eq!(payout(&bet, n(low)).unwrap(), Decimal::from(6));
        }
    }

    #[test]
    fn test_total_payout_overflow_is_an_error() {
        let near_max = Decimal::MAX - Decimal::from(1);
        let payouts = [near_max, Decimal::from(10)];

        let err = total_payout(&payouts).unwrap_err();
        assert!(matches!(err, RouletteError::AmountOverflow { .. }));
        assert_eq!(
            total_payout(&[Decimal::from(360), Decimal::from(40)]).unwrap(),
            Decimal::from(400)
        );
    }

    #[test]
    fn test_every_pocket_is_covered_by_exactly_one_racetrack_group() {
        let groups = [
            outside(BetCategory::Tiers, 1),
            outside(BetCategory::Orphelins, 1),
            outside(BetCategory::Voisins, 1),
        ];
        for result in WheelNumber::all() {
            let hits = groups.iter().filter(|bet| is_winning(bet, result)).count();
            assert_eq!(hits, 1, "pocket {}", result);
        }
    }
}
