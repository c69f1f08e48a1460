pub mod evaluator;
pub mod session;
pub mod wheel;

pub use crate::domain::model::{Bet, BetCategory, SpinReport, WheelNumber};
pub use crate::domain::ports::{ConfigProvider, Ledger};
pub use crate::utils::error::Result;
pub use session::GameSession;
pub use wheel::Wheel;
