use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouletteError {
    #[error("Invalid bet: {reason}")]
    InvalidBet { reason: String },

    #[error("Invalid wheel number: {value} (must be between 0 and 36)")]
    InvalidNumber { value: i64 },

    #[error("Insufficient funds: stake {stake} exceeds balance {balance}")]
    InsufficientFunds { stake: Decimal, balance: Decimal },

    #[error("Amount overflow in {operation}")]
    AmountOverflow { operation: String },

    #[error("Ledger write failed for account {account_id}: {message}")]
    LedgerWrite { account_id: u32, message: String },

    #[error("Account {account_id} not found in ledger")]
    AccountNotFound { account_id: u32 },

    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Bet,
    Funds,
    Ledger,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RouletteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RouletteError::InvalidBet { .. }
            | RouletteError::InvalidNumber { .. }
            | RouletteError::AmountOverflow { .. } => ErrorCategory::Bet,
            RouletteError::InsufficientFunds { .. } => ErrorCategory::Funds,
            RouletteError::LedgerWrite { .. } | RouletteError::AccountNotFound { .. } => {
                ErrorCategory::Ledger
            }
            RouletteError::InvalidInput { .. } => ErrorCategory::Input,
            RouletteError::ConfigError { .. }
            | RouletteError::ConfigValidationError { .. }
            | RouletteError::InvalidConfigValueError { .. }
            | RouletteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RouletteError::IoError(_) | RouletteError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// Round-level errors are recoverable within the session loop; the higher
    /// severities only surface during startup.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Bet | ErrorCategory::Funds | ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Ledger => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RouletteError::InvalidBet { .. } => {
                "Check the stake is positive and only straight-up bets carry a number".to_string()
            }
            RouletteError::InvalidNumber { .. } => "Pick a number between 0 and 36".to_string(),
            RouletteError::AmountOverflow { .. } => "Use a smaller stake".to_string(),
            RouletteError::InsufficientFunds { balance, .. } => {
                format!("Lower the stake to at most {}", balance)
            }
            RouletteError::LedgerWrite { .. } => {
                "Check the ledger file is writable, then spin again to settle pending bets"
                    .to_string()
            }
            RouletteError::AccountNotFound { .. } => {
                "Open the account with --opening-balance or use an existing account id".to_string()
            }
            RouletteError::InvalidInput { .. } => "Enter a whole number from the menu".to_string(),
            RouletteError::ConfigError { .. }
            | RouletteError::ConfigValidationError { .. }
            | RouletteError::InvalidConfigValueError { .. } => {
                "Review the table configuration file and command line flags".to_string()
            }
            RouletteError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            RouletteError::IoError(_) => "Check file permissions and available disk space".to_string(),
            RouletteError::SerializationError(_) => {
                "The ledger file may be corrupt; restore it from a backup".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RouletteError::InvalidBet { reason } => format!("Bet rejected: {}", reason),
            RouletteError::InvalidNumber { value } => format!("Invalid number: {}", value),
            RouletteError::InsufficientFunds { .. } => "Insufficient balance!".to_string(),
            RouletteError::AmountOverflow { .. } => "Amount too large!".to_string(),
            RouletteError::LedgerWrite { .. } => "Error updating balance in ledger!".to_string(),
            RouletteError::AccountNotFound { account_id } => {
                format!("Account {} does not exist", account_id)
            }
            RouletteError::InvalidInput { .. } => "Invalid input!".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RouletteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_errors_are_recoverable() {
        let funds = RouletteError::InsufficientFunds {
            stake: Decimal::from(50),
            balance: Decimal::from(20),
        };
        assert_eq!(funds.category(), ErrorCategory::Funds);
        assert!(funds.is_recoverable());
        assert_eq!(funds.user_friendly_message(), "Insufficient balance!");
        assert!(funds.recovery_suggestion().contains("20"));

        let ledger = RouletteError::LedgerWrite {
            account_id: 7,
            message: "disk full".to_string(),
        };
        assert_eq!(ledger.severity(), ErrorSeverity::Medium);
        assert!(ledger.is_recoverable());

        let overflow = RouletteError::AmountOverflow {
            operation: "payout".to_string(),
        };
        assert_eq!(overflow.category(), ErrorCategory::Bet);
        assert!(overflow.is_recoverable());
        assert_eq!(overflow.user_friendly_message(), "Amount too large!");
    }

    #[test]
    fn test_startup_errors_are_not_recoverable() {
        let missing = RouletteError::MissingConfigError {
            field: "table.account_id".to_string(),
        };
        assert_eq!(missing.severity(), ErrorSeverity::High);
        assert!(!missing.is_recoverable());

        let io = RouletteError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }
}
