pub mod table;

pub use table::{MenuChoice, TableMenu};
