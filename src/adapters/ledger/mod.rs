mod book;
mod file;
mod memory;

pub use book::LedgerBook;
pub use file::FileLedger;
pub use memory::MemoryLedger;
