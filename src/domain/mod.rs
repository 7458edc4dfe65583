//! Lending and exhibition rules, free of I/O

pub mod exhibition;
pub mod loan;

pub use exhibition::{ExhibitionBookEntry, ExhibitionBooks, MAX_BOOKS};
pub use loan::{LoanPolicy, LoanRecord, LoanStatus};
