pub mod fuel;
pub mod interchange;
pub mod loan;
pub mod payments;
pub mod report;
