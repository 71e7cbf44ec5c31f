pub mod error;
pub mod google_worksheet;
#[cfg(test)]
pub mod memory_worksheet;
pub mod service_account;
pub mod worksheet;
