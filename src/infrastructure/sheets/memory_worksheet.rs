use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use crate::infrastructure::sheets::{error::SheetsError, worksheet::Worksheet};

/// In-process stand-in for a spreadsheet tab
#[derive(Default)]
pub struct MemoryWorksheet {
    rows: Mutex<Vec<Vec<String>>>,
    deleted_rows: Mutex<Vec<usize>>,
    failing: AtomicBool,
}

impl MemoryWorksheet {
    pub fn with_rows(rows: Vec<Vec<&str>>) -> Self {
        let worksheet = Self::default();
        *worksheet.rows.lock().unwrap() = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        worksheet
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }

    /// Row numbers passed to `delete_row`, in call order
    pub fn deleted_rows(&self) -> Vec<usize> {
        self.deleted_rows.lock().unwrap().clone()
    }

    /// Make every following call fail like an unreachable API
    pub fn fail_requests(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), SheetsError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SheetsError::Api {
                status: 503,
                body: "unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Worksheet for MemoryWorksheet {
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        self.check_available()?;
        Ok(self.rows())
    }

    async fn append_row(&self, row: &[String]) -> Result<(), SheetsError> {
        self.check_available()?;
        self.rows.lock().unwrap().push(row.to_vec());
        Ok(())
    }

    async fn replace_row(&self, row_number: usize, row: &[String]) -> Result<(), SheetsError> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(row_number - 1) {
            Some(existing) => *existing = row.to_vec(),
            None => rows.push(row.to_vec()),
        }
        Ok(())
    }

    async fn delete_row(&self, row_number: usize) -> Result<(), SheetsError> {
        self.check_available()?;
        self.deleted_rows.lock().unwrap().push(row_number);
        let mut rows = self.rows.lock().unwrap();
        if row_number == 0 || row_number > rows.len() {
            return Err(SheetsError::Api {
                status: 400,
                body: format!("row {row_number} out of range"),
            });
        }
        rows.remove(row_number - 1);
        Ok(())
    }
}
