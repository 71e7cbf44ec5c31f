use async_trait::async_trait;

use crate::infrastructure::sheets::error::SheetsError;

/// One tab of a spreadsheet, addressed by 1-based row numbers like the
/// spreadsheet UI. Row 1 is the header.
#[async_trait]
pub trait Worksheet: Send + Sync {
    /// Every non-empty row, header included. Trailing empty cells may be absent.
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>, SheetsError>;

    async fn append_row(&self, row: &[String]) -> Result<(), SheetsError>;

    /// Overwrite a row, clearing any cells beyond `row`
    async fn replace_row(&self, row_number: usize, row: &[String]) -> Result<(), SheetsError>;

    /// Remove a row; rows below it shift up by one
    async fn delete_row(&self, row_number: usize) -> Result<(), SheetsError>;
}
