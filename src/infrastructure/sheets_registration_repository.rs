use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        error::RepositoryError,
        models::registration::{
            NewRegistration, Registration, TIMESTAMP_FORMAT, fee_flag_from_cell,
            fee_flag_to_cell, sort_newest_first,
        },
        repositories::registration_repository::RegistrationRepository,
        services::clock::{Clock, SystemClock},
    },
    infrastructure::sheets::worksheet::Worksheet,
};

pub const SHEET_HEADERS: [&str; 4] = [
    "nom_complet",
    "numero_membre",
    "frais_compris",
    "date_inscription",
];

/// Where each registration field sits in the worksheet, resolved from the header row
struct ColumnMap {
    full_name: Option<usize>,
    member_number: Option<usize>,
    fee_acknowledged: Option<usize>,
    registered_at: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Self {
        let position = |name: &str| header.iter().position(|cell| cell.trim() == name);
        Self {
            full_name: position(SHEET_HEADERS[0]),
            member_number: position(SHEET_HEADERS[1]),
            fee_acknowledged: position(SHEET_HEADERS[2]),
            registered_at: position(SHEET_HEADERS[3]),
        }
    }

    fn cell<'a>(row: &'a [String], column: Option<usize>) -> &'a str {
        column
            .and_then(|index| row.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn member_number<'a>(&self, row: &'a [String]) -> &'a str {
        Self::cell(row, self.member_number)
    }

    fn registration(&self, row: &[String]) -> Registration {
        Registration::new(
            Self::cell(row, self.full_name).to_string(),
            Self::cell(row, self.member_number).to_string(),
            fee_flag_from_cell(Self::cell(row, self.fee_acknowledged)),
            Self::cell(row, self.registered_at).to_string(),
        )
    }
}

/// Registrations kept as rows of a spreadsheet tab.
///
/// Uniqueness is a read-then-append scan, so two concurrent submissions of the
/// same member number can both pass the check.
pub struct SheetsRegistrationRepository<W: Worksheet> {
    worksheet: Arc<W>,
    clock: Arc<dyn Clock>,
}

impl<W: Worksheet> Clone for SheetsRegistrationRepository<W> {
    fn clone(&self) -> Self {
        Self {
            worksheet: Arc::clone(&self.worksheet),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<W: Worksheet> SheetsRegistrationRepository<W> {
    pub fn new(worksheet: Arc<W>) -> Self {
        Self::with_clock(worksheet, Arc::new(SystemClock))
    }

    pub fn with_clock(worksheet: Arc<W>, clock: Arc<dyn Clock>) -> Self {
        Self { worksheet, clock }
    }

    fn header_row() -> Vec<String> {
        SHEET_HEADERS.iter().map(|h| h.to_string()).collect()
    }
}

#[async_trait]
impl<W: Worksheet> RegistrationRepository for SheetsRegistrationRepository<W> {
    async fn init(&self) -> Result<(), RepositoryError> {
        let values = self.worksheet.get_all_values().await?;
        match values.first() {
            None => {
                info!("Writing header row to empty worksheet");
                self.worksheet.append_row(&Self::header_row()).await?;
            }
            Some(header) => {
                let trimmed: Vec<&str> = header.iter().map(|cell| cell.trim()).collect();
                if trimmed != SHEET_HEADERS {
                    warn!("Worksheet header {:?} is out of date, replacing it", trimmed);
                    self.worksheet.replace_row(1, &Self::header_row()).await?;
                }
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let values = self.worksheet.get_all_values().await?;
        Ok(values.len().saturating_sub(1) as u64)
    }

    async fn insert(&self, registration: &NewRegistration) -> Result<(), RepositoryError> {
        let values = self.worksheet.get_all_values().await?;
        if let Some((header, rows)) = values.split_first() {
            let columns = ColumnMap::from_header(header);
            let candidate = registration.member_number().trim();
            if rows
                .iter()
                .any(|row| columns.member_number(row).trim() == candidate)
            {
                return Err(RepositoryError::DuplicateMember);
            }
        }

        let row = vec![
            registration.full_name().trim().to_string(),
            registration.member_number().trim().to_string(),
            fee_flag_to_cell(registration.fee_acknowledged()).to_string(),
            self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
        ];
        self.worksheet.append_row(&row).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Registration>, RepositoryError> {
        let values = self.worksheet.get_all_values().await?;
        let Some((header, rows)) = values.split_first() else {
            return Ok(Vec::new());
        };

        let columns = ColumnMap::from_header(header);
        let mut registrations: Vec<Registration> =
            rows.iter().map(|row| columns.registration(row)).collect();
        sort_newest_first(&mut registrations);
        Ok(registrations)
    }

    async fn delete(&self, member_number: &str) -> Result<u64, RepositoryError> {
        let values = self.worksheet.get_all_values().await?;
        let Some((header, rows)) = values.split_first() else {
            return Ok(0);
        };

        let columns = ColumnMap::from_header(header);
        let target = member_number.trim();
        // worksheet rows are 1-based and row 1 is the header
        let rows_to_delete: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| columns.member_number(row).trim() == target)
            .map(|(index, _)| index + 2)
            .collect();

        // highest first so pending row numbers stay valid
        for row_number in rows_to_delete.iter().rev() {
            debug!("Deleting worksheet row {}", row_number);
            self.worksheet.delete_row(*row_number).await?;
        }

        Ok(rows_to_delete.len() as u64)
    }
}
