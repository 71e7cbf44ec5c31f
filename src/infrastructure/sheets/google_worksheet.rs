use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use crate::infrastructure::sheets::{
    error::SheetsError, service_account::AccessTokenProvider, worksheet::Worksheet,
};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";
const NEW_TAB_ROWS: u32 = 1000;
const NEW_TAB_COLUMNS: u32 = 20;

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<BatchUpdateReply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateReply {
    add_sheet: Option<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// A tab of a Google spreadsheet reached through the Sheets v4 REST API
pub struct GoogleWorksheet {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
    api_base: Url,
    spreadsheet_id: String,
    tab_name: String,
    sheet_id: OnceCell<i64>,
}

impl GoogleWorksheet {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<dyn AccessTokenProvider>,
        spreadsheet_id: String,
        tab_name: String,
    ) -> Result<Self, SheetsError> {
        Ok(Self {
            http,
            tokens,
            api_base: Url::parse(SHEETS_API_BASE)?,
            spreadsheet_id,
            tab_name,
            sheet_id: OnceCell::new(),
        })
    }

    /// `spreadsheets/{id}` followed by `segments`, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::UnexpectedResponse("API base cannot hold a path".into()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    fn batch_update_endpoint(&self) -> Result<Url, SheetsError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::UnexpectedResponse("API base cannot hold a path".into()))?
            .pop_if_empty()
            .push(&format!("{}:batchUpdate", self.spreadsheet_id));
        Ok(url)
    }

    /// A1 range on this tab, quoting the tab name
    fn range(&self, cells: &str) -> String {
        format!("'{}'!{}", self.tab_name.replace('\'', "''"), cells)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SheetsError> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn batch_update(
        &self,
        requests: serde_json::Value,
    ) -> Result<BatchUpdateResponse, SheetsError> {
        let url = self.batch_update_endpoint()?;
        self.send(self.http.post(url).json(&json!({ "requests": requests })))
            .await
    }

    /// Numeric id of the tab, resolved once
    async fn sheet_id(&self) -> Result<i64, SheetsError> {
        self.sheet_id
            .get_or_try_init(|| self.find_or_create_tab())
            .await
            .copied()
    }

    async fn find_or_create_tab(&self) -> Result<i64, SheetsError> {
        let mut url = self.endpoint(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        let spreadsheet: SpreadsheetResponse = self.send(self.http.get(url)).await?;

        if let Some(entry) = spreadsheet
            .sheets
            .into_iter()
            .find(|entry| entry.properties.title == self.tab_name)
        {
            return Ok(entry.properties.sheet_id);
        }

        info!("Creating worksheet '{}'", self.tab_name);
        let response = self
            .batch_update(json!([{
                "addSheet": {
                    "properties": {
                        "title": self.tab_name,
                        "gridProperties": {
                            "rowCount": NEW_TAB_ROWS,
                            "columnCount": NEW_TAB_COLUMNS,
                        }
                    }
                }
            }]))
            .await?;

        response
            .replies
            .into_iter()
            .find_map(|reply| reply.add_sheet)
            .map(|entry| entry.properties.sheet_id)
            .ok_or_else(|| {
                SheetsError::UnexpectedResponse("addSheet reply without properties".into())
            })
    }
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Worksheet for GoogleWorksheet {
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        self.sheet_id().await?;
        let range = self.range("A:Z");
        let url = self.endpoint(&["values", &range])?;
        let values: ValueRange = self.send(self.http.get(url)).await?;

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append_row(&self, row: &[String]) -> Result<(), SheetsError> {
        self.sheet_id().await?;
        let range = format!("{}:append", self.range("A1"));
        let mut url = self.endpoint(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let _: serde::de::IgnoredAny = self
            .send(self.http.post(url).json(&json!({ "values": [row] })))
            .await?;
        debug!("Appended row to '{}'", self.tab_name);
        Ok(())
    }

    async fn replace_row(&self, row_number: usize, row: &[String]) -> Result<(), SheetsError> {
        self.sheet_id().await?;
        let clear_range = format!("{}:clear", self.range(&format!("{row_number}:{row_number}")));
        let url = self.endpoint(&["values", &clear_range])?;
        let _: serde::de::IgnoredAny = self.send(self.http.post(url).json(&json!({}))).await?;

        let range = self.range(&format!("A{row_number}"));
        let mut url = self.endpoint(&["values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let _: serde::de::IgnoredAny = self
            .send(self.http.put(url).json(&json!({ "values": [row] })))
            .await?;
        Ok(())
    }

    async fn delete_row(&self, row_number: usize) -> Result<(), SheetsError> {
        let sheet_id = self.sheet_id().await?;
        let start_index = row_number.checked_sub(1).ok_or_else(|| {
            SheetsError::UnexpectedResponse("row numbers start at 1".into())
        })?;

        self.batch_update(json!([{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": start_index,
                    "endIndex": row_number,
                }
            }
        }]))
        .await?;
        debug!("Deleted row {} from '{}'", row_number, self.tab_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticToken;

    #[async_trait]
    impl AccessTokenProvider for StaticToken {
        async fn access_token(&self) -> Result<String, SheetsError> {
            Ok("token".to_string())
        }
    }

    fn worksheet(tab: &str) -> GoogleWorksheet {
        GoogleWorksheet::new(
            reqwest::Client::new(),
            Arc::new(StaticToken),
            "sheet-123".to_string(),
            tab.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_range_quotes_tab_name() {
        assert_eq!("'inscriptions'!A1", worksheet("inscriptions").range("A1"));
        assert_eq!("'Bob''s tab'!A:Z", worksheet("Bob's tab").range("A:Z"));
    }

    #[test]
    fn test_values_endpoint_encodes_range() {
        let sheet = worksheet("Liste finale");
        let range = sheet.range("A:Z");
        let url = sheet.endpoint(&["values", &range]).unwrap();
        assert_eq!(
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/'Liste%20finale'!A:Z",
            url.as_str()
        );
    }

    #[test]
    fn test_batch_update_endpoint() {
        let url = worksheet("inscriptions").batch_update_endpoint().unwrap();
        assert_eq!(
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123:batchUpdate",
            url.as_str()
        );
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!("abc", cell_to_string(json!("abc")));
        assert_eq!("1", cell_to_string(json!(1)));
        assert_eq!("", cell_to_string(serde_json::Value::Null));
    }
}
