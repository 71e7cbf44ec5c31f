use std::{net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL: &str = "sqlite://app.db?mode=rwc";
const DEFAULT_MAX_PARTICIPANTS: u64 = 20;
const DEFAULT_SHEET_TAB_NAME: &str = "inscriptions";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Failed to read service account file {path}: {source}")]
    CredentialsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Spreadsheet storage settings; present only when both the spreadsheet id
/// and service account credentials are configured
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub tab_name: String,
    pub service_account_json: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_participants: u64,
    pub admin_password: String,
    pub sheets: Option<SheetsConfig>,
    pub http_timeout: Duration,
    pub log_level: String,
    pub sqlx_logging: bool,
}

impl AppConfig {
    /// Load from the process environment, after reading `.env` if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = parse_or(&get, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let max_participants = parse_or(&get, "MAX_PARTICIPANTS", Some(DEFAULT_MAX_PARTICIPANTS))?;
        let http_timeout_secs =
            parse_or(&get, "HTTP_TIMEOUT_SECS", Some(DEFAULT_HTTP_TIMEOUT_SECS))?;
        let sqlx_logging = parse_or(&get, "SQLX_LOGGING", Some(false))?;

        // credentials only matter once a spreadsheet is configured
        let sheets = match get("GSHEET_ID") {
            Some(spreadsheet_id) => {
                let service_account_json = match (
                    get("GCP_SERVICE_ACCOUNT_JSON"),
                    get("GCP_SERVICE_ACCOUNT_FILE"),
                ) {
                    (Some(json), _) => Some(json),
                    (None, Some(path)) => {
                        let path = PathBuf::from(path);
                        let json = std::fs::read_to_string(&path)
                            .map_err(|source| ConfigError::CredentialsFile { path, source })?;
                        Some(json)
                    }
                    (None, None) => None,
                };
                service_account_json.map(|service_account_json| SheetsConfig {
                    spreadsheet_id: spreadsheet_id.trim().to_string(),
                    tab_name: get("SHEET_TAB_NAME")
                        .unwrap_or_else(|| DEFAULT_SHEET_TAB_NAME.to_string()),
                    service_account_json,
                })
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_participants,
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or_default(),
            sheets,
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            sqlx_logging,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => default.ok_or(ConfigError::InvalidValue {
            key,
            value: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!("0.0.0.0:8080".parse::<SocketAddr>().unwrap(), config.bind_addr);
        assert_eq!(DEFAULT_DATABASE_URL, config.database_url);
        assert_eq!(20, config.max_participants);
        assert_eq!("", config.admin_password);
        assert!(config.sheets.is_none());
        assert_eq!(Duration::from_secs(30), config.http_timeout);
        assert!(!config.sqlx_logging);
    }

    #[test]
    fn test_sheets_require_id_and_credentials() {
        let config = load(&[("GSHEET_ID", "abc")]).unwrap();
        assert!(config.sheets.is_none());

        let config = load(&[("GCP_SERVICE_ACCOUNT_JSON", "{}")]).unwrap();
        assert!(config.sheets.is_none());

        let config = load(&[("GSHEET_ID", "  "), ("GCP_SERVICE_ACCOUNT_JSON", "{}")]).unwrap();
        assert!(config.sheets.is_none());

        let config = load(&[("GSHEET_ID", "abc"), ("GCP_SERVICE_ACCOUNT_JSON", "{}")]).unwrap();
        let sheets = config.sheets.unwrap();
        assert_eq!("abc", sheets.spreadsheet_id);
        assert_eq!("inscriptions", sheets.tab_name);
        assert_eq!("{}", sheets.service_account_json);
    }

    #[test]
    fn test_missing_credentials_file_is_an_error() {
        let result = load(&[
            ("GSHEET_ID", "abc"),
            ("GCP_SERVICE_ACCOUNT_FILE", "/nonexistent/service-account.json"),
        ]);
        assert!(matches!(result, Err(ConfigError::CredentialsFile { .. })));
    }

    #[test]
    fn test_credentials_file_ignored_without_spreadsheet() {
        let config = load(&[(
            "GCP_SERVICE_ACCOUNT_FILE",
            "/nonexistent/service-account.json",
        )])
        .unwrap();
        assert!(config.sheets.is_none());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = load(&[("MAX_PARTICIPANTS", "twenty")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "MAX_PARTICIPANTS", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MAX_PARTICIPANTS", "5"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("SQLX_LOGGING", "true"),
        ])
        .unwrap();
        assert_eq!(5, config.max_participants);
        assert_eq!("s3cret", config.admin_password);
        assert_eq!(3000, config.bind_addr.port());
        assert!(config.sqlx_logging);
    }
}
