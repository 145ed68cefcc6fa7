//! Configuration Module
//!
//! 同期処理の設定を保持する`SyncConfig`と、それを段階的に構築・検証する
//! `SyncConfigBuilder`を提供する。環境変数からの読み込みもここで行う。

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SyncError;
use crate::types::SheetMapping;

/// Sheets APIのデフォルトのベースURL
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";

/// 認証情報ファイルのデフォルトパス
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// HTTPリクエストのデフォルトタイムアウト（秒）
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// 必須の環境変数
const REQUIRED_VARS: [&str; 4] = [
    "CONFLUENCE_URL",
    "CONFLUENCE_USER",
    "CONFLUENCE_API_TOKEN",
    "SPREADSHEET_ID",
];

/// 同期処理の設定
///
/// 起動時に一度だけ構築され、各コンポーネントには参照で渡されます。
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// ページ側のベースURL（末尾の`/`は除去済み）
    pub confluence_url: String,

    /// Basic認証のユーザー
    pub confluence_user: String,

    /// Basic認証のAPIトークン
    pub confluence_api_token: String,

    /// サービスアカウントの認証情報ファイル
    pub google_credentials_file: PathBuf,

    /// 対象のスプレッドシートID
    pub spreadsheet_id: String,

    /// シートとページの対応付け（処理順）
    pub mappings: Vec<SheetMapping>,

    /// Sheets APIのベースURL
    pub sheets_api_url: String,

    /// HTTPリクエストのタイムアウト
    pub http_timeout: Duration,
}

impl SyncConfig {
    /// プロセスの環境変数から設定を読み込む
    ///
    /// `.env`ファイルの読み込みは呼び出し側（バイナリ）で事前に行います。
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    ///
    /// # 読み込む変数
    ///
    /// * `CONFLUENCE_URL`, `CONFLUENCE_USER`, `CONFLUENCE_API_TOKEN`, `SPREADSHEET_ID` - 必須
    /// * `GOOGLE_CREDENTIALS_FILE` - 省略時は`credentials.json`
    /// * `SHEET_<n>_NAME` / `SHEET_<n>_PAGE_ID` - n = 1から順に、組が揃わなくなるまで
    /// * `SHEETS_API_URL` - 省略時は`https://sheets.googleapis.com/v4`
    /// * `SYNC_HTTP_TIMEOUT_SECS` - 省略時は30秒
    ///
    /// 空文字列の値は未設定として扱います。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::Config(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let mut builder = SyncConfigBuilder::new()
            .with_confluence_url(get("CONFLUENCE_URL").unwrap_or_default())
            .with_credentials(
                get("CONFLUENCE_USER").unwrap_or_default(),
                get("CONFLUENCE_API_TOKEN").unwrap_or_default(),
            )
            .with_spreadsheet_id(get("SPREADSHEET_ID").unwrap_or_default());

        if let Some(path) = get("GOOGLE_CREDENTIALS_FILE") {
            builder = builder.with_google_credentials_file(path);
        }

        if let Some(url) = get("SHEETS_API_URL") {
            builder = builder.with_sheets_api_url(url);
        }

        if let Some(raw) = get("SYNC_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SyncError::Config(format!("Invalid SYNC_HTTP_TIMEOUT_SECS: '{}'", raw))
            })?;
            builder = builder.with_http_timeout(Duration::from_secs(secs));
        }

        let mut index = 1;
        while let (Some(name), Some(page_id)) = (
            get(&format!("SHEET_{}_NAME", index)),
            get(&format!("SHEET_{}_PAGE_ID", index)),
        ) {
            builder = builder.add_mapping(SheetMapping::new(name, page_id));
            index += 1;
        }

        builder.build()
    }

    /// 指定された名前のマッピングのみに絞り込む
    ///
    /// 該当するマッピングが1件もない場合は`SyncError::Config`を返します。
    pub fn retain_sheets(&mut self, names: &[String]) -> Result<(), SyncError> {
        if names.is_empty() {
            return Ok(());
        }

        self.mappings.retain(|mapping| names.contains(&mapping.name));
        if self.mappings.is_empty() {
            return Err(SyncError::Config(format!(
                "No configured sheet matches: {}",
                names.join(", ")
            )));
        }
        Ok(())
    }
}

/// `SyncConfig`を段階的に構築するビルダー
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetsync::{SheetMapping, SyncConfigBuilder};
///
/// # fn main() -> Result<(), sheetsync::SyncError> {
/// let config = SyncConfigBuilder::new()
///     .with_confluence_url("https://example.atlassian.net")
///     .with_credentials("bot@example.com", "api-token")
///     .with_spreadsheet_id("1AbCdEf")
///     .with_google_credentials_file("service-account.json")
///     .add_mapping(SheetMapping::new("Metrics", "123456"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncConfigBuilder {
    confluence_url: String,
    confluence_user: String,
    confluence_api_token: String,
    google_credentials_file: PathBuf,
    spreadsheet_id: String,
    mappings: Vec<SheetMapping>,
    sheets_api_url: String,
    http_timeout: Duration,
}

impl Default for SyncConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncConfigBuilder {
    /// デフォルト設定を持つビルダーを生成する
    pub fn new() -> Self {
        Self {
            confluence_url: String::new(),
            confluence_user: String::new(),
            confluence_api_token: String::new(),
            google_credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            spreadsheet_id: String::new(),
            mappings: Vec::new(),
            sheets_api_url: DEFAULT_SHEETS_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn with_confluence_url(mut self, url: impl Into<String>) -> Self {
        self.confluence_url = url.into();
        self
    }

    /// Basic認証のユーザーとAPIトークンを指定する
    pub fn with_credentials(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        self.confluence_user = user.into();
        self.confluence_api_token = token.into();
        self
    }

    pub fn with_spreadsheet_id(mut self, id: impl Into<String>) -> Self {
        self.spreadsheet_id = id.into();
        self
    }

    pub fn with_google_credentials_file(mut self, path: impl AsRef<Path>) -> Self {
        self.google_credentials_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_sheets_api_url(mut self, url: impl Into<String>) -> Self {
        self.sheets_api_url = url.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// マッピングを末尾に追加する
    pub fn add_mapping(mut self, mapping: SheetMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// 設定を検証し、`SyncConfig`を生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `SyncError::Config(String)`:
    ///   * 必須項目（URL、ユーザー、トークン、スプレッドシートID）が空
    ///   * 認証情報ファイルが存在しない
    ///   * マッピングが1件もない
    ///   * タイムアウトが0
    pub fn build(self) -> Result<SyncConfig, SyncError> {
        // 1. 必須項目の検証
        let missing: Vec<&str> = [
            ("confluence_url", &self.confluence_url),
            ("confluence_user", &self.confluence_user),
            ("confluence_api_token", &self.confluence_api_token),
            ("spreadsheet_id", &self.spreadsheet_id),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
        if !missing.is_empty() {
            return Err(SyncError::Config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        // 2. 認証情報ファイルの存在確認
        if !self.google_credentials_file.is_file() {
            return Err(SyncError::Config(format!(
                "Credentials file not found: {}",
                self.google_credentials_file.display()
            )));
        }

        // 3. マッピングの検証
        if self.mappings.is_empty() {
            return Err(SyncError::Config(
                "No sheet mappings configured".to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(SyncError::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        Ok(SyncConfig {
            confluence_url: self.confluence_url.trim_end_matches('/').to_string(),
            confluence_user: self.confluence_user,
            confluence_api_token: self.confluence_api_token,
            google_credentials_file: self.google_credentials_file,
            spreadsheet_id: self.spreadsheet_id,
            mappings: self.mappings,
            sheets_api_url: self.sheets_api_url.trim_end_matches('/').to_string(),
            http_timeout: self.http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn credentials_file() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{}").unwrap();
        file
    }

    fn base_vars(credentials: &Path) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("CONFLUENCE_URL".to_string(), "https://wiki.example.com/".to_string());
        vars.insert("CONFLUENCE_USER".to_string(), "bot@example.com".to_string());
        vars.insert("CONFLUENCE_API_TOKEN".to_string(), "secret".to_string());
        vars.insert("SPREADSHEET_ID".to_string(), "sheet-id".to_string());
        vars.insert(
            "GOOGLE_CREDENTIALS_FILE".to_string(),
            credentials.display().to_string(),
        );
        vars
    }

    fn load(vars: &HashMap<String, String>) -> Result<SyncConfig, SyncError> {
        SyncConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_from_lookup_reads_numbered_mappings() {
        let creds = credentials_file();
        let mut vars = base_vars(creds.path());
        vars.insert("SHEET_1_NAME".to_string(), "Metrics".to_string());
        vars.insert("SHEET_1_PAGE_ID".to_string(), "100".to_string());
        vars.insert("SHEET_2_NAME".to_string(), "Roadmap".to_string());
        vars.insert("SHEET_2_PAGE_ID".to_string(), "200".to_string());
        // 3番目は組が揃っていないため、ここで探索が止まる
        vars.insert("SHEET_3_NAME".to_string(), "Orphan".to_string());
        vars.insert("SHEET_4_NAME".to_string(), "Never".to_string());
        vars.insert("SHEET_4_PAGE_ID".to_string(), "400".to_string());

        let config = load(&vars).unwrap();

        assert_eq!(
            config.mappings,
            vec![
                SheetMapping::new("Metrics", "100"),
                SheetMapping::new("Roadmap", "200"),
            ]
        );
        assert_eq!(config.confluence_url, "https://wiki.example.com");
        assert_eq!(config.sheets_api_url, DEFAULT_SHEETS_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_reports_all_missing_vars() {
        let vars = HashMap::new();
        let err = load(&vars).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("CONFLUENCE_URL"));
        assert!(msg.contains("CONFLUENCE_USER"));
        assert!(msg.contains("CONFLUENCE_API_TOKEN"));
        assert!(msg.contains("SPREADSHEET_ID"));
    }

    #[test]
    fn test_from_lookup_treats_empty_values_as_missing() {
        let creds = credentials_file();
        let mut vars = base_vars(creds.path());
        vars.insert("SPREADSHEET_ID".to_string(), "  ".to_string());

        match load(&vars) {
            Err(SyncError::Config(msg)) => assert!(msg.contains("SPREADSHEET_ID")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_without_mappings() {
        let creds = credentials_file();
        let vars = base_vars(creds.path());

        match load(&vars) {
            Err(SyncError::Config(msg)) => assert!(msg.contains("No sheet mappings")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_invalid_timeout() {
        let creds = credentials_file();
        let mut vars = base_vars(creds.path());
        vars.insert("SHEET_1_NAME".to_string(), "Metrics".to_string());
        vars.insert("SHEET_1_PAGE_ID".to_string(), "100".to_string());
        vars.insert("SYNC_HTTP_TIMEOUT_SECS".to_string(), "soon".to_string());

        assert!(matches!(load(&vars), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_build_missing_credentials_file() {
        let result = SyncConfigBuilder::new()
            .with_confluence_url("https://wiki.example.com")
            .with_credentials("user", "token")
            .with_spreadsheet_id("id")
            .with_google_credentials_file("/nonexistent/credentials.json")
            .add_mapping(SheetMapping::new("Metrics", "1"))
            .build();

        match result {
            Err(SyncError::Config(msg)) => assert!(msg.contains("Credentials file not found")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_zero_timeout() {
        let creds = credentials_file();
        let result = SyncConfigBuilder::new()
            .with_confluence_url("https://wiki.example.com")
            .with_credentials("user", "token")
            .with_spreadsheet_id("id")
            .with_google_credentials_file(creds.path())
            .add_mapping(SheetMapping::new("Metrics", "1"))
            .with_http_timeout(Duration::ZERO)
            .build();

        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn test_build_trims_url_and_retain_sheets() {
        let creds = credentials_file();
        let mut config = SyncConfigBuilder::new()
            .with_confluence_url("https://wiki.example.com/")
            .with_credentials("user", "token")
            .with_spreadsheet_id("id")
            .with_google_credentials_file(creds.path())
            .add_mapping(SheetMapping::new("Metrics", "1"))
            .add_mapping(SheetMapping::new("Roadmap", "2"))
            .build()
            .unwrap();

        assert_eq!(config.confluence_url, "https://wiki.example.com");

        config.retain_sheets(&[]).unwrap();
        assert_eq!(config.mappings.len(), 2);

        config.retain_sheets(&["Roadmap".to_string()]).unwrap();
        assert_eq!(config.mappings, vec![SheetMapping::new("Roadmap", "2")]);

        assert!(config.retain_sheets(&["Unknown".to_string()]).is_err());
    }
}
