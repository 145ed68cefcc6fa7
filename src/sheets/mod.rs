//! Sheet Reader Module
//!
//! スプレッドシートからセルの値・実効書式・結合範囲を読み込むモジュール。
//! 同期処理からは`SheetSource`トレイト越しに利用します。

pub mod auth;
pub mod model;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::types::SheetData;

use self::auth::{ServiceAccountKey, SHEETS_READONLY_SCOPE};
use self::model::Spreadsheet;

/// シートの読み込み元
pub trait SheetSource {
    /// 指定されたシートのグリッドと結合範囲を読み込む
    ///
    /// # 発生し得るエラー
    ///
    /// * `SyncError::SheetNotFound` - 指定された名前のシートが存在しない
    /// * `SyncError::Http` / `SyncError::Api` / `SyncError::Json` - 通信・解析エラー
    fn read(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<SheetData, SyncError>;
}

/// Sheets API v4のクライアント
#[derive(Debug)]
pub struct GoogleSheetsClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl GoogleSheetsClient {
    /// サービスアカウントで認証し、クライアントを生成する
    ///
    /// 取得したアクセストークンは1回の実行の間使い回します。
    pub fn connect(config: &SyncConfig) -> Result<Self, SyncError> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        let key = ServiceAccountKey::from_file(&config.google_credentials_file)?;
        let access_token = key.fetch_access_token(&http, SHEETS_READONLY_SCOPE)?;

        tracing::info!("Connected to Google Sheets API as {}", key.client_email);

        Ok(Self {
            http,
            api_url: config.sheets_api_url.clone(),
            access_token,
        })
    }

    /// `spreadsheets.get`を呼び出す（内部ヘルパー）
    fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
        query: &[(&str, &str)],
    ) -> Result<Spreadsheet, SyncError> {
        let url = format!("{}/spreadsheets/{}", self.api_url, spreadsheet_id);
        self.get_json(&url, query)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SyncError> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        Ok(response.json()?)
    }
}

impl SheetSource for GoogleSheetsClient {
    fn read(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<SheetData, SyncError> {
        // 1. メタデータからシートの存在と結合範囲を確認
        let metadata = self.get_spreadsheet(spreadsheet_id, &[])?;
        let sheet = metadata
            .find_sheet(sheet_name)
            .ok_or_else(|| SyncError::SheetNotFound {
                sheet: sheet_name.to_string(),
            })?;
        let merges = sheet.merge_regions();
        tracing::debug!(
            "Sheet '{}' has id {:?}",
            sheet_name,
            sheet.properties.sheet_id
        );

        // 2. 値と書式を含むグリッドデータを取得
        let range = sheet_range(sheet_name);
        let data = self.get_spreadsheet(
            spreadsheet_id,
            &[("ranges", range.as_str()), ("includeGridData", "true")],
        )?;

        let grid = data
            .sheets
            .first()
            .map(|sheet| sheet.to_grid())
            .unwrap_or_default();

        Ok(SheetData { grid, merges })
    }
}

/// シート名をA1記法の範囲として引用する
///
/// シート名に含まれる`'`は`''`にエスケープします。
fn sheet_range(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}
