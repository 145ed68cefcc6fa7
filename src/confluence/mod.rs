//! Page Publisher Module
//!
//! ページの現在のバージョンとタイトルを取得し、本文を置き換えるモジュール。
//! HTTP通信は`ContentApi`トレイトに閉じ込め、公開処理は`PagePublisher`トレイト
//! として同期処理から利用します。

pub mod page;
mod publisher;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;
use crate::error::SyncError;

pub use publisher::{ConfluencePublisher, DryRunPublisher, PagePublisher, PublishedPage};

/// ページのメタデータ（必要なフィールドのみ）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub title: String,
    pub version: PageVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVersion {
    pub number: u64,
}

/// ページ更新リクエストの本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUpdate {
    pub version: PageVersion,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub body: PageBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageBody {
    pub storage: StorageValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageValue {
    pub value: String,
    pub representation: String,
}

impl PageUpdate {
    /// ストレージ形式の本文で`page`を更新するリクエストを生成
    pub fn new(title: impl Into<String>, version: u64, storage: impl Into<String>) -> Self {
        Self {
            version: PageVersion { number: version },
            title: title.into(),
            content_type: "page".to_string(),
            body: PageBody {
                storage: StorageValue {
                    value: storage.into(),
                    representation: "storage".to_string(),
                },
            },
        }
    }
}

/// コンテンツ管理APIの操作
pub trait ContentApi {
    /// ページを本文・バージョン付きで取得する
    fn get_page(&self, page_id: &str) -> Result<PageInfo, SyncError>;

    /// ページを更新する
    fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<(), SyncError>;
}

/// REST APIクライアント（Basic認証）
#[derive(Debug)]
pub struct ConfluenceClient {
    http: Client,
    base_url: String,
    user: String,
    api_token: String,
}

impl ConfluenceClient {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.confluence_url.clone(),
            user: config.confluence_user.clone(),
            api_token: config.confluence_api_token.clone(),
        })
    }

    fn content_url(&self, page_id: &str) -> String {
        format!("{}/wiki/rest/api/content/{}", self.base_url, page_id)
    }
}

/// 成功以外のステータスをエラーに変換（内部ヘルパー）
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(SyncError::Api {
        status: status.as_u16(),
        body: response.text().unwrap_or_default(),
    })
}

impl ContentApi for ConfluenceClient {
    fn get_page(&self, page_id: &str) -> Result<PageInfo, SyncError> {
        let url = self.content_url(page_id);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.api_token))
            .query(&[("expand", "body.storage,version")])
            .send()?;

        Ok(check_status(response)?.json()?)
    }

    fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<(), SyncError> {
        let url = self.content_url(page_id);
        tracing::debug!("PUT {} (version {})", url, update.version.number);

        let response = self
            .http
            .put(&url)
            .basic_auth(&self.user, Some(&self.api_token))
            .json(update)
            .send()?;

        check_status(response)?;
        Ok(())
    }
}
