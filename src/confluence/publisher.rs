//! Page Publishers
//!
//! 生成したテーブルをページとして公開する処理。

use std::io::Write;

use chrono::Local;

use super::page::compose_document;
use super::{ContentApi, PageUpdate};
use crate::config::SyncConfig;
use crate::error::SyncError;

/// 公開に成功したページ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPage {
    pub page_id: String,
    pub title: String,
    /// 公開後のバージョン番号
    pub version: u64,
    /// 閲覧用URL
    pub url: String,
}

/// ページの閲覧用URL
fn page_url(base_url: &str, page_id: &str) -> String {
    format!("{}/wiki/pages/{}", base_url, page_id)
}

/// テーブルの公開先
pub trait PagePublisher {
    /// テーブルをページ本文として公開する
    ///
    /// # 引数
    ///
    /// * `page_id` - 更新先ページのID
    /// * `table_markup` - テーブルのマークアップ
    /// * `label` - 見出しに表示する名前
    fn publish(
        &mut self,
        page_id: &str,
        table_markup: &str,
        label: &str,
    ) -> Result<PublishedPage, SyncError>;
}

/// `ContentApi`経由でページを更新する公開処理
///
/// 1. ページを取得し、現在のタイトルとバージョン番号を得る
///    （失敗した場合は更新を行わずに`SyncError::PageFetch`を返す）
/// 2. 本文を組み立てる
/// 3. バージョン番号 + 1 で更新する（失敗した場合は`SyncError::PageUpdate`）
#[derive(Debug)]
pub struct ConfluencePublisher<A: ContentApi> {
    api: A,
    base_url: String,
}

impl<A: ContentApi> ConfluencePublisher<A> {
    pub fn new(api: A, config: &SyncConfig) -> Self {
        Self::with_base_url(api, config.confluence_url.clone())
    }

    pub fn with_base_url(api: A, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    /// 内部の`ContentApi`への参照
    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: ContentApi> PagePublisher for ConfluencePublisher<A> {
    fn publish(
        &mut self,
        page_id: &str,
        table_markup: &str,
        label: &str,
    ) -> Result<PublishedPage, SyncError> {
        let page = self
            .api
            .get_page(page_id)
            .map_err(|e| SyncError::PageFetch {
                page_id: page_id.to_string(),
                reason: e.to_string(),
            })?;

        let document = compose_document(label, &Local::now(), table_markup);
        let next_version = page.version.number + 1;
        let update = PageUpdate::new(page.title.clone(), next_version, document);

        self.api
            .update_page(page_id, &update)
            .map_err(|e| SyncError::PageUpdate {
                page_id: page_id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(PublishedPage {
            page_id: page_id.to_string(),
            title: page.title,
            version: next_version,
            url: page_url(&self.base_url, page_id),
        })
    }
}

/// ページを更新せず、組み立てた本文をライターに書き出す公開処理
pub struct DryRunPublisher<W: Write> {
    writer: W,
    base_url: String,
}

impl<W: Write> DryRunPublisher<W> {
    pub fn new(writer: W, config: &SyncConfig) -> Self {
        Self::with_base_url(writer, config.confluence_url.clone())
    }

    pub fn with_base_url(writer: W, base_url: impl Into<String>) -> Self {
        Self {
            writer,
            base_url: base_url.into(),
        }
    }

    /// ライターを取り出す
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PagePublisher for DryRunPublisher<W> {
    fn publish(
        &mut self,
        page_id: &str,
        table_markup: &str,
        label: &str,
    ) -> Result<PublishedPage, SyncError> {
        let document = compose_document(label, &Local::now(), table_markup);

        // ラベルは`--`を含み得るためコメントには入れない
        writeln!(self.writer, "<!-- page {} -->", page_id)?;
        writeln!(self.writer, "{}", document)?;
        self.writer.flush()?;

        Ok(PublishedPage {
            page_id: page_id.to_string(),
            title: label.to_string(),
            version: 0,
            url: page_url(&self.base_url, page_id),
        })
    }
}
