//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetsyncクレート全体で使用するエラー型
///
/// 設定の読み込み、スプレッドシートの取得、ページの更新処理中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Config`: 起動時の設定エラー（致命的。処理開始前に終了する）
/// - `SheetNotFound` / `EmptyData` / `EmptyTable`: シート単位のデータエラー
/// - `PageFetch` / `PageUpdate`: ページ単位の公開エラー
/// - `Http` / `Api` / `Json` / `Auth` / `Io`: 外部APIとの通信・解析エラー
///
/// シート単位のエラーは記録されるだけで、残りのマッピングの処理は継続されます。
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O操作中に発生したエラー
    ///
    /// 認証情報ファイルの読み込み失敗、出力書き込み失敗などで使用されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP通信中に発生したエラー（接続失敗、タイムアウトなど）
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSONの解析・生成エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// APIが成功以外のステータスを返したエラー
    ///
    /// `body`にはサーバーが返したレスポンス本文がそのまま入ります。
    #[error("API returned status {status}: {body}")]
    Api {
        /// HTTPステータスコード
        status: u16,
        /// レスポンス本文
        body: String,
    },

    /// サービスアカウント認証の失敗
    #[error("Authentication error: {0}")]
    Auth(String),

    /// 設定の検証に失敗したエラー
    ///
    /// 必須の環境変数が欠けている、認証情報ファイルが存在しない、
    /// シートのマッピングが1件もない場合などに発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use sheetsync::{SyncConfigBuilder, SyncError};
    ///
    /// let result = SyncConfigBuilder::new().build();
    ///
    /// match result {
    ///     Err(SyncError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 指定された名前のシートがスプレッドシートに存在しない
    #[error("Sheet '{sheet}' not found")]
    SheetNotFound {
        /// 探したシート名
        sheet: String,
    },

    /// シートからデータ行が1行も読み込めなかった
    #[error("No data read from sheet '{sheet}'")]
    EmptyData {
        /// シート名
        sheet: String,
    },

    /// グリッドからテーブルが生成できなかった
    #[error("Empty table generated for sheet '{sheet}'")]
    EmptyTable {
        /// シート名
        sheet: String,
    },

    /// 更新対象ページの取得に失敗した
    ///
    /// このエラーが発生した場合、更新処理は実行されません。
    #[error("Failed to fetch page {page_id}: {reason}")]
    PageFetch {
        /// ページID
        page_id: String,
        /// 失敗理由
        reason: String,
    },

    /// ページの更新に失敗した（認証エラー、バージョン競合など）
    #[error("Failed to update page {page_id}: {reason}")]
    PageUpdate {
        /// ページID
        page_id: String,
        /// 失敗理由
        reason: String,
    },
}
