//! sheetsync - Mirror Google Sheets tabs into Confluence pages
//!
//! スプレッドシートの各シートを、値と見た目の書式（背景色、文字色、太字・斜体・下線、
//! セル結合）を保ったままページのテーブルとして反映するためのクレートです。
//!
//! 処理は1回の実行で完結し、状態は保持しません。
//!
//! 1. `SheetSource` - シートの値・書式・結合範囲を読み込む
//! 2. `render` - 書式付きグリッドをテーブルマークアップに変換する
//! 3. `PagePublisher` - ページのバージョンを上げて本文を置き換える
//! 4. `Synchronizer` - 上記をマッピングごとに順に実行し、結果を集計する
//!
//! # テーブル生成
//!
//! ```rust
//! use sheetsync::{render, MergeRegion, Rgb, StyledCell};
//!
//! let grid = vec![
//!     vec![StyledCell::new("Team").bold(), StyledCell::new("Q1").bold()],
//!     vec![
//!         StyledCell::new("Platform"),
//!         StyledCell::new("On track").with_background(Rgb::new(52, 168, 83)),
//!     ],
//! ];
//!
//! let table = render(&grid, &[]);
//! assert_eq!(table.data_rows, 2);
//! assert!(table.markup.contains("data-highlight-colour=\"green\""));
//! ```
//!
//! # 同期の実行
//!
//! ```rust,no_run
//! use sheetsync::{ConfluenceClient, ConfluencePublisher, GoogleSheetsClient, SyncConfig, Synchronizer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyncConfig::from_env()?;
//!     let source = GoogleSheetsClient::connect(&config)?;
//!     let publisher = ConfluencePublisher::new(ConfluenceClient::new(&config)?, &config);
//!
//!     let report = Synchronizer::new(source, publisher).run(&config);
//!     println!("{}", report.render_summary());
//!     std::process::exit(i32::from(report.exit_code()));
//! }
//! ```

mod color;
mod config;
pub mod confluence;
mod error;
mod grid;
mod report;
pub mod sheets;
mod sync;
mod types;

// 公開API
pub use color::{classify, ColorCategory};
pub use config::{SyncConfig, SyncConfigBuilder};
pub use confluence::{
    ConfluenceClient, ConfluencePublisher, ContentApi, DryRunPublisher, PageInfo, PagePublisher,
    PageUpdate, PublishedPage,
};
pub use error::SyncError;
pub use grid::{render, RenderedTable};
pub use report::SyncReport;
pub use sheets::{GoogleSheetsClient, SheetSource};
pub use sync::Synchronizer;
pub use types::{
    Grid, HorizontalAlignment, MergeRegion, Rgb, SheetData, SheetMapping, StyledCell, SyncResult,
};
