//! Synchronization Module
//!
//! 設定されたマッピングを順に処理し、読み込み → テーブル生成 → 公開を行う。

use crate::color::classify;
use crate::config::SyncConfig;
use crate::confluence::PagePublisher;
use crate::error::SyncError;
use crate::grid::render;
use crate::report::SyncReport;
use crate::sheets::SheetSource;
use crate::types::{Grid, SheetMapping, SyncResult};

/// 色サンプルとしてログに出す行数
const COLOR_SAMPLE_ROWS: usize = 3;

/// 同期処理のファサード
///
/// マッピングは1件ずつ順番に処理されます。1件の失敗は記録されるだけで、
/// 残りのマッピングの処理は継続されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetsync::{ConfluenceClient, ConfluencePublisher, GoogleSheetsClient, SyncConfig, Synchronizer};
///
/// # fn main() -> Result<(), sheetsync::SyncError> {
/// let config = SyncConfig::from_env()?;
/// let source = GoogleSheetsClient::connect(&config)?;
/// let publisher = ConfluencePublisher::new(ConfluenceClient::new(&config)?, &config);
///
/// let report = Synchronizer::new(source, publisher).run(&config);
/// println!("{}", report.render_summary());
/// # Ok(())
/// # }
/// ```
pub struct Synchronizer<S: SheetSource, P: PagePublisher> {
    source: S,
    publisher: P,
}

impl<S: SheetSource, P: PagePublisher> Synchronizer<S, P> {
    pub fn new(source: S, publisher: P) -> Self {
        Self { source, publisher }
    }

    /// すべてのマッピングを処理する
    pub fn run(&mut self, config: &SyncConfig) -> SyncReport {
        tracing::info!(
            "Synchronizing {} sheet(s) from spreadsheet {}",
            config.mappings.len(),
            config.spreadsheet_id
        );

        let mut report = SyncReport::new();
        for mapping in &config.mappings {
            tracing::info!("Processing '{}' -> page {}", mapping.name, mapping.page_id);

            let result = match self.sync_mapping(&config.spreadsheet_id, mapping) {
                Ok(rows) => SyncResult::success(&mapping.name, rows),
                Err(e) => {
                    tracing::warn!("Sheet '{}' failed: {}", mapping.name, e);
                    SyncResult::failure(&mapping.name, e.to_string())
                }
            };
            report.push(result);
        }

        tracing::info!(
            "Finished: {}/{} successful",
            report.successful(),
            report.total()
        );
        report
    }

    /// マッピング1件を処理し、データ行数を返す
    pub fn sync_mapping(
        &mut self,
        spreadsheet_id: &str,
        mapping: &SheetMapping,
    ) -> Result<usize, SyncError> {
        // 1. 読み込み
        let data = self.source.read(spreadsheet_id, &mapping.name)?;
        if data.grid.is_empty() {
            return Err(SyncError::EmptyData {
                sheet: mapping.name.clone(),
            });
        }

        tracing::info!("Read {} row(s)", data.grid.len());
        if !data.merges.is_empty() {
            tracing::info!("Detected {} merged region(s)", data.merges.len());
        }
        log_color_sample(&data.grid);

        // 2. テーブル生成
        let table = render(&data.grid, &data.merges);
        if table.is_empty() {
            return Err(SyncError::EmptyTable {
                sheet: mapping.name.clone(),
            });
        }
        tracing::info!("Generated table with {} data row(s)", table.data_rows);

        // 3. 公開
        let published = self
            .publisher
            .publish(&mapping.page_id, &table.markup, &mapping.name)?;
        tracing::info!(
            "Updated page '{}' to version {}: {}",
            published.title,
            published.version,
            published.url
        );

        Ok(table.data_rows)
    }

    /// 内部の読み込み元と公開先を取り出す
    pub fn into_parts(self) -> (S, P) {
        (self.source, self.publisher)
    }
}

/// 先頭数行の1列目の背景色をログに出す（内部ヘルパー）
fn log_color_sample(grid: &Grid) {
    for (idx, row) in grid.iter().take(COLOR_SAMPLE_ROWS).enumerate() {
        let Some(first) = row.first() else {
            continue;
        };
        match first.background_color {
            Some(color) => tracing::debug!(
                "Row {}: background={} ({})",
                idx + 1,
                color.to_hex(),
                classify(Some(color)).map_or("none", |c| c.as_str())
            ),
            None => tracing::debug!("Row {}: background=none", idx + 1),
        }
    }
}
