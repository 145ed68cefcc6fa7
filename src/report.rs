//! Report Module
//!
//! 実行全体の同期結果を集計し、コンソール向けの要約テーブルを生成するモジュール。

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::types::SyncResult;

/// 1回の実行の同期結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub results: Vec<SyncResult>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: SyncResult) {
        self.results.push(result);
    }

    /// 成功したマッピング数
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// 処理したマッピング数
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }

    /// すべてのマッピングが成功したかどうか
    pub fn all_succeeded(&self) -> bool {
        self.successful() == self.total()
    }

    /// プロセスの終了コード（すべて成功で0、それ以外は1）
    pub fn exit_code(&self) -> u8 {
        if self.all_succeeded() {
            0
        } else {
            1
        }
    }

    /// 要約を生成する
    ///
    /// 成功数の行に続いて、シートごとの結果をMarkdown形式のテーブルで出力します。
    /// 列幅は表示幅（全角文字は2）で揃えます。
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Successful: {}/{}", self.successful(), self.total());
        if self.failed() > 0 {
            let _ = writeln!(out, "Failed: {}", self.failed());
        }
        if self.results.is_empty() {
            return out;
        }

        let header = ["Sheet", "Status", "Detail"];
        let rows: Vec<[String; 3]> = self
            .results
            .iter()
            .map(|result| match &result.outcome {
                Ok(rows) => [
                    result.sheet_name.clone(),
                    "ok".to_string(),
                    format!("{} rows", rows),
                ],
                Err(message) => [
                    result.sheet_name.clone(),
                    "FAILED".to_string(),
                    message.clone(),
                ],
            })
            .collect();

        let widths = column_widths(&header, &rows);

        out.push('\n');
        push_row(&mut out, header.iter().map(|s| s.to_string()), &widths);
        out.push_str(&separator(&widths));
        out.push('\n');
        for row in &rows {
            push_row(&mut out, row.iter().cloned(), &widths);
        }

        out
    }
}

/// 列幅を計算（内部ヘルパー）
///
/// 最小幅は3文字（区切り行の最小幅）。
fn column_widths(header: &[&str; 3], rows: &[[String; 3]]) -> [usize; 3] {
    let mut widths = [3; 3];
    for (col, title) in header.iter().enumerate() {
        widths[col] = widths[col].max(title.width());
    }
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.trim().width());
        }
    }
    widths
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize; 3]) {
    out.push('|');
    for (cell, &width) in cells.zip(widths.iter()) {
        let content = cell.trim();
        out.push(' ');
        out.push_str(content);
        out.push_str(&" ".repeat(width.saturating_sub(content.width())));
        out.push_str(" |");
    }
    out.push('\n');
}

/// ヘッダー区切り行を生成（内部ヘルパー）
fn separator(widths: &[usize; 3]) -> String {
    let mut line = String::from("|");
    for &width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('|');
    }
    line
}
