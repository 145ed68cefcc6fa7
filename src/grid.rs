//! Grid Module
//!
//! 書式付きセルのグリッドとセル結合情報から、ページのストレージ形式の
//! テーブルマークアップを生成するモジュール。

use std::collections::HashMap;

use quick_xml::escape::escape;

use crate::color::classify;
use crate::types::{MergeRegion, StyledCell};

/// 生成されたテーブル
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTable {
    /// テーブルのマークアップ（生成できなかった場合は空文字列）
    pub markup: String,

    /// 出力されたデータ行数（空行は含まない）
    pub data_rows: usize,
}

impl RenderedTable {
    /// テーブルが生成されなかったかどうか
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }
}

/// 結合セル内の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeSlot {
    /// 結合範囲の起点セル
    Anchor { colspan: usize, rowspan: usize },
    /// 起点セルに含まれるため出力しないセル
    Skip,
}

/// セル座標から結合情報を引くためのインデックス
#[derive(Debug, Default)]
struct MergeIndex {
    slots: HashMap<(usize, usize), MergeSlot>,
}

impl MergeIndex {
    /// 結合範囲のリストからインデックスを構築
    ///
    /// # 引数
    ///
    /// * `merges` - 結合範囲のリスト（元のグリッド座標）
    /// * `kept_rows` - 出力される行のインデックス（昇順）
    /// * `rows` - グリッドの行数
    /// * `cols` - グリッドの列数
    ///
    /// 範囲はグリッドの境界で切り詰められ、面積0の範囲は無視されます。
    /// 既に登録済みの範囲と重なる範囲は、先に登録された方を優先して破棄します。
    /// 行数は空行を除いた後の行で数え直し、起点行が空行として除外された場合は
    /// 範囲内で最初に残る行を起点にします。
    fn build(merges: &[MergeRegion], kept_rows: &[usize], rows: usize, cols: usize) -> Self {
        let mut index = MergeIndex::default();
        let mut accepted: Vec<MergeRegion> = Vec::with_capacity(merges.len());

        for region in merges {
            let clipped = MergeRegion::new(
                region.start_row,
                region.end_row.min(rows),
                region.start_col,
                region.end_col.min(cols),
            );
            if clipped.is_empty() {
                continue;
            }

            if let Some(existing) = accepted.iter().find(|r| r.overlaps(&clipped)) {
                tracing::warn!(
                    "Ignoring merge region {:?}: overlaps previously accepted region {:?}",
                    region,
                    existing
                );
                continue;
            }
            accepted.push(clipped);

            let surviving: Vec<usize> = kept_rows
                .iter()
                .copied()
                .filter(|&row| row >= clipped.start_row && row < clipped.end_row)
                .collect();

            // 範囲内の行がすべて空行として除外された
            let Some(&anchor_row) = surviving.first() else {
                continue;
            };

            for row in clipped.start_row..clipped.end_row {
                for col in clipped.start_col..clipped.end_col {
                    index.slots.insert((row, col), MergeSlot::Skip);
                }
            }

            index.slots.insert(
                (anchor_row, clipped.start_col),
                MergeSlot::Anchor {
                    colspan: clipped.col_span(),
                    rowspan: surviving.len(),
                },
            );
        }

        index
    }

    fn get(&self, row: usize, col: usize) -> Option<MergeSlot> {
        self.slots.get(&(row, col)).copied()
    }
}

/// グリッドをテーブルマークアップに変換する
///
/// # 引数
///
/// * `grid` - 書式付きセルの行（行ごとのセル数は不揃いでもよい）
/// * `merges` - セル結合範囲のリスト
///
/// # 戻り値
///
/// マークアップとデータ行数。グリッドが空（列数0）の場合は空のマークアップと
/// 0行を返します。すべての行が空行の場合は、行のないテーブルと0行を返します。
///
/// # 処理内容
///
/// 1. 列数 = 最も長い行のセル数
/// 2. 値が空白のみの行は出力せず、行数にも数えない
/// 3. 短い行は書式なしの空セルで埋める
/// 4. 結合範囲の起点セルに`colspan`/`rowspan`属性を付与し、残りのセルは出力しない
/// 5. 背景色が色カテゴリに分類された場合は`data-highlight-colour`属性を付与
///
/// # 使用例
///
/// ```rust
/// use sheetsync::{render, StyledCell};
///
/// let grid = vec![vec![StyledCell::new("Name").bold(), StyledCell::new("Status").bold()]];
/// let table = render(&grid, &[]);
///
/// assert_eq!(table.data_rows, 1);
/// assert!(table.markup.contains("<strong>Name</strong>"));
/// ```
pub fn render(grid: &[Vec<StyledCell>], merges: &[MergeRegion]) -> RenderedTable {
    // 1. 列数の決定
    let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
    if cols == 0 {
        return RenderedTable::default();
    }

    // 2. 出力対象の行
    let kept_rows: Vec<usize> = grid
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.is_blank()))
        .map(|(idx, _)| idx)
        .collect();

    // 3. 結合インデックス
    let merge_index = MergeIndex::build(merges, &kept_rows, grid.len(), cols);

    // 4. テーブル出力
    let blank = StyledCell::default();
    let mut markup = String::from("<table data-layout=\"full-width\"><colgroup>");
    markup.push_str(&"<col />".repeat(cols));
    markup.push_str("</colgroup><tbody>");

    for &row_idx in &kept_rows {
        let row = &grid[row_idx];
        markup.push_str("<tr>");

        for col_idx in 0..cols {
            let slot = merge_index.get(row_idx, col_idx);
            if slot == Some(MergeSlot::Skip) {
                continue;
            }

            let cell = row.get(col_idx).unwrap_or(&blank);
            markup.push_str(&render_cell(cell, slot));
        }

        markup.push_str("</tr>");
    }

    markup.push_str("</tbody></table>");

    RenderedTable {
        markup,
        data_rows: kept_rows.len(),
    }
}

/// セル1つ分の`<td>`要素を生成（内部ヘルパー）
fn render_cell(cell: &StyledCell, slot: Option<MergeSlot>) -> String {
    let mut attrs = Vec::new();

    if let Some(MergeSlot::Anchor { colspan, rowspan }) = slot {
        if colspan > 1 {
            attrs.push(format!("colspan=\"{}\"", colspan));
        }
        if rowspan > 1 {
            attrs.push(format!("rowspan=\"{}\"", rowspan));
        }
    }

    if let Some(category) = classify(cell.background_color) {
        attrs.push(format!("data-highlight-colour=\"{}\"", category));
    }

    let attrs = if attrs.is_empty() {
        String::new()
    } else {
        format!(" {}", attrs.join(" "))
    };

    let paragraph = match cell.horizontal_alignment.css_value() {
        Some(align) => format!("<p style=\"text-align: {};\">", align),
        None => "<p>".to_string(),
    };

    format!("<td{}>{}{}</p></td>", attrs, paragraph, cell_content(cell))
}

/// セルの内容をエスケープし、文字書式を適用（内部ヘルパー）
///
/// 内側から順に太字、斜体、下線、文字色を適用します。
/// 結果が空白のみの場合は`<br/>`を返します。
fn cell_content(cell: &StyledCell) -> String {
    let mut content = escape(cell.value.as_str()).into_owned();

    if cell.bold {
        content = format!("<strong>{}</strong>", content);
    }
    if cell.italic {
        content = format!("<em>{}</em>", content);
    }
    if cell.underline {
        content = format!("<u>{}</u>", content);
    }

    if let Some(category) = classify(cell.text_color) {
        content = format!("<span style=\"color:{}\">{}</span>", category, content);
    }

    if content.trim().is_empty() {
        return "<br/>".to_string();
    }

    content
}
