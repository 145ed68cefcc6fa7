//! Sheets API Response Model
//!
//! Sheets API v4の`spreadsheets.get`レスポンスのうち、同期に必要な部分だけを
//! 表すserde型と、それを`Grid`/`MergeRegion`へ変換する処理。

use serde::Deserialize;

use crate::types::{Grid, HorizontalAlignment, MergeRegion, Rgb, StyledCell};

/// スプレッドシート全体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spreadsheet {
    pub sheets: Vec<Sheet>,
}

impl Spreadsheet {
    /// タイトルが一致するシートを探す
    pub fn find_sheet(&self, title: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.properties.title == title)
    }
}

/// シート1枚分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sheet {
    pub properties: SheetProperties,
    pub merges: Vec<GridRange>,
    pub data: Vec<GridData>,
}

impl Sheet {
    /// 結合範囲のリストに変換
    pub fn merge_regions(&self) -> Vec<MergeRegion> {
        self.merges.iter().map(GridRange::to_merge_region).collect()
    }

    /// 最初のデータブロックを書式付きセルのグリッドに変換
    ///
    /// データブロックがない場合は空のグリッドを返します。
    pub fn to_grid(&self) -> Grid {
        let Some(block) = self.data.first() else {
            return Grid::new();
        };

        block
            .row_data
            .iter()
            .map(|row| row.values.iter().map(CellData::to_styled_cell).collect())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetProperties {
    pub sheet_id: Option<i64>,
    pub title: String,
}

/// グリッド上の範囲（終端は含まない）
///
/// APIは値が0のフィールドを省略するため、欠けたインデックスは0として扱います。
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridRange {
    pub start_row_index: usize,
    pub end_row_index: usize,
    pub start_column_index: usize,
    pub end_column_index: usize,
}

impl GridRange {
    pub fn to_merge_region(&self) -> MergeRegion {
        MergeRegion::new(
            self.start_row_index,
            self.end_row_index,
            self.start_column_index,
            self.end_column_index,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridData {
    pub row_data: Vec<RowData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RowData {
    pub values: Vec<CellData>,
}

/// セル1つ分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellData {
    pub formatted_value: Option<String>,
    pub effective_format: Option<CellFormat>,
}

impl CellData {
    /// 表示値と実効書式から`StyledCell`を生成
    pub fn to_styled_cell(&self) -> StyledCell {
        let mut cell = StyledCell::new(self.formatted_value.clone().unwrap_or_default());

        let Some(format) = &self.effective_format else {
            return cell;
        };

        cell.background_color = resolve_color(
            format.background_color.as_ref(),
            format.background_color_style.as_ref(),
        );

        if let Some(text) = &format.text_format {
            cell.text_color = resolve_color(
                text.foreground_color.as_ref(),
                text.foreground_color_style.as_ref(),
            );
            cell.bold = text.bold;
            cell.italic = text.italic;
            cell.underline = text.underline;
        }

        if let Some(alignment) = &format.horizontal_alignment {
            cell.horizontal_alignment = HorizontalAlignment::from_api(alignment);
        }

        cell
    }
}

/// 旧形式の色フィールドを優先し、なければ`*Style.rgbColor`を使う
fn resolve_color(color: Option<&Color>, style: Option<&ColorStyle>) -> Option<Rgb> {
    color
        .and_then(Color::to_rgb)
        .or_else(|| style.and_then(|s| s.rgb_color.as_ref()).and_then(Color::to_rgb))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellFormat {
    pub background_color: Option<Color>,
    pub background_color_style: Option<ColorStyle>,
    pub text_format: Option<TextFormat>,
    pub horizontal_alignment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFormat {
    pub foreground_color: Option<Color>,
    pub foreground_color_style: Option<ColorStyle>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorStyle {
    pub rgb_color: Option<Color>,
}

/// APIの色（各チャンネル0.0〜1.0）
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Color {
    pub red: Option<f32>,
    pub green: Option<f32>,
    pub blue: Option<f32>,
}

impl Color {
    /// RGBに変換する
    ///
    /// チャンネルが1つも含まれない色オブジェクト（`{}`）は未設定として扱います。
    /// それ以外で欠けたチャンネルは0です。
    pub fn to_rgb(&self) -> Option<Rgb> {
        if self.red.is_none() && self.green.is_none() && self.blue.is_none() {
            return None;
        }
        Some(Rgb::from_unit(
            self.red.unwrap_or(0.0),
            self.green.unwrap_or(0.0),
            self.blue.unwrap_or(0.0),
        ))
    }
}
