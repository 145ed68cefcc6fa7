//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

/// RGB色（各チャンネル0〜255）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// 新しい色を生成
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 0.0〜1.0の浮動小数点チャンネルから生成
    ///
    /// 各チャンネルは `channel * 255` を切り捨てて整数化します。
    /// 範囲外の値は0〜255に丸められます。
    pub fn from_unit(red: f32, green: f32, blue: f32) -> Self {
        fn channel(value: f32) -> u8 {
            (value * 255.0).clamp(0.0, 255.0) as u8
        }
        Self {
            r: channel(red),
            g: channel(green),
            b: channel(blue),
        }
    }

    /// `#rrggbb`形式の文字列に変換
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// セル内テキストの水平方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    /// APIが未知の値を返した場合
    Unspecified,
}

impl HorizontalAlignment {
    /// APIの文字列表現（`LEFT`, `CENTER`, ...）から変換
    pub fn from_api(value: &str) -> Self {
        match value {
            "LEFT" => HorizontalAlignment::Left,
            "CENTER" => HorizontalAlignment::Center,
            "RIGHT" => HorizontalAlignment::Right,
            "JUSTIFY" => HorizontalAlignment::Justify,
            _ => HorizontalAlignment::Unspecified,
        }
    }

    /// CSSの`text-align`値（左寄せ・未指定の場合はNone）
    pub fn css_value(&self) -> Option<&'static str> {
        match self {
            HorizontalAlignment::Center => Some("center"),
            HorizontalAlignment::Right => Some("right"),
            HorizontalAlignment::Justify => Some("justify"),
            HorizontalAlignment::Left | HorizontalAlignment::Unspecified => None,
        }
    }
}

/// 書式付きセル
///
/// シート読み込み時に生成され、以降は変更されません。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledCell {
    /// 表示文字列（書式適用済みの値）
    pub value: String,

    /// 背景色（未設定の場合はNone）
    pub background_color: Option<Rgb>,

    /// 文字色（未設定の場合はNone）
    pub text_color: Option<Rgb>,

    pub bold: bool,
    pub italic: bool,
    pub underline: bool,

    /// 水平方向の配置
    pub horizontal_alignment: HorizontalAlignment,
}

impl StyledCell {
    /// 書式なしのセルを生成
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// 太字を設定
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// 斜体を設定
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// 下線を設定
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// 背景色を設定
    pub fn with_background(mut self, color: Rgb) -> Self {
        self.background_color = Some(color);
        self
    }

    /// 文字色を設定
    pub fn with_text_color(mut self, color: Rgb) -> Self {
        self.text_color = Some(color);
        self
    }

    /// 配置を設定
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.horizontal_alignment = alignment;
        self
    }

    /// 値が空白のみかどうか
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// グリッド（行 × セル）。行ごとのセル数は揃っていなくてもよい
pub type Grid = Vec<Vec<StyledCell>>;

/// セル結合範囲（0始まり、終端は含まない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRegion {
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl MergeRegion {
    /// 新しい結合範囲を生成
    pub fn new(start_row: usize, end_row: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start_row,
            end_row,
            start_col,
            end_col,
        }
    }

    /// 結合セルの行数
    pub fn row_span(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }

    /// 結合セルの列数
    pub fn col_span(&self) -> usize {
        self.end_col.saturating_sub(self.start_col)
    }

    /// 面積が0の範囲かどうか
    pub fn is_empty(&self) -> bool {
        self.row_span() == 0 || self.col_span() == 0
    }

    /// 指定された座標が範囲内にあるかを判定
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row < self.end_row && col >= self.start_col && col < self.end_col
    }

    /// 他の範囲と1セル以上重なるかを判定
    pub fn overlaps(&self, other: &MergeRegion) -> bool {
        self.start_row < other.end_row
            && other.start_row < self.end_row
            && self.start_col < other.end_col
            && other.start_col < self.end_col
    }
}

/// シートとページの対応付け（処理単位）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetMapping {
    /// スプレッドシートのタブ名
    pub name: String,

    /// 更新先ページのID
    pub page_id: String,
}

impl SheetMapping {
    pub fn new(name: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page_id: page_id.into(),
        }
    }
}

/// シートから読み込んだデータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    /// 書式付きセルのグリッド
    pub grid: Grid,

    /// セル結合範囲のリスト
    pub merges: Vec<MergeRegion>,
}

/// マッピング1件分の同期結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// シート名
    pub sheet_name: String,

    /// 成功時はデータ行数、失敗時はエラーメッセージ
    pub outcome: Result<usize, String>,
}

impl SyncResult {
    /// 成功結果を生成
    pub fn success(sheet_name: impl Into<String>, rows: usize) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            outcome: Ok(rows),
        }
    }

    /// 失敗結果を生成
    pub fn failure(sheet_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            outcome: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
