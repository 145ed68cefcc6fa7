//! Color Classification Module
//!
//! RGB色をページ側で使用できる定義済みの色カテゴリに変換するモジュール。
//! ページ側はgrey, blue, green, red, yellow, purpleの6色のみ受け付けるため、
//! 任意の色を最も近いカテゴリへ多対一で写像します。

use crate::types::Rgb;

/// 色カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    Grey,
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
}

impl ColorCategory {
    /// マークアップで使用する名前
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCategory::Grey => "grey",
            ColorCategory::Blue => "blue",
            ColorCategory::Green => "green",
            ColorCategory::Red => "red",
            ColorCategory::Yellow => "yellow",
            ColorCategory::Purple => "purple",
        }
    }
}

impl std::fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 色をカテゴリに分類する
///
/// 以下の規則を順に評価し、最初に一致したものを返します。
///
/// 1. 白に近い色（全チャンネル > 240）→ なし
/// 2. 灰色に近い色（チャンネル間の差がすべて < 30）→ 最大チャンネル < 180なら`Grey`、それ以外はなし
/// 3. 青が最大 → `Blue`
/// 4. 緑が最大 → `Green`
/// 5. 赤が最大 → `Red`
/// 6. 赤・緑 > 150 かつ 青 < 150 → `Yellow`
/// 7. 赤・青 > 100 かつ 緑 < 150 → `Purple`
/// 8. それ以外 → なし
///
/// 規則の順序と閾値は意図的に非対称です。視覚的には色付きでも
/// なしに分類される組み合わせがあります。
///
/// # 使用例
///
/// ```rust
/// use sheetsync::{classify, ColorCategory, Rgb};
///
/// assert_eq!(classify(Some(Rgb::new(66, 133, 244))), Some(ColorCategory::Blue));
/// assert_eq!(classify(Some(Rgb::new(255, 255, 255))), None);
/// assert_eq!(classify(None), None);
/// ```
pub fn classify(color: Option<Rgb>) -> Option<ColorCategory> {
    let Rgb { r, g, b } = color?;
    let (r, g, b) = (i16::from(r), i16::from(g), i16::from(b));

    if r > 240 && g > 240 && b > 240 {
        return None;
    }

    if (r - g).abs() < 30 && (g - b).abs() < 30 && (r - b).abs() < 30 {
        return if r.max(g).max(b) < 180 {
            Some(ColorCategory::Grey)
        } else {
            None
        };
    }

    if b > r && b > g {
        return Some(ColorCategory::Blue);
    }

    if g > r && g > b {
        return Some(ColorCategory::Green);
    }

    if r > g && r > b {
        return Some(ColorCategory::Red);
    }

    if r > 150 && g > 150 && b < 150 {
        return Some(ColorCategory::Yellow);
    }

    if r > 100 && b > 100 && g < 150 {
        return Some(ColorCategory::Purple);
    }

    None
}
