//! Page Document Composition
//!
//! ページ本文（ストレージ形式）を組み立てる。本文は固定構成で、
//! 見出しパネル、テーブル、案内パネルの順に並びます。

use chrono::{DateTime, TimeZone};

/// タイムスタンプの表示形式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ページ本文を組み立てる
///
/// # 引数
///
/// * `label` - 見出しに表示する名前（シート名）
/// * `synced_at` - 同期時刻
/// * `table_markup` - `render`で生成したテーブル
pub fn compose_document<Tz>(label: &str, synced_at: &DateTime<Tz>, table_markup: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let label = quick_xml::escape::escape(label);
    let timestamp = synced_at.format(TIMESTAMP_FORMAT);

    format!(
        r##"<ac:structured-macro ac:name="panel" ac:schema-version="1">
<ac:parameter ac:name="borderStyle">solid</ac:parameter>
<ac:parameter ac:name="borderColor">#4285f4</ac:parameter>
<ac:parameter ac:name="bgColor">#f8f9fa</ac:parameter>
<ac:rich-text-body>
<h1 style="color: #4285f4; margin: 0;">{label}</h1>
<p style="color: #666; margin: 5px 0 0 0;"><em>Last synchronized: {timestamp}</em></p>
</ac:rich-text-body>
</ac:structured-macro>

<p></p>

{table_markup}

<p></p>

<ac:structured-macro ac:name="info" ac:schema-version="1">
<ac:rich-text-body>
<p><strong>Imported automatically</strong></p>
<p>This table is synchronized from Google Sheets. Edits made on this page will be overwritten on the next run.</p>
</ac:rich-text-body>
</ac:structured-macro>"##
    )
}
