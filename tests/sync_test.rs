//! Integration Tests for sheetsync
//!
//! 読み込み → テーブル生成 → 公開の一連の流れを、インメモリの
//! `SheetSource`と`ContentApi`を使って検証する。

use std::cell::RefCell;
use std::collections::HashMap;

use sheetsync::confluence::PageVersion;
use sheetsync::{
    ConfluencePublisher, ContentApi, DryRunPublisher, MergeRegion, PageInfo, PageUpdate, Rgb,
    SheetData, SheetMapping, SheetSource, StyledCell, SyncConfig, SyncConfigBuilder, SyncError,
    Synchronizer,
};
use tempfile::NamedTempFile;

// Helper module for in-memory collaborators
mod fakes {
    use super::*;

    /// シート名ごとに固定のデータを返す読み込み元
    #[derive(Default)]
    pub struct StaticSource {
        pub sheets: HashMap<String, SheetData>,
        pub reads: RefCell<Vec<String>>,
    }

    impl StaticSource {
        pub fn with_sheet(mut self, name: &str, data: SheetData) -> Self {
            self.sheets.insert(name.to_string(), data);
            self
        }
    }

    impl SheetSource for StaticSource {
        fn read(&self, _spreadsheet_id: &str, sheet_name: &str) -> Result<SheetData, SyncError> {
            self.reads.borrow_mut().push(sheet_name.to_string());
            self.sheets
                .get(sheet_name)
                .cloned()
                .ok_or_else(|| SyncError::SheetNotFound {
                    sheet: sheet_name.to_string(),
                })
        }
    }

    /// ページを保持し、更新を記録するContentApi
    #[derive(Default)]
    pub struct InMemoryPages {
        pub pages: HashMap<String, PageInfo>,
        pub fetches: RefCell<Vec<String>>,
        pub updates: RefCell<Vec<(String, PageUpdate)>>,
    }

    impl InMemoryPages {
        pub fn with_page(mut self, id: &str, title: &str, version: u64) -> Self {
            self.pages.insert(
                id.to_string(),
                PageInfo {
                    id: id.to_string(),
                    title: title.to_string(),
                    version: PageVersion { number: version },
                },
            );
            self
        }
    }

    impl ContentApi for InMemoryPages {
        fn get_page(&self, page_id: &str) -> Result<PageInfo, SyncError> {
            self.fetches.borrow_mut().push(page_id.to_string());
            self.pages.get(page_id).cloned().ok_or_else(|| SyncError::Api {
                status: 404,
                body: "No content found with id".to_string(),
            })
        }

        fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<(), SyncError> {
            self.updates
                .borrow_mut()
                .push((page_id.to_string(), update.clone()));
            Ok(())
        }
    }
}

use fakes::{InMemoryPages, StaticSource};

fn config(mappings: &[(&str, &str)]) -> (SyncConfig, NamedTempFile) {
    let credentials = NamedTempFile::new().unwrap();
    let mut builder = SyncConfigBuilder::new()
        .with_confluence_url("https://wiki.example.com")
        .with_credentials("bot@example.com", "token")
        .with_spreadsheet_id("spreadsheet")
        .with_google_credentials_file(credentials.path());
    for (name, page_id) in mappings {
        builder = builder.add_mapping(SheetMapping::new(*name, *page_id));
    }
    (builder.build().unwrap(), credentials)
}

fn header_sheet() -> SheetData {
    SheetData {
        grid: vec![vec![
            StyledCell::new("Name").bold(),
            StyledCell::new("Status").bold(),
        ]],
        merges: vec![],
    }
}

#[test]
fn test_sync_single_sheet() {
    let (config, _creds) = config(&[("Metrics", "100")]);
    let source = StaticSource::default().with_sheet("Metrics", header_sheet());
    let pages = InMemoryPages::default().with_page("100", "Team metrics", 5);

    let mut sync = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    );
    let report = sync.run(&config);

    assert!(report.all_succeeded());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.results[0].outcome, Ok(1));

    let (_, publisher) = sync.into_parts();
    let updates = publisher.api().updates.borrow();
    assert_eq!(updates.len(), 1);

    let (page_id, update) = &updates[0];
    assert_eq!(page_id, "100");
    assert_eq!(update.version.number, 6);
    assert_eq!(update.title, "Team metrics");

    let body = &update.body.storage.value;
    assert_eq!(body.matches("<tr>").count(), 1);
    assert!(body.contains(
        "<td><p><strong>Name</strong></p></td><td><p><strong>Status</strong></p></td>"
    ));
    assert!(body.contains(">Metrics</h1>"));
}

#[test]
fn test_empty_sheet_fails_and_run_continues() {
    let (config, _creds) = config(&[("Empty", "1"), ("Metrics", "2")]);
    let source = StaticSource::default()
        .with_sheet("Empty", SheetData::default())
        .with_sheet("Metrics", header_sheet());
    let pages = InMemoryPages::default()
        .with_page("1", "Empty page", 1)
        .with_page("2", "Metrics page", 1);

    let mut sync = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    );
    let report = sync.run(&config);

    assert_eq!(report.total(), 2);
    assert_eq!(report.successful(), 1);
    assert_eq!(report.exit_code(), 1);

    let failure = &report.results[0];
    assert_eq!(failure.sheet_name, "Empty");
    assert!(failure.outcome.as_ref().unwrap_err().contains("No data read"));
    assert!(report.results[1].is_success());

    // 空シートのページには触れない
    let (_, publisher) = sync.into_parts();
    assert_eq!(*publisher.api().fetches.borrow(), vec!["2".to_string()]);
}

#[test]
fn test_only_empty_sheet_exits_non_zero() {
    let (config, _creds) = config(&[("Empty", "1")]);
    let source = StaticSource::default().with_sheet("Empty", SheetData::default());
    let pages = InMemoryPages::default().with_page("1", "Empty page", 1);

    let report = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    )
    .run(&config);

    assert_eq!(report.successful(), 0);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_blank_rows_only_publishes_empty_table() {
    let (config, _creds) = config(&[("Blank", "1")]);
    let source = StaticSource::default().with_sheet(
        "Blank",
        SheetData {
            grid: vec![vec![StyledCell::new(" "), StyledCell::new("")]],
            merges: vec![],
        },
    );
    let pages = InMemoryPages::default().with_page("1", "Blank page", 1);

    let mut sync = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    );
    let report = sync.run(&config);

    assert_eq!(report.results[0].outcome, Ok(0));
    assert_eq!(report.exit_code(), 0);

    let (_, publisher) = sync.into_parts();
    let updates = publisher.api().updates.borrow();
    assert_eq!(updates.len(), 1);

    let body = &updates[0].1.body.storage.value;
    assert!(body.contains("<colgroup><col /><col /></colgroup><tbody></tbody></table>"));
    assert!(!body.contains("<tr>"));
}

#[test]
fn test_rows_without_cells_is_empty_table() {
    let (config, _creds) = config(&[("Hollow", "1")]);
    let source = StaticSource::default().with_sheet(
        "Hollow",
        SheetData {
            grid: vec![vec![], vec![]],
            merges: vec![],
        },
    );
    let pages = InMemoryPages::default().with_page("1", "Hollow page", 1);

    let mut sync = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    );
    let report = sync.run(&config);

    let outcome = &report.results[0].outcome;
    assert!(outcome.as_ref().unwrap_err().contains("Empty table"));

    let (_, publisher) = sync.into_parts();
    assert!(publisher.api().fetches.borrow().is_empty());
}

#[test]
fn test_missing_sheet_and_missing_page() {
    let (config, _creds) = config(&[("Missing", "1"), ("Metrics", "404")]);
    let source = StaticSource::default().with_sheet("Metrics", header_sheet());
    let pages = InMemoryPages::default();

    let mut sync = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    );
    let report = sync.run(&config);

    assert_eq!(report.successful(), 0);
    assert_eq!(
        report.results[0].outcome,
        Err("Sheet 'Missing' not found".to_string())
    );
    let page_error = report.results[1].outcome.as_ref().unwrap_err();
    assert!(page_error.starts_with("Failed to fetch page 404"));

    // ページ取得に失敗した場合は更新しない
    let (source, publisher) = sync.into_parts();
    assert_eq!(
        *source.reads.borrow(),
        vec!["Missing".to_string(), "Metrics".to_string()]
    );
    assert!(publisher.api().updates.borrow().is_empty());

    let summary = report.render_summary();
    assert!(summary.contains("Successful: 0/2"));
    assert!(summary.contains("Failed: 2"));
}

#[test]
fn test_merged_and_colored_sheet() {
    let (config, _creds) = config(&[("Plan", "9")]);
    let data = SheetData {
        grid: vec![
            vec![
                StyledCell::new("Q1 & Q2").with_background(Rgb::new(66, 133, 244)),
                StyledCell::new(""),
                StyledCell::new("Owner"),
            ],
            vec![
                StyledCell::new(""),
                StyledCell::new(""),
                StyledCell::new("Ana").with_text_color(Rgb::new(234, 67, 53)),
            ],
        ],
        merges: vec![MergeRegion::new(0, 2, 0, 2)],
    };
    let source = StaticSource::default().with_sheet("Plan", data);
    let pages = InMemoryPages::default().with_page("9", "Plan", 41);

    let mut sync = Synchronizer::new(
        source,
        ConfluencePublisher::with_base_url(pages, "https://wiki.example.com"),
    );
    let report = sync.run(&config);
    assert_eq!(report.results[0].outcome, Ok(2));

    let (_, publisher) = sync.into_parts();
    let updates = publisher.api().updates.borrow();
    let body = &updates[0].1.body.storage.value;

    assert!(body.contains(
        "<td colspan=\"2\" rowspan=\"2\" data-highlight-colour=\"blue\"><p>Q1 &amp; Q2</p></td>"
    ));
    assert!(body.contains("<tr><td><p><span style=\"color:red\">Ana</span></p></td></tr>"));
    assert_eq!(updates[0].1.version.number, 42);
}

#[test]
fn test_dry_run_writes_documents() {
    let (config, _creds) = config(&[("Metrics", "100"), ("Missing", "200")]);
    let source = StaticSource::default().with_sheet("Metrics", header_sheet());

    let mut sync = Synchronizer::new(
        source,
        DryRunPublisher::with_base_url(Vec::new(), "https://wiki.example.com"),
    );
    let report = sync.run(&config);
    assert_eq!(report.successful(), 1);

    let (_, publisher) = sync.into_parts();
    let output = String::from_utf8(publisher.into_inner()).unwrap();
    assert!(output.starts_with("<!-- page 100 -->\n"));
    assert!(output.contains(">Metrics</h1>"));
    assert_eq!(output.matches("<table").count(), 1);
    assert!(!output.contains("page 200"));
}
