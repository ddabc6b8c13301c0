//! Fixed-order rendering pipeline from a parsed grid to display tables.
//!
//! Merges and summaries address cells by final physical position, so the
//! stages always run in the same order:
//!
//! 1. project the row window and column selection
//! 2. format numbers
//! 3. hide rows with blank monitored cells
//! 4. drop empty columns (header and body together)
//! 5. summary rows
//! 6. cell merges
//! 7. styling rules
//!
//! A view whose window is empty skips stages 3 to 7 and renders a single
//! placeholder row instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetview::config::AppConfig;
//! use sheetview::fetch::SheetClient;
//! use sheetview::transform::pipeline::load_views;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load("configs/results.json")?;
//!     let tables = load_views(&SheetClient::new(), &config).await?;
//!     println!("Rendered {} views", tables.len());
//!     Ok(())
//! }
//! ```

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::config::{AppConfig, ColorTable, ViewDefinition};
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::fetch::SheetClient;
use crate::lookup::{lookup, DetailRecord, RecordSource};
use crate::models::{Cell, DisplayTable, Grid, Row};

use super::compactor::compact;
use super::filter::hide_empty;
use super::formatter::format_numbers;
use super::merger::{merge_cells, merge_summary};
use super::projector::{project, window_keys};
use super::styler::apply_rule;

/// Text of the placeholder row of an empty view ("no data found").
pub const EMPTY_VIEW_MESSAGE: &str = "কোন ডেটা পাওয়া যায়নি";

/// Shown when the detail record key is absent ("roll number not found").
pub const RECORD_NOT_FOUND_MESSAGE: &str = "রোল নম্বর পাওয়া যায়নি";

/// Shown when a sheet cannot be loaded ("problem loading data").
pub const LOAD_FAILED_MESSAGE: &str = "ডাটা লোড করতে সমস্যা হয়েছে";

/// Renders one view definition.
pub struct ViewPipeline<'a> {
    view: &'a ViewDefinition,
    colors: &'a ColorTable,
}

impl<'a> ViewPipeline<'a> {
    pub fn new(view: &'a ViewDefinition, colors: &'a ColorTable) -> Self {
        Self { view, colors }
    }

    /// Static header rows of the view.
    pub fn header(&self) -> Vec<Row> {
        self.view
            .header
            .iter()
            .map(|cells| {
                Row::new(
                    cells
                        .iter()
                        .map(|h| {
                            Cell::new(h.text.clone())
                                .with_col_span(h.col_span)
                                .with_row_span(h.row_span)
                        })
                        .collect(),
                )
            })
            .collect()
    }

    /// Run every stage over `grid`.
    pub fn run(&self, grid: &Grid) -> DisplayTable {
        let view = self.view;
        let config = view.view_config();
        let mut header = self.header();

        let mut body = project(grid, &config).rows;
        if let Some(key_column) = view.detail_key_column {
            for (row, key) in body.iter_mut().zip(window_keys(grid, &config, key_column)) {
                row.detail_key = Some(key);
            }
        }
        log_info_indent(format!("{}: {} rows projected", view.id, body.len()), 1);

        let formatted = format_numbers(&mut body, view.format_numbers);
        if formatted > 0 {
            log_info_indent(format!("{} numbers formatted", formatted), 2);
        }

        if body.is_empty() {
            log_warning(format!("{}: no rows in window", view.id));
            let placeholder =
                Cell::new(EMPTY_VIEW_MESSAGE).with_col_span(view.columns.len());
            return DisplayTable {
                view_id: view.id.clone(),
                header,
                body: vec![Row::new(vec![placeholder])],
            };
        }

        if !view.hide_empty.is_empty() {
            let hidden = hide_empty(&mut body, &view.hide_empty);
            log_info_indent(format!("{} rows hidden", hidden), 2);
        }

        if view.compact {
            let removed = compact(&mut header, &mut body);
            if !removed.is_empty() {
                log_info_indent(format!("{} empty columns removed", removed.len()), 2);
            }
        }

        for summary in &view.summaries {
            if !merge_summary(&mut body, summary.row, summary.col, summary.span, &summary.label) {
                log_warning(format!("{}: summary row {} not found", view.id, summary.row));
            }
        }

        for merge in &view.merges {
            merge_cells(&mut body, merge.row, merge.col1, merge.col2, &merge.separator);
        }

        for rule in &view.styles {
            apply_rule(&mut body, rule, self.colors);
        }

        DisplayTable {
            view_id: view.id.clone(),
            header,
            body,
        }
    }
}

/// Render one view from an already parsed grid.
pub fn render_view(grid: &Grid, view: &ViewDefinition, colors: &ColorTable) -> DisplayTable {
    ViewPipeline::new(view, colors).run(grid)
}

/// Render every configured view, in configuration order.
pub fn render_views(grid: &Grid, config: &AppConfig) -> Vec<DisplayTable> {
    config
        .views
        .iter()
        .map(|view| render_view(grid, view, &config.colors))
        .collect()
}

/// Render a single view by id.
pub fn render_view_by_id(grid: &Grid, config: &AppConfig, id: &str) -> PipelineResult<DisplayTable> {
    let view = config
        .view(id)
        .ok_or_else(|| PipelineError::UnknownView(id.to_string()))?;
    Ok(render_view(grid, view, &config.colors))
}

/// Fetch the table sheet and render every view.
pub async fn load_views(client: &SheetClient, config: &AppConfig) -> PipelineResult<Vec<DisplayTable>> {
    log_info(format!("📥 Fetching {}", config.table_url));
    let grid = client.fetch_grid(&config.table_url).await?;
    log_success(format!("Read {} rows", grid.len()));

    let tables = render_views(&grid, config);
    log_success(format!("{} views rendered", tables.len()));
    Ok(tables)
}

/// Fetch the table sheet and render one view.
pub async fn load_view(client: &SheetClient, config: &AppConfig, id: &str) -> PipelineResult<DisplayTable> {
    // fail before the network round trip
    if config.view(id).is_none() {
        return Err(PipelineError::UnknownView(id.to_string()));
    }
    log_info(format!("📥 Fetching {}", config.table_url));
    let grid = client.fetch_grid(&config.table_url).await?;
    render_view_by_id(&grid, config, id)
}

/// Fetch the record sheet and look `key` up in it.
///
/// `Ok(None)` means the sheet loaded but holds no such record.
pub async fn load_record(
    client: &SheetClient,
    config: &AppConfig,
    key: &str,
) -> PipelineResult<Option<DetailRecord>> {
    let (Some(record), Some(url)) = (config.record.as_ref(), config.record_url.as_deref()) else {
        return Err(ConfigError::Invalid("no record mapping configured".to_string()).into());
    };

    log_info(format!("🔎 Looking up record {}", key));
    let grid = client.fetch_grid(url).await?;
    let source = RecordSource::from_config(grid, record);

    let found = lookup(&source, record, key);
    match &found {
        Some(_) => log_success(format!("Record {} found", key)),
        None => log_warning(format!("Record {} not found among {} rows", key, source.body_len())),
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::RowClass;
    use crate::parser::parse_grid;
    use serde_json::json;

    fn view(value: serde_json::Value) -> ViewDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grade_sheet_end_to_end() {
        let grid = parse_grid("h1,h2,h3\n1st,90,F\n2nd,70,P");
        let view = view(json!({
            "id": "table1",
            "rowStart": 1,
            "rowEnd": 3,
            "columns": [0, 1, 2],
            "styles": [{ "type": "grade_rows" }, { "type": "fail_letters" }]
        }));

        let table = render_view(&grid, &view, &ColorTable::default());
        let texts: Vec<Vec<&str>> = table.body.iter().map(|r| r.texts()).collect();
        assert_eq!(texts, vec![vec!["1st", "90", "F"], vec!["2nd", "70", "P"]]);

        assert_eq!(table.body[0].class, Some(RowClass::First));
        let bold: Vec<bool> = table.body[0].cells.iter().map(|c| c.style.bold).collect();
        assert_eq!(bold, vec![false, false, true]);

        assert_eq!(table.body[1].class, Some(RowClass::Second));
        assert!(table.body[1].cells.iter().all(|c| !c.style.bold));
    }

    #[test]
    fn test_empty_window_placeholder() {
        let grid = parse_grid("a,b\n1,2");
        let view = view(json!({
            "id": "late",
            "rowStart": 5,
            "rowEnd": 9,
            "columns": [0, 1, 1],
            "header": [[{ "text": "A" }, { "text": "B", "colSpan": 2 }]],
            "compact": true
        }));

        let table = render_view(&grid, &view, &ColorTable::default());
        assert_eq!(table.header[0].logical_width(), 3);
        assert_eq!(table.body.len(), 1);
        assert_eq!(table.body[0].cells[0].text, EMPTY_VIEW_MESSAGE);
        assert_eq!(table.body[0].cells[0].col_span, 3);
    }

    #[test]
    fn test_detail_keys_follow_source_rows() {
        let grid = parse_grid("n,x,y,roll\nRahim,1,2,101\nSalma,3,4,102");
        let view = view(json!({
            "id": "table1",
            "rowStart": 1,
            "rowEnd": 3,
            "columns": [0],
            "detailKeyColumn": 3
        }));

        let table = render_view(&grid, &view, &ColorTable::default());
        let keys: Vec<Option<&str>> = table.body.iter().map(|r| r.detail_key.as_deref()).collect();
        assert_eq!(keys, vec![Some("101"), Some("102")]);
    }

    #[test]
    fn test_merges_run_after_filtering() {
        let grid = parse_grid("x,y,z\n,skip,1\nJohn,Doe,2");
        let view = view(json!({
            "id": "names",
            "rowStart": 1,
            "rowEnd": 3,
            "columns": [0, 1, 2],
            "hideEmpty": [0],
            "merges": [{ "row": 2, "col1": 1, "col2": 2 }]
        }));

        let table = render_view(&grid, &view, &ColorTable::default());
        assert!(table.body[0].hidden);
        assert_eq!(table.body[1].texts(), vec!["John Doe", "2"]);
        assert_eq!(table.body[1].cells[0].col_span, 2);
        assert_eq!(table.visible_rows().count(), 1);
    }

    #[test]
    fn test_unknown_view() {
        let config = AppConfig::from_json(include_str!("../../configs/results.json")).unwrap();
        let err = render_view_by_id(&Grid::default(), &config, "table99").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownView(id) if id == "table99"));
    }

    #[test]
    fn test_every_configured_view_renders() {
        let config = AppConfig::from_json(include_str!("../../configs/results.json")).unwrap();
        let tables = render_views(&Grid::default(), &config);
        assert_eq!(tables.len(), config.views.len());
        assert!(tables.iter().all(|t| t.body[0].text(0) == EMPTY_VIEW_MESSAGE));
    }

    /// Daily ledger: 31 day columns of which only day 1 has entries.
    fn ledger_grid() -> Grid {
        let mut records: Vec<Vec<String>> = vec![vec![String::new(); 36]; 53];
        let members = [("Rahim", "120"), ("Karim", "150"), ("Salma", "110"), ("Jamal", "250")];
        for (i, (name, meals)) in members.iter().enumerate() {
            let row = &mut records[i + 2];
            row[0] = (i + 1).to_string();
            row[1] = name.to_string();
            row[2] = meals.to_string();
            row[4] = "1".to_string();
            row[35] = "10".to_string();
        }
        let total = &mut records[52];
        total[1] = "total".to_string();
        total[4] = "4".to_string();
        total[35] = "40".to_string();
        Grid::from_records(records)
    }

    #[test]
    fn test_ledger_daily_view() {
        let config = AppConfig::from_json(include_str!("../../configs/ledger.json")).unwrap();
        let table = render_view_by_id(&ledger_grid(), &config, "table4").unwrap();

        // days 2..31 dropped, the date header shrinks to one column
        assert_eq!(table.header[0].cells[3].col_span, 1);
        assert_eq!(table.header[1].cells.len(), 1);
        assert_eq!(table.body[0].texts(), vec!["১", "Rahim", "১২০", "১", "১০"]);

        // members without a name are hidden, the summary row is not
        assert_eq!(table.visible_rows().count(), 5);

        let summary = &table.body[50];
        assert_eq!(summary.texts(), vec!["মোট", "৪", "৪০"]);
        assert_eq!(summary.cells[0].col_span, 3);
        assert_eq!(summary.logical_width(), 5);
        assert!(summary.summary);

        let bordered: Vec<bool> = table.body[..4].iter().map(|r| r.border_bottom.is_some()).collect();
        assert_eq!(bordered, vec![false, true, false, true]);
        assert!(summary.border_bottom.is_none());
    }

    #[tokio::test]
    async fn test_load_record_requires_mapping() {
        let config = AppConfig::from_json(include_str!("../../configs/ledger.json")).unwrap();
        let err = load_record(&SheetClient::new(), &config, "101").await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::Invalid(_))));
    }

    const RECORD_SHEET: &str = "Serial,Name,Class,Roll,Bangla,Math\n\
                                1,Rina Das,8,101,A+,F\n\
                                2,Karim,8,102,B,A\n";

    fn record_config(base: &str) -> AppConfig {
        AppConfig::from_value(json!({
            "tableUrl": format!("{}/sheet.csv", base),
            "recordUrl": format!("{}/sheet.csv", base),
            "views": [{ "id": "table1", "rowStart": 1, "rowEnd": 2, "columns": [1, 3] }],
            "record": {
                "keyColumn": 3,
                "fields": ["serial", "name", "class", "roll", "bangla", "math"]
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_record_found_and_missing() {
        let base = crate::fetch::serve_sheet(RECORD_SHEET).await;
        let config = record_config(&base);
        let client = SheetClient::new();

        let record = load_record(&client, &config, "101").await.unwrap().unwrap();
        assert_eq!(record.get("name"), Some("Rina Das"));
        let failed: Vec<&str> = record.failed_fields().map(|f| f.id.as_str()).collect();
        assert_eq!(failed, vec!["math"]);

        assert!(load_record(&client, &config, "999").await.unwrap().is_none());
        // header row is not a record
        assert!(load_record(&client, &config, "Roll").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_record_fetch_failure() {
        let base = crate::fetch::serve_sheet(RECORD_SHEET).await;
        let mut config = record_config(&base);
        config.record_url = Some(format!("{}/gone.csv", base));

        let err = load_record(&SheetClient::new(), &config, "101").await.unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_load_view_unknown_id_skips_fetch() {
        let config = AppConfig::from_json(include_str!("../../configs/ledger.json")).unwrap();
        let err = load_view(&SheetClient::new(), &config, "nope").await.unwrap_err();
        assert!(matches!(err, PipelineError::UnknownView(_)));
    }
}
