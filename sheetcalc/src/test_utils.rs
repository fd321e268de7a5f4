//! Test utilities: app construction and in-memory workbook fixtures.

use crate::config::{Config, LimitsConfig, StorageConfig};
use axum_test::TestServer;
use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Config rooted at `root`, with `uploads/` and `outputs/` beneath it
pub fn create_test_config(root: &Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        storage: StorageConfig {
            uploads_dir: root.join("uploads"),
            outputs_dir: root.join("outputs"),
        },
        limits: LimitsConfig::default(),
        enable_otel_export: false,
    }
}

pub async fn create_test_app(config: Config) -> TestServer {
    crate::Application::new(config)
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// What to put in A1 of a generated input workbook
#[derive(Debug, Clone, Copy)]
pub enum InputCell {
    Number(f64),
    Text(&'static str),
    Bool(bool),
    /// 2024-01-03, stored as a date-formatted day serial
    Date,
    /// A1 left blank; another cell is filled so the sheet isn't empty
    Empty,
}

pub fn input_workbook_bytes(a1: InputCell) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    match a1 {
        InputCell::Number(n) => worksheet.write_number(0, 0, n),
        InputCell::Text(s) => worksheet.write_string(0, 0, s),
        InputCell::Bool(b) => worksheet.write_boolean(0, 0, b),
        InputCell::Date => {
            let date = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 3).expect("Invalid date");
            worksheet.write_datetime_with_format(0, 0, &date, &Format::new().set_num_format("yyyy-mm-dd"))
        }
        InputCell::Empty => worksheet.write_string(1, 1, "not in A1"),
    }
    .expect("Failed to write input cell");
    workbook.save_to_buffer().expect("Failed to build input workbook")
}

/// Write an input workbook to `dir/input.xlsx`, replacing any previous one
pub fn write_input_workbook(dir: &Path, a1: InputCell) -> PathBuf {
    let path = dir.join("input.xlsx");
    std::fs::write(&path, input_workbook_bytes(a1)).expect("Failed to write input workbook");
    path
}

/// Write `dir/tabs.xlsx` with sheets "Notes" (A1 = "readme") and "Data" (A1 = 21), selecting
/// the sheet at `active` (0 or 1)
pub fn write_workbook_with_active_sheet(dir: &Path, active: usize) -> PathBuf {
    let mut workbook = Workbook::new();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").expect("Failed to name sheet");
    notes.write_string(0, 0, "readme").expect("Failed to write cell");
    if active == 0 {
        notes.set_active(true);
    }

    let data = workbook.add_worksheet();
    data.set_name("Data").expect("Failed to name sheet");
    data.write_number(0, 0, 21.0).expect("Failed to write cell");
    if active == 1 {
        data.set_active(true);
    }

    let path = dir.join("tabs.xlsx");
    workbook.save(&path).expect("Failed to save workbook");
    path
}

fn open_xlsx(bytes: &[u8]) -> Xlsx<Cursor<Vec<u8>>> {
    Xlsx::new(Cursor::new(bytes.to_vec())).expect("Output is not a readable xlsx workbook")
}

pub fn output_sheet_names(bytes: &[u8]) -> Vec<String> {
    open_xlsx(bytes).sheet_names()
}

/// Name and cells of the first sheet of a result workbook
pub fn read_output_sheet(bytes: &[u8]) -> (String, Range<Data>) {
    let mut workbook = open_xlsx(bytes);
    let name = workbook.sheet_names().first().cloned().expect("Output has no sheets");
    let range = workbook.worksheet_range(&name).expect("Failed to read output sheet");
    (name, range)
}
