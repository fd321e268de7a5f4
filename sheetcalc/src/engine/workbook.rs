//! Spreadsheet I/O: loading the input with calamine, writing the result with rust_xlsxwriter.

use calamine::{Data, Range, Reader, open_workbook_auto};
use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use super::Calculation;
use super::errors::CalcError;

/// Title of the single worksheet in every output workbook
pub const OUTPUT_SHEET_NAME: &str = "Output";
/// Label written to A1 of the output sheet
pub const INPUT_LABEL: &str = "Input A1";
/// Label written to A2 of the output sheet
pub const OUTPUT_LABEL: &str = "Doubled";

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Load the active worksheet of the workbook at `path`.
///
/// The active sheet is the one the workbook was saved with selected (`activeTab` of the first
/// workbook view). Without that attribute, or if it points past the last sheet, the first sheet
/// is used.
///
/// calamine yields cached values, so a formula cell reads as its last computed result.
pub fn load_active_sheet(path: &Path) -> Result<Range<Data>, CalcError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let index = match read_active_tab(path) {
        Ok(Some(tab)) if tab < sheet_names.len() => tab,
        Ok(_) => 0,
        Err(e) => {
            debug!(error = %e, "Could not read active tab, using first sheet");
            0
        }
    };
    debug!(
        path = %path.display(),
        sheets = ?sheet_names,
        active = sheet_names.get(index).map(String::as_str),
        "Opened input workbook"
    );

    let range = workbook.worksheet_range_at(index).ok_or(CalcError::NoWorksheets)??;
    Ok(range)
}

fn read_active_tab(path: &Path) -> anyhow::Result<Option<usize>> {
    let mut zip = ZipArchive::new(File::open(path)?)?;
    let mut entry = zip.by_name(WORKBOOK_PART)?;
    let mut xml = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut xml)?;
    Ok(parse_active_tab(&xml)?)
}

/// `activeTab` of the first `workbookView`. Workbook views precede the sheet list, so the scan
/// stops there.
fn parse_active_tab(xml: &[u8]) -> Result<Option<usize>, quick_xml::Error> {
    let mut reader = XmlReader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookView" => {
                let tab = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.local_name().as_ref() == b"activeTab")
                    .and_then(|attr| std::str::from_utf8(&attr.value).ok()?.trim().parse().ok());
                return Ok(tab);
            }
            Event::Start(e) if e.local_name().as_ref() == b"sheets" => return Ok(None),
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Write the result workbook, replacing any existing file at `path`.
///
/// Layout of the "Output" sheet:
///
/// |   | A          | B        |
/// |---|------------|----------|
/// | 1 | `Input A1` | input    |
/// | 2 | `Doubled`  | computed |
pub fn write_output(path: &Path, calculation: &Calculation) -> Result<(), CalcError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET_NAME)?;

    worksheet.write_string(0, 0, INPUT_LABEL)?;
    worksheet.write_number(0, 1, calculation.input.as_f64())?;
    worksheet.write_string(1, 0, OUTPUT_LABEL)?;
    worksheet.write_number(1, 1, calculation.doubled.as_f64())?;

    workbook.save(path)?;
    Ok(())
}
