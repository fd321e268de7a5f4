use thiserror::Error;

/// Why the target cell cannot be used as calculation input.
///
/// These are caller mistakes: the workbook was readable but its contents are unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    /// A1 holds no value
    #[error("Cell A1 is empty. Please enter a number in A1.")]
    Empty,

    /// A1 holds something other than a number; `found` is a rendering of the value
    #[error("Cell A1 must be a number. Got: {found}")]
    NotNumeric { found: String },

    /// Doubling the integer in A1 does not fit in 64 bits
    #[error("Cell A1 value {value} is too large to double")]
    Overflow { value: i64 },
}

/// Unified error type for the calculation pipeline
#[derive(Error, Debug)]
pub enum CalcError {
    /// Workbook was read but the input cell is unusable
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Input could not be opened or parsed as a workbook
    #[error("Failed to open workbook: {0}")]
    OpenWorkbook(#[from] calamine::Error),

    /// Input parsed but contains no worksheets
    #[error("Workbook contains no worksheets")]
    NoWorksheets,

    /// Output workbook could not be built or saved
    #[error("Failed to write output workbook: {0}")]
    WriteOutput(#[from] rust_xlsxwriter::XlsxError),
}

impl CalcError {
    /// Whether the failure is the caller's fault (bad cell contents) rather than unexpected
    pub fn is_validation(&self) -> bool {
        matches!(self, CalcError::Validation(_))
    }
}
