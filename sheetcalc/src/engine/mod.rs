//! Calculation engine.
//!
//! A single linear pipeline over one workbook:
//!
//! 1. **Load** the active sheet of the input workbook ([`workbook::load_active_sheet`])
//! 2. **Extract** and **validate** its cell A1 ([`cell::read_a1`])
//! 3. **Transform** the value (currently: double it, see [`CellNumber::doubled`])
//! 4. **Construct** and **persist** the output workbook ([`workbook::write_output`])
//!
//! Everything here is blocking file I/O and CPU work. Async callers should run
//! [`run_calculation`] on the blocking pool.

pub mod cell;
pub mod errors;
pub mod workbook;

pub use cell::{A1Outcome, CellNumber};
pub use errors::{CalcError, ValidationFailure};

use std::path::Path;
use tracing::{info, instrument};

/// Input and computed value of one successful run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub input: CellNumber,
    pub doubled: CellNumber,
}

impl Calculation {
    /// Apply the business rule to an input value
    pub fn from_input(input: CellNumber) -> Result<Self, ValidationFailure> {
        Ok(Self {
            input,
            doubled: input.doubled()?,
        })
    }
}

/// Read A1 from `input_path`, double it, and write the result workbook to `output_path`.
///
/// The output file is only created once the input has been fully read and validated.
#[instrument(skip_all, fields(input = %input_path.display(), output = %output_path.display()))]
pub fn run_calculation(input_path: &Path, output_path: &Path) -> Result<Calculation, CalcError> {
    let range = workbook::load_active_sheet(input_path)?;
    let input = cell::read_a1(&range).into_result()?;
    let calculation = Calculation::from_input(input)?;

    workbook::write_output(output_path, &calculation)?;

    info!(input = %calculation.input, doubled = %calculation.doubled, "Calculation complete");
    Ok(calculation)
}
