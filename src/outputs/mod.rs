//! Record stores and distance matrix files.
//!
//! # Submodules
//!
//! - [`records`]: append-only CSV stores of normalized articles
//! - [`matrix`]: the distance matrix as a labelled CSV table
//! - [`json`]: the distance matrix as JSON for external renderers
//!
//! # Output Structure
//!
//! ```text
//! bbc_article_data.csv              # primary record store
//! add_data.csv                      # secondary record store
//! output_dir/
//! └── distances_20250506-143000.csv # one matrix per run
//! ```

pub mod json;
pub mod matrix;
pub mod records;

use clap::ValueEnum;

/// File format of the distance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatrixFormat {
    Csv,
    Json,
}

impl MatrixFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MatrixFormat::Csv => "csv",
            MatrixFormat::Json => "json",
        }
    }
}
