//! Labelled CSV rendition of the distance matrix.
//!
//! ```text
//! ,cat,dog
//! cat,0,0.6
//! dog,0.6,0
//! ```

use crate::error::{AppError, Result};
use crate::models::DistanceMatrix;
use std::io::Write;
use tracing::{info, instrument};

/// Serialize `matrix` as CSV into `out`: a header of labels after an empty
/// corner cell, then one labelled row per keyword.
pub fn write_matrix_csv<W: Write>(matrix: &DistanceMatrix, out: W) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    let header = std::iter::once("").chain(matrix.labels.iter().map(String::as_str));
    writer.write_record(header)?;
    for (label, row) in matrix.labels.iter().zip(&matrix.distances) {
        let cells = std::iter::once(label.clone()).chain(row.iter().map(|d| d.to_string()));
        writer.write_record(cells)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `matrix` to the CSV file at `path`.
#[instrument(level = "info", skip(matrix))]
pub fn save_matrix_csv(matrix: &DistanceMatrix, path: &str) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| AppError::Output {
        path: path.to_string(),
        source,
    })?;
    write_matrix_csv(matrix, file).map_err(|source| AppError::MatrixCsv {
        path: path.to_string(),
        source,
    })?;
    info!(keywords = matrix.len(), "Results saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_matrix_csv() {
        let matrix = DistanceMatrix {
            labels: vec!["cat".to_string(), "big dog".to_string()],
            distances: vec![vec![0.0, 0.625], vec![0.625, 0.0]],
        };
        let mut out = Vec::new();
        write_matrix_csv(&matrix, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with(",cat,big dog"));
        assert_eq!(lines[1], "cat,0,0.625");
        assert_eq!(lines[2], "big dog,0.625,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_save_matrix_csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distances.csv");
        let path = path.to_str().unwrap();
        let matrix = DistanceMatrix {
            labels: vec!["a".to_string(), "b".to_string()],
            distances: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        };
        save_matrix_csv(&matrix, path).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "b");
        assert_eq!(rows[1][1].parse::<f64>().unwrap(), 1.0);
    }

    #[test]
    fn test_save_into_missing_dir_is_io_error() {
        let matrix = DistanceMatrix {
            labels: vec![],
            distances: vec![],
        };
        let err = save_matrix_csv(&matrix, "/no/such/dir/distances.csv").unwrap_err();
        let AppError::Output { path, source } = err else {
            panic!("expected an output error, got {err:?}");
        };
        assert_eq!(path, "/no/such/dir/distances.csv");
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }
}
