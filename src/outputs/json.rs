//! JSON rendition of the distance matrix for external renderers.
//!
//! ```json
//! {"labels":["cat","dog"],"distances":[[0.0,0.6],[0.6,0.0]]}
//! ```

use crate::error::{AppError, Result};
use crate::models::DistanceMatrix;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `matrix` as JSON to `path`.
#[instrument(level = "info", skip(matrix))]
pub async fn write_matrix_json(matrix: &DistanceMatrix, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(matrix).map_err(|source| AppError::MatrixJson {
        path: path.to_string(),
        source,
    })?;

    if let Err(source) = fs::write(path, json).await {
        error!(error = %source, "Failed to write JSON");
        return Err(AppError::Output {
            path: path.to_string(),
            source,
        });
    }
    info!(keywords = matrix.len(), "Wrote distance matrix JSON");
    Ok(())
}
