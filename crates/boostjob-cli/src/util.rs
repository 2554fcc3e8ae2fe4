use anyhow::Result;
use std::path::Path;

/// Check that `path` names an existing `.csv` file.
pub fn validate_csv_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    if ext.as_deref() != Some("csv") {
        anyhow::bail!("File must have a .csv extension: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

/// Format a table shape the way the progress output reports it, e.g. `(100, 8)`.
pub fn format_shape(shape: (usize, usize)) -> String {
    format!("({}, {})", shape.0, shape.1)
}

/// Format a vector length as a one-element shape, e.g. `(100,)`.
pub fn format_len(len: usize) -> String {
    format!("({},)", len)
}
