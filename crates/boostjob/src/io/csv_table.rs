//! Headerless numeric CSV reader.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::error::{BoostError, Result};
use crate::math::{Array1, Array2};

/// Read a headerless CSV of numeric feature columns into a row-major table.
///
/// Empty cells are read as `NaN` (treated as missing by the boosters). Every
/// row must have the same number of columns as the first one.
pub fn read_feature_table<P: AsRef<Path>>(path: P) -> Result<Array2<f32>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BoostError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let mut data = Vec::new();
    let mut ncols = None;
    let mut nrows = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|source| BoostError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let expected = *ncols.get_or_insert(record.len());
        if record.len() != expected {
            return Err(BoostError::RaggedRow {
                path: path.to_path_buf(),
                row: row_idx + 1,
                expected,
                found: record.len(),
            });
        }

        for (col_idx, field) in record.iter().enumerate() {
            data.push(parse_cell(path, row_idx, col_idx, field)?);
        }
        nrows += 1;
    }

    let ncols = match ncols {
        Some(n) if nrows > 0 => n,
        _ => return Err(BoostError::EmptyTable(path.to_path_buf())),
    };

    debug!(
        "Read {} rows x {} columns from {}",
        nrows,
        ncols,
        path.display()
    );

    Array2::from_shape_vec((nrows, ncols), data).map_err(|e| BoostError::Engine(e.to_string()))
}

/// Read a headerless single-column CSV of labels into a flat vector.
///
/// Missing labels are an error; a label file with more than one column is
/// rejected rather than flattened.
pub fn read_label_vector<P: AsRef<Path>>(path: P) -> Result<Array1<f32>> {
    let path = path.as_ref();
    let table = read_feature_table(path)?;
    let found = table.ncols();
    let labels = table
        .into_column_vector()
        .map_err(|_| BoostError::LabelColumns {
            path: path.to_path_buf(),
            found,
        })?;
    if let Some(row) = labels.iter().position(|v| v.is_nan()) {
        return Err(BoostError::ParseValue {
            path: path.to_path_buf(),
            row: row + 1,
            column: 1,
            value: String::new(),
        });
    }
    Ok(labels)
}

fn parse_cell(path: &Path, row_idx: usize, col_idx: usize, field: &str) -> Result<f32> {
    if field.is_empty() {
        return Ok(f32::NAN);
    }
    field.parse::<f32>().map_err(|_| BoostError::ParseValue {
        path: path.to_path_buf(),
        row: row_idx + 1,
        column: col_idx + 1,
        value: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_headerless_numeric_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "f.csv", "1,2.5,3\n4, 5 ,-6e-1\n");
        let table = read_feature_table(&path).unwrap();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.row_slice(1), &[4.0, 5.0, -0.6]);
    }

    #[test]
    fn first_row_is_data_not_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "f.csv", "7,8\n");
        let table = read_feature_table(&path).unwrap();
        assert_eq!(table.shape(), (1, 2));
    }

    #[test]
    fn empty_cells_become_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "f.csv", "1,,3\n");
        let table = read_feature_table(&path).unwrap();
        assert!(table[(0, 1)].is_nan());
    }

    #[test]
    fn non_numeric_cell_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "f.csv", "1,2\n3,abc\n");
        match read_feature_table(&path).unwrap_err() {
            BoostError::ParseValue { row, column, value, .. } => {
                assert_eq!((row, column), (2, 2));
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "f.csv", "1,2,3\n4,5\n");
        assert!(matches!(
            read_feature_table(&path),
            Err(BoostError::RaggedRow { row: 2, expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "f.csv", "");
        assert!(matches!(read_feature_table(&path), Err(BoostError::EmptyTable(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_feature_table(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, BoostError::Io { .. }), "got {err}");
    }

    #[test]
    fn labels_are_flattened_from_one_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "y.csv", "0\n1\n1\n");
        let labels = read_label_vector(&path).unwrap();
        assert_eq!(labels.as_slice(), &[0.0, 1.0, 1.0]);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn multi_column_labels_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "y.csv", "0,1\n1,0\n");
        assert!(matches!(
            read_label_vector(&path),
            Err(BoostError::LabelColumns { found: 2, .. })
        ));
    }
}
