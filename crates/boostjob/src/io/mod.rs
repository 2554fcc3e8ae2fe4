//! Readers for the headerless numeric CSV files found in training channels.
pub mod csv_table;

pub use csv_table::{read_feature_table, read_label_vector};
