use crate::error::{ImporterError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// In-memory observation table: a header row plus string-valued data rows.
///
/// Columns are positional; nothing about a table is mutated in place.
/// Transformations return new tables so each pipeline stage stays a pure
/// function over its input.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read CSV data from a file, or from every file directly inside a
    /// directory. Directory contents are concatenated row-wise under the
    /// first file's header; all files are assumed to share a schema and no
    /// non-CSV filtering is applied.
    pub fn load(input_path: &Path) -> Result<Table> {
        let table = if input_path.is_dir() {
            Self::read_csvs_from_dir(input_path)?
        } else {
            Self::read_csv(input_path)?
        };
        info!("Read {} rows.", table.rows.len());
        Ok(table)
    }

    fn read_csv(path: &Path) -> Result<Table> {
        debug!("Reading CSV file: {}", path.display());
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table::new(headers, rows))
    }

    fn read_csvs_from_dir(input_dir: &Path) -> Result<Table> {
        let mut paths: Vec<_> = fs::read_dir(input_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        // read_dir order is platform dependent; sort for a stable concat order
        paths.sort();

        let mut combined: Option<Table> = None;
        for path in paths {
            let table = Self::read_csv(&path)?;
            match combined.as_mut() {
                Some(acc) => acc.rows.extend(table.rows),
                None => combined = Some(table),
            }
        }
        Ok(combined.unwrap_or_else(|| Table::new(Vec::new(), Vec::new())))
    }

    /// Write the table as CSV with a header row and no index column.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// New table without the named columns. Fails if any requested column
    /// is not present.
    pub fn drop_columns(&self, names: &[String]) -> Result<Table> {
        for name in names {
            if !self.headers.iter().any(|h| h == name) {
                return Err(ImporterError::MissingColumn(name.clone()));
            }
        }
        let kept: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !names.contains(h))
            .map(|(i, _)| i)
            .collect();

        let headers = kept.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| kept.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table::new(headers, rows))
    }

    /// New table with the column at `index` renamed. Renaming is positional;
    /// an index past the actual column count is an error.
    pub fn rename_column(&self, index: usize, name: &str) -> Result<Table> {
        if index >= self.headers.len() {
            return Err(ImporterError::ColumnIndexOutOfRange {
                index,
                count: self.headers.len(),
            });
        }
        let mut headers = self.headers.clone();
        headers[index] = name.to_string();
        Ok(Table::new(headers, self.rows.clone()))
    }

    /// Values of the column at `index`, in row order.
    pub fn column_values(&self, index: usize) -> Result<Vec<String>> {
        if index >= self.headers.len() {
            return Err(ImporterError::ColumnIndexOutOfRange {
                index,
                count: self.headers.len(),
            });
        }
        Ok(self.rows.iter().map(|row| row[index].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table::new(
            vec!["name".into(), "date".into(), "pop".into()],
            vec![
                vec!["a".into(), "2023".into(), "1".into()],
                vec!["b".into(), "2024".into(), "2".into()],
            ],
        )
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, "name,val\ne1,10\ne2,20\n").unwrap();

        let table = Table::load(&path).unwrap();
        assert_eq!(table.headers, vec!["name", "val"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["e1", "10"]);
    }

    #[test]
    fn test_load_directory_concatenates_rows() {
        let dir = tempdir().unwrap();
        let mut f1 = fs::File::create(dir.path().join("a.csv")).unwrap();
        writeln!(f1, "name,val\ne1,10").unwrap();
        let mut f2 = fs::File::create(dir.path().join("b.csv")).unwrap();
        writeln!(f2, "name,val\ne2,20\ne3,30").unwrap();

        let table = Table::load(dir.path()).unwrap();
        assert_eq!(table.headers, vec!["name", "val"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "e1");
        assert_eq!(table.rows[2][0], "e3");
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempdir().unwrap();
        let table = Table::load(dir.path()).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(Table::load(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_drop_columns() {
        let table = sample().drop_columns(&["date".to_string()]).unwrap();
        assert_eq!(table.headers, vec!["name", "pop"]);
        assert_eq!(table.rows[0], vec!["a", "1"]);
    }

    #[test]
    fn test_drop_missing_column_fails() {
        let err = sample().drop_columns(&["nope".to_string()]).unwrap_err();
        assert!(matches!(err, ImporterError::MissingColumn(name) if name == "nope"));
    }

    #[test]
    fn test_rename_column_positional() {
        let table = sample().rename_column(0, "dcid").unwrap();
        assert_eq!(table.headers[0], "dcid");
        // source table untouched
        assert_eq!(sample().headers[0], "name");
    }

    #[test]
    fn test_rename_out_of_range() {
        let err = sample().rename_column(5, "dcid").unwrap_err();
        assert!(matches!(
            err,
            ImporterError::ColumnIndexOutOfRange { index: 5, count: 3 }
        ));
    }

    #[test]
    fn test_write_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        sample().write_csv(&path).unwrap();
        let loaded = Table::load(&path).unwrap();
        assert_eq!(loaded, sample());
    }
}
