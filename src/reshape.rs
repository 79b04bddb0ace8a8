use crate::config::ImporterConfig;
use crate::error::{ImporterError, Result};
use crate::table::Table;

/// Wide to long: one output row per (input row, variable column) pair,
/// carrying (dcid, date, variable name, value). Cells with empty values
/// produce no row. Assumes the table has already been normalized so the
/// dcid and date columns carry their canonical names.
pub fn unpivot_variables(table: &Table, config: &ImporterConfig) -> Result<Table> {
    let dcid_idx = column_index(table, &config.dcid_column)?;
    let date_idx = column_index(table, &config.date_column)?;

    let variable_columns: Vec<usize> = (0..table.headers.len())
        .filter(|&i| i != dcid_idx && i != date_idx)
        .collect();

    let mut rows = Vec::new();
    for row in &table.rows {
        for &var_idx in &variable_columns {
            let value = &row[var_idx];
            if value.is_empty() {
                continue;
            }
            rows.push(vec![
                row[dcid_idx].clone(),
                row[date_idx].clone(),
                table.headers[var_idx].clone(),
                value.clone(),
            ]);
        }
    }

    Ok(Table::new(
        vec![
            config.dcid_column.clone(),
            config.date_column.clone(),
            config.variable_column.clone(),
            config.value_column.clone(),
        ],
        rows,
    ))
}

/// Reorders columns into the canonical output sequence:
/// dcid, variable, date, value.
pub fn reorder_columns(table: &Table, config: &ImporterConfig) -> Result<Table> {
    let order = [
        &config.dcid_column,
        &config.variable_column,
        &config.date_column,
        &config.value_column,
    ];
    let indices = order
        .iter()
        .map(|name| column_index(table, name))
        .collect::<Result<Vec<_>>>()?;

    let headers = indices.iter().map(|&i| table.headers[i].clone()).collect();
    let rows = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(Table::new(headers, rows))
}

fn column_index(table: &Table, name: &str) -> Result<usize> {
    table
        .headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ImporterError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> Table {
        Table::new(
            vec!["dcid".into(), "date".into(), "pop".into(), "gdp".into()],
            vec![
                vec!["E1".into(), "2023".into(), "100".into(), "5".into()],
                vec!["E2".into(), "2024".into(), "".into(), "7".into()],
            ],
        )
    }

    #[test]
    fn test_unpivot_one_row_per_variable() {
        let long = unpivot_variables(&wide(), &ImporterConfig::default()).unwrap();
        assert_eq!(long.headers, vec!["dcid", "date", "variable", "value"]);
        assert_eq!(
            long.rows,
            vec![
                vec!["E1", "2023", "pop", "100"],
                vec!["E1", "2023", "gdp", "5"],
                vec!["E2", "2024", "gdp", "7"],
            ]
        );
    }

    #[test]
    fn test_unpivot_drops_empty_values() {
        let long = unpivot_variables(&wide(), &ImporterConfig::default()).unwrap();
        assert!(!long
            .rows
            .iter()
            .any(|row| row[0] == "E2" && row[2] == "pop"));
    }

    #[test]
    fn test_reorder_to_canonical_sequence() {
        let config = ImporterConfig::default();
        let long = unpivot_variables(&wide(), &config).unwrap();
        let ordered = reorder_columns(&long, &config).unwrap();
        assert_eq!(ordered.headers, vec!["dcid", "variable", "date", "value"]);
        assert_eq!(ordered.rows[0], vec!["E1", "pop", "2023", "100"]);
    }

    #[test]
    fn test_unpivot_missing_date_column_fails() {
        let table = Table::new(vec!["dcid".into(), "pop".into()], vec![]);
        let err = unpivot_variables(&table, &ImporterConfig::default()).unwrap_err();
        assert!(matches!(err, ImporterError::MissingColumn(name) if name == "date"));
    }
}
