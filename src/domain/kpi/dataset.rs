//! KPI Dataset - Column-oriented table for one reporting period.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::KpiError;

/// Cell values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// A named column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Text(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    /// Number of cells, including missing ones.
    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    pub fn missing(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnValues::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Numeric cells, or None for a text column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Text(_) => None,
        }
    }

    /// Present numeric values in row order.
    pub fn present_values(&self) -> Vec<f64> {
        self.as_numeric()
            .map(|cells| cells.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Display text for one cell; missing cells read "NaN".
    pub fn cell_text(&self, row: usize) -> String {
        match &self.values {
            ColumnValues::Numeric(v) => match v.get(row).copied().flatten() {
                Some(value) => value.to_string(),
                None => "NaN".to_string(),
            },
            ColumnValues::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .unwrap_or_else(|| "NaN".to_string()),
        }
    }

    fn head(&self, rows: usize) -> Self {
        let values = match &self.values {
            ColumnValues::Numeric(v) => ColumnValues::Numeric(v.iter().take(rows).copied().collect()),
            ColumnValues::Text(v) => ColumnValues::Text(v.iter().take(rows).cloned().collect()),
        };
        Self {
            name: self.name.clone(),
            values,
        }
    }
}

/// Tabular KPI data for one period (for example "Q1 2025").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDataset {
    period: String,
    row_count: usize,
    columns: Vec<Column>,
}

impl KpiDataset {
    /// Builds a dataset from columns of equal length.
    ///
    /// # Errors
    /// `RaggedRow` when a column is shorter or longer than the first one,
    /// `DuplicateColumn` when two columns share a name.
    pub fn from_columns(period: impl Into<String>, columns: Vec<Column>) -> Result<Self, KpiError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        for (idx, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(KpiError::RaggedRow {
                    row: column.len().min(row_count),
                    expected: row_count,
                    found: column.len(),
                });
            }
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(KpiError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self {
            period: period.into(),
            row_count,
            columns,
        })
    }

    /// Builds a dataset from a header row and string records.
    ///
    /// Empty (or whitespace-only) cells are missing. A column is numeric when
    /// every present cell parses as `f64` and at least one cell is present.
    pub fn from_records(
        period: impl Into<String>,
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self, KpiError> {
        for (idx, record) in records.iter().enumerate() {
            if record.len() != headers.len() {
                return Err(KpiError::RaggedRow {
                    row: idx + 1,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
        }

        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(col, name)| {
                let cells: Vec<Option<&str>> = records
                    .iter()
                    .map(|record| {
                        let cell = record[col].trim();
                        (!is_missing_marker(cell)).then_some(cell)
                    })
                    .collect();
                infer_column(name, cells)
            })
            .collect();

        Self::from_columns(period, columns)
    }

    /// Builds a dataset from JSON row objects.
    ///
    /// Column order is the first appearance of each key. Numbers are numeric
    /// cells, `null` and absent keys are missing, anything else is text. A
    /// column is numeric when every present value is a JSON number.
    pub fn from_json_rows(period: impl Into<String>, rows: &[Map<String, Value>]) -> Result<Self, KpiError> {
        let mut names: Vec<&str> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !names.contains(&key.as_str()) {
                    names.push(key.as_str());
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let cells: Vec<Option<&Value>> = rows
                    .iter()
                    .map(|row| row.get(name).filter(|v| !v.is_null()))
                    .collect();

                let numeric = cells.iter().any(Option::is_some)
                    && cells.iter().flatten().all(|v| v.is_number());

                if numeric {
                    Column::numeric(name, cells.iter().map(|c| c.and_then(Value::as_f64)).collect())
                } else {
                    Column::text(name, cells.iter().map(|c| c.map(json_text)).collect())
                }
            })
            .collect();

        Self::from_columns(period, columns)
    }

    /// Period label, for example "Q4 2024".
    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names of numeric columns, in column order. These are the selectable KPIs.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(Column::name)
            .collect()
    }

    /// Present values of a numeric KPI column.
    ///
    /// # Errors
    /// `NotFound` when the column is absent, `NotNumeric` for a text column.
    pub fn kpi_values(&self, kpi: &str) -> Result<Vec<f64>, KpiError> {
        let column = self.column(kpi).ok_or_else(|| KpiError::NotFound {
            kpi: kpi.to_string(),
            period: self.period.clone(),
        })?;

        if !column.is_numeric() {
            return Err(KpiError::NotNumeric {
                kpi: kpi.to_string(),
                period: self.period.clone(),
            });
        }

        Ok(column.present_values())
    }

    /// Renders the first `rows` rows as a pipe-separated table under a header line.
    pub fn preview(&self, rows: usize) -> String {
        let header: Vec<&str> = self.columns.iter().map(Column::name).collect();
        let mut lines = vec![header.join(" | ")];
        for row in 0..rows.min(self.row_count) {
            let cells: Vec<String> = self.columns.iter().map(|c| c.cell_text(row)).collect();
            lines.push(cells.join(" | "));
        }
        lines.join("\n")
    }

    /// The first `rows` rows.
    pub fn head(&self, rows: usize) -> Self {
        let rows = rows.min(self.row_count);
        Self {
            period: self.period.clone(),
            row_count: rows,
            columns: self.columns.iter().map(|c| c.head(rows)).collect(),
        }
    }
}

/// Cell text read as a missing value, matching common CSV export conventions.
const MISSING_MARKERS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
];

fn is_missing_marker(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// A column is numeric when every present cell parses as f64.
/// Infinite values count as missing.
fn infer_column(name: String, cells: Vec<Option<&str>>) -> Column {
    let parsed: Vec<Option<Result<f64, _>>> = cells
        .iter()
        .map(|cell| cell.map(str::parse::<f64>))
        .collect();

    let numeric = parsed.iter().any(Option::is_some) && parsed.iter().flatten().all(Result::is_ok);

    if numeric {
        Column::numeric(
            name,
            parsed
                .into_iter()
                .map(|cell| cell.and_then(Result::ok).filter(|v| v.is_finite()))
                .collect(),
        )
    } else {
        Column::text(
            name,
            cells.into_iter().map(|cell| cell.map(str::to_string)).collect(),
        )
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> KpiDataset {
        KpiDataset::from_records(
            "Q1 2025",
            strings(&["Case ID", "Resolution Time", "Region", "Reopened"]),
            vec![
                strings(&["C-1", "4.5", "North", "0"]),
                strings(&["C-2", "", "South", "1"]),
                strings(&["C-3", "7", "", "0"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn records_infer_column_types() {
        let dataset = sample();

        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_count(), 4);
        assert_eq!(dataset.numeric_column_names(), vec!["Resolution Time", "Reopened"]);
        assert!(!dataset.column("Case ID").unwrap().is_numeric());
    }

    #[test]
    fn empty_cells_are_missing() {
        let dataset = sample();

        assert_eq!(dataset.column("Resolution Time").unwrap().missing(), 1);
        assert_eq!(dataset.column("Region").unwrap().missing(), 1);
        assert_eq!(dataset.kpi_values("Resolution Time").unwrap(), vec![4.5, 7.0]);
    }

    #[test]
    fn preview_renders_header_and_leading_rows() {
        let preview = sample().preview(2);

        assert_eq!(
            preview,
            "Case ID | Resolution Time | Region | Reopened\n\
             C-1 | 4.5 | North | 0\n\
             C-2 | NaN | South | 1"
        );
    }

    #[test]
    fn na_markers_and_infinities_are_missing() {
        let dataset = KpiDataset::from_records(
            "Q1 2025",
            strings(&["Resolution Time", "Region"]),
            vec![
                strings(&["4.0", "North"]),
                strings(&["NaN", "NA"]),
                strings(&["inf", "South"]),
                strings(&["N/A", "null"]),
                strings(&["6.0", "East"]),
            ],
        )
        .unwrap();

        let time = dataset.column("Resolution Time").unwrap();
        assert!(time.is_numeric());
        assert_eq!(time.missing(), 3);
        assert_eq!(dataset.kpi_values("Resolution Time").unwrap(), vec![4.0, 6.0]);
        assert_eq!(dataset.column("Region").unwrap().missing(), 2);
    }

    #[test]
    fn all_empty_column_is_text() {
        let dataset = KpiDataset::from_records(
            "Q1",
            strings(&["Notes"]),
            vec![strings(&[""]), strings(&[" "])],
        )
        .unwrap();

        assert!(!dataset.column("Notes").unwrap().is_numeric());
        assert_eq!(dataset.column("Notes").unwrap().missing(), 2);
    }

    #[test]
    fn ragged_record_is_rejected() {
        let result = KpiDataset::from_records(
            "Q1",
            strings(&["A", "B"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        );

        assert_eq!(
            result,
            Err(KpiError::RaggedRow {
                row: 2,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let result = KpiDataset::from_records("Q1", strings(&["A", "A"]), vec![strings(&["1", "2"])]);
        assert_eq!(
            result,
            Err(KpiError::DuplicateColumn {
                column: "A".to_string()
            })
        );
    }

    #[test]
    fn kpi_values_report_missing_and_text_columns() {
        let dataset = sample();

        assert_eq!(
            dataset.kpi_values("Backlog"),
            Err(KpiError::NotFound {
                kpi: "Backlog".to_string(),
                period: "Q1 2025".to_string()
            })
        );
        assert!(matches!(
            dataset.kpi_values("Region"),
            Err(KpiError::NotNumeric { .. })
        ));
    }

    #[test]
    fn json_rows_keep_key_order_and_nulls() {
        let rows = vec![
            json!({"Region": "North", "Resolution Time": 3.0}),
            json!({"Region": null, "Resolution Time": 5, "Escalations": 2}),
        ];
        let rows: Vec<Map<String, Value>> = rows
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();

        let dataset = KpiDataset::from_json_rows("Q4 2024", &rows).unwrap();

        let names: Vec<&str> = dataset.columns().iter().map(Column::name).collect();
        assert_eq!(names, vec!["Region", "Resolution Time", "Escalations"]);
        assert_eq!(dataset.kpi_values("Resolution Time").unwrap(), vec![3.0, 5.0]);
        assert_eq!(dataset.column("Escalations").unwrap().missing(), 1);
        assert_eq!(dataset.column("Region").unwrap().missing(), 1);
    }

    #[test]
    fn json_mixed_values_become_text() {
        let rows = vec![json!({"Tier": 1}), json!({"Tier": "gold"})];
        let rows: Vec<Map<String, Value>> = rows
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();

        let dataset = KpiDataset::from_json_rows("Q1", &rows).unwrap();
        match dataset.column("Tier").unwrap().values() {
            ColumnValues::Text(cells) => {
                assert_eq!(cells, &vec![Some("1".to_string()), Some("gold".to_string())])
            }
            other => panic!("expected text column, got {:?}", other),
        }
    }

    #[test]
    fn head_truncates_every_column() {
        let head = sample().head(2);

        assert_eq!(head.row_count(), 2);
        assert_eq!(head.column("Case ID").unwrap().len(), 2);
        assert_eq!(sample().head(10).row_count(), 3);
    }
}
