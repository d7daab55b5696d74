//! CSV upload handling and the dictionary-style preview embedded in the
//! treasury and risk prompts.
//!
//! A preview is column oriented, `{'<column>': {<row>: <value>, ...}, ...}`,
//! with each column's values typed the way a dataframe reader infers them:
//! a column whose non-missing cells are all integers renders bare integers,
//! all numeric renders floats, all booleans renders `True`/`False`, and
//! anything else renders quoted text. Missing cells render as `nan`.

use crate::error::{ImperiumError, Result};
use log::debug;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of rows the agents embed in their prompts.
pub const PREVIEW_ROWS: usize = 3;

/// Cell spellings read as missing values.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// An uploaded table: a header row plus string records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FundTable {
    /// Builds a table from already-split cells. Header names are
    /// disambiguated and short rows are padded with missing cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let columns = dedupe_columns(columns);
        let width = columns.len();

        let mut padded = Vec::with_capacity(rows.len());
        for (idx, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(ImperiumError::MalformedTable(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    idx + 2,
                    row.len()
                )));
            }
            row.resize(width, String::new());
            padded.push(row);
        }

        Ok(Self {
            columns,
            rows: padded,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let table = Self::new(columns, rows)?;
        debug!(
            "Loaded table with {} columns and {} rows",
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there is nothing to analyse: no columns or no data rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// The first `n` rows, typed per column over the whole table.
    pub fn preview(&self, n: usize) -> TablePreview {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let kind = infer_column(self.rows.iter().map(|row| row[col_idx].as_str()));
                let cells = self
                    .rows
                    .iter()
                    .take(n)
                    .map(|row| kind.cell(&row[col_idx]))
                    .collect();
                (name.clone(), cells)
            })
            .collect();

        TablePreview { columns }
    }
}

/// A typed cell as it appears inside a preview.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => f.write_str(&float_literal(*v)),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Text(s) => f.write_str(&quoted(s)),
            CellValue::Missing => f.write_str("nan"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePreview {
    columns: Vec<(String, Vec<CellValue>)>,
}

impl TablePreview {
    pub fn columns(&self) -> &[(String, Vec<CellValue>)] {
        &self.columns
    }
}

impl fmt::Display for TablePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (col_idx, (name, cells)) in self.columns.iter().enumerate() {
            if col_idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {{", quoted(name))?;
            for (row_idx, cell) in cells.iter().enumerate() {
                if row_idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", row_idx, cell)?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    fn cell(self, raw: &str) -> CellValue {
        if is_missing(raw) {
            return CellValue::Missing;
        }
        let trimmed = raw.trim();
        match self {
            ColumnKind::Int => trimmed
                .parse()
                .map(CellValue::Int)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ColumnKind::Float => trimmed
                .parse()
                .map(CellValue::Float)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ColumnKind::Bool => parse_bool(trimmed)
                .map(CellValue::Bool)
                .unwrap_or_else(|| CellValue::Text(raw.to_string())),
            ColumnKind::Text => CellValue::Text(raw.to_string()),
        }
    }
}

fn infer_column<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut any_missing = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for raw in cells {
        if is_missing(raw) {
            any_missing = true;
            continue;
        }
        let trimmed = raw.trim();
        all_int &= trimmed.parse::<i64>().is_ok();
        all_float &= trimmed.parse::<f64>().is_ok();
        all_bool &= parse_bool(trimmed).is_some();
    }

    if all_int && !any_missing {
        ColumnKind::Int
    } else if all_int || all_float {
        // Integers with gaps widen to floats.
        ColumnKind::Float
    } else if all_bool {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

fn dedupe_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while seen.contains(&candidate) {
                candidate = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn float_literal(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exponent),
            };
            let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

fn quoted(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> FundTable {
        FundTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_text_columns_render_quoted() {
        let t = table("LP,Commitment,Called\nAcme,10M,6M\n");
        assert_eq!(
            t.preview(PREVIEW_ROWS).to_string(),
            "{'LP': {0: 'Acme'}, 'Commitment': {0: '10M'}, 'Called': {0: '6M'}}"
        );
    }

    #[test]
    fn test_preview_keeps_first_three_rows() {
        let t = table("Fund,NAV\nA,100\nB,200\nC,300\nD,400\n");
        assert_eq!(t.len(), 4);
        assert_eq!(
            t.preview(PREVIEW_ROWS).to_string(),
            "{'Fund': {0: 'A', 1: 'B', 2: 'C'}, 'NAV': {0: 100, 1: 200, 2: 300}}"
        );
    }

    #[test]
    fn test_numeric_inference_uses_whole_column() {
        // The fourth row is outside the preview but still forces floats.
        let t = table("Quarter,Return\nQ1,1\nQ2,2\nQ3,3\nQ4,2.5\n");
        assert_eq!(
            t.preview(PREVIEW_ROWS).to_string(),
            "{'Quarter': {0: 'Q1', 1: 'Q2', 2: 'Q3'}, 'Return': {0: 1.0, 1: 2.0, 2: 3.0}}"
        );
    }

    #[test]
    fn test_missing_cells_and_gapped_integers() {
        let t = table("Asset,Weight\nBonds,40\nEquity,\n");
        assert_eq!(
            t.preview(PREVIEW_ROWS).to_string(),
            "{'Asset': {0: 'Bonds', 1: 'Equity'}, 'Weight': {0: 40.0, 1: nan}}"
        );
    }

    #[test]
    fn test_bool_columns() {
        let t = table("Name,Active\nA,True\nB,false\n");
        assert_eq!(
            t.preview(PREVIEW_ROWS).to_string(),
            "{'Name': {0: 'A', 1: 'B'}, 'Active': {0: True, 1: False}}"
        );
    }

    #[test]
    fn test_bool_columns_with_blank_cells() {
        let t = table("Name,Active\nA,True\nB,\n");
        assert_eq!(
            t.preview(PREVIEW_ROWS).to_string(),
            "{'Name': {0: 'A', 1: 'B'}, 'Active': {0: True, 1: nan}}"
        );
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let t = table("LP,LP,,LP\na,b,c,d\n");
        assert_eq!(t.columns(), &["LP", "LP.1", "Unnamed: 2", "LP.2"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = table("A,B,C\n1,2\n");
        assert_eq!(t.rows()[0], vec!["1", "2", ""]);
        assert_eq!(t.preview(1).columns()[2].1, vec![CellValue::Missing]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = FundTable::from_reader("A,B\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ImperiumError::MalformedTable(_)));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        assert!(table("LP,Commitment\n").is_empty());
        assert!(FundTable::default().is_empty());
    }

    #[test]
    fn test_quote_selection() {
        assert_eq!(quoted("O'Neil"), "\"O'Neil\"");
        assert_eq!(quoted("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quoted("it's \"x\""), "'it\\'s \"x\"'");
        assert_eq!(quoted("a\nb"), "'a\\nb'");
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(float_literal(10.0), "10.0");
        assert_eq!(float_literal(0.25), "0.25");
        assert_eq!(float_literal(-3.5), "-3.5");
        assert_eq!(float_literal(f64::INFINITY), "inf");
    }
}
