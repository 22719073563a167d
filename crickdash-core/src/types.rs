//! Core domain types for crickdash
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Dataset** | One of the four fixed match-format tables (Test, ODI, T20, IPL) |
//! | **Analysis** | A named canned aggregate query over a Dataset's deliveries |
//! | **QueryResult** | The ordered rows one execution produced; never cached |
//! | **Session** | Per-user interactive state holding at most one connection |
//!
//! Every dataset table shares the same delivery-level schema: `team`,
//! `batter`, `bowler`, `runs_total`, `runs_batter`, `runs_extras`,
//! `wicket_player_out`, `wicket_kind`, `wicket_fielders`, and friends.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// Dataset
// ============================================

/// One of the four fixed match formats, each backed by a table of
/// identical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Test matches (`test_matches`)
    Test,
    /// One Day Internationals (`odi_matches`)
    Odi,
    /// Twenty20 internationals (`t20_matches`)
    T20,
    /// Indian Premier League (`ipl_matches`)
    Ipl,
}

impl Dataset {
    /// All datasets, in tab order.
    pub const ALL: [Dataset; 4] = [Dataset::Test, Dataset::Odi, Dataset::T20, Dataset::Ipl];

    /// The underlying table name for this dataset.
    pub fn table(&self) -> &'static str {
        match self {
            Dataset::Test => "test_matches",
            Dataset::Odi => "odi_matches",
            Dataset::T20 => "t20_matches",
            Dataset::Ipl => "ipl_matches",
        }
    }

    /// Human-friendly name for tabs and titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dataset::Test => "Test Matches",
            Dataset::Odi => "ODI Matches",
            Dataset::T20 => "T20 Matches",
            Dataset::Ipl => "IPL Matches",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================
// Values and rows
// ============================================

/// A single cell value decoded from the database.
///
/// The delivery schema only produces NULLs, integers, DECIMAL aggregates
/// and text, so wider driver types are normalized down to these four.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, for chart encodings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{:.2}", v)
                }
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One result row; values are positional against `QueryResult::columns`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub values: Vec<Value>,
}

/// The ordered output of one query execution.
///
/// Produced fresh per run and discarded after rendering; nothing here is
/// cached across executions.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column names in select order
    pub columns: Vec<String>,
    /// Rows in the order the database returned them
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (row, column name), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.values.get(idx)
    }

    /// True when the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_tables_are_fixed() {
        let tables: Vec<&str> = Dataset::ALL.iter().map(|d| d.table()).collect();
        assert_eq!(
            tables,
            vec!["test_matches", "odi_matches", "t20_matches", "ipl_matches"]
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(80.0).to_string(), "80");
        assert_eq!(Value::Float(3.14159).to_string(), "3.14");
        assert_eq!(Value::Text("Kohli".into()).to_string(), "Kohli");
    }

    #[test]
    fn test_result_lookup_by_column_name() {
        let result = QueryResult {
            columns: vec!["team".into(), "total_runs".into()],
            rows: vec![
                Row {
                    values: vec![Value::Text("India".into()), Value::Int(80)],
                },
                Row {
                    values: vec![Value::Text("Aus".into()), Value::Int(40)],
                },
            ],
        };

        assert_eq!(result.column_index("total_runs"), Some(1));
        assert_eq!(
            result.value(0, "team"),
            Some(&Value::Text("India".into()))
        );
        assert_eq!(result.value(1, "total_runs"), Some(&Value::Int(40)));
        assert_eq!(result.value(2, "team"), None);
        assert_eq!(result.value(0, "missing"), None);
    }
}
