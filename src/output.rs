//! Console Output Formatting
//!
//! Result sets are printed as tab-separated text:
//! - a header row of column names joined by tabs (only when rows exist)
//! - one tab-joined line per row, `NULL` shown as `null`
//! - reports add a `total row(s): <N>` trailer
//!
//! The three statement shapes the shop uses are execute-and-discard
//! (`ShopConnection::execute`), execute-and-collect (`ShopConnection::query`)
//! and execute-and-print ([`print_query`]).

use std::io::Write;

use crate::engine::{QueryResult, ShopConnection, SqlValue};
use crate::error::Result;

/// Text shown for SQL `NULL`
pub const NULL_TEXT: &str = "null";

/// Render a result set as tab-delimited lines
#[must_use]
pub fn render_table(result: &QueryResult) -> String {
    if result.is_empty() {
        return String::new();
    }

    let mut out = result.columns.join("\t");
    out.push('\n');

    for row in &result.rows {
        let line: Vec<&str> = row.iter().map(|v| v.as_deref().unwrap_or(NULL_TEXT)).collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }

    out
}

/// Render the trailer printed after every report
#[must_use]
pub fn row_count_line(count: usize) -> String {
    format!("total row(s): {count}")
}

/// Write a result set to `out` and return its row count
pub fn write_table<W: Write>(out: &mut W, result: &QueryResult) -> Result<usize> {
    out.write_all(render_table(result).as_bytes())?;
    out.flush()?;
    Ok(result.len())
}

/// Execute a query and print its result set, returning the row count
pub async fn print_query<C, W>(
    conn: &mut C,
    out: &mut W,
    sql: &str,
    params: &[SqlValue],
) -> Result<usize>
where
    C: ShopConnection,
    W: Write,
{
    let result = conn.query(sql, params).await?;
    write_table(out, &result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult {
            columns: vec!["fname".to_string(), "lname".to_string(), "bill".to_string()],
            rows: vec![
                vec![Some("Jane".to_string()), Some("Doe".to_string()), Some("80".to_string())],
                vec![Some("Sam".to_string()), Some("Ito".to_string()), None],
            ],
        }
    }

    #[test]
    fn test_render_table_snapshot() {
        let rendered = render_table(&sample()).replace('\t', " | ");
        insta::assert_snapshot!(rendered, @r"
        fname | lname | bill
        Jane | Doe | 80
        Sam | Ito | null
        ");
    }

    #[test]
    fn test_render_uses_tabs_without_trailing_separator() {
        let rendered = render_table(&sample());
        let first = rendered.lines().next().unwrap();
        assert_eq!(first, "fname\tlname\tbill");
        assert!(rendered.ends_with("null\n"));
    }

    #[test]
    fn test_empty_result_prints_nothing() {
        let result = QueryResult { columns: vec!["id".to_string()], rows: Vec::new() };
        assert_eq!(render_table(&result), "");
    }

    #[test]
    fn test_write_table_returns_row_count() {
        let mut out = Vec::new();
        let count = write_table(&mut out, &sample()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_row_count_line() {
        assert_eq!(row_count_line(0), "total row(s): 0");
        assert_eq!(row_count_line(12), "total row(s): 12");
    }
}
