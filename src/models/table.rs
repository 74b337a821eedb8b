//! Result table handed to the output sinks.

use std::fmt;

use crate::error::{AppError, Result};

/// One fixed-arity tuple of display strings.
pub type Row = Vec<String>;

/// Header row followed by data rows, in the order they were produced.
///
/// Every row has the same arity as the header; [`ResultTable::push`] refuses
/// rows that would break that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    header: Row,
    rows: Vec<Row>,
}

impl ResultTable {
    /// Create an empty table with the given column names.
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row.
    pub fn push<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) -> Result<()> {
        let row: Row = row.into_iter().map(Into::into).collect();
        if row.len() != self.header.len() {
            return Err(AppError::validation(format!(
                "row has {} cells, header has {}",
                row.len(),
                self.header.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn arity(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header first, then data rows.
    pub fn iter_all(&self) -> impl Iterator<Item = &Row> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_all() {
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_wrong_arity() {
        let mut table = ResultTable::new(["a", "b"]);
        assert!(table.push(["1", "2"]).is_ok());
        assert!(table.push(["1"]).is_err());
        assert!(table.push(["1", "2", "3"]).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_iter_all_starts_with_header() {
        let mut table = ResultTable::new(["Status", "Count"]);
        table.push(["Final", "3"]).unwrap();

        let rows: Vec<_> = table.iter_all().collect();
        assert_eq!(rows[0], &vec!["Status".to_string(), "Count".to_string()]);
        assert_eq!(rows[1], &vec!["Final".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_display_one_row_per_line() {
        let mut table = ResultTable::new(["Status", "Count"]);
        table.push(["Final", "3"]).unwrap();
        assert_eq!(table.to_string(), "Status Count\nFinal 3\n");
    }
}
