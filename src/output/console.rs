// src/output/console.rs

//! Console sinks.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::models::ResultTable;

use super::{OutputContext, TableSink};

/// Prints each row with cells separated by single spaces.
pub struct LinePrinter;

impl TableSink for LinePrinter {
    fn emit(&self, table: &ResultTable, _context: &OutputContext) -> Result<()> {
        print!("{}", render_lines(table));
        Ok(())
    }
}

/// Prints a left-aligned table with box borders.
pub struct PrettyPrinter;

impl TableSink for PrettyPrinter {
    fn emit(&self, table: &ResultTable, _context: &OutputContext) -> Result<()> {
        print!("{}", render_pretty(table));
        Ok(())
    }
}

pub fn render_lines(table: &ResultTable) -> String {
    table.to_string()
}

/// Display width in grapheme clusters.
fn width(cell: &str) -> usize {
    cell.graphemes(true).count()
}

pub fn render_pretty(table: &ResultTable) -> String {
    let widths: Vec<usize> = (0..table.arity())
        .map(|col| {
            table
                .iter_all()
                .map(|row| width(&row[col]))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let render_row = |row: &[String]| {
        let mut line = String::from("|");
        for (cell, w) in row.iter().zip(&widths) {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(w - width(cell) + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = border.clone();
    out.push_str(&render_row(table.header()));
    out.push_str(&border);
    for row in table.rows() {
        out.push_str(&render_row(row.as_slice()));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultTable {
        let mut table = ResultTable::new(["Status", "Count"]);
        table.push(["Final", "12"]).unwrap();
        table.push(["Total", "7"]).unwrap();
        table
    }

    #[test]
    fn test_render_lines() {
        assert_eq!(render_lines(&sample()), "Status Count\nFinal 12\nTotal 7\n");
    }

    #[test]
    fn test_render_pretty_aligns_left() {
        let expected = "\
+--------+-------+
| Status | Count |
+--------+-------+
| Final  | 12    |
| Total  | 7     |
+--------+-------+
";
        assert_eq!(render_pretty(&sample()), expected);
    }

    #[test]
    fn test_render_pretty_counts_graphemes() {
        let mut table = ResultTable::new(["Title"]);
        table.push(["What\u{2019}s New"]).unwrap();
        let rendered = render_pretty(&table);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "+------------+");
        assert_eq!(lines[3], "| What\u{2019}s New |");
    }
}
