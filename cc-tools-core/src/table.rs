//! A bordered, fixed-width text table used by the skip-registry listing and
//! by other status-like presentations.

/// Render `headers` and `rows` into a bordered table with the given
/// per-column `widths`. Cells longer than their column width are truncated
/// with an ellipsis; shorter cells are padded.
pub fn render(headers: &[&str], widths: &[usize], rows: &[Vec<String>]) -> String {
    assert_eq!(headers.len(), widths.len(), "one width per header");

    let mut out = String::new();
    let border = border_line(widths);

    out.push_str(&border);
    out.push('\n');
    out.push_str(&row_line(
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
        widths,
    ));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');

    for row in rows {
        out.push_str(&row_line(row, widths));
        out.push('\n');
    }

    if !rows.is_empty() {
        out.push_str(&border);
        out.push('\n');
    }

    out
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(&fit(cell, *width));
        line.push(' ');
        line.push('|');
    }
    line
}

fn fit(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        format!("{cell:<width$}")
    } else if width >= 1 {
        let truncated: String = cell.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}\u{2026}")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_a_deterministic_bordered_table() {
        let rendered = render(
            &["Directory", "Lint", "Test"],
            &[9, 4, 4],
            &[vec!["/tmp".to_string(), "yes".to_string(), "no".to_string()]],
        );
        let expected = "\
+-----------+------+------+
| Directory | Lint | Test |
+-----------+------+------+
| /tmp      | yes  | no   |
+-----------+------+------+
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn empty_rows_still_render_the_header() {
        let rendered = render(&["A"], &[3], &[]);
        assert!(rendered.contains("| A   |"));
    }

    #[test]
    fn long_cells_are_truncated_with_an_ellipsis() {
        let rendered = render(
            &["Name"],
            &[5],
            &[vec!["a-very-long-value".to_string()]],
        );
        assert!(rendered.contains('\u{2026}'));
    }
}
