use std::mem::take;

/// Tokenized sheet export. Position is the only identity a cell has.
pub type RawGrid = Vec<Vec<String>>;

/// Split delimited text into rows of trimmed fields.
///
/// Quotes make the delimiter and newlines literal, `""` inside quotes is one
/// quote, and `\r` is dropped everywhere. There is no error state: an
/// unterminated quote swallows the rest of the input into one field. Blank
/// lines are kept as `[""]` so row indices match the sheet.
pub fn tokenize(text: &str, sep: char) -> RawGrid {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {}
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field).trim().to_string());
            }
            '\n' if !in_quotes => {
                row.push(take(&mut field).trim().to_string());
                rows.push(take(&mut row));
            }
            c => field.push(c),
        }
    }

    // Unterminated last line.
    if !field.is_empty() || !row.is_empty() {
        row.push(field.trim().to_string());
        rows.push(row);
    }

    rows
}

/// Cell at `col`, or `""` past the end of a short row.
pub fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|s| s.trim()).unwrap_or("")
}

// ── Tests ──
