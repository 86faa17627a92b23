//! Minimal CSV reader for sheet exports.
//!
//! Handles quoted fields, doubled-quote escapes and newlines inside quotes.
//! All cells come out as strings; numeric coercion is the normalizer's job.

/// Parse CSV text into records of string cells.
///
/// Empty lines between records are dropped; a trailing newline does not
/// produce a trailing empty record.
pub fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut cell));
            }
            '\r' => {
                // Swallow the \n of a \r\n pair; bare \r also ends the record.
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut records, &mut record, &mut cell);
            }
            '\n' => end_record(&mut records, &mut record, &mut cell),
            _ => cell.push(c),
        }
    }
    end_record(&mut records, &mut record, &mut cell);

    records
}

fn end_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, cell: &mut String) {
    if record.is_empty() && cell.is_empty() {
        return;
    }
    record.push(std::mem::take(cell));
    records.push(std::mem::take(record));
}
