//! Canara Bank CSV statement reader.
//!
//! The export starts with two-column summary rows before the transaction
//! table:
//!   Account Number,="500012456   "
//!   Opening Balance,"Rs.2,74,369.09"
//!   Closing Balance,"Rs.7,43,483.09"

use std::io::Read;

use super::{clean_account_field, LabelledFields, StatementReader};
use crate::error::Result;
use crate::models::ExtractedStatement;

/// Rewrite the raw export so every quoted cell opens at the start of its
/// field, which is where the csv parser looks for quotes.
///
/// Canara exports pad cells after the comma (`Opening Balance, "Rs.7,43,483.09"`)
/// and wrap account numbers as spreadsheet formulas (`="500012456"`). Both
/// would otherwise leave the quote mid-field and split the amount at its
/// grouping commas. Whitespace around unquoted separators is dropped, as is a
/// `=` directly in front of an opening quote. Quoted content is copied as is.
fn tidy_cells(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut in_quotes = false;
    let mut field_start = true;
    let mut bytes = raw.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        if in_quotes {
            out.push(b);
            if b == b'"' {
                if bytes.peek() == Some(&b'"') {
                    out.push(b'"');
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match b {
            b' ' | b'\t' if field_start => {}
            b'=' if field_start && bytes.peek() == Some(&b'"') => {}
            b',' | b'\n' | b'\r' => {
                trim_trailing_blanks(&mut out);
                out.push(b);
                field_start = true;
            }
            b'"' if field_start => {
                out.push(b);
                in_quotes = true;
                field_start = false;
            }
            _ => {
                out.push(b);
                field_start = false;
            }
        }
    }
    trim_trailing_blanks(&mut out);
    out
}

fn trim_trailing_blanks(out: &mut Vec<u8>) {
    while matches!(out.last(), Some(b' ' | b'\t')) {
        out.pop();
    }
}

#[derive(Debug, Default)]
pub struct CanaraReader {
    fields: LabelledFields,
}

impl StatementReader for CanaraReader {
    fn bank_id(&self) -> &str {
        "canara"
    }

    fn parse(&mut self, input: &mut dyn Read) -> Result<()> {
        self.fields = LabelledFields::default();

        let mut raw = Vec::new();
        input.read_to_end(&mut raw)?;
        let tidy = tidy_cells(&raw);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(tidy.as_slice());

        for result in rdr.records() {
            let record = result?;
            if record.len() < 2 {
                continue;
            }
            self.fields.apply(&record[0], &record[1], clean_account_field);
        }

        self.fields.finish(self.bank_id())
    }

    fn extract_account_info(&self) -> Option<ExtractedStatement> {
        self.fields.complete()
    }
}
