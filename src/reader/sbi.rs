//! State Bank of India text statement reader.
//!
//! SBI's "download as text" export is a tab-separated key/value header:
//!   Account Number         :\t_00000031234567890
//!   Opening Balance        :\t1,20,000.00
//!   Closing Balance        :\t1,35,250.75
//! The leading underscore keeps spreadsheets from eating zeros.

use std::io::{BufRead, BufReader, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::{clean_account_field, LabelledFields, StatementReader};
use crate::error::{HomefinError, Result};
use crate::models::ExtractedStatement;

fn header_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<label>[^:\t]+?)\s*:\s*(?P<value>.*?)\s*$").expect("valid regex")
    })
}

fn clean_sbi_account(raw: &str) -> String {
    clean_account_field(raw).trim_start_matches('_').trim().to_string()
}

#[derive(Debug, Default)]
pub struct SbiReader {
    fields: LabelledFields,
}

impl StatementReader for SbiReader {
    fn bank_id(&self) -> &str {
        "sbi"
    }

    fn parse(&mut self, input: &mut dyn Read) -> Result<()> {
        self.fields = LabelledFields::default();
        let re = header_line_re();

        for line in BufReader::new(input).lines() {
            let line = line.map_err(|e| {
                HomefinError::InvalidInput(format!("unreadable sbi statement line: {e}"))
            })?;
            let Some(caps) = re.captures(&line) else {
                continue;
            };
            self.fields.apply(&caps["label"], &caps["value"], clean_sbi_account);
        }

        self.fields.finish(self.bank_id())
    }

    fn extract_account_info(&self) -> Option<ExtractedStatement> {
        self.fields.complete()
    }
}
