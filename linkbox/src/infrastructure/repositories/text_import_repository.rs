// src/infrastructure/repositories/text_import_repository.rs

use crate::domain::bookmark::BookmarkCandidate;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::import_repository::ImportRepository;
use csv::{ReaderBuilder, StringRecord, Terminator, Trim};
use tracing::{debug, instrument, trace};

/// Parses `category,title,url,username,defaultBrowser` lines.
///
/// Every non-blank line is read as one delimited record, so double quotes
/// protect embedded commas. Missing trailing fields stay `None`, fields past
/// the fifth are ignored. Only `\n` ends a record; a stray `\r` inside a line
/// is field content.
#[derive(Debug, Default)]
pub struct TextImportRepository;

impl TextImportRepository {
    pub fn new() -> Self {
        Self
    }

    fn parse_line(&self, line: &str, line_no: usize) -> DomainResult<BookmarkCandidate> {
        let line = tighten_delimiters(line);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .terminator(Terminator::Any(b'\n'))
            .from_reader(line.as_bytes());

        let record = match reader.records().next() {
            Some(record) => record.map_err(|e| {
                DomainError::Other(format!("Failed to parse line {}: {}", line_no, e))
            })?,
            None => StringRecord::new(),
        };
        trace!("line {}: {:?}", line_no, record);

        let field = |i: usize| record.get(i).map(|value| value.trim().to_string());
        Ok(BookmarkCandidate {
            category: field(0),
            title: field(1),
            url: field(2),
            username: field(3),
            default_browser: field(4),
        })
    }
}

/// Drops whitespace around unquoted delimiters so that `a, "b, c"` opens a
/// quoted field at `"`. Quoted content is copied untouched.
fn tighten_delimiters(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut closed_quote = false;

    for c in line.chars() {
        if in_quotes {
            out.push(c);
            if c == '"' {
                in_quotes = false;
                closed_quote = true;
            }
            continue;
        }
        match c {
            ',' => {
                pending.clear();
                out.push(c);
                at_field_start = true;
            }
            c if c.is_whitespace() => {
                if !at_field_start {
                    pending.push(c);
                }
            }
            _ => {
                out.push_str(&pending);
                pending.clear();
                // `""` inside a quoted field reopens it
                in_quotes = c == '"' && (at_field_start || closed_quote);
                out.push(c);
                at_field_start = false;
            }
        }
        closed_quote = false;
    }
    out
}

impl ImportRepository for TextImportRepository {
    #[instrument(skip_all, level = "debug")]
    fn parse_text(&self, content: &str) -> DomainResult<Vec<BookmarkCandidate>> {
        let mut candidates = Vec::new();

        for (i, line) in content.split('\n').enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            candidates.push(self.parse_line(line, i + 1)?);
        }

        debug!("Parsed {} candidate records", candidates.len());
        Ok(candidates)
    }
}
