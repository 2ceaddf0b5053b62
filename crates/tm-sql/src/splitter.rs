//! Statement splitting for migration files
//!
//! A migration file is a sequence of statements separated by `;`. The file
//! is tokenized with the configured dialect so that separators inside string
//! literals, quoted identifiers and comments are left alone. Statement text
//! is sliced from the source, so literals reach the backend exactly as
//! written. Comments are stripped because not every backend accepts them in
//! schema-change batches.

use sqlparser::tokenizer::{Location, Token, TokenWithSpan, Tokenizer, TokenizerError, Whitespace};

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};

/// Split raw file contents into ordered, non-empty, comment-free statements.
///
/// `filename` is only used to label tokenizer errors.
pub fn split_statements(
    sql: &str,
    filename: &str,
    dialect: &dyn SqlDialect,
) -> SqlResult<Vec<String>> {
    let tokens = Tokenizer::new(dialect.parser_dialect(), sql)
        .with_unescape(false)
        .tokenize_with_location()
        .map_err(|e| tokenize_error(filename, e))?;
    let offsets = SourceOffsets::new(sql);

    let mut statements = Vec::new();
    let mut current = String::new();

    for TokenWithSpan { token, span } in &tokens {
        match token {
            Token::SemiColon => push_statement(&mut current, &mut statements),
            // A line comment swallows its newline; keep the line break so the
            // tokens on either side don't fuse.
            Token::Whitespace(Whitespace::SingleLineComment { .. }) => current.push('\n'),
            Token::Whitespace(Whitespace::MultiLineComment(_)) => current.push(' '),
            Token::EOF => {}
            _ => current.push_str(offsets.slice(span.start, span.end)),
        }
    }
    push_statement(&mut current, &mut statements);

    log::debug!(
        "Split {} into {} statement(s) as {}",
        filename,
        statements.len(),
        dialect.name()
    );
    Ok(statements)
}

/// Tokenize without unescaping literals.
pub(crate) fn tokenize(sql: &str, dialect: &dyn SqlDialect) -> Result<Vec<Token>, TokenizerError> {
    Tokenizer::new(dialect.parser_dialect(), sql)
        .with_unescape(false)
        .tokenize()
}

/// Maps tokenizer locations (1-based line, 1-based char column) to byte
/// offsets in the source.
struct SourceOffsets<'a> {
    sql: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceOffsets<'a> {
    fn new(sql: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(sql.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { sql, line_starts }
    }

    fn offset(&self, location: Location) -> usize {
        let line = (location.line as usize).saturating_sub(1);
        let Some(&start) = self.line_starts.get(line) else {
            return self.sql.len();
        };
        let column = (location.column as usize).saturating_sub(1);
        self.sql[start..]
            .char_indices()
            .nth(column)
            .map_or(self.sql.len(), |(idx, _)| start + idx)
    }

    /// Source text between two locations, end exclusive.
    fn slice(&self, start: Location, end: Location) -> &'a str {
        let from = self.offset(start);
        let to = self.offset(end).max(from);
        &self.sql[from..to]
    }
}

fn tokenize_error(filename: &str, err: TokenizerError) -> SqlError {
    SqlError::Tokenize {
        file: filename.to_string(),
        message: err.message,
        line: err.location.line as usize,
        column: err.location.column as usize,
    }
}

fn push_statement(current: &mut String, statements: &mut Vec<String>) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
