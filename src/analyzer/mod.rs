//! PPL language analyzer.
//!
//! Wraps the lexer into the two operations the language service exposes:
//! `tokenize` for syntax coloring and `validate` for diagnostics. Validation
//! covers the lexical grammar plus the pipeline structure of a PPL query
//! (`source=<index> | command | command ...`); it does not interpret command
//! arguments.
//!
//! Coordinate convention: lines are 1-based and columns are 0-based, the
//! grammar engine's native coordinate space. The marker mapper converts to
//! the editor's 1-based columns.

pub mod lexer;
mod position;
mod scopes;

use chumsky::error::Rich;
use chumsky::span::{SimpleSpan, Span as _};
use serde::{Deserialize, Serialize};

use lexer::TokenKind;
use position::line_column_at;

pub use position::LineColumn;
pub use scopes::{scope_for, ScopedToken};

/// A lexical token produced by [`PplAnalyzer::tokenize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Grammar token type name (`SEARCH`, `PIPE`, `ID`, ...).
    #[serde(rename = "type")]
    pub token_type: String,
    /// The source text of the token.
    pub value: String,
    /// Byte offset of the first character.
    pub start_index: usize,
    /// Byte offset of the last character (inclusive).
    pub stop_index: usize,
    /// 1-based line of the first character.
    pub line: u32,
    /// 0-based column of the first character.
    pub column: u32,
}

/// A syntax error produced by [`PplAnalyzer::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line of the error start.
    pub line: u32,
    /// 0-based column of the error start.
    pub column: u32,
    /// 1-based end line, when the error spans a known range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    /// 0-based exclusive end column, when the error spans a known range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

/// Result of validating a source string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<SyntaxError>,
}

/// Error type for analyzer operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("lex error at line {line}, column {column}: {message}")]
    Lex {
        message: String,
        line: u32,
        column: u32,
    },
}

/// The PPL language analyzer.
///
/// Stateless and cheap to construct; the worker entry point and the syntax
/// coloring path each own one instance, constructed lazily on first use.
#[derive(Debug, Default)]
pub struct PplAnalyzer;

impl PplAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize source text into a flat token list in document order.
    ///
    /// # Errors
    ///
    /// Fails when the source contains text the lexer cannot tokenize (for
    /// example an unterminated string).
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, AnalyzerError> {
        let (tokens, errs) = lexer::lex(text);
        if let Some(err) = errs.first() {
            let at = line_column_at(text, err.span().start());
            return Err(AnalyzerError::Lex {
                message: err.to_string(),
                line: at.line,
                column: at.column,
            });
        }

        Ok(tokens
            .unwrap_or_default()
            .into_iter()
            .map(|(kind, span)| {
                let at = line_column_at(text, span.start);
                Token {
                    token_type: kind.type_name().to_string(),
                    value: text[span.start..span.end].to_string(),
                    start_index: span.start,
                    stop_index: span.end.saturating_sub(1),
                    line: at.line,
                    column: at.column,
                }
            })
            .collect())
    }

    /// Validate source text, reporting lexical and pipeline-structure errors.
    ///
    /// Empty or whitespace-only input is considered valid: the editor shows
    /// no diagnostics for a query the user has not started typing.
    pub fn validate(&self, text: &str) -> ValidationResult {
        let (tokens, lex_errs) = lexer::lex(text);

        let mut errors: Vec<SyntaxError> = lex_errs
            .iter()
            .map(|e| rich_to_syntax_error(text, e))
            .collect();

        if let Some(tokens) = tokens {
            // comments are trivia as far as pipeline structure is concerned
            let significant: Vec<(TokenKind, SimpleSpan)> = tokens
                .into_iter()
                .filter(|(kind, _)| {
                    !matches!(kind, TokenKind::LineComment | TokenKind::BlockComment)
                })
                .collect();
            check_pipeline(text, &significant, &mut errors);
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Classify one line of source for syntax coloring.
    ///
    /// # Errors
    ///
    /// Fails when the line cannot be lexed; callers on the coloring path
    /// degrade to an uncolored line.
    pub fn line_scopes(&self, line: &str) -> Result<Vec<ScopedToken>, AnalyzerError> {
        let (tokens, errs) = lexer::lex(line);
        if let Some(err) = errs.first() {
            let at = line_column_at(line, err.span().start());
            return Err(AnalyzerError::Lex {
                message: err.to_string(),
                line: at.line,
                column: at.column,
            });
        }

        Ok(tokens
            .unwrap_or_default()
            .into_iter()
            .map(|(kind, span)| ScopedToken {
                start_index: span.start,
                scope: scope_for(kind),
            })
            .collect())
    }
}

/// Convert a lexer error into a wire syntax error.
fn rich_to_syntax_error(text: &str, err: &Rich<'_, char>) -> SyntaxError {
    let span = err.span();
    let start = line_column_at(text, span.start());
    let end = line_column_at(text, span.end());
    SyntaxError {
        message: err.to_string(),
        line: start.line,
        column: start.column,
        end_line: Some(end.line),
        end_column: Some(end.column),
    }
}

// ============================================================================
// Pipeline structure validation
// ============================================================================

/// Commands allowed to open a query.
fn is_search_head(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Search
            | TokenKind::Source
            | TokenKind::Index
            | TokenKind::Describe
            | TokenKind::Show
    )
}

/// Commands allowed after a pipe.
fn is_command_head(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Where
            | TokenKind::Fields
            | TokenKind::Rename
            | TokenKind::Stats
            | TokenKind::Dedup
            | TokenKind::Sort
            | TokenKind::Eval
            | TokenKind::Head
            | TokenKind::Top
            | TokenKind::Rare
            | TokenKind::Parse
            | TokenKind::Grok
            | TokenKind::Patterns
            | TokenKind::Lookup
            | TokenKind::Kmeans
            | TokenKind::Ad
            | TokenKind::Ml
    )
}

/// Check the `command | command | ...` shape of a query.
fn check_pipeline(
    text: &str,
    tokens: &[(TokenKind, SimpleSpan)],
    errors: &mut Vec<SyntaxError>,
) {
    if tokens.is_empty() {
        return;
    }

    // split on pipes, remembering each pipe's span for error anchoring
    let mut stages: Vec<Vec<(TokenKind, SimpleSpan)>> = vec![Vec::new()];
    let mut pipes: Vec<SimpleSpan> = Vec::new();
    for (kind, span) in tokens {
        if *kind == TokenKind::Pipe {
            pipes.push(*span);
            stages.push(Vec::new());
        } else {
            stages
                .last_mut()
                .expect("stages is never empty")
                .push((*kind, *span));
        }
    }

    for (i, stage) in stages.iter().enumerate() {
        let expectation = if i == 0 {
            "expecting a search command"
        } else {
            "expecting a PPL command"
        };

        let (head, span) = match stage.first() {
            Some((kind, span)) => (*kind, *span),
            None => {
                if i == pipes.len() {
                    // trailing pipe, nothing after it
                    errors.push(eof_error(text, expectation));
                } else {
                    // leading pipe (i == 0) or an empty stage between pipes
                    errors.push(span_error(text, pipes[i], expectation));
                }
                continue;
            }
        };

        if i == 0 {
            if !is_search_head(head) {
                errors.push(span_error(text, span, expectation));
            } else if matches!(head, TokenKind::Source | TokenKind::Index) {
                check_source_clause(text, stage, errors);
            } else if head == TokenKind::Search {
                // `search source=<index> ...` delegates to the same clause check
                if matches!(
                    stage.get(1),
                    Some((TokenKind::Source | TokenKind::Index, _))
                ) {
                    check_source_clause(text, &stage[1..], errors);
                }
            }
        } else if !is_command_head(head) {
            errors.push(span_error(text, span, expectation));
        }
    }
}

/// Check `source = <index>` within the opening stage. `clause[0]` is the
/// SOURCE or INDEX keyword.
fn check_source_clause(
    text: &str,
    clause: &[(TokenKind, SimpleSpan)],
    errors: &mut Vec<SyntaxError>,
) {
    match clause.get(1) {
        Some((TokenKind::Equal, _)) => match clause.get(2) {
            Some((
                TokenKind::Id
                | TokenKind::DquotaString
                | TokenKind::SquotaString
                | TokenKind::BquotaString,
                _,
            )) => {}
            Some((_, span)) => errors.push(span_error(text, *span, "expecting an index name")),
            None => errors.push(eof_error(text, "expecting an index name")),
        },
        Some((_, span)) => errors.push(span_error(text, *span, "expecting '='")),
        None => errors.push(eof_error(text, "expecting '='")),
    }
}

/// Error anchored to a token span.
fn span_error(text: &str, span: SimpleSpan, expectation: &str) -> SyntaxError {
    let start = line_column_at(text, span.start);
    let end = line_column_at(text, span.end);
    SyntaxError {
        message: format!(
            "mismatched input '{}' {}",
            &text[span.start..span.end],
            expectation
        ),
        line: start.line,
        column: start.column,
        end_line: Some(end.line),
        end_column: Some(end.column),
    }
}

/// Error anchored to the end of the input, with no explicit end so the
/// marker mapper gives it a one-character span.
fn eof_error(text: &str, expectation: &str) -> SyntaxError {
    let at = line_column_at(text, text.len());
    SyntaxError {
        message: format!("mismatched input '<EOF>' {}", expectation),
        line: at.line,
        column: at.column,
        end_line: None,
        end_column: None,
    }
}
