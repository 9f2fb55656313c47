//! Token classification for editor syntax coloring.
//!
//! Maps lexer token kinds to the editor's scope classes. The class names
//! (`keyword`, `predefined`, `operator`, ...) are the standard token classes
//! editor themes style out of the box.

use super::lexer::TokenKind;

/// A colored span on a single line: the byte index where it starts and the
/// scope class applied from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedToken {
    pub start_index: usize,
    pub scope: &'static str,
}

/// The editor scope class for a token kind.
pub fn scope_for(kind: TokenKind) -> &'static str {
    use TokenKind::*;
    match kind {
        // Commands, clause keywords, logical operators, modifiers
        Search | Describe | Show | Where | Fields | Rename | Stats | Dedup | Sort | Eval
        | Head | Top | Rare | Parse | Grok | Patterns | Lookup | Kmeans | Ad | Ml | As | By
        | Source | Index | From | Datasources | Span | And | Or | Not | Xor | True | False
        | In | Case | Else | Between | Asc | Desc | Auto | Str | Ip | Num => "keyword",

        // Built-in functions
        Function(_) => "predefined",

        // Operators
        Pipe | Comma | Dot | Equal | Greater | Less | NotGreater | NotLess | NotEqual | Plus
        | Minus | Star | Divide | Module | ExclamationSymbol | Colon | BitAndOp | BitXorOp
        | BitNotOp => "operator",

        // Brackets and delimiters
        LtPrths | RtPrths | LtSqrPrths | RtSqrPrths => "delimiter",

        // Field names and identifiers
        Id => "variable",

        // Literals
        DquotaString | SquotaString | BquotaString => "string",
        IntegerLiteral | DecimalLiteral => "number",

        // Comments
        LineComment | BlockComment => "comment",
    }
}
