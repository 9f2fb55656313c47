//! Lexer for the PPL query language.
//!
//! Tokenizes PPL source into a sequence of tokens with byte-span
//! information. Token type names follow the grammar's conventions
//! (`SEARCH`, `PIPE`, `INTEGER_LITERAL`, ...) so downstream consumers can
//! classify them for syntax coloring. Keywords are case-insensitive.

use chumsky::prelude::*;

/// A token kind in the PPL grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ========================================================================
    // Commands
    // ========================================================================
    Search,
    Describe,
    Show,
    Where,
    Fields,
    Rename,
    Stats,
    Dedup,
    Sort,
    Eval,
    Head,
    Top,
    Rare,
    Parse,
    Grok,
    Patterns,
    Lookup,
    Kmeans,
    Ad,
    Ml,

    // ========================================================================
    // Clause Keywords
    // ========================================================================
    As,
    By,
    Source,
    Index,
    From,
    Datasources,
    Span,

    // ========================================================================
    // Logical Keywords
    // ========================================================================
    And,
    Or,
    Not,
    Xor,
    True,
    False,
    In,
    Case,
    Else,
    Between,

    // ========================================================================
    // Sort/Field Modifiers
    // ========================================================================
    Asc,
    Desc,
    Auto,
    Str,
    Ip,
    Num,

    // ========================================================================
    // Built-in Functions
    // ========================================================================
    /// A recognized built-in function name, carried in canonical uppercase.
    Function(&'static str),

    // ========================================================================
    // Literals
    // ========================================================================
    IntegerLiteral,
    DecimalLiteral,
    /// A double-quoted string.
    DquotaString,
    /// A single-quoted string.
    SquotaString,
    /// A backtick-quoted identifier.
    BquotaString,
    /// A plain identifier.
    Id,

    // ========================================================================
    // Symbols
    // ========================================================================
    /// `|`
    Pipe,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Equal,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `<=`
    NotGreater,
    /// `>=`
    NotLess,
    /// `!=`
    NotEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Divide,
    /// `%`
    Module,
    /// `!`
    ExclamationSymbol,
    /// `:`
    Colon,
    /// `&`
    BitAndOp,
    /// `^`
    BitXorOp,
    /// `~`
    BitNotOp,
    /// `(`
    LtPrths,
    /// `)`
    RtPrths,
    /// `[`
    LtSqrPrths,
    /// `]`
    RtSqrPrths,

    // ========================================================================
    // Comments
    // ========================================================================
    LineComment,
    BlockComment,
}

impl TokenKind {
    /// The grammar-convention type name for this token.
    pub fn type_name(&self) -> &'static str {
        match self {
            // Commands
            TokenKind::Search => "SEARCH",
            TokenKind::Describe => "DESCRIBE",
            TokenKind::Show => "SHOW",
            TokenKind::Where => "WHERE",
            TokenKind::Fields => "FIELDS",
            TokenKind::Rename => "RENAME",
            TokenKind::Stats => "STATS",
            TokenKind::Dedup => "DEDUP",
            TokenKind::Sort => "SORT",
            TokenKind::Eval => "EVAL",
            TokenKind::Head => "HEAD",
            TokenKind::Top => "TOP",
            TokenKind::Rare => "RARE",
            TokenKind::Parse => "PARSE",
            TokenKind::Grok => "GROK",
            TokenKind::Patterns => "PATTERNS",
            TokenKind::Lookup => "LOOKUP",
            TokenKind::Kmeans => "KMEANS",
            TokenKind::Ad => "AD",
            TokenKind::Ml => "ML",

            // Clause keywords
            TokenKind::As => "AS",
            TokenKind::By => "BY",
            TokenKind::Source => "SOURCE",
            TokenKind::Index => "INDEX",
            TokenKind::From => "FROM",
            TokenKind::Datasources => "DATASOURCES",
            TokenKind::Span => "SPAN",

            // Logical keywords
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Xor => "XOR",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::In => "IN",
            TokenKind::Case => "CASE",
            TokenKind::Else => "ELSE",
            TokenKind::Between => "BETWEEN",

            // Sort/field modifiers
            TokenKind::Asc => "ASC",
            TokenKind::Desc => "DESC",
            TokenKind::Auto => "AUTO",
            TokenKind::Str => "STR",
            TokenKind::Ip => "IP",
            TokenKind::Num => "NUM",

            // Functions keep their canonical name
            TokenKind::Function(name) => name,

            // Literals
            TokenKind::IntegerLiteral => "INTEGER_LITERAL",
            TokenKind::DecimalLiteral => "DECIMAL_LITERAL",
            TokenKind::DquotaString => "DQUOTA_STRING",
            TokenKind::SquotaString => "SQUOTA_STRING",
            TokenKind::BquotaString => "BQUOTA_STRING",
            TokenKind::Id => "ID",

            // Symbols
            TokenKind::Pipe => "PIPE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Equal => "EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::Less => "LESS",
            TokenKind::NotGreater => "NOT_GREATER",
            TokenKind::NotLess => "NOT_LESS",
            TokenKind::NotEqual => "NOT_EQUAL",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Divide => "DIVIDE",
            TokenKind::Module => "MODULE",
            TokenKind::ExclamationSymbol => "EXCLAMATION_SYMBOL",
            TokenKind::Colon => "COLON",
            TokenKind::BitAndOp => "BIT_AND_OP",
            TokenKind::BitXorOp => "BIT_XOR_OP",
            TokenKind::BitNotOp => "BIT_NOT_OP",
            TokenKind::LtPrths => "LT_PRTHS",
            TokenKind::RtPrths => "RT_PRTHS",
            TokenKind::LtSqrPrths => "LT_SQR_PRTHS",
            TokenKind::RtSqrPrths => "RT_SQR_PRTHS",

            // Comments
            TokenKind::LineComment => "LINE_COMMENT",
            TokenKind::BlockComment => "COMMENT",
        }
    }
}

/// Map an identifier to a keyword, a built-in function, or a plain id.
/// PPL keywords are case-insensitive.
fn keyword_or_ident(s: &str) -> TokenKind {
    let lower = s.to_ascii_lowercase();
    match lower.as_str() {
        // Commands
        "search" => TokenKind::Search,
        "describe" => TokenKind::Describe,
        "show" => TokenKind::Show,
        "where" => TokenKind::Where,
        "fields" => TokenKind::Fields,
        "rename" => TokenKind::Rename,
        "stats" => TokenKind::Stats,
        "dedup" => TokenKind::Dedup,
        "sort" => TokenKind::Sort,
        "eval" => TokenKind::Eval,
        "head" => TokenKind::Head,
        "top" => TokenKind::Top,
        "rare" => TokenKind::Rare,
        "parse" => TokenKind::Parse,
        "grok" => TokenKind::Grok,
        "patterns" => TokenKind::Patterns,
        "lookup" => TokenKind::Lookup,
        "kmeans" => TokenKind::Kmeans,
        "ad" => TokenKind::Ad,
        "ml" => TokenKind::Ml,

        // Clause keywords
        "as" => TokenKind::As,
        "by" => TokenKind::By,
        "source" => TokenKind::Source,
        "index" => TokenKind::Index,
        "from" => TokenKind::From,
        "datasources" => TokenKind::Datasources,
        "span" => TokenKind::Span,

        // Logical keywords
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "xor" => TokenKind::Xor,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "in" => TokenKind::In,
        "case" => TokenKind::Case,
        "else" => TokenKind::Else,
        "between" => TokenKind::Between,

        // Sort/field modifiers
        "asc" => TokenKind::Asc,
        "desc" => TokenKind::Desc,
        "auto" => TokenKind::Auto,
        "str" => TokenKind::Str,
        "ip" => TokenKind::Ip,
        "num" => TokenKind::Num,

        _ => match function_name(&lower) {
            Some(name) => TokenKind::Function(name),
            None => TokenKind::Id,
        },
    }
}

/// Canonical name for a recognized built-in function, if any.
fn function_name(lower: &str) -> Option<&'static str> {
    Some(match lower {
        // Aggregations
        "avg" => "AVG",
        "count" => "COUNT",
        "distinct_count" => "DISTINCT_COUNT",
        "max" => "MAX",
        "mean" => "MEAN",
        "median" => "MEDIAN",
        "min" => "MIN",
        "mode" => "MODE",
        "range" => "RANGE",
        "stdev" => "STDEV",
        "sum" => "SUM",
        "var_samp" => "VAR_SAMP",
        "var_pop" => "VAR_POP",
        "stddev_samp" => "STDDEV_SAMP",
        "stddev_pop" => "STDDEV_POP",
        "percentile" => "PERCENTILE",
        "take" => "TAKE",
        "first" => "FIRST",
        "last" => "LAST",

        // Math
        "abs" => "ABS",
        "cbrt" => "CBRT",
        "ceil" => "CEIL",
        "ceiling" => "CEILING",
        "conv" => "CONV",
        "crc32" => "CRC32",
        "e" => "E",
        "exp" => "EXP",
        "floor" => "FLOOR",
        "ln" => "LN",
        "log" => "LOG",
        "log10" => "LOG10",
        "log2" => "LOG2",
        "mod" => "MOD",
        "pi" => "PI",
        "pow" => "POW",
        "power" => "POWER",
        "rand" => "RAND",
        "round" => "ROUND",
        "sign" => "SIGN",
        "sqrt" => "SQRT",
        "truncate" => "TRUNCATE",

        // Trigonometry
        "acos" => "ACOS",
        "asin" => "ASIN",
        "atan" => "ATAN",
        "atan2" => "ATAN2",
        "cos" => "COS",
        "cot" => "COT",
        "degrees" => "DEGREES",
        "radians" => "RADIANS",
        "sin" => "SIN",
        "tan" => "TAN",

        // Date/time
        "adddate" => "ADDDATE",
        "curdate" => "CURDATE",
        "date" => "DATE",
        "date_add" => "DATE_ADD",
        "date_format" => "DATE_FORMAT",
        "date_sub" => "DATE_SUB",
        "dayname" => "DAYNAME",
        "dayofmonth" => "DAYOFMONTH",
        "dayofweek" => "DAYOFWEEK",
        "dayofyear" => "DAYOFYEAR",
        "from_unixtime" => "FROM_UNIXTIME",
        "now" => "NOW",
        "unix_timestamp" => "UNIX_TIMESTAMP",

        // Strings
        "ascii" => "ASCII",
        "concat" => "CONCAT",
        "concat_ws" => "CONCAT_WS",
        "left" => "LEFT",
        "length" => "LENGTH",
        "locate" => "LOCATE",
        "lower" => "LOWER",
        "ltrim" => "LTRIM",
        "replace" => "REPLACE",
        "reverse" => "REVERSE",
        "right" => "RIGHT",
        "rtrim" => "RTRIM",
        "strcmp" => "STRCMP",
        "substr" => "SUBSTR",
        "substring" => "SUBSTRING",
        "trim" => "TRIM",
        "upper" => "UPPER",

        // Conditionals and casts
        "cast" => "CAST",
        "if" => "IF",
        "ifnull" => "IFNULL",
        "isnotnull" => "ISNOTNULL",
        "isnull" => "ISNULL",
        "like" => "LIKE",
        "nullif" => "NULLIF",
        "typeof" => "TYPEOF",

        // Full-text search
        "match" => "MATCH",
        "match_phrase" => "MATCH_PHRASE",
        "query_string" => "QUERY_STRING",

        _ => return None,
    })
}

/// Create a lexer for PPL source.
///
/// Returns a parser that tokenizes the input string into a sequence of
/// tokens with span information, skipping whitespace. Comments are kept as
/// tokens so the coloring path can style them.
pub fn lexer<'src>(
) -> impl Parser<'src, &'src str, Vec<(TokenKind, SimpleSpan)>, extra::Err<Rich<'src, char>>> {
    // Identifiers and keywords
    let ident = text::ident().map(keyword_or_ident);

    // String literals in three quote styles
    let dquota_string = just('"')
        .ignore_then(none_of('"').repeated().to_slice())
        .then_ignore(just('"'))
        .to(TokenKind::DquotaString);
    let squota_string = just('\'')
        .ignore_then(none_of('\'').repeated().to_slice())
        .then_ignore(just('\''))
        .to(TokenKind::SquotaString);
    let bquota_string = just('`')
        .ignore_then(none_of('`').repeated().to_slice())
        .then_ignore(just('`'))
        .to(TokenKind::BquotaString);

    // Numbers: integers and decimals
    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| {
            if s.contains('.') {
                TokenKind::DecimalLiteral
            } else {
                TokenKind::IntegerLiteral
            }
        });

    // Symbols (multi-char first, then single-char)
    let symbol = choice((
        just("!=").to(TokenKind::NotEqual),
        just("<=").to(TokenKind::NotGreater),
        just(">=").to(TokenKind::NotLess),
        just('|').to(TokenKind::Pipe),
        just(',').to(TokenKind::Comma),
        just('.').to(TokenKind::Dot),
        just('=').to(TokenKind::Equal),
        just('>').to(TokenKind::Greater),
        just('<').to(TokenKind::Less),
        just('+').to(TokenKind::Plus),
        just('-').to(TokenKind::Minus),
        just('*').to(TokenKind::Star),
        just('/').to(TokenKind::Divide),
        just('%').to(TokenKind::Module),
        just('!').to(TokenKind::ExclamationSymbol),
        just(':').to(TokenKind::Colon),
        just('&').to(TokenKind::BitAndOp),
        just('^').to(TokenKind::BitXorOp),
        just('~').to(TokenKind::BitNotOp),
        just('(').to(TokenKind::LtPrths),
        just(')').to(TokenKind::RtPrths),
        just('[').to(TokenKind::LtSqrPrths),
        just(']').to(TokenKind::RtSqrPrths),
    ));

    // Comments are tokens, not trivia, so the highlighter can style them
    let line_comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .to(TokenKind::LineComment);
    let block_comment = just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .to(TokenKind::BlockComment);

    // A single token with span
    let token = choice((
        line_comment,
        block_comment,
        dquota_string,
        squota_string,
        bquota_string,
        number,
        ident,
        symbol,
    ))
    .map_with(|tok, e| (tok, e.span()));

    token
        .padded()
        .repeated()
        .collect()
        .padded()
        .then_ignore(end())
}

/// Lex a source string, returning tokens (when recoverable) and errors.
pub fn lex(source: &str) -> (Option<Vec<(TokenKind, SimpleSpan)>>, Vec<Rich<'_, char>>) {
    lexer().parse(source).into_output_errors()
}
