use std::fmt;

use crate::position::Position;

/// Entity types a script can declare.
pub const CLASS_TYPES: &[&str] = &["Product", "Supplier", "Order"];

/// Attribute keywords of the entity types.
pub const ATTRIBUTES: &[&str] = &[
    "name",
    "supplier",
    "product",
    "quantity",
    "location",
    "weight",
    "unitPrice",
    "deliveryDate",
];

/// Command keywords.
pub const RESERVED_WORDS: &[&str] = &[
    "alert",
    "undo",
    "exec",
    "update",
    "optimize",
    "show",
    "allowArithmetic",
];

/// Long command spellings split into `(word, reserved prefix, noise suffix)`.
pub const NOISE_WORDS: &[(&str, &str, &str)] = &[
    ("execute", "exec", "ute"),
    ("updateInventory", "update", "Inventory"),
    ("optimizeInventoryLevels", "optimize", "InventoryLevels"),
];

/// Separator between the reserved prefix and the noise suffix in a
/// split reserved word's value.
pub const NOISE_MARKER: &str = " | NOISEWORD: ";

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Int,
    Float,
    StringLiteral,
    Identifier,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semicolon,
    /// Reserved for a bare `:`; the lexer emits [`TokenKind::AssignColon`].
    Colon,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `=`
    AssignEqual,
    /// `:`
    AssignColon,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    /// `/.`
    FloorDiv,
    /// `==`
    Equiv,
    NotEqual,
    Greater,
    Less,
    LessEqual,
    GreaterEqual,
    And,
    Or,
    Not,
    /// `//`
    SingleCommentStart,
    /// Body of a single-line or block comment.
    CommentText,
    /// `/*`
    BlockCommentStart,
    /// `*/`
    BlockCommentEnd,
    /// One of [`CLASS_TYPES`].
    ClassType,
    /// One of [`ATTRIBUTES`].
    Attribute,
    /// One of [`RESERVED_WORDS`], possibly with a noise suffix.
    ReservedWord,
    /// Maximal run of special punctuation.
    SpecialChar,
    Eof,
}

impl TokenKind {
    /// Display label used when rendering tokens.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::StringLiteral => "STRINGLITERAL",
            Self::Identifier => "IDENTIFIER",
            Self::LParen => "LEFTPAREN",
            Self::RParen => "RIGHTPAREN",
            Self::Semicolon => "SEMICOLON",
            Self::Colon => "COLON",
            Self::OpenCurly => "OPENCURLBRACE",
            Self::CloseCurly => "CLOSECURLBRACE",
            Self::AssignEqual => "ASSIGNOPRTR_EQUAL",
            Self::AssignColon => "ASSIGNOPRTR_COLON",
            Self::Add => "ADDSYMBOL",
            Self::Sub => "SUBTRACTSYMBOL",
            Self::Mul => "MULTIPLYSYMBOL",
            Self::Div => "DIVISIONSYMBOL",
            Self::Mod => "MOD",
            Self::Exp => "EXP",
            Self::FloorDiv => "FLOOR",
            Self::Equiv => "EQUIVAL",
            Self::NotEqual => "NOTEQUAL",
            Self::Greater => "GREATER",
            Self::Less => "LESS",
            Self::LessEqual => "LEQUAL",
            Self::GreaterEqual => "GEQUAL",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::SingleCommentStart => "SINGLECOMMENT",
            Self::CommentText => "COMMENT",
            Self::BlockCommentStart => "STARTCOMMENT",
            Self::BlockCommentEnd => "ENDCOMMENT",
            Self::ClassType => "CLASSTYPE",
            Self::Attribute => "ATTRIBUTE",
            Self::ReservedWord => "RESERVEDWORD",
            Self::SpecialChar => "SPECIALCHAR",
            Self::Eof => "EOF",
        }
    }

    /// Fixed lexeme for punctuation, operator, and comment marker kinds.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        let sym = match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Semicolon => ";",
            Self::Colon | Self::AssignColon => ":",
            Self::OpenCurly => "{",
            Self::CloseCurly => "}",
            Self::AssignEqual => "=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Exp => "^",
            Self::FloorDiv => "/.",
            Self::Equiv => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
            Self::SingleCommentStart => "//",
            Self::BlockCommentStart => "/*",
            Self::BlockCommentEnd => "*/",
            _ => return None,
        };
        Some(sym)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single token with its kind, optional value, and source range.
///
/// Numeric literals keep their source text in `value`; conversion to a
/// number happens at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
    pub pos_start: Position,
    pub pos_end: Position,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, pos_start: Position, pos_end: Position) -> Self {
        Self {
            kind,
            value: None,
            pos_start,
            pos_end,
        }
    }

    #[must_use]
    pub fn with_value(
        kind: TokenKind,
        value: impl Into<String>,
        pos_start: Position,
        pos_end: Position,
    ) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            pos_start,
            pos_end,
        }
    }

    /// True if this token has kind `kind`.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Value text, or the empty string for value-less tokens.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Split a reserved word's value into its prefix and optional noise suffix.
    #[must_use]
    pub fn reserved_parts(&self) -> Option<(&str, Option<&str>)> {
        if self.kind != TokenKind::ReservedWord {
            return None;
        }
        let value = self.text().trim_start();
        Some(match value.split_once(NOISE_MARKER) {
            Some((word, noise)) => (word, Some(noise)),
            None => (value, None),
        })
    }
}

/// `KIND:value` or `KIND`. A multi-line value renders one row per line,
/// each prefixed with the label.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.kind.label();
        match &self.value {
            None => f.write_str(label),
            Some(value) => {
                for (i, line) in value.split('\n').enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{label}:{line}")?;
                }
                Ok(())
            }
        }
    }
}
