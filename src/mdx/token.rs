//! MDX tokens - the atomic units of MDX output.
//!
//! Tokens are the serializer's vocabulary: every element of a generated
//! query is one of these variants, so adding a variant forces every
//! consumer to handle it.

/// MDX token - every possible element in a generated query.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    On,
    Columns,
    Rows,
    Asc,
    Desc,
    And,

    // === Set functions ===
    Crossjoin,
    NonEmpty,
    Order,
    TopCount,
    Filter,

    // === Member navigation / properties ===
    Members,
    Children,
    Parent,
    CurrentMember,
    MemberCaption,
    MemberValue,

    // === Scalar functions used in filter predicates ===
    InStr,
    Left,
    Right,
    Len,

    // === Punctuation ===
    Comma,
    Dot,
    LBrace,
    RBrace,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Bracketed name: `[Dim Store]`, `[Store ID]`, `[Measures]`
    Bracketed(String),
    /// Member key reference: `&[5]`
    Key(String),
    /// String literal, double-quoted with internal quotes doubled
    LitString(String),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
}

impl Token {
    /// Serialize this token to its textual form.
    pub fn serialize(&self) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::On => "ON".into(),
            Token::Columns => "COLUMNS".into(),
            Token::Rows => "ROWS".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::And => "AND".into(),

            // Set functions
            Token::Crossjoin => "CROSSJOIN".into(),
            Token::NonEmpty => "NONEMPTY".into(),
            Token::Order => "ORDER".into(),
            Token::TopCount => "TOPCOUNT".into(),
            Token::Filter => "FILTER".into(),

            // Member navigation / properties
            Token::Members => "MEMBERS".into(),
            Token::Children => "CHILDREN".into(),
            Token::Parent => "PARENT".into(),
            Token::CurrentMember => "CURRENTMEMBER".into(),
            Token::MemberCaption => "MEMBER_CAPTION".into(),
            Token::MemberValue => "MEMBERVALUE".into(),

            // Scalar functions
            Token::InStr => "INSTR".into(),
            Token::Left => "LEFT".into(),
            Token::Right => "RIGHT".into(),
            Token::Len => "LEN".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Gt => ">".into(),
            Token::Lt => "<".into(),
            Token::Gte => ">=".into(),
            Token::Lte => "<=".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "  ".repeat(*n),

            // Dynamic content
            Token::Bracketed(name) => format!("[{}]", name.replace(']', "]]")),
            Token::Key(key) => format!("&[{}]", key.replace(']', "]]")),
            Token::LitString(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                if f.is_nan() {
                    panic!("Cannot serialize NaN to MDX")
                }
                if f.is_infinite() {
                    panic!("Cannot serialize Infinity to MDX")
                }
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
        }
    }
}

/// A stream of tokens that can be serialized to an MDX string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to an MDX string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(Token::serialize).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn dot(&mut self) -> &mut Self {
        self.push(Token::Dot)
    }
    pub fn lbrace(&mut self) -> &mut Self {
        self.push(Token::LBrace)
    }
    pub fn rbrace(&mut self) -> &mut Self {
        self.push(Token::RBrace)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
