//! Set-expression AST - the core of MDX query building.
//!
//! Axis and slicer content is built as a tree of [`SetExpr`] nodes and
//! serialized in one place, so composition rules (ordering wraps the raw
//! set, non-emptiness wraps the ordered set, limits wrap last) are carried
//! by the tree shape rather than by string concatenation order.

use super::token::{Token, TokenStream};

// =============================================================================
// Member paths
// =============================================================================

/// A dimension level: `[Dim Store].[Store ID]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRef {
    pub dimension: String,
    pub level: String,
}

impl LevelRef {
    pub fn new(dimension: &str, level: &str) -> Self {
        Self {
            dimension: dimension.into(),
            level: level.into(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Bracketed(self.dimension.clone()))
            .dot()
            .push(Token::Bracketed(self.level.clone()));
        ts
    }

    /// The member this level pins when a key is supplied.
    pub fn member(&self, key: &str) -> MemberRef {
        MemberRef {
            level: self.clone(),
            key: key.into(),
        }
    }
}

/// A concrete member at a level: `[Dim Store].[Store ID].&[5]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRef {
    pub level: LevelRef,
    pub key: String,
}

impl MemberRef {
    pub fn new(dimension: &str, level: &str, key: &str) -> Self {
        LevelRef::new(dimension, level).member(key)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.level.to_tokens();
        ts.dot().push(Token::Key(self.key.clone()));
        ts
    }
}

// =============================================================================
// Scalar literals
// =============================================================================

/// A comparable literal in a member-value predicate.
///
/// Member values arrive from JSON as numbers or strings; both are legal
/// comparands for `MEMBERVALUE`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Scalar::Int(n) => ts.push(Token::LitInt(*n)),
            Scalar::Float(f) => ts.push(Token::LitFloat(*f)),
            Scalar::Text(s) => ts.push(Token::LitString(s.clone())),
        };
        ts
    }
}

// =============================================================================
// Sort direction
// =============================================================================

/// Sort direction for `ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Member predicates
// =============================================================================

/// How a caption literal is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionMatch {
    Contains,
    StartsWith,
    EndsWith,
}

/// Comparison applied to a member's own value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCmp {
    Gt,
    Lt,
}

/// A predicate over the current member of a level, used inside `FILTER`.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberPredicate {
    /// Substring test against the member's display caption.
    Caption {
        level: LevelRef,
        matcher: CaptionMatch,
        literal: String,
    },
    /// Comparison against the member's value.
    Value {
        level: LevelRef,
        cmp: ValueCmp,
        literal: Scalar,
    },
    /// Inclusive range test against the member's value.
    ValueBetween {
        level: LevelRef,
        min: Scalar,
        max: Scalar,
    },
}

impl MemberPredicate {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            MemberPredicate::Caption {
                level,
                matcher,
                literal,
            } => match matcher {
                // INSTR(caption, "lit") > 0
                CaptionMatch::Contains => {
                    ts.push(Token::InStr).lparen();
                    ts.append(&caption_tokens(level));
                    ts.comma().space().push(Token::LitString(literal.clone()));
                    ts.rparen()
                        .space()
                        .push(Token::Gt)
                        .space()
                        .push(Token::LitInt(0));
                }
                // LEFT(caption, LEN("lit")) = "lit"
                CaptionMatch::StartsWith => {
                    ts.append(&edge_match_tokens(Token::Left, level, literal));
                }
                // RIGHT(caption, LEN("lit")) = "lit"
                CaptionMatch::EndsWith => {
                    ts.append(&edge_match_tokens(Token::Right, level, literal));
                }
            },
            MemberPredicate::Value {
                level,
                cmp,
                literal,
            } => {
                ts.append(&value_tokens(level));
                ts.space()
                    .push(match cmp {
                        ValueCmp::Gt => Token::Gt,
                        ValueCmp::Lt => Token::Lt,
                    })
                    .space();
                ts.append(&literal.to_tokens());
            }
            MemberPredicate::ValueBetween { level, min, max } => {
                ts.append(&value_tokens(level));
                ts.space().push(Token::Gte).space();
                ts.append(&min.to_tokens());
                ts.space().push(Token::And).space();
                ts.append(&value_tokens(level));
                ts.space().push(Token::Lte).space();
                ts.append(&max.to_tokens());
            }
        }
        ts
    }
}

/// `[D].[L].CURRENTMEMBER.MEMBER_CAPTION`
fn caption_tokens(level: &LevelRef) -> TokenStream {
    let mut ts = level.to_tokens();
    ts.dot()
        .push(Token::CurrentMember)
        .dot()
        .push(Token::MemberCaption);
    ts
}

/// `[D].[L].CURRENTMEMBER.MEMBERVALUE`
fn value_tokens(level: &LevelRef) -> TokenStream {
    let mut ts = level.to_tokens();
    ts.dot()
        .push(Token::CurrentMember)
        .dot()
        .push(Token::MemberValue);
    ts
}

/// `LEFT|RIGHT(caption, LEN("lit")) = "lit"`
fn edge_match_tokens(func: Token, level: &LevelRef, literal: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(func).lparen();
    ts.append(&caption_tokens(level));
    ts.comma().space().push(Token::Len).lparen();
    ts.push(Token::LitString(literal.to_string()));
    ts.rparen().rparen();
    ts.space().push(Token::Eq).space();
    ts.push(Token::LitString(literal.to_string()));
    ts
}

// =============================================================================
// Set expressions
// =============================================================================

/// An MDX set expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces
/// this.
#[derive(Debug, Clone, PartialEq)]
pub enum SetExpr {
    /// Full level expansion: `[D].[L].MEMBERS`
    Members(LevelRef),

    /// A single pinned member: `[D].[L].&[k]`
    Member(MemberRef),

    /// Children of a member: `[D].[L].&[k].CHILDREN`
    Children(MemberRef),

    /// Parent of a member: `[D].[L].&[k].PARENT`
    Parent(MemberRef),

    /// Explicit member list: `{m1, m2, ...}`
    Explicit(Vec<MemberRef>),

    /// Measure set: `{[Measures].[m1], [Measures].[m2]}`
    MeasureSet(Vec<String>),

    /// Cross product of two sets: `CROSSJOIN(a, b)`
    CrossJoin(Box<SetExpr>, Box<SetExpr>),

    /// Suppress tuples with no data: `NONEMPTY(set)`
    NonEmpty(Box<SetExpr>),

    /// Sort by a measure: `ORDER(set, [Measures].[m], DESC)`
    Order {
        set: Box<SetExpr>,
        measure: String,
        dir: SortDir,
    },

    /// Keep the first n members ranked by a measure:
    /// `TOPCOUNT(set, n, [Measures].[m])`
    TopCount {
        set: Box<SetExpr>,
        count: u64,
        measure: String,
    },

    /// Restrict a set by a member predicate: `FILTER(set, predicate)`
    Filtered {
        set: Box<SetExpr>,
        predicate: MemberPredicate,
    },
}

impl SetExpr {
    /// Cross-join this set with another (builder form).
    pub fn crossjoin(self, other: SetExpr) -> SetExpr {
        SetExpr::CrossJoin(Box::new(self), Box::new(other))
    }

    /// Wrap in a non-empty filter.
    pub fn non_empty(self) -> SetExpr {
        SetExpr::NonEmpty(Box::new(self))
    }

    /// Wrap in an ordering operator.
    pub fn order_by(self, measure: &str, dir: SortDir) -> SetExpr {
        SetExpr::Order {
            set: Box::new(self),
            measure: measure.into(),
            dir,
        }
    }

    /// Wrap in a top-count limit.
    pub fn top_count(self, count: u64, measure: &str) -> SetExpr {
        SetExpr::TopCount {
            set: Box::new(self),
            count,
            measure: measure.into(),
        }
    }

    /// True when the serialized form is already brace-delimited, so axis
    /// rendering must not add another set constructor around it.
    pub fn is_braced(&self) -> bool {
        matches!(self, SetExpr::Explicit(_) | SetExpr::MeasureSet(_))
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            SetExpr::Members(level) => {
                ts.append(&level.to_tokens());
                ts.dot().push(Token::Members);
            }
            SetExpr::Member(member) => {
                ts.append(&member.to_tokens());
            }
            SetExpr::Children(member) => {
                ts.append(&member.to_tokens());
                ts.dot().push(Token::Children);
            }
            SetExpr::Parent(member) => {
                ts.append(&member.to_tokens());
                ts.dot().push(Token::Parent);
            }
            SetExpr::Explicit(members) => {
                ts.lbrace();
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&member.to_tokens());
                }
                ts.rbrace();
            }
            SetExpr::MeasureSet(measures) => {
                ts.lbrace();
                for (i, measure) in measures.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&measure_tokens(measure));
                }
                ts.rbrace();
            }
            SetExpr::CrossJoin(left, right) => {
                ts.push(Token::Crossjoin).lparen();
                ts.append(&left.to_tokens());
                ts.comma().space();
                ts.append(&right.to_tokens());
                ts.rparen();
            }
            SetExpr::NonEmpty(set) => {
                ts.push(Token::NonEmpty).lparen();
                ts.append(&set.to_tokens());
                ts.rparen();
            }
            SetExpr::Order { set, measure, dir } => {
                ts.push(Token::Order).lparen();
                ts.append(&set.to_tokens());
                ts.comma().space();
                ts.append(&measure_tokens(measure));
                ts.comma().space().push(match dir {
                    SortDir::Asc => Token::Asc,
                    SortDir::Desc => Token::Desc,
                });
                ts.rparen();
            }
            SetExpr::TopCount {
                set,
                count,
                measure,
            } => {
                ts.push(Token::TopCount).lparen();
                ts.append(&set.to_tokens());
                ts.comma().space().push(Token::LitInt(*count as i64));
                ts.comma().space();
                ts.append(&measure_tokens(measure));
                ts.rparen();
            }
            SetExpr::Filtered { set, predicate } => {
                ts.push(Token::Filter).lparen();
                ts.append(&set.to_tokens());
                ts.comma().space();
                ts.append(&predicate.to_tokens());
                ts.rparen();
            }
        }
        ts
    }

    /// Serialize to an MDX fragment.
    pub fn to_mdx(&self) -> String {
        self.to_tokens().serialize()
    }
}

/// `[Measures].[name]`
pub(crate) fn measure_tokens(name: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Bracketed("Measures".into()))
        .dot()
        .push(Token::Bracketed(name.to_string()));
    ts
}
