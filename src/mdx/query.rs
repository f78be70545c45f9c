//! Query assembly - put axes, cube and slicer together into a SELECT.

use super::expr::SetExpr;
use super::token::{Token, TokenStream};

// =============================================================================
// Slicer (WHERE clause)
// =============================================================================

/// One entry of the WHERE tuple.
///
/// Pinned members and member-set restrictions are both legal slicer
/// content; all entries are combined as a single conjunctive tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum SlicerEntry {
    /// `[D].[L].&[v]`
    Member(crate::mdx::expr::MemberRef),
    /// A set expression, e.g. a `FILTER(...)` restriction or a level
    /// expansion contributed by an aggregation hint.
    Set(SetExpr),
}

impl SlicerEntry {
    pub fn to_tokens(&self) -> TokenStream {
        match self {
            SlicerEntry::Member(member) => member.to_tokens(),
            SlicerEntry::Set(set) => set.to_tokens(),
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// A complete MDX SELECT statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "queries have no effect until serialized"]
pub struct MdxQuery {
    /// Column axis set (always present - it carries the measures).
    pub columns: SetExpr,

    /// Row axis set, absent when the request shapes a column-only result.
    pub rows: Option<SetExpr>,

    /// Target cube name.
    pub cube: String,

    /// WHERE tuple entries; empty means no WHERE clause.
    pub slicer: Vec<SlicerEntry>,
}

impl MdxQuery {
    pub fn new(cube: &str, columns: SetExpr) -> Self {
        Self {
            columns,
            rows: None,
            cube: cube.into(),
            slicer: vec![],
        }
    }

    pub fn with_rows(mut self, rows: SetExpr) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_slicer(mut self, slicer: Vec<SlicerEntry>) -> Self {
        self.slicer = slicer;
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).newline();
        ts.indent(1);
        ts.append(&axis_tokens(&self.columns));
        ts.space()
            .push(Token::On)
            .space()
            .push(Token::Columns);

        if let Some(rows) = &self.rows {
            ts.comma().newline().indent(1);
            ts.append(&axis_tokens(rows));
            ts.space().push(Token::On).space().push(Token::Rows);
        }

        ts.newline().push(Token::From).space();
        ts.push(Token::Bracketed(self.cube.clone()));

        if !self.slicer.is_empty() {
            ts.newline().push(Token::Where).space().lparen();
            for (i, entry) in self.slicer.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&entry.to_tokens());
            }
            ts.rparen();
        }

        ts
    }

    /// Serialize to the final MDX string.
    pub fn to_mdx(&self) -> String {
        self.to_tokens().serialize()
    }
}

/// Axis sets are brace-delimited; expressions that already serialize to a
/// braced set are emitted as-is.
fn axis_tokens(set: &SetExpr) -> TokenStream {
    if set.is_braced() {
        return set.to_tokens();
    }
    let mut ts = TokenStream::new();
    ts.lbrace();
    ts.append(&set.to_tokens());
    ts.rbrace();
    ts
}

impl std::fmt::Display for MdxQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_mdx())
    }
}
