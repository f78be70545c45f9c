//! # Cubist
//!
//! An analytical cube service that compiles structured requests to MDX.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │               HTTP API (query/drill/aggregate)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [request validation + defaults]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  QueryRequest (Rust Types)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │              MDX Query (Set-Expression AST)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [engine bridge]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Raw Table (cube server)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalizer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Normalized Table                      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod engine;
pub mod mdx;
pub mod metadata;
pub mod request;
pub mod result;
pub mod web;

// Re-export MDX submodules at crate level for convenient paths
pub use mdx::expr;
pub use mdx::query;
pub use mdx::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile, CompileError, CompileOptions, CompileOutput};
    pub use crate::mdx::{
        CaptionMatch, LevelRef, MdxQuery, MemberPredicate, MemberRef, Scalar, SetExpr,
        SlicerEntry, SortDir, ValueCmp,
    };
    pub use crate::request::{
        Axis, DimensionRef, DrillDirection, DrillSpec, Filter, FilterKind, FilterType,
        QueryRequest, RequestError, SortDirection, SortSpec, TopNSpec, VisibilitySpec,
    };
    pub use crate::result::{grand_totals, normalize, Table};
}

// Also export at crate root for convenience
pub use compile::{compile, CompileOptions, CompileOutput};
pub use mdx::{MdxQuery, SetExpr};
pub use request::QueryRequest;
pub use result::Table;
