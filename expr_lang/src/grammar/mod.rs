//! Grammar-as-data for the expression language
//!
//! [`rule`] holds the combinator algebra and the grammar table, [`ast`] the
//! node type the parser builds, and [`language`] the concrete terminal and
//! rule tables.

pub mod ast;
pub mod language;
pub mod rule;

pub use ast::{AstNode, NodeKind};
pub use language::{rules, terminals, START_RULE};
pub use rule::{
    nt, one_or_more, or, seq, t, zero_or_more, zero_or_one, Grammar, GrammarEntry, PostFilter,
    Rule,
};
pub use crate::tokens::Term;
