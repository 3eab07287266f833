//! Token system for the expression language
//!
//! - **[`Term`]** - closed set of token kinds
//! - **[`TokenValue`]** - converted literal value carried by a token
//! - **[`Token`]** - one lexed token with position, sequence id and discard flag
//! - **[`TokenStream`]** - immutable, structurally shared view used by the parser
//!
//! Streams are never mutated. `consume` returns the token together with a
//! new stream, which is what keeps exhaustive backtracking simple.

pub mod token;
pub mod token_stream;

pub use token::{Term, Token, TokenValue};
pub use token_stream::{PrematureEnd, TokenStream};
