//! Rule expression algebra and the grammar table
//!
//! Grammars are plain data: a map from rule name to a [`GrammarEntry`]
//! holding a [`Rule`] expression built from the combinators below. The
//! table is read-only once handed to a parser.

use crate::grammar::ast::AstNode;
use crate::tokens::Term;
use std::collections::HashMap;

/// Closed set of rule expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Terminal(Term),
    NonTerminal(&'static str),
    OrderedAlternatives(Vec<Rule>),
    ZeroOrOne(Box<Rule>),
    ZeroOrMore(Box<Rule>),
    OneOrMore(Box<Rule>),
    Sequence(Vec<Rule>),
}

impl Rule {
    /// Quantifiers and sequences splice their children into the parent
    pub fn flattens(&self) -> bool {
        matches!(
            self,
            Rule::ZeroOrOne(_) | Rule::ZeroOrMore(_) | Rule::OneOrMore(_) | Rule::Sequence(_)
        )
    }

    /// Short label used in parser traces
    pub fn label(&self) -> String {
        match self {
            Rule::Terminal(term) => format!("lex {}", term),
            Rule::NonTerminal(name) => format!("rule {}", name),
            Rule::OrderedAlternatives(items) => format!("or[{}]", items.len()),
            Rule::ZeroOrOne(_) => "zero-or-one".to_string(),
            Rule::ZeroOrMore(_) => "zero-or-more".to_string(),
            Rule::OneOrMore(_) => "one-or-more".to_string(),
            Rule::Sequence(items) => format!("seq[{}]", items.len()),
        }
    }

    /// Names of every nonterminal referenced anywhere inside this rule
    pub fn references(&self) -> Vec<&'static str> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references(&self, found: &mut Vec<&'static str>) {
        match self {
            Rule::Terminal(_) => {}
            Rule::NonTerminal(name) => found.push(*name),
            Rule::OrderedAlternatives(items) | Rule::Sequence(items) => {
                for item in items {
                    item.collect_references(found);
                }
            }
            Rule::ZeroOrOne(item) | Rule::ZeroOrMore(item) | Rule::OneOrMore(item) => {
                item.collect_references(found)
            }
        }
    }
}

// ============================================================================
// COMBINATORS
// ============================================================================

/// Match one token of the given kind
pub fn t(term: Term) -> Rule {
    Rule::Terminal(term)
}

/// Reference a named rule
pub fn nt(name: &'static str) -> Rule {
    Rule::NonTerminal(name)
}

/// Try every alternative and keep the best ranked match
pub fn or(items: Vec<Rule>) -> Rule {
    Rule::OrderedAlternatives(items)
}

pub fn seq(items: Vec<Rule>) -> Rule {
    Rule::Sequence(items)
}

pub fn zero_or_one(item: Rule) -> Rule {
    Rule::ZeroOrOne(Box::new(item))
}

pub fn zero_or_more(item: Rule) -> Rule {
    Rule::ZeroOrMore(Box::new(item))
}

pub fn one_or_more(item: Rule) -> Rule {
    Rule::OneOrMore(Box::new(item))
}

// ============================================================================
// GRAMMAR TABLE
// ============================================================================

/// Rewrites a rule's node right after it is built
pub type PostFilter = fn(AstNode) -> AstNode;

#[derive(Debug, Clone)]
pub struct GrammarEntry {
    pub rule: Rule,
    pub post_filter: Option<PostFilter>,
    /// Return the inner result without a named wrapper node
    pub inline: bool,
}

impl GrammarEntry {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            post_filter: None,
            inline: false,
        }
    }

    pub fn inline(rule: Rule) -> Self {
        Self {
            rule,
            post_filter: None,
            inline: true,
        }
    }

    pub fn with_post_filter(mut self, filter: PostFilter) -> Self {
        self.post_filter = Some(filter);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Grammar {
    entries: HashMap<&'static str, GrammarEntry>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`
    pub fn with_rule(mut self, name: &'static str, entry: GrammarEntry) -> Self {
        self.insert(name, entry);
        self
    }

    /// Add or replace a rule
    pub fn insert(&mut self, name: &'static str, entry: GrammarEntry) {
        self.entries.insert(name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&GrammarEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rule names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// `(rule, reference)` pairs whose reference names no rule
    pub fn undefined_references(&self) -> Vec<(&'static str, &'static str)> {
        let mut missing: Vec<_> = self
            .entries
            .iter()
            .flat_map(|(name, entry)| {
                entry
                    .rule
                    .references()
                    .into_iter()
                    .filter(|reference| !self.contains(reference))
                    .map(move |reference| (*name, reference))
            })
            .collect();
        missing.sort_unstable();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_flags() {
        assert!(seq(vec![t(Term::Int)]).flattens());
        assert!(zero_or_one(t(Term::Int)).flattens());
        assert!(zero_or_more(t(Term::Int)).flattens());
        assert!(one_or_more(t(Term::Int)).flattens());
        assert!(!or(vec![t(Term::Int)]).flattens());
        assert!(!t(Term::Int).flattens());
        assert!(!nt("number").flattens());
    }

    #[test]
    fn test_references_are_collected_recursively() {
        let rule = seq(vec![
            nt("a"),
            or(vec![t(Term::Comma), zero_or_more(nt("b"))]),
            one_or_more(zero_or_one(nt("c"))),
        ]);
        assert_eq!(rule.references(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_undefined_references() {
        let grammar = Grammar::new()
            .with_rule("list", GrammarEntry::new(seq(vec![nt("item"), nt("rest")])))
            .with_rule("item", GrammarEntry::inline(t(Term::Int)));

        assert_eq!(grammar.undefined_references(), vec![("list", "rest")]);
        assert_eq!(grammar.names(), vec!["item", "list"]);
        assert!(grammar.get("item").map(|e| e.inline).unwrap_or(false));
    }

    #[test]
    fn test_insert_replaces_existing_rule() {
        let mut grammar = Grammar::new().with_rule("x", GrammarEntry::new(t(Term::Int)));
        grammar.insert("x", GrammarEntry::new(t(Term::Float)));
        assert_eq!(grammar.len(), 1);
        assert_eq!(grammar.get("x").map(|e| e.rule.clone()), Some(t(Term::Float)));
    }
}
