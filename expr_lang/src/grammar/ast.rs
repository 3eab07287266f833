//! Syntax tree produced by the parser engine

use crate::tokens::{Term, Token, TokenValue};
use serde::{Serialize, Serializer};
use std::fmt;

/// Node type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Leaf built from one token
    Terminal(Term),
    /// Wrapper named after a grammar rule
    Rule(&'static str),
    Sequence,
    ZeroOrOne,
    /// Produced by both zero-or-more and one-or-more
    Repetition,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Terminal(term) => term.name(),
            NodeKind::Rule(name) => *name,
            NodeKind::Sequence => "seq",
            NodeKind::ZeroOrOne => "zero-or-one",
            NodeKind::Repetition => "zero-or-more",
        }
    }

    pub fn is_rule(&self, name: &str) -> bool {
        matches!(self, NodeKind::Rule(n) if *n == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One syntax tree node. Exactly one of `value`, `child` or `children`
/// is meaningful, depending on whether the node is a leaf, a wrapper or a
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstNode {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TokenValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<AstNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AstNode>>,
    pub line: u32,
    pub column: u32,
    /// Subtree size, only used to rank ambiguous parses
    pub complexity: usize,
    #[serde(skip)]
    pub discard: bool,
    #[serde(skip)]
    pub flatten: bool,
}

impl AstNode {
    /// Leaf for a matched token
    pub fn leaf(token: &Token) -> Self {
        Self {
            kind: NodeKind::Terminal(token.kind),
            value: Some(token.value.clone()),
            child: None,
            children: None,
            line: token.line,
            column: token.column,
            complexity: 1,
            discard: token.discard,
            flatten: false,
        }
    }

    /// Named wrapper around a rule's inner result
    pub fn wrapper(name: &'static str, child: AstNode, line: u32, column: u32) -> Self {
        Self {
            kind: NodeKind::Rule(name),
            value: None,
            complexity: child.complexity + 1,
            child: Some(Box::new(child)),
            children: None,
            line,
            column,
            discard: false,
            flatten: false,
        }
    }

    /// Collection produced by sequences and quantifiers. `flatten` marks it
    /// for splicing into the parent's children.
    pub fn collection(
        kind: NodeKind,
        children: Vec<AstNode>,
        line: u32,
        column: u32,
        complexity: usize,
        flatten: bool,
    ) -> Self {
        Self {
            kind,
            value: None,
            child: None,
            children: Some(children),
            line,
            column,
            complexity,
            discard: false,
            flatten,
        }
    }

    /// Children of a collection node, empty for leaves and wrappers
    pub fn child_nodes(&self) -> &[AstNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Terminal kind for leaves
    pub fn term(&self) -> Option<Term> {
        match self.kind {
            NodeKind::Terminal(term) => Some(term),
            _ => None,
        }
    }

    /// S-expression form: `(kind child ...)` for inner nodes, the value for leaves
    pub fn render(&self) -> String {
        if let Some(children) = &self.children {
            let rendered: Vec<String> = children.iter().map(AstNode::render).collect();
            format!("({} {})", self.kind.label(), rendered.join(" "))
        } else if let Some(child) = &self.child {
            format!("({} {})", self.kind.label(), child.render())
        } else {
            self.value
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        }
    }

    /// Number of nodes in the subtree
    pub fn node_count(&self) -> usize {
        1 + self.child.as_ref().map(|c| c.node_count()).unwrap_or(0)
            + self.child_nodes().iter().map(AstNode::node_count).sum::<usize>()
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: Term, value: TokenValue, discard: bool) -> Token {
        Token {
            kind,
            text: value.to_string(),
            value,
            id: 1,
            line: 1,
            column: 4,
            discard,
        }
    }

    #[test]
    fn test_leaf_copies_token() {
        let node = AstNode::leaf(&token(Term::Comma, TokenValue::Text(",".into()), true));
        assert_eq!(node.kind, NodeKind::Terminal(Term::Comma));
        assert!(node.discard);
        assert_eq!(node.complexity, 1);
        assert_eq!((node.line, node.column), (1, 4));
        assert_eq!(node.render(), ",");
    }

    #[test]
    fn test_render_shapes() {
        let one = AstNode::leaf(&token(Term::Int, TokenValue::Number(1.0), false));
        let text = AstNode::leaf(&token(Term::StringA, TokenValue::Text("hi".into()), false));

        let array = AstNode::collection(
            NodeKind::Rule("array"),
            vec![one.clone(), text],
            1,
            1,
            3,
            false,
        );
        assert_eq!(array.render(), "(array 1 hi)");

        let empty = AstNode::collection(NodeKind::Rule("array"), vec![], 1, 1, 1, false);
        assert_eq!(empty.render(), "(array )");

        let wrapped = AstNode::wrapper("numeric", one, 1, 1);
        assert_eq!(wrapped.render(), "(numeric 1)");
        assert_eq!(wrapped.complexity, 2);
        assert_eq!(wrapped.to_string(), "(numeric 1)");
        assert_eq!(wrapped.node_count(), 2);
    }

    #[test]
    fn test_collection_kind_labels() {
        assert_eq!(NodeKind::Sequence.label(), "seq");
        assert_eq!(NodeKind::ZeroOrOne.label(), "zero-or-one");
        assert_eq!(NodeKind::Repetition.label(), "zero-or-more");
        assert!(NodeKind::Rule("hash").is_rule("hash"));
        assert!(!NodeKind::Sequence.is_rule("seq"));
    }

    #[test]
    fn test_json_shape() {
        let one = AstNode::leaf(&token(Term::Int, TokenValue::Number(1.0), false));
        let json = serde_json::to_value(AstNode::wrapper("numeric", one, 1, 1)).unwrap();
        assert_eq!(json["kind"], "numeric");
        assert_eq!(json["child"]["kind"], "Int");
        assert_eq!(json["child"]["value"], 1);
        assert!(json.get("children").is_none());
    }
}
