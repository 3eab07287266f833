//! Generic grammar interpreter
//!
//! The engine walks a [`Rule`] expression against an immutable
//! [`TokenStream`]. Every handler returns the node it built, if any, together
//! with the stream to continue from. On a miss that is the stream it was
//! handed, so alternatives can be explored without save/restore bookkeeping.
//!
//! Ordered alternatives are not first-match: every alternative is tried and
//! the candidate leaving the fewest tokens unconsumed wins, ties going to the
//! lowest complexity and then to declaration order.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::ParserPreferences;
use crate::grammar::{AstNode, Grammar, NodeKind, Rule};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Term, TokenStream};
use crate::{log_debug, log_error};

/// Node built by one rule application (if any) and the stream after it
type Step = (Option<AstNode>, TokenStream);

pub struct Parser {
    grammar: Grammar,
    preferences: ParserPreferences,
}

impl Parser {
    pub fn new(grammar: Grammar) -> Self {
        Self::with_preferences(grammar, ParserPreferences::default())
    }

    pub fn with_preferences(grammar: Grammar, preferences: ParserPreferences) -> Self {
        Self {
            grammar,
            preferences,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse the whole stream with `rule`. Unconsumed tokens are an error.
    pub fn parse(&self, rule: &Rule, stream: TokenStream) -> SyntaxResult<AstNode> {
        let result = self.parse_complete(rule, &stream);
        if let Err(error) = &result {
            match error.span() {
                Some(span) => log_error!(error.error_code(), &error.to_string(), span = span),
                None => log_error!(error.error_code(), &error.to_string()),
            }
        }
        result
    }

    fn parse_complete(&self, rule: &Rule, stream: &TokenStream) -> SyntaxResult<AstNode> {
        if stream.is_empty() {
            return Err(SyntaxError::PrematureEnd);
        }

        let (node, rest) = self.parse_rule(rule, stream, 0)?;

        let Some(node) = node else {
            let (line, column) = stream.location();
            return Err(SyntaxError::NoViableParse { line, column });
        };

        if !rest.is_empty() {
            let (line, column) = rest.location();
            return Err(SyntaxError::TrailingInput { line, column });
        }

        Ok(node)
    }

    fn parse_rule(&self, rule: &Rule, stream: &TokenStream, level: usize) -> SyntaxResult<Step> {
        if level > MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth { depth: level });
        }
        // Every rule kind needs a token to look at
        if stream.is_empty() {
            return Err(SyntaxError::PrematureEnd);
        }

        if self.preferences.trace_alternatives {
            log_debug!("Entering grammar region",
                "rule" => rule.label(),
                "level" => level,
                "next" => stream.peek().map(|t| t.text.as_str()).unwrap_or("")
            );
        }

        match rule {
            Rule::Terminal(term) => self.parse_terminal(*term, stream),
            Rule::NonTerminal(name) => self.parse_nonterminal(*name, stream, level),
            Rule::OrderedAlternatives(items) => self.parse_alternatives(items, stream, level),
            Rule::Sequence(items) => self.parse_sequence(items, stream, level, rule.flattens()),
            Rule::ZeroOrOne(item) => {
                let kind = NodeKind::ZeroOrOne;
                self.parse_quantified(item, stream, level, kind, (0, Some(1)), rule.flattens())
            }
            Rule::ZeroOrMore(item) => {
                let kind = NodeKind::Repetition;
                self.parse_quantified(item, stream, level, kind, (0, None), rule.flattens())
            }
            Rule::OneOrMore(item) => {
                let kind = NodeKind::Repetition;
                self.parse_quantified(item, stream, level, kind, (1, None), rule.flattens())
            }
        }
    }

    fn parse_terminal(&self, term: Term, stream: &TokenStream) -> SyntaxResult<Step> {
        let (token, rest) = stream.consume()?;
        if token.is(term) {
            Ok((Some(AstNode::leaf(token)), rest))
        } else {
            Ok((None, stream.clone()))
        }
    }

    fn parse_nonterminal(
        &self,
        name: &'static str,
        stream: &TokenStream,
        level: usize,
    ) -> SyntaxResult<Step> {
        let entry = self
            .grammar
            .get(name)
            .ok_or_else(|| SyntaxError::UnknownRule {
                name: name.to_string(),
            })?;

        let (line, column) = stream.location();
        let (node, rest) = self.parse_rule(&entry.rule, stream, level + 1)?;

        if entry.inline {
            return Ok((node, rest));
        }
        let Some(inner) = node else {
            return Ok((None, rest));
        };

        let mut result = AstNode::wrapper(name, inner, line, column);
        if let Some(filter) = entry.post_filter {
            result = filter(result);
        }
        if result.child.as_ref().is_some_and(|child| child.flatten) {
            if let Some(child) = result.child.take() {
                result.children = Some(child.children.unwrap_or_default());
            }
        }

        Ok((Some(result), rest))
    }

    fn parse_sequence(
        &self,
        items: &[Rule],
        stream: &TokenStream,
        level: usize,
        flatten: bool,
    ) -> SyntaxResult<Step> {
        let (line, column) = stream.location();
        let mut rest = stream.clone();
        let mut children = Vec::new();
        let mut complexity = 0;

        for item in items {
            let (node, next) = self.parse_rule(item, &rest, level + 1)?;
            let Some(node) = node else {
                return Ok((None, stream.clone()));
            };
            complexity += node.complexity;
            push_child(&mut children, node);
            rest = next;
        }

        let node = AstNode::collection(
            NodeKind::Sequence,
            children,
            line,
            column,
            complexity + 1,
            flatten,
        );
        Ok((Some(node), rest))
    }

    /// Shared loop behind the three quantifiers
    fn parse_quantified(
        &self,
        item: &Rule,
        stream: &TokenStream,
        level: usize,
        kind: NodeKind,
        (min, max): (usize, Option<usize>),
        flatten: bool,
    ) -> SyntaxResult<Step> {
        let (line, column) = stream.location();
        let mut rest = stream.clone();
        let mut children = Vec::new();
        let mut complexity = 0;
        let mut matched = 0;

        while max.map_or(true, |max| matched < max) {
            let (node, next) = self.parse_rule(item, &rest, level + 1)?;
            let Some(node) = node else {
                break;
            };
            let advanced = !next.same_position(&rest);
            complexity += node.complexity;
            push_child(&mut children, node);
            matched += 1;
            rest = next;
            // an empty match would repeat forever
            if !advanced {
                break;
            }
        }

        if matched < min {
            return Ok((None, stream.clone()));
        }

        let node = AstNode::collection(kind, children, line, column, complexity + 1, flatten);
        Ok((Some(node), rest))
    }

    fn parse_alternatives(
        &self,
        items: &[Rule],
        stream: &TokenStream,
        level: usize,
    ) -> SyntaxResult<Step> {
        let mut candidates: Vec<(AstNode, TokenStream)> = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match self.parse_rule(item, stream, level + 1) {
                Ok((Some(node), rest)) => candidates.push((node, rest)),
                Ok((None, _)) => {}
                Err(error) if !error.is_fatal() => {
                    if self.preferences.trace_alternatives {
                        log_debug!("Alternative failed",
                            "alternative" => index,
                            "level" => level,
                            "error" => error
                        );
                    }
                }
                Err(error) => return Err(error),
            }
        }

        let count = candidates.len();
        // min_by_key keeps the first of equal candidates
        let best = candidates
            .into_iter()
            .min_by_key(|(node, rest)| (rest.len(), node.complexity));

        match best {
            Some((node, rest)) => {
                if self.preferences.trace_alternatives {
                    log_debug!("Alternative chosen",
                        "kind" => node.kind,
                        "candidates" => count,
                        "complexity" => node.complexity,
                        "remaining" => rest.len(),
                        "level" => level
                    );
                }
                Ok((Some(node), rest))
            }
            None => Ok((None, stream.clone())),
        }
    }
}

/// Drop discarded nodes and splice flattening ones
fn push_child(children: &mut Vec<AstNode>, node: AstNode) {
    if node.discard {
        return;
    }
    if node.flatten {
        children.extend(node.children.unwrap_or_default());
    } else {
        children.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{
        nt, one_or_more, or, rules, seq, t, zero_or_more, zero_or_one, GrammarEntry, START_RULE,
    };
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn render(source: &str) -> String {
        let stream = tokenize(source).unwrap();
        Parser::new(rules())
            .parse(&nt(START_RULE), stream)
            .unwrap()
            .render()
    }

    fn parse_with(rule: Rule, source: &str) -> SyntaxResult<AstNode> {
        Parser::new(rules()).parse(&rule, tokenize(source).unwrap())
    }

    #[test]
    fn test_standalone_sequence_rule() {
        let rule = seq(vec![
            t(Term::BracketOpen),
            zero_or_more(seq(vec![t(Term::Int), t(Term::Comma)])),
            zero_or_one(t(Term::Int)),
            t(Term::BracketClose),
        ]);
        let node = parse_with(rule, "[1, 2, 3, 4, 5]").unwrap();
        assert_eq!(node.render(), "(seq 1 2 3 4 5)");
    }

    #[test]
    fn test_constants() {
        assert_eq!(render("null"), "null");
        assert_eq!(render("true"), "true");
        assert_eq!(render("false"), "false");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(render(" 123 "), "123");
        assert_eq!(render(" -123 "), "-123");
        assert_eq!(render(" +123 "), "123");
        assert_eq!(render(" 123.45 "), "123.45");
        assert_eq!(render(" -123.45 "), "-123.45");
    }

    #[test]
    fn test_strings() {
        assert_eq!(render("\"Hello world\""), "Hello world");
        assert_eq!(render("'Hello world'"), "Hello world");
    }

    #[test]
    fn test_arrays() {
        assert_eq!(render("[true, null, 1, 1.23]"), "(array true null 1 1.23)");
        assert_eq!(render("[1, [2, []]]"), "(array 1 (array 2 (array )))");
    }

    #[test]
    fn test_hashes() {
        assert_eq!(
            render("{a: 123, b: true, c}"),
            "(hash (hashKeyValue a 123) (hashKeyValue b true) (hashKeyValue c))"
        );
        assert_eq!(
            render("{a: {b: {c}}}"),
            "(hash (hashKeyValue a (hash (hashKeyValue b (hash (hashKeyValue c))))))"
        );
    }

    #[test]
    fn test_math_expressions() {
        for op in ["+", "-", "*", "/", "%", "**"] {
            assert_eq!(
                render(&format!(" 123 {} 45.67 ", op)),
                format!("(mathExpression 123 {} 45.67)", op)
            );
        }
        assert_eq!(render(" 2*2+-3 "), "(mathExpression (mathPointExpression 2 * 2) + -3)");
        assert_eq!(render(" 2*2-3 "), "(mathExpression (mathPointExpression 2 * 2) - 3)");
        assert_eq!(
            render(" 2.1*2.2+-2.3 "),
            "(mathExpression (mathPointExpression 2.1 * 2.2) + -2.3)"
        );
        assert_eq!(
            render(" 2.1*2.2-2.3 "),
            "(mathExpression (mathPointExpression 2.1 * 2.2) - 2.3)"
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(render("(1+2)"), "(mathExpression 1 + 2)");
        assert_eq!(render("(1+2)*3"), "(mathExpression (mathExpression 1 + 2) * 3)");
        assert_eq!(render("1*(2+3)"), "(mathExpression 1 * (mathExpression 2 + 3))");
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(render(" 1 * 2 + 3"), "(mathExpression (mathPointExpression 1 * 2) + 3)");
        assert_eq!(
            render(" 1 + 2 * 3 + 4"),
            "(mathExpression 1 + (mathExpression (mathPointExpression 2 * 3) + 4))"
        );
        assert_eq!(
            render(" 1 * 2 + 3 * 4"),
            "(mathExpression (mathPointExpression 1 * 2) + (mathExpression 3 * 4))"
        );
        assert_eq!(
            render(" 1 + 2 * 3 + 4 - 5 / 6 * (7 + 8) "),
            "(mathExpression 1 + (mathExpression (mathPointExpression 2 * 3) + \
             (mathExpression 4 - (mathExpression 5 / (mathExpression 6 * \
             (mathExpression 7 + 8))))))"
        );
        assert_eq!(
            render("x(1) + y(2) * z(3)"),
            "(mathExpression (function x 1) + (mathExpression (function y 2) * (function z 3)))"
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(render("x(123)"), "(function x 123)");
        assert_eq!(render("x()"), "(function x)");
        assert_eq!(render("x(1, 'a', [2])"), "(function x 1 a (array 2))");
    }

    #[test]
    fn test_pipelines() {
        assert_eq!(
            render("123 |> x() |> y(1 |> z())"),
            "(pipeline 123 (pipeline (function x) (function y (pipeline 1 (function z)))))"
        );
        assert_eq!(render("[1] |> len()"), "(pipeline (array 1) (function len))");
    }

    #[test]
    fn test_deeply_nested_collections() {
        let depth = 7;

        let array = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        let expected = format!("{}1{}", "(array ".repeat(depth), ")".repeat(depth));
        assert_eq!(render(&array), expected);
        assert_eq!(
            render(&format!("{} |> len()", array)),
            format!("(pipeline {} (function len))", expected)
        );

        let hash = format!("{}1{}", "{a: ".repeat(depth), "}".repeat(depth));
        let expected = format!(
            "{}1{}",
            "(hash (hashKeyValue a ".repeat(depth),
            "))".repeat(depth)
        );
        assert_eq!(render(&hash), expected);
    }

    #[test]
    fn test_collections_take_flatten_flag_from_rule() {
        let node = parse_with(seq(vec![t(Term::Int), t(Term::Int)]), "1 2").unwrap();
        assert!(node.flatten);
        let node = parse_with(one_or_more(t(Term::Int)), "1 2").unwrap();
        assert!(node.flatten);
        let node = parse_with(nt("array"), "[1]").unwrap();
        assert!(!node.flatten);
        assert_eq!(node.child_nodes().len(), 1);
    }

    #[test]
    fn test_positions_are_recorded() {
        let node = parse_with(nt(START_RULE), "\n  x(1)").unwrap();
        assert_eq!((node.line, node.column), (2, 3));
    }

    #[test]
    fn test_trailing_input() {
        let error = parse_with(nt(START_RULE), "1 2").unwrap_err();
        assert_matches!(error, SyntaxError::TrailingInput { line: 1, column: 3 });
        assert!(error.to_string().starts_with("End of file not reached"));
    }

    #[test]
    fn test_incomplete_input() {
        assert_matches!(
            parse_with(nt(START_RULE), "1 +"),
            Err(SyntaxError::TrailingInput { .. })
        );
        assert_matches!(
            parse_with(nt(START_RULE), ")"),
            Err(SyntaxError::NoViableParse { line: 1, column: 1 })
        );
        let empty = Parser::new(rules()).parse(&nt(START_RULE), TokenStream::new(vec![]));
        assert_matches!(empty, Err(SyntaxError::PrematureEnd));
    }

    #[test]
    fn test_unknown_rule_is_fatal() {
        let error = parse_with(or(vec![nt("nothing"), t(Term::Int)]), "1").unwrap_err();
        assert_matches!(error, SyntaxError::UnknownRule { name } if name == "nothing");
    }

    #[test]
    fn test_left_recursion_hits_depth_limit() {
        let grammar = Grammar::new().with_rule(
            "sum",
            GrammarEntry::new(or(vec![
                seq(vec![nt("sum"), t(Term::Plus), t(Term::Int)]),
                t(Term::Int),
            ])),
        );
        let error = Parser::new(grammar)
            .parse(&nt("sum"), tokenize("1 + 2").unwrap())
            .unwrap_err();
        assert_matches!(error, SyntaxError::MaxRecursionDepth { depth } if depth == MAX_PARSE_DEPTH + 1);
    }

    #[test]
    fn test_one_or_more_requires_a_match() {
        let rule = seq(vec![one_or_more(t(Term::Int)), t(Term::Comma)]);
        assert_eq!(parse_with(rule.clone(), "1 2 3,").unwrap().render(), "(seq 1 2 3)");
        assert_matches!(parse_with(rule, ","), Err(SyntaxError::NoViableParse { .. }));
    }

    #[test]
    fn test_ranking_prefers_longest_then_simplest() {
        let grammar = Grammar::new()
            .with_rule("wide", GrammarEntry::new(seq(vec![t(Term::Int), t(Term::Int)])))
            .with_rule("deep", GrammarEntry::new(nt("wide")))
            .with_rule("short", GrammarEntry::new(t(Term::Int)));
        let parser = Parser::new(grammar);

        let rule = or(vec![nt("deep"), nt("short"), nt("wide")]);
        let node = parser.parse(&rule, tokenize("1 2").unwrap()).unwrap();
        assert_eq!(node.render(), "(wide 1 2)");

        let tie = or(vec![nt("wide"), nt("wide")]);
        let node = parser.parse(&tie, tokenize("1 2").unwrap()).unwrap();
        assert_eq!(node.complexity, 4);
    }
}
