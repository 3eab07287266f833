//! The expression language: terminal table and grammar rules

use crate::grammar::ast::AstNode;
use crate::grammar::rule::{nt, or, seq, t, zero_or_more, zero_or_one, Grammar, GrammarEntry};
use crate::lexical::{LexerError, TerminalDefinition};
use crate::tokens::{Term, TokenValue};

/// Rule every compiled program starts from
pub const START_RULE: &str = "expression";

// ============================================================================
// TERMINALS
// ============================================================================

/// Terminal table in priority order
pub fn terminals() -> Result<Vec<TerminalDefinition>, LexerError> {
    Ok(vec![
        TerminalDefinition::regex(Term::True, r"^true\b")?
            .with_converter(|_| Some(TokenValue::Bool(true))),
        TerminalDefinition::regex(Term::False, r"^false\b")?
            .with_converter(|_| Some(TokenValue::Bool(false))),
        TerminalDefinition::regex(Term::Null, r"^null\b")?.with_converter(|_| Some(TokenValue::Null)),
        TerminalDefinition::regex(Term::Float, r"^[0-9]*\.[0-9]+")?.with_converter(convert_number),
        TerminalDefinition::regex(Term::Int, r"^[0-9]+")?.with_converter(convert_number),
        TerminalDefinition::regex(Term::Identifier, r"^[a-zA-Z_]+\b")?,
        TerminalDefinition::regex(Term::StringA, r#"^"(?:[^"\\\n]|\\.)*""#)?
            .with_converter(convert_string),
        TerminalDefinition::regex(Term::StringB, r"^'(?:[^'\\\n]|\\.)*'")?
            .with_converter(convert_string),
        TerminalDefinition::literal(Term::LogicalAnd, "&&").discarded(),
        TerminalDefinition::literal(Term::LogicalOr, "||").discarded(),
        TerminalDefinition::literal(Term::Pipe, "|>").discarded(),
        TerminalDefinition::literal(Term::Pow, "**"),
        TerminalDefinition::literal(Term::Plus, "+"),
        TerminalDefinition::literal(Term::Minus, "-"),
        TerminalDefinition::literal(Term::Mul, "*"),
        TerminalDefinition::literal(Term::Div, "/"),
        TerminalDefinition::literal(Term::Mod, "%"),
        TerminalDefinition::literal(Term::Doublecolon, ":").discarded(),
        TerminalDefinition::literal(Term::Equals, "=").discarded(),
        TerminalDefinition::literal(Term::ParenthesisOpen, "(").discarded(),
        TerminalDefinition::literal(Term::ParenthesisClose, ")").discarded(),
        TerminalDefinition::literal(Term::BracketOpen, "[").discarded(),
        TerminalDefinition::literal(Term::BracketClose, "]").discarded(),
        TerminalDefinition::literal(Term::CurlybracketOpen, "{").discarded(),
        TerminalDefinition::literal(Term::CurlybracketClose, "}").discarded(),
        TerminalDefinition::literal(Term::Comma, ",").discarded(),
        TerminalDefinition::literal(Term::Semicolon, ";").discarded(),
    ])
}

fn convert_number(text: &str) -> Option<TokenValue> {
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(TokenValue::Number)
}

/// Strip the quotes and resolve backslash escapes
fn convert_string(text: &str) -> Option<TokenValue> {
    let inner = text.get(1..text.len().checked_sub(1)?)?;
    Some(TokenValue::Text(unescape(inner)))
}

/// `\r`, `\n` and `\t` map to control characters; any other escaped
/// character stands for itself.
pub fn unescape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some('r') => output.push('\r'),
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some(other) => output.push(other),
            None => output.push('\\'),
        }
    }
    output
}

// ============================================================================
// POST FILTERS
// ============================================================================

/// Collapse a wrapper onto its only child
fn unwrap_child(mut node: AstNode) -> AstNode {
    match node.child.take() {
        Some(child) => *child,
        None => node,
    }
}

/// Take the operand of a `sign numeric` sequence
fn signed_operand(node: &mut AstNode) -> Option<AstNode> {
    node.child
        .as_mut()
        .and_then(|inner| inner.children.as_mut())
        .filter(|children| children.len() == 2)
        .map(|children| children.remove(1))
}

fn negate_number(mut node: AstNode) -> AstNode {
    match signed_operand(&mut node) {
        Some(mut operand) => {
            if let Some(TokenValue::Number(n)) = operand.value {
                operand.value = Some(TokenValue::Number(-n));
            }
            operand.complexity = 1;
            operand
        }
        None => node,
    }
}

fn drop_plus_sign(mut node: AstNode) -> AstNode {
    match signed_operand(&mut node) {
        Some(mut operand) => {
            operand.complexity = 1;
            operand
        }
        None => node,
    }
}

/// `(mathExpression x)` is just `x`
fn collapse_single_operand(mut node: AstNode) -> AstNode {
    let single = node
        .child
        .as_mut()
        .and_then(|inner| inner.children.as_mut())
        .filter(|children| children.len() == 1)
        .and_then(|children| children.pop());
    single.unwrap_or(node)
}

/// Promote the element sequence to the array's own children
fn promote_elements(mut node: AstNode) -> AstNode {
    node.children = Some(
        node.child
            .take()
            .and_then(|inner| inner.children)
            .unwrap_or_default(),
    );
    node
}

// ============================================================================
// RULES
// ============================================================================

pub fn rules() -> Grammar {
    Grammar::new()
        // Booleans
        .with_rule(
            "booleanConstants",
            GrammarEntry::inline(or(vec![t(Term::True), t(Term::False)])),
        )
        .with_rule(
            "booleanExpression",
            GrammarEntry::inline(or(vec![nt("booleanConstants")])),
        )
        // Strings
        .with_rule(
            "string",
            GrammarEntry::inline(or(vec![t(Term::StringA), t(Term::StringB)])),
        )
        // Numbers and math
        .with_rule(
            "numeric",
            GrammarEntry::new(or(vec![t(Term::Float), t(Term::Int)])).with_post_filter(unwrap_child),
        )
        .with_rule(
            "positiveNumber",
            GrammarEntry::new(seq(vec![t(Term::Plus), nt("numeric")]))
                .with_post_filter(drop_plus_sign),
        )
        .with_rule(
            "negativeNumber",
            GrammarEntry::new(seq(vec![t(Term::Minus), nt("numeric")]))
                .with_post_filter(negate_number),
        )
        .with_rule(
            "number",
            GrammarEntry::inline(or(vec![
                nt("negativeNumber"),
                nt("positiveNumber"),
                nt("numeric"),
            ])),
        )
        .with_rule(
            "mathLineSymbol",
            GrammarEntry::inline(or(vec![t(Term::Plus), t(Term::Minus)])),
        )
        .with_rule(
            "mathPointSymbol",
            GrammarEntry::inline(or(vec![
                t(Term::Mul),
                t(Term::Div),
                t(Term::Mod),
                t(Term::Pow),
            ])),
        )
        .with_rule(
            "mathSymbol",
            GrammarEntry::inline(or(vec![nt("mathPointSymbol"), nt("mathLineSymbol")])),
        )
        .with_rule(
            "mathExpressionLeft",
            GrammarEntry::inline(or(vec![nt("function"), nt("number")])),
        )
        .with_rule(
            "mathPointExpression",
            GrammarEntry::new(or(vec![
                seq(vec![
                    nt("mathExpressionLeft"),
                    nt("mathPointSymbol"),
                    nt("mathPointExpression"),
                ]),
                seq(vec![nt("mathExpressionLeft"), nt("mathPointSymbol"), nt("number")]),
                seq(vec![nt("mathExpressionLeft")]),
            ])),
        )
        .with_rule(
            "mathExpression",
            GrammarEntry::new(or(vec![
                seq(vec![
                    t(Term::ParenthesisOpen),
                    nt("mathExpression"),
                    t(Term::ParenthesisClose),
                    nt("mathSymbol"),
                    nt("mathExpression"),
                ]),
                seq(vec![
                    t(Term::ParenthesisOpen),
                    nt("mathExpression"),
                    t(Term::ParenthesisClose),
                ]),
                seq(vec![
                    nt("mathPointExpression"),
                    nt("mathLineSymbol"),
                    nt("mathExpression"),
                ]),
                seq(vec![nt("mathExpressionLeft"), nt("mathSymbol"), nt("mathExpression")]),
                seq(vec![nt("mathExpressionLeft"), nt("mathSymbol"), nt("number")]),
                seq(vec![nt("mathExpressionLeft")]),
            ]))
            .with_post_filter(collapse_single_operand),
        )
        // Functions
        .with_rule(
            "parameterList",
            GrammarEntry::inline(seq(vec![
                zero_or_more(seq(vec![nt("expression"), t(Term::Comma)])),
                zero_or_one(nt("expression")),
            ])),
        )
        .with_rule(
            "function",
            GrammarEntry::new(seq(vec![
                t(Term::Identifier),
                t(Term::ParenthesisOpen),
                nt("parameterList"),
                t(Term::ParenthesisClose),
            ])),
        )
        // Pipelines
        .with_rule(
            "pipeline",
            GrammarEntry::new(seq(vec![
                or(vec![
                    nt("function"),
                    nt("number"),
                    nt("string"),
                    nt("booleanExpression"),
                    t(Term::Null),
                    nt("array"),
                    nt("hash"),
                ]),
                t(Term::Pipe),
                or(vec![nt("pipeline"), nt("function")]),
            ])),
        )
        // Arrays
        .with_rule(
            "array",
            GrammarEntry::new(seq(vec![
                t(Term::BracketOpen),
                zero_or_more(seq(vec![nt("expression"), t(Term::Comma)])),
                zero_or_one(nt("expression")),
                t(Term::BracketClose),
            ]))
            .with_post_filter(promote_elements),
        )
        // Hashes
        .with_rule(
            "hashKey",
            GrammarEntry::inline(or(vec![nt("string"), t(Term::Identifier)])),
        )
        .with_rule(
            "hashKeyValue",
            GrammarEntry::new(or(vec![
                seq(vec![nt("hashKey"), t(Term::Doublecolon), nt("expression")]),
                seq(vec![t(Term::Identifier)]),
            ])),
        )
        .with_rule(
            "hash",
            GrammarEntry::new(seq(vec![
                t(Term::CurlybracketOpen),
                zero_or_more(seq(vec![nt("hashKeyValue"), t(Term::Comma)])),
                zero_or_one(nt("hashKeyValue")),
                t(Term::CurlybracketClose),
            ])),
        )
        // Common expressions
        .with_rule(
            "expression",
            GrammarEntry::inline(or(vec![
                nt("booleanExpression"),
                nt("mathExpression"),
                nt("function"),
                nt("pipeline"),
                nt("hash"),
                nt("array"),
                nt("number"),
                nt("string"),
                t(Term::Null),
            ])),
        )
}
