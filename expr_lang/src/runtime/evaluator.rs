//! Tree-walking evaluator
//!
//! Dispatch is purely on the node kind. Arithmetic and function nodes attach
//! their own position to the first error raised beneath them, so an error
//! always points at the innermost failing call or operation.

use crate::config::compile_time::runtime::MAX_FUNCTION_ARGUMENTS;
use crate::grammar::{AstNode, NodeKind};
use crate::log_debug;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::registry::FunctionRegistry;
use crate::runtime::value::Value;
use crate::tokens::{Term, TokenValue};

// ============================================================================
// ARITHMETIC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl MathOp {
    pub fn from_term(term: Term) -> Option<Self> {
        match term {
            Term::Plus => Some(MathOp::Add),
            Term::Minus => Some(MathOp::Sub),
            Term::Mul => Some(MathOp::Mul),
            Term::Div => Some(MathOp::Div),
            Term::Mod => Some(MathOp::Mod),
            Term::Pow => Some(MathOp::Pow),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Sub => "-",
            MathOp::Mul => "*",
            MathOp::Div => "/",
            MathOp::Mod => "%",
            MathOp::Pow => "**",
        }
    }

    /// Plain f64 arithmetic; a zero divisor yields Infinity or NaN
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            MathOp::Add => left + right,
            MathOp::Sub => left - right,
            MathOp::Mul => left * right,
            MathOp::Div => left / right,
            MathOp::Mod => left % right,
            MathOp::Pow => left.powf(right),
        }
    }
}

fn number_operand(value: Value) -> RuntimeResult<f64> {
    value.as_number().ok_or(RuntimeError::TypeMismatch {
        expected: "number",
        found: value.type_name(),
    })
}

fn unexpected_shape(node: &AstNode) -> RuntimeError {
    RuntimeError::UnknownNodeKind {
        kind: format!("{} with {} children", node.kind, node.child_nodes().len()),
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

pub struct Evaluator<'r> {
    registry: &'r FunctionRegistry,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn evaluate(&self, node: &AstNode) -> RuntimeResult<Value> {
        match node.kind {
            NodeKind::Terminal(term) => self.eval_leaf(term, node),
            NodeKind::Rule("mathExpression") | NodeKind::Rule("mathPointExpression") => self
                .eval_math(node)
                .map_err(|e| e.located(node.line, node.column)),
            NodeKind::Rule("function") => self
                .call(node, None)
                .map_err(|e| e.located(node.line, node.column)),
            NodeKind::Rule("pipeline") => self.eval_pipeline(node),
            NodeKind::Rule("array") => self.eval_list(node),
            NodeKind::Rule("hash") => self.eval_hash(node),
            NodeKind::Sequence | NodeKind::ZeroOrOne | NodeKind::Repetition => {
                self.eval_list(node)
            }
            NodeKind::Rule(name) => Err(RuntimeError::UnknownNodeKind {
                kind: name.to_string(),
            }),
        }
    }

    fn eval_leaf(&self, term: Term, node: &AstNode) -> RuntimeResult<Value> {
        match term {
            Term::Null => Ok(Value::Null),
            Term::True => Ok(Value::Bool(true)),
            Term::False => Ok(Value::Bool(false)),
            Term::Int | Term::Float | Term::StringA | Term::StringB => {
                Ok(node.value.clone().map(Value::from).unwrap_or(Value::Null))
            }
            _ => match MathOp::from_term(term) {
                Some(op) => Err(RuntimeError::OperatorAsValue {
                    symbol: op.symbol().to_string(),
                }),
                None => Err(RuntimeError::UnknownNodeKind {
                    kind: term.name().to_string(),
                }),
            },
        }
    }

    fn eval_list(&self, node: &AstNode) -> RuntimeResult<Value> {
        node.child_nodes()
            .iter()
            .map(|child| self.evaluate(child))
            .collect::<RuntimeResult<Vec<_>>>()
            .map(Value::List)
    }

    fn eval_hash(&self, node: &AstNode) -> RuntimeResult<Value> {
        let mut entries = Vec::new();
        for pair in node.child_nodes() {
            if !pair.kind.is_rule("hashKeyValue") {
                return Err(unexpected_shape(node));
            }
            let (key, value) = match pair.child_nodes() {
                [key] => {
                    let name = key_text(key).ok_or_else(|| unexpected_shape(pair))?;
                    (name.clone(), Value::String(name))
                }
                [key, value] => {
                    let name = key_text(key).ok_or_else(|| unexpected_shape(pair))?;
                    (name, self.evaluate(value)?)
                }
                _ => return Err(unexpected_shape(pair)),
            };
            Value::insert(&mut entries, key, value);
        }
        Ok(Value::Map(entries))
    }

    fn eval_math(&self, node: &AstNode) -> RuntimeResult<Value> {
        let (left, operator, right) = match node.child_nodes() {
            [operand] => return self.evaluate(operand),
            [left, operator, right] => (left, operator, right),
            _ => return Err(unexpected_shape(node)),
        };

        let op = operator
            .term()
            .and_then(MathOp::from_term)
            .ok_or_else(|| RuntimeError::UnknownOperator {
                symbol: operator.render(),
            })?;

        let left = number_operand(self.evaluate(left)?)?;
        let right = number_operand(self.evaluate(right)?)?;
        Ok(Value::Number(op.apply(left, right)))
    }

    /// Thread the head value through each stage as its first argument
    fn eval_pipeline(&self, node: &AstNode) -> RuntimeResult<Value> {
        let [head, target] = node.child_nodes() else {
            return Err(unexpected_shape(node));
        };

        let mut value = self.evaluate(head)?;
        let mut target = target;
        while target.kind.is_rule("pipeline") {
            let [stage, rest] = target.child_nodes() else {
                return Err(unexpected_shape(target));
            };
            value = self.stage(stage, value)?;
            target = rest;
        }
        self.stage(target, value)
    }

    fn stage(&self, node: &AstNode, piped: Value) -> RuntimeResult<Value> {
        if !node.kind.is_rule("function") {
            return Err(RuntimeError::InvalidPipelineStage {
                kind: node.kind.to_string(),
            }
            .located(node.line, node.column));
        }
        self.call(node, Some(piped))
            .map_err(|e| e.located(node.line, node.column))
    }

    /// Invoke a `function` node, optionally with a piped-in first argument
    fn call(&self, node: &AstNode, piped: Option<Value>) -> RuntimeResult<Value> {
        let Some((name_node, params)) = node.child_nodes().split_first() else {
            return Err(unexpected_shape(node));
        };
        let name = match (&name_node.kind, &name_node.value) {
            (NodeKind::Terminal(Term::Identifier), Some(TokenValue::Text(name))) => name,
            _ => return Err(unexpected_shape(node)),
        };

        let mut args = Vec::with_capacity(params.len() + 1);
        args.extend(piped);
        for param in params {
            args.push(self.evaluate(param)?);
        }

        if args.len() > MAX_FUNCTION_ARGUMENTS {
            return Err(RuntimeError::TooManyArguments {
                name: name.clone(),
                count: args.len(),
            });
        }

        log_debug!("Invoking function", "name" => name, "arguments" => args.len());
        self.registry.invoke(name, &args)
    }
}

fn key_text(node: &AstNode) -> Option<String> {
    match &node.value {
        Some(TokenValue::Text(text)) => Some(text.clone()),
        _ => None,
    }
}
