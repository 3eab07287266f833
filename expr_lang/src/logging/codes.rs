//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Source loading error codes
pub mod source {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const SOURCE_TOO_LARGE: Code = Code::new("E007");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const UNRECOGNIZED_INPUT: Code = Code::new("E020");
    pub const INVALID_LITERAL: Code = Code::new("E022");
    pub const INVALID_PATTERN: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const TRAILING_INPUT: Code = Code::new("E040");
    pub const PREMATURE_END: Code = Code::new("E041");
    pub const NO_VIABLE_PARSE: Code = Code::new("E043");
    pub const UNKNOWN_RULE: Code = Code::new("E086");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Evaluation error codes
pub mod runtime {
    use super::Code;

    pub const FUNCTION_NOT_FOUND: Code = Code::new("E110");
    pub const TYPE_MISMATCH: Code = Code::new("E180");
    pub const FUNCTION_FAILED: Code = Code::new("E181");
    pub const UNKNOWN_NODE_KIND: Code = Code::new("E182");
    pub const INVALID_PIPELINE_STAGE: Code = Code::new("E184");
    pub const TOO_MANY_ARGUMENTS: Code = Code::new("E185");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const SOURCE_LOADED: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
    pub const COMPILATION_COMPLETE: Code = Code::new("I050");
    pub const EVALUATION_COMPLETE: Code = Code::new("I070");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the failing expression",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Subsystem initialization failed",
                "Check configuration and environment variables",
            ),
            // Source loading
            ErrorMetadata::new(
                "E005",
                "Source",
                Severity::High,
                false,
                true,
                "Expression file not found",
                "Verify the path exists and is readable",
            ),
            ErrorMetadata::new(
                "E007",
                "Source",
                Severity::High,
                false,
                true,
                "Expression source exceeds the configured size limit",
                "Shorten the expression or raise max_source_size",
            ),
            ErrorMetadata::new(
                "E010",
                "Source",
                Severity::High,
                false,
                true,
                "Expression source is not valid UTF-8",
                "Re-encode the source as UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "Source",
                Severity::High,
                false,
                true,
                "I/O error while reading expression source",
                "Check file permissions and disk state",
            ),
            // Lexical
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::High,
                false,
                true,
                "No terminal definition matches the input",
                "Remove or quote the offending characters",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::High,
                false,
                true,
                "Literal could not be converted to a value",
                "Check numeric literal range and format",
            ),
            ErrorMetadata::new(
                "E026",
                "Lexical",
                Severity::Critical,
                false,
                true,
                "Terminal pattern failed to compile",
                "Fix the regular expression in the terminal table",
            ),
            ErrorMetadata::new(
                "E027",
                "Lexical",
                Severity::High,
                false,
                true,
                "Token count exceeds the configured limit",
                "Split the expression or raise max_token_count",
            ),
            // Syntax
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::High,
                false,
                true,
                "Input remains after a complete expression",
                "Remove or complete the trailing tokens",
            ),
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::High,
                true,
                false,
                "Premature end of input",
                "Complete the expression",
            ),
            ErrorMetadata::new(
                "E043",
                "Syntax",
                Severity::High,
                false,
                true,
                "No grammar alternative matches the input",
                "Check the expression against the language syntax",
            ),
            ErrorMetadata::new(
                "E086",
                "Syntax",
                Severity::Critical,
                false,
                true,
                "Grammar references an undefined rule",
                "Define the rule or fix the reference",
            ),
            ErrorMetadata::new(
                "E087",
                "Syntax",
                Severity::Critical,
                false,
                true,
                "Maximum parser recursion depth exceeded",
                "Check the grammar for left recursion or reduce nesting",
            ),
            // Runtime
            ErrorMetadata::new(
                "E110",
                "Runtime",
                Severity::High,
                false,
                true,
                "Function is not registered",
                "Register the function with the host registry",
            ),
            ErrorMetadata::new(
                "E180",
                "Runtime",
                Severity::High,
                false,
                true,
                "Operand has the wrong type for the operation",
                "Use numeric operands for arithmetic",
            ),
            ErrorMetadata::new(
                "E181",
                "Runtime",
                Severity::High,
                false,
                true,
                "Registered function reported a failure",
                "Check the arguments passed to the function",
            ),
            ErrorMetadata::new(
                "E182",
                "Runtime",
                Severity::Critical,
                false,
                true,
                "Syntax tree contains a node the evaluator cannot execute",
                "File a bug report with the failing expression",
            ),
            ErrorMetadata::new(
                "E184",
                "Runtime",
                Severity::High,
                false,
                true,
                "Pipeline stage is not a function call",
                "Pipe values only into function calls",
            ),
            ErrorMetadata::new(
                "E185",
                "Runtime",
                Severity::High,
                false,
                true,
                "Function call exceeds the argument limit",
                "Pass fewer arguments",
            ),
            // Success
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "None",
            ),
            ErrorMetadata::new(
                "I006",
                "Source",
                Severity::Low,
                true,
                false,
                "Expression source loaded",
                "Continue to tokenization",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "Continue to parsing",
            ),
            ErrorMetadata::new(
                "I040",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Syntax tree constructed",
                "Continue to evaluation",
            ),
            ErrorMetadata::new(
                "I050",
                "Pipeline",
                Severity::Low,
                true,
                false,
                "Expression compiled",
                "Execute against a function registry",
            ),
            ErrorMetadata::new(
                "I070",
                "Runtime",
                Severity::Low,
                true,
                false,
                "Evaluation completed",
                "None",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
