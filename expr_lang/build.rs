// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    source: SourceLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    runtime: RuntimeLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct SourceLimits {
    max_source_size: u64,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_token_count: usize,
    error_context_chars: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
}

#[derive(serde::Deserialize)]
struct RuntimeLimits {
    max_function_arguments: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=EXPR_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=EXPR_CONFIG_DIR");

    let profile = env::var("EXPR_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("EXPR_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of expr_lang directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_SOURCE_SIZE: u64 = 100_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 10_000;

    if config.source.max_source_size > ABSOLUTE_MAX_SOURCE_SIZE {
        panic!("LIMITS: max_source_size exceeds absolute maximum");
    }

    if config.syntax.max_parse_depth == 0 || config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH
    {
        panic!("LIMITS: max_parse_depth must be within 1..={}", ABSOLUTE_MAX_PARSE_DEPTH);
    }

    if config.lexical.error_context_chars == 0 {
        panic!("LIMITS: error_context_chars must be positive");
    }

    if config.logging.log_buffer_size < 100 {
        panic!("LIMITS: log_buffer_size too small (min: 100)");
    }

    if profile == "production" && config.source.max_source_size > 1_000_000 {
        panic!("PRODUCTION: max_source_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod source {{
        pub const MAX_SOURCE_SIZE: u64 = {};
    }}

    pub mod lexical {{
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const ERROR_CONTEXT_CHARS: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
    }}

    pub mod runtime {{
        pub const MAX_FUNCTION_ARGUMENTS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.source.max_source_size,
        config.lexical.max_token_count,
        config.lexical.error_context_chars,
        config.syntax.max_parse_depth,
        config.runtime.max_function_arguments,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
