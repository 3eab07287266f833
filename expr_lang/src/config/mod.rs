//! Configuration module for the expression language
//! Compile-time limits are generated from TOML by build.rs; user preferences
//! are resolved at runtime from the environment.

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("EXPR_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("EXPR_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::syntax::MAX_PARSE_DEPTH > 0);
        assert!(compile_time::lexical::ERROR_CONTEXT_CHARS > 0);
        assert!(compile_time::lexical::MAX_TOKEN_COUNT > 0);
        assert!(compile_time::source::MAX_SOURCE_SIZE > 0);
    }

    #[test]
    fn test_source_info_names_profile() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
