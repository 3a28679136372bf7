// AOT Cleanup Configuration
//
// Options accepted by the loader and the command line front end, in the
// camelCase JSON shape used by build configuration files.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use ts::{read_config_file, CompilerHost, CompilerOptions, HostError, HostResult};

use crate::transform_walker::{AotWalkerOptions, DEFAULT_FRAMEWORK_MODULE_PREFIX, DEFAULT_GENERATED_FILE_PATTERN};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AotCleanupOptions {
    /// Pass every file through untouched.
    pub disable: bool,
    pub ts_config_path: Option<String>,
    /// Applied on top of the tsconfig `compilerOptions`.
    pub compiler_options: Map<String, Value>,
    pub framework_module_prefix: String,
    pub generated_file_pattern: String,
    pub use_secondary_checker: bool,
}

impl Default for AotCleanupOptions {
    fn default() -> Self {
        AotCleanupOptions {
            disable: false,
            ts_config_path: None,
            compiler_options: Map::new(),
            framework_module_prefix: DEFAULT_FRAMEWORK_MODULE_PREFIX.to_string(),
            generated_file_pattern: DEFAULT_GENERATED_FILE_PATTERN.to_string(),
            use_secondary_checker: true,
        }
    }
}

impl AotCleanupOptions {
    pub fn load(path: &Path) -> HostResult<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| HostError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&content, &display)
    }

    pub fn from_json(content: &str, origin: &str) -> HostResult<Self> {
        serde_json::from_str(content).map_err(|error| HostError::Config {
            path: origin.to_string(),
            message: error.to_string(),
        })
    }

    pub fn generated_file_regex(&self) -> HostResult<Regex> {
        Regex::new(&self.generated_file_pattern).map_err(|error| HostError::Config {
            path: "generatedFilePattern".to_string(),
            message: error.to_string(),
        })
    }

    pub fn walker_options(&self) -> HostResult<AotWalkerOptions> {
        Ok(AotWalkerOptions {
            framework_module_prefix: self.framework_module_prefix.clone(),
            generated_file_pattern: self.generated_file_regex()?,
        })
    }

    /// Compiler options from `tsConfigPath` (defaults when unset) with the
    /// `compilerOptions` overrides applied.
    pub fn resolve_compiler_options(&self, host: &dyn CompilerHost) -> HostResult<CompilerOptions> {
        let base = match &self.ts_config_path {
            Some(path) => read_config_file(path, host)?,
            None => CompilerOptions::default(),
        };
        if self.compiler_options.is_empty() {
            return Ok(base);
        }
        base.with_overrides(&self.compiler_options, "compilerOptions")
    }
}

/// Options of the secondary checker: it never emits and never needs strict
/// null information to classify a type reference.
pub fn secondary_checker_options(options: &CompilerOptions) -> CompilerOptions {
    CompilerOptions {
        strict_null_checks: Some(false),
        declaration: Some(false),
        no_emit: Some(true),
        skip_lib_check: Some(true),
        ..options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts::InMemoryHost;

    #[test]
    fn test_defaults() {
        let options = AotCleanupOptions::default();
        assert!(!options.disable);
        assert!(options.use_secondary_checker);
        assert_eq!(options.framework_module_prefix, "@angular/");

        let regex = options.generated_file_regex().unwrap();
        assert!(regex.is_match("app.module.ngfactory.ts"));
        assert!(!regex.is_match("app.module.ts"));
    }

    #[test]
    fn test_from_json() {
        let options = AotCleanupOptions::from_json(
            r#"{ "disable": true, "tsConfigPath": "tsconfig.json", "compilerOptions": { "target": "es5" } }"#,
            "inline",
        )
        .unwrap();
        assert!(options.disable);
        assert_eq!(options.ts_config_path.as_deref(), Some("tsconfig.json"));
        assert_eq!(options.generated_file_pattern, DEFAULT_GENERATED_FILE_PATTERN);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let options = AotCleanupOptions {
            generated_file_pattern: "(".to_string(),
            ..AotCleanupOptions::default()
        };
        assert!(matches!(
            options.generated_file_regex(),
            Err(HostError::Config { .. })
        ));
    }

    #[test]
    fn test_resolve_compiler_options_applies_overrides() {
        let host = InMemoryHost::new().with_file(
            "/tsconfig.json",
            r#"{ "compilerOptions": { "strict": true, "target": "es2015" } }"#,
        );
        let options = AotCleanupOptions::from_json(
            r#"{ "tsConfigPath": "/tsconfig.json", "compilerOptions": { "target": "es5" } }"#,
            "inline",
        )
        .unwrap();
        let resolved = options.resolve_compiler_options(&host).unwrap();
        assert_eq!(resolved.strict, Some(true));
        assert_eq!(resolved.target, Some(ts::ScriptTarget::ES5));
    }

    #[test]
    fn test_secondary_checker_options() {
        let options = CompilerOptions {
            strict_null_checks: Some(true),
            declaration: Some(true),
            ..CompilerOptions::default()
        };
        let forced = secondary_checker_options(&options);
        assert_eq!(forced.strict_null_checks, Some(false));
        assert_eq!(forced.declaration, Some(false));
        assert_eq!(forced.no_emit, Some(true));
        assert_eq!(forced.skip_lib_check, Some(true));
    }
}
