use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{HostError, HostResult};
use crate::node::SourceFile;
use crate::parser::create_source_file;
use crate::type_checker::{ProgramTypeChecker, SourceFileMap};
use crate::{ModuleKind, ScriptTarget};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    pub base_url: Option<String>,
    pub declaration: Option<bool>,
    pub emit_decorator_metadata: Option<bool>,
    pub experimental_decorators: Option<bool>,
    pub lib: Option<Vec<String>>,
    pub module: Option<ModuleKind>,
    pub no_emit: Option<bool>,
    pub no_emit_helpers: Option<bool>,
    pub out_dir: Option<String>,
    pub root_dir: Option<String>,
    pub skip_lib_check: Option<bool>,
    pub strict: Option<bool>,
    pub strict_null_checks: Option<bool>,
    pub target: Option<ScriptTarget>,
    pub types: Option<Vec<String>>,
}

impl CompilerOptions {
    /// Applies a JSON object of `compilerOptions` overrides on top of `self`.
    pub fn with_overrides(
        &self,
        overrides: &serde_json::Map<String, Value>,
        origin: &str,
    ) -> HostResult<Self> {
        let mut merged = self.to_json();
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged)).map_err(|error| HostError::Config {
            path: origin.to_string(),
            message: error.to_string(),
        })
    }

    fn to_json(&self) -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };
        set("baseUrl", self.base_url.clone().map(Value::from));
        set("declaration", self.declaration.map(Value::from));
        set(
            "emitDecoratorMetadata",
            self.emit_decorator_metadata.map(Value::from),
        );
        set(
            "experimentalDecorators",
            self.experimental_decorators.map(Value::from),
        );
        set("lib", self.lib.clone().map(Value::from));
        set(
            "module",
            self.module.map(|m| Value::from(format!("{:?}", m))),
        );
        set("noEmit", self.no_emit.map(Value::from));
        set("noEmitHelpers", self.no_emit_helpers.map(Value::from));
        set("outDir", self.out_dir.clone().map(Value::from));
        set("rootDir", self.root_dir.clone().map(Value::from));
        set("skipLibCheck", self.skip_lib_check.map(Value::from));
        set("strict", self.strict.map(Value::from));
        set("strictNullChecks", self.strict_null_checks.map(Value::from));
        set(
            "target",
            self.target.map(|t| Value::from(format!("{:?}", t))),
        );
        set("types", self.types.clone().map(Value::from));
        map
    }
}

/// Reads the `compilerOptions` section of a tsconfig file. `extends` is not
/// followed.
pub fn read_config_file(path: &str, host: &dyn CompilerHost) -> HostResult<CompilerOptions> {
    let text = host
        .read_file(path)
        .ok_or_else(|| HostError::MissingFile(path.to_string()))?;
    let config: Value = serde_json::from_str(&text).map_err(|error| HostError::Config {
        path: path.to_string(),
        message: error.to_string(),
    })?;
    match config.get("compilerOptions") {
        Some(options) => {
            serde_json::from_value(options.clone()).map_err(|error| HostError::Config {
                path: path.to_string(),
                message: error.to_string(),
            })
        }
        None => Ok(CompilerOptions::default()),
    }
}

pub trait CompilerHost {
    fn get_current_directory(&self) -> String;
    fn get_new_line(&self) -> String {
        "\n".to_string()
    }
    fn file_exists(&self, file_name: &str) -> bool;
    fn read_file(&self, file_name: &str) -> Option<String>;
}

/// Host backed by the real file system.
#[derive(Debug, Clone, Default)]
pub struct SystemHost;

impl CompilerHost for SystemHost {
    fn get_current_directory(&self) -> String {
        std::env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|_| ".".to_string())
    }

    fn file_exists(&self, file_name: &str) -> bool {
        Path::new(file_name).is_file()
    }

    fn read_file(&self, file_name: &str) -> Option<String> {
        std::fs::read_to_string(file_name).ok()
    }
}

/// Host over an in-memory file table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    files: IndexMap<String, String>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file_name: &str, text: &str) {
        self.files.insert(normalize_path(file_name), text.to_string());
    }

    pub fn with_file(mut self, file_name: &str, text: &str) -> Self {
        self.add_file(file_name, text);
        self
    }
}

impl CompilerHost for InMemoryHost {
    fn get_current_directory(&self) -> String {
        "/".to_string()
    }

    fn file_exists(&self, file_name: &str) -> bool {
        self.files.contains_key(&normalize_path(file_name))
    }

    fn read_file(&self, file_name: &str) -> Option<String> {
        self.files.get(&normalize_path(file_name)).cloned()
    }
}

/// Lexically normalizes a path and joins it with `/`.
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;
    for component in Path::new(path).components() {
        match component {
            Component::RootDir => absolute = true,
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(last) if last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Resolves a relative module specifier against the importing file.
/// Bare (package) specifiers are never resolved.
pub fn resolve_module_name(
    module_specifier: &str,
    containing_file: &str,
    file_exists: impl Fn(&str) -> bool,
) -> Option<String> {
    if !(module_specifier.starts_with("./") || module_specifier.starts_with("../")) {
        return None;
    }
    let directory = Path::new(containing_file)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(PathBuf::new);
    let base = normalize_path(&directory.join(module_specifier).to_string_lossy());

    let candidates = [
        base.clone(),
        format!("{}.ts", base),
        format!("{}.tsx", base),
        format!("{}.d.ts", base),
        format!("{}/index.ts", base),
        format!("{}/index.d.ts", base),
    ];
    candidates
        .into_iter()
        .filter(|candidate| candidate.ends_with(".ts") || candidate.ends_with(".tsx"))
        .find(|candidate| file_exists(candidate))
}

/// The set of root files plus every relatively imported file reachable from
/// them.
#[derive(Debug)]
pub struct Program {
    options: CompilerOptions,
    root_names: Vec<String>,
    files: Rc<SourceFileMap>,
}

impl Program {
    pub fn create(
        root_names: &[String],
        options: CompilerOptions,
        host: &dyn CompilerHost,
    ) -> HostResult<Self> {
        let root_names: Vec<String> = root_names.iter().map(|name| normalize_path(name)).collect();
        let mut files = SourceFileMap::new();
        let mut queue: VecDeque<String> = root_names.iter().cloned().collect();

        while let Some(file_name) = queue.pop_front() {
            if files.contains_key(&file_name) {
                continue;
            }
            let text = host
                .read_file(&file_name)
                .ok_or_else(|| HostError::MissingFile(file_name.clone()))?;
            let source_file = create_source_file(&file_name, &text)?;
            if let Some(locals) = &source_file.locals {
                for specifier in locals.module_specifiers() {
                    if let Some(resolved) = resolve_module_name(specifier, &file_name, |candidate| {
                        files.contains_key(candidate) || host.file_exists(candidate)
                    }) {
                        queue.push_back(resolved);
                    }
                }
            }
            tracing::debug!(file_name = %file_name, "added file to program");
            files.insert(file_name, Rc::new(source_file));
        }

        Ok(Program {
            options,
            root_names,
            files: Rc::new(files),
        })
    }

    pub fn get_compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn get_root_file_names(&self) -> &[String] {
        &self.root_names
    }

    pub fn get_source_files(&self) -> impl Iterator<Item = &Rc<SourceFile>> {
        self.files.values()
    }

    pub fn get_source_file(&self, file_name: &str) -> Option<Rc<SourceFile>> {
        self.files.get(&normalize_path(file_name)).cloned()
    }

    pub fn get_type_checker(&self) -> ProgramTypeChecker {
        ProgramTypeChecker::new(Rc::clone(&self.files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/a/./b/../c.ts"), "/a/c.ts");
        assert_eq!(normalize_path("src/app/../main.ts"), "src/main.ts");
        assert_eq!(normalize_path("../x.ts"), "../x.ts");
    }

    #[test]
    fn test_resolve_module_name() {
        let host = InMemoryHost::new()
            .with_file("/src/app/service.ts", "")
            .with_file("/src/lib/index.ts", "");
        let exists = |name: &str| host.file_exists(name);

        assert_eq!(
            resolve_module_name("./service", "/src/app/main.ts", exists).as_deref(),
            Some("/src/app/service.ts")
        );
        assert_eq!(
            resolve_module_name("../lib", "/src/app/main.ts", exists).as_deref(),
            Some("/src/lib/index.ts")
        );
        assert_eq!(resolve_module_name("@angular/core", "/src/app/main.ts", exists), None);
        assert_eq!(resolve_module_name("./missing", "/src/app/main.ts", exists), None);
    }

    #[test]
    fn test_program_follows_relative_imports() {
        let host = InMemoryHost::new()
            .with_file(
                "/src/main.ts",
                "import { Dep } from './dep';\nimport { Component } from '@angular/core';\n",
            )
            .with_file("/src/dep.ts", "export class Dep {}\n");
        let program = Program::create(
            &["/src/main.ts".to_string()],
            CompilerOptions::default(),
            &host,
        )
        .unwrap();

        let names: Vec<_> = program
            .get_source_files()
            .map(|f| f.file_name().to_string())
            .collect();
        assert_eq!(names, vec!["/src/main.ts", "/src/dep.ts"]);
        assert_eq!(program.get_root_file_names(), &["/src/main.ts".to_string()]);
    }

    #[test]
    fn test_program_missing_root() {
        let err = Program::create(
            &["/nope.ts".to_string()],
            CompilerOptions::default(),
            &InMemoryHost::new(),
        )
        .unwrap_err();
        assert!(matches!(err, HostError::MissingFile(_)));
    }

    #[test]
    fn test_read_config_file() {
        let host = InMemoryHost::new().with_file(
            "/tsconfig.json",
            r#"{ "compilerOptions": { "target": "es2017", "strictNullChecks": true, "paths": {} } }"#,
        );
        let options = read_config_file("/tsconfig.json", &host).unwrap();
        assert_eq!(options.target, Some(ScriptTarget::ES2017));
        assert_eq!(options.strict_null_checks, Some(true));

        let mut overrides = serde_json::Map::new();
        overrides.insert("strictNullChecks".to_string(), Value::from(false));
        overrides.insert("noEmit".to_string(), Value::from(true));
        let merged = options.with_overrides(&overrides, "test").unwrap();
        assert_eq!(merged.strict_null_checks, Some(false));
        assert_eq!(merged.no_emit, Some(true));
        assert_eq!(merged.target, Some(ScriptTarget::ES2017));
    }

    #[test]
    fn test_read_config_file_invalid_json() {
        let host = InMemoryHost::new().with_file("/tsconfig.json", "{ not json");
        let err = read_config_file("/tsconfig.json", &host).unwrap_err();
        assert!(matches!(err, HostError::Config { .. }));
    }
}
