// Mock Type Checker
//
// A small semantic model over a registry of in-memory files. Files are
// registered with a version; a parse is reused until the version moves.
// Anything not registered is read through the compiler host.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use ts::{
    create_source_file, normalize_path, resolve_module_name, symbol_at_location, CompilerHost,
    CompilerOptions, Diagnostic, HostResult, NodeId, SourceFile, SourceFileMap, Symbol,
};

use crate::config::secondary_checker_options;

struct CachedFile {
    version: Option<u32>,
    file: Rc<SourceFile>,
}

pub struct MockTypeChecker {
    options: CompilerOptions,
    host: Rc<dyn CompilerHost>,
    versions: IndexMap<String, u32>,
    virt_file_system: IndexMap<String, String>,
    parsed: IndexMap<String, CachedFile>,
}

impl fmt::Debug for MockTypeChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTypeChecker")
            .field("options", &self.options)
            .field("versions", &self.versions)
            .finish_non_exhaustive()
    }
}

impl MockTypeChecker {
    pub fn new(options: CompilerOptions, host: Rc<dyn CompilerHost>) -> Self {
        MockTypeChecker {
            options: secondary_checker_options(&options),
            host,
            versions: IndexMap::new(),
            virt_file_system: IndexMap::new(),
            parsed: IndexMap::new(),
        }
    }

    pub fn with_virt_files<'f>(
        options: CompilerOptions,
        host: Rc<dyn CompilerHost>,
        files: impl IntoIterator<Item = (&'f str, &'f str)>,
    ) -> Self {
        let mut checker = Self::new(options, host);
        for (file_name, content) in files {
            checker.add_virt_file(file_name, content);
        }
        checker
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn has_file(&self, file_name: &str) -> bool {
        self.versions.contains_key(&normalize_path(file_name))
    }

    /// Registers `file_name`, or bumps its version when already registered.
    pub fn add_file(&mut self, file_name: &str) {
        self.versions
            .entry(normalize_path(file_name))
            .and_modify(|version| *version += 1)
            .or_insert(0);
    }

    pub fn add_virt_file(&mut self, file_name: &str, content: &str) {
        self.virt_file_system
            .insert(normalize_path(file_name), content.to_string());
        self.add_file(file_name);
    }

    pub fn version(&self, file_name: &str) -> Option<u32> {
        self.versions.get(&normalize_path(file_name)).copied()
    }

    pub fn virt_file_text(&self, file_name: &str) -> Option<&str> {
        self.virt_file_system
            .get(&normalize_path(file_name))
            .map(String::as_str)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    fn file_exists(&self, file_name: &str) -> bool {
        self.virt_file_system.contains_key(file_name) || self.host.file_exists(file_name)
    }

    fn read_file(&self, file_name: &str) -> Option<String> {
        match self.virt_file_system.get(file_name) {
            Some(content) => Some(content.clone()),
            None => self.host.read_file(file_name),
        }
    }

    /// `Ok(None)` when the file is neither registered nor readable.
    pub fn get_source_file(&mut self, file_name: &str) -> HostResult<Option<Rc<SourceFile>>> {
        let file_name = normalize_path(file_name);
        let version = self.versions.get(&file_name).copied();
        if let Some(cached) = self.parsed.get(&file_name) {
            if cached.version == version {
                return Ok(Some(Rc::clone(&cached.file)));
            }
        }

        let Some(text) = self.read_file(&file_name) else {
            return Ok(None);
        };
        let file = Rc::new(create_source_file(&file_name, &text)?);
        tracing::trace!(file_name = %file_name, ?version, "secondary checker parsed file");
        self.parsed.insert(
            file_name,
            CachedFile {
                version,
                file: Rc::clone(&file),
            },
        );
        Ok(Some(file))
    }

    pub fn get_diagnostics(&mut self, file_name: &str) -> Vec<Diagnostic> {
        match self.get_source_file(file_name) {
            Ok(Some(file)) => file.diagnostics.clone(),
            Ok(None) => vec![Diagnostic::error(Some(file_name), "file not found")],
            Err(error) => vec![Diagnostic::error(Some(file_name), error.to_string())],
        }
    }

    /// Resolves the entity named at `node` of `file`, loading the files it
    /// relatively imports (transitively) from the registry or the host.
    pub fn get_symbol_at_location(&mut self, file: &SourceFile, node: NodeId) -> HostResult<Option<Symbol>> {
        let mut files = SourceFileMap::new();
        let mut queue: VecDeque<(String, String)> = VecDeque::new();
        enqueue_imports(file, &mut queue);

        while let Some((specifier, containing)) = queue.pop_front() {
            let Some(resolved) = resolve_module_name(&specifier, &containing, |candidate| {
                self.file_exists(candidate)
            }) else {
                continue;
            };
            if files.contains_key(&resolved) || resolved == file.file_name() {
                continue;
            }
            if let Some(imported) = self.get_source_file(&resolved)? {
                enqueue_imports(&imported, &mut queue);
                files.insert(resolved, imported);
            }
        }

        Ok(symbol_at_location(&files, file, node))
    }
}

fn enqueue_imports(file: &SourceFile, queue: &mut VecDeque<(String, String)>) {
    if let Some(locals) = &file.locals {
        for specifier in locals.module_specifiers() {
            queue.push_back((specifier.to_string(), file.file_name().to_string()));
        }
    }
}
