// AOT Cleanup Run
//
// State shared by every file lowered in one compilation: the walker options
// and the secondary checker, which is only built once a file shows up that
// the primary program does not own.

use std::rc::Rc;

use ts::{
    normalize_path, CompilerHost, CompilerOptions, HostResult, NodeId, SourceFile, Symbol,
    SystemHost, TypeChecker,
};

use crate::config::AotCleanupOptions;
use crate::semantic::src::resolver::primary_symbol;
use crate::semantic::{find_remote_match, MockTypeChecker, SemanticResolver};
use crate::transform_walker::AotWalkerOptions;

pub struct AotCleanupRun {
    compiler_options: CompilerOptions,
    host: Rc<dyn CompilerHost>,
    walker_options: AotWalkerOptions,
    use_secondary_checker: bool,
    mock_type_checker: Option<MockTypeChecker>,
}

impl AotCleanupRun {
    pub fn new(compiler_options: CompilerOptions) -> Self {
        Self::with_host(compiler_options, Rc::new(SystemHost))
    }

    pub fn with_host(compiler_options: CompilerOptions, host: Rc<dyn CompilerHost>) -> Self {
        AotCleanupRun {
            compiler_options,
            host,
            walker_options: AotWalkerOptions::default(),
            use_secondary_checker: true,
            mock_type_checker: None,
        }
    }

    pub fn from_options(
        options: &AotCleanupOptions,
        compiler_options: CompilerOptions,
        host: Rc<dyn CompilerHost>,
    ) -> HostResult<Self> {
        Ok(Self::with_host(compiler_options, host)
            .with_walker_options(options.walker_options()?)
            .with_secondary_checker(options.use_secondary_checker))
    }

    pub fn with_walker_options(mut self, walker_options: AotWalkerOptions) -> Self {
        self.walker_options = walker_options;
        self
    }

    pub fn with_secondary_checker(mut self, enabled: bool) -> Self {
        self.use_secondary_checker = enabled;
        self
    }

    pub fn walker_options(&self) -> &AotWalkerOptions {
        &self.walker_options
    }

    pub fn compiler_options(&self) -> &CompilerOptions {
        &self.compiler_options
    }

    /// `None` until a lookup first needed it.
    pub fn mock_type_checker(&self) -> Option<&MockTypeChecker> {
        self.mock_type_checker.as_ref()
    }
}

impl SemanticResolver for AotCleanupRun {
    fn resolve_type_reference(
        &mut self,
        file: &SourceFile,
        type_node: NodeId,
        primary: Option<&dyn TypeChecker>,
    ) -> HostResult<Option<Symbol>> {
        if primary.is_some_and(|checker| checker.has_source_file(file)) {
            return Ok(primary_symbol(file, type_node, primary));
        }
        if !self.use_secondary_checker {
            return Ok(None);
        }

        let file_name = normalize_path(file.file_name());
        tracing::debug!(file_name = %file_name, "resolving through secondary checker");
        let compiler_options = &self.compiler_options;
        let host = &self.host;
        let checker = self
            .mock_type_checker
            .get_or_insert_with(|| MockTypeChecker::new(compiler_options.clone(), Rc::clone(host)));

        if checker.virt_file_text(&file_name) != Some(file.text()) {
            let registered = checker.has_file(&file_name);
            checker.add_virt_file(&file_name, file.text());
            tracing::debug!(
                file_name = %file_name,
                version = checker.version(&file_name),
                "{}",
                if registered { "re-versioned virtual file" } else { "registered virtual file" }
            );
        }

        let Some(remote) = checker.get_source_file(&file_name)? else {
            return Ok(None);
        };
        match find_remote_match(&remote, remote.root(), file, type_node) {
            Some(twin) => checker.get_symbol_at_location(&remote, twin),
            None => {
                tracing::debug!(file_name = %file_name, "no twin node in secondary tree");
                Ok(None)
            }
        }
    }
}
