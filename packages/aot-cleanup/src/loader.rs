// AOT Cleanup Loader
//
// Text in, text out: the entry point for build tools that hand over one
// module source at a time.

use std::rc::Rc;

use ts::{create_source_file, normalize_path, CompilerHost, CompilerOptions, HostResult, Printer, TransformationContext};

use crate::config::AotCleanupOptions;
use crate::error::TransformResult;
use crate::run::AotCleanupRun;
use crate::transformer::aot_cleanup_transformer;

pub struct AotCleanupLoader {
    options: AotCleanupOptions,
    compiler_options: CompilerOptions,
    run: AotCleanupRun,
    printer: Printer,
}

impl AotCleanupLoader {
    pub fn new(options: AotCleanupOptions, host: Rc<dyn CompilerHost>) -> HostResult<Self> {
        let compiler_options = options.resolve_compiler_options(host.as_ref())?;
        let run = AotCleanupRun::from_options(&options, compiler_options.clone(), host)?;
        Ok(AotCleanupLoader {
            options,
            compiler_options,
            run,
            printer: Printer::new(),
        })
    }

    pub fn options(&self) -> &AotCleanupOptions {
        &self.options
    }

    pub fn run(&self) -> &AotCleanupRun {
        &self.run
    }

    pub fn load(&mut self, resource_path: &str, source: &str) -> TransformResult<String> {
        if self.options.disable {
            return Ok(source.to_string());
        }
        if self.run.walker_options().generated_file_pattern.is_match(resource_path) {
            tracing::debug!(resource_path, "passing generated file through");
            return Ok(source.to_string());
        }

        let file = create_source_file(&normalize_path(resource_path), source)?;
        let mut context = TransformationContext::new(self.compiler_options.clone());
        let transformed = aot_cleanup_transformer(&file, &mut context, &mut self.run)?;
        Ok(self.printer.print_file(&transformed))
    }
}
