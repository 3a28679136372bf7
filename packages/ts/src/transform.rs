use std::rc::Rc;

use crate::program::CompilerOptions;
use crate::type_checker::TypeChecker;

/// Helper code a pass asks the printer to emit at the top of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitHelper {
    pub name: String,
    pub scoped: bool,
    pub text: String,
}

/// State shared by the passes applied to one file.
#[derive(Debug, Default)]
pub struct TransformationContext {
    options: CompilerOptions,
    emit_helpers: Vec<EmitHelper>,
    type_checker: Option<Rc<dyn TypeChecker>>,
}

impl TransformationContext {
    pub fn new(options: CompilerOptions) -> Self {
        TransformationContext {
            options,
            emit_helpers: Vec::new(),
            type_checker: None,
        }
    }

    pub fn with_type_checker(mut self, checker: Rc<dyn TypeChecker>) -> Self {
        self.type_checker = Some(checker);
        self
    }

    pub fn get_compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn type_checker(&self) -> Option<&Rc<dyn TypeChecker>> {
        self.type_checker.as_ref()
    }

    pub fn request_emit_helper(&mut self, helper: EmitHelper) {
        if !self.emit_helpers.iter().any(|h| h.name == helper.name) {
            self.emit_helpers.push(helper);
        }
    }

    /// Drains the helpers requested since the last read.
    pub fn read_emit_helpers(&mut self) -> Vec<EmitHelper> {
        std::mem::take(&mut self.emit_helpers)
    }
}
