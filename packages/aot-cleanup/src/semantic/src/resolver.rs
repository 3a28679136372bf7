use ts::{HostResult, NodeId, SourceFile, Symbol, TypeChecker};

/// Resolves the declaration a constructor parameter's type reference points
/// at. `primary` is the checker of the surrounding program, when there is one.
pub trait SemanticResolver {
    fn resolve_type_reference(
        &mut self,
        file: &SourceFile,
        type_node: NodeId,
        primary: Option<&dyn TypeChecker>,
    ) -> HostResult<Option<Symbol>>;
}

/// Consults the primary checker only, and only for files it was built over.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryCheckerResolver;

impl SemanticResolver for PrimaryCheckerResolver {
    fn resolve_type_reference(
        &mut self,
        file: &SourceFile,
        type_node: NodeId,
        primary: Option<&dyn TypeChecker>,
    ) -> HostResult<Option<Symbol>> {
        Ok(primary_symbol(file, type_node, primary))
    }
}

pub(crate) fn primary_symbol(
    file: &SourceFile,
    type_node: NodeId,
    primary: Option<&dyn TypeChecker>,
) -> Option<Symbol> {
    primary
        .filter(|checker| checker.has_source_file(file))
        .and_then(|checker| checker.get_symbol_at_location(file, file.original_node(type_node)))
}
