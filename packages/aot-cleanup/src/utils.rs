use ts::{Edge, NodeId, SourceFile, SyntaxKind};

/// Names an import declaration binds from the framework module.
///
/// Named imports contribute the imported (not the local) name, a namespace
/// import contributes `alias.`, default and bare imports contribute nothing.
pub fn angular_imports_from_node(file: &SourceFile, node: NodeId, module_prefix: &str) -> Vec<String> {
    let module_path = match file.child(node, Edge::ModuleSpecifier) {
        Some(specifier) if file.kind(specifier) == SyntaxKind::StringLiteral => {
            match &file.node(specifier).data {
                ts::NodeData::StringLiteral(value) => value.as_str(),
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };
    if !module_path.starts_with(module_prefix) {
        return Vec::new();
    }

    let Some(clause) = file.child(node, Edge::ImportClause) else {
        return Vec::new();
    };
    let Some(bindings) = file.child(clause, Edge::NamedBindings) else {
        return Vec::new();
    };

    match file.kind(bindings) {
        SyntaxKind::NamespaceImport => file
            .name_text(bindings)
            .map(|name| vec![format!("{}.", name)])
            .unwrap_or_default(),
        SyntaxKind::NamedImports => file
            .children_of(bindings, Edge::Element)
            .filter_map(|element| {
                file.child(element, Edge::PropertyName)
                    .or_else(|| file.child(element, Edge::Name))
                    .map(|name| file.get_text(name).to_string())
            })
            .collect(),
        _ => Vec::new(),
    }
}
