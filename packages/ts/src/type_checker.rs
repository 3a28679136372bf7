use std::fmt::Debug;
use std::rc::Rc;

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::binder::{ExportBinding, ImportedName};
use crate::node::{Edge, NodeId, SourceFile, SyntaxKind};
use crate::program::resolve_module_name;

/// Files of one program (or one virtual registry), keyed by file name.
pub type SourceFileMap = IndexMap<String, Rc<SourceFile>>;

const MAX_ALIAS_DEPTH: usize = 16;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const VARIABLE = 1 << 0;
        const FUNCTION = 1 << 4;
        const CLASS = 1 << 5;
        const INTERFACE = 1 << 6;
        const ENUM = 1 << 8;
        const NAMESPACE = 1 << 10;
        const TYPE_LITERAL = 1 << 11;
        const TYPE_PARAMETER = 1 << 18;
        const TYPE_ALIAS = 1 << 19;
        const ALIAS = 1 << 21;

        /// Symbols that only exist at type level and erase to `Object`.
        const STRUCTURAL = Self::INTERFACE.bits() | Self::TYPE_ALIAS.bits() | Self::TYPE_LITERAL.bits();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub file_name: String,
}

impl Symbol {
    pub fn is_structural(&self) -> bool {
        self.flags.intersects(SymbolFlags::STRUCTURAL)
    }
}

pub trait TypeChecker: Debug {
    /// Whether `file` is the very parse this checker was built over.
    fn has_source_file(&self, file: &SourceFile) -> bool;

    /// Resolves the entity named by a type reference (or its type name),
    /// following import aliases to the declaring file.
    fn get_symbol_at_location(&self, file: &SourceFile, node: NodeId) -> Option<Symbol>;
}

/// Checker over the files of a [`crate::Program`].
#[derive(Debug, Clone)]
pub struct ProgramTypeChecker {
    files: Rc<SourceFileMap>,
}

impl ProgramTypeChecker {
    pub fn new(files: Rc<SourceFileMap>) -> Self {
        ProgramTypeChecker { files }
    }
}

impl TypeChecker for ProgramTypeChecker {
    fn has_source_file(&self, file: &SourceFile) -> bool {
        self.files
            .get(file.file_name())
            .is_some_and(|known| known.id() == file.id())
    }

    fn get_symbol_at_location(&self, file: &SourceFile, node: NodeId) -> Option<Symbol> {
        symbol_at_location(&self.files, file, node)
    }
}

/// Shared lookup used by every checker: `file` need not be in `files`, but the
/// modules it imports are looked up there.
pub fn symbol_at_location(files: &SourceFileMap, file: &SourceFile, node: NodeId) -> Option<Symbol> {
    let name_node = match file.kind(node) {
        SyntaxKind::TypeReference => file.child(node, Edge::TypeName)?,
        SyntaxKind::Identifier | SyntaxKind::QualifiedName => node,
        _ => return None,
    };
    let entity_name = file.get_text(name_node);
    let mut parts = entity_name.split('.').map(str::trim);
    let head = parts.next()?;
    match parts.next() {
        None => resolve_local(files, file, head, 0),
        Some(member) => {
            let binding = file.locals.as_ref()?.import(head)?;
            if binding.imported != ImportedName::Namespace {
                return None;
            }
            let target = lookup_module(files, &binding.module_specifier, file.file_name())?;
            resolve_export(files, &target, member, 0)
        }
    }
}

fn resolve_local(
    files: &SourceFileMap,
    file: &SourceFile,
    name: &str,
    depth: usize,
) -> Option<Symbol> {
    if depth > MAX_ALIAS_DEPTH {
        return None;
    }
    let table = file.locals.as_ref()?;
    if let Some(binding) = table.import(name) {
        let target = lookup_module(files, &binding.module_specifier, file.file_name())?;
        return match &binding.imported {
            ImportedName::Named(imported) => resolve_export(files, &target, imported, depth + 1),
            ImportedName::Default => resolve_export(files, &target, "default", depth + 1),
            ImportedName::Namespace => Some(Symbol {
                name: name.to_string(),
                flags: SymbolFlags::NAMESPACE,
                file_name: target.file_name().to_string(),
            }),
        };
    }
    table.symbol_flags(name).map(|flags| Symbol {
        name: name.to_string(),
        flags,
        file_name: file.file_name().to_string(),
    })
}

fn resolve_export(
    files: &SourceFileMap,
    file: &SourceFile,
    exported: &str,
    depth: usize,
) -> Option<Symbol> {
    if depth > MAX_ALIAS_DEPTH {
        return None;
    }
    let table = file.locals.as_ref()?;
    match table.export(exported) {
        Some(ExportBinding::Local(local)) => resolve_local(files, file, local, depth + 1),
        Some(ExportBinding::ReExport {
            module_specifier,
            name,
        }) => {
            let target = lookup_module(files, module_specifier, file.file_name())?;
            resolve_export(files, &target, name, depth + 1)
        }
        None => table.star_exports().iter().find_map(|module_specifier| {
            let target = lookup_module(files, module_specifier, file.file_name())?;
            resolve_export(files, &target, exported, depth + 1)
        }),
    }
}

fn lookup_module(
    files: &SourceFileMap,
    module_specifier: &str,
    containing_file: &str,
) -> Option<Rc<SourceFile>> {
    let resolved = resolve_module_name(module_specifier, containing_file, |candidate| {
        files.contains_key(candidate)
    })?;
    files.get(&resolved).cloned()
}
