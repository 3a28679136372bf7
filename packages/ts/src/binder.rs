// Module Symbol Table
//
// Per-file table of top-level symbols, import bindings and exports. Built
// once at parse time from `oxc_semantic`'s scoping; transformed files carry
// the table of the file they were derived from.

use indexmap::IndexMap;
use oxc_ast::ast::{
    self, BindingPatternKind, Declaration, ExportDefaultDeclarationKind,
    ImportDeclarationSpecifier, Statement,
};
use oxc_semantic::Scoping;
use oxc_syntax::symbol::SymbolFlags as OxcSymbolFlags;

use crate::parser::module_export_name;
use crate::type_checker::SymbolFlags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Named(String),
    Default,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub module_specifier: String,
    pub imported: ImportedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBinding {
    /// Exported under a (possibly different) name from a local declaration.
    Local(String),
    ReExport {
        module_specifier: String,
        name: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, SymbolFlags>,
    imports: IndexMap<String, ImportBinding>,
    exports: IndexMap<String, ExportBinding>,
    star_exports: Vec<String>,
}

impl SymbolTable {
    pub fn symbol_flags(&self, name: &str) -> Option<SymbolFlags> {
        self.symbols.get(name).copied()
    }

    pub fn import(&self, local_name: &str) -> Option<&ImportBinding> {
        self.imports.get(local_name)
    }

    pub fn export(&self, exported_name: &str) -> Option<&ExportBinding> {
        self.exports.get(exported_name)
    }

    pub fn star_exports(&self) -> &[String] {
        &self.star_exports
    }

    pub fn imports(&self) -> impl Iterator<Item = (&str, &ImportBinding)> {
        self.imports.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    /// Every module this file refers to, in first-seen order.
    pub fn module_specifiers(&self) -> Vec<&str> {
        let mut specifiers: Vec<&str> = Vec::new();
        let referenced = self
            .imports
            .values()
            .map(|binding| binding.module_specifier.as_str())
            .chain(self.exports.values().filter_map(|binding| match binding {
                ExportBinding::ReExport {
                    module_specifier, ..
                } => Some(module_specifier.as_str()),
                ExportBinding::Local(_) => None,
            }))
            .chain(self.star_exports.iter().map(String::as_str));
        for specifier in referenced {
            if !specifiers.contains(&specifier) {
                specifiers.push(specifier);
            }
        }
        specifiers
    }
}

pub(crate) fn bind_program(program: &ast::Program<'_>, scoping: &Scoping) -> SymbolTable {
    let mut table = SymbolTable::default();

    let root_scope = scoping.root_scope_id();
    for symbol_id in scoping.symbol_ids() {
        if scoping.symbol_scope_id(symbol_id) != root_scope {
            continue;
        }
        let flags = convert_flags(scoping.symbol_flags(symbol_id));
        let entry = table
            .symbols
            .entry(scoping.symbol_name(symbol_id).to_string())
            .or_insert_with(SymbolFlags::empty);
        *entry |= flags;
    }

    for statement in &program.body {
        match statement {
            Statement::ImportDeclaration(decl) => bind_import(&mut table, decl),
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    for name in declared_names(declaration) {
                        table.exports.insert(name.clone(), ExportBinding::Local(name));
                    }
                }
                for specifier in &decl.specifiers {
                    let local = module_export_name(&specifier.local);
                    let exported = module_export_name(&specifier.exported);
                    let binding = match &decl.source {
                        Some(source) => ExportBinding::ReExport {
                            module_specifier: source.value.to_string(),
                            name: local,
                        },
                        None => ExportBinding::Local(local),
                    };
                    table.exports.insert(exported, binding);
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                let local = match &decl.declaration {
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        class.id.as_ref().map(|id| id.name.to_string())
                    }
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                        func.id.as_ref().map(|id| id.name.to_string())
                    }
                    ExportDefaultDeclarationKind::Identifier(ident) => Some(ident.name.to_string()),
                    _ => None,
                };
                if let Some(local) = local {
                    table
                        .exports
                        .insert("default".to_string(), ExportBinding::Local(local));
                }
            }
            Statement::ExportAllDeclaration(decl) => match &decl.exported {
                Some(exported) => {
                    table.exports.insert(
                        module_export_name(exported),
                        ExportBinding::ReExport {
                            module_specifier: decl.source.value.to_string(),
                            name: "*".to_string(),
                        },
                    );
                }
                None => table.star_exports.push(decl.source.value.to_string()),
            },
            _ => {}
        }
    }

    table
}

fn bind_import(table: &mut SymbolTable, decl: &ast::ImportDeclaration<'_>) {
    let module_specifier = decl.source.value.to_string();
    for specifier in decl.specifiers.iter().flatten() {
        let (local, imported) = match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(spec) => (
                spec.local.name.to_string(),
                ImportedName::Named(module_export_name(&spec.imported)),
            ),
            ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                (spec.local.name.to_string(), ImportedName::Default)
            }
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                (spec.local.name.to_string(), ImportedName::Namespace)
            }
        };
        table.imports.insert(
            local,
            ImportBinding {
                module_specifier: module_specifier.clone(),
                imported,
            },
        );
    }
}

fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
    match declaration {
        Declaration::ClassDeclaration(class) => {
            class.id.iter().map(|id| id.name.to_string()).collect()
        }
        Declaration::FunctionDeclaration(func) => {
            func.id.iter().map(|id| id.name.to_string()).collect()
        }
        Declaration::TSInterfaceDeclaration(decl) => vec![decl.id.name.to_string()],
        Declaration::TSTypeAliasDeclaration(decl) => vec![decl.id.name.to_string()],
        Declaration::TSEnumDeclaration(decl) => vec![decl.id.name.to_string()],
        Declaration::VariableDeclaration(decl) => decl
            .declarations
            .iter()
            .filter_map(|declarator| match &declarator.id.kind {
                BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn convert_flags(flags: OxcSymbolFlags) -> SymbolFlags {
    let mut out = SymbolFlags::empty();
    if flags.intersects(OxcSymbolFlags::Class) {
        out |= SymbolFlags::CLASS;
    }
    if flags.intersects(OxcSymbolFlags::Interface) {
        out |= SymbolFlags::INTERFACE;
    }
    if flags.intersects(OxcSymbolFlags::TypeAlias) {
        out |= SymbolFlags::TYPE_ALIAS;
    }
    if flags.intersects(OxcSymbolFlags::RegularEnum | OxcSymbolFlags::ConstEnum) {
        out |= SymbolFlags::ENUM;
    }
    if flags.intersects(OxcSymbolFlags::Function) {
        out |= SymbolFlags::FUNCTION;
    }
    if flags.intersects(OxcSymbolFlags::FunctionScopedVariable | OxcSymbolFlags::BlockScopedVariable)
    {
        out |= SymbolFlags::VARIABLE;
    }
    if flags.intersects(OxcSymbolFlags::Import | OxcSymbolFlags::TypeImport) {
        out |= SymbolFlags::ALIAS;
    }
    if flags.intersects(OxcSymbolFlags::NamespaceModule | OxcSymbolFlags::ValueModule) {
        out |= SymbolFlags::NAMESPACE;
    }
    out
}
