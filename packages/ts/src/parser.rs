// Source File Parser
//
// Lowers the oxc AST into the owned tree of `node.rs`. Imports, classes and
// their members, decorators and parameter types are modelled in detail.
// Statement bodies and the expressions that can hold a statement body
// (functions, arrows, call arguments, initializers) are modelled far enough
// to reach every nested class declaration. Everything else becomes an opaque
// node that keeps its span and is printed verbatim.

use std::rc::Rc;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    self, BindingPatternKind, ClassElement, Declaration, ExportDefaultDeclarationKind, Expression,
    FormalParameters, ImportDeclarationSpecifier, MethodDefinitionKind, ModuleExportName,
    Statement, TSModuleDeclarationBody, TSType, TSTypeName,
};
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::{GetSpan, SourceType, Span};

use crate::binder::bind_program;
use crate::error::{HostError, HostResult};
use crate::node::{Edge, Node, NodeData, NodeId, SourceFile, SyntaxKind};
use crate::Diagnostic;

/// Parses `source_text` and returns the owned tree with its symbol table bound.
///
/// Any syntax error is fatal: a pass never sees a partially recovered tree.
pub fn create_source_file(file_name: &str, source_text: &str) -> HostResult<SourceFile> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(file_name).unwrap_or_else(|_| SourceType::ts());

    let ret = Parser::new(&allocator, source_text, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(HostError::Parse {
            file_name: file_name.to_string(),
            message,
        });
    }

    let semantic_ret = SemanticBuilder::new()
        .with_excess_capacity(0.0)
        .build(&ret.program);
    let diagnostics: Vec<Diagnostic> = semantic_ret
        .errors
        .iter()
        .map(|error| Diagnostic::error(Some(file_name), error.to_string()))
        .collect();
    let scoping = semantic_ret.semantic.into_scoping();

    let mut builder = TreeBuilder::new(source_text);
    let root = builder.build_program(&ret.program);

    let mut file = SourceFile::new(
        file_name,
        source_text,
        source_type.is_typescript_definition(),
        builder.nodes,
        root,
    );
    file.locals = Some(Rc::new(bind_program(&ret.program, &scoping)));
    file.diagnostics = diagnostics;

    tracing::trace!(file_name, nodes = file.node_count(), "parsed source file");
    Ok(file)
}

struct TreeBuilder<'s> {
    text: &'s str,
    nodes: Vec<Node>,
}

impl<'s> TreeBuilder<'s> {
    fn new(text: &'s str) -> Self {
        TreeBuilder {
            text,
            nodes: Vec::new(),
        }
    }

    // ========================================================================
    // Arena helpers
    // ========================================================================

    fn push(&mut self, kind: SyntaxKind, span: Span, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(kind, Some(span), data));
        id
    }

    fn leaf(&mut self, kind: SyntaxKind, span: Span) -> NodeId {
        self.push(kind, span, NodeData::None)
    }

    fn identifier(&mut self, span: Span, name: &str) -> NodeId {
        self.push(
            SyntaxKind::Identifier,
            span,
            NodeData::Identifier(name.to_string()),
        )
    }

    fn attach(&mut self, parent: NodeId, edge: Edge, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push((edge, child));
    }

    fn set_decorators(&mut self, owner: NodeId, decorators: Vec<NodeId>) {
        if decorators.is_empty() {
            return;
        }
        for decorator in &decorators {
            self.nodes[decorator.index()].parent = Some(owner);
        }
        self.nodes[owner.index()].decorators = Some(decorators);
    }

    fn slice(&self, span: Span) -> &'s str {
        self.text
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn build_program(&mut self, program: &ast::Program<'_>) -> NodeId {
        let root = self.leaf(SyntaxKind::SourceFile, Span::new(0, self.text.len() as u32));
        for statement in &program.body {
            let child = self.build_statement(statement);
            self.attach(root, Edge::Statement, child);
        }
        root
    }

    fn build_statement(&mut self, statement: &Statement<'_>) -> NodeId {
        match statement {
            Statement::ImportDeclaration(decl) => self.build_import(decl),
            Statement::ClassDeclaration(class) => self.build_class(class, class.span),
            Statement::FunctionDeclaration(func) => self.build_function(func, func.span),
            Statement::TSModuleDeclaration(module) => self.build_module(module, module.span),
            Statement::BlockStatement(block) => self.build_block(&block.body, block.span),
            Statement::ExportNamedDeclaration(decl) => match &decl.declaration {
                Some(Declaration::ClassDeclaration(class)) => self.build_class(class, decl.span),
                Some(Declaration::FunctionDeclaration(func)) => self.build_function(func, decl.span),
                Some(Declaration::TSModuleDeclaration(module)) => {
                    self.build_module(module, decl.span)
                }
                Some(Declaration::VariableDeclaration(var)) => self.build_variables(var, decl.span),
                Some(declaration) => self.leaf(declaration_kind(declaration), decl.span),
                None => self.leaf(SyntaxKind::ExportDeclaration, decl.span),
            },
            Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
                ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                    self.build_class(class, decl.span)
                }
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    self.build_function(func, decl.span)
                }
                _ => self.leaf(SyntaxKind::ExportDeclaration, decl.span),
            },
            Statement::ExportAllDeclaration(decl) => {
                self.leaf(SyntaxKind::ExportDeclaration, decl.span)
            }
            Statement::TSInterfaceDeclaration(decl) => {
                self.leaf(SyntaxKind::InterfaceDeclaration, decl.span)
            }
            Statement::TSTypeAliasDeclaration(decl) => {
                self.leaf(SyntaxKind::TypeAliasDeclaration, decl.span)
            }
            Statement::TSEnumDeclaration(decl) => self.leaf(SyntaxKind::EnumDeclaration, decl.span),
            Statement::VariableDeclaration(decl) => self.build_variables(decl, decl.span),
            Statement::ExpressionStatement(stmt) => {
                let id = self.leaf(SyntaxKind::ExpressionStatement, stmt.span);
                let expression = self.build_expression(&stmt.expression);
                self.attach(id, Edge::Expression, expression);
                id
            }
            Statement::ReturnStatement(stmt) => {
                let id = self.leaf(SyntaxKind::ReturnStatement, stmt.span);
                if let Some(argument) = &stmt.argument {
                    let expression = self.build_expression(argument);
                    self.attach(id, Edge::Expression, expression);
                }
                id
            }
            Statement::IfStatement(stmt) => {
                let id = self.leaf(SyntaxKind::IfStatement, stmt.span);
                let test = self.build_expression(&stmt.test);
                self.attach(id, Edge::Expression, test);
                self.attach_statement(id, &stmt.consequent);
                if let Some(alternate) = &stmt.alternate {
                    self.attach_statement(id, alternate);
                }
                id
            }
            Statement::ForStatement(stmt) => self.build_loop(stmt.span, &stmt.body),
            Statement::ForInStatement(stmt) => self.build_loop(stmt.span, &stmt.body),
            Statement::ForOfStatement(stmt) => self.build_loop(stmt.span, &stmt.body),
            Statement::WhileStatement(stmt) => self.build_loop(stmt.span, &stmt.body),
            Statement::DoWhileStatement(stmt) => self.build_loop(stmt.span, &stmt.body),
            Statement::TryStatement(stmt) => {
                let id = self.leaf(SyntaxKind::TryStatement, stmt.span);
                let block = self.build_block(&stmt.block.body, stmt.block.span);
                self.attach(id, Edge::Statement, block);
                if let Some(handler) = &stmt.handler {
                    let block = self.build_block(&handler.body.body, handler.body.span);
                    self.attach(id, Edge::Statement, block);
                }
                if let Some(finalizer) = &stmt.finalizer {
                    let block = self.build_block(&finalizer.body, finalizer.span);
                    self.attach(id, Edge::Statement, block);
                }
                id
            }
            Statement::SwitchStatement(stmt) => {
                let id = self.leaf(SyntaxKind::SwitchStatement, stmt.span);
                for case in &stmt.cases {
                    let clause = self.leaf(SyntaxKind::CaseClause, case.span);
                    for statement in &case.consequent {
                        self.attach_statement(clause, statement);
                    }
                    self.attach(id, Edge::Element, clause);
                }
                id
            }
            Statement::LabeledStatement(stmt) => {
                let id = self.leaf(SyntaxKind::LabeledStatement, stmt.span);
                self.attach_statement(id, &stmt.body);
                id
            }
            other => self.leaf(SyntaxKind::Statement, other.span()),
        }
    }

    fn attach_statement(&mut self, parent: NodeId, statement: &Statement<'_>) {
        let child = self.build_statement(statement);
        self.attach(parent, Edge::Statement, child);
    }

    fn build_loop(&mut self, span: Span, body: &Statement<'_>) -> NodeId {
        let id = self.leaf(SyntaxKind::IterationStatement, span);
        self.attach_statement(id, body);
        id
    }

    fn build_variables(&mut self, decl: &ast::VariableDeclaration<'_>, span: Span) -> NodeId {
        let id = self.leaf(SyntaxKind::VariableStatement, span);
        for declarator in &decl.declarations {
            let element = self.leaf(SyntaxKind::VariableDeclaration, declarator.span);
            let name = match &declarator.id.kind {
                BindingPatternKind::BindingIdentifier(ident) => {
                    self.identifier(identifier_span(ident), ident.name.as_str())
                }
                other => {
                    let annotation = declarator.id.type_annotation.as_ref().map(|a| a.span);
                    self.leaf(SyntaxKind::Expression, before_annotation(other.span(), annotation))
                }
            };
            self.attach(element, Edge::Name, name);
            if let Some(init) = &declarator.init {
                let initializer = self.build_expression(init);
                self.attach(element, Edge::Initializer, initializer);
            }
            self.attach(id, Edge::Element, element);
        }
        id
    }

    fn build_block(&mut self, statements: &[Statement<'_>], span: Span) -> NodeId {
        let block = self.leaf(SyntaxKind::Block, span);
        for statement in statements {
            let child = self.build_statement(statement);
            self.attach(block, Edge::Statement, child);
        }
        block
    }

    fn build_module(&mut self, module: &ast::TSModuleDeclaration<'_>, span: Span) -> NodeId {
        let id = self.leaf(SyntaxKind::ModuleDeclaration, span);
        if let Some(TSModuleDeclarationBody::TSModuleBlock(block)) = &module.body {
            let body = self.leaf(SyntaxKind::ModuleBlock, block.span);
            for statement in &block.body {
                let child = self.build_statement(statement);
                self.attach(body, Edge::Statement, child);
            }
            self.attach(id, Edge::Body, body);
        }
        id
    }

    fn build_function(&mut self, func: &ast::Function<'_>, span: Span) -> NodeId {
        let id = self.leaf(SyntaxKind::FunctionDeclaration, span);
        if let Some(ident) = &func.id {
            let name = self.identifier(ident.span, ident.name.as_str());
            self.attach(id, Edge::Name, name);
        }
        self.build_parameters(id, &func.params);
        if let Some(body) = &func.body {
            let block = self.build_block(&body.statements, body.span);
            self.attach(id, Edge::Body, block);
        }
        id
    }

    fn build_import(&mut self, decl: &ast::ImportDeclaration<'_>) -> NodeId {
        let id = self.leaf(SyntaxKind::ImportDeclaration, decl.span);

        if let Some(specifiers) = decl.specifiers.as_ref().filter(|s| !s.is_empty()) {
            let clause_span = union_spans(specifiers.iter().map(|s| s.span()));
            let clause = self.leaf(SyntaxKind::ImportClause, clause_span);

            let mut named = Vec::new();
            for specifier in specifiers {
                match specifier {
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(default) => {
                        let name = self.identifier(default.local.span, default.local.name.as_str());
                        self.attach(clause, Edge::Name, name);
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(namespace) => {
                        let ns = self.leaf(SyntaxKind::NamespaceImport, namespace.span);
                        let name =
                            self.identifier(namespace.local.span, namespace.local.name.as_str());
                        self.attach(ns, Edge::Name, name);
                        self.attach(clause, Edge::NamedBindings, ns);
                    }
                    ImportDeclarationSpecifier::ImportSpecifier(spec) => named.push(spec),
                }
            }

            if !named.is_empty() {
                let named_span = union_spans(named.iter().map(|spec| spec.span));
                let named_imports = self.leaf(SyntaxKind::NamedImports, named_span);
                for spec in named {
                    let element = self.leaf(SyntaxKind::ImportSpecifier, spec.span);
                    let imported_span = spec.imported.span();
                    if imported_span != spec.local.span {
                        let property =
                            self.identifier(imported_span, &module_export_name(&spec.imported));
                        self.attach(element, Edge::PropertyName, property);
                    }
                    let name = self.identifier(spec.local.span, spec.local.name.as_str());
                    self.attach(element, Edge::Name, name);
                    self.attach(named_imports, Edge::Element, element);
                }
                self.attach(clause, Edge::NamedBindings, named_imports);
            }

            self.attach(id, Edge::ImportClause, clause);
        }

        let specifier = self.push(
            SyntaxKind::StringLiteral,
            decl.source.span,
            NodeData::StringLiteral(decl.source.value.to_string()),
        );
        self.attach(id, Edge::ModuleSpecifier, specifier);
        id
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn build_class(&mut self, class: &ast::Class<'_>, span: Span) -> NodeId {
        let span = decorated_span(span, &class.decorators);
        let id = self.push(
            SyntaxKind::ClassDeclaration,
            span,
            NodeData::Class {
                body: class.body.span,
            },
        );
        let decorators = self.build_decorators(&class.decorators);
        self.set_decorators(id, decorators);

        if let Some(ident) = &class.id {
            let name = self.identifier(ident.span, ident.name.as_str());
            self.attach(id, Edge::Name, name);
        }

        if let Some(super_class) = &class.super_class {
            let heritage = self.leaf(SyntaxKind::HeritageClause, super_class.span());
            let expression = self.build_expression(super_class);
            self.attach(heritage, Edge::Expression, expression);
            self.attach(id, Edge::Heritage, heritage);
        }

        for element in &class.body.body {
            let member = self.build_class_element(element);
            self.attach(id, Edge::Member, member);
        }
        id
    }

    fn build_class_element(&mut self, element: &ClassElement<'_>) -> NodeId {
        match element {
            ClassElement::MethodDefinition(method) => {
                let kind = match method.kind {
                    MethodDefinitionKind::Constructor => SyntaxKind::Constructor,
                    MethodDefinitionKind::Method => SyntaxKind::MethodDeclaration,
                    MethodDefinitionKind::Get => SyntaxKind::GetAccessor,
                    MethodDefinitionKind::Set => SyntaxKind::SetAccessor,
                };
                let span = decorated_span(method.span, &method.decorators);
                let id = self.push(
                    kind,
                    span,
                    NodeData::Method {
                        is_static: method.r#static,
                    },
                );
                let decorators = self.build_decorators(&method.decorators);
                self.set_decorators(id, decorators);

                let key_span = method.key.span();
                let name = self.identifier(key_span, self.slice(key_span));
                self.attach(id, Edge::Name, name);

                self.build_parameters(id, &method.value.params);
                if let Some(body) = &method.value.body {
                    let block = self.build_block(&body.statements, body.span);
                    self.attach(id, Edge::Body, block);
                }
                id
            }
            ClassElement::PropertyDefinition(prop) => {
                let span = decorated_span(prop.span, &prop.decorators);
                let id = self.leaf(SyntaxKind::PropertyDeclaration, span);
                let decorators = self.build_decorators(&prop.decorators);
                self.set_decorators(id, decorators);

                let key_span = prop.key.span();
                let name = self.identifier(key_span, self.slice(key_span));
                self.attach(id, Edge::Name, name);

                if let Some(annotation) = &prop.type_annotation {
                    let ty = self.build_type(&annotation.type_annotation);
                    self.attach(id, Edge::Type, ty);
                }
                if let Some(value) = &prop.value {
                    let initializer = self.build_expression(value);
                    self.attach(id, Edge::Initializer, initializer);
                }
                id
            }
            other => self.leaf(SyntaxKind::ClassElement, other.span()),
        }
    }

    fn build_parameters(&mut self, owner: NodeId, params: &FormalParameters<'_>) {
        for param in &params.items {
            let span = decorated_span(param.span, &param.decorators);
            let id = self.leaf(SyntaxKind::Parameter, span);
            let decorators = self.build_decorators(&param.decorators);
            self.set_decorators(id, decorators);

            let (binding, initializer) = match &param.pattern.kind {
                BindingPatternKind::AssignmentPattern(assign) => (&assign.left, Some(&assign.right)),
                _ => (&param.pattern, None),
            };

            let annotation = param
                .pattern
                .type_annotation
                .as_ref()
                .or(binding.type_annotation.as_ref());

            let name = match &binding.kind {
                BindingPatternKind::BindingIdentifier(ident) => {
                    self.identifier(identifier_span(ident), ident.name.as_str())
                }
                other => {
                    let span = before_annotation(other.span(), annotation.map(|a| a.span));
                    self.leaf(SyntaxKind::Expression, span)
                }
            };
            self.attach(id, Edge::Name, name);

            if let Some(annotation) = annotation {
                let ty = self.build_type(&annotation.type_annotation);
                self.attach(id, Edge::Type, ty);
            }
            if let Some(init) = initializer {
                let init = self.build_expression(init);
                self.attach(id, Edge::Initializer, init);
            }
            self.attach(owner, Edge::Parameter, id);
        }

        if let Some(rest) = &params.rest {
            let id = self.leaf(SyntaxKind::Parameter, rest.span);
            let name_span = match &rest.argument.kind {
                BindingPatternKind::BindingIdentifier(ident) => identifier_span(ident),
                other => before_annotation(
                    other.span(),
                    rest.argument.type_annotation.as_ref().map(|a| a.span),
                ),
            };
            let name = self.identifier(name_span, self.slice(name_span).trim_end());
            self.attach(id, Edge::Name, name);
            if let Some(annotation) = &rest.argument.type_annotation {
                let ty = self.build_type(&annotation.type_annotation);
                self.attach(id, Edge::Type, ty);
            }
            self.attach(owner, Edge::Parameter, id);
        }
    }

    fn build_decorators(&mut self, decorators: &[ast::Decorator<'_>]) -> Vec<NodeId> {
        decorators
            .iter()
            .map(|decorator| {
                let id = self.leaf(SyntaxKind::Decorator, decorator.span);
                let expression = self.build_expression(&decorator.expression);
                self.attach(id, Edge::Expression, expression);
                id
            })
            .collect()
    }

    // ========================================================================
    // Expressions and types
    // ========================================================================

    fn build_expression(&mut self, expression: &Expression<'_>) -> NodeId {
        match expression {
            Expression::Identifier(ident) => self.identifier(ident.span, ident.name.as_str()),
            Expression::StringLiteral(lit) => self.push(
                SyntaxKind::StringLiteral,
                lit.span,
                NodeData::StringLiteral(lit.value.to_string()),
            ),
            Expression::CallExpression(call) => {
                let id = self.leaf(SyntaxKind::CallExpression, call.span);
                let callee = self.build_expression(&call.callee);
                self.attach(id, Edge::Callee, callee);
                for argument in &call.arguments {
                    let arg = match argument.as_expression() {
                        Some(expr) => self.build_expression(expr),
                        None => self.leaf(SyntaxKind::Expression, argument.span()),
                    };
                    self.attach(id, Edge::Argument, arg);
                }
                id
            }
            Expression::ArrowFunctionExpression(arrow) => {
                let id = self.leaf(SyntaxKind::ArrowFunction, arrow.span);
                let body = self.build_block(&arrow.body.statements, arrow.body.span);
                self.attach(id, Edge::Body, body);
                id
            }
            Expression::FunctionExpression(func) => {
                let id = self.leaf(SyntaxKind::FunctionExpression, func.span);
                if let Some(body) = &func.body {
                    let block = self.build_block(&body.statements, body.span);
                    self.attach(id, Edge::Body, block);
                }
                id
            }
            Expression::ParenthesizedExpression(paren) => {
                let id = self.leaf(SyntaxKind::ParenthesizedExpression, paren.span);
                let expression = self.build_expression(&paren.expression);
                self.attach(id, Edge::Expression, expression);
                id
            }
            Expression::AssignmentExpression(assign) => {
                let id = self.leaf(SyntaxKind::BinaryExpression, assign.span);
                let right = self.build_expression(&assign.right);
                self.attach(id, Edge::Right, right);
                id
            }
            Expression::StaticMemberExpression(member) => {
                let id = self.leaf(SyntaxKind::PropertyAccessExpression, member.span);
                let object = self.build_expression(&member.object);
                self.attach(id, Edge::Expression, object);
                let name = self.identifier(member.property.span, member.property.name.as_str());
                self.attach(id, Edge::Name, name);
                id
            }
            other => self.leaf(SyntaxKind::Expression, other.span()),
        }
    }

    fn build_type(&mut self, ty: &TSType<'_>) -> NodeId {
        match ty {
            TSType::TSAnyKeyword(keyword) => self.leaf(SyntaxKind::AnyKeyword, keyword.span),
            TSType::TSTypeLiteral(literal) => self.leaf(SyntaxKind::TypeLiteral, literal.span),
            TSType::TSUnionType(union) => self.leaf(SyntaxKind::UnionType, union.span),
            TSType::TSTypeReference(reference) => {
                let id = self.leaf(SyntaxKind::TypeReference, reference.span);
                let name = match &reference.type_name {
                    TSTypeName::IdentifierReference(ident) => {
                        self.identifier(ident.span, ident.name.as_str())
                    }
                    other => self.leaf(SyntaxKind::QualifiedName, other.span()),
                };
                self.attach(id, Edge::TypeName, name);
                id
            }
            other => self.leaf(SyntaxKind::TypeNode, other.span()),
        }
    }
}

fn declaration_kind(declaration: &Declaration<'_>) -> SyntaxKind {
    match declaration {
        Declaration::TSInterfaceDeclaration(_) => SyntaxKind::InterfaceDeclaration,
        Declaration::TSTypeAliasDeclaration(_) => SyntaxKind::TypeAliasDeclaration,
        Declaration::TSEnumDeclaration(_) => SyntaxKind::EnumDeclaration,
        _ => SyntaxKind::Statement,
    }
}

pub(crate) fn module_export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

/// The binding span of a typed parameter runs through its annotation; the
/// name node covers the identifier alone.
fn identifier_span(ident: &ast::BindingIdentifier<'_>) -> Span {
    Span::new(ident.span.start, ident.span.start + ident.name.len() as u32)
}

fn before_annotation(span: Span, annotation: Option<Span>) -> Span {
    match annotation {
        Some(annotation) if annotation.start > span.start && annotation.start < span.end => {
            Span::new(span.start, annotation.start)
        }
        _ => span,
    }
}

/// Declarations start at their first decorator, wherever oxc puts the node span.
fn decorated_span(span: Span, decorators: &[ast::Decorator<'_>]) -> Span {
    decorators.iter().fold(span, |acc, decorator| {
        Span::new(
            acc.start.min(decorator.span.start),
            acc.end.max(decorator.span.end),
        )
    })
}

fn union_spans(spans: impl Iterator<Item = Span>) -> Span {
    spans
        .reduce(|acc, span| Span::new(acc.start.min(span.start), acc.end.max(span.end)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decorated_class() {
        let source = "@Component({selector: 'app'})\nexport class AppComponent {\n  constructor(@Inject(TOKEN) public x: Bar) {}\n}\n";
        let file = create_source_file("app.component.ts", source).unwrap();

        let class = file.child(file.root(), Edge::Statement).unwrap();
        assert_eq!(file.kind(class), SyntaxKind::ClassDeclaration);
        assert_eq!(file.name_text(class), Some("AppComponent"));
        assert!(file.get_text(class).starts_with("@Component"));
        assert_eq!(file.decorators(class).map(|d| d.len()), Some(1));

        let ctor = file.child(class, Edge::Member).unwrap();
        assert_eq!(file.kind(ctor), SyntaxKind::Constructor);
        let param = file.child(ctor, Edge::Parameter).unwrap();
        assert_eq!(file.name_text(param), Some("x"));
        let name = file.child(param, Edge::Name).unwrap();
        assert_eq!(file.get_text(name), "x");
        let ty = file.child(param, Edge::Type).unwrap();
        assert_eq!(file.kind(ty), SyntaxKind::TypeReference);
        assert_eq!(file.get_text(ty), "Bar");
        assert_eq!(file.decorators(param).map(|d| d.len()), Some(1));
    }

    #[test]
    fn test_parameter_names_stop_before_annotation() {
        let source = "function f(a: A, { b }: B, c: C = c0, ...rest: R[]) {}\n";
        let file = create_source_file("f.ts", source).unwrap();
        let func = file.child(file.root(), Edge::Statement).unwrap();
        let names: Vec<_> = file
            .children_of(func, Edge::Parameter)
            .map(|p| file.get_text(file.child(p, Edge::Name).unwrap()))
            .collect();
        assert_eq!(names, vec!["a", "{ b }", "c", "rest"]);
    }

    fn class_names(file: &SourceFile, id: NodeId, out: &mut Vec<String>) {
        if file.kind(id) == SyntaxKind::ClassDeclaration {
            out.extend(file.name_text(id).map(str::to_string));
        }
        for child in file.children(id) {
            class_names(file, child, out);
        }
    }

    #[test]
    fn test_nested_statement_bodies_reach_classes() {
        let source = "if (a) {\n  class A {}\n} else {\n  const f = () => { class B {} };\n}\n\
                      try { class C {} } catch (e) { class D {} } finally { class E {} }\n\
                      switch (k) { case 1: class F {} }\n\
                      for (;;) { class G {} }\n\
                      call(function () { class H {} });\n\
                      x = (() => { class I {} });\n\
                      outer: while (true) { class J {} }\n";
        let file = create_source_file("nested.ts", source).unwrap();

        let mut names = Vec::new();
        class_names(&file, file.root(), &mut names);
        assert_eq!(names, vec!["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]);

        let statements: Vec<_> = file.children_of(file.root(), Edge::Statement).collect();
        assert_eq!(file.kind(statements[0]), SyntaxKind::IfStatement);
        assert_eq!(file.kind(statements[1]), SyntaxKind::TryStatement);
        assert_eq!(file.kind(statements[2]), SyntaxKind::SwitchStatement);
        assert_eq!(file.kind(statements[3]), SyntaxKind::IterationStatement);
        assert_eq!(file.kind(statements[6]), SyntaxKind::LabeledStatement);
    }

    #[test]
    fn test_variable_declarations() {
        let file = create_source_file("v.ts", "export const a: A = make(), b = () => 1;\n").unwrap();
        let statement = file.child(file.root(), Edge::Statement).unwrap();
        assert_eq!(file.kind(statement), SyntaxKind::VariableStatement);

        let declarations: Vec<_> = file.children_of(statement, Edge::Element).collect();
        assert_eq!(declarations.len(), 2);
        assert_eq!(file.get_text(file.child(declarations[0], Edge::Name).unwrap()), "a");
        let init = file.child(declarations[0], Edge::Initializer).unwrap();
        assert_eq!(file.kind(init), SyntaxKind::CallExpression);
        let arrow = file.child(declarations[1], Edge::Initializer).unwrap();
        assert_eq!(file.kind(arrow), SyntaxKind::ArrowFunction);
        assert_eq!(file.get_text(arrow), "() => 1");
    }

    #[test]
    fn test_parse_imports() {
        let source = "import { Component as Cmp, Inject } from '@angular/core';\nimport * as ng from '@angular/core';\nimport def from './def';\n";
        let file = create_source_file("imports.ts", source).unwrap();
        let statements: Vec<_> = file.children_of(file.root(), Edge::Statement).collect();
        assert_eq!(statements.len(), 3);

        let clause = file.child(statements[0], Edge::ImportClause).unwrap();
        let named = file.child(clause, Edge::NamedBindings).unwrap();
        assert_eq!(file.kind(named), SyntaxKind::NamedImports);
        let elements: Vec<_> = file.children_of(named, Edge::Element).collect();
        assert_eq!(elements.len(), 2);
        let property = file.child(elements[0], Edge::PropertyName).unwrap();
        assert_eq!(file.get_text(property), "Component");
        assert_eq!(file.name_text(elements[0]), Some("Cmp"));
        assert!(file.child(elements[1], Edge::PropertyName).is_none());

        let ns_clause = file.child(statements[1], Edge::ImportClause).unwrap();
        let ns = file.child(ns_clause, Edge::NamedBindings).unwrap();
        assert_eq!(file.kind(ns), SyntaxKind::NamespaceImport);
        assert_eq!(file.name_text(ns), Some("ng"));

        let default_clause = file.child(statements[2], Edge::ImportClause).unwrap();
        assert_eq!(file.name_text(default_clause), Some("def"));
    }

    #[test]
    fn test_declaration_file_flag() {
        let file = create_source_file("lib.d.ts", "export declare class A {}\n").unwrap();
        assert!(file.is_declaration_file());
        let file = create_source_file("lib.ts", "export class A {}\n").unwrap();
        assert!(!file.is_declaration_file());
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let err = create_source_file("broken.ts", "class {").unwrap_err();
        assert!(matches!(err, HostError::Parse { .. }));
    }

    #[test]
    fn test_identical_text_has_identical_hash() {
        let a = create_source_file("a.ts", "export class A {}\n").unwrap();
        let b = create_source_file("b.ts", "export class A {}\n").unwrap();
        assert_eq!(a.text_hash(), b.text_hash());
        assert_ne!(a.id(), b.id());
    }
}
