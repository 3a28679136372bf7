// AOT Transform Walker
//
// Removes framework decorators from classes and their members and records
// what the runtime still needs to know about constructor parameters in a
// synthesized `ctorParameters` literal.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::smallvec;
use ts::{Edge, NodeId, SourceFile, SyntaxKind, TransformationContext, TypeChecker};

use super::base_transform_walker::{
    filter_nodes, find_first_ast_node, walk_children, walk_source_file, TransformWalker, Visited,
};
use super::ctor_parameters::{
    create_ctor_parameters_assignment, create_ctor_parameters_literal,
    create_ctor_parameters_method, DecoratorMetadata, ParameterDecorationInfo, TypeTag,
};
use super::walker_context::{AotWalkerContext, ScopeKind};
use crate::error::TransformResult;
use crate::semantic::SemanticResolver;
use crate::utils::angular_imports_from_node;

pub const DEFAULT_FRAMEWORK_MODULE_PREFIX: &str = "@angular/";
pub const DEFAULT_GENERATED_FILE_PATTERN: &str = r"ngfactory\.ts$";

static GENERATED_FILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(DEFAULT_GENERATED_FILE_PATTERN).unwrap());

#[derive(Debug, Clone)]
pub struct AotWalkerOptions {
    /// Imports from modules starting with this prefix bind recognized decorators.
    pub framework_module_prefix: String,
    /// Files whose name matches are returned untouched.
    pub generated_file_pattern: Regex,
}

impl Default for AotWalkerOptions {
    fn default() -> Self {
        AotWalkerOptions {
            framework_module_prefix: DEFAULT_FRAMEWORK_MODULE_PREFIX.to_string(),
            generated_file_pattern: GENERATED_FILE_REGEX.clone(),
        }
    }
}

pub struct AotTransformWalker<'a> {
    source_file: &'a mut SourceFile,
    context: &'a mut TransformationContext,
    resolver: &'a mut dyn SemanticResolver,
    walker_context: AotWalkerContext,
    angular_imports: Vec<String>,
    options: AotWalkerOptions,
}

impl<'a> AotTransformWalker<'a> {
    pub fn new(
        source_file: &'a mut SourceFile,
        context: &'a mut TransformationContext,
        resolver: &'a mut dyn SemanticResolver,
    ) -> Self {
        Self::with_options(source_file, context, resolver, AotWalkerOptions::default())
    }

    pub fn with_options(
        source_file: &'a mut SourceFile,
        context: &'a mut TransformationContext,
        resolver: &'a mut dyn SemanticResolver,
        options: AotWalkerOptions,
    ) -> Self {
        let root = source_file.root();
        let angular_imports = source_file
            .children_of(root, Edge::Statement)
            .filter(|statement| source_file.kind(*statement) == SyntaxKind::ImportDeclaration)
            .flat_map(|import| {
                angular_imports_from_node(source_file, import, &options.framework_module_prefix)
            })
            .collect();

        AotTransformWalker {
            source_file,
            context,
            resolver,
            walker_context: AotWalkerContext::new(),
            angular_imports,
            options,
        }
    }

    /// Names bound to the framework module: imported names, plus `alias.`
    /// for namespace imports.
    pub fn angular_imports(&self) -> &[String] {
        &self.angular_imports
    }

    /// A decorator is recognized when it is a call whose callee is a bound
    /// name, or a member of a bound namespace.
    pub fn is_angular_decorator(&self, decorator: NodeId) -> bool {
        let Some(callee) = self.decorator_callee(decorator) else {
            return false;
        };
        let callee = self.source_file.get_text(callee);
        if self.angular_imports.iter().any(|name| name == callee) {
            return true;
        }
        match callee.find('.') {
            Some(dot) => {
                let namespace = &callee[..=dot];
                self.angular_imports.iter().any(|name| name == namespace)
            }
            None => false,
        }
    }

    fn decorator_callee(&self, decorator: NodeId) -> Option<NodeId> {
        let call = find_first_ast_node(self.source_file, Some(decorator), SyntaxKind::CallExpression)?;
        self.source_file.child(call, Edge::Callee)
    }

    fn has_angular_decorator(&self, node: NodeId) -> bool {
        self.source_file
            .decorators(node)
            .is_some_and(|decorators| decorators.iter().any(|d| self.is_angular_decorator(*d)))
    }

    // ========================================================================
    // Constructor parameters
    // ========================================================================

    fn constructor_parameters(&self, class: NodeId) -> Vec<NodeId> {
        let file = &*self.source_file;
        let mut constructors = file
            .children_of(class, Edge::Member)
            .filter(|member| file.kind(*member) == SyntaxKind::Constructor);
        let first = constructors.next();
        let constructor = first
            .into_iter()
            .chain(constructors)
            .find(|ctor| file.child(*ctor, Edge::Body).is_some())
            .or(first);

        constructor
            .map(|ctor| file.children_of(ctor, Edge::Parameter).collect())
            .unwrap_or_default()
    }

    fn parameter_info(&mut self, parameter: NodeId) -> TransformResult<ParameterDecorationInfo> {
        let type_tag = self.classify_parameter_type(parameter)?;
        let decorators = self
            .source_file
            .decorators(parameter)
            .unwrap_or_default()
            .iter()
            .filter(|d| self.is_angular_decorator(**d))
            .filter_map(|d| self.decorator_metadata(*d))
            .collect();
        Ok(ParameterDecorationInfo {
            type_tag,
            decorators,
        })
    }

    fn classify_parameter_type(&mut self, parameter: NodeId) -> TransformResult<TypeTag> {
        let Some(type_node) = self.source_file.child(parameter, Edge::Type) else {
            return Ok(TypeTag::Undefined);
        };
        match self.source_file.kind(type_node) {
            SyntaxKind::AnyKeyword => Ok(TypeTag::Undefined),
            SyntaxKind::TypeReference => {
                let name = self
                    .source_file
                    .child(type_node, Edge::TypeName)
                    .map(|name| self.source_file.get_text(name).to_string())
                    .unwrap_or_default();
                let primary: Option<&dyn TypeChecker> =
                    self.context.type_checker().map(|checker| &**checker);
                let symbol = self
                    .resolver
                    .resolve_type_reference(self.source_file, type_node, primary)?;
                match symbol {
                    Some(symbol) if symbol.is_structural() => {
                        tracing::trace!(type_name = %name, declared_in = %symbol.file_name, "type erases to Object");
                        Ok(TypeTag::Object)
                    }
                    _ => Ok(TypeTag::Named(name)),
                }
            }
            _ => Ok(TypeTag::Null),
        }
    }

    fn decorator_metadata(&self, decorator: NodeId) -> Option<DecoratorMetadata> {
        let file = &*self.source_file;
        let call = find_first_ast_node(file, Some(decorator), SyntaxKind::CallExpression)?;
        let callee = file.child(call, Edge::Callee)?;
        let args: Vec<String> = file
            .children_of(call, Edge::Argument)
            .map(|arg| file.get_text(arg).to_string())
            .collect();
        Some(DecoratorMetadata {
            type_name: file.get_text(callee).to_string(),
            args: (!args.is_empty()).then_some(args),
        })
    }

    // ========================================================================
    // Member decorators
    // ========================================================================

    /// Drops the whole decorator list of the active declaration when nothing
    /// but framework decorators is on it. Mixed lists are filtered decorator
    /// by decorator in `visit_decorator`.
    fn visit_decorated_member(&mut self, scope: ScopeKind, node: NodeId) -> TransformResult<Visited> {
        let mut current = node;
        if self.walker_context.is_active(scope, node) {
            let remaining = filter_nodes(self.source_file.decorators(node), |d| {
                !self.is_angular_decorator(d)
            });
            if remaining.unwrap_or_default().is_empty() {
                tracing::trace!(file = self.source_file.file_name(), ?scope, "dropping decorator list");
                current = self.source_file.update_decorators(node, None);
            }
        }
        walk_children(self, current).map(Visited::Node)
    }
}

impl TransformWalker for AotTransformWalker<'_> {
    fn source_file(&self) -> &SourceFile {
        self.source_file
    }

    fn source_file_mut(&mut self) -> &mut SourceFile {
        self.source_file
    }

    fn context_mut(&mut self) -> &mut TransformationContext {
        self.context
    }

    fn on_before_visit_node(&mut self, node: NodeId) {
        match ScopeKind::of(self.source_file.kind(node)) {
            Some(ScopeKind::Class) => self.walker_context.open(ScopeKind::Class, node),
            Some(scope)
                if self.walker_context.in_class()
                    && self.source_file.decorators(node).is_some_and(|d| !d.is_empty()) =>
            {
                self.walker_context.open(scope, node)
            }
            _ => {}
        }
    }

    fn on_after_visit_node(&mut self, node: NodeId) {
        if let Some(scope) = ScopeKind::of(self.source_file.kind(node)) {
            self.walker_context.close(scope, node);
        }
    }

    fn visit_class_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        if !self.has_angular_decorator(node) {
            return walk_children(self, node).map(Visited::Node);
        }

        let parameters = self.constructor_parameters(node);
        let infos = parameters
            .into_iter()
            .map(|parameter| self.parameter_info(parameter))
            .collect::<TransformResult<Vec<_>>>()?;

        let class = walk_children(self, node)?;
        if infos.is_empty() {
            return Ok(Visited::Node(class));
        }

        let class_name = self.source_file.name_text(node).map(str::to_string);
        let extends = self.source_file.child(node, Edge::Heritage).is_some();
        let metadata = create_ctor_parameters_literal(self.source_file, &infos);

        match class_name {
            Some(name) if extends => {
                tracing::debug!(class = %name, parameters = infos.len(), placement = "assignment", "lowered class");
                let statement = create_ctor_parameters_assignment(self.source_file, &name, metadata);
                Ok(Visited::Many(smallvec![class, statement]))
            }
            name => {
                tracing::debug!(
                    class = name.as_deref().unwrap_or("<anonymous>"),
                    parameters = infos.len(),
                    placement = "static member",
                    "lowered class"
                );
                let method = create_ctor_parameters_method(self.source_file, metadata);
                let decorators = self.source_file.node(class).decorators.clone();
                let mut children = self.source_file.edges(class).to_vec();
                children.push((Edge::Member, method));
                Ok(Visited::Node(self.source_file.update_node(class, decorators, children)))
            }
        }
    }

    fn visit_parameter_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        self.visit_decorated_member(ScopeKind::Parameter, node)
    }

    fn visit_property_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        self.visit_decorated_member(ScopeKind::Property, node)
    }

    fn visit_method_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        self.visit_decorated_member(ScopeKind::Method, node)
    }

    fn visit_decorator(&mut self, node: NodeId) -> TransformResult<Visited> {
        if self.walker_context.in_class() && self.is_angular_decorator(node) {
            tracing::trace!(decorator = self.source_file.get_text(node), "stripping decorator");
            return Ok(Visited::Removed);
        }
        Ok(Visited::Node(node))
    }

    fn walk(&mut self) -> TransformResult<NodeId> {
        if self.options.generated_file_pattern.is_match(self.source_file.file_name()) {
            tracing::debug!(file = self.source_file.file_name(), "skipping generated file");
            return Ok(self.source_file.root());
        }
        walk_source_file(self)
    }
}
