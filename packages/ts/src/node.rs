//! Owned syntax tree.
//!
//! Nodes live in a per-file arena and are addressed by [`NodeId`]. The shape
//! of a parsed node never changes: an update allocates a new node whose
//! `original` points back at the node it replaces, so every id handed out by
//! the parser stays valid (and keeps its span) for the lifetime of the file.
//! Only `parent` links follow the latest update.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use oxc_span::Span;
use xxhash_rust::xxh3::xxh3_64;

use crate::binder::SymbolTable;
use crate::transform::EmitHelper;
use crate::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of one parse. Clones of a [`SourceFile`] share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceFileId(u64);

static NEXT_SOURCE_FILE_ID: AtomicU64 = AtomicU64::new(1);

impl SourceFileId {
    fn fresh() -> Self {
        SourceFileId(NEXT_SOURCE_FILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,

    // Statements
    ImportDeclaration,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ExportDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    FunctionDeclaration,
    ModuleDeclaration,
    ModuleBlock,
    VariableStatement,
    VariableDeclaration,
    ExpressionStatement,
    ReturnStatement,
    IfStatement,
    IterationStatement,
    TryStatement,
    SwitchStatement,
    CaseClause,
    LabeledStatement,
    Block,
    Statement,

    // Class members
    HeritageClause,
    Constructor,
    MethodDeclaration,
    GetAccessor,
    SetAccessor,
    PropertyDeclaration,
    ClassElement,
    Parameter,
    Decorator,

    // Expressions
    Identifier,
    StringLiteral,
    CallExpression,
    PropertyAccessExpression,
    ParenthesizedExpression,
    AsExpression,
    BinaryExpression,
    FunctionExpression,
    ArrowFunction,
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAssignment,
    Expression,

    // Types
    TypeReference,
    QualifiedName,
    AnyKeyword,
    TypeLiteral,
    UnionType,
    TypeNode,
}

impl SyntaxKind {
    pub fn is_class_member(self) -> bool {
        matches!(
            self,
            SyntaxKind::Constructor
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::ClassElement
        )
    }
}

/// Label of a child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Statement,
    ImportClause,
    ModuleSpecifier,
    NamedBindings,
    Element,
    Name,
    PropertyName,
    Heritage,
    Member,
    Parameter,
    Type,
    TypeName,
    Initializer,
    Body,
    Expression,
    Callee,
    Argument,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    None,
    Identifier(String),
    StringLiteral(String),
    /// Span of the `{ ... }` class body, used to place appended members.
    Class { body: Span },
    Method { is_static: bool },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: SyntaxKind,
    /// Absent for synthesized nodes.
    pub span: Option<Span>,
    pub parent: Option<NodeId>,
    pub decorators: Option<Vec<NodeId>>,
    pub children: Vec<(Edge, NodeId)>,
    pub data: NodeData,
    pub original: Option<NodeId>,
}

impl Node {
    pub fn new(kind: SyntaxKind, span: Option<Span>, data: NodeData) -> Self {
        Node {
            kind,
            span,
            parent: None,
            decorators: None,
            children: Vec::new(),
            data,
            original: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    file_name: String,
    text: Rc<str>,
    is_declaration_file: bool,
    id: SourceFileId,
    text_hash: u64,
    nodes: Vec<Node>,
    parsed_node_count: usize,
    root: NodeId,
    /// Module-level symbols, imports and exports.
    pub locals: Option<Rc<SymbolTable>>,
    pub diagnostics: Vec<Diagnostic>,
    emit_helpers: Vec<EmitHelper>,
}

impl SourceFile {
    pub(crate) fn new(
        file_name: &str,
        text: &str,
        is_declaration_file: bool,
        nodes: Vec<Node>,
        root: NodeId,
    ) -> Self {
        SourceFile {
            file_name: file_name.to_string(),
            text: Rc::from(text),
            is_declaration_file,
            id: SourceFileId::fresh(),
            text_hash: xxh3_64(text.as_bytes()),
            parsed_node_count: nodes.len(),
            nodes,
            root,
            locals: None,
            diagnostics: Vec::new(),
            emit_helpers: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_declaration_file(&self) -> bool {
        self.is_declaration_file
    }

    pub fn id(&self) -> SourceFileId {
        self.id
    }

    pub fn text_hash(&self) -> u64 {
        self.text_hash
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn parsed_node_count(&self) -> usize {
        self.parsed_node_count
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns `None` for ids that do not belong to this arena.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn decorators(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).decorators.as_deref()
    }

    pub fn edges(&self, id: NodeId) -> &[(Edge, NodeId)] {
        &self.node(id).children
    }

    pub fn child(&self, id: NodeId, edge: Edge) -> Option<NodeId> {
        self.edges(id).iter().find(|(e, _)| *e == edge).map(|(_, child)| *child)
    }

    pub fn children_of(&self, id: NodeId, edge: Edge) -> impl Iterator<Item = NodeId> + '_ {
        self.edges(id)
            .iter()
            .filter(move |(e, _)| *e == edge)
            .map(|(_, child)| *child)
    }

    /// Decorators first, then every labelled child, in list order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        node.decorators
            .iter()
            .flatten()
            .copied()
            .chain(node.children.iter().map(|(_, child)| *child))
            .collect()
    }

    pub fn is_parsed(&self, id: NodeId) -> bool {
        id.index() < self.parsed_node_count
    }

    pub fn is_synthesized(&self, id: NodeId) -> bool {
        self.node(id).span.is_none()
    }

    /// Follows `original` links back to the parsed node this one was derived from.
    pub fn original_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(original) = self.node(current).original {
            current = original;
        }
        current
    }

    /// Source text of a parsed node, or the text of a synthesized identifier
    /// or string literal.
    pub fn get_text(&self, id: NodeId) -> &str {
        let node = self.node(id);
        match (&node.span, &node.data) {
            (Some(span), _) => self.slice(*span),
            (None, NodeData::Identifier(text)) | (None, NodeData::StringLiteral(text)) => text,
            _ => "",
        }
    }

    pub fn slice(&self, span: Span) -> &str {
        self.text
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    pub fn name_text(&self, id: NodeId) -> Option<&str> {
        self.child(id, Edge::Name).map(|name| self.get_text(name))
    }

    pub fn emit_helpers(&self) -> &[EmitHelper] {
        &self.emit_helpers
    }

    pub fn add_emit_helpers(&mut self, helpers: impl IntoIterator<Item = EmitHelper>) {
        for helper in helpers {
            if !self.emit_helpers.iter().any(|h| h.name == helper.name) {
                self.emit_helpers.push(helper);
            }
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let children: Vec<NodeId> = node
            .decorators
            .iter()
            .flatten()
            .copied()
            .chain(node.children.iter().map(|(_, child)| *child))
            .collect();
        self.nodes.push(node);
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }
}
