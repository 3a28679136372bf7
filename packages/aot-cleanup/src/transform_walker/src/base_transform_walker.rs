// Base Transform Walker
//
// Depth-first rewrite of a `ts::SourceFile`. Every node goes through
// `visit_node`, which brackets the kind-specific visit with the
// `on_before_visit_node`/`on_after_visit_node` hooks. Declaration kinds are
// routed to their own trait method; everything else gets `walk_children`.

use smallvec::SmallVec;
use ts::{Edge, NodeId, SourceFile, SyntaxKind, TransformationContext};

use crate::error::{TransformError, TransformResult};

/// Result of visiting one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visited {
    Node(NodeId),
    Removed,
    /// Spliced into the parent's list in place of the visited node.
    Many(SmallVec<[NodeId; 2]>),
}

pub trait TransformWalker {
    fn source_file(&self) -> &SourceFile;
    fn source_file_mut(&mut self) -> &mut SourceFile;
    fn context_mut(&mut self) -> &mut TransformationContext;

    fn on_before_visit_node(&mut self, _node: NodeId) {}
    fn on_after_visit_node(&mut self, _node: NodeId) {}

    fn visit_class_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        walk_children(self, node).map(Visited::Node)
    }

    fn visit_constructor_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        walk_children(self, node).map(Visited::Node)
    }

    fn visit_parameter_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        walk_children(self, node).map(Visited::Node)
    }

    fn visit_property_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        walk_children(self, node).map(Visited::Node)
    }

    /// Methods and get/set accessors.
    fn visit_method_declaration(&mut self, node: NodeId) -> TransformResult<Visited> {
        walk_children(self, node).map(Visited::Node)
    }

    fn visit_decorator(&mut self, node: NodeId) -> TransformResult<Visited> {
        walk_children(self, node).map(Visited::Node)
    }

    fn visit_node(&mut self, node: NodeId) -> TransformResult<Visited> {
        self.on_before_visit_node(node);
        let visited = match self.source_file().kind(node) {
            SyntaxKind::ClassDeclaration => self.visit_class_declaration(node),
            SyntaxKind::Constructor => self.visit_constructor_declaration(node),
            SyntaxKind::Parameter => self.visit_parameter_declaration(node),
            SyntaxKind::PropertyDeclaration => self.visit_property_declaration(node),
            SyntaxKind::MethodDeclaration | SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                self.visit_method_declaration(node)
            }
            SyntaxKind::Decorator => self.visit_decorator(node),
            _ => walk_children(self, node).map(Visited::Node),
        };
        self.on_after_visit_node(node);
        visited
    }

    /// Visits the whole file and installs the new root.
    fn walk(&mut self) -> TransformResult<NodeId> {
        walk_source_file(self)
    }
}

/// The default `walk`: declaration files come back untouched, anything else
/// is visited from the root and gets the context's pending emit helpers.
pub fn walk_source_file<W: TransformWalker + ?Sized>(walker: &mut W) -> TransformResult<NodeId> {
    let root = walker.source_file().root();
    if walker.source_file().is_declaration_file() {
        tracing::trace!(file = walker.source_file().file_name(), "skipping declaration file");
        return Ok(root);
    }

    let new_root = match walker.visit_node(root)? {
        Visited::Node(id) => id,
        Visited::Removed | Visited::Many(_) => {
            return Err(TransformError::MissingRoot {
                file_name: walker.source_file().file_name().to_string(),
            })
        }
    };
    let helpers = walker.context_mut().read_emit_helpers();
    let file = walker.source_file_mut();
    file.set_root(new_root);
    file.add_emit_helpers(helpers);
    Ok(new_root)
}

/// Visits every decorator and child of `node`. Returns `node` itself when
/// nothing changed, otherwise an updated copy in which removed children are
/// dropped and multi-node results are spliced in place. A decorator list
/// that ends up empty becomes absent.
pub fn walk_children<W: TransformWalker + ?Sized>(
    walker: &mut W,
    node: NodeId,
) -> TransformResult<NodeId> {
    let (decorators, children) = {
        let current = walker.source_file().node(node);
        (current.decorators.clone(), current.children.clone())
    };
    let mut changed = false;

    let new_decorators = match decorators {
        Some(list) => {
            let mut kept = Vec::with_capacity(list.len());
            for decorator in list {
                changed |= splice(walker.visit_node(decorator)?, decorator, &mut kept, |id| id);
            }
            (!kept.is_empty()).then_some(kept)
        }
        None => None,
    };

    let mut new_children: Vec<(Edge, NodeId)> = Vec::with_capacity(children.len());
    for (edge, child) in children {
        changed |= splice(walker.visit_node(child)?, child, &mut new_children, |id| (edge, id));
    }

    if !changed {
        return Ok(node);
    }
    Ok(walker
        .source_file_mut()
        .update_node(node, new_decorators, new_children))
}

fn splice<T>(visited: Visited, original: NodeId, out: &mut Vec<T>, wrap: impl Fn(NodeId) -> T) -> bool {
    match visited {
        Visited::Node(id) => {
            out.push(wrap(id));
            id != original
        }
        Visited::Removed => true,
        Visited::Many(ids) => {
            out.extend(ids.into_iter().map(wrap));
            true
        }
    }
}

/// Collects nodes of `kind` under `node` (the root when `None`), in source
/// order. Without `recursive` a match is not searched further, so only the
/// shallowest matches are returned. `max` bounds the result; pass
/// `usize::MAX` for no bound.
pub fn find_ast_nodes(
    file: &SourceFile,
    node: Option<NodeId>,
    kind: SyntaxKind,
    recursive: bool,
    max: usize,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    if max > 0 {
        collect_nodes(file, node.unwrap_or_else(|| file.root()), kind, recursive, max, &mut found);
    }
    found
}

fn collect_nodes(
    file: &SourceFile,
    node: NodeId,
    kind: SyntaxKind,
    recursive: bool,
    max: usize,
    found: &mut Vec<NodeId>,
) {
    if file.kind(node) == kind {
        found.push(node);
        if !recursive {
            return;
        }
    }
    for child in file.children(node) {
        if found.len() >= max {
            return;
        }
        collect_nodes(file, child, kind, recursive, max, found);
    }
}

pub fn find_first_ast_node(file: &SourceFile, node: Option<NodeId>, kind: SyntaxKind) -> Option<NodeId> {
    find_ast_nodes(file, node, kind, false, 1).into_iter().next()
}

/// `None` in, `None` out; otherwise the nodes that pass `test`.
pub fn filter_nodes(nodes: Option<&[NodeId]>, mut test: impl FnMut(NodeId) -> bool) -> Option<Vec<NodeId>> {
    nodes.map(|list| list.iter().copied().filter(|id| test(*id)).collect())
}

/// A walker with no behaviour of its own: it rebuilds nothing and returns
/// the original root.
pub struct BaseTransformWalker<'a> {
    source_file: &'a mut SourceFile,
    context: &'a mut TransformationContext,
}

impl<'a> BaseTransformWalker<'a> {
    pub fn new(source_file: &'a mut SourceFile, context: &'a mut TransformationContext) -> Self {
        BaseTransformWalker {
            source_file,
            context,
        }
    }
}

impl TransformWalker for BaseTransformWalker<'_> {
    fn source_file(&self) -> &SourceFile {
        self.source_file
    }

    fn source_file_mut(&mut self) -> &mut SourceFile {
        self.source_file
    }

    fn context_mut(&mut self) -> &mut TransformationContext {
        self.context
    }
}
