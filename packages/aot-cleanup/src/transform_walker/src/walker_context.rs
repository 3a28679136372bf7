// Walker Context
//
// Declarations the AOT walker is currently inside of. Each scope kind keeps
// a stack so nested classes (a class expression inside a method, say) do not
// clobber the enclosing frame.

use ts::{NodeId, SyntaxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Class,
    Parameter,
    Property,
    Method,
}

impl ScopeKind {
    /// Accessors share the method scope.
    pub fn of(kind: SyntaxKind) -> Option<ScopeKind> {
        match kind {
            SyntaxKind::ClassDeclaration => Some(ScopeKind::Class),
            SyntaxKind::Parameter => Some(ScopeKind::Parameter),
            SyntaxKind::PropertyDeclaration => Some(ScopeKind::Property),
            SyntaxKind::MethodDeclaration | SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                Some(ScopeKind::Method)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AotWalkerContext {
    classes: Vec<NodeId>,
    parameters: Vec<NodeId>,
    properties: Vec<NodeId>,
    methods: Vec<NodeId>,
}

impl AotWalkerContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn stack(&self, scope: ScopeKind) -> &Vec<NodeId> {
        match scope {
            ScopeKind::Class => &self.classes,
            ScopeKind::Parameter => &self.parameters,
            ScopeKind::Property => &self.properties,
            ScopeKind::Method => &self.methods,
        }
    }

    fn stack_mut(&mut self, scope: ScopeKind) -> &mut Vec<NodeId> {
        match scope {
            ScopeKind::Class => &mut self.classes,
            ScopeKind::Parameter => &mut self.parameters,
            ScopeKind::Property => &mut self.properties,
            ScopeKind::Method => &mut self.methods,
        }
    }

    pub fn open(&mut self, scope: ScopeKind, node: NodeId) {
        self.stack_mut(scope).push(node);
    }

    /// Pops the innermost frame of `scope` if it belongs to `node`.
    pub fn close(&mut self, scope: ScopeKind, node: NodeId) -> bool {
        let stack = self.stack_mut(scope);
        if stack.last() == Some(&node) {
            stack.pop();
            true
        } else {
            false
        }
    }

    pub fn active(&self, scope: ScopeKind) -> Option<NodeId> {
        self.stack(scope).last().copied()
    }

    pub fn is_active(&self, scope: ScopeKind, node: NodeId) -> bool {
        self.active(scope) == Some(node)
    }

    pub fn in_class(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn depth(&self, scope: ScopeKind) -> usize {
        self.stack(scope).len()
    }
}
