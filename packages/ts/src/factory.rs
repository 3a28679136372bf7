// Node Factory
//
// Synthesized nodes have no span; the printer renders them structurally.
// `update_node` is the only way to change a parsed node: it allocates a copy
// with new children and links it back through `original`.

use crate::node::{Edge, Node, NodeData, NodeId, SourceFile, SyntaxKind};

impl SourceFile {
    fn synthesize(
        &mut self,
        kind: SyntaxKind,
        data: NodeData,
        children: Vec<(Edge, NodeId)>,
    ) -> NodeId {
        let mut node = Node::new(kind, None, data);
        node.children = children;
        self.alloc(node)
    }

    /// Returns `id` itself when neither the decorators nor the children differ.
    pub fn update_node(
        &mut self,
        id: NodeId,
        decorators: Option<Vec<NodeId>>,
        children: Vec<(Edge, NodeId)>,
    ) -> NodeId {
        let current = self.node(id);
        if current.decorators == decorators && current.children == children {
            return id;
        }
        let mut node = current.clone();
        node.decorators = decorators;
        node.children = children;
        node.original = Some(id);
        self.alloc(node)
    }

    pub fn update_decorators(&mut self, id: NodeId, decorators: Option<Vec<NodeId>>) -> NodeId {
        let children = self.node(id).children.clone();
        self.update_node(id, decorators, children)
    }

    pub fn create_identifier(&mut self, text: &str) -> NodeId {
        self.synthesize(
            SyntaxKind::Identifier,
            NodeData::Identifier(text.to_string()),
            Vec::new(),
        )
    }

    pub fn create_array_literal(&mut self, elements: Vec<NodeId>) -> NodeId {
        let children = elements.into_iter().map(|e| (Edge::Element, e)).collect();
        self.synthesize(SyntaxKind::ArrayLiteralExpression, NodeData::None, children)
    }

    pub fn create_object_literal(&mut self, properties: Vec<NodeId>) -> NodeId {
        let children = properties.into_iter().map(|p| (Edge::Element, p)).collect();
        self.synthesize(SyntaxKind::ObjectLiteralExpression, NodeData::None, children)
    }

    pub fn create_property_assignment(&mut self, name: &str, initializer: NodeId) -> NodeId {
        let name = self.create_identifier(name);
        self.synthesize(
            SyntaxKind::PropertyAssignment,
            NodeData::None,
            vec![(Edge::Name, name), (Edge::Initializer, initializer)],
        )
    }

    pub fn create_return(&mut self, expression: NodeId) -> NodeId {
        self.synthesize(
            SyntaxKind::ReturnStatement,
            NodeData::None,
            vec![(Edge::Expression, expression)],
        )
    }

    pub fn create_block(&mut self, statements: Vec<NodeId>) -> NodeId {
        let children = statements.into_iter().map(|s| (Edge::Statement, s)).collect();
        self.synthesize(SyntaxKind::Block, NodeData::None, children)
    }

    /// Parameterless method with the given body.
    pub fn create_method(&mut self, is_static: bool, name: &str, body: NodeId) -> NodeId {
        let name = self.create_identifier(name);
        self.synthesize(
            SyntaxKind::MethodDeclaration,
            NodeData::Method { is_static },
            vec![(Edge::Name, name), (Edge::Body, body)],
        )
    }

    pub fn create_function_expression(&mut self, body: NodeId) -> NodeId {
        self.synthesize(
            SyntaxKind::FunctionExpression,
            NodeData::None,
            vec![(Edge::Body, body)],
        )
    }

    pub fn create_parenthesized_expression(&mut self, expression: NodeId) -> NodeId {
        self.synthesize(
            SyntaxKind::ParenthesizedExpression,
            NodeData::None,
            vec![(Edge::Expression, expression)],
        )
    }

    pub fn create_as_expression(&mut self, expression: NodeId, ty: NodeId) -> NodeId {
        self.synthesize(
            SyntaxKind::AsExpression,
            NodeData::None,
            vec![(Edge::Expression, expression), (Edge::Type, ty)],
        )
    }

    pub fn create_type_reference_node(&mut self, type_name: &str) -> NodeId {
        let name = self.create_identifier(type_name);
        self.synthesize(
            SyntaxKind::TypeReference,
            NodeData::None,
            vec![(Edge::TypeName, name)],
        )
    }

    pub fn create_property_access(&mut self, expression: NodeId, name: &str) -> NodeId {
        let name = self.create_identifier(name);
        self.synthesize(
            SyntaxKind::PropertyAccessExpression,
            NodeData::None,
            vec![(Edge::Expression, expression), (Edge::Name, name)],
        )
    }

    pub fn create_assignment(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.synthesize(
            SyntaxKind::BinaryExpression,
            NodeData::None,
            vec![(Edge::Left, left), (Edge::Right, right)],
        )
    }

    pub fn create_expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.synthesize(
            SyntaxKind::ExpressionStatement,
            NodeData::None,
            vec![(Edge::Expression, expression)],
        )
    }
}
