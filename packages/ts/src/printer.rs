//! Re-serialization of a (possibly transformed) source file.
//!
//! Parsed nodes are printed verbatim from the source text. An updated node is
//! printed by walking its original text and substituting its current
//! children: children that were dropped are cut out together with the
//! whitespace that follows them. Synthesized class members are placed before
//! the closing brace of the class body (on the same line when the body is
//! written on one line), and other synthesized list entries go on their own
//! line after the preceding sibling. Synthesized nodes are printed
//! structurally.

use std::collections::HashSet;

use oxc_span::Span;

use crate::node::{Edge, NodeData, NodeId, SourceFile, SyntaxKind};

#[derive(Debug, Clone)]
pub struct Printer {
    indent_unit: String,
}

impl Default for Printer {
    fn default() -> Self {
        Printer {
            indent_unit: "    ".to_string(),
        }
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_unit(indent_unit: &str) -> Self {
        Printer {
            indent_unit: indent_unit.to_string(),
        }
    }

    pub fn print_file(&self, file: &SourceFile) -> String {
        let mut out = String::with_capacity(file.text().len() + 256);
        for helper in file.emit_helpers() {
            out.push_str(&helper.text);
            if !helper.text.ends_with('\n') {
                out.push('\n');
            }
        }
        self.emit(file, file.root(), &mut out);
        out
    }

    pub fn print_node(&self, file: &SourceFile, id: NodeId) -> String {
        let mut out = String::new();
        self.emit(file, id, &mut out);
        out
    }

    fn emit(&self, file: &SourceFile, id: NodeId, out: &mut String) {
        match file.span(id) {
            Some(span) if file.is_parsed(id) => out.push_str(file.slice(span)),
            Some(span) => self.emit_spliced(file, id, span, out),
            None => self.emit_synthesized(file, id, out),
        }
    }

    // ========================================================================
    // Updated nodes
    // ========================================================================

    fn emit_spliced(&self, file: &SourceFile, id: NodeId, span: Span, out: &mut String) {
        let node = file.node(id);
        let current: Vec<(Option<Edge>, NodeId)> = node
            .decorators
            .iter()
            .flatten()
            .map(|d| (None, *d))
            .chain(node.children.iter().map(|(edge, child)| (Some(*edge), *child)))
            .collect();

        let kept: HashSet<NodeId> = current
            .iter()
            .map(|(_, child)| file.original_node(*child))
            .collect();
        let mut removed: Vec<Span> = file
            .children(file.original_node(id))
            .into_iter()
            .filter(|child| !kept.contains(child))
            .filter_map(|child| file.span(child))
            .collect();
        removed.sort_by_key(|span| span.start);

        let is_class = node.kind == SyntaxKind::ClassDeclaration;
        let mut cursor = span.start;
        let mut previous: Option<Span> = None;
        let mut last_member: Option<Span> = None;
        let mut appended_members = Vec::new();

        for (edge, child) in current {
            match file.span(child) {
                // Overlapping spans: the text up to `cursor` is already out.
                Some(child_span) if child_span.start < cursor => {
                    if child_span.end > cursor {
                        self.emit_gap(file, cursor, child_span.end, &removed, out);
                        cursor = child_span.end;
                    }
                    previous = Some(child_span);
                    if edge == Some(Edge::Member) {
                        last_member = Some(child_span);
                    }
                }
                Some(child_span) => {
                    self.emit_gap(file, cursor, child_span.start, &removed, out);
                    self.emit(file, child, out);
                    cursor = child_span.end;
                    previous = Some(child_span);
                    if edge == Some(Edge::Member) {
                        last_member = Some(child_span);
                    }
                }
                None if is_class && edge == Some(Edge::Member) => appended_members.push(child),
                None => {
                    let anchor = previous.map_or(span.start, |s| s.start);
                    out.push('\n');
                    out.push_str(indentation_at(file.text(), anchor));
                    self.emit(file, child, out);
                }
            }
        }

        if let (false, NodeData::Class { body }) = (appended_members.is_empty(), &node.data) {
            let close = body.end.saturating_sub(1).max(cursor);
            let mut gap = String::new();
            self.emit_gap(file, cursor, close, &removed, &mut gap);
            out.push_str(gap.trim_end());

            let text = file.text();
            let one_line =
                last_member.is_some() && line_start(text, body.start) == line_start(text, close);
            if one_line {
                for member in appended_members {
                    out.push(' ');
                    self.emit(file, member, out);
                }
                out.push(' ');
            } else {
                let class_indent = indentation_at(text, span.start);
                let member_indent = match last_member {
                    Some(member) if line_start(text, member.start) != line_start(text, span.start) => {
                        indentation_at(text, member.start).to_string()
                    }
                    _ => format!("{}{}", class_indent, self.indent_unit),
                };
                for member in appended_members {
                    out.push('\n');
                    out.push_str(&member_indent);
                    self.emit(file, member, out);
                }
                out.push('\n');
                out.push_str(class_indent);
            }
            cursor = close;
        }

        self.emit_gap(file, cursor, span.end, &removed, out);
    }

    /// Copies `[start, end)` of the source, cutting out removed children and
    /// the whitespace after each of them.
    fn emit_gap(&self, file: &SourceFile, start: u32, end: u32, removed: &[Span], out: &mut String) {
        let text = file.text();
        let bytes = text.as_bytes();
        let end = end as usize;
        let mut pos = start as usize;
        while pos < end {
            let next_removed = removed
                .iter()
                .find(|span| span.start as usize >= pos && (span.start as usize) < end);
            match next_removed {
                Some(span) => {
                    out.push_str(text.get(pos..span.start as usize).unwrap_or_default());
                    let mut next = (span.end as usize).min(end);
                    while next < end && bytes[next].is_ascii_whitespace() {
                        next += 1;
                    }
                    pos = next;
                }
                None => {
                    out.push_str(text.get(pos..end).unwrap_or_default());
                    pos = end;
                }
            }
        }
    }

    // ========================================================================
    // Synthesized nodes
    // ========================================================================

    fn emit_synthesized(&self, file: &SourceFile, id: NodeId, out: &mut String) {
        let node = file.node(id);
        match node.kind {
            SyntaxKind::Identifier => out.push_str(file.get_text(id)),
            SyntaxKind::StringLiteral => {
                out.push('\'');
                out.push_str(&file.get_text(id).replace('\'', "\\'"));
                out.push('\'');
            }
            SyntaxKind::ArrayLiteralExpression => {
                out.push('[');
                self.emit_list(file, file.children_of(id, Edge::Element), ", ", out);
                out.push(']');
            }
            SyntaxKind::ObjectLiteralExpression => {
                if node.children.is_empty() {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    self.emit_list(file, file.children_of(id, Edge::Element), ", ", out);
                    out.push_str(" }");
                }
            }
            SyntaxKind::PropertyAssignment => {
                self.emit_edge(file, id, Edge::Name, out);
                out.push_str(": ");
                self.emit_edge(file, id, Edge::Initializer, out);
            }
            SyntaxKind::Block => {
                if node.children.is_empty() {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    self.emit_list(file, file.children_of(id, Edge::Statement), " ", out);
                    out.push_str(" }");
                }
            }
            SyntaxKind::ReturnStatement => {
                out.push_str("return");
                if let Some(expression) = file.child(id, Edge::Expression) {
                    out.push(' ');
                    self.emit(file, expression, out);
                }
                out.push(';');
            }
            SyntaxKind::ExpressionStatement => {
                self.emit_edge(file, id, Edge::Expression, out);
                out.push(';');
            }
            SyntaxKind::MethodDeclaration => {
                if let NodeData::Method { is_static: true } = node.data {
                    out.push_str("static ");
                }
                self.emit_edge(file, id, Edge::Name, out);
                out.push('(');
                self.emit_list(file, file.children_of(id, Edge::Parameter), ", ", out);
                out.push_str(") ");
                self.emit_edge(file, id, Edge::Body, out);
            }
            SyntaxKind::FunctionExpression => {
                out.push_str("function (");
                self.emit_list(file, file.children_of(id, Edge::Parameter), ", ", out);
                out.push_str(") ");
                self.emit_edge(file, id, Edge::Body, out);
            }
            SyntaxKind::ParenthesizedExpression => {
                out.push('(');
                self.emit_edge(file, id, Edge::Expression, out);
                out.push(')');
            }
            SyntaxKind::AsExpression => {
                self.emit_edge(file, id, Edge::Expression, out);
                out.push_str(" as ");
                self.emit_edge(file, id, Edge::Type, out);
            }
            SyntaxKind::TypeReference => self.emit_edge(file, id, Edge::TypeName, out),
            SyntaxKind::PropertyAccessExpression => {
                self.emit_edge(file, id, Edge::Expression, out);
                out.push('.');
                self.emit_edge(file, id, Edge::Name, out);
            }
            SyntaxKind::BinaryExpression => {
                self.emit_edge(file, id, Edge::Left, out);
                out.push_str(" = ");
                self.emit_edge(file, id, Edge::Right, out);
            }
            SyntaxKind::CallExpression => {
                self.emit_edge(file, id, Edge::Callee, out);
                out.push('(');
                self.emit_list(file, file.children_of(id, Edge::Argument), ", ", out);
                out.push(')');
            }
            SyntaxKind::Decorator => {
                out.push('@');
                self.emit_edge(file, id, Edge::Expression, out);
            }
            _ => {
                let children = file.children(id);
                self.emit_list(file, children.into_iter(), " ", out);
            }
        }
    }

    fn emit_edge(&self, file: &SourceFile, id: NodeId, edge: Edge, out: &mut String) {
        if let Some(child) = file.child(id, edge) {
            self.emit(file, child, out);
        }
    }

    fn emit_list(
        &self,
        file: &SourceFile,
        ids: impl Iterator<Item = NodeId>,
        separator: &str,
        out: &mut String,
    ) {
        for (index, id) in ids.enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            self.emit(file, id, out);
        }
    }
}

fn line_start(text: &str, pos: u32) -> usize {
    text.get(..pos as usize)
        .and_then(|before| before.rfind('\n'))
        .map_or(0, |index| index + 1)
}

fn indentation_at(text: &str, pos: u32) -> &str {
    let start = line_start(text, pos);
    let line = text.get(start..).unwrap_or_default();
    let width = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[..width]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::create_source_file;
    use crate::transform::EmitHelper;

    fn first_class(file: &SourceFile) -> NodeId {
        file.children_of(file.root(), Edge::Statement)
            .find(|s| file.kind(*s) == SyntaxKind::ClassDeclaration)
            .unwrap()
    }

    fn replace_statement(file: &mut SourceFile, old: NodeId, new: Vec<NodeId>) {
        let root = file.root();
        let children = file
            .edges(root)
            .iter()
            .flat_map(|(edge, child)| {
                if *child == old {
                    new.iter().map(|n| (*edge, *n)).collect::<Vec<_>>()
                } else {
                    vec![(*edge, *child)]
                }
            })
            .collect();
        let updated = file.update_node(root, None, children);
        file.set_root(updated);
    }

    #[test]
    fn test_unchanged_file_prints_verbatim() {
        let source = "import { A } from './a';\n\n@Dec()\nexport class B extends A {\n  x = 1;\n}\n";
        let file = create_source_file("b.ts", source).unwrap();
        assert_eq!(Printer::new().print_file(&file), source);
    }

    #[test]
    fn test_removed_decorator_and_following_whitespace() {
        let source = "const a = 1;\n@Component({\n  selector: 'x'\n})\nexport class Foo {}\n";
        let mut file = create_source_file("foo.ts", source).unwrap();
        let class = first_class(&file);
        let updated = file.update_decorators(class, None);
        replace_statement(&mut file, class, vec![updated]);

        assert_eq!(
            Printer::new().print_file(&file),
            "const a = 1;\nexport class Foo {}\n"
        );
    }

    #[test]
    fn test_appended_member_goes_before_closing_brace() {
        let source = "class Foo {\n  constructor(x: Bar) {}\n}\n";
        let mut file = create_source_file("foo.ts", source).unwrap();
        let class = first_class(&file);

        let empty = file.create_array_literal(Vec::new());
        let ret = file.create_return(empty);
        let body = file.create_block(vec![ret]);
        let method = file.create_method(true, "ctorParameters", body);
        let mut children = file.edges(class).to_vec();
        children.push((Edge::Member, method));
        let updated = file.update_node(class, None, children);
        replace_statement(&mut file, class, vec![updated]);

        assert_eq!(
            Printer::new().print_file(&file),
            "class Foo {\n  constructor(x: Bar) {}\n  static ctorParameters() { return []; }\n}\n"
        );
    }

    #[test]
    fn test_appended_member_in_empty_body() {
        let mut file = create_source_file("foo.ts", "class Foo {}\n").unwrap();
        let class = first_class(&file);
        let body = file.create_block(Vec::new());
        let method = file.create_method(false, "m", body);
        let mut children = file.edges(class).to_vec();
        children.push((Edge::Member, method));
        let updated = file.update_node(class, None, children);
        replace_statement(&mut file, class, vec![updated]);

        assert_eq!(
            Printer::new().print_file(&file),
            "class Foo {\n    m() {}\n}\n"
        );
    }

    #[test]
    fn test_appended_member_in_one_line_body() {
        let source = "export class S { constructor(a: A) {} }\n";
        let mut file = create_source_file("s.ts", source).unwrap();
        let class = first_class(&file);

        let empty = file.create_array_literal(Vec::new());
        let ret = file.create_return(empty);
        let body = file.create_block(vec![ret]);
        let method = file.create_method(true, "ctorParameters", body);
        let mut children = file.edges(class).to_vec();
        children.push((Edge::Member, method));
        let updated = file.update_node(class, None, children);
        replace_statement(&mut file, class, vec![updated]);

        assert_eq!(
            Printer::new().print_file(&file),
            "export class S { constructor(a: A) {} static ctorParameters() { return []; } }\n"
        );
    }

    #[test]
    fn test_parameter_without_decorator_keeps_single_type() {
        let source = "class Foo {\n  constructor(@Inject(T) i: I, @Self() public s?: S) {}\n}\n";
        let mut file = create_source_file("foo.ts", source).unwrap();
        let class = first_class(&file);
        let ctor = file.child(class, Edge::Member).unwrap();

        let mut ctor_children = file.edges(ctor).to_vec();
        for (edge, child) in ctor_children.iter_mut() {
            if *edge == Edge::Parameter {
                *child = file.update_decorators(*child, None);
            }
        }
        let ctor_updated = file.update_node(ctor, None, ctor_children);
        let class_children = file
            .edges(class)
            .iter()
            .map(|(edge, child)| (*edge, if *child == ctor { ctor_updated } else { *child }))
            .collect();
        let updated = file.update_node(class, None, class_children);
        replace_statement(&mut file, class, vec![updated]);

        assert_eq!(
            Printer::new().print_file(&file),
            "class Foo {\n  constructor(i: I, public s?: S) {}\n}\n"
        );
    }

    #[test]
    fn test_overlapping_child_is_printed_once() {
        let mut file = create_source_file("foo.ts", "class Foo { a = 1; }\n").unwrap();
        let class = first_class(&file);
        let member = file.child(class, Edge::Member).unwrap();
        let mut children = file.edges(class).to_vec();
        children.push((Edge::Member, member));
        let updated = file.update_node(class, None, children);
        replace_statement(&mut file, class, vec![updated]);

        assert_eq!(Printer::new().print_file(&file), "class Foo { a = 1; }\n");
    }

    #[test]
    fn test_synthesized_statement_after_sibling() {
        let source = "  class Foo extends Base {}\nlet x;\n";
        let mut file = create_source_file("foo.ts", source).unwrap();
        let class = first_class(&file);

        let name = file.create_identifier("Foo");
        let any = file.create_type_reference_node("any");
        let cast = file.create_as_expression(name, any);
        let paren = file.create_parenthesized_expression(cast);
        let target = file.create_property_access(paren, "ctorParameters");
        let null = file.create_identifier("null");
        let ret = file.create_return(null);
        let body = file.create_block(vec![ret]);
        let function = file.create_function_expression(body);
        let assignment = file.create_assignment(target, function);
        let statement = file.create_expression_statement(assignment);
        replace_statement(&mut file, class, vec![class, statement]);

        assert_eq!(
            Printer::new().print_file(&file),
            "  class Foo extends Base {}\n  (Foo as any).ctorParameters = function () { return null; };\nlet x;\n"
        );
    }

    #[test]
    fn test_object_literal_and_string() {
        let mut file = create_source_file("x.ts", "").unwrap();
        let value = file.create_identifier("Bar");
        let ty = file.create_property_assignment("type", value);
        let object = file.create_object_literal(vec![ty]);
        assert_eq!(Printer::new().print_node(&file, object), "{ type: Bar }");
        let empty = file.create_object_literal(Vec::new());
        assert_eq!(Printer::new().print_node(&file, empty), "{}");
    }

    #[test]
    fn test_emit_helpers_are_printed_first() {
        let mut file = create_source_file("x.ts", "let a;\n").unwrap();
        file.add_emit_helpers(vec![EmitHelper {
            name: "helper".to_string(),
            scoped: false,
            text: "var __helper = 1;".to_string(),
        }]);
        assert_eq!(Printer::new().print_file(&file), "var __helper = 1;\nlet a;\n");
    }
}
