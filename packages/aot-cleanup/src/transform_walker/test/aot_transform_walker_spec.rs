// AOT Transform Walker Tests

use ts::{
    create_source_file, Edge, HostResult, NodeId, Printer, SourceFile, Symbol, SymbolFlags,
    SyntaxKind, TransformationContext, TypeChecker,
};

use crate::semantic::{PrimaryCheckerResolver, SemanticResolver};
use crate::transform_walker::{AotTransformWalker, AotWalkerOptions, TransformWalker};

/// Answers every lookup; names listed in `structural` resolve to interfaces.
#[derive(Default)]
struct StubResolver {
    structural: Vec<&'static str>,
    lookups: Vec<String>,
}

impl SemanticResolver for StubResolver {
    fn resolve_type_reference(
        &mut self,
        file: &SourceFile,
        type_node: NodeId,
        _primary: Option<&dyn TypeChecker>,
    ) -> HostResult<Option<Symbol>> {
        let name = file
            .child(type_node, Edge::TypeName)
            .map(|n| file.get_text(n).to_string())
            .unwrap_or_default();
        self.lookups.push(name.clone());
        let flags = if self.structural.contains(&name.as_str()) {
            SymbolFlags::INTERFACE
        } else {
            SymbolFlags::CLASS
        };
        Ok(Some(Symbol {
            name,
            flags,
            file_name: file.file_name().to_string(),
        }))
    }
}

fn lower_with(file_name: &str, source: &str, resolver: &mut dyn SemanticResolver) -> String {
    let mut file = create_source_file(file_name, source).unwrap();
    let mut context = TransformationContext::default();
    AotTransformWalker::new(&mut file, &mut context, resolver).walk().unwrap();
    Printer::new().print_file(&file)
}

fn lower(source: &str) -> String {
    lower_with("/app/test.ts", source, &mut PrimaryCheckerResolver)
}

fn first_class(file: &SourceFile) -> NodeId {
    file.children_of(file.root(), Edge::Statement)
        .find(|s| file.kind(*s) == SyntaxKind::ClassDeclaration)
        .unwrap()
}

// ============================================================================
// Framework bindings
// ============================================================================

#[test]
fn test_collects_framework_imports() {
    let source = "import Def, { Component as Cmp, Inject } from '@angular/core';\n\
                  import * as common from '@angular/common';\n\
                  import { Observable } from 'rxjs';\n\
                  import '@angular/platform-browser';\n";
    let mut file = create_source_file("a.ts", source).unwrap();
    let mut context = TransformationContext::default();
    let mut resolver = PrimaryCheckerResolver;
    let walker = AotTransformWalker::new(&mut file, &mut context, &mut resolver);

    assert_eq!(walker.angular_imports(), ["Component", "Inject", "common."]);
}

#[test]
fn test_recognizes_decorator_forms() {
    let source = "import { Component } from '@angular/core';\n\
                  import * as ng from '@angular/core';\n\
                  @Component({})\n@ng.Directive({})\n@Custom()\n@Component\nclass A {}\n";
    let mut file = create_source_file("a.ts", source).unwrap();
    let class = first_class(&file);
    let decorators = file.decorators(class).unwrap().to_vec();

    let mut context = TransformationContext::default();
    let mut resolver = PrimaryCheckerResolver;
    let walker = AotTransformWalker::new(&mut file, &mut context, &mut resolver);

    let recognized: Vec<bool> = decorators.iter().map(|d| walker.is_angular_decorator(*d)).collect();
    assert_eq!(recognized, vec![true, true, false, false]);
}

#[test]
fn test_custom_framework_prefix() {
    let source = "import { Component } from '@acme/core';\n@Component({})\nclass A {\n  constructor(x: B) {}\n}\n";
    let mut file = create_source_file("a.ts", source).unwrap();
    let mut context = TransformationContext::default();
    let mut resolver = PrimaryCheckerResolver;
    let options = AotWalkerOptions {
        framework_module_prefix: "@acme/".to_string(),
        ..AotWalkerOptions::default()
    };
    AotTransformWalker::with_options(&mut file, &mut context, &mut resolver, options)
        .walk()
        .unwrap();

    assert_eq!(
        Printer::new().print_file(&file),
        "import { Component } from '@acme/core';\nclass A {\n  constructor(x: B) {}\n  static ctorParameters() { return [{ type: B }]; }\n}\n"
    );
}

// ============================================================================
// Class lowering
// ============================================================================

#[test]
fn test_static_ctor_parameters() {
    let source = "import { Component, Inject } from '@angular/core';\n\
                  import { Bar } from './bar';\n\
                  \n\
                  @Component({ selector: 'foo' })\n\
                  class Foo {\n  constructor(@Inject(TOKEN) public x: Bar) {}\n}\n";

    assert_eq!(
        lower(source),
        "import { Component, Inject } from '@angular/core';\n\
         import { Bar } from './bar';\n\
         \n\
         class Foo {\n  constructor(public x: Bar) {}\n  \
         static ctorParameters() { return [{ type: Bar, decorators: [{ type: Inject, args: [TOKEN] }] }]; }\n}\n"
    );
}

#[test]
fn test_extends_clause_emits_trailing_assignment() {
    let source = "import { Component, Inject } from '@angular/core';\n\
                  @Component({})\n\
                  export class Foo extends Base {\n  constructor(@Inject(TOKEN) public x: Bar) { super(); }\n}\n";

    assert_eq!(
        lower(source),
        "import { Component, Inject } from '@angular/core';\n\
         export class Foo extends Base {\n  constructor(public x: Bar) { super(); }\n}\n\
         (Foo as any).ctorParameters = function () { return [{ type: Bar, decorators: [{ type: Inject, args: [TOKEN] }] }]; };\n"
    );
}

#[test]
fn test_parameter_without_modifier() {
    let source = "import { Injectable, Inject } from '@angular/core';\n\
                  @Injectable()\n\
                  class S {\n  constructor(@Inject(T) i: I) {}\n}\n";

    assert_eq!(
        lower(source),
        "import { Injectable, Inject } from '@angular/core';\n\
         class S {\n  constructor(i: I) {}\n  \
         static ctorParameters() { return [{ type: I, decorators: [{ type: Inject, args: [T] }] }]; }\n}\n"
    );
}

#[test]
fn test_one_line_class_body() {
    let source = "import { Injectable } from '@angular/core';\n@Injectable()\nexport class S { constructor(a: A) {} }\n";

    assert_eq!(
        lower(source),
        "import { Injectable } from '@angular/core';\n\
         export class S { constructor(a: A) {} static ctorParameters() { return [{ type: A }]; } }\n"
    );
}

#[test]
fn test_class_without_framework_decorator_is_untouched() {
    let source = "import { Component } from '@angular/core';\n@Custom()\nclass Foo {\n  constructor(x: Bar) {}\n}\n";
    assert_eq!(lower(source), source);
}

#[test]
fn test_constructor_without_parameters_only_strips() {
    let source = "import { Injectable } from '@angular/core';\n@Injectable()\nexport class S {\n  constructor() {}\n}\n";
    assert_eq!(
        lower(source),
        "import { Injectable } from '@angular/core';\nexport class S {\n  constructor() {}\n}\n"
    );
}

#[test]
fn test_user_class_decorators_survive() {
    let source = "import { Injectable } from '@angular/core';\n@Custom()\n@Injectable()\nclass S {\n  constructor(a: A) {}\n}\n";
    let output = lower(source);
    assert!(output.contains("@Custom()\nclass S {"));
    assert!(!output.contains("@Injectable"));
    assert!(output.contains("static ctorParameters() { return [{ type: A }]; }"));
}

#[test]
fn test_parameter_type_classification() {
    let source = "import { Injectable } from '@angular/core';\n\
                  @Injectable()\n\
                  class S {\n  constructor(a, b: any, c: string, d: Gen<string>, e: A | B, f: Opts, g: ns.Thing) {}\n}\n";
    let mut resolver = StubResolver {
        structural: vec!["Opts"],
        ..StubResolver::default()
    };
    let output = lower_with("/app/s.ts", source, &mut resolver);

    assert!(output.contains(
        "return [{ type: undefined }, { type: undefined }, { type: null }, { type: Gen }, \
         { type: null }, { type: Object }, { type: ns.Thing }];"
    ));
    assert_eq!(resolver.lookups, vec!["Gen", "Opts", "ns.Thing"]);
}

#[test]
fn test_unresolved_reference_uses_literal_name() {
    let source = "import { Injectable } from '@angular/core';\n@Injectable()\nclass S {\n  constructor(o: Opts) {}\n}\n";
    assert!(lower(source).contains("return [{ type: Opts }];"));
}

#[test]
fn test_decorator_arguments_are_verbatim() {
    let source = "import { Component, Inject, Optional, Self } from '@angular/core';\n\
                  @Component({})\n\
                  class C {\n  constructor(@Optional() @Inject('token') a: A, @Self() b: B, @Custom() c: C2) {}\n}\n";
    let output = lower(source);

    assert!(output.contains(
        "return [{ type: A, decorators: [{ type: Optional }, { type: Inject, args: ['token'] }] }, \
         { type: B, decorators: [{ type: Self }] }, { type: C2 }];"
    ));
    assert!(output.contains("constructor(a: A, b: B, @Custom() c: C2) {}"));
}

#[test]
fn test_namespace_decorators() {
    let source = "import * as core from '@angular/core';\n\
                  @core.Component({})\n\
                  class C {\n  constructor(@core.Inject(T) x: X) {}\n}\n";
    let output = lower(source);

    assert!(!output.contains("@core."));
    assert!(output.contains("return [{ type: X, decorators: [{ type: core.Inject, args: [T] }] }];"));
}

#[test]
fn test_implementation_constructor_is_preferred() {
    let source = "import { Injectable } from '@angular/core';\n\
                  @Injectable()\n\
                  class S {\n  constructor(a: string);\n  constructor(a: any, b?: Dep) {}\n}\n";
    assert!(lower(source).contains("return [{ type: undefined }, { type: Dep }];"));
}

// ============================================================================
// Nested classes
// ============================================================================

#[test]
fn test_class_in_if_block() {
    let source = "import { Injectable } from '@angular/core';\n\
                  if (enabled) {\n  @Injectable()\n  class S {\n    constructor(a: A) {}\n  }\n}\n";

    assert_eq!(
        lower(source),
        "import { Injectable } from '@angular/core';\n\
         if (enabled) {\n  class S {\n    constructor(a: A) {}\n    \
         static ctorParameters() { return [{ type: A }]; }\n  }\n}\n"
    );
}

#[test]
fn test_class_in_arrow_function_body() {
    let source = "import { Component, Inject } from '@angular/core';\n\
                  describe('suite', () => {\n  @Component({})\n  class Host {\n    constructor(@Inject(T) i: I) {}\n  }\n});\n";

    assert_eq!(
        lower(source),
        "import { Component, Inject } from '@angular/core';\n\
         describe('suite', () => {\n  class Host {\n    constructor(i: I) {}\n    \
         static ctorParameters() { return [{ type: I, decorators: [{ type: Inject, args: [T] }] }]; }\n  }\n});\n"
    );
}

#[test]
fn test_extends_class_in_method_body() {
    let source = "import { Component, Injectable } from '@angular/core';\n\
                  @Component({})\n\
                  class Outer {\n  make() {\n    @Injectable()\n    class Inner extends Base {\n      \
                  constructor(d: Dep) { super(); }\n    }\n    return Inner;\n  }\n}\n";

    assert_eq!(
        lower(source),
        "import { Component, Injectable } from '@angular/core';\n\
         class Outer {\n  make() {\n    class Inner extends Base {\n      \
         constructor(d: Dep) { super(); }\n    }\n    \
         (Inner as any).ctorParameters = function () { return [{ type: Dep }]; };\n    \
         return Inner;\n  }\n}\n"
    );
}

// ============================================================================
// Member decorators
// ============================================================================

#[test]
fn test_member_decorators_are_filtered() {
    let source = "import { Component, Input, HostListener } from '@angular/core';\n\
                  \n\
                  @Component({ selector: 'x' })\n\
                  export class Foo {\n  @Input() @Custom() name: string;\n  @Input() other: string;\n  @HostListener('click') onClick() {}\n}\n";

    assert_eq!(
        lower(source),
        "import { Component, Input, HostListener } from '@angular/core';\n\
         \n\
         export class Foo {\n  @Custom() name: string;\n  other: string;\n  onClick() {}\n}\n"
    );
}

#[test]
fn test_member_decorators_stripped_in_plain_class() {
    let source = "import { Inject, Input } from '@angular/core';\nclass Plain {\n  @Input() x: string;\n  constructor(@Inject(T) y: Y) {}\n}\n";

    assert_eq!(
        lower(source),
        "import { Inject, Input } from '@angular/core';\nclass Plain {\n  x: string;\n  constructor(y: Y) {}\n}\n"
    );
}

#[test]
fn test_stripped_lists_are_absent() {
    let source = "import { Component, Input } from '@angular/core';\n@Component({})\nclass Foo {\n  @Input() a: string;\n}\n";
    let mut file = create_source_file("a.ts", source).unwrap();
    let mut context = TransformationContext::default();
    let mut resolver = PrimaryCheckerResolver;
    AotTransformWalker::new(&mut file, &mut context, &mut resolver).walk().unwrap();

    let class = first_class(&file);
    assert!(file.decorators(class).is_none());
    let member = file.child(class, Edge::Member).unwrap();
    assert!(file.decorators(member).is_none());
}

// ============================================================================
// Fast paths
// ============================================================================

#[test]
fn test_generated_files_are_skipped() {
    let source = "import { Component } from '@angular/core';\n@Component({})\nclass A {\n  constructor(x: B) {}\n}\n";
    let mut file = create_source_file("/app/a.module.ngfactory.ts", source).unwrap();
    let root = file.root();
    let mut context = TransformationContext::default();
    let mut resolver = PrimaryCheckerResolver;

    let walked = AotTransformWalker::new(&mut file, &mut context, &mut resolver).walk().unwrap();
    assert_eq!(walked, root);
    assert_eq!(file.node_count(), file.parsed_node_count());
}

#[test]
fn test_lowering_is_idempotent() {
    let source = "import { Component, Inject, Input } from '@angular/core';\n\
                  @Component({})\n\
                  class A {\n  @Input() x: string;\n  constructor(@Inject(T) y: Y) {}\n}\n\
                  @Component({})\n\
                  class B extends A {\n  constructor(z: Z) { super(z); }\n}\n";
    let once = lower(source);
    let twice = lower(&once);
    assert_eq!(once, twice);
}
