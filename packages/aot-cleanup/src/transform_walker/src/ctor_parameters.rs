// Constructor Parameter Metadata
//
// Builds the `ctorParameters` metadata literal that replaces the parameter
// decorators stripped from an Angular class:
//
// ```javascript
// static ctorParameters() { return [{
//   type: SomeClass,            // or undefined / null / Object
//   decorators: [{
//     type: Inject,             // the decorator that was invoked
//     args: [TOKEN],            // its arguments, verbatim
//   }]
// }]; }
// ```

use std::fmt;

use ts::{NodeId, SourceFile};

pub const CTOR_PARAMETERS: &str = "ctorParameters";

// ============================================================================
// Types
// ============================================================================

/// Runtime type recorded for a constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// No annotation, or `any`.
    Undefined,
    /// A type node that is not a reference (keywords, unions, literals).
    Null,
    /// A reference to something with no runtime value (interface, alias).
    Object,
    Named(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Object => "Object",
            TypeTag::Named(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorMetadata {
    /// Callee text of the decorator call, e.g. `Inject` or `core.Inject`.
    pub type_name: String,
    /// Raw argument texts; `None` when the call has no arguments.
    pub args: Option<Vec<String>>,
}

/// Information about a single constructor parameter's type and recognized
/// decorators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDecorationInfo {
    pub type_tag: TypeTag,
    pub decorators: Vec<DecoratorMetadata>,
}

// ============================================================================
// Node construction
// ============================================================================

/// `[{ type: X, decorators: [...] }, ...]`. The `decorators` key is left out
/// for parameters without recognized decorators and `args` for decorators
/// called without arguments.
pub fn create_ctor_parameters_literal(file: &mut SourceFile, parameters: &[ParameterDecorationInfo]) -> NodeId {
    let entries = parameters
        .iter()
        .map(|parameter| create_parameter_entry(file, parameter))
        .collect();
    file.create_array_literal(entries)
}

fn create_parameter_entry(file: &mut SourceFile, parameter: &ParameterDecorationInfo) -> NodeId {
    let type_value = file.create_identifier(parameter.type_tag.as_str());
    let mut properties = vec![file.create_property_assignment("type", type_value)];

    if !parameter.decorators.is_empty() {
        let decorators = parameter
            .decorators
            .iter()
            .map(|decorator| create_decorator_entry(file, decorator))
            .collect();
        let list = file.create_array_literal(decorators);
        properties.push(file.create_property_assignment("decorators", list));
    }
    file.create_object_literal(properties)
}

fn create_decorator_entry(file: &mut SourceFile, decorator: &DecoratorMetadata) -> NodeId {
    let type_value = file.create_identifier(&decorator.type_name);
    let mut properties = vec![file.create_property_assignment("type", type_value)];

    if let Some(args) = &decorator.args {
        let args = args.iter().map(|arg| file.create_identifier(arg)).collect();
        let list = file.create_array_literal(args);
        properties.push(file.create_property_assignment("args", list));
    }
    file.create_object_literal(properties)
}

/// `static ctorParameters() { return <metadata>; }`
pub fn create_ctor_parameters_method(file: &mut SourceFile, metadata: NodeId) -> NodeId {
    let ret = file.create_return(metadata);
    let body = file.create_block(vec![ret]);
    file.create_method(true, CTOR_PARAMETERS, body)
}

/// `(ClassName as any).ctorParameters = function () { return <metadata>; };`
pub fn create_ctor_parameters_assignment(file: &mut SourceFile, class_name: &str, metadata: NodeId) -> NodeId {
    let class_ref = file.create_identifier(class_name);
    let any = file.create_type_reference_node("any");
    let cast = file.create_as_expression(class_ref, any);
    let receiver = file.create_parenthesized_expression(cast);
    let target = file.create_property_access(receiver, CTOR_PARAMETERS);

    let ret = file.create_return(metadata);
    let body = file.create_block(vec![ret]);
    let function = file.create_function_expression(body);

    let assignment = file.create_assignment(target, function);
    file.create_expression_statement(assignment)
}
