// Transform Walker
//
// A generic pre-order/post-order tree walker and the annotation lowering
// walker built on top of it.

pub mod aot_transform_walker;
pub mod base_transform_walker;
pub mod ctor_parameters;
pub mod walker_context;
