pub mod src;

#[cfg(test)]
mod test;

pub use src::aot_transform_walker::*;
pub use src::base_transform_walker::*;
pub use src::ctor_parameters::*;
pub use src::walker_context::*;
