pub mod src;


pub use src::find_remote_match::*;
pub use src::mock_type_checker::*;
pub use src::resolver::*;
