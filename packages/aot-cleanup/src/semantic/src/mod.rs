// Semantic lookups for the AOT walker: the resolver capability it is
// handed, the secondary checker used when the primary program does not own
// a file, and the matcher that maps nodes between two parses of one file.

pub mod find_remote_match;
pub mod mock_type_checker;
pub mod resolver;
