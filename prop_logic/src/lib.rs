mod clause;
mod node;
mod types;

pub use clause::Clause;
pub use node::Node;
pub use types::{Boolean, Literal};
