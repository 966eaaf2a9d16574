//! Message handling - Classification, middleware and dispatch

pub mod dispatcher;
pub mod middleware;
pub mod parser;

pub use dispatcher::{MessageDispatcher, Services};
pub use parser::MessageClassifier;
