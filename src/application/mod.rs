//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Agent loop, conversation chaining, leaderboards
//! - Errors: Domain-specific errors
//! - Messaging: Message classification, middleware, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
