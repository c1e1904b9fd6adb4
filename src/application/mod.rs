//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Messaging: Rule table and intent dispatch
//! - Responses: Canned reply tables
//! - Errors: Application-specific errors

pub mod errors;
pub mod responses;
pub mod messaging;
