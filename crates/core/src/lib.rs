//! Domain layer for the client onboarding form: the submission model, the
//! validation schema and the submission flow state machine.

pub mod error;
pub mod flow;
pub mod schema;
pub mod submission;
