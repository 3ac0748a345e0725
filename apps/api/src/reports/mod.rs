// Operator-facing report archive and its credential gate.

pub mod archive;
pub mod auth;
pub mod handlers;
