//! Anti-forgery state tokens for the federated login redirect.

pub mod generator;

pub use generator::StateToken;
pub use generator::StateTokenGenerator;
