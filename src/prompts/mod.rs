pub mod templates;

pub use templates::{estimate_messages, ticket_messages};
