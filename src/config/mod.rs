pub mod credentials;
pub mod env;
pub mod parser;
pub mod schema;
pub mod security;
pub mod types;

pub use types::*;
pub use parser::{load_config, parse_config};
pub use security::validate_target_url;
