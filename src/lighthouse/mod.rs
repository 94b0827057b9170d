pub mod engine;
pub mod report;
pub mod cli;

pub use engine::AuditEngine;
pub use report::parse_lhr;
pub use cli::LighthouseCli;
