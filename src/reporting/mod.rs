pub mod assembler;
pub mod estimator;

pub use assembler::{assemble_report, store_report};
pub use estimator::{calculate_savings, estimate};
