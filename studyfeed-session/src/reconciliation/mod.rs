mod dto;
mod reconciliation_engine;

pub use dto::*;
pub use reconciliation_engine::*;
