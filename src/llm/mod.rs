//! Optional LLM enrichment

mod provider;
mod proxy;

pub use provider::*;
pub use proxy::*;
