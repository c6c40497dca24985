//! Text preprocessing

mod lemmatizer;
mod normalizer;
mod stopwords;
mod tokenizer;

pub use lemmatizer::*;
pub use normalizer::*;
pub use stopwords::*;
pub use tokenizer::*;
