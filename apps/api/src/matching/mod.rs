// Text matching engine: tokenization, JD term extraction, fuzzy phrase containment
// and bag-of-words cosine similarity. Everything here is pure and synchronous.

pub mod config;
pub mod fuzzy;
pub mod similarity;
pub mod terms;
pub mod tokenizer;
