//! Utility functions for rule implementations.

pub mod case;
pub mod similarity;

#[doc(inline)]
pub use case::{is_pascal_case, lower_first, split_words, to_pascal_case};
#[doc(inline)]
pub use similarity::{closest, levenshtein};
