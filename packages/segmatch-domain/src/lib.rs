pub mod audience;
pub mod candidate;
pub mod fields;
pub mod filter;
pub mod locations;
pub mod ordering;
pub mod relevance;
