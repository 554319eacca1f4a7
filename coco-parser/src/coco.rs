//! Main module for the grammar front end

pub mod lexing;
pub mod mapping;
pub mod parsing;
pub mod source;
pub mod symbols;
pub mod testing;
