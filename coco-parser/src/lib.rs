//! # coco-parser
//!
//! Front end for Coco/R attributed grammars (`.atg` files) as used by editor tooling.
//!
//! File Layout
//!
//!     src/coco
//!       ├── source     Source buffers, line tables and positions
//!       ├── lexing     logos based scanner for the grammar language
//!       ├── parsing    Recursive descent parser that emits checkpoints to an observer
//!       ├── mapping    Position maps between generated output and the grammar
//!       ├── symbols    Declaration / reference records
//!       └── testing    Sample grammars shared by the test suites
//!
//! The parser does not build a syntax tree. Tooling (completion, outlines, navigation) observes
//! the parse through [`coco::parsing::ParseObserver`] and keeps whatever it needs.

pub mod coco;
