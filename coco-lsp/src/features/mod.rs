pub mod completion;
pub mod document_symbols;
pub mod navigation;
pub mod semantic_tokens;

#[cfg(test)]
pub(crate) mod test_support;
