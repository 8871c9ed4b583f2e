//! Feature stages that turn a [`btr::DataFrame`] into model input.
//!
//! [`VectorIndexer`] replaces a categorical column with small integer codes,
//! [`VectorAssembler`] packs a fixed list of columns into a [`btr::Dataset`].

mod assembler;
mod indexer;

pub use assembler::{HandleInvalid, VectorAssembler};
pub use indexer::{Categories, IndexerKind, VectorIndexer, VectorIndexerModel};
