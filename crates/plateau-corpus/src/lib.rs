//! Plateau Corpus
//!
//! Builds the cumulative manifests handed to the extraction engine and
//! orders candidate documents by significance.
//!
//! # Example
//!
//! ```no_run
//! use plateau_corpus::{build_manifest, write_manifest};
//! use plateau_domain::{Document, IterationLabel};
//!
//! # fn example() -> Result<(), plateau_corpus::CorpusError> {
//! let documents = vec![
//!     Document::new("critique", "/data/works/critique.txt").with_significance(0.93),
//!     Document::new("groundwork", "/data/works/groundwork.txt").with_significance(0.81),
//! ];
//!
//! let manifest = build_manifest(&documents, &IterationLabel::numeric(2))?;
//! write_manifest(&manifest, "/tmp/plateau/corpora/corpus_2.json".as_ref())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod builder;
mod catalog;
mod selector;

pub use error::CorpusError;
pub use builder::{assemble_manifest, build_manifest, check_document, manifest_to_json, write_manifest};
pub use catalog::{Catalog, CatalogEntry};
pub use selector::CatalogSelector;
