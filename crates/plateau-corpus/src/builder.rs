//! Manifest construction

use crate::error::CorpusError;
use plateau_domain::{Document, IterationLabel, Manifest, ManifestEntry, ManifestMetadata};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that a document's source file exists
///
/// Returns the canonical absolute path of the file.
pub fn check_document(document: &Document) -> Result<PathBuf, CorpusError> {
    let not_found = || CorpusError::DocumentNotFound {
        id: document.id.clone(),
        path: document.path.clone(),
    };
    let path = fs::canonicalize(&document.path).map_err(|_| not_found())?;
    if !path.is_file() {
        return Err(not_found());
    }
    Ok(path)
}

/// Build the manifest for a cumulative corpus
///
/// One entry per document, in the given order. Fails on the first document
/// whose source file is missing.
pub fn build_manifest(
    documents: &[Document],
    iteration: &IterationLabel,
) -> Result<Manifest, CorpusError> {
    let checked = documents
        .iter()
        .map(|document| Ok((document.clone(), check_document(document)?)))
        .collect::<Result<Vec<_>, CorpusError>>()?;
    Ok(assemble_manifest(&checked, iteration))
}

/// Build a manifest from documents whose files were already resolved
/// by [`check_document`]
pub fn assemble_manifest(checked: &[(Document, PathBuf)], iteration: &IterationLabel) -> Manifest {
    let total_in_corpus = checked.len();
    let documents = checked
        .iter()
        .enumerate()
        .map(|(index, (document, file))| ManifestEntry {
            id: document.id.clone(),
            name: document.display_name(),
            file: file.clone(),
            authors: document.authors.clone(),
            metadata: ManifestMetadata {
                iteration: *iteration,
                position: index + 1,
                total_in_corpus,
                significance: document.significance,
            },
        })
        .collect();

    debug!(iteration = %iteration, documents = total_in_corpus, "built manifest");
    Manifest { documents }
}

/// Serialize a manifest into the engine's input format
pub fn manifest_to_json(manifest: &Manifest) -> Result<String, CorpusError> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

/// Write a manifest to disk, creating parent directories
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), CorpusError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, manifest_to_json(manifest)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn document(dir: &TempDir, id: &str, significance: f64) -> Document {
        let path = dir.path().join(format!("{}.txt", id));
        fs::write(&path, format!("text of {}", id)).unwrap();
        Document::new(id, path).with_significance(significance)
    }

    #[test]
    fn test_manifest_preserves_order_and_positions() {
        let dir = TempDir::new().unwrap();
        let docs = vec![
            document(&dir, "critique", 0.9),
            document(&dir, "groundwork", 0.8),
            document(&dir, "prolegomena", 0.4),
        ];

        let manifest = build_manifest(&docs, &IterationLabel::numeric(3)).unwrap();
        assert_eq!(manifest.document_ids(), vec!["critique", "groundwork", "prolegomena"]);

        let last = &manifest.documents[2];
        assert_eq!(last.name, "prolegomena");
        assert_eq!(last.metadata.position, 3);
        assert_eq!(last.metadata.total_in_corpus, 3);
        assert_eq!(last.metadata.iteration, IterationLabel::numeric(3));
        assert_eq!(last.metadata.significance, 0.4);
        assert!(last.file.is_absolute());
    }

    #[test]
    fn test_missing_document_fails() {
        let dir = TempDir::new().unwrap();
        let docs = vec![
            document(&dir, "critique", 0.9),
            Document::new("lost", dir.path().join("lost.txt")),
        ];

        let err = build_manifest(&docs, &IterationLabel::numeric(2)).unwrap_err();
        match err {
            CorpusError::DocumentNotFound { id, .. } => assert_eq!(id, "lost"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_assembled_manifest_keeps_resolved_files() {
        let dir = TempDir::new().unwrap();
        let critique = document(&dir, "critique", 0.9);
        let file = check_document(&critique).unwrap();
        fs::remove_file(&critique.path).unwrap();

        let manifest = assemble_manifest(&[(critique, file.clone())], &IterationLabel::numeric(1));
        assert_eq!(manifest.documents[0].file, file);
        assert_eq!(manifest.documents[0].metadata.total_in_corpus, 1);
    }

    #[test]
    fn test_directory_is_not_a_document() {
        let dir = TempDir::new().unwrap();
        let doc = Document::new("dir", dir.path());
        assert!(matches!(check_document(&doc), Err(CorpusError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_write_manifest_creates_parents() {
        let dir = TempDir::new().unwrap();
        let docs = vec![document(&dir, "critique", 0.9).with_authors(vec!["Kant".to_string()])];
        let manifest = build_manifest(&docs, &IterationLabel::numeric(1)).unwrap();

        let path = dir.path().join("corpora").join("corpus_1.json");
        write_manifest(&manifest, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["documents"][0]["id"], "critique");
        assert_eq!(json["documents"][0]["authors"][0], "Kant");
        assert_eq!(json["documents"][0]["metadata"]["iteration"], "1");
    }
}
