//! Engine output parsing and normalization
//!
//! The engine's artifacts come in more than one shape. Everything is
//! normalized here into the key-unique maps of [`ExtractionResult`], so no
//! downstream code branches on shape.
//!
//! - Term weights may be a bare number or an object carrying `weight`,
//!   `score` or `value`. Anything else counts as 0.0.
//! - Duplicate keys keep the last occurrence.
//! - Entries without a term string are dropped.
//! - Similarity matrices may be nested objects or arrays of
//!   `{term1, term2, similarity}` triples.

use crate::config::ArtifactNames;
use crate::error::ExtractionError;
use plateau_domain::{DocTermRecord, ExtractionResult, IterationLabel, Manifest, SimilarityMatrix, TermRecord};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

type DocTerms = BTreeMap<String, BTreeMap<String, DocTermRecord>>;
type AuthorTerms = BTreeMap<String, BTreeMap<String, f64>>;

/// Read an artifact; `Ok(None)` when the file is absent
fn read_artifact(dir: &Path, name: &str) -> Result<Option<Value>, String> {
    let path = dir.join(name);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    serde_json::from_str(&content).map(Some).map_err(|e| e.to_string())
}

/// Numeric weight of a value in any supported shape
pub(crate) fn weight_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Object(obj) => ["weight", "score", "value"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_f64))
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn similarity_of(value: &Value) -> f64 {
    value
        .get("similarity")
        .and_then(Value::as_f64)
        .unwrap_or_else(|| weight_of(value))
}

fn count_of(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn string_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_str))
}

/// Weight of a term entry: the first of `score`/`weight`/`value` present
fn entry_weight(obj: &Map<String, Value>) -> f64 {
    ["score", "weight", "value"]
        .iter()
        .find_map(|key| obj.get(*key))
        .map(weight_of)
        .unwrap_or(0.0)
}

fn parse_terms(value: &Value) -> Result<BTreeMap<String, TermRecord>, String> {
    let mut terms = BTreeMap::new();
    match value {
        Value::Array(entries) => {
            for entry in entries {
                let Some(obj) = entry.as_object() else { continue };
                let Some(term) = string_of(obj, &["term_string", "term"]) else { continue };
                terms.insert(
                    term.to_string(),
                    TermRecord {
                        score: entry_weight(obj),
                        occurrences: count_of(obj.get("occurrences")),
                        matches: count_of(obj.get("matches")),
                    },
                );
            }
        }
        Value::Object(map) => {
            for (term, record) in map {
                let (occurrences, matches) = match record.as_object() {
                    Some(obj) => (count_of(obj.get("occurrences")), count_of(obj.get("matches"))),
                    None => (0, 0),
                };
                terms.insert(
                    term.clone(),
                    TermRecord { score: weight_of(record), occurrences, matches },
                );
            }
        }
        other => return Err(format!("expected an array or object, found {}", kind(other))),
    }
    Ok(terms)
}

fn doc_term_record(obj: &Map<String, Value>) -> DocTermRecord {
    let weight = ["tfidf", "weight", "score"]
        .iter()
        .find_map(|key| obj.get(*key))
        .map(weight_of)
        .unwrap_or(0.0);
    DocTermRecord { occurrences: count_of(obj.get("occurrences")), weight }
}

fn parse_doc_terms(value: &Value) -> Result<DocTerms, String> {
    let mut doc_terms: DocTerms = BTreeMap::new();
    match value {
        Value::Array(entries) => {
            for entry in entries {
                let Some(obj) = entry.as_object() else { continue };
                let (Some(doc), Some(term)) = (
                    string_of(obj, &["document_id", "document"]),
                    string_of(obj, &["term_string", "term"]),
                ) else {
                    continue;
                };
                doc_terms
                    .entry(doc.to_string())
                    .or_default()
                    .insert(term.to_string(), doc_term_record(obj));
            }
        }
        Value::Object(map) => {
            for (doc, terms) in map {
                let Some(terms) = terms.as_object() else { continue };
                let records = doc_terms.entry(doc.clone()).or_default();
                for (term, record) in terms {
                    let record = match record {
                        Value::Object(obj) => doc_term_record(obj),
                        other => DocTermRecord { occurrences: count_of(Some(other)), weight: 0.0 },
                    };
                    records.insert(term.clone(), record);
                }
            }
        }
        other => return Err(format!("expected an array or object, found {}", kind(other))),
    }
    Ok(doc_terms)
}

fn parse_author_terms(value: &Value) -> Result<AuthorTerms, String> {
    let mut author_terms: AuthorTerms = BTreeMap::new();
    match value {
        Value::Array(entries) => {
            for entry in entries {
                let Some(obj) = entry.as_object() else { continue };
                let (Some(author), Some(term)) = (
                    string_of(obj, &["author", "author_id"]),
                    string_of(obj, &["term", "term_string"]),
                ) else {
                    continue;
                };
                author_terms
                    .entry(author.to_string())
                    .or_default()
                    .insert(term.to_string(), entry_weight(obj));
            }
        }
        Value::Object(map) => {
            for (author, terms) in map {
                let Some(terms) = terms.as_object() else { continue };
                let scores = author_terms.entry(author.clone()).or_default();
                for (term, score) in terms {
                    scores.insert(term.clone(), weight_of(score));
                }
            }
        }
        other => return Err(format!("expected an array or object, found {}", kind(other))),
    }
    Ok(author_terms)
}

fn parse_similarity(value: &Value) -> Result<SimilarityMatrix, String> {
    let mut matrix: SimilarityMatrix = BTreeMap::new();
    match value {
        Value::Array(entries) => {
            for entry in entries {
                let Some(obj) = entry.as_object() else { continue };
                let (Some(t1), Some(t2)) = (
                    string_of(obj, &["term1", "term1_string"]),
                    string_of(obj, &["term2", "term2_string"]),
                ) else {
                    continue;
                };
                let similarity = ["similarity", "score", "weight", "value"]
                    .iter()
                    .find_map(|key| obj.get(*key))
                    .map(similarity_of)
                    .unwrap_or(0.0);
                matrix.entry(t1.to_string()).or_default().insert(t2.to_string(), similarity);
            }
        }
        Value::Object(map) => {
            for (t1, row) in map {
                let Some(row) = row.as_object() else { continue };
                let entries = matrix.entry(t1.clone()).or_default();
                for (t2, similarity) in row {
                    entries.insert(t2.clone(), similarity_of(similarity));
                }
            }
        }
        other => return Err(format!("expected an array or object, found {}", kind(other))),
    }
    matrix.retain(|_, row| !row.is_empty());
    Ok(matrix)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Required artifact: absent is empty, malformed is fatal
fn required<T: Default>(
    dir: &Path,
    name: &str,
    parse: impl Fn(&Value) -> Result<T, String>,
) -> Result<T, ExtractionError> {
    let malformed = |message: String| ExtractionError::MalformedOutput {
        file: name.to_string(),
        message,
    };
    match read_artifact(dir, name).map_err(malformed)? {
        Some(value) => parse(&value).map_err(malformed),
        None => {
            debug!(file = name, "artifact absent; using empty mapping");
            Ok(T::default())
        }
    }
}

/// Optional artifact: absent or malformed is empty
fn optional<T: Default>(dir: &Path, name: &str, parse: impl Fn(&Value) -> Result<T, String>) -> T {
    match read_artifact(dir, name).and_then(|value| value.map(|v| parse(&v)).transpose()) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => T::default(),
        Err(message) => {
            warn!(file = name, error = %message, "ignoring malformed optional artifact");
            T::default()
        }
    }
}

/// Read and normalize every artifact in `dir`
///
/// Document ids that are not part of `manifest` are dropped with a warning.
pub fn parse_artifacts(
    dir: &Path,
    names: &ArtifactNames,
    iteration: IterationLabel,
    manifest: &Manifest,
) -> Result<ExtractionResult, ExtractionError> {
    let terms = required(dir, &names.terms, parse_terms)?;
    let mut doc_terms = required(dir, &names.doc_terms, parse_doc_terms)?;
    let author_terms = optional(dir, &names.author_terms, parse_author_terms);
    let term_similarity = optional(dir, &names.term_similarity, parse_similarity);

    let known: BTreeSet<&str> = manifest.documents.iter().map(|d| d.id.as_str()).collect();
    let foreign: Vec<String> = doc_terms
        .keys()
        .filter(|id| !known.contains(id.as_str()))
        .cloned()
        .collect();
    if !foreign.is_empty() {
        warn!(
            iteration = %iteration,
            documents = ?foreign,
            "dropping document-term associations for documents not in the manifest"
        );
        doc_terms.retain(|id, _| known.contains(id.as_str()));
    }

    let mut result = ExtractionResult::empty(iteration, dir);
    result.terms = terms;
    result.doc_terms = doc_terms;
    result.author_terms = author_terms;
    result.term_similarity = term_similarity;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateau_domain::{ManifestEntry, ManifestMetadata};
    use serde_json::json;
    use tempfile::TempDir;

    fn manifest(ids: &[&str]) -> Manifest {
        Manifest {
            documents: ids
                .iter()
                .enumerate()
                .map(|(i, id)| ManifestEntry {
                    id: id.to_string(),
                    name: id.to_string(),
                    file: format!("/w/{}.txt", id).into(),
                    authors: Vec::new(),
                    metadata: ManifestMetadata {
                        iteration: IterationLabel::numeric(1),
                        position: i + 1,
                        total_in_corpus: ids.len(),
                        significance: 0.0,
                    },
                })
                .collect(),
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn parse(dir: &TempDir, ids: &[&str]) -> Result<ExtractionResult, ExtractionError> {
        parse_artifacts(dir.path(), &ArtifactNames::default(), IterationLabel::numeric(1), &manifest(ids))
    }

    #[test]
    fn test_weight_shapes() {
        assert_eq!(weight_of(&json!(0.5)), 0.5);
        assert_eq!(weight_of(&json!({"weight": 0.25})), 0.25);
        assert_eq!(weight_of(&json!({"score": 0.75})), 0.75);
        assert_eq!(weight_of(&json!({"value": 2})), 2.0);
        assert_eq!(weight_of(&json!({"other": 1.0})), 0.0);
        assert_eq!(weight_of(&json!("0.5")), 0.0);
        assert_eq!(weight_of(&Value::Null), 0.0);
    }

    #[test]
    fn test_terms_array_shape() {
        let dir = TempDir::new().unwrap();
        write(&dir, "terms.json", r#"[
            {"term_string": "virtue", "score": 0.8, "occurrences": 12, "matches": 3},
            {"term_string": "justice", "score": {"value": 0.4}},
            {"term_string": null, "score": 0.9},
            {"score": 0.9},
            "stray",
            {"term_string": "virtue", "score": 0.6}
        ]"#);

        let result = parse(&dir, &[]).unwrap();
        assert_eq!(result.term_count(), 2);
        assert_eq!(result.weight("virtue"), 0.6);
        assert_eq!(result.terms["virtue"].occurrences, 0);
        assert_eq!(result.weight("justice"), 0.4);
    }

    #[test]
    fn test_terms_object_shape() {
        let dir = TempDir::new().unwrap();
        write(&dir, "terms.json", r#"{"virtue": 0.8, "justice": {"weight": 0.3, "occurrences": 4}}"#);
        let result = parse(&dir, &[]).unwrap();
        assert_eq!(result.weight("virtue"), 0.8);
        assert_eq!(result.weight("justice"), 0.3);
        assert_eq!(result.terms["justice"].occurrences, 4);
    }

    #[test]
    fn test_missing_artifacts_are_empty() {
        let dir = TempDir::new().unwrap();
        let result = parse(&dir, &["w1"]).unwrap();
        assert_eq!(result.term_count(), 0);
        assert_eq!(result.document_count(), 0);
        assert!(result.author_terms.is_empty());
        assert!(!result.has_similarity());
    }

    #[test]
    fn test_malformed_terms_are_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "terms.json", "{not json");
        match parse(&dir, &[]) {
            Err(ExtractionError::MalformedOutput { file, .. }) => assert_eq!(file, "terms.json"),
            other => panic!("unexpected result: {:?}", other),
        }

        write(&dir, "terms.json", "42");
        assert!(matches!(parse(&dir, &[]), Err(ExtractionError::MalformedOutput { .. })));
    }

    #[test]
    fn test_malformed_doc_terms_are_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "doc-terms.json", "\"oops\"");
        assert!(matches!(parse(&dir, &[]), Err(ExtractionError::MalformedOutput { .. })));
    }

    #[test]
    fn test_malformed_optional_artifacts_degrade() {
        let dir = TempDir::new().unwrap();
        write(&dir, "terms.json", r#"[{"term_string": "virtue", "score": 0.8}]"#);
        write(&dir, "author-terms.json", "[{broken");
        write(&dir, "term-sim.json", "true");

        let result = parse(&dir, &[]).unwrap();
        assert_eq!(result.term_count(), 1);
        assert!(result.author_terms.is_empty());
        assert!(!result.has_similarity());
    }

    #[test]
    fn test_doc_terms_drop_foreign_documents() {
        let dir = TempDir::new().unwrap();
        write(&dir, "doc-terms.json", r#"[
            {"document_id": "w1", "term_string": "virtue", "occurrences": 3, "tfidf": 0.2},
            {"document_id": "w1", "term_string": "justice", "occurrences": 1},
            {"document_id": "ghost", "term_string": "virtue", "occurrences": 9},
            {"document_id": "w2", "term_string": null}
        ]"#);

        let result = parse(&dir, &["w1", "w2"]).unwrap();
        assert_eq!(result.document_keys().into_iter().collect::<Vec<_>>(), vec!["w1"]);
        let w1 = &result.doc_terms["w1"];
        assert_eq!(w1["virtue"], DocTermRecord { occurrences: 3, weight: 0.2 });
        assert_eq!(w1["justice"].weight, 0.0);
    }

    #[test]
    fn test_author_terms_array_shape() {
        let dir = TempDir::new().unwrap();
        write(&dir, "author-terms.json", r#"[
            {"author": "Kant", "term": "duty", "score": 0.9},
            {"author": "Kant", "term": "maxim"}
        ]"#);
        let result = parse(&dir, &[]).unwrap();
        assert_eq!(result.author_terms["Kant"]["duty"], 0.9);
        assert_eq!(result.author_terms["Kant"]["maxim"], 0.0);
    }

    #[test]
    fn test_similarity_shapes_agree() {
        let nested = TempDir::new().unwrap();
        write(&nested, "term-sim.json", r#"{"virtue": {"justice": 0.4, "courage": {"similarity": 0.2}}}"#);
        let triples = TempDir::new().unwrap();
        write(&triples, "term-sim.json", r#"[
            {"term1": "virtue", "term2": "justice", "similarity": 0.4},
            {"term1": "virtue", "term2": "courage", "similarity": 0.2}
        ]"#);

        let a = parse(&nested, &[]).unwrap().term_similarity;
        let b = parse(&triples, &[]).unwrap().term_similarity;
        assert_eq!(a, b);
        assert_eq!(a["virtue"]["courage"], 0.2);
    }
}
