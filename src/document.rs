// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Exported store documents, one JSON object per line.
//!
//! Only the fields ranking cares about are typed. Everything else rides
//! along in `extra` so a read/write cycle does not drop data.

use std::cmp::Ordering;
use std::io::BufRead;
use std::io::Write;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::collection::Ranked;
use crate::rank::Rank;

/// Id prefix of unpublished drafts.
pub const DRAFT_PREFIX: &str = "drafts.";

/// Errors reading or writing NDJSON.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "orderRank", default, skip_serializing_if = "Option::is_none")]
    pub order_rank: Option<String>,

    #[serde(rename = "_createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Numeric position from before ranks existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Number>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn is_draft(&self) -> bool {
        return self.id.starts_with(DRAFT_PREFIX);
    }

    /// Title if there is one, else the id.
    pub fn label(&self) -> &str {
        return self.title.as_deref().unwrap_or(&self.id);
    }

    /// Oldest first. Missing timestamps sort last.
    pub fn cmp_created(&self, other: &Document) -> Ordering {
        return cmp_some_first(self.created_at.as_deref(), other.created_at.as_deref());
    }

    /// Legacy `order` ascending, then creation time.
    pub fn cmp_legacy_order(&self, other: &Document) -> Ordering {
        let by_order = match (self.legacy_order(), other.legacy_order()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        return by_order.then_with(|| self.cmp_created(other));
    }

    fn legacy_order(&self) -> Option<f64> {
        return self.order.as_ref().and_then(Number::as_f64);
    }
}

fn cmp_some_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    return match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
}

impl Ranked for Document {
    fn order_rank(&self) -> Option<&str> {
        return self.order_rank.as_deref();
    }

    fn set_order_rank(&mut self, rank: &Rank) {
        self.order_rank = Some(rank.to_string());
    }
}

/// Read NDJSON documents, skipping blank lines.
pub fn read_documents<R: BufRead>(reader: R) -> Result<Vec<Document>, DocumentError> {
    let mut documents = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let document = serde_json::from_str(&line).map_err(|source| DocumentError::Json { line: i + 1, source })?;
        documents.push(document);
    }
    return Ok(documents);
}

/// Write documents as NDJSON.
pub fn write_documents<W: Write>(mut writer: W, documents: &[Document]) -> Result<(), DocumentError> {
    for (i, document) in documents.iter().enumerate() {
        serde_json::to_writer(&mut writer, document).map_err(|source| DocumentError::Json { line: i + 1, source })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    return Ok(());
}

/// Distinct document types, sorted.
pub fn kinds(documents: &[Document]) -> Vec<String> {
    let mut kinds: Vec<String> = documents.iter().map(|d| d.kind.clone()).collect();
    kinds.sort();
    kinds.dedup();
    return kinds;
}

/// Mutable references to the documents of one type, in file order.
pub fn of_kind<'a>(documents: &'a mut [Document], kind: &str) -> Vec<&'a mut Document> {
    return documents.iter_mut().filter(|d| d.kind == kind).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{"_id":"a1","_type":"artwork","title":"Dawn","orderRank":"0|100008:","_createdAt":"2025-01-02T00:00:00Z","year":2019}

{"_id":"drafts.a2","_type":"artwork","_createdAt":"2025-01-01T00:00:00Z"}
{"_id":"c1","_type":"category","title":"Oil","order":2}
"#;

    #[test]
    fn reads_and_keeps_extra_fields() {
        let docs = read_documents(EXPORT.as_bytes()).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].order_rank.as_deref(), Some("0|100008:"));
        assert_eq!(docs[0].extra.get("year"), Some(&Value::from(2019)));
        assert!(docs[1].is_draft());
        assert_eq!(docs[1].label(), "drafts.a2");
        assert_eq!(docs[2].order, Some(Number::from(2)));
    }

    #[test]
    fn write_then_read_preserves_documents() {
        let docs = read_documents(EXPORT.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_documents(&mut out, &docs).unwrap();
        let again = read_documents(out.as_slice()).unwrap();
        assert_eq!(again, docs);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"orderRank\":\"0|100008:\""));
        assert!(!text.lines().nth(1).unwrap().contains("orderRank"));
    }

    #[test]
    fn write_keeps_number_spelling() {
        let input = "{\"_id\":\"c1\",\"_type\":\"category\",\"order\":2}\n{\"_id\":\"c2\",\"_type\":\"category\",\"order\":1.5}\n";
        let docs = read_documents(input.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_documents(&mut out, &docs).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), input);
    }

    #[test]
    fn bad_json_reports_line() {
        let input = "{\"_id\":\"a\",\"_type\":\"t\"}\n{oops\n";
        match read_documents(input.as_bytes()) {
            Err(DocumentError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn orderings() {
        let docs = read_documents(EXPORT.as_bytes()).unwrap();
        assert_eq!(docs[1].cmp_created(&docs[0]), Ordering::Less);
        assert_eq!(docs[2].cmp_created(&docs[0]), Ordering::Greater);
        assert_eq!(docs[2].cmp_legacy_order(&docs[0]), Ordering::Less);
    }

    #[test]
    fn kinds_and_subsets() {
        let mut docs = read_documents(EXPORT.as_bytes()).unwrap();
        assert_eq!(kinds(&docs), vec!["artwork".to_string(), "category".to_string()]);
        let mut artworks = of_kind(&mut docs, "artwork");
        assert_eq!(artworks.len(), 2);
        artworks[1].set_order_rank(&Rank::middle());
        assert_eq!(docs[1].order_rank.as_deref(), Some("0|hzzzzz:"));
    }
}
