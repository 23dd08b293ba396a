//! Document builders.

use sift_core::models::Document;

/// Plain document with no metadata.
pub fn doc(id: &str, content: &str) -> Document {
    Document::new(id, content)
}

/// Document tagged as code through explicit `domain` metadata.
pub fn code_doc(id: &str, content: &str) -> Document {
    Document::new(id, content).with_metadata("domain", "code")
}

/// `prefix` repeated until the content reaches `len` characters.
pub fn padded(prefix: &str, len: usize) -> String {
    prefix.chars().cycle().take(len).collect()
}

/// `count` distinct mid-length text documents with ids `{prefix}-{i}`.
pub fn text_docs(prefix: &str, count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let body = padded(&format!("note {i} about the {prefix} backlog. "), 400);
            Document::new(format!("{prefix}-{i}"), body)
        })
        .collect()
}
