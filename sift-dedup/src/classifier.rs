//! Coarse content-domain classification.
//!
//! Resolution order, first match wins:
//! 1. explicit `domain` metadata naming a known domain
//! 2. `language` metadata naming a known programming language → code
//! 3. content indicators (code ≥ 3, data ≥ 2, documentation ≥ 1)
//! 4. text

use sift_core::constants::CODE_LANGUAGES;
use sift_core::models::{Document, Domain};

const CODE_INDICATORS: &[&str] = &["def ", "function ", "class ", "import ", "from ", "{", "}", ");"];
const CODE_MIN_MATCHES: usize = 3;

/// Matched case-insensitively.
const DATA_INDICATORS: &[&str] = &["json", "xml", "csv", "\":", "{}", "[]", "data:"];
const DATA_MIN_MATCHES: usize = 2;

const DOC_INDICATORS: &[&str] = &["# ", "## ", "README", "documentation", "guide", "manual"];
const DOC_MIN_MATCHES: usize = 1;

/// Classify a document. Pure and deterministic.
pub fn classify(document: &Document) -> Domain {
    if let Some(domain) = document
        .metadata_str("domain")
        .and_then(|d| d.parse::<Domain>().ok())
    {
        return domain;
    }

    if let Some(language) = document.metadata_str("language") {
        let language = language.to_lowercase();
        if CODE_LANGUAGES.contains(&language.as_str()) {
            return Domain::Code;
        }
    }

    classify_content(&document.content)
}

/// Content heuristics alone.
pub fn classify_content(content: &str) -> Domain {
    if count_matches(content, CODE_INDICATORS) >= CODE_MIN_MATCHES {
        return Domain::Code;
    }

    let lowered = content.to_lowercase();
    if count_matches(&lowered, DATA_INDICATORS) >= DATA_MIN_MATCHES {
        return Domain::Data;
    }

    if count_matches(content, DOC_INDICATORS) >= DOC_MIN_MATCHES {
        return Domain::Documentation;
    }

    Domain::Text
}

/// Number of distinct indicators present in `haystack`.
fn count_matches(haystack: &str, indicators: &[&str]) -> usize {
    indicators.iter().filter(|i| haystack.contains(*i)).count()
}
