//! Extraction of per-attribute documentation from section doc blocks.
//!
//! Section declarations document their attributes in an `# Attributes`
//! heading using the bullet convention:
//!
//! ```text
//! # Attributes
//!
//! * `port` - TCP port the server binds.
//! * `timeout` - Seconds before giving up.
//!   Fractions are allowed.
//! ```
//!
//! Attributes without an entry default to empty documentation.

use std::collections::BTreeMap;

/// Parses the `# Attributes` block of a section's documentation.
///
/// Continuation lines belonging to a bullet are joined with newlines. Text
/// outside the block, and any later heading, is ignored.
#[must_use]
pub fn attribute_docs(doc: &str) -> BTreeMap<String, String> {
    let mut docs = BTreeMap::new();
    let mut in_attributes = false;
    let mut current: Option<(String, Vec<String>)> = None;

    for raw in doc.lines() {
        let line = raw.trim();
        if line.starts_with('#') {
            flush(&mut docs, current.take());
            in_attributes = line.trim_start_matches('#').trim() == "Attributes";
            continue;
        }
        if !in_attributes || line.is_empty() {
            continue;
        }
        if let Some(entry) = parse_bullet(line) {
            flush(&mut docs, current.take());
            current = Some(entry);
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line.to_owned());
        }
    }
    flush(&mut docs, current.take());
    docs
}

fn parse_bullet(line: &str) -> Option<(String, Vec<String>)> {
    let rest = line
        .strip_prefix("* ")
        .or_else(|| line.strip_prefix("- "))?
        .trim_start()
        .strip_prefix('`')?;
    let (name, tail) = rest.split_once('`')?;
    let desc = tail
        .trim_start()
        .strip_prefix('-')
        .map_or("", str::trim_start);
    let mut lines = Vec::new();
    if !desc.is_empty() {
        lines.push(desc.to_owned());
    }
    Some((name.to_owned(), lines))
}

fn flush(docs: &mut BTreeMap<String, String>, entry: Option<(String, Vec<String>)>) {
    if let Some((name, lines)) = entry {
        docs.insert(name, lines.join("\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::attribute_docs;

    #[test]
    fn extracts_attribute_entries() {
        let doc = "Settings for the HTTP listener.\n\n# Attributes\n\n\
                   * `port` - TCP port the server binds.\n\
                   * `timeout` - Seconds before giving up.\n\
                   Fractions are allowed.\n";
        let docs = attribute_docs(doc);
        assert_eq!(
            docs.get("port").map(String::as_str),
            Some("TCP port the server binds.")
        );
        assert_eq!(
            docs.get("timeout").map(String::as_str),
            Some("Seconds before giving up.\nFractions are allowed.")
        );
    }

    #[test]
    fn later_headings_end_the_block() {
        let doc = "# Attributes\n* `port` - The port.\n# Examples\n* `other` - Not an attribute.\n";
        let docs = attribute_docs(doc);
        assert_eq!(docs.len(), 1);
        assert!(docs.contains_key("port"));
    }

    #[test]
    fn missing_block_yields_an_empty_map() {
        assert!(attribute_docs("Just a summary line.").is_empty());
        assert!(attribute_docs("").is_empty());
    }

    #[test]
    fn bullets_without_backticked_names_are_ignored() {
        let doc = "# Attributes\n* port - missing backticks\n* `real` - Documented.\n";
        let docs = attribute_docs(doc);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs.get("real").map(String::as_str), Some("Documented."));
    }
}
