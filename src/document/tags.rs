//! Tag vocabulary aggregation.

use crate::document::types::Record;

/// Fold `record`'s tags into `running`, keeping each tag once in
/// first-encounter order. A linear membership test, not a hash set — order
/// preservation matters more than lookup speed at this collection size.
pub fn aggregate_tags<T: Record>(record: &T, running: &mut Vec<String>) {
    for tag in record.tags() {
        if !running.iter().any(|seen| seen == tag) {
            running.push(tag.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{Document, Project};

    fn project_with_tags(tags: &[&str]) -> Project {
        Project {
            document: Document {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Document::default()
            },
            ..Project::default()
        }
    }

    #[test]
    fn tags_dedup_in_first_encounter_order() {
        let first = project_with_tags(&["rust", "web"]);
        let second = project_with_tags(&["web", "cli", "rust"]);

        let mut running = Vec::new();
        aggregate_tags(&first, &mut running);
        aggregate_tags(&second, &mut running);

        assert_eq!(running, vec!["rust", "web", "cli"]);
    }

    #[test]
    fn removing_a_document_never_grows_the_vocabulary() {
        let docs = vec![
            project_with_tags(&["a", "b"]),
            project_with_tags(&["b", "c"]),
            project_with_tags(&["c", "d"]),
        ];

        let mut full = Vec::new();
        for doc in &docs {
            aggregate_tags(doc, &mut full);
        }

        for skip in 0..docs.len() {
            let mut partial = Vec::new();
            for (i, doc) in docs.iter().enumerate() {
                if i != skip {
                    aggregate_tags(doc, &mut partial);
                }
            }
            assert!(partial.len() <= full.len());
            for tag in &partial {
                assert!(full.contains(tag));
            }
        }
    }
}
