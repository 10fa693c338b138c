//! Author-list sanitization for incoming CSL-JSON items.
//!
//! Clients send loosely structured records. Before they reach the citation
//! engine, every `author` array is filtered down to entries that carry at
//! least one usable name part. Nothing here ever rejects an item: malformed
//! entries are dropped, everything else passes through untouched.

use serde_json::{Map, Value};
use tracing::info;

/// Name parts that make an author entry renderable.
const NAME_FIELDS: [&str; 3] = ["family", "given", "literal"];

/// Author counts for a single item, before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorCounts {
    pub before: usize,
    pub after: usize,
}

impl AuthorCounts {
    /// Whether filtering removed anything.
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Summary of a normalization pass over a request's items.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Number of items received.
    pub items: usize,
    /// Number of author entries retained across all items.
    pub authors: usize,
}

/// Receives bookkeeping events from [`normalize_items`].
pub trait NormalizeObserver {
    /// Called for every item whose author list lost entries.
    fn authors_filtered(&mut self, _id: &str, _counts: AuthorCounts) {}

    /// Called once after all items have been processed.
    fn completed(&mut self, _report: &NormalizeReport) {}
}

/// Observer that reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl NormalizeObserver for TracingObserver {
    fn authors_filtered(&mut self, id: &str, counts: AuthorCounts) {
        info!(
            item = %id,
            before = counts.before,
            after = counts.after,
            "Filtered authors"
        );
    }

    fn completed(&mut self, report: &NormalizeReport) {
        info!(
            items = report.items,
            authors = report.authors,
            "CSL sanitization complete"
        );
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_usable_author(entry: &Value) -> bool {
    entry.as_object().is_some_and(|name| {
        NAME_FIELDS
            .iter()
            .any(|field| name.get(*field).is_some_and(is_truthy))
    })
}

/// Filter the `author` array of a single item in place.
///
/// Returns `None` when the item has no `author` array (absent, null, or
/// some other shape), in which case the item is left as is.
pub fn normalize_item(item: &mut Value) -> Option<AuthorCounts> {
    let Some(Value::Array(authors)) = item.get_mut("author") else {
        return None;
    };

    let before = authors.len();
    authors.retain(is_usable_author);

    Some(AuthorCounts {
        before,
        after: authors.len(),
    })
}

/// Normalize every item of a request, reporting to `observer`.
pub fn normalize_items<O: NormalizeObserver + ?Sized>(
    items: &mut Map<String, Value>,
    observer: &mut O,
) -> NormalizeReport {
    let mut report = NormalizeReport {
        items: items.len(),
        authors: 0,
    };

    for (id, item) in items.iter_mut() {
        if let Some(counts) = normalize_item(item) {
            report.authors += counts.after;
            if counts.changed() {
                observer.authors_filtered(id, counts);
            }
        }
    }

    observer.completed(&report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingObserver {
        filtered: Vec<(String, AuthorCounts)>,
        reports: Vec<NormalizeReport>,
    }

    impl NormalizeObserver for RecordingObserver {
        fn authors_filtered(&mut self, id: &str, counts: AuthorCounts) {
            self.filtered.push((id.to_string(), counts));
        }

        fn completed(&mut self, report: &NormalizeReport) {
            self.reports.push(*report);
        }
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    /// Records covering the shapes clients actually send.
    fn sample_records() -> Vec<Value> {
        vec![
            json!({"title": "T", "author": [{"family": "Doe", "given": "J"}, {}]}),
            json!({"author": [null, {"literal": "WHO"}, "Smith", 3, {"given": ""}]}),
            json!({"author": [{"family": 0}, {"given": false}, {"family": "A"}, []]}),
            json!({"author": null}),
            json!({"author": "Doe, J"}),
            json!({"author": {"family": "Doe"}}),
            json!({"author": []}),
            json!({"title": "No authors"}),
            json!(null),
            json!(["not", "an", "item"]),
            json!({"author": [{"literal": "Org"}, {"suffix": "Jr."}, {"given": "Ann"}]}),
        ]
    }

    #[test]
    fn test_drops_entries_without_name_parts() {
        let mut item = json!({
            "title": "T",
            "author": [{"family": "Doe", "given": "J"}, {}]
        });

        let counts = normalize_item(&mut item).unwrap();

        assert_eq!(counts, AuthorCounts { before: 2, after: 1 });
        assert_eq!(
            item,
            json!({"title": "T", "author": [{"family": "Doe", "given": "J"}]})
        );
    }

    #[test]
    fn test_drops_null_and_non_object_entries() {
        let mut item = json!({"author": [null, "Smith", 3, {"literal": "WHO"}, true]});
        normalize_item(&mut item);
        assert_eq!(item, json!({"author": [{"literal": "WHO"}]}));
    }

    #[test]
    fn test_falsy_name_parts_do_not_count() {
        let mut item = json!({
            "author": [
                {"family": ""},
                {"given": 0},
                {"literal": null},
                {"family": false, "given": "Ann"}
            ]
        });
        normalize_item(&mut item);
        assert_eq!(item, json!({"author": [{"family": false, "given": "Ann"}]}));
    }

    #[test]
    fn test_preserves_order_of_retained_entries() {
        let mut item = json!({
            "author": [
                {"family": "C"},
                {},
                {"family": "A"},
                null,
                {"family": "B"}
            ]
        });
        normalize_item(&mut item);
        assert_eq!(
            item["author"],
            json!([{"family": "C"}, {"family": "A"}, {"family": "B"}])
        );
    }

    #[test]
    fn test_other_fields_pass_through() {
        let mut item = json!({
            "author": [{}],
            "editor": [{}],
            "issued": {"date-parts": [[2020]]},
            "type": "book"
        });
        normalize_item(&mut item);
        assert_eq!(
            item,
            json!({
                "author": [],
                "editor": [{}],
                "issued": {"date-parts": [[2020]]},
                "type": "book"
            })
        );
    }

    #[test]
    fn test_non_array_author_is_untouched() {
        for original in [
            json!({"author": null}),
            json!({"author": "Doe, J"}),
            json!({"author": {"family": "Doe"}}),
            json!({"title": "No authors"}),
            json!(null),
            json!(42),
        ] {
            let mut item = original.clone();
            assert_eq!(normalize_item(&mut item), None);
            assert_eq!(item, original);
        }
    }

    #[test]
    fn test_retained_entries_all_have_a_name_part() {
        for mut record in sample_records() {
            normalize_item(&mut record);
            if let Some(Value::Array(authors)) = record.get("author") {
                for author in authors {
                    assert!(is_usable_author(author), "kept unusable entry {author}");
                }
            }
        }
    }

    #[test]
    fn test_dropped_entries_had_no_name_part() {
        for original in sample_records() {
            let Some(Value::Array(before)) = original.get("author") else {
                continue;
            };
            let dropped = before.iter().filter(|a| !is_usable_author(a)).count();

            let mut record = original.clone();
            let counts = normalize_item(&mut record).unwrap();
            assert_eq!(counts.before - counts.after, dropped);
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for record in sample_records() {
            let mut once = record.clone();
            normalize_item(&mut once);
            let mut twice = once.clone();
            normalize_item(&mut twice);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_items_reports_counts() {
        let mut items = as_map(json!({
            "a1": {"author": [{"family": "Doe"}, {}]},
            "a2": {"author": [{"given": "Ann"}, {"literal": "WHO"}]},
            "a3": {"title": "No authors"}
        }));
        let mut observer = RecordingObserver::default();

        let report = normalize_items(&mut items, &mut observer);

        assert_eq!(report, NormalizeReport { items: 3, authors: 3 });
        assert_eq!(
            observer.filtered,
            vec![("a1".to_string(), AuthorCounts { before: 2, after: 1 })]
        );
        assert_eq!(observer.reports, vec![report]);
        assert_eq!(items["a1"]["author"], json!([{"family": "Doe"}]));
    }

    #[test]
    fn test_normalize_items_empty_mapping() {
        let mut items = Map::new();
        let mut observer = RecordingObserver::default();

        let report = normalize_items(&mut items, &mut observer);

        assert_eq!(report, NormalizeReport::default());
        assert!(observer.filtered.is_empty());
        assert_eq!(observer.reports.len(), 1);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
