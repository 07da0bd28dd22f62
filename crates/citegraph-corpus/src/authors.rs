//! Author list normalization.
//!
//! Database exports write authors as "Lastname, Firstname" entries separated
//! by semicolons. The corpus stores "Firstname Lastname" entries separated by
//! commas.

/// Convert `"Lovelace, Ada; Babbage, Charles"` to `"Ada Lovelace,Charles Babbage"`.
///
/// An entry without a comma is kept as is. An entry with more than one comma
/// cannot be split reliably and is dropped. Returns `None` when no author is
/// left.
pub fn normalize_authors(raw: &str) -> Option<String> {
    let names: Vec<String> = raw
        .split(';')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [name] if !name.is_empty() => Some((*name).to_string()),
                [last, first] => {
                    let full = format!("{first} {last}");
                    let full = full.trim();
                    (!full.is_empty()).then(|| full.to_string())
                }
                _ => None,
            }
        })
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_first_pairs() {
        assert_eq!(
            normalize_authors("Lovelace, Ada; Babbage, Charles").as_deref(),
            Some("Ada Lovelace,Charles Babbage")
        );
    }

    #[test]
    fn single_name_kept() {
        assert_eq!(normalize_authors("Plato").as_deref(), Some("Plato"));
        assert_eq!(
            normalize_authors("Consortium X; Doe, Jane").as_deref(),
            Some("Consortium X,Jane Doe")
        );
    }

    #[test]
    fn ambiguous_entries_dropped() {
        assert_eq!(
            normalize_authors("Smith, John, Jr.; Doe, Jane").as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(normalize_authors("a, b, c"), None);
    }

    #[test]
    fn blanks() {
        assert_eq!(normalize_authors(""), None);
        assert_eq!(normalize_authors(" ; ;"), None);
        assert_eq!(normalize_authors("Doe, "), Some("Doe".to_string()));
    }
}
