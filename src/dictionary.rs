// Dictionary Resolver - raw name → display alias and category
//
// Pure, total lookups over a dictionary snapshot. Every aggregator goes
// through these two functions so alias and category views can never
// disagree.

use crate::model::{canonical_category, Dictionary, DictionaryEntry, OTHER_CATEGORY};

/// Display alias for a raw product name; the raw name itself when the
/// dictionary has no entry.
pub fn resolve_alias<'a>(name: &'a str, dictionary: &'a Dictionary) -> &'a str {
    dictionary.get(name).map(|e| e.alias.as_str()).unwrap_or(name)
}

/// Category for a raw product name, collapsed onto the closed set.
/// Unknown names and unrecognized stored labels both read as `Other`.
pub fn resolve_category(name: &str, dictionary: &Dictionary) -> &'static str {
    dictionary
        .get(name)
        .map(|e| canonical_category(&e.category))
        .unwrap_or(OTHER_CATEGORY)
}

/// Sorted, deduplicated list of every alias in the dictionary — the
/// product catalog the trend view selects from.
pub fn unique_aliases(dictionary: &Dictionary) -> Vec<String> {
    let mut aliases: Vec<String> = dictionary.values().map(|e| e.alias.clone()).collect();
    aliases.sort();
    aliases.dedup();
    aliases
}

/// Build the single-entry merge patch for editing one dictionary entry.
/// The patch touches only this key; the store merges it, never replacing
/// the whole document.
pub fn edit_patch(name: &str, entry: DictionaryEntry) -> Dictionary {
    let mut patch = Dictionary::new();
    patch.insert(name.to_string(), entry);
    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dictionary() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert(
            "LECHE ENT 1L".to_string(),
            DictionaryEntry::new("Milk", "Dairy"),
        );
        dict.insert(
            "LECHE DESN 1L".to_string(),
            DictionaryEntry::new("Milk", "Dairy"),
        );
        dict.insert(
            "MISTERY ITEM".to_string(),
            DictionaryEntry::new("Mystery", "Lácteos"),
        );
        dict
    }

    #[test]
    fn test_resolve_alias_falls_back_to_raw_name() {
        let dict = sample_dictionary();
        assert_eq!(resolve_alias("LECHE ENT 1L", &dict), "Milk");
        assert_eq!(resolve_alias("unknown", &dict), "unknown");
    }

    #[test]
    fn test_resolve_category_collapses_unknown_labels() {
        let dict = sample_dictionary();
        assert_eq!(resolve_category("LECHE ENT 1L", &dict), "Dairy");
        // Stored label outside the closed set reads as Other.
        assert_eq!(resolve_category("MISTERY ITEM", &dict), OTHER_CATEGORY);
        // Missing entry reads as Other too.
        assert_eq!(resolve_category("unknown", &dict), OTHER_CATEGORY);
    }

    #[test]
    fn test_unique_aliases_sorted_and_deduplicated() {
        let dict = sample_dictionary();
        assert_eq!(unique_aliases(&dict), vec!["Milk", "Mystery"]);
    }

    #[test]
    fn test_edit_patch_touches_single_key() {
        let patch = edit_patch("LECHE ENT 1L", DictionaryEntry::new("Whole Milk", "Dairy"));
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["LECHE ENT 1L"].alias, "Whole Milk");
    }
}
