//! Food label matching
//!
//! Maps a free-text label from the vision provider onto exactly one entry
//! of the nutrition table, with a score reflecting match quality. Total by
//! construction: the fallback tiers guarantee a result for any input as
//! long as the table is non-empty.

use std::collections::HashSet;

use crate::models::MatchResult;

use super::table::FoodTable;

/// Generic categories tried, in priority order, when nothing else matches
pub const GENERIC_FALLBACKS: [&str; 9] = [
    "salad",
    "pasta",
    "rice",
    "bread",
    "chicken",
    "fish",
    "meat",
    "fruit",
    "vegetable",
];

/// Minimum token-overlap similarity accepted in tier 5
const MIN_OVERLAP_SCORE: f64 = 0.3;

/// Match a raw food label to a canonical table entry
///
/// Tiers, in priority order (higher tiers short-circuit):
/// 1. exact case-insensitive match (1.0)
/// 2. singularized exact match (0.95)
/// 3. whole-word containment, label-contains-key (0.9) or
///    key-contains-singularized-label (0.85)
/// 4. substring containment, key-in-label (0.8) or label-in-key (0.7)
/// 5. best token-overlap similarity above 0.3
/// 6. first generic category present in the table (0.5)
/// 7. the table's designated default entry (0.1)
///
/// Ties inside a tier resolve to the first entry in table insertion order.
/// Returns None only for an empty table.
pub fn match_food(label: &str, table: &FoodTable) -> Option<MatchResult> {
    if table.is_empty() {
        return None;
    }

    let label = label.trim().to_lowercase();

    // Tier 1: exact match
    if table.contains(&label) {
        return Some(MatchResult::new(label, 1.0));
    }

    // Tier 2: singularized form ("apples" -> "apple")
    let singular = singularize(&label);
    if singular != label && table.contains(singular) {
        return Some(MatchResult::new(singular, 0.95));
    }

    // Tier 3: whole-word containment
    if !label.is_empty() {
        for record in table.records() {
            if contains_phrase(&label, &record.name) {
                return Some(MatchResult::new(record.name.clone(), 0.9));
            }
        }
        for record in table.records() {
            if contains_phrase(&record.name, singular) {
                return Some(MatchResult::new(record.name.clone(), 0.85));
            }
        }

        // Tier 4: substring containment
        for record in table.records() {
            if label.contains(&record.name) {
                return Some(MatchResult::new(record.name.clone(), 0.8));
            }
        }
        for record in table.records() {
            if record.name.contains(&label) {
                return Some(MatchResult::new(record.name.clone(), 0.7));
            }
        }
    }

    // Tier 5: token-overlap similarity, first-in-table wins ties
    let mut best: Option<MatchResult> = None;
    for record in table.records() {
        let score = token_overlap(&label, &record.name);
        if score > best.as_ref().map_or(MIN_OVERLAP_SCORE, |b| b.score) {
            best = Some(MatchResult::new(record.name.clone(), score));
        }
    }
    if let Some(result) = best {
        return Some(result);
    }

    // Tier 6: generic category fallback
    for generic in GENERIC_FALLBACKS {
        if table.contains(generic) {
            tracing::debug!("label '{}' fell back to generic category '{}'", label, generic);
            return Some(MatchResult::new(generic, 0.5));
        }
    }

    // Tier 7: designated default entry
    let default = table.default_record()?;
    tracing::warn!("label '{}' matched nothing; using default '{}'", label, default.name);
    Some(MatchResult::new(default.name.clone(), 0.1))
}

/// Strip one trailing "s" ("apples" -> "apple"); never empties the string
fn singularize(label: &str) -> &str {
    match label.strip_suffix('s') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => label,
    }
}

/// Whether `phrase` occurs in `text` as a run of whole words
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let text_words: Vec<&str> = text.split_whitespace().collect();
    let phrase_words: Vec<&str> = phrase.split_whitespace().collect();
    if phrase_words.is_empty() || text_words.len() < phrase_words.len() {
        return false;
    }
    text_words
        .windows(phrase_words.len())
        .any(|window| window == phrase_words.as_slice())
}

/// Word-set overlap: |common| / max(|a words|, |b words|)
fn token_overlap(a: &str, b: &str) -> f64 {
    let a_words: HashSet<&str> = a.split_whitespace().collect();
    let b_words: HashSet<&str> = b.split_whitespace().collect();
    if a_words.is_empty() || b_words.is_empty() {
        return 0.0;
    }
    let common = a_words.intersection(&b_words).count();
    common as f64 / a_words.len().max(b_words.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GiLevel, NutritionRecord};

    fn record(name: &str) -> NutritionRecord {
        NutritionRecord {
            name: name.to_string(),
            carbs: 10.0,
            calories: 100.0,
            protein: 1.0,
            fat: 1.0,
            fiber: 1.0,
            gi: GiLevel::Low,
        }
    }

    #[test]
    fn test_exact_match_scores_one() {
        let table = FoodTable::builtin();
        let result = match_food("apple", &table).unwrap();
        assert_eq!(result, MatchResult::new("apple", 1.0));

        // Case-insensitive
        let result = match_food("Ice Cream", &table).unwrap();
        assert_eq!(result, MatchResult::new("ice cream", 1.0));
    }

    #[test]
    fn test_singular_match() {
        let table = FoodTable::builtin();
        let result = match_food("apples", &table).unwrap();
        assert_eq!(result, MatchResult::new("apple", 0.95));

        let result = match_food("carrots", &table).unwrap();
        assert_eq!(result, MatchResult::new("carrot", 0.95));
    }

    #[test]
    fn test_whole_word_containment() {
        let table = FoodTable::builtin();
        let result = match_food("vegetable salad", &table).unwrap();
        assert_eq!(result, MatchResult::new("salad", 0.9));

        let result = match_food("grilled chicken breast", &table).unwrap();
        assert_eq!(result, MatchResult::new("chicken", 0.9));

        // Multi-word key as a phrase inside the label
        let result = match_food("vanilla ice cream cone", &table).unwrap();
        assert_eq!(result, MatchResult::new("ice cream", 0.9));
    }

    #[test]
    fn test_key_contains_singularized_label() {
        let mut table = FoodTable::empty();
        table.insert(record("fried rice"), None);
        let result = match_food("rices", &table).unwrap();
        assert_eq!(result, MatchResult::new("fried rice", 0.85));
    }

    #[test]
    fn test_substring_containment() {
        let table = FoodTable::builtin();
        // "pineapple" contains "apple" as a substring but not a whole word
        let result = match_food("pineapple", &table).unwrap();
        assert_eq!(result, MatchResult::new("apple", 0.8));

        // Label is a substring of a key
        let result = match_food("ice crea", &table).unwrap();
        assert_eq!(result, MatchResult::new("ice cream", 0.7));
    }

    #[test]
    fn test_token_overlap_similarity() {
        let mut table = FoodTable::empty();
        table.insert(record("chicken noodle soup"), None);
        table.insert(record("tomato soup bowl"), None);

        // Shares "noodle" and "chicken" with the first key: 2/3 overlap
        let result = match_food("chicken pot noodle", &table).unwrap();
        assert_eq!(result.key, "chicken noodle soup");
        assert!((result.score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_token_overlap_tie_breaks_to_first_entry() {
        let mut table = FoodTable::empty();
        table.insert(record("bean stew pot"), None);
        table.insert(record("bean soup pot"), None);
        // "bean pot" overlaps both keys equally (2/3)
        let result = match_food("bean pot dish", &table).unwrap();
        assert_eq!(result.key, "bean stew pot");
    }

    #[test]
    fn test_generic_fallback() {
        let table = FoodTable::builtin();
        let result = match_food("quinoa tabbouleh", &table).unwrap();
        assert_eq!(result, MatchResult::new("salad", 0.5));
    }

    #[test]
    fn test_default_fallback_when_no_generic_present() {
        let mut table = FoodTable::empty();
        table.insert(record("miso soup"), None);
        table.insert(record("lentil curry"), None);
        table.set_default("lentil curry");

        let result = match_food("zzz", &table).unwrap();
        assert_eq!(result, MatchResult::new("lentil curry", 0.1));
    }

    #[test]
    fn test_empty_label_falls_through_to_fallbacks() {
        let table = FoodTable::builtin();
        let result = match_food("", &table).unwrap();
        assert_eq!(result, MatchResult::new("salad", 0.5));
        assert!(table.contains(&result.key));
    }

    #[test]
    fn test_never_returns_absent_key() {
        let table = FoodTable::builtin();
        for label in ["", "x", "sushi platter deluxe", "  ", "123", "s"] {
            let result = match_food(label, &table).unwrap();
            assert!(table.contains(&result.key), "label {:?} -> {:?}", label, result);
            assert!((0.0..=1.0).contains(&result.score));
        }
    }

    #[test]
    fn test_empty_table_returns_none() {
        assert!(match_food("apple", &FoodTable::empty()).is_none());
    }
}
