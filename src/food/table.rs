//! Static nutrition table
//!
//! A small fixed lookup table of per-100g nutrition records plus standard
//! portion masses. Loaded once at startup and never mutated. Iteration
//! order is insertion order, which keeps matcher tie-breaking
//! deterministic.

use std::collections::HashMap;

use crate::models::{GiLevel, NutritionRecord};

/// The nutrition lookup table
#[derive(Debug, Clone)]
pub struct FoodTable {
    records: Vec<NutritionRecord>,
    index: HashMap<String, usize>,
    portions: HashMap<String, f64>,
    default_key: Option<String>,
}

impl FoodTable {
    /// Create an empty table (useful for tests and custom tables)
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            portions: HashMap::new(),
            default_key: None,
        }
    }

    /// Insert a record, optionally with a standard portion mass in grams
    ///
    /// Names are normalized to lowercase. Re-inserting an existing name
    /// replaces the record but keeps its position in iteration order.
    pub fn insert(&mut self, mut record: NutritionRecord, standard_portion: Option<f64>) {
        record.name = record.name.trim().to_lowercase();
        let name = record.name.clone();
        match self.index.get(&name) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(name.clone(), self.records.len());
                self.records.push(record);
            }
        }
        if let Some(grams) = standard_portion {
            self.portions.insert(name, grams);
        }
    }

    /// Designate the explicit last-resort fallback entry for the matcher
    pub fn set_default(&mut self, key: &str) {
        self.default_key = Some(key.trim().to_lowercase());
    }

    /// Look up a record by canonical name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&NutritionRecord> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All records in insertion order
    pub fn records(&self) -> &[NutritionRecord] {
        &self.records
    }

    /// Standard portion mass in grams for a canonical food, if known
    pub fn standard_portion(&self, name: &str) -> Option<f64> {
        self.portions.get(&name.trim().to_lowercase()).copied()
    }

    /// The designated default record, falling back to the first entry
    ///
    /// Returns None only for an empty table.
    pub fn default_record(&self) -> Option<&NutritionRecord> {
        self.default_key
            .as_deref()
            .and_then(|key| self.get(key))
            .or_else(|| self.records.first())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The built-in 20-entry table with standard portions
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        let entries: [(&str, f64, f64, f64, f64, f64, GiLevel, f64); 20] = [
            // name, carbs, calories, protein, fat, fiber, gi, standard portion (g)
            ("apple", 14.0, 52.0, 0.3, 0.2, 2.4, GiLevel::Low, 150.0),
            ("banana", 23.0, 89.0, 1.1, 0.3, 2.6, GiLevel::Medium, 120.0),
            ("orange", 12.0, 47.0, 0.9, 0.1, 2.4, GiLevel::Low, 150.0),
            ("pizza", 33.0, 266.0, 11.0, 10.0, 2.5, GiLevel::High, 100.0),
            ("burger", 40.0, 354.0, 20.0, 17.0, 3.0, GiLevel::High, 250.0),
            ("rice", 28.0, 130.0, 2.7, 0.3, 0.4, GiLevel::High, 150.0),
            ("pasta", 25.0, 131.0, 5.0, 1.1, 1.8, GiLevel::Medium, 140.0),
            ("bread", 14.0, 74.0, 2.6, 1.0, 1.3, GiLevel::High, 30.0),
            ("salad", 3.0, 20.0, 1.2, 0.2, 1.8, GiLevel::Low, 150.0),
            ("chicken", 0.0, 165.0, 31.0, 3.6, 0.0, GiLevel::Low, 85.0),
            ("fish", 0.0, 136.0, 22.0, 5.0, 0.0, GiLevel::Low, 85.0),
            ("steak", 0.0, 271.0, 26.0, 19.0, 0.0, GiLevel::Low, 85.0),
            ("broccoli", 6.0, 34.0, 2.8, 0.4, 2.6, GiLevel::Low, 90.0),
            ("carrot", 10.0, 41.0, 0.9, 0.2, 2.8, GiLevel::Medium, 70.0),
            ("potato", 17.0, 77.0, 2.0, 0.1, 2.2, GiLevel::High, 150.0),
            ("yogurt", 7.0, 59.0, 3.5, 3.3, 0.0, GiLevel::Low, 150.0),
            ("cheese", 1.3, 402.0, 25.0, 33.0, 0.0, GiLevel::Low, 30.0),
            ("egg", 0.6, 155.0, 13.0, 11.0, 0.0, GiLevel::Low, 50.0),
            ("chocolate", 60.0, 546.0, 4.9, 31.0, 7.0, GiLevel::Medium, 40.0),
            ("ice cream", 24.0, 207.0, 3.5, 11.0, 0.5, GiLevel::Medium, 65.0),
        ];

        for (name, carbs, calories, protein, fat, fiber, gi, portion) in entries {
            table.insert(
                NutritionRecord {
                    name: name.to_string(),
                    carbs,
                    calories,
                    protein,
                    fat,
                    fiber,
                    gi,
                },
                Some(portion),
            );
        }

        // Explicit last-resort fallback (first insertion, made deterministic)
        table.set_default("apple");
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_contents() {
        let table = FoodTable::builtin();
        assert_eq!(table.len(), 20);

        let apple = table.get("apple").unwrap();
        assert_eq!(apple.carbs, 14.0);
        assert_eq!(apple.calories, 52.0);
        assert_eq!(apple.gi, GiLevel::Low);

        assert_eq!(table.standard_portion("bread"), Some(30.0));
        assert_eq!(table.standard_portion("ice cream"), Some(65.0));
        assert_eq!(table.standard_portion("no such food"), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = FoodTable::builtin();
        assert!(table.contains("Apple"));
        assert!(table.contains("  ICE CREAM "));
        assert!(!table.contains("sushi"));
    }

    #[test]
    fn test_default_record_is_designated() {
        let table = FoodTable::builtin();
        assert_eq!(table.default_record().unwrap().name, "apple");

        let mut custom = FoodTable::empty();
        custom.insert(
            NutritionRecord {
                name: "lentils".to_string(),
                carbs: 20.0,
                calories: 116.0,
                protein: 9.0,
                fat: 0.4,
                fiber: 7.9,
                gi: GiLevel::Low,
            },
            None,
        );
        // No designated default: first entry stands in
        assert_eq!(custom.default_record().unwrap().name, "lentils");
        assert!(FoodTable::empty().default_record().is_none());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let table = FoodTable::builtin();
        assert_eq!(table.records()[0].name, "apple");
        assert_eq!(table.records()[19].name, "ice cream");
    }
}
