//! One-hot encoding
//!
//! Each categorical column expands into one binary column per category level
//! seen during fitting. Levels are kept sorted so the column order does not
//! depend on row order. A label outside the fitted levels sets no column.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fitted levels of one categorical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLevels {
    /// Column name
    pub column: String,
    /// Distinct training labels, sorted
    pub levels: Vec<String>,
}

impl CategoryLevels {
    /// Collect the sorted distinct labels of a column.
    pub fn fit<'a>(column: impl Into<String>, labels: impl IntoIterator<Item = &'a str>) -> Self {
        let levels: BTreeSet<&str> = labels.into_iter().collect();
        Self {
            column: column.into(),
            levels: levels.into_iter().map(str::to_string).collect(),
        }
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.levels.len()
    }

    /// Position of a label among the levels, `None` for unknown labels.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.levels
            .binary_search_by(|level| level.as_str().cmp(label))
            .ok()
    }

    /// Write the one-hot block for `label` into `out` (length = `width()`).
    ///
    /// Returns false when the label is unknown; `out` is then left all zero.
    pub fn encode_into(&self, label: &str, out: &mut [f64]) -> bool {
        out.fill(0.0);
        match self.position(label) {
            Some(idx) => {
                out[idx] = 1.0;
                true
            }
            None => false,
        }
    }

    /// Output column names, `<column>_<level>`.
    pub fn feature_names(&self) -> impl Iterator<Item = String> + '_ {
        self.levels
            .iter()
            .map(move |level| format!("{}_{}", self.column, level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_sorted_and_distinct() {
        let levels = CategoryLevels::fit("Roast_Level", ["Medium", "Dark", "Light", "Dark"]);
        assert_eq!(levels.levels, vec!["Dark", "Light", "Medium"]);
        assert_eq!(levels.width(), 3);
    }

    #[test]
    fn test_encode_known_and_unknown() {
        let levels = CategoryLevels::fit("Roast_Level", ["Medium", "Dark", "Light"]);
        let mut out = [9.0; 3];

        assert!(levels.encode_into("Light", &mut out));
        assert_eq!(out, [0.0, 1.0, 0.0]);

        assert!(!levels.encode_into("Espresso", &mut out));
        assert_eq!(out, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_feature_names() {
        let levels = CategoryLevels::fit("Bean_Origin", ["Kenya", "Brazil"]);
        let names: Vec<_> = levels.feature_names().collect();
        assert_eq!(names, vec!["Bean_Origin_Brazil", "Bean_Origin_Kenya"]);
    }
}
