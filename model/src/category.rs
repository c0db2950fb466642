//! Manually authored categories and their sample documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::validation::validate_category_name;

/// Samples each category needs before training may start.
pub const MIN_SAMPLES_PER_CATEGORY: usize = 3;

pub const NOT_READY_MESSAGE: &str = "Each category needs at least 3 sample documents.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Exemplar doc ids, in the order they were marked.
    pub sample_doc_ids: Vec<String>,
}

impl Category {
    pub fn is_ready(&self) -> bool {
        self.sample_doc_ids.len() >= MIN_SAMPLES_PER_CATEGORY
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready { categories: usize, samples: usize },
    NotReady { message: &'static str },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }
}

/// The category list of the "new categories" wizard step plus the pointer to
/// the category being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBoard {
    categories: Vec<Category>,
    editing: Option<String>,
    next_seq: u64,
}

impl CategoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn editing(&self) -> Option<&Category> {
        self.editing.as_deref().and_then(|id| self.get(id))
    }

    pub fn select_for_edit(&mut self, id: &str) {
        if self.get(id).is_some() {
            self.editing = Some(id.to_string());
        }
    }

    /// Adds a category and selects it for editing. Returns its id.
    pub fn add(&mut self, name: &str) -> ModelResult<String> {
        let name = validate_category_name(name)?;
        self.next_seq += 1;
        let id = format!("cat_{}", self.next_seq);
        self.categories.push(Category { id: id.clone(), name: name.to_string(), sample_doc_ids: Vec::new() });
        self.editing = Some(id.clone());
        Ok(id)
    }

    /// Renames a category; blank names are ignored.
    pub fn rename(&mut self, id: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(c) = self.categories.iter_mut().find(|c| c.id == id) {
            c.name = name.to_string();
        }
    }

    pub fn delete(&mut self, id: &str) {
        self.categories.retain(|c| c.id != id);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
    }

    pub fn toggle_sample(&mut self, id: &str, doc_id: &str) {
        if let Some(c) = self.categories.iter_mut().find(|c| c.id == id) {
            if let Some(pos) = c.sample_doc_ids.iter().position(|d| d == doc_id) {
                c.sample_doc_ids.remove(pos);
            } else {
                c.sample_doc_ids.push(doc_id.to_string());
            }
        }
    }

    pub fn total_samples(&self) -> usize {
        self.categories.iter().map(|c| c.sample_doc_ids.len()).sum()
    }

    pub fn readiness(&self) -> Readiness {
        if !self.categories.is_empty() && self.categories.iter().all(Category::is_ready) {
            Readiness::Ready { categories: self.categories.len(), samples: self.total_samples() }
        } else {
            Readiness::NotReady { message: NOT_READY_MESSAGE }
        }
    }

    /// `{ name: [doc ids] }` as sent to the training endpoint.
    pub fn training_structure(&self) -> BTreeMap<String, Vec<String>> {
        self.categories.iter().map(|c| (c.name.clone(), c.sample_doc_ids.clone())).collect()
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.editing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    fn board_with(samples: &[&[&str]]) -> CategoryBoard {
        let mut b = CategoryBoard::new();
        for (i, docs) in samples.iter().enumerate() {
            let id = b.add(&format!("cat {}", i)).unwrap();
            for d in *docs {
                b.toggle_sample(&id, d);
            }
        }
        b
    }

    #[test]
    fn readiness_threshold() {
        let mut b = board_with(&[&["1", "2", "3"], &["1", "2"]]);
        assert_eq!(b.readiness(), Readiness::NotReady { message: NOT_READY_MESSAGE });
        let second = b.categories()[1].id.clone();
        b.toggle_sample(&second, "3");
        assert_eq!(b.readiness(), Readiness::Ready { categories: 2, samples: 6 });
    }

    #[test]
    fn empty_board_is_not_ready() {
        assert!(!CategoryBoard::new().readiness().is_ready());
    }

    #[test]
    fn add_rejects_blank_names_and_selects_new_one() {
        let mut b = CategoryBoard::new();
        assert!(matches!(b.add("   "), Err(ModelError::Validation { .. })));
        let id = b.add("  Tax  ").unwrap();
        assert_eq!(b.editing().unwrap().name, "Tax");
        assert_eq!(b.get(&id).unwrap().name, "Tax");
    }

    #[test]
    fn ids_are_unique() {
        let mut b = CategoryBoard::new();
        let a = b.add("a").unwrap();
        b.delete(&a);
        let c = b.add("a").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn delete_clears_edit_pointer() {
        let mut b = CategoryBoard::new();
        let a = b.add("a").unwrap();
        let c = b.add("c").unwrap();
        b.select_for_edit(&a);
        b.delete(&c);
        assert_eq!(b.editing().unwrap().id, a);
        b.delete(&a);
        assert!(b.editing().is_none());
        assert!(b.categories().is_empty());
    }

    #[test]
    fn rename_ignores_blank() {
        let mut b = CategoryBoard::new();
        let a = b.add("old").unwrap();
        b.rename(&a, " ");
        assert_eq!(b.get(&a).unwrap().name, "old");
        b.rename(&a, " new ");
        assert_eq!(b.get(&a).unwrap().name, "new");
    }

    #[test]
    fn toggle_sample_keeps_order() {
        let mut b = board_with(&[&["9", "4", "7"]]);
        let id = b.categories()[0].id.clone();
        b.toggle_sample(&id, "4");
        assert_eq!(b.categories()[0].sample_doc_ids, vec!["9", "7"]);
        let s = b.training_structure();
        assert_eq!(s["cat 0"], vec!["9".to_string(), "7".to_string()]);
    }
}
