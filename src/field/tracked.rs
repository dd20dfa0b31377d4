//! The viewer-owned mapping from field id to field.
//!
//! Keeps insertion order for export and an id index for O(1) lookup.

use super::PdfField;
use crate::error::FieldError;
use crate::types::FieldId;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct TrackedFields {
    fields: Vec<PdfField>,
    index: HashMap<FieldId, usize>,
}

impl TrackedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: PdfField) -> Result<(), FieldError> {
        if self.index.contains_key(&field.id) {
            return Err(FieldError::DuplicateId(field.id));
        }
        self.index.insert(field.id.clone(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    /// Remove a field, returning it if it was tracked.
    pub fn remove(&mut self, id: &FieldId) -> Option<PdfField> {
        let position = self.index.remove(id)?;
        let field = self.fields.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(field)
    }

    pub fn get(&self, id: &FieldId) -> Option<&PdfField> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    /// Run `edit` on a tracked field. The field keeps its id whatever the
    /// closure does to it.
    pub fn edit<R>(&mut self, id: &FieldId, edit: impl FnOnce(&mut PdfField) -> R) -> Option<R> {
        let i = *self.index.get(id)?;
        let field = self.fields.get_mut(i)?;
        let result = edit(field);
        field.id.clone_from(id);
        Some(result)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.index.contains_key(id)
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PdfField> {
        self.fields.iter()
    }

    pub fn on_page(&self, page: usize) -> impl Iterator<Item = &PdfField> {
        self.fields.iter().filter(move |f| f.page() == page)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.index.clear();
    }
}
