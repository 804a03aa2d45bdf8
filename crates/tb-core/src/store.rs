use std::collections::HashMap;

use crate::error::StoreError;
use crate::template::{RecordId, Template, TemplateRecord, TemplateSet};

/// Persistence port for the template buffer.
pub trait TemplateStore {
    /// Every persisted template, locator bound, in listing order.
    fn load_all(&self) -> Result<TemplateSet, StoreError>;

    /// One record by id, or `None` if it does not exist.
    fn get(&self, id: &RecordId) -> Result<Option<Template>, StoreError>;

    /// Overwrite the record at `template.locator`, or allocate a fresh id and
    /// bind it when the locator is unset. Returns the record id written.
    fn save(&mut self, template: &mut Template) -> Result<RecordId, StoreError>;
}

/// First id at or after `count` that `exists` reports as free.
pub fn next_free_id(count: usize, exists: impl Fn(&RecordId) -> bool) -> RecordId {
    let mut n = count as u64;
    loop {
        let id = RecordId::from_index(n);
        if !exists(&id) {
            return id;
        }
        n += 1;
    }
}

pub(crate) fn check_saveable(template: &Template) -> Result<(), StoreError> {
    template.validate().map_err(StoreError::InvalidTemplate)
}

/// In-process store with the same id policy as the directory store.
#[derive(Default)]
pub struct MemoryStore {
    records: HashMap<RecordId, TemplateRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Seed a record under an explicit id.
    pub fn insert(&mut self, id: RecordId, title: &str, content: &str) {
        self.records.insert(
            id,
            TemplateRecord {
                title: title.to_string(),
                content: content.to_string(),
            },
        );
    }
}

impl TemplateStore for MemoryStore {
    fn load_all(&self) -> Result<TemplateSet, StoreError> {
        let mut ids: Vec<&RecordId> = self.records.keys().collect();
        ids.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        Ok(ids
            .into_iter()
            .map(|id| self.records[id].clone().into_template(id.clone()))
            .collect())
    }

    fn get(&self, id: &RecordId) -> Result<Option<Template>, StoreError> {
        Ok(self
            .records
            .get(id)
            .map(|r| r.clone().into_template(id.clone())))
    }

    fn save(&mut self, template: &mut Template) -> Result<RecordId, StoreError> {
        check_saveable(template)?;
        let id = match &template.locator {
            Some(id) => id.clone(),
            None => next_free_id(self.records.len(), |id| self.records.contains_key(id)),
        };
        self.records.insert(id.clone(), template.to_record());
        template.locator = Some(id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_free_id_skips_taken() {
        let taken = ["2", "3"];
        let id = next_free_id(2, |id| taken.contains(&id.as_str()));
        assert_eq!(id.as_str(), "4");
        assert_eq!(next_free_id(0, |_| false).as_str(), "0");
    }

    #[test]
    fn test_save_new_binds_locator() {
        let mut store = MemoryStore::new();
        let mut t = Template::new("Title", "Body");
        let id = store.save(&mut t).unwrap();
        assert_eq!(id.as_str(), "0");
        assert_eq!(t.locator, Some(id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_existing_overwrites() {
        let mut store = MemoryStore::new();
        store.insert(RecordId::new("0"), "Old", "old body");

        let mut t = Template::new("New", "new body").with_locator(RecordId::new("0"));
        store.save(&mut t).unwrap();

        assert_eq!(store.len(), 1);
        let loaded = store.get(&RecordId::new("0")).unwrap().unwrap();
        assert_eq!(loaded.title, "New");
        assert_eq!(loaded.content, "new body");
    }

    #[test]
    fn test_new_id_does_not_collide_after_gap() {
        let mut store = MemoryStore::new();
        store.insert(RecordId::new("1"), "A", "a");
        let mut t = Template::new("B", "b");
        let id = store.save(&mut t).unwrap();
        assert_eq!(id.as_str(), "2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_rejects_empty_content() {
        let mut store = MemoryStore::new();
        let mut t = Template::new("Title", "   ");
        assert!(matches!(
            store.save(&mut t),
            Err(StoreError::InvalidTemplate(_))
        ));
        assert!(store.is_empty());
        assert!(t.locator.is_none());
    }

    #[test]
    fn test_load_all_order() {
        let mut store = MemoryStore::new();
        store.insert(RecordId::new("10"), "ten", "x");
        store.insert(RecordId::new("9"), "nine", "x");
        store.insert(RecordId::new("custom"), "named", "x");
        let titles: Vec<String> = store.load_all().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["nine", "ten", "named"]);
    }
}
