use std::fs;
use std::path::{Path, PathBuf};

use tb_core::{RecordId, StoreError, Template, TemplateRecord, TemplateSet, TemplateStore, next_free_id};

const RECORD_EXT: &str = "json";

/// Templates persisted as one `<id>.json` file each under a single directory.
///
/// Layout:
/// ```text
/// thought_templates/
/// ├── 0.json   {"title": "...", "content": "..."}
/// ├── 1.json
/// └── ...
/// ```
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `id`. Ids that would resolve outside the directory are
    /// rejected.
    pub fn record_path(&self, id: &RecordId) -> Result<PathBuf, StoreError> {
        if !id.is_plain() {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.{RECORD_EXT}")))
    }

    /// Ids of every record file, in listing order. A directory removed since
    /// `open` is recreated empty.
    pub fn record_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let entries = fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                tracing::warn!("skipping non-record entry {}", path.display());
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(RecordId::new) {
                Some(id) if id.is_plain() => ids.push(id),
                _ => tracing::warn!("skipping unnamed record {}", path.display()),
            }
        }

        ids.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        Ok(ids)
    }

    fn read_record(&self, id: &RecordId) -> Result<Template, StoreError> {
        let path = self.record_path(id)?;
        let bytes = fs::read(&path).map_err(|e| io_error(&path, e))?;
        parse_record(id, &bytes)
    }

    fn write_record(&self, id: &RecordId, template: &Template) -> Result<(), StoreError> {
        let path = self.record_path(id)?;
        let json = serde_json::to_string_pretty(&template.to_record()).map_err(|e| {
            StoreError::InvalidTemplate(format!("failed to serialize '{}': {e}", template.title))
        })?;

        let tmp = path.with_extension(format!("{RECORD_EXT}.tmp"));
        fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(&path, e));
        }
        Ok(())
    }
}

impl TemplateStore for DirStore {
    fn load_all(&self) -> Result<TemplateSet, StoreError> {
        let ids = self.record_ids()?;
        let templates = ids
            .iter()
            .map(|id| self.read_record(id))
            .collect::<Result<TemplateSet, _>>()?;
        tracing::debug!(
            count = templates.len(),
            "loaded templates from {}",
            self.dir.display()
        );
        Ok(templates)
    }

    fn get(&self, id: &RecordId) -> Result<Option<Template>, StoreError> {
        if !self.record_path(id)?.is_file() {
            return Ok(None);
        }
        self.read_record(id).map(Some)
    }

    fn save(&mut self, template: &mut Template) -> Result<RecordId, StoreError> {
        template.validate().map_err(StoreError::InvalidTemplate)?;

        let id = match &template.locator {
            Some(id) => id.clone(),
            None => {
                let count = self.record_ids()?.len();
                next_free_id(count, |id| self.dir.join(format!("{id}.{RECORD_EXT}")).exists())
            }
        };

        self.write_record(&id, template)?;
        template.locator = Some(id.clone());
        tracing::debug!("wrote record {id} in {}", self.dir.display());
        Ok(id)
    }
}

/// Decode one record. Invalid UTF-8, malformed JSON, missing fields, and
/// blank title or content are all corruption.
fn parse_record(id: &RecordId, bytes: &[u8]) -> Result<Template, StoreError> {
    let record: TemplateRecord = serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        record: id.to_string(),
        reason: e.to_string(),
    })?;
    let template = record.into_template(id.clone());
    template.validate().map_err(|reason| StoreError::Corrupt {
        record: id.to_string(),
        reason,
    })?;
    Ok(template)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
