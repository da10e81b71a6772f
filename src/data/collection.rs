use log::info;

use super::model::RawFile;

/// Ordered set of imported files. Index = import order; removing a file
/// shifts every later file down by one.
#[derive(Debug, Default)]
pub struct FileCollection {
    files: Vec<RawFile>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a parsed file and return its index.
    pub fn add(&mut self, file: RawFile) -> usize {
        self.files.push(file);
        self.files.len() - 1
    }

    /// Remove and return the file at `index`, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<RawFile> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        info!("Removed file {index} ({})", removed.name());
        Some(removed)
    }

    pub fn get(&self, index: usize) -> Option<&RawFile> {
        self.files.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
