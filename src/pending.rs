//! The ordered list of artwork items waiting to be submitted.
//!
//! Order is insertion order, and it is exactly the order in which images and
//! roles are sent to the composition endpoint.

use crate::error::FlyerError;
use crate::role::PanelRole;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a thumbnail for a pending item can be shown from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Preview {
    /// The picked file itself, on disk.
    Path(PathBuf),
    /// Inline `data:` URI (server-extracted panels, in-memory files).
    DataUri(String),
}

/// One artwork image with its panel role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFile {
    pub name: String,
    /// File contents, standard base64.
    pub content: String,
    pub role: PanelRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

/// Insertion-ordered list of [`PendingFile`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFiles {
    items: Vec<PendingFile>,
}

impl PendingFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, file: PendingFile) {
        self.items.push(file);
    }

    pub fn get(&self, index: usize) -> Option<&PendingFile> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingFile> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[PendingFile] {
        &self.items
    }

    /// Change the role of the item at `index`.
    pub fn set_role(&mut self, index: usize, role: PanelRole) -> Result<(), FlyerError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(FlyerError::IndexOutOfRange { index, len })?;
        item.role = role;
        Ok(())
    }

    /// Remove the item at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<PendingFile, FlyerError> {
        if index >= self.items.len() {
            return Err(FlyerError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Contents in submission order.
    pub fn contents(&self) -> Vec<String> {
        self.items.iter().map(|f| f.content.clone()).collect()
    }

    /// Roles in submission order, parallel to [`Self::contents`].
    pub fn roles(&self) -> Vec<PanelRole> {
        self.items.iter().map(|f| f.role).collect()
    }
}

impl<'a> IntoIterator for &'a PendingFiles {
    type Item = &'a PendingFile;
    type IntoIter = std::slice::Iter<'a, PendingFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
