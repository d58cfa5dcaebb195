//! Location ID sets, partitioned by examination type.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ExaminationType, LocationId};

/// Known examination sites for each examination type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSets {
    #[serde(default)]
    pub kunskapsprov: Vec<LocationId>,

    #[serde(default, alias = "körprov")]
    pub korprov: Vec<LocationId>,
}

impl LocationSets {
    /// Location IDs to poll for the given examination type.
    pub fn ids(&self, exam: ExaminationType) -> &[LocationId] {
        match exam {
            ExaminationType::Kunskapsprov => &self.kunskapsprov,
            ExaminationType::Korprov => &self.korprov,
        }
    }

    fn ids_mut(&mut self, exam: ExaminationType) -> &mut Vec<LocationId> {
        match exam {
            ExaminationType::Kunskapsprov => &mut self.kunskapsprov,
            ExaminationType::Korprov => &mut self.korprov,
        }
    }

    /// Add IDs for an examination type, keeping the list sorted and unique.
    ///
    /// Returns how many IDs were not already present.
    pub fn merge(&mut self, exam: ExaminationType, ids: impl IntoIterator<Item = LocationId>) -> usize {
        let list = self.ids_mut(exam);
        let before = list.len();
        list.extend(ids);
        list.sort_unstable();
        list.dedup();
        list.len() - before
    }

    /// Load a location-set JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::config(format!("Cannot read location file {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load a location-set JSON file, or an empty set if it does not exist.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Result<Self> {
        match tokio::fs::read(path.as_ref()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write the sets as pretty JSON (temp file, then rename).
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}
