use log::{error, info, warn};
use tokio::fs;

use crate::combos::Combo;

/// Reads the combo list dumped by the spreadsheet scraper.
///
/// A missing or corrupted file yields an empty list: the `2tc` command then
/// answers that no combo matches instead of failing.
#[derive(Clone)]
pub struct ComboLoader {
    /// Path to the JSON file holding the combos
    path: String,
}

impl ComboLoader {
    pub fn new(path: String) -> Self {
        ComboLoader { path }
    }

    /// Loads every combo, ordered by combo number.
    ///
    /// The file is read on every call so that a refreshed dump is picked up
    /// without restarting the bot.
    pub async fn load(&self) -> Vec<Combo> {
        let Ok(serialized_combos) = fs::read_to_string(&self.path).await else {
            warn!("no combos file found at {}", self.path);
            return Vec::new();
        };

        let mut combos: Vec<Combo> = match serde_json::from_str(&serialized_combos) {
            Ok(combos) => combos,
            Err(e) => {
                error!("failed to deserialize combos from {}: {}", self.path, e);
                return Vec::new();
            }
        };
        combos.sort_by_key(|combo| combo.number);

        info!("loaded {} combos", combos.len());
        combos
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_nonexistent_file_returns_empty_list() {
        let loader = ComboLoader::new("nonexistent_combos.json".to_string());
        assert!(loader.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupted_file_returns_empty_list() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{{ not json").unwrap();
        let loader = ComboLoader::new(temp_file.path().to_str().unwrap().to_string());

        assert!(loader.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_sorts_by_number() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"[
                {{"number": 2, "towers": [{{"name": "Obyn", "id": "obyn"}}, {{"name": "Crossbow Master", "id": "dart_monkey", "upgrade": "0-0-5"}}], "version": "30.0", "maps": {{}}}},
                {{"number": 1, "towers": [{{"name": "Gwendolin", "id": "gwen"}}, {{"name": "Sun Avatar", "id": "super_monkey", "upgrade": "3-0-0"}}], "version": "22.1", "maps": {{}}}}
            ]"#
        )
        .unwrap();
        let loader = ComboLoader::new(temp_file.path().to_str().unwrap().to_string());

        let combos = loader.load().await;
        assert_eq!(combos.iter().map(|c| c.number).collect::<Vec<_>>(), vec![1, 2]);
    }
}
