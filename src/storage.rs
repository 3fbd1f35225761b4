use crate::errors::AppError;
use crate::models::Habit;
use serde_json::Value;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

/// Reads the stored habit list. `None` means "keep what is in memory": the
/// file is missing, unreadable, or does not hold a list of habits.
pub async fn load_habits(path: &Path) -> Option<Vec<Habit>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            error!("failed to read data file: {err}");
            return None;
        }
    };

    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            warn!("ignoring unparseable data file: {err}");
            return None;
        }
    };

    if !value.is_array() {
        warn!("ignoring data file that does not hold a habit list");
        return None;
    }

    match serde_json::from_value(value) {
        Ok(habits) => Some(habits),
        Err(err) => {
            warn!("ignoring malformed habit list: {err}");
            None
        }
    }
}

/// Replaces the data file with the whole collection. The payload goes to a
/// sibling file first and is renamed over the target, so readers never see a
/// partly written list.
pub async fn persist_habits(path: &Path, habits: &[Habit]) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(habits).map_err(AppError::internal)?;
    let staging = staging_path(path);
    fs::write(&staging, payload).await?;
    if let Err(err) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(err.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Target};

    fn sample() -> Vec<Habit> {
        vec![
            Habit {
                id: 1,
                name: "Run".into(),
                icon: "sport".into(),
                target: Target::Text("10".into()),
                days: vec![Day { comment: "5k".into() }, Day { comment: "rain".into() }],
            },
            Habit {
                id: 5,
                name: "Water".into(),
                icon: "water".into(),
                target: Target::Number(8.into()),
                days: Vec::new(),
            },
        ]
    }

    #[tokio::test]
    async fn persisted_collection_loads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.json");

        persist_habits(&path, &sample()).await.unwrap();
        assert_eq!(load_habits(&path).await, Some(sample()));
    }

    #[tokio::test]
    async fn persist_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.json");

        persist_habits(&path, &sample()).await.unwrap();
        persist_habits(&path, &[]).await.unwrap();
        assert_eq!(load_habits(&path).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn persist_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.json");

        persist_habits(&path, &sample()).await.unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("habits.json")]);
    }

    #[tokio::test]
    async fn failed_replace_keeps_target_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("habits.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        assert!(persist_habits(&target, &sample()).await.is_err());
        assert!(target.join("keep").exists());
        assert!(!staging_path(&target).exists());
    }

    #[tokio::test]
    async fn missing_file_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_habits(&dir.path().join("absent.json")).await, None);
    }

    #[tokio::test]
    async fn non_list_contents_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.json");

        for contents in ["not json", "{\"id\":1}", "null", "42", "[{\"id\":\"x\"}]"] {
            std::fs::write(&path, contents).unwrap();
            assert_eq!(load_habits(&path).await, None, "{contents}");
        }
    }
}
