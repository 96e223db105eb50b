use std::{
    fs::{self, OpenOptions},
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

pub const DEFAULT_SCORE_FILE: &str = "./data/best_score.txt";

/// Append-only store of best scores, one integer per line.
///
/// The best score is the last value written; earlier lines are history.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    /// Reads the last written score, or 0 when nothing has been stored yet.
    pub fn load(&self) -> anyhow::Result<u32> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read score file: {}", self.path.display())
                });
            }
        };
        let Some(last) = content.lines().map(str::trim).rfind(|line| !line.is_empty()) else {
            return Ok(0);
        };
        last.parse().with_context(|| {
            format!(
                "Malformed score in {}: {last:?}",
                self.path.display()
            )
        })
    }

    pub fn append(&self, score: u32) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open score file: {}", self.path.display()))?;
        writeln!(file, "{score}")
            .with_context(|| format!("Failed to write score file: {}", self.path.display()))?;
        Ok(())
    }

    /// Appends `score` if it beats the stored best. Returns whether it did.
    pub fn record_if_better(&self, score: u32) -> anyhow::Result<bool> {
        if score <= self.load()? {
            return Ok(false);
        }
        self.append(score)?;
        tracing::info!(score, path = %self.path.display(), "new best score saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> ScoreStore {
        let path = std::env::temp_dir()
            .join(format!("blastgrid-{}-{name}", std::process::id()))
            .join("best.txt");
        let _ = fs::remove_file(&path);
        ScoreStore::new(path)
    }

    #[test]
    fn test_missing_file_is_zero() {
        let store = temp_store("missing");
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_last_value_wins() {
        let store = temp_store("last");
        store.append(120).unwrap();
        store.append(45).unwrap();
        assert_eq!(store.load().unwrap(), 45);
        let content = fs::read_to_string(&store.path).unwrap();
        assert_eq!(content, "120\n45\n");
    }

    #[test]
    fn test_record_if_better() {
        let store = temp_store("better");
        assert!(store.record_if_better(30).unwrap());
        assert!(!store.record_if_better(30).unwrap());
        assert!(!store.record_if_better(10).unwrap());
        assert!(store.record_if_better(31).unwrap());
        assert_eq!(store.load().unwrap(), 31);
    }

    #[test]
    fn test_malformed_file() {
        let store = temp_store("malformed");
        fs::create_dir_all(store.path.parent().unwrap()).unwrap();
        fs::write(&store.path, "12\nnot a number\n").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Malformed score"));
    }
}
