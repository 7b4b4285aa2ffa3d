//! Listing of the keyword image directories: `basedir/<keyword>/<filename>`.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::warn;

/// One image file under a keyword directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CatalogEntry {
    pub keyword: String,
    pub filename: String,
}

impl CatalogEntry {
    #[must_use]
    pub fn path(&self, basedir: &Path) -> PathBuf {
        basedir.join(&self.keyword).join(&self.filename)
    }
}

/// Turn a configured base directory into an absolute path.
///
/// Existing directories are canonicalized; missing ones are joined onto the
/// current directory so later listings can report them by full path.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_basedir(basedir: &Path) -> eyre::Result<PathBuf> {
    if let Ok(canonical) = dunce::canonicalize(basedir) {
        return Ok(canonical);
    }
    Ok(std::env::current_dir()?.join(basedir))
}

/// Files directly inside `basedir/<keyword>`, sorted by name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_keyword(basedir: &Path, keyword: &str) -> eyre::Result<Vec<CatalogEntry>> {
    let dir = basedir.join(keyword);
    let mut entries = Vec::new();
    for entry in fs::read_dir(&dir)? {
        match entry {
            Ok(ent) => {
                let p = ent.path();
                if !p.is_file() {
                    continue;
                }
                if let Some(name) = p.file_name().and_then(|n| n.to_str()) {
                    entries.push(CatalogEntry {
                        keyword: keyword.to_string(),
                        filename: name.to_string(),
                    });
                }
            }
            Err(e) => {
                warn!("Failed to read dir entry in {}: {}", dir.display(), e);
            }
        }
    }
    entries.sort();
    Ok(entries)
}

/// Files of every keyword directory. Unreadable directories are skipped with a warning.
#[must_use]
pub fn list_all(basedir: &Path, keywords: &[String]) -> Vec<CatalogEntry> {
    debug!("Listing all images under {}", basedir.display());
    let mut all = Vec::new();
    for keyword in keywords {
        match list_keyword(basedir, keyword) {
            Ok(entries) => all.extend(entries),
            Err(e) => warn!(
                "Skipping keyword {}: cannot list {}: {}",
                keyword,
                basedir.join(keyword).display(),
                e
            ),
        }
    }
    all
}

/// Uniformly random entry, `None` when there is nothing to pick from.
pub fn pick<'a, R: Rng + ?Sized>(entries: &'a [CatalogEntry], rng: &mut R) -> Option<&'a CatalogEntry> {
    entries.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;
    use std::fs::File;
    use tempfile::tempdir;

    fn populate(root: &Path) -> eyre::Result<()> {
        fs::create_dir_all(root.join("cat"))?;
        fs::create_dir_all(root.join("dog/nested"))?;
        File::create(root.join("cat/a.png"))?;
        File::create(root.join("cat/b.png"))?;
        File::create(root.join("dog/c.jpg"))?;
        File::create(root.join("dog/nested/ignored.jpg"))?;
        Ok(())
    }

    #[test]
    fn lists_only_files_per_keyword() -> eyre::Result<()> {
        let td = tempdir()?;
        populate(td.path())?;

        let cats = list_keyword(td.path(), "cat")?;
        let names: Vec<_> = cats.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let dogs = list_keyword(td.path(), "dog")?;
        assert_eq!(dogs.len(), 1);
        assert_eq!(dogs[0].path(td.path()), td.path().join("dog").join("c.jpg"));
        Ok(())
    }

    #[test]
    fn list_all_skips_missing_keywords() -> eyre::Result<()> {
        let td = tempdir()?;
        populate(td.path())?;
        let keywords = vec!["cat".to_string(), "missing".to_string(), "dog".to_string()];
        assert_eq!(list_all(td.path(), &keywords).len(), 3);
        Ok(())
    }

    #[test]
    fn every_entry_can_be_picked() -> eyre::Result<()> {
        let td = tempdir()?;
        populate(td.path())?;
        let all = list_all(td.path(), &["cat".to_string(), "dog".to_string()]);

        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            let entry = pick(&all, &mut rng).expect("non-empty");
            assert!(entry.path(td.path()).is_file());
            seen.insert(entry.clone());
        }
        assert_eq!(seen.len(), all.len());
        Ok(())
    }

    #[test]
    fn nothing_to_pick_from_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick(&[], &mut rng), None);
    }

    #[test]
    fn basedir_is_made_absolute() -> eyre::Result<()> {
        let td = tempdir()?;
        assert!(absolute_basedir(td.path())?.is_absolute());
        assert!(absolute_basedir(Path::new("no-such-dir-here"))?.is_absolute());
        Ok(())
    }
}
