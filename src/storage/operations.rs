//! Disk-backed storage
//!
//! Maps virtual paths onto a directory tree rooted at the configured server
//! root.

use log::{debug, error, info};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use crate::error::StorageError;
use crate::navigate::VirtualPath;
use crate::storage::filesystem::{Entry, VirtualFs};

const WRITE_BUFFER_SIZE: usize = 8192;

#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    /// Uses `root` as the server root, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::from_io(&root.display().to_string(), e))?;
        info!("Server root directory: {}", root.display());
        Ok(Self { root })
    }

    fn real_path(&self, path: &VirtualPath) -> PathBuf {
        path.segments()
            .iter()
            .fold(self.root.clone(), |real, segment| real.join(segment))
    }
}

impl VirtualFs for DiskFs {
    fn exists(&self, path: &VirtualPath) -> bool {
        self.real_path(path).exists()
    }

    fn is_directory(&self, path: &VirtualPath) -> bool {
        self.real_path(path).is_dir()
    }

    fn list_entries(&self, path: &VirtualPath) -> Result<Vec<Entry>, StorageError> {
        let real = self.real_path(path);
        if !real.is_dir() {
            return Err(StorageError::DirectoryNotFound(path.to_string()));
        }

        let entries = fs::read_dir(&real).map_err(|e| {
            error!("Failed to list directory {} (real: {}): {}", path, real.display(), e);
            StorageError::from_io(&path.to_string(), e)
        })?;

        let mut listing: Vec<Entry> = entries
            .flatten()
            .map(|entry| Entry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_directory: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
            })
            .collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));

        debug!("Listed {} entries in {}", listing.len(), path);
        Ok(listing)
    }

    fn create_directory(&self, path: &VirtualPath) -> Result<(), StorageError> {
        let real = self.real_path(path);
        if real.exists() {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        fs::create_dir(&real).map_err(|e| StorageError::from_io(&path.to_string(), e))?;
        info!("Created directory {}", path);
        Ok(())
    }

    fn delete_directory_recursive(&self, path: &VirtualPath) -> Result<(), StorageError> {
        if path.is_root() {
            return Err(StorageError::PermissionDenied(path.to_string()));
        }
        let real = self.real_path(path);
        if !real.is_dir() {
            return Err(StorageError::DirectoryNotFound(path.to_string()));
        }
        fs::remove_dir_all(&real).map_err(|e| StorageError::from_io(&path.to_string(), e))?;
        info!("Removed directory {}", path);
        Ok(())
    }

    fn delete_file(&self, path: &VirtualPath) -> Result<(), StorageError> {
        let real = self.real_path(path);
        if !real.exists() {
            return Err(StorageError::FileNotFound(path.to_string()));
        }
        if real.is_dir() {
            return Err(StorageError::NotAFile(path.to_string()));
        }
        fs::remove_file(&real).map_err(|e| StorageError::from_io(&path.to_string(), e))?;
        info!("Deleted file {}", path);
        Ok(())
    }

    fn open_for_read(&self, path: &VirtualPath) -> Result<Box<dyn Read + Send>, StorageError> {
        let real = self.real_path(path);
        if real.is_dir() {
            return Err(StorageError::NotAFile(path.to_string()));
        }
        let file = File::open(&real).map_err(|e| StorageError::from_io(&path.to_string(), e))?;
        Ok(Box::new(file))
    }

    fn open_for_write(&self, path: &VirtualPath) -> Result<Box<dyn Write + Send>, StorageError> {
        let real = self.real_path(path);
        if real.is_dir() {
            return Err(StorageError::NotAFile(path.to_string()));
        }
        let file =
            File::create(&real).map_err(|e| StorageError::from_io(&path.to_string(), e))?;
        Ok(Box::new(BufWriter::with_capacity(WRITE_BUFFER_SIZE, file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DiskFs) {
        let dir = TempDir::new().unwrap();
        let fs = DiskFs::new(dir.path()).unwrap();
        (dir, fs)
    }

    fn path(segments: &[&str]) -> VirtualPath {
        let mut path = VirtualPath::root();
        for segment in segments {
            path.push(segment).unwrap();
        }
        path
    }

    #[test]
    fn test_listing_is_sorted_and_typed() {
        let (dir, fs) = setup();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();

        let entries = fs.list_entries(&VirtualPath::root()).unwrap();

        let names: Vec<String> = entries.iter().map(Entry::display_name).collect();
        assert_eq!(names, vec!["a/".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let (_dir, fs) = setup();
        assert!(fs.list_entries(&VirtualPath::root()).unwrap().is_empty());
    }

    #[test]
    fn test_create_and_remove_directory_tree() {
        let (dir, fs) = setup();
        let docs = path(&["docs"]);
        fs.create_directory(&docs).unwrap();
        std::fs::write(dir.path().join("docs").join("inner.txt"), b"x").unwrap();
        assert!(matches!(
            fs.create_directory(&docs),
            Err(StorageError::AlreadyExists(_))
        ));

        fs.delete_directory_recursive(&docs).unwrap();

        assert!(!fs.exists(&docs));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let (_dir, fs) = setup();
        assert!(fs.delete_directory_recursive(&VirtualPath::root()).is_err());
    }

    #[test]
    fn test_delete_file_rules() {
        let (dir, fs) = setup();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("f.txt"), b"x").unwrap();

        assert!(matches!(
            fs.delete_file(&path(&["missing"])),
            Err(StorageError::FileNotFound(_))
        ));
        assert!(matches!(
            fs.delete_file(&path(&["sub"])),
            Err(StorageError::NotAFile(_))
        ));
        fs.delete_file(&path(&["f.txt"])).unwrap();
        assert!(!dir.path().join("f.txt").exists());
    }

    #[test]
    fn test_write_then_read() {
        let (_dir, fs) = setup();
        let file = path(&["report.txt"]);

        let mut writer = fs.open_for_write(&file).unwrap();
        writer.write_all(b"hello").unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut contents = String::new();
        fs.open_for_read(&file)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "hello");
    }

    #[test]
    fn test_open_missing_file_fails() {
        let (_dir, fs) = setup();
        assert!(matches!(
            fs.open_for_read(&path(&["nope"])),
            Err(StorageError::FileNotFound(_))
        ));
    }
}
