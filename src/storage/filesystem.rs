//! Virtual filesystem interface
//!
//! Everything the session needs from storage, expressed over [`VirtualPath`]s
//! so implementations never see raw client input.

use std::io::{Read, Write};

use crate::error::StorageError;
use crate::navigate::VirtualPath;

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_directory: bool,
}

impl Entry {
    /// Name as shown in a listing; directories carry a trailing `/`.
    pub fn display_name(&self) -> String {
        if self.is_directory {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

pub trait VirtualFs: Send + Sync {
    fn exists(&self, path: &VirtualPath) -> bool;

    fn is_directory(&self, path: &VirtualPath) -> bool;

    /// Entries of a directory, sorted by name.
    fn list_entries(&self, path: &VirtualPath) -> Result<Vec<Entry>, StorageError>;

    /// Creates a single directory. Fails if anything already exists there.
    fn create_directory(&self, path: &VirtualPath) -> Result<(), StorageError>;

    /// Removes a directory and everything below it.
    fn delete_directory_recursive(&self, path: &VirtualPath) -> Result<(), StorageError>;

    fn delete_file(&self, path: &VirtualPath) -> Result<(), StorageError>;

    fn open_for_read(&self, path: &VirtualPath) -> Result<Box<dyn Read + Send>, StorageError>;

    /// Creates or truncates a regular file.
    fn open_for_write(&self, path: &VirtualPath) -> Result<Box<dyn Write + Send>, StorageError>;
}
