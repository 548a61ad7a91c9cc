//! Navigation operations implementation

use log::debug;

use crate::error::NavigateError;
use crate::navigate::VirtualPath;
use crate::storage::VirtualFs;

/// Resolves a CWD target: one segment below the current path that must name
/// an existing directory.
pub fn change_directory(
    fs: &dyn VirtualFs,
    current: &VirtualPath,
    target: &str,
) -> Result<VirtualPath, NavigateError> {
    let next = current.child(target)?;

    if !fs.is_directory(&next) {
        return Err(NavigateError::DirectoryNotFound(next.to_string()));
    }

    debug!("Directory change {} -> {}", current, next);
    Ok(next)
}

/// Resolves CDUP. The root has no parent.
pub fn change_to_parent(current: &VirtualPath) -> Result<VirtualPath, NavigateError> {
    let mut parent = current.clone();
    parent.pop()?;
    Ok(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DiskFs;
    use tempfile::TempDir;

    #[test]
    fn test_change_into_existing_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let fs = DiskFs::new(dir.path()).unwrap();

        let next = change_directory(&fs, &VirtualPath::root(), "docs").unwrap();

        assert_eq!(next.to_string(), "/docs");
    }

    #[test]
    fn test_missing_or_file_target_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("file.txt"), b"x").unwrap();
        let fs = DiskFs::new(dir.path()).unwrap();

        assert!(matches!(
            change_directory(&fs, &VirtualPath::root(), "nope"),
            Err(NavigateError::DirectoryNotFound(_))
        ));
        assert!(change_directory(&fs, &VirtualPath::root(), "file.txt").is_err());
    }

    #[test]
    fn test_parent_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        let fs = DiskFs::new(dir.path()).unwrap();

        assert!(matches!(
            change_directory(&fs, &VirtualPath::root(), ".."),
            Err(NavigateError::InvalidSegment(_))
        ));
    }

    #[test]
    fn test_change_to_parent() {
        let nested = VirtualPath::root().child("a").unwrap();
        assert!(change_to_parent(&nested).unwrap().is_root());
        assert!(matches!(
            change_to_parent(&VirtualPath::root()),
            Err(NavigateError::AtRoot)
        ));
    }
}
