//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stackpatch_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StackPatchResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can hand one clone to a service
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All files below `root`, relative to it.
    pub fn list_files(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.inner
            .read()
            .map(|inner| {
                inner
                    .files
                    .keys()
                    .filter_map(|p| p.strip_prefix(root).ok().map(Path::to_path_buf))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every file below `root` with its content, for byte-for-byte
    /// comparisons.
    pub fn snapshot(&self, root: impl AsRef<Path>) -> BTreeMap<PathBuf, String> {
        let root = root.as_ref();
        self.inner
            .read()
            .map(|inner| {
                inner
                    .files
                    .iter()
                    .filter(|(p, _)| p.starts_with(root))
                    .map(|(p, c)| (p.clone(), c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn missing(path: &Path, reason: &str) -> ApplicationError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> StackPatchResult<String> {
        let inner = self.inner.read().map_err(|_| ApplicationError::FilesystemLock)?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::missing(path, "File not found").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> StackPatchResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::FilesystemLock)?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(Self::missing(path, "Parent directory does not exist").into());
            }
        }
        if inner.directories.contains(path) {
            return Err(Self::missing(path, "Is a directory").into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> StackPatchResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::FilesystemLock)?;
        inner.add_dirs(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> StackPatchResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::FilesystemLock)?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::missing(path, "File not found").into())
    }

    fn remove_dir(&self, path: &Path) -> StackPatchResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::FilesystemLock)?;
        if !inner.directories.contains(path) {
            return Err(Self::missing(path, "Directory not found").into());
        }
        let has_children = inner.files.keys().any(|p| p.parent() == Some(path))
            || inner.directories.iter().any(|d| d.parent() == Some(path));
        if has_children {
            return Err(Self::missing(path, "Directory not empty").into());
        }
        inner.directories.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> StackPatchResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::FilesystemLock)?;
        inner.directories.retain(|d| !d.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> StackPatchResult<Vec<PathBuf>> {
        let inner = self.inner.read().map_err(|_| ApplicationError::FilesystemLock)?;
        if !inner.directories.contains(path) {
            return Err(Self::missing(path, "Directory not found").into());
        }
        let children: BTreeSet<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StackPatchResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn walk_files(&self, root: &Path) -> StackPatchResult<Vec<PathBuf>> {
        if !self.is_dir(root) {
            return Err(Self::missing(root, "Directory not found").into());
        }
        Ok(self.list_files(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/p/a/b.txt"), "x").is_err());
        fs.write_file_all(Path::new("/p/a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file("/p/a/b.txt").as_deref(), Some("x"));
    }

    #[test]
    fn remove_dir_only_when_empty() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/p/lib/auth.ts", "x");
        assert!(fs.remove_dir(Path::new("/p/lib")).is_err());
        fs.remove_file(Path::new("/p/lib/auth.ts")).unwrap();
        fs.remove_dir(Path::new("/p/lib")).unwrap();
        assert!(!fs.exists(Path::new("/p/lib")));
    }

    #[test]
    fn read_dir_lists_files_and_dirs() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/p/app/layout.tsx", "x");
        fs.add_file("/p/app/auth/login/page.tsx", "y");
        assert_eq!(
            fs.read_dir(Path::new("/p/app")).unwrap(),
            vec![PathBuf::from("/p/app/auth"), PathBuf::from("/p/app/layout.tsx")]
        );
    }

    #[test]
    fn walk_is_relative_and_sorted() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/b/components/toaster.tsx", "1");
        fs.add_file("/b/app/auth/login/page.tsx", "2");
        assert_eq!(
            fs.walk_files(Path::new("/b")).unwrap(),
            vec![
                PathBuf::from("app/auth/login/page.tsx"),
                PathBuf::from("components/toaster.tsx"),
            ]
        );
    }
}
