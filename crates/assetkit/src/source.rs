//! Byte-stream providers keyed by logical asset path.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};

/// Opens bundled assets by their slash-separated logical path.
pub trait AssetSource {
    /// Fails with [`io::ErrorKind::NotFound`] when no asset has that path.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;

    /// Size of the asset in bytes, when cheaply known. Used for progress only.
    fn size_hint(&self, _path: &str) -> Option<u64> {
        None
    }
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn size_hint(&self, path: &str) -> Option<u64> {
        (**self).size_hint(path)
    }
}

/// Assets laid out under a directory on disk.
#[derive(Clone, Debug)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only plain relative paths resolve; anything that could leave `root`
    /// is reported as missing.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || !inside {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("asset '{path}' is outside the bundle"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for DirAssets {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let full = self.resolve(path)?;
        if full.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("asset '{path}' is a directory"),
            ));
        }
        Ok(Box::new(File::open(full)?))
    }

    fn size_hint(&self, path: &str) -> Option<u64> {
        let full = self.resolve(path).ok()?;
        full.metadata().ok().map(|m| m.len())
    }
}

/// Assets held in memory, e.g. embedded with `include_bytes!`.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.assets.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no asset named '{path}'"),
            )),
        }
    }

    fn size_hint(&self, path: &str) -> Option<u64> {
        self.assets.get(path).map(|b| b.len() as u64)
    }
}
