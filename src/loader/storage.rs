use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};

/// Read access to game data (terrain library, saves, definitions).
///
/// Paths are absolute and slash separated, e.g. `/islands/north/lit01.scp`.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, path: &str) -> Result<Bytes>;

    /// File names (not paths) directly inside `dir`
    async fn list(&self, dir: &str) -> Result<Vec<String>>;
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

/// Files below a directory on disk
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(Error::MissingResource { path: path.to_string() });
        }
        Ok(self.root.join(relative))
    }
}

fn not_found(path: &str, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::MissingResource { path: path.to_string() }
    } else {
        Error::Io(format!("{path}: {e}"))
    }
}

#[async_trait]
impl Storage for DirStorage {
    async fn read(&self, path: &str) -> Result<Bytes> {
        let full = self.resolve(path)?;
        let data = tokio::fs::read(&full).await.map_err(|e| not_found(path, e))?;
        Ok(Bytes::from(data))
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>> {
        let full = self.resolve(dir)?;
        let mut entries = tokio::fs::read_dir(&full).await.map_err(|e| not_found(dir, e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Files held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, Bytes>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, data: impl Into<Bytes>) {
        self.files.insert(normalize(path), data.into());
    }

    pub fn with_file(mut self, path: &str, data: impl Into<Bytes>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn get(&self, path: &str) -> Result<Bytes> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| Error::MissingResource { path: path.to_string() })
    }

    fn names_in(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", normalize(dir).trim_end_matches('/'));
        self.files
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, _)| {
                let name = &path[prefix.len()..];
                (!name.contains('/')).then(|| name.to_string())
            })
            .collect()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, path: &str) -> Result<Bytes> {
        self.get(path)
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>> {
        Ok(self.names_in(dir))
    }
}

/// Game data supplied as one zip archive of a game installation.
///
/// Every entry is reachable under its lowercased archive path. Island
/// folders (`NORD`, `SUED`, `NOKLIMA`, `NORDNAT`, `SUEDNAT`) are additionally
/// mapped into `/islands/{north,south,...}` wherever they sit in the archive.
#[derive(Debug, Clone, Default)]
pub struct ZipStorage {
    files: MemoryStorage,
}

const ISLAND_FOLDERS: [(&str, &str); 5] = [
    ("nord", "north"),
    ("sued", "south"),
    ("noklima", "noklima"),
    ("nordnat", "northnat"),
    ("suednat", "southnat"),
];

fn island_alias(path: &str) -> Option<String> {
    let mut parts = path.rsplit('/');
    let name = parts.next()?;
    let folder = parts.next()?;
    if !name.ends_with(".scp") {
        return None;
    }
    ISLAND_FOLDERS
        .iter()
        .find(|(game, _)| *game == folder)
        .map(|(_, dir)| format!("/islands/{dir}/{name}"))
}

impl ZipStorage {
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self> {
        let data: Bytes = data.into();
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::Io(format!("zip: {e}")))?;

        let mut files = MemoryStorage::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::Io(format!("zip entry {i}: {e}")))?;
            if file.is_dir() {
                continue;
            }
            let path = normalize(&file.name().replace('\\', "/").to_lowercase());
            let mut contents = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut contents)?;
            let contents = Bytes::from(contents);

            if let Some(alias) = island_alias(&path) {
                files.insert(&alias, contents.clone());
            }
            files.insert(&path, contents);
        }

        debug!(entries = files.len(), "indexed zip archive");
        Ok(Self { files })
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Self::from_bytes(data)
    }
}

#[async_trait]
impl Storage for ZipStorage {
    async fn read(&self, path: &str) -> Result<Bytes> {
        self.files.get(&path.to_lowercase())
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>> {
        Ok(self.files.names_in(&dir.to_lowercase()))
    }
}
