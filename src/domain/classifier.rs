use super::FileKind;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffixes that mark a file as a picture
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpeg", ".jpg", ".gif", ".tiff", ".bmp"];

/// Case-sensitive file name suffixes identifying pictures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExtensions(Vec<String>);

impl Default for ImageExtensions {
    fn default() -> Self {
        Self(DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

impl ImageExtensions {
    /// Builds a set from user supplied suffixes; a missing leading dot is added
    pub fn from_list<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .filter(|e| !e.is_empty())
                .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// True once any suffix matches; later suffixes are not consulted
    pub fn matches(&self, file_name: &str) -> bool {
        self.0.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

/// Sorts files into documents and pictures by file name suffix
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    extensions: ImageExtensions,
}

impl Classifier {
    pub fn new(extensions: ImageExtensions) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &ImageExtensions {
        &self.extensions
    }

    pub fn kind_of(&self, path: &Path) -> FileKind {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.extensions.matches(&name) {
            FileKind::Picture
        } else {
            FileKind::Document
        }
    }

    /// Partitions `paths` into `(documents, pictures)`, keeping input order
    pub fn classify<I, P>(&self, paths: I) -> (Vec<PathBuf>, Vec<PathBuf>)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut documents = Vec::new();
        let mut pictures = Vec::new();
        self.classify_into(paths, &mut documents, &mut pictures);
        (documents, pictures)
    }

    /// Appends each path to the queue matching its kind.
    ///
    /// Empty paths are skipped. The summary counts the queues after the
    /// append, not just this batch.
    pub fn classify_into<I, P>(
        &self,
        paths: I,
        documents: &mut Vec<PathBuf>,
        pictures: &mut Vec<PathBuf>,
    ) -> ClassifySummary
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            if path.as_os_str().is_empty() {
                continue;
            }

            let kind = self.kind_of(path);
            debug!(path = %path.display(), ?kind, "classified");
            match kind {
                FileKind::Picture => pictures.push(path.to_path_buf()),
                FileKind::Document => documents.push(path.to_path_buf()),
            }
        }

        ClassifySummary {
            documents: documents.len(),
            pictures: pictures.len(),
        }
    }
}

/// Which queues hold files after a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadedKind {
    Both,
    PicturesOnly,
    DocumentsOnly,
    Nothing,
}

/// Queue totals after a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifySummary {
    pub documents: usize,
    pub pictures: usize,
}

impl ClassifySummary {
    pub fn kind(&self) -> LoadedKind {
        match (self.pictures > 0, self.documents > 0) {
            (true, true) => LoadedKind::Both,
            (true, false) => LoadedKind::PicturesOnly,
            (false, true) => LoadedKind::DocumentsOnly,
            (false, false) => LoadedKind::Nothing,
        }
    }
}

impl fmt::Display for ClassifySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            LoadedKind::Both => write!(
                f,
                "Loaded {} pictures and {} other files successfully.",
                self.pictures, self.documents
            ),
            LoadedKind::PicturesOnly => {
                write!(f, "Loaded {} pictures successfully.", self.pictures)
            }
            LoadedKind::DocumentsOnly => {
                write!(f, "Loaded {} files successfully.", self.documents)
            }
            LoadedKind::Nothing => f.write_str("No files loaded."),
        }
    }
}
