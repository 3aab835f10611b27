use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Extensions accepted for input images, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

pub fn is_allowed(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => {
            ALLOWED_EXTENSIONS.iter().any(|allowed| extension.eq_ignore_ascii_case(allowed))
        },
        None => false,
    }
}

/// Reduces a user supplied file name to `[A-Za-z0-9_.-]`.
///
/// The name is NFKD-decomposed and whatever is still non-ASCII is dropped, so
/// accented letters keep their base letter. Path separators become whitespace, runs of
/// whitespace collapse into a single `_`, and leading or trailing `.`/`_` are stripped.
pub fn sanitize_file_name(file_name: &str) -> String {
    let ascii: String = file_name
        .nfkd()
        .filter(char::is_ascii)
        .map(|ch| if ch == '/' || ch == '\\' { ' ' } else { ch })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|ch| ch == '.' || ch == '_')
        .to_owned()
}

/// Random v4 UUID as 32 lowercase hex characters.
pub fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Sanitized stem and extension of an input file plus the id shared by its artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadName {
    stem: String,
    /// Includes the leading dot.
    extension: String,
    id: String,
}

impl UploadName {
    pub fn new(file_name: &str, id: String) -> Result<Self> {
        let (raw_stem, extension) = match file_name.rsplit_once('.') {
            Some(parts) if is_allowed(file_name) => parts,
            _ => bail!(
                "unsupported file type {:?}, expected one of {}",
                file_name,
                ALLOWED_EXTENSIONS.join(", ")
            ),
        };

        let mut stem = sanitize_file_name(raw_stem);
        if stem.is_empty() {
            stem = "image".to_owned();
        }

        Ok(Self { stem, extension: format!(".{extension}"), id })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("input path {:?} has no valid file name", path))?;
        Self::new(file_name, unique_id())
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub original: PathBuf,
    pub adjusted: PathBuf,
    pub original_plot: PathBuf,
    pub adjusted_plot: PathBuf,
}

/// Output layout: originals under `uploads/`, everything generated under `processed/`.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    pub fn prepare(&self) -> Result<()> {
        for dir in [self.uploads_dir(), self.processed_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create output directory {:?}", dir))?;
        }
        Ok(())
    }

    pub fn paths(&self, name: &UploadName) -> ArtifactPaths {
        let UploadName { stem, extension, id } = name;
        let processed = self.processed_dir();
        ArtifactPaths {
            original: self.uploads_dir().join(format!("{stem}_{id}{extension}")),
            adjusted: processed.join(format!("{stem}_adjusted_{id}{extension}")),
            original_plot: processed.join(format!("hist_original_{id}.png")),
            adjusted_plot: processed.join(format!("hist_adjusted_{id}.png")),
        }
    }
}
