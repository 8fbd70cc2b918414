//! Path helpers for output and sidecar locations

use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;

/// Subdirectory receiving remuxed outputs, next to the primary file
pub const REMUX_DIR_NAME: &str = "remux";

/// Path helpers shared by the interactors
pub struct PathUtils;

impl PathUtils {
    /// Base name of a path as an owned string
    pub fn file_name(path: &Path) -> Result<String, DomainError> {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::BadArgs(format!("Path has no file name: {}", path.display())))
    }

    /// Stem of a path as an owned string
    pub fn file_stem(path: &Path) -> Result<String, DomainError> {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::BadArgs(format!("Path has no file stem: {}", path.display())))
    }

    /// `<dir of primary>/remux`
    pub fn remux_dir(primary: &Path) -> PathBuf {
        primary
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(REMUX_DIR_NAME)
    }

    /// `<dir of primary>/remux/<primary basename>`
    pub fn remux_output_path(primary: &Path) -> Result<PathBuf, DomainError> {
        Ok(Self::remux_dir(primary).join(Self::file_name(primary)?))
    }

    /// Sidecar name `<stem>[.<lang>][.forced].<ext>` next to the source
    pub fn sidecar_path(source: &Path, language: Option<&str>, forced: bool, extension: &str) -> Result<PathBuf, DomainError> {
        let mut name = Self::file_stem(source)?;
        if let Some(language) = language {
            name.push('.');
            name.push_str(language);
        }
        if forced {
            name.push_str(".forced");
        }
        name.push('.');
        name.push_str(extension);
        Ok(source.with_file_name(name))
    }

    /// Insert `.<suffix>` before the extension: `a.eng.srt` becomes `a.eng.<suffix>.srt`
    pub fn with_suffix_before_extension(path: &Path, suffix: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match path.extension() {
            Some(extension) => format!("{}.{}.{}", stem, suffix, extension.to_string_lossy()),
            None => format!("{}.{}", stem, suffix),
        };
        path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remux_output_path() {
        assert_eq!(
            PathUtils::remux_output_path(Path::new("/media/show/A.mkv")).unwrap(),
            PathBuf::from("/media/show/remux/A.mkv")
        );
        assert!(PathUtils::remux_output_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_sidecar_path() {
        let source = Path::new("/media/A.S01E01.mkv");
        assert_eq!(
            PathUtils::sidecar_path(source, Some("eng"), true, "ass").unwrap(),
            PathBuf::from("/media/A.S01E01.eng.forced.ass")
        );
        assert_eq!(
            PathUtils::sidecar_path(source, None, false, "srt").unwrap(),
            PathBuf::from("/media/A.S01E01.srt")
        );
    }

    #[test]
    fn test_suffix_before_extension() {
        assert_eq!(
            PathUtils::with_suffix_before_extension(Path::new("/m/A.eng.srt"), "3"),
            PathBuf::from("/m/A.eng.3.srt")
        );
    }
}
