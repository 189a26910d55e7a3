use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// Get file extension from path: the text after the last dot, lower-cased.
/// Names without a dot yield an empty string.
pub fn get_extension(path: &Path) -> String {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return String::new(),
    };

    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Split a file name into stem and extension for renaming.
/// A leading dot is part of the stem (".bashrc" has no extension here).
fn split_for_rename(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Return `candidate`, or the first `stem_N.ext` (N = 1, 2, ...) for which
/// `exists` is false
pub fn unique_destination<F>(candidate: &Path, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !exists(candidate) {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let name = candidate
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_for_rename(&name);

    let mut n = 1usize;
    loop {
        let renamed = match ext {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        let path = parent.join(renamed);
        if !exists(&path) {
            return path;
        }
        n += 1;
    }
}

/// True if `name` is exactly one normal path component (no separators, no `..`)
pub fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Expand `~` and environment variables in a user supplied path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw.trim())
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_get_extension_with_txt() {
        let ext = get_extension(Path::new("/path/to/file.txt"));
        assert_eq!(ext, "txt");
    }

    #[test]
    fn test_get_extension_lowercase() {
        let ext = get_extension(Path::new("/path/to/PHOTO.JPG"));
        assert_eq!(ext, "jpg");
    }

    #[test]
    fn test_get_extension_no_extension() {
        let ext = get_extension(Path::new("/path/to/Makefile"));
        assert_eq!(ext, "");
    }

    #[test]
    fn test_get_extension_multiple_dots() {
        let ext = get_extension(Path::new("/path/to/file.tar.gz"));
        assert_eq!(ext, "gz");
    }

    #[test]
    fn test_get_extension_dotfile() {
        assert_eq!(get_extension(Path::new("/home/.bashrc")), "bashrc");
        assert_eq!(get_extension(Path::new("/home/trailing.")), "");
    }

    #[test]
    fn test_unique_destination_free() {
        let path = Path::new("/d/docs/report.txt");
        assert_eq!(unique_destination(path, |_| false), path);
    }

    #[test]
    fn test_unique_destination_appends_suffix() {
        let taken: HashSet<PathBuf> = [
            PathBuf::from("/d/docs/report.txt"),
            PathBuf::from("/d/docs/report_1.txt"),
        ]
        .into_iter()
        .collect();

        let resolved = unique_destination(Path::new("/d/docs/report.txt"), |p| taken.contains(p));
        assert_eq!(resolved, PathBuf::from("/d/docs/report_2.txt"));
    }

    #[test]
    fn test_unique_destination_without_extension() {
        let taken: HashSet<PathBuf> = [PathBuf::from("/d/misc/.bashrc")].into_iter().collect();
        let resolved = unique_destination(Path::new("/d/misc/.bashrc"), |p| taken.contains(p));
        assert_eq!(resolved, PathBuf::from("/d/misc/.bashrc_1"));
    }

    #[test]
    fn test_is_single_component() {
        assert!(is_single_component("documents"));
        assert!(is_single_component("My Pictures"));
        assert!(!is_single_component(""));
        assert!(!is_single_component(".."));
        assert!(!is_single_component("a/b"));
        assert!(!is_single_component("/abs"));
    }

    #[test]
    fn test_expand_path_plain() {
        let path = expand_path("  /tmp/some dir ").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/some dir"));
    }
}
