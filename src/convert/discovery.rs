use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// Exact extensions accepted; `.Png` and friends are not.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["png", "PNG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    NotFound,
}

pub fn classify_path(path: &Path) -> PathKind {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        Ok(meta) if meta.is_file() => PathKind::File,
        _ => PathKind::NotFound,
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// The file stem read as an integer, e.g. `12` for `12.PNG`.
///
/// Stems beyond the `i128` range have no ordinal.
pub fn ordinal(file_name: &str) -> Option<i128> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    match stem.parse() {
        Ok(n) => Some(n),
        Err(e) => {
            if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) {
                log::debug!("{} is numeric but out of range: {}", file_name, e);
            }
            None
        }
    }
}

/// Numeric names first in ascending order, then the rest lexically.
fn compare_names(a: &str, b: &str) -> Ordering {
    match (ordinal(a), ordinal(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Lists supported image file names in `dir`, in card order.
///
/// A directory that cannot be read is logged and treated as empty.
pub fn find_png_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Failed to read directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_supported(Path::new(name)))
        .collect();

    names.sort_by(|a, b| compare_names(a, b));
    log::debug!("Discovered {} image(s) in {}", names.len(), dir.display());
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch_all(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn sorts_numerically_not_lexically() {
        let dir = TempDir::new().unwrap();
        touch_all(dir.path(), &["10.PNG", "2.PNG", "1.PNG"]);
        assert_eq!(find_png_files(dir.path()), vec!["1.PNG", "2.PNG", "10.PNG"]);
    }

    #[test]
    fn only_exact_extension_variants() {
        let dir = TempDir::new().unwrap();
        touch_all(
            dir.path(),
            &["3.png", "4.PNG", "5.Png", "6.jpg", "notes.txt", "PNG"],
        );
        fs::create_dir(dir.path().join("7.png")).unwrap();
        assert_eq!(find_png_files(dir.path()), vec!["3.png", "4.PNG"]);
    }

    #[test]
    fn non_numeric_names_follow_in_lexical_order() {
        let dir = TempDir::new().unwrap();
        touch_all(dir.path(), &["zeta.png", "11.png", "alpha.png", "3.png"]);
        assert_eq!(
            find_png_files(dir.path()),
            vec!["3.png", "11.png", "alpha.png", "zeta.png"]
        );
    }

    #[test]
    fn equal_ordinals_tie_break_lexically() {
        let dir = TempDir::new().unwrap();
        touch_all(dir.path(), &["1.png", "01.png", "1.PNG"]);
        assert_eq!(find_png_files(dir.path()), vec!["01.png", "1.PNG", "1.png"]);
    }

    #[test]
    fn unreadable_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(find_png_files(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn classifies_paths() {
        let dir = TempDir::new().unwrap();
        touch_all(dir.path(), &["1.PNG"]);
        assert_eq!(classify_path(dir.path()), PathKind::Directory);
        assert_eq!(classify_path(&dir.path().join("1.PNG")), PathKind::File);
        assert_eq!(classify_path(&dir.path().join("2.PNG")), PathKind::NotFound);
    }

    #[test]
    fn ordinal_parses_stem() {
        assert_eq!(ordinal("12.PNG"), Some(12));
        assert_eq!(ordinal("card.png"), None);
        assert_eq!(ordinal("1a.png"), None);
        assert_eq!(
            ordinal("99999999999999999999.png"),
            Some(99_999_999_999_999_999_999)
        );
    }

    #[test]
    fn stems_wider_than_i64_still_sort_numerically() {
        let dir = TempDir::new().unwrap();
        touch_all(
            dir.path(),
            &["cover.png", "99999999999999999999.png", "100000000000000000000.png", "7.png"],
        );
        assert_eq!(
            find_png_files(dir.path()),
            vec![
                "7.png",
                "99999999999999999999.png",
                "100000000000000000000.png",
                "cover.png"
            ]
        );
    }
}
