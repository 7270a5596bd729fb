use jwalk::WalkDir;
use std::path::{Path, PathBuf};

pub use jwalk::Error as WalkError;

/// Lazily yields every file under `dir` with the given extension, depth-first
/// in sorted order. Symlinks are followed.
///
/// Entries the walk cannot read come out as errors: a directory whose
/// listing fails, a dangling link, or `dir` itself when it is missing. Broken
/// entries that carry a different extension are not recipes and are dropped.
pub fn recipe_files<'a>(
    dir: &Path,
    extension: &'a str,
) -> impl Iterator<Item = Result<PathBuf, WalkError>> + 'a {
    WalkDir::new(dir)
        .sort(true)
        .follow_links(true)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(mut entry) => {
                if let Some(e) = entry.read_children_error.take() {
                    return Some(Err(e));
                }
                let path = entry.path();
                (entry.file_type().is_file() && has_extension(&path, extension))
                    .then_some(Ok(path))
            }
            Err(e) => {
                let other = e
                    .path()
                    .is_some_and(|path| has_other_extension(path, extension));
                (!other).then_some(Err(e))
            }
        })
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn has_other_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some() && !has_extension(path, extension)
}
