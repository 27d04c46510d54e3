//! Recursive directory copy.

use std::fs;
use std::io;
use std::path::Path;

/// Deep-copy `src` into `dst`, overwriting existing files.
///
/// Directories are created as needed. Files present only in `dst` are left
/// in place.
///
/// # Errors
///
/// Returns the first I/O error encountered; partially copied trees are not
/// cleaned up.
pub fn recursive_overwrite(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            recursive_overwrite(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
