use std::fs;
use std::path::{Path, PathBuf};

/// Look for a mounted SD card in the usual places and return the first
/// mount point found.
pub fn find_removable_media() -> Option<PathBuf> {
    // macOS: FAT-formatted cards mount under /Volumes, usually as "NO NAME"
    let no_name = Path::new("/Volumes/NO NAME");
    if no_name.is_dir() {
        return Some(no_name.to_path_buf());
    }
    if let Some(volume) = first_mount_under(Path::new("/Volumes"), &["Macintosh HD"]) {
        return Some(volume);
    }

    // Linux: desktop automounters use /media/<user> or /run/media/<user>
    if let Ok(user) = std::env::var("USER") {
        for base in [
            PathBuf::from("/media").join(&user),
            PathBuf::from("/run/media").join(&user),
        ] {
            if let Some(mount) = first_mount_under(&base, &[]) {
                return Some(mount);
            }
        }
    }

    None
}

fn first_mount_under(base: &Path, excluded: &[&str]) -> Option<PathBuf> {
    let entries = fs::read_dir(base).ok()?;
    for entry in entries.flatten() {
        if excluded.iter().any(|name| entry.file_name() == *name) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            return Some(path);
        }
    }
    None
}
