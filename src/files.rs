use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Regular files in `dir` whose extension equals `extension`, ignoring case, sorted by file name.
pub fn list_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Replace `path` with `bytes` through a temporary file in the same directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod list_with_extension {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn sorted_and_case_insensitive() {
                let dir = TempDir::new().expect("tempdir");
                for name in ["b.JPG", "a.jpg", "c.png", "d.jpeg", "noext"] {
                    fs::write(dir.path().join(name), b"x").expect("write");
                }
                fs::create_dir(dir.path().join("sub.jpg")).expect("mkdir");

                let names: Vec<String> = list_with_extension(dir.path(), "jpg")
                    .expect("list")
                    .iter()
                    .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
                    .collect();
                assert_eq!(names, vec!["a.jpg", "b.JPG"]);
            }

            #[test]
            fn missing_dir_is_an_error() {
                let dir = TempDir::new().expect("tempdir");
                assert!(list_with_extension(&dir.path().join("gone"), "jpg").is_err());
            }
        }
    }

    mod write_atomically {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn replaces_existing_contents() {
                let dir = TempDir::new().expect("tempdir");
                let path = dir.path().join("out.txt");
                fs::write(&path, "old").expect("write");
                write_atomically(&path, b"new").expect("replace");
                assert_eq!(fs::read_to_string(&path).expect("read"), "new");
                // no temporary files left behind
                assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
            }

            #[test]
            fn missing_parent_fails() {
                let dir = TempDir::new().expect("tempdir");
                let path = dir.path().join("nope").join("out.txt");
                assert!(write_atomically(&path, b"x").is_err());
            }
        }
    }
}
