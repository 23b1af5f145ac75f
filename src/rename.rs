use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::CatfontResult;
use crate::config::RenameOptions;
use crate::files::list_with_extension;

/// What happened to one file.
#[derive(Debug)]
pub enum RenameOutcome {
    /// Moved to its letter name; `from == to` when it already had it.
    Renamed { from: PathBuf, to: PathBuf },
    /// A different file already holds the letter name.
    Skipped { from: PathBuf, to: PathBuf },
    Failed {
        from: PathBuf,
        to: PathBuf,
        error: io::Error,
    },
}

#[derive(Debug, Default)]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
    /// Matching files left alone because the alphabet ran out.
    pub leftover: usize,
}

impl RenameReport {
    pub fn renamed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RenameOutcome::Renamed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RenameOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RenameOutcome::Failed { .. }))
            .count()
    }
}

/// Rename the matching files in `dir` to `A.<ext>`, `B.<ext>`, ... in file name order.
///
/// A rename that would replace a different existing file is skipped.
pub fn rename_to_letters(dir: &Path, options: &RenameOptions) -> CatfontResult<RenameReport> {
    let files = list_with_extension(dir, &options.extension)?;
    let available = options.alphabet.len();

    if files.len() > available {
        warn!(
            "Found {} .{} files, but only {available} letters available; only the first {available} will be renamed.",
            files.len(),
            options.extension
        );
    } else if files.len() < available {
        warn!(
            "Found only {} .{} files, but {available} letters available; using the first {} letters.",
            files.len(),
            options.extension,
            files.len()
        );
    }

    let leftover = files.len().saturating_sub(available);
    let outcomes = files
        .into_iter()
        .zip(&options.alphabet)
        .map(|(from, letter)| {
            let to = dir.join(format!("{letter}.{}", options.extension));
            rename_one(from, to)
        })
        .collect();

    Ok(RenameReport { outcomes, leftover })
}

fn rename_one(from: PathBuf, to: PathBuf) -> RenameOutcome {
    if from == to {
        return RenameOutcome::Renamed { from, to };
    }
    if to.exists() {
        warn!(
            "Skipping {}: {} already exists",
            from.display(),
            to.display()
        );
        return RenameOutcome::Skipped { from, to };
    }
    match fs::rename(&from, &to) {
        Ok(()) => {
            info!("Renamed {} to {}", from.display(), to.display());
            RenameOutcome::Renamed { from, to }
        }
        Err(error) => {
            warn!("Error renaming {}: {error}", from.display());
            RenameOutcome::Failed { from, to, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("write");
    }

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).expect("read")
    }

    mod rename_to_letters {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn sorted_names_get_consecutive_letters() {
                let dir = TempDir::new().expect("tempdir");
                touch(dir.path(), "zebra.jpg", "z");
                touch(dir.path(), "apple.JPG", "a");
                touch(dir.path(), "mango.jpg", "m");
                touch(dir.path(), "notes.txt", "t");

                let report = rename_to_letters(dir.path(), &RenameOptions::default()).expect("rename");
                assert_eq!(report.renamed(), 3);
                assert_eq!(report.leftover, 0);
                assert_eq!(read(dir.path(), "A.jpg"), "a");
                assert_eq!(read(dir.path(), "B.jpg"), "m");
                assert_eq!(read(dir.path(), "C.jpg"), "z");
                assert_eq!(read(dir.path(), "notes.txt"), "t");
            }

            #[test]
            fn existing_destination_is_not_overwritten() {
                let dir = TempDir::new().expect("tempdir");
                for (name, body) in [("one.jpg", "1"), ("two.jpg", "2"), ("three.jpg", "3")] {
                    touch(dir.path(), name, body);
                }
                rename_to_letters(dir.path(), &RenameOptions::default()).expect("first");
                // one -> A, three -> B, two -> C
                touch(dir.path(), "0extra.jpg", "x");

                let report = rename_to_letters(dir.path(), &RenameOptions::default()).expect("second");
                assert!(matches!(report.outcomes[0], RenameOutcome::Skipped { .. }));
                assert_eq!(read(dir.path(), "A.jpg"), "1");
                assert_eq!(read(dir.path(), "0extra.jpg"), "x");
                // the last letter moves on to a free name
                assert_eq!(read(dir.path(), "D.jpg"), "2");
                assert_eq!(report.skipped(), 3);
                assert_eq!(report.renamed(), 1);
            }

            #[test]
            fn already_named_file_is_a_no_op() {
                let dir = TempDir::new().expect("tempdir");
                touch(dir.path(), "A.jpg", "a");

                let report = rename_to_letters(dir.path(), &RenameOptions::default()).expect("rename");
                assert_eq!(report.renamed(), 1);
                assert_eq!(read(dir.path(), "A.jpg"), "a");
            }

            #[test]
            fn files_beyond_the_alphabet_are_left_alone() {
                let dir = TempDir::new().expect("tempdir");
                for name in ["c.jpg", "a.jpg", "b.jpg"] {
                    touch(dir.path(), name, name);
                }
                let options = RenameOptions::default().with_alphabet(['X', 'Y']);

                let report = rename_to_letters(dir.path(), &options).expect("rename");
                assert_eq!(report.renamed(), 2);
                assert_eq!(report.leftover, 1);
                assert_eq!(read(dir.path(), "X.jpg"), "a.jpg");
                assert_eq!(read(dir.path(), "Y.jpg"), "b.jpg");
                assert_eq!(read(dir.path(), "c.jpg"), "c.jpg");
            }

            #[test]
            fn empty_directory_renames_nothing() {
                let dir = TempDir::new().expect("tempdir");
                let report = rename_to_letters(dir.path(), &RenameOptions::default()).expect("rename");
                assert!(report.outcomes.is_empty());
            }
        }
    }
}
