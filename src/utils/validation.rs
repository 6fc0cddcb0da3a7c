//! Path and permission checks performed before any processing starts.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::AnnotationError;

/// Make `path` absolute relative to the current directory, without touching the filesystem
///
/// # Errors
///
/// Returns `std::io::Error` if the current directory cannot be determined.
pub fn make_absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn not_found(kind: &'static str, path: &Path) -> AnnotationError {
    AnnotationError::PathNotFound {
        kind,
        path: path.to_path_buf(),
    }
}

fn denied(kind: &'static str, access: &'static str, path: &Path) -> AnnotationError {
    AnnotationError::PermissionDenied {
        kind,
        access,
        path: path.to_path_buf(),
    }
}

/// Whether the current user can open `path` for writing, without truncating it
fn can_append(path: &Path) -> bool {
    OpenOptions::new().append(true).open(path).is_ok()
}

/// Whether the current user can create files in `dir`; the probe file is removed on drop
fn can_create_in(dir: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(".refalt-annotator-")
        .tempfile_in(dir)
        .is_ok()
}

/// Check that the input file exists and can be opened for reading
///
/// # Errors
///
/// Returns `AnnotationError::PathNotFound` or `AnnotationError::PermissionDenied`.
pub fn check_input(input: &Path) -> Result<(), AnnotationError> {
    if !input.is_file() {
        return Err(not_found("Input file", input));
    }
    fs::File::open(input).map_err(|_| denied("input file", "read", input))?;
    Ok(())
}

/// Check that the output can be created: its directory must exist and be
/// writable, and an existing output file must be writable.
///
/// # Errors
///
/// Returns `AnnotationError::PathNotFound` or `AnnotationError::PermissionDenied`.
pub fn check_output(output: &Path) -> Result<(), AnnotationError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.is_dir() {
        return Err(not_found("Output directory", dir));
    }
    if output.exists() && !can_append(output) {
        return Err(denied("output file", "write", output));
    }
    if !can_create_in(dir) {
        return Err(denied("output directory", "write", dir));
    }
    Ok(())
}

/// Check that the reference directory exists and can be listed
///
/// # Errors
///
/// Returns `AnnotationError::PathNotFound` or `AnnotationError::PermissionDenied`.
pub fn check_reference_dir(ref_dir: &Path) -> Result<(), AnnotationError> {
    if !ref_dir.is_dir() {
        return Err(not_found("Reference directory", ref_dir));
    }
    fs::read_dir(ref_dir).map_err(|_| denied("reference directory", "read", ref_dir))?;
    Ok(())
}

/// Run all pre-processing path checks
///
/// # Errors
///
/// Returns the first failing check.
pub fn validate_paths(input: &Path, output: &Path, ref_dir: &Path) -> Result<(), AnnotationError> {
    check_input(input)?;
    check_output(output)?;
    check_reference_dir(ref_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_make_absolute() {
        let abs = make_absolute(Path::new("/tmp/x.tsv")).unwrap();
        assert_eq!(abs, PathBuf::from("/tmp/x.tsv"));

        let rel = make_absolute(Path::new("x.tsv")).unwrap();
        assert!(rel.is_absolute());
        assert!(rel.ends_with("x.tsv"));
    }

    #[test]
    fn test_validate_paths_ok() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.tsv");
        fs::write(&input, "#CHROM\tPOS\tID\tallele1\tallele2\n").unwrap();
        let refs = dir.path().join("refs");
        fs::create_dir(&refs).unwrap();

        validate_paths(&input, &dir.path().join("out.tsv"), &refs).unwrap();
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = check_input(&dir.path().join("missing.tsv")).unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::PathNotFound {
                kind: "Input file",
                ..
            }
        ));
    }

    #[test]
    fn test_input_is_directory() {
        let dir = TempDir::new().unwrap();
        assert!(check_input(dir.path()).is_err());
    }

    #[test]
    fn test_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let err = check_output(&dir.path().join("nope").join("out.tsv")).unwrap_err();
        assert!(err.to_string().starts_with("Output directory not found"));
    }

    #[test]
    fn test_writable_output_is_untouched() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.tsv");
        fs::write(&output, "previous run\n").unwrap();

        check_output(&output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous run\n");
        // No leftover files from the directory check
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_readonly_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.tsv");
        fs::write(&output, "").unwrap();
        let mut perms = fs::metadata(&output).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&output, perms).unwrap();

        // Privileged users can write regardless of mode bits
        if OpenOptions::new().append(true).open(&output).is_ok() {
            return;
        }
        let err = check_output(&output).unwrap_err();
        assert!(matches!(err, AnnotationError::PermissionDenied { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_output_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("locked");
        fs::create_dir(&out_dir).unwrap();
        fs::set_permissions(&out_dir, fs::Permissions::from_mode(0o555)).unwrap();

        let writable = fs::File::create(out_dir.join("x")).is_ok();
        let result = check_output(&out_dir.join("out.tsv"));
        fs::set_permissions(&out_dir, fs::Permissions::from_mode(0o755)).unwrap();

        if writable {
            // Privileged users can write regardless of mode bits
            result.unwrap();
        } else {
            assert!(matches!(
                result.unwrap_err(),
                AnnotationError::PermissionDenied {
                    kind: "output directory",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_missing_reference_dir() {
        let dir = TempDir::new().unwrap();
        let err = check_reference_dir(&dir.path().join("refs")).unwrap_err();
        assert!(err.to_string().contains("Reference directory not found"));
    }
}
