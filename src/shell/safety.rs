use crate::error::AppError;
use crate::scope_path;
use std::path::Path;

const PROTECTED_ROOTS: &[&str] = &[
    "/Applications",
    "/bin",
    "/boot",
    "/sbin",
    "/usr",
    "/System",
    "/Library",
    "/etc",
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
];

/// Checks a single path component supplied by the user for create/rename.
pub fn validate_entry_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidName("name is empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(AppError::InvalidName(format!("reserved name: {name}")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AppError::InvalidName(format!(
            "name must not contain path separators: {name}"
        )));
    }
    if name.contains('\0') {
        return Err(AppError::InvalidName("name contains NUL byte".to_string()));
    }
    Ok(())
}

pub fn is_protected_path(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    PROTECTED_ROOTS
        .iter()
        .any(|root| scope_path::is_within_scope(&raw, root))
}

pub fn validate_not_protected(path: &Path, enabled: bool) -> Result<(), AppError> {
    if enabled && is_protected_path(path) {
        return Err(AppError::Protected(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_entry_name("report.pdf").is_ok());
        assert!(validate_entry_name(".hidden").is_ok());
        assert!(validate_entry_name("with space").is_ok());
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("   ").is_err());
        assert!(validate_entry_name("..").is_err());
        assert!(validate_entry_name("a/b").is_err());
        assert!(validate_entry_name("a\\b").is_err());
        assert!(validate_entry_name("nul\0").is_err());
    }

    #[test]
    fn test_protected_paths() {
        assert!(is_protected_path(Path::new("/bin")));
        assert!(is_protected_path(Path::new("/usr/local/bin")));
        assert!(is_protected_path(Path::new("C:\\Program Files (x86)\\Common Files")));
        assert!(is_protected_path(Path::new("c:\\program files\\Common Files")));
        assert!(is_protected_path(Path::new("C:/WINDOWS/System32")));
        assert!(!is_protected_path(Path::new("/Users/test")));
        assert!(!is_protected_path(Path::new("/tmp")));
        assert!(!is_protected_path(Path::new("/usrdata")));
    }

    #[test]
    fn test_validate_not_protected_respects_toggle() {
        assert!(validate_not_protected(Path::new("/etc/hosts"), true).is_err());
        assert!(validate_not_protected(Path::new("/etc/hosts"), false).is_ok());
    }
}
