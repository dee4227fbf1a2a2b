//! Store path helpers
//!
//! Store paths are `/`-separated and relative to the project root,
//! e.g. `Assets/Textures/rock.png`.

use std::path::Path;

/// Top-level folder every store path lives under
pub const ASSETS_ROOT: &str = "Assets";

/// Characters that may not appear in a file name on any supported host
const INVALID_FILE_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Last path segment, `rock.png` for `Assets/Textures/rock.png`
pub fn asset_name_from_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Name without its final extension
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Folder part of a store path, empty for a top-level name
pub fn parent_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join a folder and a file name with exactly one separator
pub fn join(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches(['/', '\\']);
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Strip every character that is invalid in a file name.
///
/// Path separators are removed entirely, so a prefix like `Mat/` can
/// never redirect output into another folder.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && !INVALID_FILE_NAME_CHARS.contains(c))
        .collect()
}

/// Normalize user input: trim whitespace, unify separators, drop trailing `/`
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .replace('\\', "/")
        .trim_end_matches('/')
        .trim_start_matches("./")
        .to_string()
}

/// Resolve a user-supplied folder to a store path under `project_root`.
///
/// Accepts a path that is already store-relative, an absolute path inside
/// the project, or any path containing an `Assets/` segment (the last one
/// wins, so paths copied from another checkout still resolve). Returns
/// `None` unless the result names an existing folder.
pub fn to_store_relative(project_root: &Path, raw: &str) -> Option<String> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return None;
    }

    let as_path = Path::new(&normalized);
    if as_path.is_relative() && project_root.join(as_path).is_dir() {
        return Some(normalized);
    }

    if as_path.is_absolute() {
        if let Ok(rest) = as_path.strip_prefix(project_root) {
            let relative = path_to_store_string(rest);
            if !relative.is_empty() && project_root.join(rest).is_dir() {
                return Some(relative);
            }
        }
    }

    let marker = format!("{}/", ASSETS_ROOT);
    let relative = match normalized.rfind(&marker) {
        Some(idx) => normalized[idx..].trim_end_matches('/').to_string(),
        None if normalized.ends_with(&format!("/{}", ASSETS_ROOT)) => ASSETS_ROOT.to_string(),
        None => return None,
    };

    if project_root.join(&relative).is_dir() {
        tracing::debug!("Resolved '{}' to store path '{}'", raw, relative);
        Some(relative)
    } else {
        None
    }
}

/// Render a relative filesystem path with `/` separators
pub fn path_to_store_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_project() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("matgen_paths_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("Assets").join("Textures")).unwrap();
        dir
    }

    #[test]
    fn test_asset_name_and_stem() {
        assert_eq!(asset_name_from_path("Assets/Textures/rock.png"), "rock.png");
        assert_eq!(asset_name_from_path("rock.png"), "rock.png");
        assert_eq!(file_stem("rock.png"), "rock");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert_eq!(parent_folder("Assets/Textures/rock.png"), "Assets/Textures");
    }

    #[test]
    fn test_join_trims_trailing_separators() {
        assert_eq!(join("Assets/Materials/", "M_rock.mat"), "Assets/Materials/M_rock.mat");
        assert_eq!(join("Assets\\Materials\\", "a.mat"), "Assets\\Materials/a.mat");
        assert_eq!(join("", "a.mat"), "a.mat");
    }

    #[test]
    fn test_sanitize_removes_separators_and_invalid_chars() {
        assert_eq!(sanitize_file_name("M_"), "M_");
        assert_eq!(sanitize_file_name("../evil/"), "..evil");
        assert_eq!(sanitize_file_name("a\\b:c*d?e\"f<g>h|i"), "abcdefghi");
        assert_eq!(sanitize_file_name("tab\there"), "tabhere");
        assert_eq!(sanitize_file_name(""), "");
    }

    #[test]
    fn test_to_store_relative_accepts_relative_and_absolute() {
        let root = temp_project();

        assert_eq!(
            to_store_relative(&root, " Assets/Textures/ "),
            Some("Assets/Textures".to_string())
        );

        let absolute = root.join("Assets").join("Textures");
        assert_eq!(
            to_store_relative(&root, absolute.to_str().unwrap()),
            Some("Assets/Textures".to_string())
        );

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_to_store_relative_uses_last_assets_segment() {
        let root = temp_project();

        assert_eq!(
            to_store_relative(&root, "/some/other/checkout/Assets/Textures"),
            Some("Assets/Textures".to_string())
        );
        assert_eq!(
            to_store_relative(&root, "C:\\work\\game\\Assets\\Textures\\"),
            Some("Assets/Textures".to_string())
        );
        assert_eq!(to_store_relative(&root, "/elsewhere/Assets/Missing"), None);
        assert_eq!(to_store_relative(&root, "/no/marker/here"), None);
        assert_eq!(to_store_relative(&root, "   "), None);

        fs::remove_dir_all(&root).ok();
    }
}
