use crate::config::PROJECT_SUFFIX;
use anyhow::{Context, Result};
use pagesmith_store::{import_project, ProjectRecord};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read a project file (plain JSON or a base64 data URI backup)
pub fn read_project(path: &Path) -> Result<ProjectRecord> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    import_project(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_project(path: &Path, record: &ProjectRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(&record.stripped())?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn is_project_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(PROJECT_SUFFIX))
        .unwrap_or(false)
}

/// `home.page.json` → `home`
pub fn project_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");
    name.strip_suffix(PROJECT_SUFFIX).unwrap_or(name).to_string()
}

pub fn find_project_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_project_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_file_names() {
        assert!(is_project_file(Path::new("pages/home.page.json")));
        assert!(!is_project_file(Path::new("pages/home.json")));
        assert_eq!(project_stem(Path::new("pages/shop.page.json")), "shop");
    }

    #[test]
    fn test_find_project_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.page.json"), "{}").unwrap();
        fs::write(dir.path().join("nested/b.page.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = find_project_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.page.json"));
    }
}
