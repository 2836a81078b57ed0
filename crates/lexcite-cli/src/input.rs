//! Input collection: document paths and question files.

use crate::error::{CliError, Result};
use lexcite_reader::SUPPORTED_EXTENSIONS;
use std::fs;
use std::path::{Path, PathBuf};

/// Files to ingest: supported files directly inside `folder` in name order,
/// then `files` as given.
pub fn collect_inputs(folder: Option<&Path>, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    if let Some(folder) = folder {
        if !folder.is_dir() {
            return Err(CliError::InvalidInput(format!("{} is not a directory", folder.display())));
        }
        let mut found: Vec<PathBuf> = fs::read_dir(folder)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_supported(path))
            .collect();
        if found.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "No {} files found in {}",
                SUPPORTED_EXTENSIONS.join("/"),
                folder.display()
            )));
        }
        found.sort();
        inputs.extend(found);
    }

    inputs.extend(files.iter().cloned());

    if inputs.is_empty() {
        return Err(CliError::InvalidInput(
            "No input documents: pass --folder or --file".to_string(),
        ));
    }
    Ok(inputs)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Questions from a batch file: one per line, blank lines and `#` lines skipped.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_queries(&contents))
}

fn parse_queries(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_folder_is_filtered_and_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.TXT", "c.docx", "notes.md", "image.png"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let inputs = collect_inputs(Some(dir.path()), &[PathBuf::from("extra.txt")]).unwrap();
        let names: Vec<String> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.pdf", "c.docx", "extra.txt"]);
    }

    #[test]
    fn test_empty_folder() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();
        let err = collect_inputs(Some(dir.path()), &[]).unwrap_err();
        assert!(err.to_string().contains("No .docx/.pdf/.txt files found"));
    }

    #[test]
    fn test_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        assert!(collect_inputs(Some(&file), &[]).is_err());
    }

    #[test]
    fn test_no_inputs() {
        assert!(collect_inputs(None, &[]).is_err());
        assert_eq!(collect_inputs(None, &[PathBuf::from("a.txt")]).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_queries() {
        let contents = "# contract review\nWho is the buyer?\n\n   \n  What is the cap?  \n#skip\n";
        assert_eq!(parse_queries(contents), vec!["Who is the buyer?", "What is the cap?"]);
    }
}
