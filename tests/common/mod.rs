#![allow(dead_code)]

pub mod command;
pub mod file;

/// Read a file of the repository directory, e.g. `HEAD` or `refs/heads/master`
pub fn read_repo_file(dir: &std::path::Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(".twig").join(name))
        .unwrap_or_else(|e| panic!("Failed to read .twig/{name}: {e}"))
}

/// Number of objects in the store, temporary files excluded
pub fn count_objects(dir: &std::path::Path) -> usize {
    walkdir::WalkDir::new(dir.join(".twig").join("objects"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with("tmp-obj-"))
        .count()
}
