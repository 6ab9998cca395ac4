//! Utility functions for path manipulation and display names.

use std::path::PathBuf;

/// Constructs a file system path by joining a directory path with a file or
/// subdirectory name.
///
/// # Arguments
///
/// * `dir_path` - The base directory path
/// * `subdir_path` - The subdirectory or file name to append
///
/// # Examples
///
/// ```ignore
/// let path = get_path("/home/user", "session.json");
/// assert_eq!(path, "/home/user/session.json");
/// ```
pub fn get_path(dir_path: &str, subdir_path: &str) -> String {
    let path_buf: PathBuf = [dir_path, subdir_path].iter().collect();
    path_buf.to_string_lossy().into_owned()
}

/// Turns a canonical id such as `dart_monkey` into `Dart Monkey`.
pub fn title_case(id: &str) -> String {
    id.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
