//! Rendering of the solution file that gets saved locally or committed.

use crate::problem::{title_to_identifier, ProblemRecord};

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "py";

/// Renders the solution file for `record`.
///
/// The notes block is emitted whenever `notes` is non-empty, even if it only
/// holds whitespace; every line of the notes is prefixed with `# `.
pub fn render_solution_file(record: &ProblemRecord, solution: &str, notes: &str) -> String {
    let mut out = format!(
        "\"\"\"\n{title}\n{url}\n\nPlatform: {platform}\n\"\"\"\n\n# Solution\n{solution}\n",
        title = record.title,
        url = record.url,
        platform = record.platform.tag(),
        solution = solution.trim_end_matches('\n'),
    );

    if !notes.is_empty() {
        out.push_str("\n# Notes\n");
        for line in notes.trim_end_matches('\n').lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// `Two Sum` with extension `py` becomes `TwoSum.py`.
pub fn solution_file_name(title: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    let stem = title_to_identifier(title);
    if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}

/// Joins an optional repository directory and a file name with `/`,
/// ignoring stray slashes at either end of the directory.
pub fn join_repo_path(directory: Option<&str>, file_name: &str) -> String {
    match directory.map(|d| d.trim_matches('/')).filter(|d| !d.is_empty()) {
        Some(dir) => format!("{dir}/{file_name}"),
        None => file_name.to_string(),
    }
}
