use prep_organizer_core::problem::parse_problem_url;
use prep_organizer_core::template::{join_repo_path, render_solution_file, solution_file_name};

const URL: &str = "https://leetcode.com/problems/two-sum/";

#[test]
fn renders_header_solution_and_notes() {
    let record = parse_problem_url(URL).expect("should parse");
    let solution = "def two_sum(nums, target):\n    return []";
    let notes = "Time: O(n)\n\nUse a hash map";

    let rendered = render_solution_file(&record, solution, notes);

    let expected = "\"\"\"\n\
Two Sum\n\
https://leetcode.com/problems/two-sum/\n\
\n\
Platform: leetcode\n\
\"\"\"\n\
\n\
# Solution\n\
def two_sum(nums, target):\n    return []\n\
\n\
# Notes\n\
# Time: O(n)\n\
# \n\
# Use a hash map\n";
    assert_eq!(rendered, expected);
}

#[test]
fn notes_block_is_omitted_when_notes_are_empty() {
    let record = parse_problem_url("https://neetcode.io/problem/valid-anagram").expect("should parse");
    let rendered = render_solution_file(&record, "pass\n", "");
    assert!(!rendered.contains("# Notes"));
    assert!(rendered.contains("Platform: neetcode\n"));
    assert!(rendered.ends_with("# Solution\npass\n"));
}

#[test]
fn whitespace_only_notes_still_get_a_notes_block() {
    let record = parse_problem_url("https://neetcode.io/problem/valid-anagram").expect("should parse");
    let rendered = render_solution_file(&record, "pass\n", "   ");
    assert!(rendered.ends_with("# Solution\npass\n\n# Notes\n#    \n"), "{rendered:?}");
}

#[test]
fn file_names_and_repo_paths() {
    assert_eq!(solution_file_name("Two Sum", "py"), "TwoSum.py");
    assert_eq!(solution_file_name("Two Sum", ".rs"), "TwoSum.rs");
    assert_eq!(solution_file_name("Two Sum", ""), "TwoSum");

    assert_eq!(join_repo_path(None, "TwoSum.py"), "TwoSum.py");
    assert_eq!(join_repo_path(Some(""), "TwoSum.py"), "TwoSum.py");
    assert_eq!(join_repo_path(Some("/leetcode/arrays/"), "TwoSum.py"), "leetcode/arrays/TwoSum.py");
}
