use crate::common::command::{commit_file, init_repository_dir, run_twig_command, twig_output};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn numbered_lines(changed: Option<(usize, &str)>) -> String {
    (1..=10)
        .map(|n| match changed {
            Some((line, text)) if line == n => format!("{text}\n"),
            _ => format!("line {n}\n"),
        })
        .collect()
}

#[rstest]
fn diff_shows_workspace_hunks(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "lines.txt", &numbered_lines(None), "Add lines");
    write_file(FileSpec::new(
        dir.join("lines.txt"),
        numbered_lines(Some((5, "line five"))),
    ));

    let output = twig_output(dir, &["diff"]);
    let mut lines = output.lines();

    assert_eq!(lines.next(), Some("diff --git a/lines.txt b/lines.txt"));
    assert!(lines.next().is_some_and(|line| line.starts_with("index ") && line.ends_with(" 100644")));
    assert_eq!(lines.next(), Some("--- a/lines.txt"));
    assert_eq!(lines.next(), Some("+++ b/lines.txt"));
    assert_eq!(lines.next(), Some("@@ -2,7 +2,7 @@"));
    assert_eq!(
        lines.collect::<Vec<_>>(),
        vec![
            " line 2", " line 3", " line 4", "-line 5", "+line five", " line 6", " line 7",
            " line 8",
        ]
    );
}

#[rstest]
fn diff_of_deleted_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    delete_path(&dir.join("1.txt"));

    run_twig_command(dir, &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted file mode 100644\n"))
        .stdout(predicate::str::contains("+++ /dev/null\n"))
        .stdout(predicate::str::contains(
            "@@ -1,1 +0,0 @@\n-one\n\\ No newline at end of file\n",
        ));
}

#[rstest]
fn diff_is_limited_to_paths(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    write_file(FileSpec::new(dir.join("a/2.txt"), "dos".to_string()));

    let output = twig_output(dir, &["diff", "a"]);

    assert!(output.contains("a/a/2.txt"));
    assert!(!output.contains("1.txt"));
}

#[rstest]
fn adding_a_final_newline_is_a_change(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "one\n".to_string()));

    let output = twig_output(dir, &["diff"]);

    assert!(output.ends_with(
        "@@ -1,1 +1,1 @@\n-one\n\\ No newline at end of file\n+one\n"
    ));
}

#[rstest]
fn clean_tree_has_empty_diff(init_repository_dir: TempDir) {
    assert_eq!(twig_output(init_repository_dir.path(), &["diff"]), "");
}
