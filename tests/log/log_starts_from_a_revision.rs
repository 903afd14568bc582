use crate::common::command::{commit_file, head_oid, init_repository_dir, twig_output};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn log_starts_from_a_revision(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_oid(dir);
    commit_file(dir, "1.txt", "second", "Second commit");
    let second = head_oid(dir);
    commit_file(dir, "1.txt", "third", "Third commit");

    assert_eq!(
        twig_output(dir, &["log", "--oneline", "HEAD~1"]),
        format!("{} Second commit\n{} Initial commit\n", &second[..7], &first[..7])
    );
    assert_eq!(
        twig_output(dir, &["log", "--oneline", &second[..7]]),
        twig_output(dir, &["log", "--oneline", "master^"])
    );
    assert_eq!(
        twig_output(dir, &["log", "--oneline", "@~2"]),
        format!("{} Initial commit\n", &first[..7])
    );
}
