use crate::common::command::{repository_dir, run_twig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn adding_a_missing_path_fails(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_twig_command(repository_dir.path(), &["add", "ghost.txt"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains(
            "fatal: pathspec 'ghost.txt' did not match any files",
        ));
}
