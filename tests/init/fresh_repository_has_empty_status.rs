use crate::common::command::{repository_dir, run_twig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn fresh_repository_has_empty_status(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_twig_command(repository_dir.path(), &["status", "--porcelain"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    run_twig_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout("On branch master\n\nNo commits yet\n\nnothing to commit\n");
}
