use crate::common::command::{init_repository_dir, repository_dir, run_twig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn log_without_commits_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();

    run_twig_command(dir, &["log"])
        .assert()
        .code(128)
        .stderr("fatal: your current branch 'master' does not have any commits yet\n");
}

#[rstest]
#[case("no-such-branch")]
#[case("HEAD~5")]
#[case("bad..name")]
fn log_of_unknown_revision_fails(init_repository_dir: TempDir, #[case] revision: &str) {
    run_twig_command(init_repository_dir.path(), &["log", revision])
        .assert()
        .code(128)
        .stderr(predicate::str::starts_with("fatal: "));
}
