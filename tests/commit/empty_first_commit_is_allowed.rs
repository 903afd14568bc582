use crate::common::command::{repository_dir, run_twig_command, twig_commit, twig_output};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn empty_first_commit_is_allowed(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();

    twig_commit(dir, "Empty root").assert().success();

    assert!(twig_output(dir, &["log", "--oneline"]).ends_with(" Empty root\n"));
}
