use crate::common::command::{commit_file, head_oid, init_repository_dir, run_twig_command};
use crate::common::file::{FileSpec, read_file, write_file};
use crate::common::read_repo_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn staged_but_uncommitted_change_blocks_checkout(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_oid(dir);
    commit_file(dir, "1.txt", "uno", "Translate one");
    write_file(FileSpec::new(dir.join("1.txt"), "eins".to_string()));
    run_twig_command(dir, &["add", "1.txt"]).assert().success();

    run_twig_command(dir, &["checkout", &first])
        .assert()
        .code(1)
        .stderr(
            "your local changes to the following files would be overwritten by checkout:\n\
             \t1.txt\n\
             Please commit your changes before you switch branches.\n",
        );

    assert_eq!(read_file(&dir.join("1.txt")), "eins");
    assert_eq!(read_repo_file(dir, "HEAD"), "ref: refs/heads/master\n");
}

#[rstest]
fn untracked_file_in_the_way_blocks_checkout(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"]).assert().success();
    commit_file(dir, "new.txt", "committed", "Add new");
    run_twig_command(dir, &["checkout", "topic"]).assert().success();

    write_file(FileSpec::new(dir.join("new.txt"), "mine".to_string()));

    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\tnew.txt\n"));
    assert_eq!(read_file(&dir.join("new.txt")), "mine");
}

#[rstest]
fn untracked_file_with_same_content_is_not_a_conflict(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"]).assert().success();
    commit_file(dir, "new.txt", "committed", "Add new");
    run_twig_command(dir, &["checkout", "topic"]).assert().success();

    write_file(FileSpec::new(dir.join("new.txt"), "committed".to_string()));

    run_twig_command(dir, &["checkout", "master"]).assert().success();
}
