use crate::common::command::{
    commit_file, head_oid, init_repository_dir, repository_dir, run_twig_command, twig_output,
};
use crate::common::read_repo_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn branch_create_and_list(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_oid(dir);
    commit_file(dir, "1.txt", "uno", "Translate one");
    let second = head_oid(dir);

    run_twig_command(dir, &["branch", "topic"]).assert().success();
    run_twig_command(dir, &["branch", "feature/old", "HEAD~1"]).assert().success();

    assert_eq!(read_repo_file(dir, "refs/heads/topic"), format!("{second}\n"));
    assert_eq!(read_repo_file(dir, "refs/heads/feature/old"), format!("{first}\n"));
    assert_eq!(
        twig_output(dir, &["branch"]),
        "  feature/old\n* master\n  topic\n"
    );
}

#[rstest]
#[case("topic", "a branch named 'topic' already exists")]
#[case("bad..name", "'bad..name' is not a valid branch name")]
#[case("-dash", "'-dash' is not a valid branch name")]
fn branch_creation_failures(init_repository_dir: TempDir, #[case] name: &str, #[case] message: &str) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"]).assert().success();

    run_twig_command(dir, &["branch", "--", name])
        .assert()
        .code(128)
        .stderr(predicate::str::contains(message));
}

#[rstest]
fn branch_delete(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let oid = head_oid(dir);
    run_twig_command(dir, &["branch", "topic"]).assert().success();

    run_twig_command(dir, &["branch", "-d", "topic"])
        .assert()
        .success()
        .stdout(format!("Deleted branch topic (was {}).\n", &oid[..7]));
    assert!(!dir.join(".twig/refs/heads/topic").exists());

    run_twig_command(dir, &["branch", "-d", "master"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("cannot delete branch 'master' checked out at"));

    run_twig_command(dir, &["branch", "-d", "topic"])
        .assert()
        .code(128)
        .stderr("fatal: reference topic not found\n");
}

#[rstest]
fn branch_on_unborn_head_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();

    run_twig_command(dir, &["branch", "topic"])
        .assert()
        .code(128)
        .stderr("fatal: reference HEAD not found\n");
}
