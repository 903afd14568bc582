use crate::common::command::{commit_file, head_oid, init_repository_dir, run_twig_command, twig_output};
use crate::common::file::read_file;
use crate::common::read_repo_file;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_switches_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "topic"]).assert().success();

    commit_file(dir, "a/b/4.txt", "four", "Add four");
    assert!(dir.join("a/b/4.txt").exists());

    run_twig_command(dir, &["checkout", "topic"])
        .assert()
        .success()
        .stderr("Switched to branch 'topic'\n");
    assert_eq!(read_repo_file(dir, "HEAD"), "ref: refs/heads/topic\n");
    assert!(!dir.join("a/b/4.txt").exists());
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "");

    run_twig_command(dir, &["checkout", "topic"])
        .assert()
        .success()
        .stderr("Already on 'topic'\n");

    run_twig_command(dir, &["checkout", "master"]).assert().success();
    assert_eq!(read_file(&dir.join("a/b/4.txt")), "four");
}

#[rstest]
fn checkout_of_a_commit_detaches_head(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_oid(dir);
    commit_file(dir, "1.txt", "uno", "Translate one");

    run_twig_command(dir, &["checkout", "HEAD^"])
        .assert()
        .success()
        .stderr(predicates::str::contains("You are in 'detached HEAD' state"))
        .stderr(predicates::str::ends_with(format!(
            "HEAD is now at {} Initial commit\n",
            &first[..7]
        )));

    assert_eq!(read_repo_file(dir, "HEAD"), format!("{first}\n"));
    assert_eq!(read_file(&dir.join("1.txt")), "one");
    assert_eq!(twig_output(dir, &["branch"]), format!("* (HEAD detached at {})\n  master\n", &first[..7]));

    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stderr(predicates::str::starts_with(format!(
            "Previous HEAD position was {} Initial commit\n",
            &first[..7]
        )));
    assert_eq!(read_file(&dir.join("1.txt")), "uno");
}

#[rstest]
fn checkout_of_unknown_revision_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["checkout", "nowhere"])
        .assert()
        .code(128)
        .stderr("fatal: reference nowhere not found\n");
}
