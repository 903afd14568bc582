use crate::common::command::{
    head_oid, repository_dir, run_twig_command, twig_commit, twig_output,
};
use crate::common::file::{FileSpec, read_file, write_file};
use crate::common::read_repo_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn first_commit_and_history_scenario(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "");

    write_file(FileSpec::new(dir.join("a.txt"), "hello".to_string()));
    run_twig_command(dir, &["add", "a.txt"]).assert().success();
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "A  a.txt\n");

    twig_commit(dir, "first")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master \(root-commit\) [0-9a-f]{7}\] first\n$")?);
    let first = head_oid(dir);
    assert_eq!(read_repo_file(dir, "refs/heads/master"), format!("{first}\n"));
    assert_eq!(twig_output(dir, &["log", "--oneline"]).lines().count(), 1);

    write_file(FileSpec::new(dir.join("a.txt"), "world".to_string()));
    run_twig_command(dir, &["add", "a.txt"]).assert().success();
    twig_commit(dir, "second").assert().success();
    let second = head_oid(dir);

    let log = twig_output(dir, &["log", "--oneline"]);
    assert_eq!(
        log,
        format!("{} second\n{} first\n", &second[..7], &first[..7])
    );
    assert_eq!(twig_output(dir, &["merge-base", "HEAD", "HEAD^"]), format!("{first}\n"));

    run_twig_command(dir, &["checkout", &first]).assert().success();
    assert_eq!(read_file(&dir.join("a.txt")), "hello");
    assert_eq!(read_repo_file(dir, "HEAD"), format!("{first}\n"));
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "");

    // an edit that is not committed anywhere blocks moving back
    write_file(FileSpec::new(dir.join("a.txt"), "dirty".to_string()));
    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("would be overwritten"))
        .stderr(predicate::str::contains("\ta.txt"));
    assert_eq!(read_file(&dir.join("a.txt")), "dirty");
    assert_eq!(read_repo_file(dir, "HEAD"), format!("{first}\n"));

    Ok(())
}
