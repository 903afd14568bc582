use crate::common::command::{head_oid, init_repository_dir, run_twig_command};
use crate::common::read_repo_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn reinit_keeps_existing_state(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let oid_before = head_oid(repository_dir.path());

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Reinitialized existing twig repository"));

    assert_eq!(read_repo_file(repository_dir.path(), "HEAD"), "ref: refs/heads/master\n");
    assert_eq!(head_oid(repository_dir.path()), oid_before);

    Ok(())
}
