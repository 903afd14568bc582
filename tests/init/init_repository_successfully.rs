use crate::common::command::run_twig_command;
use crate::common::read_repo_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

#[test]
fn init_repository_successfully() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let dir_absolute_path = dir.path().canonicalize()?.display().to_string();

    run_twig_command(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty twig repository in .+\.twig\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    assert_eq!(read_repo_file(dir.path(), "HEAD"), "ref: refs/heads/master\n");
    assert!(dir.path().join(".twig/objects").is_dir());
    assert!(dir.path().join(".twig/refs/heads").is_dir());
    // the default branch is unborn until the first commit
    assert!(!dir.path().join(".twig/refs/heads/master").exists());

    Ok(())
}

#[test]
fn init_at_explicit_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let target = dir.path().join("project");

    run_twig_command(dir.path(), &["init", "project"])
        .assert()
        .success();

    assert!(target.join(".twig/HEAD").is_file());

    Ok(())
}
