use crate::common::command::{init_repository_dir, run_twig_command, twig_output};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn rm_removes_file_and_entry(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["rm", "a/b/3.txt"])
        .assert()
        .success()
        .stdout("rm 'a/b/3.txt'\n");

    assert!(!dir.join("a/b/3.txt").exists());
    assert!(!dir.join("a/b").exists());
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "D  a/b/3.txt\n");
}

#[rstest]
fn rm_cached_keeps_the_working_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["rm", "--cached", "1.txt"])
        .assert()
        .success();

    assert!(dir.join("1.txt").is_file());
    assert_eq!(
        twig_output(dir, &["status", "--porcelain"]),
        "D  1.txt\n?? 1.txt\n"
    );
}

#[rstest]
fn rm_of_untracked_path_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    std::fs::write(dir.join("loose.txt"), "loose").unwrap();

    run_twig_command(dir, &["rm", "loose.txt"])
        .assert()
        .code(128)
        .stderr("fatal: pathspec 'loose.txt' did not match any tracked file\n");

    assert!(dir.join("loose.txt").is_file());
}
