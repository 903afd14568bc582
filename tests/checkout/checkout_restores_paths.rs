use crate::common::command::{init_repository_dir, run_twig_command, twig_output};
use crate::common::file::{FileSpec, delete_path, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_restores_paths(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "scribbles".to_string()));
    delete_path(&dir.join("a"));

    run_twig_command(dir, &["checkout", "--", "1.txt", "a"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("1.txt")), "one");
    assert_eq!(read_file(&dir.join("a/2.txt")), "two");
    assert_eq!(read_file(&dir.join("a/b/3.txt")), "three");
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "");
}

#[rstest]
fn checkout_restores_staged_content(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "staged".to_string()));
    run_twig_command(dir, &["add", "1.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "unstaged".to_string()));

    run_twig_command(dir, &["checkout", "--", "1.txt"]).assert().success();

    assert_eq!(read_file(&dir.join("1.txt")), "staged");
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "M  1.txt\n");
}

#[rstest]
fn checkout_of_untracked_path_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["checkout", "--", "ghost.txt"])
        .assert()
        .code(128)
        .stderr("fatal: pathspec 'ghost.txt' did not match any tracked file\n");
}
