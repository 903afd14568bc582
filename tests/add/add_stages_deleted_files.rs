use crate::common::command::{init_repository_dir, run_twig_command, twig_output};
use crate::common::file::delete_path;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn add_stages_deleted_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    delete_path(&dir.join("a/2.txt"));

    run_twig_command(dir, &["add", "."]).assert().success();

    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "D  a/2.txt\n");
}

#[rstest]
fn add_replaces_directory_with_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    delete_path(&dir.join("a"));
    std::fs::write(dir.join("a"), "now a file").unwrap();

    run_twig_command(dir, &["add", "a"]).assert().success();

    assert_eq!(
        twig_output(dir, &["status", "--porcelain"]),
        "A  a\nD  a/2.txt\nD  a/b/3.txt\n"
    );
}
