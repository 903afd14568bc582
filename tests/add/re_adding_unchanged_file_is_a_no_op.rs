use crate::common::command::{repository_dir, run_twig_command, twig_output};
use crate::common::file::write_generated_files;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn re_adding_unchanged_file_is_a_no_op(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();
    write_generated_files(dir, 3);

    run_twig_command(dir, &["add", "."]).assert().success();
    let index_before = std::fs::read(dir.join(".twig/index")).unwrap();
    let status_before = twig_output(dir, &["status", "--porcelain"]);

    run_twig_command(dir, &["add", "."]).assert().success();
    let index_after = std::fs::read(dir.join(".twig/index")).unwrap();

    assert_eq!(index_after, index_before);
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), status_before);
}
