use crate::common::command::{repository_dir, run_twig_command};
use crate::common::count_objects;
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn identical_contents_share_one_blob(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(dir.join("first.txt"), "same bytes".to_string()));
    write_file(FileSpec::new(dir.join("nested/second.txt"), "same bytes".to_string()));

    run_twig_command(dir, &["add", "."]).assert().success();

    assert_eq!(count_objects(dir), 1);
}
