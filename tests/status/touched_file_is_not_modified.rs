use crate::common::command::{init_repository_dir, run_twig_command, twig_output};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use filetime::FileTime;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn touched_file_is_not_modified(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let file = dir.join("1.txt");

    let later = FileTime::from_unix_time(FileTime::now().unix_seconds() + 60, 0);
    filetime::set_file_mtime(&file, later).expect("Failed to touch file");

    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "");
    // the refreshed timestamps are kept, so a second run agrees without rehashing
    assert_eq!(twig_output(dir, &["status", "--porcelain"]), "");
}

#[rstest]
fn same_size_edit_is_detected(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let file = dir.join("1.txt");

    write_file(FileSpec::new(file.clone(), "two".to_string()));
    let later = FileTime::from_unix_time(FileTime::now().unix_seconds() + 60, 0);
    filetime::set_file_mtime(&file, later).expect("Failed to touch file");

    run_twig_command(dir, &["status", "--porcelain"])
        .assert()
        .success()
        .stdout(" M 1.txt\n");
}

#[cfg(unix)]
#[rstest]
fn mode_change_is_detected(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    crate::common::file::make_executable(&dir.join("1.txt"));

    assert_eq!(twig_output(dir, &["status", "--porcelain"]), " M 1.txt\n");
}
