use crate::common::command::{init_repository_dir, run_twig_command, twig_output};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn status_reports_each_change_kind(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    write_file(FileSpec::new(dir.join("a/2.txt"), "staged".to_string()));
    run_twig_command(dir, &["add", "a/2.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("a/2.txt"), "staged then changed".to_string()));
    delete_path(&dir.join("a/b/3.txt"));
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));
    run_twig_command(dir, &["add", "new.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("z/loose.txt"), "loose".to_string()));

    assert_eq!(
        twig_output(dir, &["status", "--porcelain"]),
        " M 1.txt\nMM a/2.txt\n D a/b/3.txt\nA  new.txt\n?? z/loose.txt\n"
    );
}

#[rstest]
fn status_prints_long_format_sections(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));
    run_twig_command(dir, &["add", "new.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("loose.txt"), "loose".to_string()));

    let expected = "On branch master\n\
        \n\
        Changes to be committed:\n\
        \x20       new file:   new.txt\n\
        \n\
        Changes not staged for commit:\n\
        \x20       modified:   1.txt\n\
        \n\
        Untracked files:\n\
        \x20       loose.txt\n";
    run_twig_command(dir, &["status"]).assert().success().stdout(expected);
}

#[rstest]
fn clean_status_says_so(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout("On branch master\n\nnothing to commit, working tree clean\n");
}
