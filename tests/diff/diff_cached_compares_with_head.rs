use crate::common::command::{init_repository_dir, run_twig_command, twig_output};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn diff_cached_shows_new_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("new.txt"), "fresh".to_string()));
    run_twig_command(dir, &["add", "new.txt"]).assert().success();

    assert_eq!(twig_output(dir, &["diff"]), "");

    let output = twig_output(dir, &["diff", "--cached"]);
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "diff --git a/new.txt b/new.txt");
    assert_eq!(lines[1], "new file mode 100644");
    assert!(lines[2].starts_with("index 0000000.."));
    assert_eq!(lines[3], "--- /dev/null");
    assert_eq!(lines[4], "+++ b/new.txt");
    assert_eq!(lines[5], "@@ -0,0 +1,1 @@");
    assert_eq!(lines[6], "+fresh");
    assert_eq!(lines[7], "\\ No newline at end of file");
    assert_eq!(lines.len(), 8);
}

#[rstest]
fn diff_staged_is_an_alias(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    run_twig_command(dir, &["add", "1.txt"]).assert().success();

    let cached = twig_output(dir, &["diff", "--cached"]);

    assert!(cached.contains("-one\n\\ No newline at end of file\n+uno\n"));
    assert_eq!(twig_output(dir, &["diff", "--staged"]), cached);
}
