use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, commit_file, head_oid, init_repository_dir, run_twig_command,
    twig_output,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn log_prints_medium_format(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_oid(dir);
    commit_file(dir, "1.txt", "uno", "Translate one\n\nSpanish this time");
    let second = head_oid(dir);

    let expected = format!(
        "commit {second}\n\
         Author: {AUTHOR_NAME} <{AUTHOR_EMAIL}>\n\
         Date:   Sun Jan 1 12:00:00 2023 +0000\n\
         \n    Translate one\n    \n    Spanish this time\n\
         \n\
         commit {first}\n\
         Author: {AUTHOR_NAME} <{AUTHOR_EMAIL}>\n\
         Date:   Sun Jan 1 12:00:00 2023 +0000\n\
         \n    Initial commit\n"
    );

    run_twig_command(dir, &["log"]).assert().success().stdout(expected);
    assert_eq!(twig_output(dir, &["log", "--oneline"]).lines().count(), 2);
}
