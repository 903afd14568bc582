use crate::common::command::{commit_file, head_oid, init_repository_dir, run_twig_command, twig_output};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn merge_base_of_diverged_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "1.txt", "shared", "Shared history");
    let fork = head_oid(dir);

    run_twig_command(dir, &["branch", "topic"]).assert().success();
    commit_file(dir, "1.txt", "master side", "Master work");
    commit_file(dir, "1.txt", "master again", "More master work");

    run_twig_command(dir, &["checkout", "topic"]).assert().success();
    commit_file(dir, "a/2.txt", "topic side", "Topic work");

    assert_eq!(twig_output(dir, &["merge-base", "master", "topic"]), format!("{fork}\n"));
    assert_eq!(twig_output(dir, &["merge-base", "topic", "master"]), format!("{fork}\n"));
}

#[rstest]
fn merge_base_of_ancestor_is_the_ancestor(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_oid(dir);
    commit_file(dir, "1.txt", "uno", "Translate one");

    assert_eq!(twig_output(dir, &["merge-base", "HEAD", &first]), format!("{first}\n"));
}
