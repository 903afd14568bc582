use crate::common::command::{init_repository_dir, repository_dir, run_twig_command, twig_output};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("status")]
#[case("log")]
#[case("branch")]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] command: &str) {
    run_twig_command(repository_dir.path(), &[command])
        .assert()
        .code(128)
        .stderr(predicate::str::starts_with("fatal: not a twig repository"));
}

#[rstest]
fn commands_find_the_repository_from_a_subdirectory(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("a/b/loose.txt"), "loose".to_string()));

    assert_eq!(
        twig_output(&dir.join("a/b"), &["status", "--porcelain"]),
        "?? a/b/loose.txt\n"
    );
    assert_eq!(twig_output(&dir.join("a"), &["log", "--oneline"]).lines().count(), 1);
}

#[rstest]
fn corrupt_object_is_fatal(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let objects = walkdir::WalkDir::new(dir.join(".twig/objects"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    for object in &objects {
        let mut permissions = std::fs::metadata(object).unwrap().permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        std::fs::set_permissions(object, permissions).unwrap();
        std::fs::write(object, b"not zlib").unwrap();
    }

    run_twig_command(dir, &["log"])
        .assert()
        .code(128)
        .stderr(predicate::str::starts_with("fatal: "));
}
