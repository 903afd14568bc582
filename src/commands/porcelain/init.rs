use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;
use std::io::Write;
use tracing::info;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        let reinitialized = self.git_path().is_dir();

        fs::create_dir_all(self.database().objects_path())
            .context("failed to create .twig/objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("failed to create .twig/refs/heads directory")?;

        // the default branch stays unborn until the first commit
        if !self.refs().head_path().exists() {
            self.refs()
                .attach_head(&BranchName::default_branch())
                .context("failed to create initial HEAD reference")?;
        }

        info!(path = %self.git_path().display(), reinitialized, "initialized repository");
        let verb = if reinitialized {
            "Reinitialized existing"
        } else {
            "Initialized empty"
        };
        writeln!(
            self.writer(),
            "{verb} twig repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
