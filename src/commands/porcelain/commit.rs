use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use crate::config::Identity;
use std::io::Write;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let message = message.trim();
        if message.is_empty() {
            anyhow::bail!("aborting commit due to empty commit message");
        }

        let author = Author::from_identity(&Identity::from_env()?)?;
        let index = self.load_index()?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let commit_oid = self.create_commit(
            &index,
            parent.into_iter().collect(),
            message.to_string(),
            author,
        )?;
        self.refs().update_head(&commit_oid)?;

        let position = match self.refs().current_branch()? {
            Some(branch) => branch.to_string(),
            None => "detached HEAD".to_string(),
        };
        let short_message = message.lines().next().unwrap_or_default();

        writeln!(
            self.writer(),
            "[{position} {is_root}{}] {short_message}",
            commit_oid.to_short_oid(),
        )?;

        Ok(())
    }
}
