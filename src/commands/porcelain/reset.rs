use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use std::io::Write;
use tracing::info;

impl Repository {
    /// Hard reset: point the current branch (or detached HEAD) at `revision` and make the
    /// index and working tree match it, discarding local changes to tracked files
    pub fn reset(&self, revision: &str) -> anyhow::Result<()> {
        let target_oid = Revision::try_parse(revision)?.resolve(self)?;

        let mut index = self.load_index()?;
        self.migrate(&mut index, &target_oid, true)?;
        index.save()?;

        self.refs().update_head(&target_oid)?;
        info!(oid = %target_oid, "reset HEAD");

        let commit = self.database().parse_object_as_commit(&target_oid)?;
        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            target_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
