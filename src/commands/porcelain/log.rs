use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the history reachable from `revision`, or from HEAD
    ///
    /// Commits are read one at a time as they are printed.
    pub fn log(&self, revision: Option<&str>, oneline: bool) -> anyhow::Result<()> {
        let start = match revision {
            Some(revision) => Revision::try_parse(revision)?.resolve(self)?,
            None => match self.refs().read_head()? {
                Some(oid) => oid,
                None => {
                    let branch = self.refs().current_branch()?.map(|b| b.to_string());
                    anyhow::bail!(
                        "your current branch '{}' does not have any commits yet",
                        branch.unwrap_or_else(|| "HEAD".to_string())
                    );
                }
            },
        };

        for (position, item) in RevList::new(self.database(), &[start])?.enumerate() {
            let (oid, commit) = item?;

            if oneline {
                self.show_commit_oneline(&oid, &commit)?;
            } else {
                if position > 0 {
                    writeln!(self.writer())?;
                }
                self.show_commit_medium(&oid, &commit)?;
            }
        }

        Ok(())
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {message_line}")?;
        }

        Ok(())
    }

    fn show_commit_oneline(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            oid.to_short_oid().yellow(),
            commit.short_message()
        )?;

        Ok(())
    }
}
