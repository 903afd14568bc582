use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use colored::Colorize;
use std::io::Write;

// Terminology:
// - staged changes: the index differs from HEAD's tree
// - unstaged changes: a tracked file differs from its index entry
// - untracked files: files in the working tree the index does not know about
impl Repository {
    pub fn status(&self, porcelain: bool) -> anyhow::Result<()> {
        let mut index = self.load_index()?;
        let status_info = Status::new(self).collect(&mut index)?;

        // refreshed stat information saves rehashing next time
        index.save()?;

        if porcelain {
            self.print_porcelain_status(&status_info)
        } else {
            self.print_long_status(&status_info)
        }
    }

    fn print_porcelain_status(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        for (file, change) in &status_info.changed_files {
            writeln!(self.writer(), "{} {}", change.porcelain_code(), file.display())?;
        }
        for file in status_info.untracked_files() {
            writeln!(self.writer(), "?? {}", file.display())?;
        }

        Ok(())
    }

    fn print_long_status(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        match self.refs().head()? {
            Head::Branch(name) => writeln!(self.writer(), "On branch {name}")?,
            Head::Detached(oid) => writeln!(
                self.writer(),
                "{}",
                format!("HEAD detached at {}", oid.to_short_oid()).red()
            )?,
        }
        let unborn = self.refs().read_head()?.is_none();
        if unborn {
            writeln!(self.writer(), "\nNo commits yet")?;
        }

        let mut staged = status_info.index_changes().peekable();
        let has_staged = staged.peek().is_some();
        if has_staged {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for (file, change) in staged {
                writeln!(
                    self.writer(),
                    "{}{}",
                    change.staged_label(),
                    file.display().to_string().green()
                )?;
            }
        }

        let mut unstaged = status_info.workspace_changes().peekable();
        let has_unstaged = unstaged.peek().is_some();
        if has_unstaged {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for (file, change) in unstaged {
                writeln!(
                    self.writer(),
                    "{}{}",
                    change.unstaged_label(),
                    file.display().to_string().red()
                )?;
            }
        }

        let mut untracked = status_info.untracked_files().peekable();
        let has_untracked = untracked.peek().is_some();
        if has_untracked {
            writeln!(self.writer(), "\nUntracked files:")?;
            for file in untracked {
                writeln!(self.writer(), "{}", format!("        {}", file.display()).red())?;
            }
        }

        let summary = if has_staged {
            None
        } else if has_unstaged {
            Some("no changes added to commit")
        } else if has_untracked {
            Some("nothing added to commit but untracked files present")
        } else if unborn {
            Some("nothing to commit")
        } else {
            Some("nothing to commit, working tree clean")
        };
        if let Some(summary) = summary {
            writeln!(self.writer(), "\n{summary}")?;
        }

        Ok(())
    }
}
