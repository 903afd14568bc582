use crate::areas::refs::{HEAD_REF_NAME, Head};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::errors::RepoError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print every branch, marking the one HEAD is on
    pub fn list_branches(&self) -> anyhow::Result<()> {
        let head = self.refs().head()?;

        if let Head::Detached(oid) = &head {
            writeln!(
                self.writer(),
                "* {}",
                format!("(HEAD detached at {})", oid.to_short_oid()).green()
            )?;
        }

        for branch in self.refs().list_branches()? {
            if head.branch() == Some(&branch) {
                writeln!(self.writer(), "* {}", branch.as_ref().green())?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(())
    }

    /// Create a branch at `start`, or at HEAD's commit when no start is given
    pub fn create_branch(&self, branch_name: &str, start: Option<&str>) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        let start_oid = match start {
            Some(start) => Revision::try_parse(start)?.resolve(self)?,
            None => self
                .refs()
                .read_head()?
                .ok_or_else(|| RepoError::RefNotFound(HEAD_REF_NAME.to_string()))?,
        };

        self.refs().create_branch(&branch_name, &start_oid)
    }

    pub fn delete_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        if self.refs().current_branch()?.as_ref() == Some(&branch_name) {
            anyhow::bail!(
                "cannot delete branch '{branch_name}' checked out at '{}'",
                self.path().display()
            );
        }

        let oid = self.refs().delete_branch(&branch_name)?;
        writeln!(
            self.writer(),
            "Deleted branch {branch_name} (was {}).",
            oid.to_short_oid()
        )?;

        Ok(())
    }
}
