use crate::areas::index::Index;
use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::conflict::Conflicts;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepoError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    twig branch <new-branch-name>
"#;

impl Repository {
    /// Move HEAD to a branch or commit, updating the index and working tree to match
    ///
    /// Branch names attach HEAD; every other revision detaches it.
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        let current_head = self.refs().head()?;
        let current_oid = self.refs().read_head()?;

        let target_oid = Revision::try_parse(target)?.resolve(self)?;
        let target_branch = match BranchName::try_parse(target.to_string()) {
            Ok(name) if self.refs().read_branch(&name)?.is_some() => Some(name),
            _ => None,
        };

        let mut index = self.load_index()?;
        self.migrate(&mut index, &target_oid, false)?;
        index.save()?;

        let new_head = match target_branch {
            Some(name) => {
                self.refs().attach_head(&name)?;
                Head::Branch(name)
            }
            None => {
                self.refs().detach_head(&target_oid)?;
                Head::Detached(target_oid.clone())
            }
        };
        info!(target, oid = %target_oid, "checked out");

        self.print_previous_head(&current_head, current_oid.as_ref(), &target_oid)?;
        self.print_detachment_notice(&current_head, &new_head, target);
        self.print_new_head(&current_head, &new_head, &target_oid)
    }

    /// Overwrite working files with their staged content
    pub fn checkout_paths(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        for path in paths {
            let path = self.resolve_pathspec(path)?;
            let tracked = index.entries_under_path(&path);
            if tracked.is_empty() {
                return Err(RepoError::PathNotTracked(path).into());
            }

            for file in tracked {
                let Some(entry) = index.entry_by_path(&file) else {
                    continue;
                };
                let blob = self.database().parse_object_as_blob(&entry.oid)?;
                self.workspace()
                    .write_file(&file, blob.content(), entry.metadata.mode)?;

                let stat = self.workspace().stat_file(&file)?;
                index.update_entry_stat(&file, stat);
            }
        }

        index.save()
    }

    /// Bring the working tree and `index` to the tree of `target`
    ///
    /// Unless `force` is set, nothing is touched when the move would lose uncommitted work.
    /// The index is rebuilt to hold exactly the target's files; entries for files the
    /// migration did not rewrite keep their cached stat information.
    pub(crate) fn migrate(
        &self,
        index: &mut Index,
        target: &ObjectId,
        force: bool,
    ) -> anyhow::Result<()> {
        let current_files = Self::index_files(index);
        let target_files = self.database().flatten_commit(Some(target))?;

        let migration = if force {
            Migration::restore(&current_files, &target_files)
        } else {
            let conflicts = Conflicts::detect(self, index, &self.head_files()?, &target_files)?;
            if !conflicts.is_empty() {
                return Err(conflicts.into_error());
            }
            Migration::plan(&current_files, &target_files)
        };
        debug!(
            deletions = migration.deletions().count(),
            writes = migration.writes().count(),
            "applying migration"
        );

        self.workspace().apply_migration(&migration, self.database())?;

        let previous = index
            .entries()
            .map(|entry| (entry.name.clone(), entry.clone()))
            .collect::<BTreeMap<_, _>>();
        index.clear();

        for (path, target_entry) in target_files {
            match previous.get(&path) {
                Some(entry)
                    if entry.oid == target_entry.oid
                        && entry.metadata.mode == target_entry.mode
                        && !migration.is_rewritten(&path) =>
                {
                    index.stage(entry.clone());
                }
                _ => {
                    let mut stat = self.workspace().stat_file(&path)?;
                    stat.mode = target_entry.mode;
                    index.stage(IndexEntry::new(path, target_entry.oid, stat));
                }
            }
        }

        Ok(())
    }

    fn print_previous_head(
        &self,
        current_head: &Head,
        current_oid: Option<&ObjectId>,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        if let (Head::Detached(_), Some(current_oid)) = (current_head, current_oid)
            && current_oid != target_oid
        {
            self.print_head_position("Previous HEAD position was", current_oid)?;
        }

        Ok(())
    }

    fn print_detachment_notice(&self, current_head: &Head, new_head: &Head, target: &str) {
        if matches!(current_head, Head::Branch(_)) && matches!(new_head, Head::Detached(_)) {
            eprintln!("Note: checking out '{target}'.\n{DETACHMENT_NOTICE}");
        }
    }

    fn print_new_head(
        &self,
        current_head: &Head,
        new_head: &Head,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        match new_head {
            Head::Detached(_) => self.print_head_position("HEAD is now at", target_oid)?,
            Head::Branch(name) if new_head == current_head => eprintln!("Already on '{name}'"),
            Head::Branch(name) => eprintln!("Switched to branch '{name}'"),
        }

        Ok(())
    }

    pub(crate) fn print_head_position(&self, message: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self.database().parse_object_as_commit(oid)?;
        eprintln!("{message} {} {}", oid.to_short_oid(), commit.short_message());

        Ok(())
    }
}
