use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_algorithm::{EditKind, Hunk, MyersDiff};
use crate::artifacts::diff::diff_target::DiffTarget;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::status_info::{Status, StatusInfo};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

impl Repository {
    /// Show unstaged changes, or staged ones with `cached`, limited to `paths` when given
    pub fn diff(&self, cached: bool, paths: &[PathBuf]) -> anyhow::Result<()> {
        let mut index = self.load_index()?;
        let status_info = Status::new(self).collect(&mut index)?;
        index.save()?;

        let pathspecs = paths
            .iter()
            .map(|path| self.resolve_pathspec(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let selected = |file: &Path| {
            pathspecs.is_empty() || pathspecs.iter().any(|spec| file.starts_with(spec))
        };

        if cached {
            self.diff_head_index(&status_info, &index, &selected)
        } else {
            self.diff_index_workspace(&status_info, &index, &selected)
        }
    }

    fn diff_index_workspace(
        &self,
        status_info: &StatusInfo,
        index: &Index,
        selected: &dyn Fn(&Path) -> bool,
    ) -> anyhow::Result<()> {
        for (file, change) in status_info.workspace_changes() {
            let Some(entry) = index.entry_by_path(file).filter(|_| selected(file)) else {
                continue;
            };

            let a = DiffTarget::from_index(entry, self.database())?;
            let b = match change.workspace_change {
                WorkspaceChangeType::Deleted => DiffTarget::from_nothing(file),
                _ => DiffTarget::from_file(file, self.workspace())?,
            };
            self.print_diff(&a, &b)?;
        }

        Ok(())
    }

    fn diff_head_index(
        &self,
        status_info: &StatusInfo,
        index: &Index,
        selected: &dyn Fn(&Path) -> bool,
    ) -> anyhow::Result<()> {
        for (file, change) in status_info.index_changes() {
            if !selected(file) {
                continue;
            }

            let head_target = || -> anyhow::Result<DiffTarget> {
                match status_info.head_tree().get(file) {
                    Some(entry) => DiffTarget::from_entry(file, entry, self.database()),
                    None => Ok(DiffTarget::from_nothing(file)),
                }
            };
            let index_target = || -> anyhow::Result<DiffTarget> {
                match index.entry_by_path(file) {
                    Some(entry) => DiffTarget::from_index(entry, self.database()),
                    None => Ok(DiffTarget::from_nothing(file)),
                }
            };

            let (a, b) = match change.index_change {
                IndexChangeType::Added => (DiffTarget::from_nothing(file), index_target()?),
                IndexChangeType::Deleted => (head_target()?, DiffTarget::from_nothing(file)),
                _ => (head_target()?, index_target()?),
            };
            self.print_diff(&a, &b)?;
        }

        Ok(())
    }

    fn print_diff(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if a.oid == b.oid && a.mode == b.mode {
            return Ok(());
        }

        let header = format!(
            "diff --git {} {}",
            Path::new("a").join(&a.file).display(),
            Path::new("b").join(&b.file).display()
        );
        writeln!(self.writer(), "{}", header.bold())?;
        self.print_diff_mode(a, b)?;
        self.print_diff_content(a, b)?;

        Ok(())
    }

    fn print_diff_mode(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if a.mode.is_none() {
            let line = format!("new file mode {}", b.pretty_mode());
            writeln!(self.writer(), "{}", line.bold())?;
        } else if b.mode.is_none() {
            let line = format!("deleted file mode {}", a.pretty_mode());
            writeln!(self.writer(), "{}", line.bold())?;
        } else if a.mode != b.mode {
            writeln!(self.writer(), "{}", format!("old mode {}", a.pretty_mode()).bold())?;
            writeln!(self.writer(), "{}", format!("new mode {}", b.pretty_mode()).bold())?;
        }

        Ok(())
    }

    fn print_diff_content(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if a.oid == b.oid {
            return Ok(());
        }

        let mut oid_range = format!("index {}..{}", a.oid.to_short_oid(), b.oid.to_short_oid());
        if a.mode == b.mode {
            oid_range.push_str(&format!(" {}", a.pretty_mode()));
        }

        writeln!(self.writer(), "{}", oid_range.bold())?;
        writeln!(self.writer(), "{}", format!("--- {}", a.diff_path("a").display()).bold())?;
        writeln!(self.writer(), "{}", format!("+++ {}", b.diff_path("b").display()).bold())?;

        let edits = MyersDiff::new(&a.data, &b.data).diff();
        for hunk in Hunk::group(&edits) {
            self.print_diff_hunk(&hunk)?;
        }

        Ok(())
    }

    fn print_diff_hunk(&self, hunk: &Hunk<String>) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", hunk.header().cyan())?;

        for edit in hunk.edits() {
            let (text, terminated) = match edit.value.strip_suffix('\n') {
                Some(text) => (text, true),
                None => (edit.value.as_str(), false),
            };
            let line = format!("{}{text}", edit.marker());
            match edit.kind {
                EditKind::Equal => writeln!(self.writer(), "{line}")?,
                EditKind::Delete => writeln!(self.writer(), "{}", line.red())?,
                EditKind::Insert => writeln!(self.writer(), "{}", line.green())?,
            }
            if !terminated {
                writeln!(self.writer(), "{NO_NEWLINE_MARKER}")?;
            }
        }

        Ok(())
    }
}
