use colored::{ColoredString, Colorize};

const LABEL_INDENT: usize = 8;

/// How the working tree differs from the index for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Modified,
    Deleted,
}

impl WorkspaceChangeType {
    pub fn code(&self) -> char {
        match self {
            WorkspaceChangeType::None => ' ',
            WorkspaceChangeType::Modified => 'M',
            WorkspaceChangeType::Deleted => 'D',
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WorkspaceChangeType::None => "",
            WorkspaceChangeType::Modified => "modified:   ",
            WorkspaceChangeType::Deleted => "deleted:    ",
        }
    }
}

/// How the index differs from HEAD's tree for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

impl IndexChangeType {
    pub fn code(&self) -> char {
        match self {
            IndexChangeType::None => ' ',
            IndexChangeType::Added => 'A',
            IndexChangeType::Modified => 'M',
            IndexChangeType::Deleted => 'D',
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IndexChangeType::None => "",
            IndexChangeType::Added => "new file:   ",
            IndexChangeType::Modified => "modified:   ",
            IndexChangeType::Deleted => "deleted:    ",
        }
    }
}

/// Both sides of a tracked path's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub(crate) index_change: IndexChangeType,
    pub(crate) workspace_change: WorkspaceChangeType,
}

impl FileChange {
    pub fn is_unmodified(&self) -> bool {
        self.index_change == IndexChangeType::None
            && self.workspace_change == WorkspaceChangeType::None
    }

    /// Two-column porcelain code: index state, then working tree state
    pub fn porcelain_code(&self) -> String {
        format!("{}{}", self.index_change.code(), self.workspace_change.code())
    }

    /// Indented label for the "Changes to be committed" section
    pub fn staged_label(&self) -> ColoredString {
        indented(self.index_change.label()).green()
    }

    /// Indented label for the "Changes not staged for commit" section
    pub fn unstaged_label(&self) -> ColoredString {
        indented(self.workspace_change.label()).red()
    }
}

fn indented(label: &str) -> String {
    format!("{:>width$}{label}", "", width = LABEL_INDENT)
}
