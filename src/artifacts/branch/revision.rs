use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{MIN_PREFIX_LENGTH, OBJECT_ID_LENGTH};
use crate::errors::RepoError;
use anyhow::Context;

/// A revision expression naming a commit
///
/// Supported forms:
/// - `HEAD`, or its alias `@`
/// - branch names: `master`, `feature/login`
/// - full object IDs and unique prefixes of at least four hex characters
/// - `<revision>^`: first parent
/// - `<revision>~<n>`: n-th first-parent ancestor
///
/// Hex-looking names are parsed as refs and only treated as object IDs when no branch with
/// that name exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(String),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent.captures(revision) {
            Ok(Revision::Parent(Box::new(Self::try_parse(&caps[1])?)))
        } else if let Some(caps) = ancestor.captures(revision) {
            let generations = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;

            Ok(Revision::Ancestor(Box::new(Self::try_parse(&caps[1])?), generations))
        } else {
            let name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            if name != HEAD_REF_NAME {
                BranchName::try_parse(name.to_string())?;
            }

            Ok(Revision::Ref(name.to_string()))
        }
    }

    /// The commit this revision names
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => Self::resolve_name(name, repository),
            Revision::Parent(base) => {
                let oid = base.resolve(repository)?;
                Self::first_parent(&oid, repository)?
                    .ok_or_else(|| RepoError::RefNotFound(self.to_string()).into())
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::first_parent(&oid, repository)?
                        .ok_or_else(|| RepoError::RefNotFound(self.to_string()))?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_name(name: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if name == HEAD_REF_NAME {
            return repository.refs().resolve_ref(name);
        }

        if let Some(oid) = repository
            .refs()
            .read_branch(&BranchName::try_parse(name.to_string())?)?
        {
            return Ok(oid);
        }

        if Self::looks_like_oid(name) {
            return Self::resolve_oid(name, repository);
        }

        Err(RepoError::RefNotFound(name.to_string()).into())
    }

    fn first_parent(oid: &ObjectId, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        let commit = repository.database().parse_object_as_commit(oid)?;
        Ok(commit.parent().cloned())
    }

    fn resolve_oid(prefix: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        let database = repository.database();
        let candidates = database
            .find_objects_by_prefix(prefix)?
            .into_iter()
            .filter(|oid| matches!(database.object_type(oid), Ok(ObjectType::Commit)))
            .collect::<Vec<_>>();

        match candidates.as_slice() {
            [] => Err(RepoError::RefNotFound(prefix.to_string()).into()),
            [oid] => Ok(oid.clone()),
            _ => Err(RepoError::AmbiguousRef {
                prefix: prefix.to_string(),
                candidates: candidates.iter().map(ObjectId::to_short_oid).collect(),
            }
            .into()),
        }
    }

    fn looks_like_oid(name: &str) -> bool {
        (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}
