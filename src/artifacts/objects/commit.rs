//! Commit object
//!
//! A commit records a root tree, the commits it descends from, who made it and why.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Parent lines keep the order the caller supplied, since that order is part of the hash.
//! The message is stored verbatim after the first blank line.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, envelope};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::config::Identity;
use crate::errors::RepoError;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};
use std::io::BufRead;

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create an author, truncating the timestamp to whole seconds as stored on disk
    ///
    /// The name is written right before " <email>", so it must be non-empty and may not start
    /// or end with whitespace.
    pub fn new(name: String, email: String, timestamp: DateTime<FixedOffset>) -> anyhow::Result<Self> {
        for field in [&name, &email] {
            if field.contains(['<', '>', '\n']) {
                anyhow::bail!("invalid author field '{field}'");
            }
        }
        if name.is_empty() || name.trim() != name {
            anyhow::bail!("invalid author name '{name}'");
        }

        Ok(Author {
            name,
            email,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
        })
    }

    /// Author from the configured identity, dated now unless the identity pins a date
    pub fn from_identity(identity: &Identity) -> anyhow::Result<Self> {
        let timestamp = identity
            .date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset());

        Author::new(identity.name.clone(), identity.email.clone(), timestamp)
    }

    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Timestamp like "Sun Jan 1 12:00:00 2023 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, digits) = match raw.split_at_checked(1)? {
        ("+", digits) => (1, digits),
        ("-", digits) => (-1, digits),
        _ => return None,
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || RepoError::corrupt(None, format!("invalid author line '{value}'"));

        // "name <email> timestamp timezone", split from the right
        let mut parts = value.rsplitn(3, ' ');
        let timezone = parts.next().ok_or_else(invalid)?;
        let timestamp = parts.next().ok_or_else(invalid)?;
        let name_email = parts.next().ok_or_else(invalid)?;

        let email_start = name_email.find('<').ok_or_else(invalid)?;
        let email_end = name_email.rfind('>').ok_or_else(invalid)?;
        if email_end < email_start {
            return Err(invalid().into());
        }

        let name = name_email[..email_start]
            .strip_suffix(' ')
            .ok_or_else(invalid)?
            .to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let offset = parse_offset(timezone).ok_or_else(invalid)?;
        let timestamp = timestamp
            .parse::<i64>()
            .ok()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or_else(invalid)?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Just enough of a commit to walk the graph
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

impl PartialOrd for SlimCommit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SlimCommit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.oid.cmp(&other.oid))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// The author doubles as the committer
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the message, for one-line listings
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            timestamp: self.timestamp(),
        }
    }

    fn headers(&self) -> Vec<String> {
        let mut headers = vec![format!("tree {}", self.tree_oid)];
        headers.extend(self.parents.iter().map(|parent| format!("parent {parent}")));
        headers.push(format!("author {}", self.author.display()));
        headers.push(format!("committer {}", self.committer.display()));
        headers
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = format!("{}\n\n{}", self.headers().join("\n"), self.message);
        Ok(envelope(self.object_type(), content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        let content = String::from_utf8(content)
            .map_err(|_| RepoError::corrupt(None, "commit is not valid UTF-8"))?;
        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| RepoError::corrupt(None, "commit has no message separator"))?;

        let mut lines = headers.lines().peekable();
        let field = |line: Option<&str>, key: &str| -> anyhow::Result<String> {
            line.and_then(|line| line.strip_prefix(key))
                .and_then(|value| value.strip_prefix(' '))
                .map(str::to_string)
                .ok_or_else(|| RepoError::corrupt(None, format!("commit is missing its {key} line")).into())
        };

        let tree_oid = ObjectId::try_parse(field(lines.next(), "tree")?)
            .map_err(|e| RepoError::corrupt(None, e.to_string()))?;

        let mut parents = Vec::new();
        while lines.peek().is_some_and(|line| line.starts_with("parent ")) {
            let parent = field(lines.next(), "parent")?;
            parents.push(ObjectId::try_parse(parent).map_err(|e| RepoError::corrupt(None, e.to_string()))?);
        }

        let author = Author::try_from(field(lines.next(), "author")?.as_str())?;
        let committer = Author::try_from(field(lines.next(), "committer")?.as_str())?;

        if let Some(extra) = lines.next() {
            return Err(RepoError::corrupt(None, format!("unexpected commit header '{extra}'")).into());
        }

        Ok(Commit {
            parents,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        format!("{}\n\n{}", self.headers().join("\n"), self.message)
    }
}
