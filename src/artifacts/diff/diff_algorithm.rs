//! Myers line diff and hunk grouping
//!
//! `MyersDiff` finds a shortest edit script between two line sequences. `Hunk::group` then
//! cuts the script into unified-diff hunks, keeping `HUNK_CONTEXT` unchanged lines around
//! each run of changes and merging runs whose context would overlap.

use derive_new::new;

/// Unchanged lines shown before and after each change
pub const HUNK_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Equal,
    Delete,
    Insert,
}

/// One line of an edit script, with its 1-based line number on each side it exists on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit<T> {
    pub kind: EditKind,
    pub a_line: Option<usize>,
    pub b_line: Option<usize>,
    pub value: T,
}

impl<T> Edit<T> {
    fn equal(a_index: usize, b_index: usize, value: T) -> Self {
        Edit {
            kind: EditKind::Equal,
            a_line: Some(a_index + 1),
            b_line: Some(b_index + 1),
            value,
        }
    }

    fn delete(a_index: usize, value: T) -> Self {
        Edit {
            kind: EditKind::Delete,
            a_line: Some(a_index + 1),
            b_line: None,
            value,
        }
    }

    fn insert(b_index: usize, value: T) -> Self {
        Edit {
            kind: EditKind::Insert,
            a_line: None,
            b_line: Some(b_index + 1),
            value,
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind != EditKind::Equal
    }

    pub fn marker(&self) -> char {
        match self.kind {
            EditKind::Equal => ' ',
            EditKind::Delete => '-',
            EditKind::Insert => '+',
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Edit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.marker(), self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: Eq + Clone> MyersDiff<'_, T> {
    /// Furthest-reaching x per diagonal, recorded before each edit distance `d`
    fn shortest_edit(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let max = n + m;
        let offset = max;

        let mut v = vec![0isize; 2 * max as usize + 2];
        let mut trace = Vec::new();

        for d in 0..=max {
            trace.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset + k) as usize;

                let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                    v[idx + 1]
                } else {
                    v[idx - 1] + 1
                };
                let mut y = x - k;

                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }
                v[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    /// The edit script turning `a` into `b`, in order
    pub fn diff(&self) -> Vec<Edit<T>> {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let offset = x + y;
        let mut edits = Vec::new();

        for (d, v) in self.shortest_edit().iter().enumerate().rev() {
            let d = d as isize;
            let k = x - y;
            let at = |k: isize| v[(offset + k) as usize];

            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = at(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                x -= 1;
                y -= 1;
                edits.push(Edit::equal(x as usize, y as usize, self.a[x as usize].clone()));
            }

            if d > 0 {
                if x == prev_x {
                    edits.push(Edit::insert(prev_y as usize, self.b[prev_y as usize].clone()));
                } else {
                    edits.push(Edit::delete(prev_x as usize, self.a[prev_x as usize].clone()));
                }
            }

            (x, y) = (prev_x, prev_y);
        }

        edits.reverse();
        edits
    }
}

/// A contiguous slice of an edit script with its header ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    a_start: usize,
    b_start: usize,
    edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Cut an edit script into hunks; an unchanged script yields none
    pub fn group(edits: &[Edit<T>]) -> Vec<Hunk<T>> {
        let changes = edits
            .iter()
            .enumerate()
            .filter(|(_, edit)| edit.is_change())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        let mut ranges = Vec::<(usize, usize)>::new();
        for change in changes {
            let start = change.saturating_sub(HUNK_CONTEXT);
            let end = (change + HUNK_CONTEXT).min(edits.len() - 1);

            match ranges.last_mut() {
                Some((_, last_end)) if start <= *last_end + 1 => *last_end = end,
                _ => ranges.push((start, end)),
            }
        }

        ranges
            .into_iter()
            .map(|(start, end)| {
                let before = &edits[..start];
                Hunk {
                    a_start: before.iter().filter(|edit| edit.a_line.is_some()).count(),
                    b_start: before.iter().filter(|edit| edit.b_line.is_some()).count(),
                    edits: edits[start..=end].to_vec(),
                }
            })
            .collect()
    }
}

impl<T> Hunk<T> {
    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    pub fn a_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.a_line.is_some()).count()
    }

    pub fn b_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.b_line.is_some()).count()
    }

    /// First old line of the hunk, or the line before it when the hunk only inserts
    pub fn a_start(&self) -> usize {
        if self.a_size() == 0 {
            self.a_start
        } else {
            self.a_start + 1
        }
    }

    pub fn b_start(&self) -> usize {
        if self.b_size() == 0 {
            self.b_start
        } else {
            self.b_start + 1
        }
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start(),
            self.a_size(),
            self.b_start(),
            self.b_size()
        )
    }
}
