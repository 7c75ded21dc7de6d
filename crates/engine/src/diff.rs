// SPDX-License-Identifier: MIT

//!
//! The diff engine: the edit script that turns one snapshot's months into
//! another's
//!
//! The shortest edit script is found with Myers' O((N+M)D) algorithm, matching
//! months by [`YearMonth`](calendar_grid_core::YearMonth).  There is no
//! "changed in place" operation: months with equal year-months are the same
//! item with the same content under one configuration.
//!
//! Moves are not emitted.  A moved month would appear as a removal followed
//! by an insertion, but snapshots are strictly ascending so this never
//! happens between two generated snapshots.
//!

use calendar_grid_core::CalendarMonth;
use serde::Serialize;
use thiserror::Error;

/// Errors that can arise when applying an [`EditScript`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The script doesn't fit the list it is applied to
    #[error("Edit position `{position}` is out of bounds (list length `{len}`)")]
    PositionOutOfBounds { position: usize, len: usize },
}

/// A single edit.  Positions refer to the list as it is when the operation
/// is applied (i.e. after all earlier operations of the script).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    Insert {
        position: usize,
        month: CalendarMonth,
    },
    Remove {
        position: usize,
    },
}

/// An ordered list of [`EditOperation`]s
#[derive(
    derive_more::IntoIterator,
    derive_more::Index,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
)]
#[into_iterator(owned, ref)]
pub struct EditScript(Vec<EditOperation>);

impl FromIterator<EditOperation> for EditScript {
    fn from_iter<I: IntoIterator<Item = EditOperation>>(iter: I) -> Self {
        EditScript(iter.into_iter().collect())
    }
}

impl EditScript {
    pub fn operations(&self) -> &[EditOperation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The months the script inserts
    pub fn inserted(&self) -> impl Iterator<Item = &CalendarMonth> {
        self.0.iter().filter_map(|operation| match operation {
            EditOperation::Insert { month, .. } => Some(month),
            EditOperation::Remove { .. } => None,
        })
    }

    /// The number of removals
    pub fn removal_count(&self) -> usize {
        self.0
            .iter()
            .filter(|operation| matches!(operation, EditOperation::Remove { .. }))
            .count()
    }

    /// Apply the script, in order, to a copy of `old`
    pub fn apply(&self, old: &[CalendarMonth]) -> Result<Vec<CalendarMonth>, DiffError> {
        let mut months = old.to_vec();
        for operation in &self.0 {
            match operation {
                EditOperation::Insert { position, month } => {
                    if *position > months.len() {
                        return Err(DiffError::PositionOutOfBounds {
                            position: *position,
                            len: months.len(),
                        });
                    }
                    months.insert(*position, month.clone());
                }
                EditOperation::Remove { position } => {
                    if *position >= months.len() {
                        return Err(DiffError::PositionOutOfBounds {
                            position: *position,
                            len: months.len(),
                        });
                    }
                    months.remove(*position);
                }
            }
        }
        Ok(months)
    }
}

/// The shortest edit script that turns `old` into `new`.  Identical lists give
/// an empty script.
pub fn diff(old: &[CalendarMonth], new: &[CalendarMonth]) -> EditScript {
    let mut position = 0;
    let script: EditScript = shortest_edit(old, new)
        .into_iter()
        .filter_map(|edit| match edit {
            Edit::Keep => {
                position += 1;
                None
            }
            Edit::Delete => Some(EditOperation::Remove { position }),
            Edit::Insert(new_index) => {
                let operation = EditOperation::Insert {
                    position,
                    month: new[new_index].clone(),
                };
                position += 1;
                Some(operation)
            }
        })
        .collect();
    trace!(
        "Diffed {} -> {} months: {} operations",
        old.len(),
        new.len(),
        script.len()
    );
    script
}

/// One step along the edit path, in list order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edit {
    /// Keep the next old item
    Keep,

    /// Drop the next old item
    Delete,

    /// Insert the new item at this index of the new list
    Insert(usize),
}

/// Myers' greedy shortest edit path, traced back into a forward list of edits
fn shortest_edit<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max = n + m;
    let offset = max;

    // `v[k + offset]` is the furthest x reached on diagonal k.  A copy is kept
    // per edit distance so the path can be traced back.
    let mut v = vec![0isize; 2 * max as usize + 2];
    let mut trace = Vec::new();

    'search: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let index = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[index - 1] < v[index + 1]) {
                v[index + 1]
            } else {
                v[index - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            v[index] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    // Walk back from (n, m) to (0, 0)
    let mut edits = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let previous_k = if k == -d || (k != d && v[(k - 1 + offset) as usize] < v[(k + 1 + offset) as usize]) {
            k + 1
        } else {
            k - 1
        };
        let previous_x = v[(previous_k + offset) as usize];
        let previous_y = previous_x - previous_k;

        while x > previous_x && y > previous_y {
            edits.push(Edit::Keep);
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == previous_x {
                edits.push(Edit::Insert((y - 1) as usize));
            } else {
                edits.push(Edit::Delete);
            }
        }
        x = previous_x;
        y = previous_y;
    }
    edits.reverse();
    edits
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::generate;
    use calendar_grid_core::{MonthConfig, MonthPolicies, Weekday, YearMonth};
    use calendar_grid_macros::year_month;

    fn months(start: YearMonth, end: YearMonth) -> Vec<CalendarMonth> {
        let config = MonthConfig::new(start, end, Weekday::Mon, MonthPolicies::default()).unwrap();
        generate(&config)
    }

    fn year_months(months: &[CalendarMonth]) -> Vec<YearMonth> {
        months.iter().map(|month| month.year_month()).collect()
    }

    #[test]
    fn identical_lists_give_an_empty_script() {
        let old = months(year_month!(2022, 1), year_month!(2022, 12));
        let script = diff(&old, &old);
        assert!(script.is_empty());
        assert_eq!(script.apply(&old).unwrap(), old);
        assert!(diff(&[], &[]).is_empty());
    }

    #[test]
    fn shifted_range() {
        let old = months(year_month!(2022, 1), year_month!(2022, 3));
        let new = months(year_month!(2022, 2), year_month!(2022, 4));
        let script = diff(&old, &new);

        assert_eq!(script.len(), 2);
        assert_eq!(script[0], EditOperation::Remove { position: 0 });
        match &script[1] {
            EditOperation::Insert { position, month } => {
                assert_eq!(*position, 2);
                assert_eq!(month.year_month(), year_month!(2022, 4));
            }
            other => panic!("Expected an insert, got {other:?}"),
        }
        assert_eq!(year_months(&script.apply(&old).unwrap()), year_months(&new));
    }

    #[test]
    fn from_and_to_empty() {
        let new = months(year_month!(2022, 1), year_month!(2022, 3));
        let script = diff(&[], &new);
        assert_eq!(script.len(), 3);
        assert_eq!(script.inserted().count(), 3);
        assert_eq!(script.apply(&[]).unwrap(), new);

        let script = diff(&new, &[]);
        assert_eq!(script.removal_count(), 3);
        assert!(script.apply(&new).unwrap().is_empty());
    }

    #[test]
    fn disjoint_ranges() {
        let old = months(year_month!(2020, 1), year_month!(2020, 6));
        let new = months(year_month!(2023, 1), year_month!(2023, 2));
        let script = diff(&old, &new);
        assert_eq!(script.removal_count(), 6);
        assert_eq!(script.inserted().count(), 2);
        assert_eq!(script.apply(&old).unwrap(), new);
    }

    #[test]
    fn apply_law_holds_across_many_ranges() {
        let starts = [
            year_month!(2021, 10),
            year_month!(2022, 1),
            year_month!(2022, 2),
            year_month!(2022, 6),
        ];
        let ends = [
            year_month!(2022, 3),
            year_month!(2022, 4),
            year_month!(2022, 9),
            year_month!(2023, 1),
        ];
        for old_start in starts {
            for old_end in ends {
                for new_start in starts {
                    for new_end in ends {
                        if old_start > old_end || new_start > new_end {
                            continue;
                        }
                        let old = months(old_start, old_end);
                        let new = months(new_start, new_end);
                        let script = diff(&old, &new);
                        let applied = script.apply(&old).unwrap();
                        assert_eq!(year_months(&applied), year_months(&new));

                        // Overlapping months are kept, so the script is minimal
                        let overlap = old.iter().filter(|month| new.contains(month)).count();
                        assert_eq!(script.removal_count(), old.len() - overlap);
                        assert_eq!(script.inserted().count(), new.len() - overlap);
                    }
                }
            }
        }
    }

    #[test]
    fn shortest_edit_on_arbitrary_sequences() {
        // The classic example: ABCABBA -> CBABAC has edit distance 5
        let old: Vec<char> = "ABCABBA".chars().collect();
        let new: Vec<char> = "CBABAC".chars().collect();
        let edits = shortest_edit(&old, &new);
        let changes = edits.iter().filter(|edit| **edit != Edit::Keep).count();
        assert_eq!(changes, 5);

        // Replay the edits
        let mut old_index = 0;
        let mut result = Vec::new();
        for edit in edits {
            match edit {
                Edit::Keep => {
                    result.push(old[old_index]);
                    old_index += 1;
                }
                Edit::Delete => old_index += 1,
                Edit::Insert(new_index) => result.push(new[new_index]),
            }
        }
        assert_eq!(result, new);
    }

    #[test]
    fn apply_rejects_scripts_for_other_lists() {
        let old = months(year_month!(2022, 1), year_month!(2022, 3));
        let new = months(year_month!(2022, 2), year_month!(2022, 4));
        let script = diff(&old, &new);
        assert_eq!(
            script.apply(&[]),
            Err(DiffError::PositionOutOfBounds {
                position: 0,
                len: 0
            })
        );
    }

    #[test]
    fn serialises_operations() {
        let new = months(year_month!(2022, 1), year_month!(2022, 1));
        let script = diff(&new, &[]);
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, r#"[{"op":"remove","position":0}]"#);
    }
}
