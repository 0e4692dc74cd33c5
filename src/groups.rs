// groups.rs

use crate::error::Result;
use crate::table::Table;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

/// Cell values read as missing. A row with any of these in a treatment column joins no group.
pub(crate) const MISSING_KEY_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    MISSING_KEY_VALUES.contains(&cell)
}

/// Tuple of treatment-column values shared by every row of a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct GroupKey(pub(crate) Vec<String>);

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Group {
    pub(crate) key: GroupKey,
    pub(crate) row_indices: Vec<usize>,
}

/// Rows of a table partitioned by treatment key, in first-encountered key order.
#[derive(Debug)]
pub(crate) struct Grouping {
    groups: Vec<Group>,
    skipped_rows: usize,
}

impl Grouping {
    pub(crate) fn from_table<S: AsRef<str>>(table: &Table, treatment_columns: &[S]) -> Result<Self> {
        let key_indices = table.column_indices(treatment_columns)?;

        let mut groups: Vec<Group> = Vec::new();
        let mut position_by_key: HashMap<GroupKey, usize> = HashMap::new();
        let mut skipped_rows = 0usize;

        for (row_idx, row) in table.rows().iter().enumerate() {
            if key_indices.iter().any(|&col| is_missing(&row[col])) {
                skipped_rows += 1;
                continue;
            }
            let key = GroupKey(key_indices.iter().map(|&col| row[col].clone()).collect());
            match position_by_key.get(&key) {
                Some(&pos) => groups[pos].row_indices.push(row_idx),
                None => {
                    position_by_key.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        row_indices: vec![row_idx],
                    });
                }
            }
        }

        if skipped_rows > 0 {
            warn!(
                "{} row(s) have a missing value in treatment column(s) {:?} and were left out of every group.",
                skipped_rows,
                treatment_columns.iter().map(AsRef::as_ref).collect::<Vec<&str>>()
            );
        }
        for group in &groups {
            debug!("Group {}: {} row(s)", group.key, group.row_indices.len());
        }

        Ok(Self {
            groups,
            skipped_rows,
        })
    }

    pub(crate) fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}
