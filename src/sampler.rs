// sampler.rs

use crate::error::{Result, SubsampleError};
use crate::groups::Grouping;
use log::debug;
use rand::{seq::index, Rng};

/// Draws fixed-size subsamples from every group of a [`Grouping`].
///
/// Construction checks the sample size against every group, so `draw` cannot fail.
#[derive(Debug)]
pub(crate) struct GroupedSampler<'a> {
    grouping: &'a Grouping,
    sample_size: usize,
}

impl<'a> GroupedSampler<'a> {
    pub(crate) fn try_new(grouping: &'a Grouping, sample_size: usize) -> Result<Self> {
        if let Some(group) = grouping
            .groups()
            .iter()
            .find(|g| g.row_indices.len() < sample_size)
        {
            return Err(SubsampleError::SampleSizeExceedsGroup {
                group: group.key.to_string(),
                requested: sample_size,
                available: group.row_indices.len(),
            });
        }
        Ok(Self {
            grouping,
            sample_size,
        })
    }

    pub(crate) fn rows_per_replicate(&self) -> usize {
        self.sample_size * self.grouping.len()
    }

    /// One replicate: `sample_size` distinct rows from each group, concatenated group by group.
    /// Returned values are row indices into the source table.
    pub(crate) fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut selected = Vec::with_capacity(self.rows_per_replicate());
        for group in self.grouping.groups() {
            let picks = index::sample(rng, group.row_indices.len(), self.sample_size);
            selected.extend(picks.iter().map(|i| group.row_indices[i]));
        }
        debug!(
            "Drew {} row(s) across {} group(s).",
            selected.len(),
            self.grouping.len()
        );
        selected
    }
}
