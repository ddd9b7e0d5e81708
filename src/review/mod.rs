//! Random sampling of transcription/audio pairs for listening review.

mod player;
mod table;
mod timestamp;

pub use player::{ReviewPlayer, ReviewSample};
pub use table::{ColumnRef, ReviewColumns, ReviewTable};
pub use timestamp::{format_timestamp, parse_timestamp};

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick up to `count` row indices, shuffled when `rng` is given.
pub fn select_rows<R: Rng>(row_count: usize, count: usize, rng: Option<&mut R>) -> Vec<usize> {
    let mut indices = (0..row_count).collect::<Vec<_>>();
    if let Some(rng) = rng {
        indices.shuffle(rng);
    }
    indices.truncate(count);
    indices
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn select_rows_without_shuffle_keeps_order() {
        let rows = select_rows::<StdRng>(5, 3, None);
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn select_rows_count_larger_than_table() {
        let rows = select_rows::<StdRng>(2, 20, None);
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first = select_rows(100, 10, Some(&mut a));
        let second = select_rows(100, 10, Some(&mut b));
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);

        let mut unique = first.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);
    }
}
