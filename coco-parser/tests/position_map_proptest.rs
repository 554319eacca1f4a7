//! Property-based tests for position map coalescing and persistence

use coco_parser::coco::mapping::PositionMap;
use proptest::prelude::*;

proptest! {
    #[test]
    fn adjacent_single_characters_coalesce_into_one_run(
        n in 1usize..200,
        line in 0usize..50,
        column in 0usize..80,
        target_line in 0usize..500,
        target_column in 0usize..80,
    ) {
        let mut map = PositionMap::new("g.atg");
        for i in 0..n {
            map.record(line, column + i, target_line, target_column + i, 1);
        }
        prop_assert_eq!(map.len(), 1);
        prop_assert_eq!(map.entries()[0].length, n);
    }

    #[test]
    fn gapped_records_stay_separate(n in 1usize..200, gap in 1usize..5) {
        let mut map = PositionMap::new("g.atg");
        for i in 0..n {
            let column = i * (1 + gap);
            map.record(0, column, 3, column, 1);
        }
        prop_assert_eq!(map.len(), n);
    }

    #[test]
    fn serialized_map_answers_every_lookup_identically(
        runs in prop::collection::vec((0usize..40, 0usize..60, 0usize..40, 0usize..60, 1usize..12), 0..30)
    ) {
        let mut map = PositionMap::new("Grammar.atg");
        for (line, column, target_line, target_column, length) in &runs {
            map.record(*line, *column, *target_line, *target_column, *length);
        }
        let restored = PositionMap::deserialize(&map.serialize()).unwrap();

        prop_assert_eq!(restored.grammar(), "Grammar.atg");
        prop_assert_eq!(restored.entries(), map.entries());
        for (line, column, _, _, length) in &runs {
            for query_column in column.saturating_sub(1)..column + length + 1 {
                prop_assert_eq!(restored.lookup(*line, query_column), map.lookup(*line, query_column));
            }
        }
    }
}
