//! Property tests for pagination and timeline ordering

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use profile_directory::listing::shuffle_and_paginate;
use profile_directory::offset_for_page;
use profile_directory::timeline::compare_intervals;

fn date_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((2000i32..2030, 1u32..=12, 1u32..=28))
        .prop_map(|d| d.and_then(|(y, m, day)| NaiveDate::from_ymd_opt(y, m, day)))
}

proptest! {
    #[test]
    fn offset_past_end_is_empty(total in 0usize..200, extra in 0usize..50, limit in 1usize..50, seed in any::<u64>()) {
        let items: Vec<usize> = (0..total).collect();
        let page = shuffle_and_paginate(items, total + extra, limit, &mut StdRng::seed_from_u64(seed));
        prop_assert!(page.data.is_empty());
        prop_assert_eq!(page.total, total);
    }

    #[test]
    fn contiguous_page_sizes_sum_to_total(total in 0usize..200, limit in 1usize..40, seed in any::<u64>()) {
        // Every page is reshuffled independently; only sizes add up.
        let mut rng = StdRng::seed_from_u64(seed);
        let pages = total.div_ceil(limit).max(1);
        let mut seen = 0;
        for page_no in 1..=pages {
            let items: Vec<usize> = (0..total).collect();
            let page = shuffle_and_paginate(items, offset_for_page(page_no, limit), limit, &mut rng);
            prop_assert!(page.data.len() <= limit);
            prop_assert_eq!(page.total, total);
            prop_assert_eq!(page.page_count(limit), total.div_ceil(limit));
            seen += page.data.len();
        }
        prop_assert_eq!(seen, total);
    }

    #[test]
    fn shuffled_page_is_a_permutation_window(total in 1usize..100, seed in any::<u64>()) {
        let items: Vec<usize> = (0..total).collect();
        let page = shuffle_and_paginate(items, 0, total, &mut StdRng::seed_from_u64(seed));
        let mut data = page.data;
        data.sort_unstable();
        prop_assert_eq!(data, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn sorted_timeline_puts_missing_start_first(
        intervals in prop::collection::vec((date_strategy(), date_strategy()), 0..30)
    ) {
        let mut sorted = intervals.clone();
        sorted.sort_by(|a, b| compare_intervals(*a, *b));

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(compare_intervals(a, b) != std::cmp::Ordering::Greater);
            if a.0.is_some() {
                prop_assert!(b.0.is_some());
            }
            if a.0 == b.0 && a.1.is_none() {
                prop_assert!(b.1.is_none());
            }
        }
    }
}
