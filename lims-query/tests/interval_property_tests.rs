//! Property tests for the interval boundary type.

use lims_query::{Interval, IntervalUnit};
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = IntervalUnit> {
    prop_oneof![
        Just(IntervalUnit::Seconds),
        Just(IntervalUnit::Minutes),
        Just(IntervalUnit::Hours),
        Just(IntervalUnit::Days),
        Just(IntervalUnit::Weeks),
    ]
}

proptest! {
    /// Whatever we render for Postgres parses back to the same window.
    #[test]
    fn display_parse_round_trip(count in 1u64..1_000_000, unit in unit_strategy()) {
        let window = Interval::new(count, unit);
        let parsed: Interval = window.to_string().parse().unwrap();
        prop_assert_eq!(parsed, window);
    }

    /// Growing the count never shrinks the window.
    #[test]
    fn window_growth_is_monotonic(a in 1u64..1_000_000, b in 1u64..1_000_000, unit in unit_strategy()) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Interval::new(small, unit).as_secs() <= Interval::new(large, unit).as_secs());
    }

    /// The rendered form never smuggles anything past the validator.
    #[test]
    fn rendered_form_stays_in_the_grammar(count in 1u64..1_000_000, unit in unit_strategy()) {
        let rendered = Interval::new(count, unit).as_pg();
        prop_assert!(rendered.parse::<Interval>().is_ok(), "rejected {rendered:?}");
    }
}
