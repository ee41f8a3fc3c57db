//! Property-based tests for splits-db
//!
//! Invariants exercised:
//! - prefix sums relate the raw and cumulative sequence interpretations
//! - category export/import is lossless and export is a fixpoint
//! - failed elementwise operations mutate nothing

use proptest::prelude::*;

use splits_db::codec::{TokenReader, TokenWriter};
use splits_db::model::{Category, Comparison, Name, Template};
use splits_db::seq::IntervalSeq;
use splits_db::time::Period;

// ============================================================================
// Strategies
// ============================================================================

/// Period at tenth-of-a-second resolution, built through the text form so
/// every generated value is exactly representable on the wire.
fn arb_period() -> impl Strategy<Value = Period> {
    (0i64..24, 0i64..60, 0i64..600).prop_map(|(h, m, tenths)| {
        let text = format!("{:02}:{:02}:{:04.1}", h, m, tenths as f64 / 10.0);
        text.parse().unwrap()
    })
}

fn arb_interval_seq(len: usize) -> impl Strategy<Value = IntervalSeq> {
    proptest::collection::vec(arb_period(), len).prop_map(IntervalSeq::from_vec)
}

/// Short alphanumeric identifier (single wire token).
fn arb_name() -> impl Strategy<Value = Name> {
    "[A-Za-z][A-Za-z0-9%]{0,8}".prop_map(|raw| Name::new(&raw).unwrap())
}

/// Category with one template and a handful of comparisons against it.
fn arb_category() -> impl Strategy<Value = Category> {
    (
        arb_name(),
        arb_name(),
        1usize..6,
        proptest::collection::btree_set(arb_name(), 0..4),
    )
        .prop_flat_map(|(category_name, template_name, size, comparison_names)| {
            let count = comparison_names.len();
            (
                Just(category_name),
                Just(template_name),
                Just(size),
                Just(comparison_names),
                proptest::collection::vec(arb_interval_seq(size), count),
            )
        })
        .prop_map(
            |(category_name, template_name, size, comparison_names, times)| {
                let mut category = Category::new(category_name);
                let id = category
                    .templates_mut()
                    .add(Template::new(template_name, size).unwrap())
                    .unwrap();
                for (comparison_name, seq) in comparison_names.into_iter().zip(times) {
                    let mut comparison = Comparison::new(comparison_name, id, size);
                    comparison.copy_times_from(&seq).unwrap();
                    category.comparisons_mut().add(comparison).unwrap();
                }
                category
            },
        )
}

fn close(a: Period, b: Period) -> bool {
    (a.seconds() - b.seconds()).abs() < 1e-6
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Adjacent prefix entries differ by exactly the raw segment.
    #[test]
    fn prop_prefix_sum_recovers_segments(raw in arb_interval_seq(8)) {
        let prefix = raw.prefix_sum();
        prop_assert_eq!(prefix.len(), raw.len() + 1);
        prop_assert_eq!(*prefix.get(0).unwrap(), Period::ZERO);
        for i in 0..raw.len() {
            prop_assert!(close(prefix.segment(i).unwrap(), raw[i]));
        }
    }

    /// Span queries agree between the raw and cumulative interpretations.
    #[test]
    fn prop_prefix_span_matches_raw_sum(raw in arb_interval_seq(8)) {
        let prefix = raw.prefix_sum();
        for start in 0..=raw.len() {
            for end in start..=raw.len() {
                prop_assert!(close(
                    prefix.sum_as_prefix(start, end).unwrap(),
                    raw.sum(start, end).unwrap()
                ));
            }
        }
    }

    /// Elementwise add then sub returns to the start (within rounding).
    #[test]
    fn prop_add_sub_round_trip(
        a in arb_interval_seq(6),
        b in arb_interval_seq(6)
    ) {
        let back = a.add(&b).unwrap().sub(&b).unwrap();
        for i in 0..a.len() {
            prop_assert!(close(back[i], a[i]));
        }
    }

    /// Mismatched lengths never mutate the destination.
    #[test]
    fn prop_size_mismatch_mutates_nothing(
        a in arb_interval_seq(5),
        b in arb_interval_seq(3)
    ) {
        let mut dest = a.clone();
        prop_assert!(dest.add_in_place(&b).is_err());
        prop_assert!(dest.sub_in_place(&b).is_err());
        prop_assert!(dest.copy_from(&b).is_err());
        prop_assert_eq!(dest, a);
    }

    /// A category survives the wire unchanged.
    #[test]
    fn prop_category_round_trip(category in arb_category()) {
        let mut w = TokenWriter::new(Vec::new());
        category.export_full(&mut w).unwrap();
        let written = w.into_inner();

        let mut r = TokenReader::new(written.as_slice());
        let copy = Category::import_full(&mut r).unwrap();
        prop_assert_eq!(&copy, &category);
    }

    /// Export is a fixpoint: re-exporting an imported category reproduces
    /// the bytes exactly.
    #[test]
    fn prop_export_is_canonical(category in arb_category()) {
        let mut w = TokenWriter::new(Vec::new());
        category.export_full(&mut w).unwrap();
        let first = w.into_inner();

        let mut r = TokenReader::new(first.as_slice());
        let copy = Category::import_full(&mut r).unwrap();

        let mut w = TokenWriter::new(Vec::new());
        copy.export_full(&mut w).unwrap();
        prop_assert_eq!(w.into_inner(), first);
    }

    /// Period text form round-trips exactly at tenth resolution.
    #[test]
    fn prop_period_text_round_trip(period in arb_period()) {
        let text = period.to_string();
        let parsed: Period = text.parse().unwrap();
        prop_assert_eq!(parsed, period);
        prop_assert_eq!(parsed.to_string(), text);
    }
}
