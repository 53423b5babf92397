//! Property tests over whole differ trees.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use tdiff_types::{DifferOp, Presence, UpdatePath};

use crate::differ::{Differ, DifferRef};
use crate::leaf::LeafDiffer;
use crate::map::MapDiffer;
use crate::record::RecordDiffer;
use crate::seq::SeqDiffer;
use crate::set::SetDiffer;

#[derive(Clone, Debug)]
struct Order {
    id: u32,
    tags: BTreeSet<String>,
    lines: Vec<i64>,
    totals: BTreeMap<String, f64>,
}

fn order_differ() -> DifferRef<Order> {
    let tags: SetDiffer<String, BTreeSet<String>> =
        SetDiffer::for_collection(LeafDiffer::<String>::equal());
    let totals: MapDiffer<String, f64, BTreeMap<String, f64>> =
        MapDiffer::for_collection(LeafDiffer::<String>::equal(), LeafDiffer::<f64>::numeric());
    std::sync::Arc::new(
        RecordDiffer::builder("Order")
            .field("id", |o: &Order| &o.id, LeafDiffer::<u32>::equal())
            .field("tags", |o: &Order| &o.tags, tags)
            .field("lines", |o: &Order| &o.lines, SeqDiffer::new(LeafDiffer::<i64>::equal()))
            .field("totals", |o: &Order| &o.totals, totals)
            .build(),
    )
}

fn arb_order() -> impl Strategy<Value = Order> {
    (
        any::<u32>(),
        prop::collection::btree_set("[a-z]{1,4}", 0..4),
        prop::collection::vec(any::<i64>(), 0..6),
        prop::collection::btree_map("[a-z]{1,3}", any::<f64>(), 0..4),
    )
        .prop_map(|(id, tags, lines, totals)| Order {
            id,
            tags,
            lines,
            totals,
        })
}

fn ignore_paths() -> Vec<UpdatePath> {
    vec![
        UpdatePath::root().field("id"),
        UpdatePath::root().field("tags"),
        UpdatePath::root().field("tags").each(),
        UpdatePath::root().field("lines").each(),
        UpdatePath::root().field("totals").values(),
    ]
}

proptest! {
    #[test]
    fn diffing_a_value_with_itself_is_ok(order in arb_order()) {
        prop_assert!(order_differ().diff_pair(&order, &order).is_ok());
    }

    #[test]
    fn key_matched_sequence_is_reflexive(lines in prop::collection::vec(any::<i64>(), 0..8)) {
        let differ = SeqDiffer::new(LeafDiffer::<i64>::equal())
            .update_with(&UpdatePath::root(), &DifferOp::match_by(|v: &i64| *v))
            .unwrap();
        prop_assert!(differ.diff_pair(&lines, &lines).is_ok());
    }

    #[test]
    fn ignoring_the_root_masks_everything(a in arb_order(), b in arb_order()) {
        let ignored = order_differ().ignore().unwrap();
        let result = ignored.diff_pair(&a, &b);
        prop_assert!(result.is_ok());
        prop_assert!(result.is_ignored());
    }

    #[test]
    fn ignoring_twice_equals_ignoring_once(
        a in arb_order(),
        b in arb_order(),
        which in 0usize..5,
    ) {
        let path = &ignore_paths()[which];
        let once = order_differ().ignore_at(path).unwrap();
        let twice = once.ignore_at(path).unwrap();
        prop_assert_eq!(once.diff_pair(&a, &b), twice.diff_pair(&a, &b));
    }

    #[test]
    fn field_update_leaves_other_fields_alone(a in arb_order(), new_id in any::<u32>()) {
        prop_assume!(new_id != a.id);
        let differ = order_differ()
            .ignore_at(&UpdatePath::root().field("lines"))
            .unwrap();

        let mut b = a.clone();
        b.id = new_id;
        b.lines.push(1);
        prop_assert!(!differ.diff_pair(&a, &b).is_ok());

        b.id = a.id;
        prop_assert!(differ.diff_pair(&a, &b).is_ok());
    }

    #[test]
    fn one_sided_leaf_is_ok_only_when_ignored(v in any::<i32>(), ignored in any::<bool>()) {
        let differ = LeafDiffer::<i32>::equal().set_ignored(ignored);
        prop_assert_eq!(differ.diff(Presence::ActualOnly(&v)).is_ok(), ignored);
        prop_assert_eq!(differ.diff(Presence::ExpectedOnly(&v)).is_ok(), ignored);
    }
}

#[test]
fn result_tree_serializes_to_json() {
    let a = Order {
        id: 1,
        tags: ["x".to_string()].into_iter().collect(),
        lines: vec![1, 2],
        totals: [("net".to_string(), 1.5)].into_iter().collect(),
    };
    let mut b = a.clone();
    b.lines = vec![2];

    let result = order_differ().diff_pair(&a, &b);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "record");
    assert_eq!(json["is_ok"], false);
    assert_eq!(json["fields"][2][0], "lines");
    assert_eq!(json["fields"][2][1]["kind"], "list");
}
