
use std::collections::HashMap;

use ordo::operation::feature_rule_operations;
use ordo::reorganize::{add_new, is_dense, pack, reorganize, sort_by_priority, update_existing};
use ordo::validate::{find_duplicate_conditions, validate_percent_ranges, validate_rule};
use ordo::{PercentRange, Relation, Rule};
use proptest::prelude::*;
use strategies::{
    apply, arb_dense_scope, arb_disjoint_ranges, arb_scope_op, arb_shuffled_scope, arb_valid_rule,
    TestItem,
};

fn priorities(items: &[TestItem]) -> HashMap<String, i32> {
    items.iter().map(|i| (i.id.clone(), i.priority)).collect()
}

// ---------------------------------------------------------------------------
// Invariant 1: Density
//
// Any sequence of inserts, moves and deletes on a dense scope leaves the
// scope dense: priorities are exactly 1..=n in order.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn density_after_operation_sequences(
        mut scope in arb_dense_scope(12),
        ops in prop::collection::vec(arb_scope_op(), 1..20),
    ) {
        let mut next_id = 0;
        for op in &ops {
            apply(&mut scope, op, &mut next_id);
            prop_assert!(is_dense(&scope), "not dense after {:?}: {:?}", op, scope);
        }
    }

    #[test]
    fn add_new_grows_by_one(mut scope in arb_shuffled_scope(15), requested in -5_i32..30) {
        let before = scope.len();
        let item = TestItem { id: "new".into(), priority: requested };
        add_new(item, &mut scope).unwrap();
        prop_assert_eq!(scope.len(), before + 1);
        prop_assert!(is_dense(&scope));
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Minimal altered set
//
// The returned slice is exactly the entities whose priority changed, plus the
// moved entity itself.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn reorganize_alters_only_the_span(
        mut scope in arb_dense_scope(15),
        old_pick in any::<prop::sample::Index>(),
        new in -3_i32..20,
    ) {
        let before = priorities(&scope);
        let len = scope.len();
        let old = i32::try_from(old_pick.index(len) + 1).unwrap();
        let max = i32::try_from(len).unwrap();
        let landed = if new < 1 || new > max { max } else { new };
        let moved_id = scope[old_pick.index(len)].id.clone();

        let altered: Vec<TestItem> = reorganize(&mut scope, old, new).unwrap().to_vec();
        let expected_len = usize::try_from((old - landed).abs() + 1).unwrap();
        prop_assert_eq!(altered.len(), expected_len);
        prop_assert!(altered.iter().any(|i| i.id == moved_id));

        let after = priorities(&scope);
        let altered_ids: Vec<&str> = altered.iter().map(|i| i.id.as_str()).collect();
        for (id, priority) in &after {
            if before[id] != *priority || *id == moved_id {
                prop_assert!(altered_ids.contains(&id.as_str()), "{} changed but not reported", id);
            }
        }
        prop_assert_eq!(after[&moved_id], landed);
    }

    #[test]
    fn unchanged_priority_alters_nothing_else(
        mut scope in arb_dense_scope(10),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(scope.len());
        let edited = scope[index].clone();
        let previous = edited.priority;
        let altered = update_existing(edited.clone(), &mut scope, previous).unwrap().to_vec();
        prop_assert_eq!(altered, vec![edited]);
    }

    #[test]
    fn pack_reports_only_shifted_items(scope in arb_shuffled_scope(15), pick in any::<prop::sample::Index>()) {
        let mut sorted = scope.clone();
        sort_by_priority(&mut sorted);
        let deleted = sorted[pick.index(sorted.len())].clone();

        let remaining: Vec<TestItem> = scope.into_iter().filter(|i| i.id != deleted.id).collect();
        let altered = pack(remaining, &deleted.id);

        let expected: Vec<&TestItem> = sorted.iter().filter(|i| i.priority > deleted.priority).collect();
        prop_assert_eq!(altered.len(), expected.len());
        for (changed, original) in altered.iter().zip(expected) {
            prop_assert_eq!(&changed.id, &original.id);
            prop_assert_eq!(changed.priority, original.priority - 1);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Validation
//
// Generated trees with distinct conditions validate; repeating any condition
// is always reported.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn distinct_trees_validate(rule in arb_valid_rule()) {
        prop_assert!(validate_rule(&rule, feature_rule_operations()).is_ok(), "rejected {}", rule);
    }

    #[test]
    fn repeated_condition_rejected(rule in arb_valid_rule(), pick in any::<prop::sample::Index>()) {
        let conditions: Vec<_> = rule.conditions().into_iter().cloned().collect();
        let repeated = conditions[pick.index(conditions.len())].clone();
        let rule = rule.push_part(Relation::Or, Rule::when(repeated));
        prop_assert_eq!(find_duplicate_conditions(&rule).len(), 1);
        prop_assert!(validate_rule(&rule, feature_rule_operations()).is_err());
    }

    #[test]
    fn adjacent_ranges_accepted(ranges in arb_disjoint_ranges()) {
        prop_assert!(validate_percent_ranges(&ranges).is_ok());
    }

    #[test]
    fn any_repeated_range_overlaps(ranges in arb_disjoint_ranges(), pick in any::<prop::sample::Index>()) {
        let mut ranges: Vec<PercentRange> = ranges;
        let copy = ranges[pick.index(ranges.len())];
        ranges.push(copy);
        prop_assert!(validate_percent_ranges(&ranges).is_err());
    }
}
