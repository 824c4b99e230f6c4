//! Checking OC-DECLARE constraint arcs against a linked OCEL
//!
//! A source activation (regular or synthetic event of the arc's `from` node) violates an arc if
//! the number of matching target events is outside the arc's `counts` for at least one binding
//! of the arc label. Target events must involve the objects required by the binding and, for
//! `EF`/`EP`, happen strictly after/before the source. For `DF`/`DP` only the nearest later/earlier
//! event involving the required objects is considered: it counts as one target event if it is an
//! occurrence of the target node.
use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use rayon::prelude::*;

use crate::core::{
    event_data::object_centric::linked_ocel::{ObjectIndex, SlimLinkedOCEL},
    process_models::oc_declare::{
        allowed_violations, Cardinality, EventOrSynthetic, OCDeclareArc, OCDeclareArcType,
        OCDeclareNode, SetFilter, ViolationResult,
    },
};

type Binding = [SetFilter<ObjectIndex>];

/// Candidate events for a binding, starting from the objects of its first filter
///
/// `get_for_ob` lists the events of one object, `get_all` is used if no filter restricts objects.
/// A filter without objects (the source has no object of that type) admits no events.
fn candidates_for_binding(
    binding: &Binding,
    locel: &SlimLinkedOCEL,
    get_for_ob: impl Fn(ObjectIndex) -> Vec<EventOrSynthetic>,
    get_all: impl FnOnce() -> Vec<EventOrSynthetic>,
) -> Vec<EventOrSynthetic> {
    if binding.iter().any(|f| f.items().is_empty()) {
        return Vec::new();
    }
    let initial = match binding.first() {
        None => get_all(),
        Some(SetFilter::All(items)) => get_for_ob(items[0]),
        Some(SetFilter::Any(items)) => items
            .iter()
            .flat_map(|o| get_for_ob(*o))
            .sorted()
            .dedup()
            .collect(),
    };
    initial
        .into_iter()
        .filter(|e| {
            let obs = e.get_e2o(locel);
            binding.iter().all(|f| f.check(obs))
        })
        .collect()
}

/// Get all events of the given node satisfying the filters of a binding
pub fn get_evs_with_objs(
    binding: &Binding,
    locel: &SlimLinkedOCEL,
    node: &OCDeclareNode,
) -> Vec<EventOrSynthetic> {
    candidates_for_binding(
        binding,
        locel,
        |ob| EventOrSynthetic::get_all_of_node_for_ob(locel, node, ob),
        || EventOrSynthetic::get_all_of_node(locel, node),
    )
}

/// Get the event directly following (or preceding) the reference time among all events
/// (regular or synthetic) satisfying the filters of a binding
pub fn get_df_or_dp_event(
    binding: &Binding,
    locel: &SlimLinkedOCEL,
    reference_time: DateTime<FixedOffset>,
    following: bool,
) -> Option<EventOrSynthetic> {
    let candidates = candidates_for_binding(
        binding,
        locel,
        |ob| EventOrSynthetic::get_all_for_ob(locel, ob),
        || EventOrSynthetic::get_all(locel),
    );
    let in_direction = candidates.into_iter().filter(|e| {
        let e_time = e.get_timestamp(locel);
        if following {
            e_time > reference_time
        } else {
            e_time < reference_time
        }
    });
    if following {
        in_direction.min_by_key(|e| (e.get_timestamp(locel), *e))
    } else {
        in_direction.max_by_key(|e| (e.get_timestamp(locel), *e))
    }
}

fn count_violates(count: usize, counts: &Cardinality) -> bool {
    counts.0.is_some_and(|min| count < min) || counts.1.is_some_and(|max| count > max)
}

/// Check a single source activation against an arc
///
/// Returns `true` if violated
pub fn is_violated_for_ev(ev: &EventOrSynthetic, arc: &OCDeclareArc, locel: &SlimLinkedOCEL) -> bool {
    let ev_time = ev.get_timestamp(locel);
    arc.label
        .get_bindings(ev, locel)
        .iter()
        .any(|binding| match arc.arc_type {
            OCDeclareArcType::AS | OCDeclareArcType::EF | OCDeclareArcType::EP => {
                let targets = get_evs_with_objs(binding, locel, &arc.to);
                let matching = targets.iter().filter(|target| {
                    let target_time = target.get_timestamp(locel);
                    match arc.arc_type {
                        OCDeclareArcType::EF => ev_time < target_time,
                        OCDeclareArcType::EP => ev_time > target_time,
                        _ => true,
                    }
                });
                // Only count as far as needed to decide
                let count = match arc.counts {
                    (_, Some(max)) => matching.take(max.saturating_add(1)).count(),
                    (min, None) => matching.take(min.unwrap_or_default()).count(),
                };
                count_violates(count, &arc.counts)
            }
            OCDeclareArcType::DF | OCDeclareArcType::DP => {
                let next = get_df_or_dp_event(
                    binding,
                    locel,
                    ev_time,
                    arc.arc_type == OCDeclareArcType::DF,
                );
                let count = usize::from(next.is_some_and(|e| e.is_of_node(&arc.to, locel)));
                count_violates(count, &arc.counts)
            }
        })
}

/// Evaluate an arc: number of source activations and number of violating ones
///
/// Runs on the current rayon thread pool.
pub fn evaluate_arc(arc: &OCDeclareArc, locel: &SlimLinkedOCEL) -> ViolationResult {
    let activations = EventOrSynthetic::get_all_of_node(locel, &arc.from);
    let violating = activations
        .par_iter()
        .filter(|ev| is_violated_for_ev(ev, arc, locel))
        .count();
    ViolationResult::new(activations.len(), violating)
}

/// Checks whether the fraction of source activations violating the arc is at most `noise`
///
/// Stops as soon as too many violations were found. Arcs without activations are satisfied.
pub fn is_within_noise_threshold(arc: &OCDeclareArc, locel: &SlimLinkedOCEL, noise: f64) -> bool {
    let activations = EventOrSynthetic::get_all_of_node(locel, &arc.from);
    let allowed = allowed_violations(activations.len(), noise);
    let found = activations
        .par_iter()
        .filter(|ev| is_violated_for_ev(ev, arc, locel))
        .take_any(allowed + 1)
        .count();
    found <= allowed
}

impl OCDeclareArc {
    /// Evaluate this arc on a linked OCEL (see [`evaluate_arc`])
    pub fn evaluate(&self, locel: &SlimLinkedOCEL) -> ViolationResult {
        evaluate_arc(self, locel)
    }

    /// Get fraction of source activations violating this constraint arc
    ///
    /// Returns a value from 0 (all satisfy this constraint) to 1 (all violate this constraint),
    /// or 0 if there are no source activations.
    pub fn get_violation_fraction(&self, locel: &SlimLinkedOCEL) -> f64 {
        evaluate_arc(self, locel)
            .violation_fraction()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::process_models::oc_declare::{
            OCDeclareArcLabel, ObjectTypeAssociation, DEFAULT_CARDINALITY, NEGATED_CARDINALITY,
        },
        ocel,
    };

    fn act(name: &str) -> OCDeclareNode {
        OCDeclareNode::activity(name)
    }

    fn orders() -> ObjectTypeAssociation {
        ObjectTypeAssociation::new_simple("orders")
    }

    fn items() -> ObjectTypeAssociation {
        ObjectTypeAssociation::new_simple("items")
    }

    fn arc(
        from: OCDeclareNode,
        to: OCDeclareNode,
        arc_type: OCDeclareArcType,
        label: OCDeclareArcLabel,
        counts: Cardinality,
    ) -> OCDeclareArc {
        OCDeclareArc::new(from, to, arc_type, label, counts)
    }

    fn place_and_ship() -> SlimLinkedOCEL {
        SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("ship order", ["orders:o1"])
        ])
    }

    #[test]
    fn test_place_then_ship() {
        let locel = place_and_ship();
        let ef = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(ef.evaluate(&locel), ViolationResult::new(1, 0));

        let forbidden = OCDeclareArc {
            counts: NEGATED_CARDINALITY,
            ..ef.clone()
        };
        assert_eq!(forbidden.evaluate(&locel), ViolationResult::new(1, 1));

        let reversed = ef.clone_with_arc_type(OCDeclareArcType::EP);
        assert_eq!(reversed.evaluate(&locel), ViolationResult::new(1, 1));
    }

    #[test]
    fn test_no_source_events() {
        let locel = place_and_ship();
        let res = arc(
            act("cancel order"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        )
        .evaluate(&locel);
        assert_eq!(res, ViolationResult::new(0, 0));
        assert!(res.violation_percentage().no_data);
    }

    #[test]
    fn test_each_all_any() {
        // Only item i1 is picked after the order was placed
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1", "items:i1", "items:i2"]),
            ("pick item", ["items:i1"])
        ]);
        let check = |label: OCDeclareArcLabel| {
            arc(
                act("place order"),
                act("pick item"),
                OCDeclareArcType::EF,
                label,
                DEFAULT_CARDINALITY,
            )
            .evaluate(&locel)
        };
        assert_eq!(
            check(OCDeclareArcLabel::each(items())),
            ViolationResult::new(1, 1)
        );
        assert_eq!(
            check(OCDeclareArcLabel::all(items())),
            ViolationResult::new(1, 1)
        );
        assert_eq!(
            check(OCDeclareArcLabel::any(items())),
            ViolationResult::new(1, 0)
        );
        // Empty label: any later "pick item" event counts
        assert_eq!(
            check(OCDeclareArcLabel::default()),
            ViolationResult::new(1, 0)
        );
        // Each with no matching objects has no bindings and can not be violated
        assert_eq!(
            check(OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple(
                "customers"
            ))),
            ViolationResult::new(1, 0)
        );
        // Any with no matching objects can never be satisfied
        assert_eq!(
            check(OCDeclareArcLabel::any(ObjectTypeAssociation::new_simple(
                "customers"
            ))),
            ViolationResult::new(1, 1)
        );
    }

    #[test]
    fn test_max_counts() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("send reminder", ["orders:o1"]),
            ("send reminder", ["orders:o1"]),
            ("send reminder", ["orders:o1"])
        ]);
        let reminders = |counts| {
            arc(
                act("place order"),
                act("send reminder"),
                OCDeclareArcType::EF,
                OCDeclareArcLabel::each(orders()),
                counts,
            )
            .evaluate(&locel)
        };
        assert_eq!(reminders((Some(1), Some(3))).violating, 0);
        assert_eq!(reminders((Some(1), Some(2))).violating, 1);
        assert_eq!(reminders((Some(4), None)).violating, 1);
        assert_eq!(reminders((None, None)).violating, 0);
    }

    #[test]
    fn test_o2o_association() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("pick item", ["items:i1"]),
            ("place order", ["orders:o2"]),
            o2o:
            ("orders:o1", "items:i1"),
            ("orders:o2", "items:i2")
        ]);
        let res = arc(
            act("place order"),
            act("pick item"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(ObjectTypeAssociation::new_o2o("orders", "items")),
            DEFAULT_CARDINALITY,
        )
        .evaluate(&locel);
        // o2 -> i2, but i2 is never picked
        assert_eq!(res, ViolationResult::new(2, 1));

        let rev = arc(
            act("pick item"),
            act("place order"),
            OCDeclareArcType::EP,
            OCDeclareArcLabel::each(ObjectTypeAssociation::new_o2o_rev("items", "orders")),
            DEFAULT_CARDINALITY,
        )
        .evaluate(&locel);
        assert_eq!(rev, ViolationResult::new(1, 0));
    }

    #[test]
    fn test_directly_follows() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("pay order", ["orders:o1"]),
            ("ship order", ["orders:o1"]),
            ("place order", ["orders:o2"]),
            ("ship order", ["orders:o2"])
        ]);
        let df = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::DF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        // For o1, payment happens in between
        assert_eq!(df.evaluate(&locel), ViolationResult::new(2, 1));
        let dp = arc(
            act("ship order"),
            act("pay order"),
            OCDeclareArcType::DP,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(dp.evaluate(&locel), ViolationResult::new(2, 1));
        // Negated directly-follows
        let ndf = OCDeclareArc {
            counts: NEGATED_CARDINALITY,
            negated: true,
            ..df
        };
        assert_eq!(ndf.evaluate(&locel), ViolationResult::new(2, 1));
    }

    #[test]
    fn test_object_lifecycle_nodes() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("ship order", ["orders:o1"]),
            ("place order", ["orders:o2"])
        ]);
        // Every order ends with shipping
        let ends_with_ship = arc(
            act("ship order"),
            OCDeclareNode::object_end("orders"),
            OCDeclareArcType::DF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(ends_with_ship.evaluate(&locel), ViolationResult::new(1, 0));
        // Every order is eventually shipped
        let shipped = arc(
            OCDeclareNode::object_init("orders"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(shipped.evaluate(&locel), ViolationResult::new(2, 1));
        // Placing happens exactly once per order
        let placed_once = arc(
            OCDeclareNode::object_init("orders"),
            act("place order"),
            OCDeclareArcType::AS,
            OCDeclareArcLabel::any(orders()),
            (Some(1), Some(1)),
        );
        assert_eq!(placed_once.evaluate(&locel), ViolationResult::new(2, 0));
    }

    #[test]
    fn test_noise_threshold() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("ship order", ["orders:o1"]),
            ("place order", ["orders:o2"]),
            ("place order", ["orders:o3"]),
            ("ship order", ["orders:o3"]),
            ("place order", ["orders:o4"]),
            ("ship order", ["orders:o4"])
        ]);
        let ef = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(ef.evaluate(&locel), ViolationResult::new(4, 1));
        assert!((ef.get_violation_fraction(&locel) - 0.25).abs() < 1e-9);
        assert!(is_within_noise_threshold(&ef, &locel, 0.25));
        assert!(!is_within_noise_threshold(&ef, &locel, 0.2));
    }

    #[test]
    fn test_all_without_objects() {
        // The order placement involves no items, so no target can involve all of them
        let locel = place_and_ship();
        let res = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::all(items()),
            DEFAULT_CARDINALITY,
        )
        .evaluate(&locel);
        assert_eq!(res, ViolationResult::new(1, 1));
        let df = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::DF,
            OCDeclareArcLabel::all(items()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(df.evaluate(&locel), ViolationResult::new(1, 1));
    }

    #[test]
    fn test_unbounded_max_count() {
        let locel = place_and_ship();
        let res = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(orders()),
            (Some(1), Some(usize::MAX)),
        )
        .evaluate(&locel);
        assert_eq!(res, ViolationResult::new(1, 0));
    }

    #[test]
    fn test_noise_threshold_boundary() {
        // 4 out of 5 orders are shipped: exactly 80% support
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("ship order", ["orders:o1"]),
            ("place order", ["orders:o2"]),
            ("ship order", ["orders:o2"]),
            ("place order", ["orders:o3"]),
            ("ship order", ["orders:o3"]),
            ("place order", ["orders:o4"]),
            ("ship order", ["orders:o4"]),
            ("place order", ["orders:o5"])
        ]);
        let ef = arc(
            act("place order"),
            act("ship order"),
            OCDeclareArcType::EF,
            OCDeclareArcLabel::each(orders()),
            DEFAULT_CARDINALITY,
        );
        assert_eq!(ef.evaluate(&locel), ViolationResult::new(5, 1));
        assert!(is_within_noise_threshold(&ef, &locel, 1.0 - 0.8));
        assert!(!is_within_noise_threshold(&ef, &locel, 1.0 - 0.81));
    }
}
