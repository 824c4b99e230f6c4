//! Discovering OC-DECLARE Models from Object-Centric Event Data
use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    conformance::oc_declare::is_within_noise_threshold,
    core::{
        event_data::object_centric::linked_ocel::SlimLinkedOCEL,
        process_models::oc_declare::{
            get_activity_object_involvements, get_object_to_object_involvements,
            get_rev_object_to_object_involvements, Cardinality, OCDeclareArc, OCDeclareArcLabel,
            OCDeclareArcType, OCDeclareNode, ObjectInvolvementCounts, ObjectTypeAssociation,
            ALL_OC_DECLARE_ARC_TYPES, EXIT_EVENT_PREFIX, INIT_EVENT_PREFIX,
        },
    },
};

/// Involvement statistics as produced by [`get_activity_object_involvements`] and friends
type Involvements = HashMap<String, HashMap<String, ObjectInvolvementCounts>>;

/// Per-object counts at or above this value are not turned into lifecycle constraints
///
/// Such counts usually grow with the log (e.g., resources) and do not describe a lifecycle.
const MAX_LIFECYCLE_COUNT: usize = 20;

/// O2O Mode for OC-DECLARE Discovery
///
/// Determines to what extent object-to-object (O2O) relationships are considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum O2OMode {
    /// O2O relationships are not considered at all
    None,
    /// Direct O2O relationships are considered (i.e., only one direction)
    Direct,
    /// Reverse direction of O2O relationships are considered
    Reversed,
    /// O2O relationships and their inverse directions are considered
    Bidirectional,
}

impl O2OMode {
    fn direct(self) -> bool {
        matches!(self, O2OMode::Direct | O2OMode::Bidirectional)
    }

    fn reversed(self) -> bool {
        matches!(self, O2OMode::Reversed | O2OMode::Bidirectional)
    }
}

/// Mode for reducing OC-DECLARE constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum OCDeclareReductionMode {
    /// Do not reduce constraints at all
    None,
    /// Apply lossless reduction
    ///
    /// i.e., only removes constraints strictly implied by combining others
    Lossless,
    /// Apply lossy reduction
    ///
    /// May also remove constraints which are not implied by others
    Lossy,
}

/// Options for the automatic discovery of OC-DECLARE constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OCDeclareDiscoveryOptions {
    /// Noise threshold (i.e., what fraction of source activations are allowed to violate a discovered constraint)
    pub noise_threshold: f64,
    /// Determines if/how object-to-object relationships are considered
    pub o2o_mode: O2OMode,
    /// Activities to use for the discovery. If this is `None`, all activities of the OCEL are used
    pub acts_to_use: Option<Vec<String>>,
    /// What min/max counts to use for the candidate generation steps
    pub counts_for_generation: Cardinality,
    /// What min/max counts to use for the candidate filtering step (when the arrow type is determined)
    pub counts_for_filter: Cardinality,
    /// If/how the discovered constraints should be reduced
    pub reduction: OCDeclareReductionMode,
    /// Whether to also mine how often each activity occurs per object of a type
    /// (`AS` arcs from the object's init node)
    pub lifecycle_constraints: bool,
    /// The arrow types to consider when deriving the final constraints
    ///
    /// Should be non empty!
    pub considered_arrow_types: HashSet<OCDeclareArcType>,
}

impl Default for OCDeclareDiscoveryOptions {
    fn default() -> Self {
        Self {
            noise_threshold: 0.2,
            o2o_mode: O2OMode::None,
            acts_to_use: None,
            counts_for_generation: (Some(1), None),
            counts_for_filter: (Some(1), Some(20)),
            reduction: OCDeclareReductionMode::None,
            lifecycle_constraints: false,
            considered_arrow_types: ALL_OC_DECLARE_ARC_TYPES.iter().copied().collect(),
        }
    }
}

impl OCDeclareDiscoveryOptions {
    /// Use a confidence threshold (fraction of activations that must satisfy an arc) instead of a noise threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.noise_threshold = 1.0 - threshold;
        self
    }
}

fn is_synthetic_activity(act: &str) -> bool {
    act.starts_with(INIT_EVENT_PREFIX) || act.starts_with(EXIT_EVENT_PREFIX)
}

fn label_holds(
    act1: &str,
    act2: &str,
    label: &OCDeclareArcLabel,
    arc_type: OCDeclareArcType,
    counts: Cardinality,
    noise_threshold: f64,
    locel: &SlimLinkedOCEL,
) -> bool {
    let arc = OCDeclareArc::new(
        OCDeclareNode::activity(act1),
        OCDeclareNode::activity(act2),
        arc_type,
        label.clone(),
        counts,
    );
    is_within_noise_threshold(&arc, locel, noise_threshold)
}

/// Discover behavioral OC-DECLARE constraints
///
/// The returned arcs are sorted and free of duplicates, so the result is stable
/// for a fixed log and fixed options.
pub fn discover_behavior_constraints(
    locel: &SlimLinkedOCEL,
    options: &OCDeclareDiscoveryOptions,
) -> Vec<OCDeclareArc> {
    let act_ob_inv = get_activity_object_involvements(locel);
    let ob_ob_inv = get_object_to_object_involvements(locel);
    let ob_ob_rev_inv = get_rev_object_to_object_involvements(locel);
    let acts_to_use: Vec<String> = options
        .acts_to_use
        .clone()
        .unwrap_or_else(|| locel.get_ev_types().cloned().collect())
        .into_iter()
        .filter(|act| !is_synthetic_activity(act))
        .collect();
    tracing::debug!(
        activities = acts_to_use.len(),
        noise_threshold = options.noise_threshold,
        "discovering OC-DECLARE constraints"
    );
    let mut ret: Vec<OCDeclareArc> = acts_to_use
        .iter()
        .cartesian_product(acts_to_use.iter())
        .par_bridge()
        .flat_map_iter(|(act1, act2)| {
            let obj_invs = get_direct_or_indirect_object_involvements(
                act1,
                act2,
                &act_ob_inv,
                &ob_ob_inv,
                &ob_ob_rev_inv,
                options.o2o_mode,
            );
            let act_labels = get_oi_labels(
                act1,
                act2,
                obj_invs,
                options.counts_for_generation,
                options.noise_threshold,
                locel,
            );
            let labels = combine_constraints(act_labels, act1, act2, options, locel);
            labels
                .into_iter()
                .flat_map(|label| {
                    let arc = OCDeclareArc::new(
                        OCDeclareNode::activity(act1.as_str()),
                        OCDeclareNode::activity(act2.as_str()),
                        OCDeclareArcType::AS,
                        label,
                        options.counts_for_filter,
                    );
                    if is_within_noise_threshold(&arc, locel, options.noise_threshold) {
                        let arc = OCDeclareArc {
                            counts: (arc.counts.0, None),
                            ..arc
                        };
                        get_stricter_arrows_for_as(arc, options, locel)
                    } else {
                        Vec::new()
                    }
                })
                .collect_vec()
        })
        .collect();

    if options.lifecycle_constraints {
        ret.extend(discover_lifecycle_constraints(
            locel,
            &act_ob_inv,
            &acts_to_use,
            options.noise_threshold,
        ));
    }

    let mut ret = match options.reduction {
        OCDeclareReductionMode::None => ret,
        OCDeclareReductionMode::Lossless => reduce_oc_arcs(ret, true),
        OCDeclareReductionMode::Lossy => reduce_oc_arcs(ret, false),
    };
    ret.sort();
    ret.dedup();
    ret
}

/// Get possible object involvement labels for given activity pair and object involvements
///
/// Returns the set of viable labels
fn get_oi_labels(
    act1: &str,
    act2: &str,
    obj_invs: Vec<(ObjectTypeAssociation, bool)>,
    counts_for_generation: Cardinality,
    noise_threshold: f64,
    locel: &SlimLinkedOCEL,
) -> Vec<OCDeclareArcLabel> {
    let holds = |label: &OCDeclareArcLabel| {
        label_holds(
            act1,
            act2,
            label,
            OCDeclareArcType::AS,
            counts_for_generation,
            noise_threshold,
            locel,
        )
    };
    let mut ret = Vec::new();
    for (ot, is_multiple) in obj_invs {
        let any_label = OCDeclareArcLabel::any(ot.clone());
        if !holds(&any_label) {
            continue;
        }
        if !is_multiple {
            // Only one object involved: Any, Each and All coincide
            ret.push(OCDeclareArcLabel::each(ot));
            continue;
        }
        ret.push(any_label);
        let each_label = OCDeclareArcLabel::each(ot.clone());
        if holds(&each_label) {
            ret.push(each_label);
            let all_label = OCDeclareArcLabel::all(ot);
            if holds(&all_label) {
                ret.push(all_label);
            }
        }
    }
    ret
}

/// Combine candidate labels by iteratively merging pairs of them
///
/// In iteration `i`, only merged labels of size `i + 1` are kept (if they still hold).
/// Labels dominated by another kept label are dropped.
fn combine_constraints(
    mut act_labels: Vec<OCDeclareArcLabel>,
    act1: &str,
    act2: &str,
    options: &OCDeclareDiscoveryOptions,
    locel: &SlimLinkedOCEL,
) -> HashSet<OCDeclareArcLabel> {
    let mut kept: HashSet<OCDeclareArcLabel> = act_labels.iter().cloned().collect();
    let mut iteration = 1;
    loop {
        let new_labels: HashSet<OCDeclareArcLabel> = (0..act_labels.len())
            .tuple_combinations()
            .filter_map(|(i, j)| {
                let (l1, l2) = (&act_labels[i], &act_labels[j]);
                if l1.is_dominated_by(l2) || l2.is_dominated_by(l1) {
                    return None;
                }
                let combined = l1.combine(l2);
                if combined.size() != iteration + 1 {
                    return None;
                }
                label_holds(
                    act1,
                    act2,
                    &combined,
                    OCDeclareArcType::AS,
                    options.counts_for_generation,
                    options.noise_threshold,
                    locel,
                )
                .then_some(combined)
            })
            .collect();
        if new_labels.is_empty() {
            break;
        }
        kept.extend(new_labels.iter().cloned());
        act_labels = remove_dominated(&new_labels).into_iter().collect();
        iteration += 1;
    }
    remove_dominated(&kept)
}

fn remove_dominated(labels: &HashSet<OCDeclareArcLabel>) -> HashSet<OCDeclareArcLabel> {
    labels
        .iter()
        .filter(|l| !labels.iter().any(|l2| *l != l2 && l.is_dominated_by(l2)))
        .cloned()
        .collect()
}

/// Try to find stricter constraints for an AS constraint
///
/// e.g., if AS is satisfied, check if EF, DF, EP, DP are also satisfied.
/// Only falls back to the AS arc itself if none of them hold.
fn get_stricter_arrows_for_as(
    arc: OCDeclareArc,
    options: &OCDeclareDiscoveryOptions,
    locel: &SlimLinkedOCEL,
) -> Vec<OCDeclareArc> {
    let considered = |t: OCDeclareArcType| options.considered_arrow_types.contains(&t);
    let holds = |t: OCDeclareArcType| {
        let candidate = arc.clone_with_arc_type(t);
        is_within_noise_threshold(&candidate, locel, options.noise_threshold).then_some(candidate)
    };
    let strictest = |eventually: OCDeclareArcType, directly: OCDeclareArcType| {
        if considered(eventually) {
            holds(eventually).map(|ev_arc| {
                considered(directly)
                    .then(|| holds(directly))
                    .flatten()
                    .unwrap_or(ev_arc)
            })
        } else if considered(directly) {
            holds(directly)
        } else {
            None
        }
    };

    let mut ret: Vec<OCDeclareArc> = [
        strictest(OCDeclareArcType::EF, OCDeclareArcType::DF),
        strictest(OCDeclareArcType::EP, OCDeclareArcType::DP),
    ]
    .into_iter()
    .flatten()
    .collect();

    if ret.is_empty() && considered(OCDeclareArcType::AS) && arc.from != arc.to {
        if let Some(as_arc) = holds(OCDeclareArcType::AS) {
            ret.push(as_arc);
        }
    }
    ret
}

/// Returns the candidate object type associations for an activity pair
///
/// In particular each item (X,b) consists of an [`ObjectTypeAssociation`] X and a flag b,
/// indicating if multiple objects are sometimes involved in the source (or through the O2O)
fn get_direct_or_indirect_object_involvements(
    act1: &str,
    act2: &str,
    act_ob_involvement: &Involvements,
    obj_obj_involvement: &Involvements,
    rev_obj_obj_involvement: &Involvements,
    o2o_mode: O2OMode,
) -> Vec<(ObjectTypeAssociation, bool)> {
    let (Some(act1_obs), Some(act2_obs)) =
        (act_ob_involvement.get(act1), act_ob_involvement.get(act2))
    else {
        return Vec::new();
    };
    let mut res = act1_obs
        .iter()
        .filter(|(ot, _)| act2_obs.contains_key(*ot))
        .map(|(ot, oi)| (ObjectTypeAssociation::new_simple(ot.as_str()), oi.max > 1))
        .collect_vec();
    let mut via_o2o = |o2o_involvement: &Involvements, reversed: bool| {
        for (ot1, oi1) in act1_obs {
            let Some(ots2) = o2o_involvement.get(ot1) else {
                continue;
            };
            for (ot2, oi2) in ots2.iter().filter(|(ot2, _)| act2_obs.contains_key(*ot2)) {
                let association = if reversed {
                    ObjectTypeAssociation::new_o2o_rev(ot1.as_str(), ot2.as_str())
                } else {
                    ObjectTypeAssociation::new_o2o(ot1.as_str(), ot2.as_str())
                };
                res.push((association, oi1.max > 1 || oi2.max > 1));
            }
        }
    };
    if o2o_mode.direct() {
        via_o2o(obj_obj_involvement, false);
    }
    if o2o_mode.reversed() {
        via_o2o(rev_obj_obj_involvement, true);
    }
    res.sort();
    res
}

/// Mine how often each activity occurs per object of a type
///
/// For every object type and every activity involving it, the mean number of events per object
/// is widened to a range `[n_min, n_max]` until at least a `1 - noise_threshold` fraction of the
/// objects fits. Ranges starting at zero or reaching [`MAX_LIFECYCLE_COUNT`] are skipped.
/// Only objects with at least one event are considered (as only those have an init activation).
fn discover_lifecycle_constraints(
    locel: &SlimLinkedOCEL,
    act_ob_inv: &Involvements,
    acts_to_use: &[String],
    noise_threshold: f64,
) -> Vec<OCDeclareArc> {
    let mut ret = Vec::new();
    for ot in locel.get_ob_types() {
        let obs = locel
            .get_obs_of_type(ot)
            .iter()
            .copied()
            .filter(|ob| !locel.get_e2o_rev(*ob).is_empty())
            .collect_vec();
        if obs.is_empty() {
            continue;
        }
        let acts = acts_to_use
            .iter()
            .filter(|act| act_ob_inv.get(*act).is_some_and(|inv| inv.contains_key(ot)));
        for act in acts {
            let counts = obs
                .iter()
                .map(|ob| {
                    locel
                        .get_e2o_rev(*ob)
                        .iter()
                        .filter(|ev| locel.get_ev_type(**ev) == act.as_str())
                        .count()
                })
                .collect_vec();
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            if mean >= MAX_LIFECYCLE_COUNT as f64 {
                continue;
            }
            let min_fitting = (counts.len() as f64 * (1.0 - noise_threshold)).ceil() as usize;
            let mut n_min = mean.round() as usize;
            let mut n_max = n_min;
            while counts.iter().filter(|c| (n_min..=n_max).contains(*c)).count() < min_fitting
                && n_max < MAX_LIFECYCLE_COUNT
            {
                n_min = n_min.saturating_sub(1);
                n_max += 1;
            }
            if n_min == 0 || n_max >= MAX_LIFECYCLE_COUNT {
                continue;
            }
            tracing::trace!(%ot, %act, n_min, n_max, mean, "lifecycle bounds");
            ret.push(OCDeclareArc::new(
                OCDeclareNode::object_init(ot.as_str()),
                OCDeclareNode::activity(act.as_str()),
                OCDeclareArcType::AS,
                OCDeclareArcLabel::any(ObjectTypeAssociation::new_simple(ot.as_str())),
                (Some(n_min), Some(n_max)),
            ));
        }
    }
    ret
}

/// Reduce OC-DECLARE arcs based on lossless/lossy transitive reduction
/// considering paths of arbitrary length.
///
/// An arc is removed if there is a path of other (still active) arcs from its source to its
/// target, each of which is at least as strict in arc type and label. Arcs are processed
/// sequentially in sorted order, so arcs in a cycle cannot eliminate each other.
pub fn reduce_oc_arcs(mut arcs: Vec<OCDeclareArc>, lossless: bool) -> Vec<OCDeclareArc> {
    arcs.sort();
    let mut adj: HashMap<&OCDeclareNode, Vec<usize>> = HashMap::new();
    for (i, arc) in arcs.iter().enumerate() {
        adj.entry(&arc.from).or_default().push(i);
    }
    let mut active = vec![true; arcs.len()];
    for i in 0..arcs.len() {
        if has_dominating_path(i, &arcs, &adj, &active, lossless) {
            active[i] = false;
        }
    }
    let reduced = arcs
        .iter()
        .zip(active)
        .filter_map(|(arc, active)| active.then(|| arc.clone()))
        .collect_vec();
    tracing::debug!(
        before = arcs.len(),
        after = reduced.len(),
        lossless,
        "reduced OC-DECLARE arcs"
    );
    reduced
}

fn has_dominating_path(
    candidate_idx: usize,
    arcs: &[OCDeclareArc],
    adj: &HashMap<&OCDeclareNode, Vec<usize>>,
    active: &[bool],
    lossless: bool,
) -> bool {
    let c = &arcs[candidate_idx];
    // A self-loop is never implied by a path of other arcs
    if c.from == c.to {
        return false;
    }
    let mut queue = VecDeque::from([(&c.from, 0_usize)]);
    let mut visited = HashSet::from([&c.from]);

    while let Some((curr_node, depth)) = queue.pop_front() {
        if curr_node == &c.to {
            return true;
        }
        for &edge_idx in adj.get(curr_node).into_iter().flatten() {
            if !active[edge_idx] || edge_idx == candidate_idx {
                continue;
            }
            let edge = &arcs[edge_idx];
            let dominated = c.arc_type.is_dominated_by_or_eq(&edge.arc_type)
                && c.label.is_dominated_by(&edge.label);
            if !dominated {
                continue;
            }
            // Any-labels do not compose along a path: keep arcs relying on them
            if lossless && depth >= 1 && c.label.any.iter().any(|l| edge.label.any.contains(l)) {
                continue;
            }
            if visited.insert(&edge.to) {
                queue.push_back((&edge.to, depth + 1));
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::process_models::oc_declare::DEFAULT_CARDINALITY, ocel};

    fn order_log() -> SlimLinkedOCEL {
        SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1", "items:i1", "items:i2"]),
            ("pick item", ["items:i1"]),
            ("pick item", ["items:i2"]),
            ("ship order", ["orders:o1"]),
            ("place order", ["orders:o2", "items:i3"]),
            ("pick item", ["items:i3"]),
            ("ship order", ["orders:o2"])
        ])
    }

    fn arc(
        from: &str,
        to: &str,
        arc_type: OCDeclareArcType,
        label: OCDeclareArcLabel,
    ) -> OCDeclareArc {
        OCDeclareArc::new(
            OCDeclareNode::activity(from),
            OCDeclareNode::activity(to),
            arc_type,
            label,
            DEFAULT_CARDINALITY,
        )
    }

    #[test]
    fn test_discovers_directly_follows() {
        let locel = order_log();
        let options = OCDeclareDiscoveryOptions::default().with_threshold(1.0);
        let arcs = discover_behavior_constraints(&locel, &options);
        let orders = ObjectTypeAssociation::new_simple("orders");
        // Shipping is the next step for each order, so DF supersedes EF
        assert!(arcs.contains(&arc(
            "place order",
            "ship order",
            OCDeclareArcType::DF,
            OCDeclareArcLabel::each(orders.clone()),
        )));
        assert!(arcs.contains(&arc(
            "ship order",
            "place order",
            OCDeclareArcType::DP,
            OCDeclareArcLabel::each(orders),
        )));
        let items = ObjectTypeAssociation::new_simple("items");
        assert!(arcs.contains(&arc(
            "place order",
            "pick item",
            OCDeclareArcType::DF,
            OCDeclareArcLabel::each(items),
        )));
        assert!(arcs.iter().all(|a| !a.negated && a.counts.1.is_none()));
    }

    #[test]
    fn test_discovery_is_stable() {
        let locel = order_log();
        let options = OCDeclareDiscoveryOptions::default().with_threshold(0.8);
        let first = discover_behavior_constraints(&locel, &options);
        let second = discover_behavior_constraints(&locel, &options);
        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_higher_threshold_is_stricter() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("a", ["x:1"]),
            ("b", ["x:1"]),
            ("a", ["x:2"]),
            ("b", ["x:2"]),
            ("a", ["x:3"]),
            ("b", ["x:3"]),
            ("a", ["x:4"])
        ]);
        let a_to_b = |arcs: &[OCDeclareArc]| {
            arcs.iter()
                .any(|arc| arc.from.name() == "a" && arc.to.name() == "b")
        };
        let lenient = discover_behavior_constraints(
            &locel,
            &OCDeclareDiscoveryOptions::default().with_threshold(0.7),
        );
        assert!(a_to_b(&lenient));
        let strict = discover_behavior_constraints(
            &locel,
            &OCDeclareDiscoveryOptions::default().with_threshold(0.9),
        );
        assert!(!a_to_b(&strict));
    }

    #[test]
    fn test_considered_arrow_types() {
        let locel = order_log();
        let options = OCDeclareDiscoveryOptions {
            considered_arrow_types: [OCDeclareArcType::AS].into_iter().collect(),
            ..OCDeclareDiscoveryOptions::default().with_threshold(1.0)
        };
        let arcs = discover_behavior_constraints(&locel, &options);
        assert!(!arcs.is_empty());
        assert!(arcs
            .iter()
            .all(|a| a.arc_type == OCDeclareArcType::AS && a.from != a.to));
    }

    #[test]
    fn test_acts_to_use() {
        let locel = order_log();
        let options = OCDeclareDiscoveryOptions {
            acts_to_use: Some(vec!["place order".to_string(), "ship order".to_string()]),
            ..OCDeclareDiscoveryOptions::default().with_threshold(1.0)
        };
        let arcs = discover_behavior_constraints(&locel, &options);
        assert!(arcs
            .iter()
            .all(|a| a.from.name() != "pick item" && a.to.name() != "pick item"));
    }

    #[test]
    fn test_oi_labels_single_object() {
        let locel = order_log();
        let labels = get_oi_labels(
            "place order",
            "ship order",
            vec![(ObjectTypeAssociation::new_simple("orders"), false)],
            DEFAULT_CARDINALITY,
            0.0,
            &locel,
        );
        assert_eq!(
            labels,
            vec![OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple(
                "orders"
            ))]
        );
    }

    #[test]
    fn test_oi_labels_multiple_objects() {
        let locel = order_log();
        let items = ObjectTypeAssociation::new_simple("items");
        let labels = get_oi_labels(
            "place order",
            "pick item",
            vec![(items.clone(), true)],
            DEFAULT_CARDINALITY,
            0.0,
            &locel,
        );
        // Each item is picked separately, so no single pick involves all items
        assert_eq!(
            labels,
            vec![
                OCDeclareArcLabel::any(items.clone()),
                OCDeclareArcLabel::each(items)
            ]
        );
    }

    #[test]
    fn test_combine_constraints() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("a", ["x:1", "y:1"]),
            ("b", ["x:1", "y:1"])
        ]);
        let x = ObjectTypeAssociation::new_simple("x");
        let y = ObjectTypeAssociation::new_simple("y");
        let labels = vec![
            OCDeclareArcLabel::each(x.clone()),
            OCDeclareArcLabel::each(y.clone()),
        ];
        let combined = combine_constraints(
            labels,
            "a",
            "b",
            &OCDeclareDiscoveryOptions::default(),
            &locel,
        );
        assert_eq!(
            combined,
            HashSet::from([OCDeclareArcLabel::each(x).combine(&OCDeclareArcLabel::each(y))])
        );
    }

    #[test]
    fn test_o2o_involvements() {
        let locel = SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1"]),
            ("contact", ["customers:c1"]),
            o2o:
            ("orders:o1", "customers:c1")
        ]);
        let act_ob_inv = get_activity_object_involvements(&locel);
        let ob_ob_inv = get_object_to_object_involvements(&locel);
        let ob_ob_rev_inv = get_rev_object_to_object_involvements(&locel);
        let none = get_direct_or_indirect_object_involvements(
            "place order",
            "contact",
            &act_ob_inv,
            &ob_ob_inv,
            &ob_ob_rev_inv,
            O2OMode::None,
        );
        assert!(none.is_empty());
        let direct = get_direct_or_indirect_object_involvements(
            "place order",
            "contact",
            &act_ob_inv,
            &ob_ob_inv,
            &ob_ob_rev_inv,
            O2OMode::Bidirectional,
        );
        assert_eq!(
            direct,
            vec![(ObjectTypeAssociation::new_o2o("orders", "customers"), false)]
        );
        let reversed = get_direct_or_indirect_object_involvements(
            "contact",
            "place order",
            &act_ob_inv,
            &ob_ob_inv,
            &ob_ob_rev_inv,
            O2OMode::Reversed,
        );
        assert_eq!(
            reversed,
            vec![(
                ObjectTypeAssociation::new_o2o_rev("customers", "orders"),
                false
            )]
        );
    }

    #[test]
    fn test_lifecycle_constraints() {
        let locel = order_log();
        let options = OCDeclareDiscoveryOptions {
            lifecycle_constraints: true,
            ..OCDeclareDiscoveryOptions::default().with_threshold(1.0)
        };
        let arcs = discover_behavior_constraints(&locel, &options);
        let expected = OCDeclareArc::new(
            OCDeclareNode::object_init("orders"),
            OCDeclareNode::activity("ship order"),
            OCDeclareArcType::AS,
            OCDeclareArcLabel::any(ObjectTypeAssociation::new_simple("orders")),
            (Some(1), Some(1)),
        );
        assert!(arcs.contains(&expected));
        assert_eq!(expected.evaluate(&locel).violating, 0);
    }

    #[test]
    fn test_reduce_transitive() {
        let each_x = OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple("x"));
        let ab = arc("a", "b", OCDeclareArcType::EF, each_x.clone());
        let bc = arc("b", "c", OCDeclareArcType::EF, each_x.clone());
        let ac = arc("a", "c", OCDeclareArcType::EF, each_x.clone());
        let reduced = reduce_oc_arcs(vec![ab.clone(), bc.clone(), ac.clone()], false);
        assert_eq!(reduced, vec![ab.clone(), bc.clone()]);

        // A stricter shortcut is not implied by the path
        let ac_df = ac.clone_with_arc_type(OCDeclareArcType::DF);
        let reduced = reduce_oc_arcs(vec![ab, bc, ac_df.clone()], false);
        assert!(reduced.contains(&ac_df));
    }

    #[test]
    fn test_reduce_keeps_two_cycle() {
        let each_x = OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple("x"));
        let ab = arc("a", "b", OCDeclareArcType::AS, each_x.clone());
        let ba = arc("b", "a", OCDeclareArcType::AS, each_x);
        let reduced = reduce_oc_arcs(vec![ab, ba], true);
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn test_reduce_lossless_keeps_any_paths() {
        let any_x = OCDeclareArcLabel::any(ObjectTypeAssociation::new_simple("x"));
        let ab = arc("a", "b", OCDeclareArcType::EF, any_x.clone());
        let bc = arc("b", "c", OCDeclareArcType::EF, any_x.clone());
        let ac = arc("a", "c", OCDeclareArcType::EF, any_x);
        assert_eq!(
            reduce_oc_arcs(vec![ab.clone(), bc.clone(), ac.clone()], true).len(),
            3
        );
        assert_eq!(reduce_oc_arcs(vec![ab, bc, ac], false).len(), 2);
    }

    #[test]
    fn test_support_equal_to_threshold() {
        // 4 out of 5 orders are shipped right after being placed
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
        let place_to_ship = arc(
            "place order",
            "ship order",
            OCDeclareArcType::DF,
            OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple("orders")),
        );
        let options = OCDeclareDiscoveryOptions::default().with_threshold(0.8);
        assert!(discover_behavior_constraints(&locel, &options).contains(&place_to_ship));
        let options = OCDeclareDiscoveryOptions::default().with_threshold(0.81);
        assert!(!discover_behavior_constraints(&locel, &options)
            .iter()
            .any(|a| a.from == place_to_ship.from && a.to == place_to_ship.to));
    }

    #[test]
    fn test_reduce_keeps_self_loops() {
        let each = OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple("orders"));
        let reminders = vec![
            arc("place order", "send reminder", OCDeclareArcType::EF, each.clone()),
            arc("send reminder", "send reminder", OCDeclareArcType::EF, each),
        ];
        assert_eq!(reduce_oc_arcs(reminders.clone(), true), reminders);
        assert_eq!(reduce_oc_arcs(reminders.clone(), false), reminders);
    }
}
