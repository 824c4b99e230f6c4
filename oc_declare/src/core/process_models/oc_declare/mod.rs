//! OC-DECLARE: declarative constraints over object-centric event data
//!
//! An [`OCDeclareArc`] connects two [`OCDeclareNode`]s (activities or object lifecycle
//! endpoints) with a temporal [`OCDeclareArcType`], a cardinality range and an
//! [`OCDeclareArcLabel`] describing which related objects have to be shared between source
//! and target events.
use std::{borrow::Cow, collections::HashSet, fmt::Display};

use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::object_centric::linked_ocel::{ObjectIndex, SlimLinkedOCEL};

/// Mapping between visual edge kinds of the editor and arc types
pub mod edge_types;
/// Activity/object involvement statistics and [`OcelInfo`]
pub mod involvements;
/// Regular and synthetic (object init/exit) events
pub mod synthetic;
/// Evaluation results
pub mod violation;

#[doc(inline)]
pub use edge_types::EdgeType;
#[doc(inline)]
pub use involvements::{
    get_activity_object_involvements, get_object_to_object_involvements,
    get_rev_object_to_object_involvements, ObjectInvolvementCounts, OcelInfo,
};
#[doc(inline)]
pub use synthetic::EventOrSynthetic;
#[doc(inline)]
pub use violation::{allowed_violations, DivisionUndefined, ViolationPercentage, ViolationResult};

/// Prefix of the synthetic event type marking the start of an object's lifecycle
pub const INIT_EVENT_PREFIX: &str = "<init>";
/// Prefix of the synthetic event type marking the end of an object's lifecycle
pub const EXIT_EVENT_PREFIX: &str = "<exit>";

/// Cardinality range `(min, max)` of an arc; `None` means unbounded on that side
pub type Cardinality = (Option<usize>, Option<usize>);

/// Default cardinality of positive arcs: at least one target event
pub const DEFAULT_CARDINALITY: Cardinality = (Some(1), None);
/// Cardinality of negated arcs: no target event at all
pub const NEGATED_CARDINALITY: Cardinality = (Some(0), Some(0));

/// OC-DECLARE Node
///
/// Either an activity or the start/end of the lifecycle of objects of a type
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "type")]
pub enum OCDeclareNode {
    /// An activity (event type) of the log
    Activity {
        /// Activity name
        activity: String,
    },
    /// Start of the lifecycle of each object of a type
    ObjectInit {
        /// Object type
        object_type: String,
    },
    /// End of the lifecycle of each object of a type
    ObjectEnd {
        /// Object type
        object_type: String,
    },
}

impl OCDeclareNode {
    /// Create a new activity node
    pub fn activity<T: Into<String>>(act: T) -> Self {
        Self::Activity {
            activity: act.into(),
        }
    }

    /// Create a new node for the start of objects of a type
    pub fn object_init<T: Into<String>>(ot: T) -> Self {
        Self::ObjectInit {
            object_type: ot.into(),
        }
    }

    /// Create a new node for the end of objects of a type
    pub fn object_end<T: Into<String>>(ot: T) -> Self {
        Self::ObjectEnd {
            object_type: ot.into(),
        }
    }

    /// The activity name or object type
    pub fn name(&self) -> &str {
        match self {
            OCDeclareNode::Activity { activity } => activity,
            OCDeclareNode::ObjectInit { object_type } | OCDeclareNode::ObjectEnd { object_type } => {
                object_type
            }
        }
    }

    /// Event type of this node as used during evaluation
    ///
    /// Lifecycle nodes map to the synthetic event types `<init> type` and `<exit> type`.
    pub fn as_event_type(&self) -> Cow<'_, str> {
        match self {
            OCDeclareNode::Activity { activity } => Cow::Borrowed(activity),
            OCDeclareNode::ObjectInit { object_type } => {
                Cow::Owned(format!("{INIT_EVENT_PREFIX} {object_type}"))
            }
            OCDeclareNode::ObjectEnd { object_type } => {
                Cow::Owned(format!("{EXIT_EVENT_PREFIX} {object_type}"))
            }
        }
    }

    /// Parse an event type, recognizing the synthetic lifecycle event types
    pub fn from_event_type(event_type: &str) -> Self {
        if let Some(ot) = event_type
            .strip_prefix(INIT_EVENT_PREFIX)
            .and_then(|s| s.strip_prefix(' '))
        {
            Self::object_init(ot)
        } else if let Some(ot) = event_type
            .strip_prefix(EXIT_EVENT_PREFIX)
            .and_then(|s| s.strip_prefix(' '))
        {
            Self::object_end(ot)
        } else {
            Self::activity(event_type)
        }
    }
}

impl Display for OCDeclareNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_event_type())
    }
}

/// OC-DECLARE Arc Direction/Type
///
/// Models temporal relationships
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord, JsonSchema,
)]
pub enum OCDeclareArcType {
    /// Association: No temporal restrictions
    #[serde(alias = "ASS")]
    AS,
    /// Eventually-Follows: Target must occur after source event
    EF,
    /// Eventually-Precedes: Target must occur before source event
    #[serde(alias = "EFREV")]
    EP,
    /// Directly-Follows: Target must occur directly after source event (w.r.t. the shared objects)
    DF,
    /// Directly-Precedes: Target must occur directly before source event (w.r.t. the shared objects)
    #[serde(alias = "DFREV")]
    DP,
}

/// All OC-DECLARE arc types
pub const ALL_OC_DECLARE_ARC_TYPES: [OCDeclareArcType; 5] = [
    OCDeclareArcType::AS,
    OCDeclareArcType::EF,
    OCDeclareArcType::EP,
    OCDeclareArcType::DF,
    OCDeclareArcType::DP,
];

impl OCDeclareArcType {
    /// Parse a string to an arc type
    ///
    /// e.g., `"AS"` -> [`OCDeclareArcType::AS`], `"EFREV"` -> [`OCDeclareArcType::EP`]
    ///
    /// Returns `None` if the string cannot be parsed
    pub fn parse_str(s: impl AsRef<str>) -> Option<Self> {
        match s.as_ref() {
            "AS" | "ASS" => Some(Self::AS),
            "EF" => Some(Self::EF),
            "EP" | "EFREV" => Some(Self::EP),
            "DF" => Some(Self::DF),
            "DP" | "DFREV" => Some(Self::DP),
            _ => None,
        }
    }

    /// Get name of this arc type as string (e.g., `"EF"`)
    pub fn get_name(&self) -> &'static str {
        match self {
            OCDeclareArcType::AS => "AS",
            OCDeclareArcType::EF => "EF",
            OCDeclareArcType::EP => "EP",
            OCDeclareArcType::DF => "DF",
            OCDeclareArcType::DP => "DP",
        }
    }

    /// Check if this arc type is dominated by (or equal to) the other arc type
    ///
    /// `AS` is dominated by all types, `EF` by `DF` and `EP` by `DP`.
    pub fn is_dominated_by_or_eq(&self, arc_type: &OCDeclareArcType) -> bool {
        if *self == OCDeclareArcType::AS || self == arc_type {
            return true;
        }
        matches!(
            (self, arc_type),
            (OCDeclareArcType::EF, OCDeclareArcType::DF)
                | (OCDeclareArcType::EP, OCDeclareArcType::DP)
        )
    }
}

/// Object Type Association: Direct or O2O Object Types
#[derive(
    Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord, JsonSchema,
)]
#[serde(tag = "type")]
pub enum ObjectTypeAssociation {
    /// Simple: Direct Object Types involved with an Activity
    Simple {
        /// The object type
        object_type: String,
    },
    /// Indirect: Object Association through an O2O relationship
    ///
    /// Objects of type `second` reached from the involved objects of type `first`
    /// (following O2O relationships backwards if `reversed`)
    O2O {
        /// Object type directly involved with the event
        first: String,
        /// Object type reached through O2O
        second: String,
        /// Whether the O2O relationship points from `second` to `first`
        reversed: bool,
    },
}

impl ObjectTypeAssociation {
    /// Create new simple (i.e., direct) object type association
    pub fn new_simple<T: Into<String>>(ot: T) -> Self {
        Self::Simple {
            object_type: ot.into(),
        }
    }

    /// Create new O2O object type association (`ot1` -> `ot2`)
    pub fn new_o2o<T: Into<String>>(ot1: T, ot2: T) -> Self {
        Self::O2O {
            first: ot1.into(),
            second: ot2.into(),
            reversed: false,
        }
    }

    /// Create new reversed O2O object type association (`ot2` -> `ot1`)
    pub fn new_o2o_rev<T: Into<String>>(ot1: T, ot2: T) -> Self {
        Self::O2O {
            first: ot1.into(),
            second: ot2.into(),
            reversed: true,
        }
    }

    /// Object types mentioned by this association
    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        match self {
            ObjectTypeAssociation::Simple { object_type } => vec![object_type.as_str()],
            ObjectTypeAssociation::O2O { first, second, .. } => {
                vec![first.as_str(), second.as_str()]
            }
        }
        .into_iter()
    }

    /// Format as string
    pub fn as_template_string(&self) -> String {
        match self {
            ObjectTypeAssociation::Simple { object_type } => object_type.clone(),
            ObjectTypeAssociation::O2O {
                first,
                second,
                reversed,
            } => format!("{}{}{}", first, if !reversed { ">" } else { "<" }, second),
        }
    }

    /// Get the objects specified by this association for an event (sorted, without duplicates)
    pub fn get_for_ev(&self, ev: &EventOrSynthetic, locel: &SlimLinkedOCEL) -> Vec<ObjectIndex> {
        let involved = ev.get_e2o(locel);
        match self {
            ObjectTypeAssociation::Simple { object_type } => involved
                .iter()
                .filter(|o| locel.get_ob_type(**o) == object_type)
                .copied()
                .collect(),
            ObjectTypeAssociation::O2O {
                first,
                second,
                reversed,
            } => involved
                .iter()
                .filter(|o| locel.get_ob_type(**o) == first)
                .flat_map(|o| {
                    if *reversed {
                        locel.get_o2o_rev(*o)
                    } else {
                        locel.get_o2o(*o)
                    }
                })
                .filter(|o2| locel.get_ob_type(**o2) == second)
                .copied()
                .sorted()
                .dedup()
                .collect(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, Hash, PartialOrd, Ord, JsonSchema,
)]
/// Object Involvement Label of an OC-DECLARE arc
pub struct OCDeclareArcLabel {
    /// Each (for each object of that type separately, there must be the specified number of relevant target events)
    #[serde(default)]
    pub each: Vec<ObjectTypeAssociation>,
    /// Any (there must be the specified number of relevant target events involving at least one of the objects of this type involved in the source event)
    #[serde(default)]
    pub any: Vec<ObjectTypeAssociation>,
    /// All (there must be the specified number of relevant target events involving all of the objects of this type involved in the source event)
    #[serde(default)]
    pub all: Vec<ObjectTypeAssociation>,
}

impl OCDeclareArcLabel {
    /// Label with a single `each` association
    pub fn each(ot: ObjectTypeAssociation) -> Self {
        Self {
            each: vec![ot],
            ..Default::default()
        }
    }

    /// Label with a single `all` association
    pub fn all(ot: ObjectTypeAssociation) -> Self {
        Self {
            all: vec![ot],
            ..Default::default()
        }
    }

    /// Label with a single `any` association
    pub fn any(ot: ObjectTypeAssociation) -> Self {
        Self {
            any: vec![ot],
            ..Default::default()
        }
    }

    /// A label without any object involvement (no restriction on shared objects)
    pub fn is_empty(&self) -> bool {
        self.each.is_empty() && self.all.is_empty() && self.any.is_empty()
    }

    /// Total number of associations across all three sets
    pub fn size(&self) -> usize {
        self.each.len() + self.all.len() + self.any.len()
    }

    /// Iterate over all associations of the label
    pub fn associations(&self) -> impl Iterator<Item = &ObjectTypeAssociation> {
        self.each.iter().chain(self.all.iter()).chain(self.any.iter())
    }

    /// Format as template string
    pub fn as_template_string(&self) -> String {
        [("Each", &self.each), ("All", &self.all), ("Any", &self.any)]
            .into_iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(name, set)| {
                format!(
                    "{name}({})",
                    set.iter().map(|ot| ot.as_template_string()).join(",")
                )
            })
            .join(", ")
    }

    /// Combine this OC-DECLARE arc label with another one
    ///
    /// Merges the different object involvements, where more strict requirements take precedence (ALL over EACH over ANY)
    pub fn combine(&self, other: &Self) -> Self {
        let all: HashSet<&ObjectTypeAssociation> =
            self.all.iter().chain(other.all.iter()).collect();
        let each: HashSet<&ObjectTypeAssociation> = self
            .each
            .iter()
            .chain(other.each.iter())
            .filter(|e| !all.contains(e))
            .collect();
        let any: HashSet<&ObjectTypeAssociation> = self
            .any
            .iter()
            .chain(other.any.iter())
            .filter(|e| !all.contains(e) && !each.contains(e))
            .collect();
        Self {
            each: each.into_iter().sorted().cloned().collect(),
            all: all.into_iter().sorted().cloned().collect(),
            any: any.into_iter().sorted().cloned().collect(),
        }
    }

    /// Tests if this arc label is dominated by the other one
    ///
    /// i.e., every requirement of this label is also (at least as strictly) required by `other`
    pub fn is_dominated_by(&self, other: &Self) -> bool {
        self.all.iter().all(|a| other.all.contains(a))
            && self
                .each
                .iter()
                .all(|a| other.each.contains(a) || other.all.contains(a))
            && self
                .any
                .iter()
                .all(|a| other.any.contains(a) || other.each.contains(a) || other.all.contains(a))
    }

    /// Get all bindings of this label for a source event.
    ///
    /// Bindings correspond to all scenarios for which the constraint has to be checked:
    /// one per combination of objects of the `each` associations (cartesian product).
    /// `all` associations require all of their objects, `any` associations at least one of them.
    /// If an `each` association has no objects for the event, there are no bindings.
    /// An `all` or `any` association without objects for the event matches no target events.
    pub fn get_bindings(
        &self,
        ev: &EventOrSynthetic,
        locel: &SlimLinkedOCEL,
    ) -> Vec<Vec<SetFilter<ObjectIndex>>> {
        let base: Vec<SetFilter<ObjectIndex>> = self
            .all
            .iter()
            .map(|otass| SetFilter::All(otass.get_for_ev(ev, locel)))
            .chain(self.any.iter().map(|otass| {
                let obs = otass.get_for_ev(ev, locel);
                if obs.len() == 1 {
                    SetFilter::All(obs)
                } else {
                    SetFilter::Any(obs)
                }
            }))
            .collect();
        if self.each.is_empty() {
            return vec![base];
        }
        self.each
            .iter()
            .map(|otass| otass.get_for_ev(ev, locel))
            .multi_cartesian_product()
            .map(|product| {
                let mut binding = Vec::with_capacity(base.len() + 1);
                binding.push(SetFilter::All(product));
                binding.extend(base.iter().cloned());
                binding
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items")]
/// Set filter modeling the predicate that all or any of the included elements must be present
pub enum SetFilter<T> {
    /// Any predicate: At least one of the contained elements must be present
    Any(Vec<T>),
    /// All predicate: All of the contained elements must be present
    All(Vec<T>),
}

impl<T: Ord> SetFilter<T> {
    /// Check if the specified sorted slice fulfills this predicate
    pub fn check(&self, s: &[T]) -> bool {
        match self {
            SetFilter::Any(items) => items.iter().any(|i| s.binary_search(i).is_ok()),
            SetFilter::All(items) => items.iter().all(|i| s.binary_search(i).is_ok()),
        }
    }

    /// The elements of the filter
    pub fn items(&self) -> &[T] {
        match self {
            SetFilter::Any(items) | SetFilter::All(items) => items,
        }
    }
}

/// An arc that cannot be evaluated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArcValidationError {
    /// Endpoint with an empty activity name or object type
    #[error("endpoint `{0}` has an empty name")]
    EmptyEndpoint(&'static str),
    /// Association with an empty object type
    #[error("object type association has an empty object type")]
    EmptyObjectType,
    /// Lower bound larger than upper bound
    #[error("minimum count {min} exceeds maximum count {max}")]
    InvalidCounts {
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
    },
}

/// OC-DECLARE Constraint Arc
///
/// The `negated` flag marks arcs created from a forbidden-relationship edge. Evaluation
/// only looks at `counts`, which are `(0, 0)` for such arcs.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord, JsonSchema,
)]
pub struct OCDeclareArc {
    /// Source node
    pub from: OCDeclareNode,
    /// Target node
    pub to: OCDeclareNode,
    /// Arc type (temporal relation)
    pub arc_type: OCDeclareArcType,
    /// Object involvement label
    #[serde(default)]
    pub label: OCDeclareArcLabel,
    /// Required number of target events per binding: `(min, max)`
    pub counts: Cardinality,
    /// Explicit negation flag
    #[serde(default)]
    pub negated: bool,
}

impl OCDeclareArc {
    /// Create a new (non-negated) arc
    pub fn new(
        from: OCDeclareNode,
        to: OCDeclareNode,
        arc_type: OCDeclareArcType,
        label: OCDeclareArcLabel,
        counts: Cardinality,
    ) -> Self {
        Self {
            from,
            to,
            arc_type,
            label,
            counts,
            negated: false,
        }
    }

    /// Clone this arc, only modifying its arc/arrow type
    pub fn clone_with_arc_type(&self, arc_type: OCDeclareArcType) -> Self {
        Self {
            arc_type,
            ..self.clone()
        }
    }

    /// Check that the arc can be evaluated
    pub fn validate(&self) -> Result<(), ArcValidationError> {
        if self.from.name().is_empty() {
            return Err(ArcValidationError::EmptyEndpoint("from"));
        }
        if self.to.name().is_empty() {
            return Err(ArcValidationError::EmptyEndpoint("to"));
        }
        if self
            .label
            .associations()
            .flat_map(|a| a.object_types())
            .any(str::is_empty)
        {
            return Err(ArcValidationError::EmptyObjectType);
        }
        if let (Some(min), Some(max)) = self.counts {
            if min > max {
                return Err(ArcValidationError::InvalidCounts { min, max });
            }
        }
        Ok(())
    }

    /// Generate template string representation
    ///
    /// ```
    /// use oc_declare::core::process_models::oc_declare::*;
    ///
    /// let arc = OCDeclareArc::new(
    ///     OCDeclareNode::activity("place order"),
    ///     OCDeclareNode::activity("ship order"),
    ///     OCDeclareArcType::EF,
    ///     OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple("orders")),
    ///     DEFAULT_CARDINALITY,
    /// );
    /// assert_eq!(arc.as_template_string(), "EF(place order, ship order, Each(orders), 1, ∞)");
    /// ```
    pub fn as_template_string(&self) -> String {
        format!(
            "{}{}({}, {}, {}, {}, {})",
            if self.negated { "¬" } else { "" },
            self.arc_type.get_name(),
            self.from,
            self.to,
            self.label.as_template_string(),
            self.counts.0.unwrap_or_default(),
            self.counts
                .1
                .map(|x| x.to_string())
                .unwrap_or(String::from("∞"))
        )
    }
}

impl Display for OCDeclareArc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_template_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(ot: &str) -> ObjectTypeAssociation {
        ObjectTypeAssociation::new_simple(ot)
    }

    #[test]
    fn test_wire_format() {
        let arc = OCDeclareArc::new(
            OCDeclareNode::object_init("orders"),
            OCDeclareNode::activity("ship order"),
            OCDeclareArcType::EP,
            OCDeclareArcLabel::any(ObjectTypeAssociation::new_o2o_rev("orders", "items")),
            (Some(2), None),
        );
        let json = serde_json::to_value(&arc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": {"type": "ObjectInit", "object_type": "orders"},
                "to": {"type": "Activity", "activity": "ship order"},
                "arc_type": "EP",
                "label": {
                    "each": [],
                    "any": [{"type": "O2O", "first": "orders", "second": "items", "reversed": true}],
                    "all": []
                },
                "counts": [2, null],
                "negated": false
            })
        );
    }

    #[test]
    fn test_legacy_arc_type_names() {
        let json = r#"{
            "from": {"type": "Activity", "activity": "a"},
            "to": {"type": "ObjectEnd", "object_type": "orders"},
            "arc_type": "EFREV",
            "label": {"each": [{"type": "Simple", "object_type": "orders"}]},
            "counts": [0, 0]
        }"#;
        let arc: OCDeclareArc = serde_json::from_str(json).unwrap();
        assert_eq!(arc.arc_type, OCDeclareArcType::EP);
        assert!(!arc.negated);
        assert!(arc.label.all.is_empty());
        assert_eq!(
            serde_json::from_str::<OCDeclareArcType>("\"ASS\"").unwrap(),
            OCDeclareArcType::AS
        );
        assert_eq!(
            serde_json::from_str::<OCDeclareArcType>("\"DFREV\"").unwrap(),
            OCDeclareArcType::DP
        );
        assert!(serde_json::from_str::<OCDeclareArcType>("\"XX\"").is_err());
    }

    #[test]
    fn test_node_event_types() {
        let init = OCDeclareNode::object_init("orders");
        assert_eq!(init.as_event_type(), "<init> orders");
        assert_eq!(OCDeclareNode::from_event_type("<init> orders"), init);
        assert_eq!(
            OCDeclareNode::from_event_type("<exit> orders"),
            OCDeclareNode::object_end("orders")
        );
        // An activity literally named like an object type is a different node
        assert_ne!(OCDeclareNode::activity("orders"), init);
        assert_eq!(
            OCDeclareNode::from_event_type("<init>orders"),
            OCDeclareNode::activity("<init>orders")
        );
    }

    #[test]
    fn test_validate() {
        let mut arc = OCDeclareArc::new(
            OCDeclareNode::activity("a"),
            OCDeclareNode::activity("b"),
            OCDeclareArcType::AS,
            OCDeclareArcLabel::default(),
            (Some(3), Some(1)),
        );
        assert_eq!(
            arc.validate(),
            Err(ArcValidationError::InvalidCounts { min: 3, max: 1 })
        );
        arc.counts = (None, Some(1));
        assert_eq!(arc.validate(), Ok(()));
        arc.label = OCDeclareArcLabel::all(ObjectTypeAssociation::new_o2o("orders", ""));
        assert_eq!(arc.validate(), Err(ArcValidationError::EmptyObjectType));
        arc.label = OCDeclareArcLabel::default();
        arc.to = OCDeclareNode::activity("");
        assert_eq!(arc.validate(), Err(ArcValidationError::EmptyEndpoint("to")));
    }

    #[test]
    fn test_label_template() {
        let label = OCDeclareArcLabel {
            each: vec![simple("orders")],
            all: vec![simple("items"), ObjectTypeAssociation::new_o2o("orders", "customers")],
            any: vec![],
        };
        assert_eq!(
            label.as_template_string(),
            "Each(orders), All(items,orders>customers)"
        );
        assert_eq!(OCDeclareArcLabel::default().as_template_string(), "");
    }

    #[test]
    fn test_label_combine_and_dominance() {
        let any_items = OCDeclareArcLabel::any(simple("items"));
        let each_items = OCDeclareArcLabel::each(simple("items"));
        let all_orders = OCDeclareArcLabel::all(simple("orders"));

        let combined = any_items.combine(&each_items);
        assert_eq!(combined, each_items);

        let combined = each_items.combine(&all_orders);
        assert_eq!(combined.size(), 2);
        assert!(each_items.is_dominated_by(&combined));
        assert!(all_orders.is_dominated_by(&combined));
        assert!(!combined.is_dominated_by(&each_items));

        assert!(any_items.is_dominated_by(&each_items));
        assert!(!each_items.is_dominated_by(&any_items));
        assert!(OCDeclareArcLabel::default().is_dominated_by(&any_items));
    }

    #[test]
    fn test_arc_type_dominance() {
        use OCDeclareArcType::*;
        for t in ALL_OC_DECLARE_ARC_TYPES {
            assert!(AS.is_dominated_by_or_eq(&t));
            assert!(t.is_dominated_by_or_eq(&t));
            assert_eq!(OCDeclareArcType::parse_str(t.get_name()), Some(t));
        }
        assert!(EF.is_dominated_by_or_eq(&DF));
        assert!(EP.is_dominated_by_or_eq(&DP));
        assert!(!DF.is_dominated_by_or_eq(&EF));
        assert!(!EF.is_dominated_by_or_eq(&DP));
        assert!(!EF.is_dominated_by_or_eq(&AS));
    }

    #[test]
    fn test_set_filter() {
        let present = [1, 3, 5];
        assert!(SetFilter::All(vec![1, 5]).check(&present));
        assert!(!SetFilter::All(vec![1, 2]).check(&present));
        assert!(SetFilter::Any(vec![2, 3]).check(&present));
        assert!(!SetFilter::Any(vec![]).check(&present));
        assert!(SetFilter::<i32>::All(vec![]).check(&present));
    }
}
