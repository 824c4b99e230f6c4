use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::core::event_data::object_centric::linked_ocel::{
    EventIndex, ObjectIndex, SlimLinkedOCEL,
};

use super::OCDeclareNode;

/// Represents either a regular event or a synthetic initialization/exit event for an object.
///
/// Synthetic events model object lifecycles as OC-DECLARE sources or targets. They exist only for
/// objects involved in at least one event: the init event happens 1ms before the first event of
/// the object, the exit event 1ms after its last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventOrSynthetic {
    /// A regular event from the event log, identified by its index.
    Event(EventIndex),
    /// A synthetic event marking the initialization of an object, identified by the object's index.
    Init(ObjectIndex),
    /// A synthetic event marking the exit of an object, identified by the object's index.
    Exit(ObjectIndex),
}

impl EventOrSynthetic {
    /// Get the timestamp of the event (regular or synthetic)
    pub fn get_timestamp(&self, locel: &SlimLinkedOCEL) -> DateTime<FixedOffset> {
        match self {
            EventOrSynthetic::Event(ev) => locel.get_ev_time(*ev),
            EventOrSynthetic::Init(ob) => locel
                .get_lifespan(*ob)
                .map(|(first, _)| first - TimeDelta::milliseconds(1))
                .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC.fixed_offset()),
            EventOrSynthetic::Exit(ob) => locel
                .get_lifespan(*ob)
                .map(|(_, last)| last + TimeDelta::milliseconds(1))
                .unwrap_or_else(|| DateTime::<Utc>::MAX_UTC.fixed_offset()),
        }
    }

    /// Objects involved in the event (sorted); synthetic events involve exactly their object
    pub fn get_e2o<'a>(&'a self, locel: &'a SlimLinkedOCEL) -> &'a [ObjectIndex] {
        match self {
            EventOrSynthetic::Event(ev) => locel.get_e2o(*ev),
            EventOrSynthetic::Init(ob) | EventOrSynthetic::Exit(ob) => std::slice::from_ref(ob),
        }
    }

    /// Check whether this event is an occurrence of the given node
    pub fn is_of_node(&self, node: &OCDeclareNode, locel: &SlimLinkedOCEL) -> bool {
        match (self, node) {
            (EventOrSynthetic::Event(ev), OCDeclareNode::Activity { activity }) => {
                locel.get_ev_type(*ev) == activity
            }
            (EventOrSynthetic::Init(ob), OCDeclareNode::ObjectInit { object_type })
            | (EventOrSynthetic::Exit(ob), OCDeclareNode::ObjectEnd { object_type }) => {
                locel.get_ob_type(*ob) == object_type
            }
            _ => false,
        }
    }

    /// Get all events (regular or synthetic) of a node
    pub fn get_all_of_node(locel: &SlimLinkedOCEL, node: &OCDeclareNode) -> Vec<Self> {
        match node {
            OCDeclareNode::Activity { activity } => locel
                .get_evs_of_type(activity)
                .iter()
                .map(|ev| Self::Event(*ev))
                .collect(),
            OCDeclareNode::ObjectInit { object_type } => locel
                .get_obs_of_type(object_type)
                .iter()
                .filter(|ob| !locel.get_e2o_rev(**ob).is_empty())
                .map(|ob| Self::Init(*ob))
                .collect(),
            OCDeclareNode::ObjectEnd { object_type } => locel
                .get_obs_of_type(object_type)
                .iter()
                .filter(|ob| !locel.get_e2o_rev(**ob).is_empty())
                .map(|ob| Self::Exit(*ob))
                .collect(),
        }
    }

    /// Get all events (regular or synthetic) of a node involving a specific object
    pub fn get_all_of_node_for_ob(
        locel: &SlimLinkedOCEL,
        node: &OCDeclareNode,
        ob: ObjectIndex,
    ) -> Vec<Self> {
        let evs = locel.get_e2o_rev(ob);
        match node {
            OCDeclareNode::Activity { activity } => evs
                .iter()
                .filter(|ev| locel.get_ev_type(**ev) == activity)
                .map(|ev| Self::Event(*ev))
                .collect(),
            OCDeclareNode::ObjectInit { object_type } => {
                if !evs.is_empty() && locel.get_ob_type(ob) == object_type {
                    vec![Self::Init(ob)]
                } else {
                    Vec::new()
                }
            }
            OCDeclareNode::ObjectEnd { object_type } => {
                if !evs.is_empty() && locel.get_ob_type(ob) == object_type {
                    vec![Self::Exit(ob)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Get all events (regular or synthetic) involving a specific object
    pub fn get_all_for_ob(locel: &SlimLinkedOCEL, ob: ObjectIndex) -> Vec<Self> {
        let evs = locel.get_e2o_rev(ob);
        if evs.is_empty() {
            return Vec::new();
        }
        std::iter::once(Self::Init(ob))
            .chain(evs.iter().map(|ev| Self::Event(*ev)))
            .chain(std::iter::once(Self::Exit(ob)))
            .collect()
    }

    /// All events of the log, followed by the synthetic init/exit events of all objects
    pub fn get_all(locel: &SlimLinkedOCEL) -> Vec<Self> {
        locel
            .get_all_evs()
            .map(Self::Event)
            .chain(
                locel
                    .get_all_obs()
                    .filter(|ob| !locel.get_e2o_rev(*ob).is_empty())
                    .flat_map(|ob| [Self::Init(ob), Self::Exit(ob)]),
            )
            .collect()
    }
}
