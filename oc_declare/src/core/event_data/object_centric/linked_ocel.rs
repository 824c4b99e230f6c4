//! Linked Slim (i.e., index-based and without attribute values) OCEL
//!
//! Allows easy and efficient access to events, objects, and their relations.
//! Events are stored ordered by their timestamp, so comparing two [`EventIndex`]
//! values also compares the events' position in time (ties keep the input order).
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::object_centric::OCEL;

/// An Event Index
///
/// Points to an event in the context of a given [`SlimLinkedOCEL`]
#[derive(
    PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct EventIndex(usize);

/// An Object Index
///
/// Points to an object in the context of a given [`SlimLinkedOCEL`]
#[derive(
    PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct ObjectIndex(usize);

impl From<usize> for EventIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}
impl From<usize> for ObjectIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}
impl EventIndex {
    /// Retrieve the inner index value
    pub fn into_inner(self) -> usize {
        self.0
    }
}
impl ObjectIndex {
    /// Retrieve the inner index value
    pub fn into_inner(self) -> usize {
        self.0
    }
}

/// A slim event: type and relationships are stored as indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlimOCELEvent {
    /// Event ID
    pub id: String,
    /// Index of the event type
    pub event_type: usize,
    /// Time of the event
    pub time: DateTime<FixedOffset>,
    /// Related objects (sorted, without duplicates)
    pub e2o: Vec<ObjectIndex>,
}

/// A slim object: type and relationships are stored as indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlimOCELObject {
    /// Object ID
    pub id: String,
    /// Index of the object type
    pub object_type: usize,
    /// Related objects (sorted, without duplicates)
    pub o2o: Vec<ObjectIndex>,
}

/// Linked OCEL based on indices
///
/// Only keeps what is needed for behavioral analysis: types, timestamps and relationships.
/// Qualifiers and attributes are dropped.
#[derive(Debug, Clone)]
pub struct SlimLinkedOCEL {
    events: Vec<SlimOCELEvent>,
    objects: Vec<SlimOCELObject>,
    event_types: Vec<String>,
    object_types: Vec<String>,
    evtype_to_index: HashMap<String, usize>,
    obtype_to_index: HashMap<String, usize>,
    event_ids_to_index: HashMap<String, EventIndex>,
    object_ids_to_index: HashMap<String, ObjectIndex>,
    events_per_type: Vec<Vec<EventIndex>>,
    objects_per_type: Vec<Vec<ObjectIndex>>,
    // Object => Events involving it (ordered by time)
    e2o_rev: Vec<Vec<EventIndex>>,
    // Object => Objects pointing to it
    o2o_rev: Vec<Vec<ObjectIndex>>,
}

fn intern(
    name: &str,
    names: &mut Vec<String>,
    name_to_index: &mut HashMap<String, usize>,
) -> usize {
    if let Some(i) = name_to_index.get(name) {
        return *i;
    }
    names.push(name.to_string());
    name_to_index.insert(name.to_string(), names.len() - 1);
    names.len() - 1
}

impl SlimLinkedOCEL {
    /// Link an [`OCEL`]
    ///
    /// Types used by events or objects but not declared in the log are added.
    /// Relationships to unknown object ids are dropped, and so are duplicate object ids (first one wins).
    pub fn from_ocel(ocel: OCEL) -> Self {
        let mut event_types = Vec::new();
        let mut object_types = Vec::new();
        let mut evtype_to_index = HashMap::new();
        let mut obtype_to_index = HashMap::new();
        for et in &ocel.event_types {
            intern(&et.name, &mut event_types, &mut evtype_to_index);
        }
        for ot in &ocel.object_types {
            intern(&ot.name, &mut object_types, &mut obtype_to_index);
        }

        let mut object_ids_to_index: HashMap<String, ObjectIndex> = HashMap::new();
        let mut objects: Vec<SlimOCELObject> = Vec::with_capacity(ocel.objects.len());
        let mut o2o_ids: Vec<Vec<String>> = Vec::with_capacity(ocel.objects.len());
        let mut skipped_relationships = 0_usize;
        for o in ocel.objects {
            if object_ids_to_index.contains_key(&o.id) {
                tracing::warn!(object = %o.id, "duplicate object id, keeping first occurrence");
                continue;
            }
            let object_type = intern(&o.object_type, &mut object_types, &mut obtype_to_index);
            object_ids_to_index.insert(o.id.clone(), ObjectIndex(objects.len()));
            o2o_ids.push(o.relationships.into_iter().map(|r| r.object_id).collect());
            objects.push(SlimOCELObject {
                id: o.id,
                object_type,
                o2o: Vec::new(),
            });
        }
        for (o, targets) in objects.iter_mut().zip(o2o_ids) {
            let mut o2o: Vec<ObjectIndex> = targets
                .iter()
                .filter_map(|id| {
                    let index = object_ids_to_index.get(id).copied();
                    if index.is_none() {
                        skipped_relationships += 1;
                    }
                    index
                })
                .collect();
            o2o.sort();
            o2o.dedup();
            o.o2o = o2o;
        }

        let mut ocel_events = ocel.events;
        // Stable: events with equal timestamps keep the input order
        ocel_events.sort_by_key(|e| e.time);
        let mut event_ids_to_index = HashMap::with_capacity(ocel_events.len());
        let mut events: Vec<SlimOCELEvent> = Vec::with_capacity(ocel_events.len());
        for e in ocel_events {
            let event_type = intern(&e.event_type, &mut event_types, &mut evtype_to_index);
            let mut e2o: Vec<ObjectIndex> = e
                .relationships
                .iter()
                .filter_map(|r| {
                    let index = object_ids_to_index.get(&r.object_id).copied();
                    if index.is_none() {
                        skipped_relationships += 1;
                    }
                    index
                })
                .collect();
            e2o.sort();
            e2o.dedup();
            event_ids_to_index.insert(e.id.clone(), EventIndex(events.len()));
            events.push(SlimOCELEvent {
                id: e.id,
                event_type,
                time: e.time,
                e2o,
            });
        }
        if skipped_relationships > 0 {
            tracing::warn!(
                count = skipped_relationships,
                "dropped relationships referencing unknown objects"
            );
        }

        let mut events_per_type = vec![Vec::new(); event_types.len()];
        let mut e2o_rev = vec![Vec::new(); objects.len()];
        for (i, e) in events.iter().enumerate() {
            events_per_type[e.event_type].push(EventIndex(i));
            for o in &e.e2o {
                e2o_rev[o.0].push(EventIndex(i));
            }
        }
        let mut objects_per_type = vec![Vec::new(); object_types.len()];
        let mut o2o_rev = vec![Vec::new(); objects.len()];
        for (i, o) in objects.iter().enumerate() {
            objects_per_type[o.object_type].push(ObjectIndex(i));
            for target in &o.o2o {
                o2o_rev[target.0].push(ObjectIndex(i));
            }
        }

        Self {
            events,
            objects,
            event_types,
            object_types,
            evtype_to_index,
            obtype_to_index,
            event_ids_to_index,
            object_ids_to_index,
            events_per_type,
            objects_per_type,
            e2o_rev,
            o2o_rev,
        }
    }

    /// All event types
    pub fn get_ev_types(&self) -> impl Iterator<Item = &String> {
        self.event_types.iter()
    }

    /// All object types
    pub fn get_ob_types(&self) -> impl Iterator<Item = &String> {
        self.object_types.iter()
    }

    /// Events of the given type, ordered by time (empty for unknown types)
    pub fn get_evs_of_type(&self, event_type: &str) -> &[EventIndex] {
        self.evtype_to_index
            .get(event_type)
            .map(|i| self.events_per_type[*i].as_slice())
            .unwrap_or_default()
    }

    /// Objects of the given type (empty for unknown types)
    pub fn get_obs_of_type(&self, object_type: &str) -> &[ObjectIndex] {
        self.obtype_to_index
            .get(object_type)
            .map(|i| self.objects_per_type[*i].as_slice())
            .unwrap_or_default()
    }

    /// All events, ordered by time
    pub fn get_all_evs(&self) -> impl Iterator<Item = EventIndex> {
        (0..self.events.len()).map(EventIndex)
    }

    /// All objects
    pub fn get_all_obs(&self) -> impl Iterator<Item = ObjectIndex> {
        (0..self.objects.len()).map(ObjectIndex)
    }

    /// Number of events
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    /// Number of objects
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Get the event at an index
    ///
    /// Panics for indices not created by this linked OCEL.
    pub fn get_ev(&self, index: EventIndex) -> &SlimOCELEvent {
        &self.events[index.0]
    }

    /// Get the object at an index
    ///
    /// Panics for indices not created by this linked OCEL.
    pub fn get_ob(&self, index: ObjectIndex) -> &SlimOCELObject {
        &self.objects[index.0]
    }

    /// Look up an event by its id
    pub fn get_ev_by_id(&self, id: &str) -> Option<EventIndex> {
        self.event_ids_to_index.get(id).copied()
    }

    /// Look up an object by its id
    pub fn get_ob_by_id(&self, id: &str) -> Option<ObjectIndex> {
        self.object_ids_to_index.get(id).copied()
    }

    /// Event type of an event
    pub fn get_ev_type(&self, index: EventIndex) -> &str {
        &self.event_types[self.get_ev(index).event_type]
    }

    /// Object type of an object
    pub fn get_ob_type(&self, index: ObjectIndex) -> &str {
        &self.object_types[self.get_ob(index).object_type]
    }

    /// Time of an event
    pub fn get_ev_time(&self, index: EventIndex) -> DateTime<FixedOffset> {
        self.get_ev(index).time
    }

    /// Objects involved in an event (sorted)
    pub fn get_e2o(&self, index: EventIndex) -> &[ObjectIndex] {
        &self.get_ev(index).e2o
    }

    /// Events involving an object (ordered by time)
    pub fn get_e2o_rev(&self, index: ObjectIndex) -> &[EventIndex] {
        &self.e2o_rev[index.0]
    }

    /// Objects related to an object (sorted)
    pub fn get_o2o(&self, index: ObjectIndex) -> &[ObjectIndex] {
        &self.get_ob(index).o2o
    }

    /// Objects which have an O2O relationship to the given object (sorted)
    pub fn get_o2o_rev(&self, index: ObjectIndex) -> &[ObjectIndex] {
        &self.o2o_rev[index.0]
    }

    /// Time of the first and last event involving an object
    ///
    /// `None` if the object is not involved in any event.
    pub fn get_lifespan(
        &self,
        index: ObjectIndex,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let evs = self.get_e2o_rev(index);
        Some((
            self.get_ev_time(*evs.first()?),
            self.get_ev_time(*evs.last()?),
        ))
    }
}

impl From<OCEL> for SlimLinkedOCEL {
    fn from(ocel: OCEL) -> Self {
        Self::from_ocel(ocel)
    }
}
