use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::object_centric::linked_ocel::{ObjectIndex, SlimLinkedOCEL};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
/// Stores statistics on the number of objects of a certain type involved with an activity or in an O2O relationship.
pub struct ObjectInvolvementCounts {
    /// The minimum number of objects of a given type involved in a single instance.
    pub min: usize,
    /// The maximum number of objects of a given type involved in a single instance.
    pub max: usize,
}

impl Default for ObjectInvolvementCounts {
    fn default() -> Self {
        Self {
            min: usize::MAX,
            max: 0,
        }
    }
}

impl ObjectInvolvementCounts {
    fn record(&mut self, count: usize) {
        self.min = self.min.min(count);
        self.max = self.max.max(count);
    }
}

/// Count, per object type, the objects in `related`, and record those counts
///
/// Only types occurring at least once are recorded (so `min >= 1`).
fn record_counts<'a>(
    locel: &'a SlimLinkedOCEL,
    related: &[ObjectIndex],
    stats: &mut HashMap<&'a str, ObjectInvolvementCounts>,
) {
    let mut per_type: HashMap<&str, usize> = HashMap::new();
    for o in related {
        *per_type.entry(locel.get_ob_type(*o)).or_default() += 1;
    }
    for (ot, count) in per_type {
        stats.entry(ot).or_default().record(count);
    }
}

fn into_owned(
    stats: HashMap<&str, ObjectInvolvementCounts>,
) -> HashMap<String, ObjectInvolvementCounts> {
    stats
        .into_iter()
        .map(|(ot, counts)| (ot.to_string(), counts))
        .collect()
}

/// Get the object type involvements for an activity
///
/// Produces the min and max counts for objects per object type and activity,
/// over the events of that activity which involve at least one object of the type.
///
/// The result is a mapping: Activity -> (Object Type -> Counts)
pub fn get_activity_object_involvements(
    locel: &SlimLinkedOCEL,
) -> HashMap<String, HashMap<String, ObjectInvolvementCounts>> {
    locel
        .get_ev_types()
        .map(|et| {
            let mut stats = HashMap::new();
            for ev in locel.get_evs_of_type(et) {
                record_counts(locel, locel.get_e2o(*ev), &mut stats);
            }
            (et.to_string(), into_owned(stats))
        })
        .collect()
}

/// Get Object-to-Object Involvements in the passed OCEL
///
/// Returns a mapping Object Type -> (Object Type -> Counts)
///
/// where Counts specifies how many objects of the second object type are referenced by each object of the first object type
pub fn get_object_to_object_involvements(
    locel: &SlimLinkedOCEL,
) -> HashMap<String, HashMap<String, ObjectInvolvementCounts>> {
    locel
        .get_ob_types()
        .map(|ot| {
            let mut stats = HashMap::new();
            for ob in locel.get_obs_of_type(ot) {
                record_counts(locel, locel.get_o2o(*ob), &mut stats);
            }
            (ot.to_string(), into_owned(stats))
        })
        .collect()
}

/// Get object involvement counts for the reverse direction of O2O relationships
///
/// Returns a mapping Object Type -> (Object Type -> Counts)
///
/// where Counts specifies how many objects of the second object type reference each object of the first object type
pub fn get_rev_object_to_object_involvements(
    locel: &SlimLinkedOCEL,
) -> HashMap<String, HashMap<String, ObjectInvolvementCounts>> {
    locel
        .get_ob_types()
        .map(|ot| {
            let mut stats = HashMap::new();
            for ob in locel.get_obs_of_type(ot) {
                record_counts(locel, locel.get_o2o_rev(*ob), &mut stats);
            }
            (ot.to_string(), into_owned(stats))
        })
        .collect()
}

/// Summary of a loaded log: Object Type -> Activity -> involvement counts
///
/// Serialized as a nested JSON object `{ "orders": { "place order": { "min": 1, "max": 1 } } }`.
/// Every object type of the log is present, possibly with an empty activity map.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(transparent)]
pub struct OcelInfo(pub BTreeMap<String, BTreeMap<String, ObjectInvolvementCounts>>);

impl OcelInfo {
    /// Compute the summary for a linked log
    pub fn from_locel(locel: &SlimLinkedOCEL) -> Self {
        let mut info: BTreeMap<String, BTreeMap<String, ObjectInvolvementCounts>> = locel
            .get_ob_types()
            .map(|ot| (ot.clone(), BTreeMap::new()))
            .collect();
        for (act, per_type) in get_activity_object_involvements(locel) {
            for (ot, counts) in per_type {
                info.entry(ot).or_default().insert(act.clone(), counts);
            }
        }
        Self(info)
    }

    /// Involvement counts of an object type with an activity
    pub fn get(&self, object_type: &str, activity: &str) -> Option<&ObjectInvolvementCounts> {
        self.0.get(object_type)?.get(activity)
    }

    /// All object types of the log
    pub fn object_types(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Activities involving objects of a type
    pub fn activities_of(&self, object_type: &str) -> impl Iterator<Item = &String> {
        self.0.get(object_type).into_iter().flat_map(|acts| acts.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocel;

    fn locel() -> SlimLinkedOCEL {
        SlimLinkedOCEL::from_ocel(ocel![
            events:
            ("place order", ["orders:o1", "items:i1", "items:i2"]),
            ("place order", ["orders:o2", "items:i3"]),
            ("ship order", ["orders:o1"]),
            o2o:
            ("orders:o1", "items:i1"),
            ("orders:o1", "items:i2"),
            ("orders:o2", "items:i3"),
            ("customers:c1", "orders:o1")
        ])
    }

    #[test]
    fn test_activity_involvements() {
        let inv = get_activity_object_involvements(&locel());
        assert_eq!(
            inv["place order"]["items"],
            ObjectInvolvementCounts { min: 1, max: 2 }
        );
        assert_eq!(
            inv["place order"]["orders"],
            ObjectInvolvementCounts { min: 1, max: 1 }
        );
        assert!(!inv["ship order"].contains_key("items"));
    }

    #[test]
    fn test_o2o_involvements() {
        let locel = locel();
        let o2o = get_object_to_object_involvements(&locel);
        assert_eq!(o2o["orders"]["items"], ObjectInvolvementCounts { min: 1, max: 2 });
        assert!(o2o["items"].is_empty());
        let rev = get_rev_object_to_object_involvements(&locel);
        assert_eq!(rev["items"]["orders"], ObjectInvolvementCounts { min: 1, max: 1 });
        assert_eq!(rev["orders"]["customers"], ObjectInvolvementCounts { min: 1, max: 1 });
    }

    #[test]
    fn test_ocel_info() {
        let info = OcelInfo::from_locel(&locel());
        assert_eq!(
            info.get("items", "place order"),
            Some(&ObjectInvolvementCounts { min: 1, max: 2 })
        );
        assert_eq!(info.activities_of("orders").count(), 2);
        // customers only appear in O2O relationships
        assert_eq!(info.activities_of("customers").count(), 0);
        assert!(info.object_types().any(|ot| ot == "customers"));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["orders"]["ship order"]["max"], 1);
    }
}
