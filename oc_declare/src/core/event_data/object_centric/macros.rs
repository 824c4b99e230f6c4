//! Convenient Macros for Creating Object-centric Event Data
/// Creates an [`OCEL`] containing the given events, objects, event-to-object (e2o) relations
/// and object-to-object (o2o) relations.
///
/// Each event is a tuple of the event type and the related objects as a list of object identifiers.
/// Object identifiers have to be denoted '`ob_type`:`ob_id`'; the part before the first colon is
/// the object type. Events are one second apart, starting at 2020-01-01 00:00:00 UTC, in the order
/// they are listed.
///
/// ```
/// use oc_declare::ocel;
///
/// let log = ocel![
///     events:
///     ("place order", ["customers:c1", "orders:o1", "items:i1"]),
///     ("ship order", ["orders:o1"]),
///     o2o:
///     ("orders:o1", "items:i1")
/// ];
/// assert_eq!(log.events.len(), 2);
/// assert_eq!(log.objects.len(), 3);
/// ```
///
/// [`OCEL`]: crate::core::event_data::object_centric::OCEL
#[macro_export]
macro_rules! ocel {
    (events: $(($ev_type:expr, [$($object:expr),* $(,)?])),*, o2o: $(($from_ob:expr, $to_ob:expr)),* $(,)?) => {{
        use ::std::collections::BTreeMap;
        use $crate::core::chrono::{TimeDelta, TimeZone, Utc};
        use $crate::core::event_data::object_centric::{
            OCEL, OCELEvent, OCELObject, OCELRelationship, OCELType,
        };

        fn object_type_of(ob: &str) -> String {
            ob.split(':').next().unwrap_or_default().to_string()
        }

        let mut event_types: Vec<String> = Vec::new();
        // Object ID => Object (ordered by id for deterministic logs)
        let mut objects: BTreeMap<String, OCELObject> = BTreeMap::new();
        let mut events: Vec<OCELEvent> = Vec::new();
        let mut timestamp = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        $(
            let ev_type: String = $ev_type.to_string();
            if !event_types.contains(&ev_type) {
                event_types.push(ev_type.clone());
            }
            #[allow(unused_mut)]
            let mut relations: Vec<OCELRelationship> = Vec::new();
            $(
                let ob_id: String = $object.to_string();
                let ob_type = object_type_of(&ob_id);
                relations.push(OCELRelationship::new(ob_id.clone(), ob_type.clone()));
                objects.entry(ob_id.clone()).or_insert_with(|| OCELObject {
                    id: ob_id,
                    object_type: ob_type,
                    attributes: Vec::new(),
                    relationships: Vec::new(),
                });
            )*
            events.push(OCELEvent::new(
                format!("ev:{}", events.len() + 1),
                ev_type,
                timestamp.fixed_offset(),
                Vec::new(),
                relations,
            ));
            timestamp += TimeDelta::seconds(1);
        )*

        $(
            let from_id: String = $from_ob.to_string();
            let to_id: String = $to_ob.to_string();
            for ob_id in [&from_id, &to_id] {
                objects.entry(ob_id.clone()).or_insert_with(|| OCELObject {
                    id: ob_id.clone(),
                    object_type: object_type_of(ob_id),
                    attributes: Vec::new(),
                    relationships: Vec::new(),
                });
            }
            if let Some(from) = objects.get_mut(&from_id) {
                let qualifier = object_type_of(&to_id);
                from.relationships.push(OCELRelationship::new(to_id, qualifier));
            }
        )*

        let mut object_types: Vec<String> = objects.values().map(|o| o.object_type.clone()).collect();
        object_types.sort();
        object_types.dedup();

        OCEL {
            event_types: event_types
                .into_iter()
                .map(|name| OCELType { name, attributes: Vec::new() })
                .collect(),
            object_types: object_types
                .into_iter()
                .map(|name| OCELType { name, attributes: Vec::new() })
                .collect(),
            events,
            objects: objects.into_values().collect(),
        }
    }};
    (events: $(($ev_type:expr, [$($object:expr),* $(,)?])),* $(,)?) => {
        $crate::ocel!(events: $(($ev_type, [$($object),*])),*, o2o:)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macro_builds_objects_and_o2o() {
        let log = crate::ocel![
            events:
            ("place order", ["orders:o1", "items:i1", "items:i2"]),
            ("ship order", ["orders:o1"]),
            o2o:
            ("orders:o1", "items:i1"),
            ("orders:o1", "packages:p1")
        ];
        assert_eq!(log.event_types.len(), 2);
        assert_eq!(log.object_types.len(), 3);
        assert_eq!(log.objects.len(), 4);
        let order = log.objects.iter().find(|o| o.id == "orders:o1").unwrap();
        assert_eq!(order.relationships.len(), 2);
        assert!(log.events[0].time < log.events[1].time);
    }

    #[test]
    fn test_macro_without_o2o() {
        let log = crate::ocel![events: ("a", ["x:1"]), ("b", [])];
        assert_eq!(log.events.len(), 2);
        assert!(log.events[1].relationships.is_empty());
    }
}
