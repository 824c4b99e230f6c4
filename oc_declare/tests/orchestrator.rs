use oc_declare::{
    engine::{EngineConfig, EngineError, EngineHandle, EngineRequest, EngineResponse},
    ocel, EdgeType, OCDeclareArc, OCDeclareArcLabel, OCDeclareNode, ObjectTypeAssociation,
    OcelFormat, ViolationResult,
};

fn order_log_json() -> Vec<u8> {
    serde_json::to_vec(&ocel![
        events:
        ("place order", ["orders:o1", "items:i1", "items:i2"]),
        ("pick item", ["items:i1"]),
        ("pick item", ["items:i2"]),
        ("ship order", ["orders:o1"]),
        ("place order", ["orders:o2", "items:i3"]),
        ("ship order", ["orders:o2"])
    ])
    .unwrap()
}

const ORDER_LOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
  <object-types>
    <object-type name="orders"><attributes/></object-type>
  </object-types>
  <event-types>
    <event-type name="place order"><attributes/></event-type>
    <event-type name="ship order"><attributes/></event-type>
  </event-types>
  <objects>
    <object id="o1" type="orders"><attributes/><objects/></object>
  </objects>
  <events>
    <event id="e1" type="place order" time="2024-01-01T10:00:00Z">
      <objects><relationship object-id="o1" qualifier="order"/></objects>
    </event>
    <event id="e2" type="ship order" time="2024-01-02T10:00:00Z">
      <objects><relationship object-id="o1" qualifier="order"/></objects>
    </event>
  </events>
</log>"#;

fn edge(kind: EdgeType, from: &str, to: &str, ot: &str) -> OCDeclareArc {
    kind.to_arc(
        OCDeclareNode::activity(from),
        OCDeclareNode::activity(to),
        OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple(ot)),
        None,
    )
}

#[tokio::test]
async fn test_engine_lifecycle() {
    let engine = EngineHandle::spawn(EngineConfig::default()).unwrap();

    assert!(matches!(
        engine.evaluate(Vec::new()).await,
        Err(EngineError::NotLoaded)
    ));
    assert!(matches!(
        engine.discover(0.9).await,
        Err(EngineError::NotLoaded)
    ));
    // Unloading without a log is a no-op
    engine.unload().await.unwrap();

    let info = engine.load(order_log_json(), OcelFormat::Json).await.unwrap();
    let place = info.get("items", "place order").unwrap();
    assert_eq!((place.min, place.max), (1, 2));

    assert_eq!(engine.evaluate(Vec::new()).await.unwrap(), Vec::new());
    let results = engine
        .evaluate(vec![
            edge(EdgeType::Ef, "place order", "ship order", "orders"),
            edge(EdgeType::Nef, "place order", "ship order", "orders"),
            edge(EdgeType::Ef, "place order", "pick item", "items"),
            edge(EdgeType::Ef, "cancel order", "ship order", "orders"),
        ])
        .await
        .unwrap();
    assert_eq!(
        results,
        vec![
            ViolationResult::new(2, 0),
            ViolationResult::new(2, 2),
            ViolationResult::new(2, 1),
            ViolationResult::new(0, 0),
        ]
    );
    assert!(results[3].violation_percentage().no_data);

    let discovered = engine.discover(1.0).await.unwrap();
    assert!(!discovered.is_empty());
    assert_eq!(discovered, engine.discover(1.0).await.unwrap());
    // Discovered arcs hold on the log they were discovered on
    let results = engine.evaluate(discovered).await.unwrap();
    assert!(results.iter().all(|r| r.violating == 0));

    engine.unload().await.unwrap();
    assert!(matches!(
        engine.evaluate(Vec::new()).await,
        Err(EngineError::NotLoaded)
    ));
    engine.shutdown().unwrap();
}

#[tokio::test]
async fn test_failed_load_unloads() {
    let engine = EngineHandle::spawn(EngineConfig::default()).unwrap();
    engine.load(order_log_json(), OcelFormat::Json).await.unwrap();
    let res = engine.load(b"<log><events>".to_vec(), OcelFormat::Json).await;
    assert!(matches!(res, Err(EngineError::Parse(_))));
    assert!(matches!(
        engine.discover(0.5).await,
        Err(EngineError::NotLoaded)
    ));
    // The engine is still usable
    let info = engine
        .load(ORDER_LOG_XML.as_bytes().to_vec(), OcelFormat::Xml)
        .await
        .unwrap();
    assert!(info.get("orders", "ship order").is_some());
    engine.shutdown().unwrap();
}

#[tokio::test]
async fn test_invalid_requests() {
    let engine = EngineHandle::spawn(EngineConfig::default()).unwrap();
    engine
        .load(ORDER_LOG_XML.as_bytes().to_vec(), OcelFormat::Xml)
        .await
        .unwrap();
    let invalid = EdgeType::Ef.to_arc(
        OCDeclareNode::activity(""),
        OCDeclareNode::activity("ship order"),
        OCDeclareArcLabel::default(),
        None,
    );
    let res = engine
        .evaluate(vec![
            edge(EdgeType::Ef, "place order", "ship order", "orders"),
            invalid,
        ])
        .await;
    assert!(matches!(res, Err(EngineError::InvalidArc { index: 1, .. })));
    assert!(matches!(
        engine.discover(-0.1).await,
        Err(EngineError::InvalidThreshold(_))
    ));
    // Still loaded
    assert_eq!(
        engine
            .evaluate(vec![edge(EdgeType::Df, "place order", "ship order", "orders")])
            .await
            .unwrap(),
        vec![ViolationResult::new(1, 0)]
    );
    engine.shutdown().unwrap();
}

#[tokio::test]
async fn test_pending_response() {
    let engine = EngineHandle::spawn(EngineConfig::default()).unwrap();
    let mut pending = engine
        .submit(EngineRequest::Load {
            bytes: order_log_json(),
            format: OcelFormat::Json,
        })
        .unwrap();
    let response = loop {
        if let Some(response) = pending.try_take() {
            break response;
        }
        tokio::task::yield_now().await;
    };
    assert!(matches!(response, Ok(EngineResponse::Loaded(_))));
    assert!(!engine.is_busy());
    engine.shutdown().unwrap();
}

#[tokio::test]
async fn test_handles_are_independent() {
    let first = EngineHandle::spawn(EngineConfig::default()).unwrap();
    let second = EngineHandle::spawn(EngineConfig::default()).unwrap();
    first.load(order_log_json(), OcelFormat::Json).await.unwrap();
    assert!(matches!(
        second.evaluate(Vec::new()).await,
        Err(EngineError::NotLoaded)
    ));
    first.shutdown().unwrap();
    second.shutdown().unwrap();
}
