use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ua_nodes::{
    AttributeAccessor, AttributeContext, FnMethodHandler, InMemoryNodeManager, MethodData, Node,
    NodeManager, Reference, StandardAttributes, VariableData,
};
use ua_server::{
    AddressSpace, HistoryConfig, InMemoryHistory, ManagedAddressSpace, ServiceConfig,
    ServiceContext, WindowBounds,
};
use ua_types::{
    access_level, AttributeId, CallMethodRequest, DataValue, DateTime, HistoryReadDetails,
    HistoryReadValueId, NodeId, NumericRange, QualifiedName, ReadRawModifiedDetails, ReadValueId,
    StatusCode, TimestampsToReturn, UaError, Variant, ViewDescription, WriteValue,
};

const OBJECT: u32 = 1;
const METHOD: u32 = 2;
const FAULTY: u32 = 3;
const PANICKY: u32 = 4;
const TEMPERATURE: u32 = 10;
const SETPOINT: u32 = 11;
const GUARDED: u32 = 12;
const SAMPLES: u32 = 13;

fn id(n: u32) -> NodeId {
    NodeId::numeric(1, n)
}

fn at(ms: i64) -> DateTime {
    DateTime::from_unix_millis(ms)
}

/// Rejects every write with a typed error; reads fall through to the
/// standard accessor.
struct ReadOnlyAccessor;

#[async_trait]
impl AttributeAccessor for ReadOnlyAccessor {
    async fn read_attribute(
        &self,
        node: &Node,
        ctx: &AttributeContext,
        attribute_id: AttributeId,
        timestamps: TimestampsToReturn,
        index_range: Option<&NumericRange>,
        data_encoding: Option<&QualifiedName>,
    ) -> DataValue {
        StandardAttributes
            .read_attribute(node, ctx, attribute_id, timestamps, index_range, data_encoding)
            .await
    }

    async fn write_attribute(
        &self,
        _node: &Node,
        _ctx: &AttributeContext,
        _attribute_id: AttributeId,
        _value: &DataValue,
        _index_range: Option<&NumericRange>,
    ) -> Result<(), UaError> {
        Err(UaError::with_message(StatusCode::BAD_USER_ACCESS_DENIED, "interlocked"))
    }
}

/// Serves the Value attribute after a fixed delay.
struct DelayedAccessor(u64);

#[async_trait]
impl AttributeAccessor for DelayedAccessor {
    async fn read_attribute(
        &self,
        _node: &Node,
        _ctx: &AttributeContext,
        _attribute_id: AttributeId,
        _timestamps: TimestampsToReturn,
        _index_range: Option<&NumericRange>,
        _data_encoding: Option<&QualifiedName>,
    ) -> DataValue {
        tokio::time::sleep(Duration::from_millis(self.0)).await;
        DataValue::value_only(self.0 as i64)
    }

    async fn write_attribute(
        &self,
        _node: &Node,
        _ctx: &AttributeContext,
        _attribute_id: AttributeId,
        _value: &DataValue,
        _index_range: Option<&NumericRange>,
    ) -> Result<(), UaError> {
        Err(UaError::new(StatusCode::BAD_NOT_WRITABLE))
    }
}

struct Fixture {
    manager: Arc<InMemoryNodeManager>,
    space: ManagedAddressSpace,
}

fn method(manager: &InMemoryNodeManager, n: u32, handler: FnMethodHandler) {
    manager
        .add_node(Node::method(
            manager.context(),
            id(n),
            QualifiedName::new(1, format!("Method{n}")),
            MethodData {
                executable: true,
                handler: Some(handler.into_handler()),
                ..MethodData::default()
            },
        ))
        .unwrap();
    manager
        .add_bidirectional_reference(Reference::has_component(id(OBJECT), id(n)))
        .unwrap();
}

fn fixture(config: ServiceConfig) -> Fixture {
    let manager = InMemoryNodeManager::new();

    manager
        .add_node(Node::object(manager.context(), id(OBJECT), QualifiedName::new(1, "Boiler")))
        .unwrap();
    method(&manager, METHOD, FnMethodHandler::new(|_, _| Ok(vec![Variant::Boolean(true)])));
    method(
        &manager,
        FAULTY,
        FnMethodHandler::new(|_, _| Err(anyhow::anyhow!("driver disconnected").into())),
    );
    method(&manager, PANICKY, FnMethodHandler::new(|_, _| panic!("handler bug")));

    let mut temperature = VariableData::new(DataValue::value_only(71.5));
    temperature.historizing = true;
    manager
        .add_node(Node::variable(
            manager.context(),
            id(TEMPERATURE),
            QualifiedName::new(1, "Temperature"),
            temperature,
        ))
        .unwrap();

    let mut setpoint = VariableData::new(DataValue::value_only(70.0));
    setpoint.access_level = access_level::CURRENT_READ | access_level::CURRENT_WRITE;
    manager
        .add_node(Node::variable(
            manager.context(),
            id(SETPOINT),
            QualifiedName::new(1, "Setpoint"),
            setpoint,
        ))
        .unwrap();

    manager
        .add_node(
            Node::variable(
                manager.context(),
                id(GUARDED),
                QualifiedName::new(1, "Guarded"),
                VariableData::new(DataValue::value_only(1.0)),
            )
            .with_accessor(Arc::new(ReadOnlyAccessor)),
        )
        .unwrap();

    // Not linked under the object, so Browse of the object is unaffected.
    let mut samples = VariableData::new(DataValue::value_only(vec![1i32, 2, 3, 4, 5]));
    samples.access_level = access_level::CURRENT_READ | access_level::CURRENT_WRITE;
    manager
        .add_node(Node::variable(
            manager.context(),
            id(SAMPLES),
            QualifiedName::new(1, "Samples"),
            samples,
        ))
        .unwrap();

    for n in [TEMPERATURE, SETPOINT, GUARDED] {
        manager
            .add_bidirectional_reference(Reference::has_component(id(OBJECT), id(n)))
            .unwrap();
    }

    let history = Arc::new(InMemoryHistory::new());
    for ms in [1_000, 1_001, 1_500, 1_999, 2_000, 2_500] {
        history.record(id(TEMPERATURE), DataValue::sample(ms as f64 / 100.0, at(ms), at(ms)));
    }

    let space = ManagedAddressSpace::new(manager.clone(), history, config);
    Fixture { manager, space }
}

fn server_millis(values: &[DataValue]) -> Vec<i64> {
    values
        .iter()
        .filter_map(|v| v.server_timestamp.map(|t| t.unix_millis()))
        .collect()
}

// ---- Browse / GetReferences ----

#[tokio::test]
async fn browse_unknown_fails_while_get_references_is_empty() {
    let f = fixture(ServiceConfig::default());
    let view = ViewDescription::default();

    for unknown in [id(999), NodeId::string(2, "Nowhere"), NodeId::NULL] {
        let (ctx, done) = ServiceContext::internal();
        f.space.browse(ctx, &view, &unknown).await;
        assert_eq!(done.await, Err(StatusCode::BAD_NODE_ID_UNKNOWN));

        let (ctx, done) = ServiceContext::internal();
        f.space.get_references(ctx, &view, &unknown).await;
        assert_eq!(done.await, Ok(vec![]));
    }
}

#[tokio::test]
async fn browse_returns_stored_references() {
    let f = fixture(ServiceConfig::default());
    let (ctx, done) = ServiceContext::internal();
    f.space.browse(ctx, &ViewDescription::default(), &id(OBJECT)).await;
    let references = done.await.unwrap();
    assert_eq!(references.len(), 6);
    assert!(references.iter().all(|r| r.source_id == id(OBJECT) && r.is_forward));

    // Inverse edges were stored under the local targets.
    let back = f.manager.get_references(&id(SETPOINT));
    assert_eq!(back, vec![Reference::has_component(id(OBJECT), id(SETPOINT)).inverse()]);
}

// ---- Read / Write ----

#[tokio::test]
async fn read_batch_keeps_length_and_order() {
    let f = fixture(ServiceConfig {
        max_concurrent_items: 2,
        ..ServiceConfig::default()
    });
    let items = vec![
        ReadValueId::value(id(SETPOINT)),
        ReadValueId::value(id(404)),
        ReadValueId::value(id(TEMPERATURE)),
        ReadValueId::new(id(TEMPERATURE), AttributeId::Historizing),
        ReadValueId::new(id(OBJECT), AttributeId::Historizing),
    ];
    let (ctx, done) = ServiceContext::internal();
    f.space.read(ctx, 0.0, TimestampsToReturn::Both, &items).await;
    let values = done.await.unwrap();

    assert_eq!(values.len(), items.len());
    assert_eq!(values[0].value, Variant::Double(70.0));
    assert_eq!(values[1].status, StatusCode::BAD_NODE_ID_UNKNOWN);
    assert_eq!(values[1].value, Variant::Empty);
    assert!(values[1].source_timestamp.is_none() && values[1].server_timestamp.is_none());
    assert_eq!(values[2].value, Variant::Double(71.5));
    assert_eq!(values[3].value, Variant::Boolean(true));
    assert_eq!(values[4].status, StatusCode::BAD_ATTRIBUTE_ID_INVALID);
}

#[tokio::test]
async fn write_errors_are_per_item() {
    let f = fixture(ServiceConfig::default());
    let items = vec![
        WriteValue::value(id(GUARDED), 5.0),
        WriteValue::value(id(404), 5.0),
        WriteValue::value(id(TEMPERATURE), 5.0),
        WriteValue::value(id(SETPOINT), 65.0),
    ];
    let (ctx, done) = ServiceContext::internal();
    f.space.write(ctx, &items).await;
    let results = done.await.unwrap();

    assert_eq!(
        results,
        vec![
            StatusCode::BAD_USER_ACCESS_DENIED,
            StatusCode::BAD_NODE_ID_UNKNOWN,
            StatusCode::BAD_NOT_WRITABLE,
            StatusCode::GOOD,
        ]
    );

    let (ctx, done) = ServiceContext::internal();
    f.space
        .read(ctx, 0.0, TimestampsToReturn::Neither, &[ReadValueId::value(id(SETPOINT))])
        .await;
    assert_eq!(done.await.unwrap()[0].value, Variant::Double(65.0));
}

#[tokio::test]
async fn read_order_is_input_order_not_completion_order() {
    let f = fixture(ServiceConfig::default());
    let delays = [50u64, 5, 30, 1];
    for (i, ms) in delays.iter().enumerate() {
        f.manager
            .add_node(
                Node::variable(
                    f.manager.context(),
                    id(100 + i as u32),
                    QualifiedName::new(1, format!("Delayed{ms}")),
                    VariableData::new(DataValue::value_only(0.0)),
                )
                .with_accessor(Arc::new(DelayedAccessor(*ms))),
            )
            .unwrap();
    }
    let items: Vec<_> = (0..delays.len())
        .map(|i| ReadValueId::value(id(100 + i as u32)))
        .collect();

    let (ctx, done) = ServiceContext::internal();
    f.space.read(ctx, 0.0, TimestampsToReturn::Neither, &items).await;
    let values: Vec<_> = done.await.unwrap().into_iter().map(|v| v.value).collect();

    assert_eq!(
        values,
        vec![
            Variant::Int64(50),
            Variant::Int64(5),
            Variant::Int64(30),
            Variant::Int64(1),
        ]
    );
}

#[tokio::test]
async fn inverted_index_range_fails_only_its_item() {
    let f = fixture(ServiceConfig::default());
    let inverted = NumericRange::Span { low: 3, high: 1 };

    let mut bad_read = ReadValueId::value(id(SAMPLES));
    bad_read.index_range = Some(inverted);
    let items = vec![bad_read, ReadValueId::value(id(SAMPLES))];
    let (ctx, done) = ServiceContext::internal();
    f.space.read(ctx, 0.0, TimestampsToReturn::Neither, &items).await;
    let values = done.await.unwrap();
    assert_eq!(values[0].status, StatusCode::BAD_INDEX_RANGE_INVALID);
    assert_eq!(values[1].value, Variant::from(vec![1i32, 2, 3, 4, 5]));

    let writes = vec![
        WriteValue::value(id(SAMPLES), vec![9i32]).with_index_range(inverted),
        WriteValue::value(id(SAMPLES), vec![7i32, 8]).with_index_range("1:2".parse().unwrap()),
    ];
    let (ctx, done) = ServiceContext::internal();
    f.space.write(ctx, &writes).await;
    assert_eq!(
        done.await.unwrap(),
        vec![StatusCode::BAD_INDEX_RANGE_INVALID, StatusCode::GOOD]
    );

    let (ctx, done) = ServiceContext::internal();
    f.space
        .read(ctx, 0.0, TimestampsToReturn::Neither, &[ReadValueId::value(id(SAMPLES))])
        .await;
    assert_eq!(done.await.unwrap()[0].value, Variant::from(vec![1i32, 7, 8, 4, 5]));

    let mut bad_history = HistoryReadValueId::new(id(TEMPERATURE));
    bad_history.index_range = Some(inverted);
    let items = vec![bad_history, HistoryReadValueId::new(id(TEMPERATURE))];
    let (ctx, done) = ServiceContext::internal();
    f.space
        .history_read(
            ctx,
            &HistoryReadDetails::RawModified(ReadRawModifiedDetails::window(at(0), at(10_000))),
            TimestampsToReturn::Both,
            &items,
        )
        .await;
    let results = done.await.unwrap();
    assert!(results[0]
        .data_values()
        .iter()
        .all(|v| v.status == StatusCode::BAD_INDEX_RANGE_INVALID));
    assert_eq!(results[1].data_values().len(), 6);
    assert!(results[1].data_values().iter().all(|v| v.status.is_good()));
}

// ---- HistoryRead ----

async fn history(
    f: &Fixture,
    details: ReadRawModifiedDetails,
    nodes: &[NodeId],
) -> Vec<ua_types::HistoryReadResult> {
    let items: Vec<_> = nodes.iter().cloned().map(HistoryReadValueId::new).collect();
    let (ctx, done) = ServiceContext::internal();
    f.space
        .history_read(
            ctx,
            &HistoryReadDetails::RawModified(details),
            TimestampsToReturn::Both,
            &items,
        )
        .await;
    done.await.unwrap()
}

#[tokio::test]
async fn null_end_time_returns_single_most_recent_sample() {
    let f = fixture(ServiceConfig::default());
    let results = history(&f, ReadRawModifiedDetails::latest(), &[id(TEMPERATURE)]).await;
    assert_eq!(results[0].status, StatusCode::GOOD);
    assert_eq!(server_millis(results[0].data_values()), vec![2_500]);
}

#[tokio::test]
async fn window_excludes_samples_on_either_boundary() {
    let f = fixture(ServiceConfig::default());
    let results = history(
        &f,
        ReadRawModifiedDetails::window(at(1_000), at(2_000)),
        &[id(TEMPERATURE)],
    )
    .await;
    let stamps = server_millis(results[0].data_values());
    assert!(!stamps.contains(&1_000));
    assert!(!stamps.contains(&2_000));
    assert!(stamps.contains(&1_001));
    assert!(stamps.contains(&1_999));
    assert_eq!(stamps, vec![1_999, 1_500, 1_001]);
}

#[tokio::test]
async fn inclusive_policy_keeps_boundaries() {
    let f = fixture(ServiceConfig {
        history: HistoryConfig {
            window_bounds: WindowBounds::Inclusive,
            ..HistoryConfig::default()
        },
        ..ServiceConfig::default()
    });
    let results = history(
        &f,
        ReadRawModifiedDetails::window(at(1_000), at(2_000)),
        &[id(TEMPERATURE)],
    )
    .await;
    assert_eq!(
        server_millis(results[0].data_values()),
        vec![2_000, 1_999, 1_500, 1_001, 1_000]
    );
}

#[tokio::test]
async fn history_statuses_per_item() {
    let f = fixture(ServiceConfig::default());
    let results = history(
        &f,
        ReadRawModifiedDetails::window(at(0), at(10_000)),
        &[id(SETPOINT), id(TEMPERATURE), id(404), id(OBJECT)],
    )
    .await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].status, StatusCode::BAD_HISTORY_OPERATION_UNSUPPORTED);
    assert_eq!(results[1].status, StatusCode::GOOD);
    assert_eq!(results[1].data_values().len(), 6);
    assert_eq!(results[2].status, StatusCode::BAD_NODE_ID_UNKNOWN);
    assert_eq!(results[3].status, StatusCode::BAD_HISTORY_OPERATION_UNSUPPORTED);
}

// ---- Call ----

#[tokio::test]
async fn call_batch_mixed_outcomes() {
    let f = fixture(ServiceConfig::default());
    let requests = vec![
        CallMethodRequest::new(id(OBJECT), id(METHOD), vec![]),
        CallMethodRequest::new(id(999), id(METHOD), vec![]),
        CallMethodRequest::new(id(OBJECT), id(777), vec![]),
    ];
    let (ctx, done) = ServiceContext::internal();
    f.space.call(ctx, &requests).await;
    let results = done.await.unwrap();

    let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            StatusCode::GOOD,
            StatusCode::BAD_NODE_ID_UNKNOWN,
            StatusCode::BAD_METHOD_INVALID,
        ]
    );
    assert_eq!(results[0].output_arguments, vec![Variant::Boolean(true)]);
}

#[tokio::test]
async fn faulting_handlers_do_not_abort_the_batch() {
    let f = fixture(ServiceConfig::default());
    let requests = vec![
        CallMethodRequest::new(id(OBJECT), id(FAULTY), vec![]),
        CallMethodRequest::new(id(OBJECT), id(PANICKY), vec![]),
        CallMethodRequest::new(id(OBJECT), id(METHOD), vec![]),
    ];
    let (ctx, done) = ServiceContext::internal();
    f.space.call(ctx, &requests).await;
    let results = done.await.unwrap();

    assert_eq!(results[0].status, StatusCode::BAD_INTERNAL_ERROR);
    assert_eq!(results[1].status, StatusCode::BAD_INTERNAL_ERROR);
    assert_eq!(results[2].status, StatusCode::GOOD);
}

// ---- Concurrency ----

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sessions_share_the_graph() {
    let f = Arc::new(fixture(ServiceConfig::default()));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let f = Arc::clone(&f);
            tokio::spawn(async move {
                let items: Vec<_> = (0..32).map(|_| ReadValueId::value(id(SETPOINT))).collect();
                let (ctx, done) = ServiceContext::new(Some(uuid::Uuid::new_v4()));
                f.space.read(ctx, 0.0, TimestampsToReturn::Neither, &items).await;
                done.await.unwrap()
            })
        })
        .collect();

    for task in tasks {
        let values = task.await.unwrap();
        assert_eq!(values.len(), 32);
        assert!(values.iter().all(|v| v.status == StatusCode::GOOD));
    }
}
