//! The demonstration address space `uasx` runs against.
//!
//! ```text
//! Objects (i=85)
//! └── Boiler (ns=1;i=1000)            HasTypeDefinition -> BoilerType
//!     ├── Temperature (ns=1;i=1001)   historizing
//!     ├── Setpoint (ns=1;i=1002)      writable
//!     ├── SerialNumber (ns=1;i=1005)  property
//!     ├── Scale(factor) (ns=1;i=1003)
//!     └── Vent() (ns=1;i=1004)        not executable
//! ```

use std::sync::Arc;

use ua_nodes::{
    FnMethodHandler, InMemoryNodeManager, MethodData, MethodError, Node, NodeManager, Reference,
    VariableData,
};
use ua_server::{InMemoryHistory, ManagedAddressSpace, ServiceConfig};
use ua_types::{
    access_level, ids, Argument, DataValue, DateTime, LocalizedText, NodeId, QualifiedName,
    StatusCode, UaError, Variant, VariantType,
};

pub const BOILER: NodeId = NodeId::numeric(1, 1000);
pub const TEMPERATURE: NodeId = NodeId::numeric(1, 1001);
pub const SETPOINT: NodeId = NodeId::numeric(1, 1002);
pub const SCALE: NodeId = NodeId::numeric(1, 1003);
pub const VENT: NodeId = NodeId::numeric(1, 1004);
pub const SERIAL_NUMBER: NodeId = NodeId::numeric(1, 1005);
pub const BOILER_TYPE: NodeId = NodeId::numeric(1, 2000);

/// Samples recorded for Temperature, one per second.
const HISTORY_SAMPLES: i64 = 120;

pub fn build(config: ServiceConfig) -> anyhow::Result<ManagedAddressSpace> {
    let manager = InMemoryNodeManager::new();
    let ctx = manager.context();

    manager.add_node(Node::object(
        ctx.clone(),
        ids::OBJECTS_FOLDER,
        QualifiedName::new(0, "Objects"),
    ))?;
    manager.add_reference(Reference::has_type_definition(
        ids::OBJECTS_FOLDER,
        ids::FOLDER_TYPE,
    ))?;

    manager.add_node(Node::object_type(
        ctx.clone(),
        BOILER_TYPE,
        QualifiedName::new(1, "BoilerType"),
        false,
    ))?;
    manager.add_reference(Reference::new(
        BOILER_TYPE,
        ids::HAS_SUBTYPE,
        ids::BASE_OBJECT_TYPE,
        false,
    ))?;

    manager.add_node(
        Node::object(ctx.clone(), BOILER, QualifiedName::new(1, "Boiler"))
            .with_description(LocalizedText::new("Demonstration boiler")),
    )?;
    manager.add_bidirectional_reference(Reference::organizes(ids::OBJECTS_FOLDER, BOILER))?;
    manager.add_reference(Reference::has_type_definition(BOILER, BOILER_TYPE))?;

    let mut temperature = VariableData::new(DataValue::new(71.5));
    temperature.historizing = true;
    temperature.access_level |= access_level::HISTORY_READ;
    temperature.data_type = ids::BASE_DATA_VARIABLE_TYPE;
    add_component(
        &manager,
        Node::variable(ctx.clone(), TEMPERATURE, QualifiedName::new(1, "Temperature"), temperature),
    )?;

    let mut setpoint = VariableData::new(DataValue::new(70.0));
    setpoint.access_level |= access_level::CURRENT_WRITE;
    setpoint.data_type = ids::BASE_DATA_VARIABLE_TYPE;
    add_component(
        &manager,
        Node::variable(ctx.clone(), SETPOINT, QualifiedName::new(1, "Setpoint"), setpoint),
    )?;

    manager.add_node(Node::variable(
        ctx.clone(),
        SERIAL_NUMBER,
        QualifiedName::new(1, "SerialNumber"),
        VariableData::new(DataValue::value_only("BX-0042")),
    ))?;
    manager.add_bidirectional_reference(Reference::has_property(BOILER, SERIAL_NUMBER))?;

    add_component(
        &manager,
        Node::method(
            ctx.clone(),
            SCALE,
            QualifiedName::new(1, "Scale"),
            MethodData {
                executable: true,
                input_arguments: vec![Argument::new("factor", VariantType::Double)],
                output_arguments: vec![Argument::new("scaled", VariantType::Double)],
                handler: Some(FnMethodHandler::new(scale_setpoint).into_handler()),
            },
        )
        .with_description(LocalizedText::new("Setpoint multiplied by factor")),
    )?;
    add_component(
        &manager,
        Node::method(ctx, VENT, QualifiedName::new(1, "Vent"), MethodData::default()),
    )?;

    let history = Arc::new(InMemoryHistory::new());
    let now = DateTime::now();
    for i in 0..HISTORY_SAMPLES {
        let at = now.plus_millis(-1_000 * i);
        let reading = 71.5 + (i as f64 / 10.0).sin();
        history.record(TEMPERATURE, DataValue::sample(reading, at, at));
    }

    Ok(ManagedAddressSpace::new(manager, history, config))
}

fn add_component(manager: &InMemoryNodeManager, node: Node) -> anyhow::Result<()> {
    let id = node.node_id().clone();
    manager.add_node(node)?;
    manager.add_bidirectional_reference(Reference::has_component(BOILER, id))?;
    Ok(())
}

fn scale_setpoint(
    ctx: &ua_nodes::InvocationContext,
    args: &[Variant],
) -> Result<Vec<Variant>, MethodError> {
    let [Variant::Double(factor)] = args else {
        return Err(StatusCode::BAD_INVALID_ARGUMENT.into());
    };
    let setpoint = ctx
        .method
        .context()
        .node_manager()
        .and_then(|m| m.get_node(&SETPOINT))
        .and_then(|n| n.as_variable().and_then(|v| v.value().value.as_f64()))
        .ok_or_else(|| UaError::with_message(StatusCode::BAD_NODE_ID_UNKNOWN, "setpoint missing"))?;
    Ok(vec![Variant::Double(setpoint * factor)])
}
