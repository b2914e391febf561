use std::path::Path;

use serde::{Deserialize, Serialize};

use zwave_core::definitions::{CommandClasses, Genre, NodeId, QueryStage, ValueType};
use zwave_core::value_id::ValueId;
use zwave_core::values::{ValueListItem, ValueMetadata, ValueVariant};

use crate::error::{Error, Result};
use crate::node::NodeTable;
use crate::value_registry::ValueRegistry;

/// The persisted network cache (spec §4.10/§4.13): one `Driver` document per
/// home, loaded at startup to satisfy the `CacheLoad` interview stage and
/// written back out on `write_config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "Driver")]
pub struct DriverXml {
    #[serde(rename = "Node", default)]
    pub nodes: Vec<NodeXml>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeXml {
    #[serde(rename = "@id")]
    pub id: u8,
    #[serde(rename = "@generic")]
    pub generic: u8,
    #[serde(rename = "@specific")]
    pub specific: u8,
    #[serde(rename = "@query_stage")]
    pub query_stage: String,
    #[serde(rename = "CommandClass", default)]
    pub command_classes: Vec<CommandClassXml>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandClassXml {
    #[serde(rename = "@id")]
    pub id: u16,
    #[serde(rename = "@version")]
    pub version: u8,
    #[serde(rename = "@instances")]
    pub instances: u8,
    #[serde(rename = "Value", default)]
    pub values: Vec<ValueXml>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueXml {
    #[serde(rename = "@genre")]
    pub genre: u8,
    #[serde(rename = "@instance")]
    pub instance: u8,
    #[serde(rename = "@index")]
    pub index: u32,
    #[serde(rename = "@type")]
    pub value_type: u8,
    #[serde(rename = "@label", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "@units", skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "@read_only")]
    pub read_only: bool,
    #[serde(rename = "@value", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "Item", default)]
    pub items: Vec<ItemXml>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemXml {
    #[serde(rename = "@value")]
    pub value: i32,
    #[serde(rename = "@label")]
    pub label: String,
}

fn format_query_stage(stage: QueryStage) -> String {
    format!("{:?}", stage)
}

fn parse_query_stage(s: &str) -> QueryStage {
    use QueryStage::*;
    [
        ProtocolInfo,
        WakeUp,
        ManufacturerSpecific,
        NodeInfo,
        NodePlusInfo,
        SecurityReport,
        Versions,
        Instances,
        Static,
        CacheLoad,
        Associations,
        Neighbors,
        Session,
        Dynamic,
        Configuration,
        Complete,
    ]
    .into_iter()
    .find(|stage| format_query_stage(*stage) == s)
    .unwrap_or(ProtocolInfo)
}

fn format_value(value: &ValueVariant) -> (Option<String>, Vec<ItemXml>) {
    match value {
        ValueVariant::Bool(b) => (Some(b.to_string()), vec![]),
        ValueVariant::Byte(b) => (Some(b.to_string()), vec![]),
        ValueVariant::Short(s) => (Some(s.to_string()), vec![]),
        ValueVariant::Int(i) => (Some(i.to_string()), vec![]),
        ValueVariant::Decimal(d) => (Some(d.to_string()), vec![]),
        ValueVariant::String(s) => (Some(s.clone()), vec![]),
        ValueVariant::Raw(bytes) => (Some(hex::encode(bytes)), vec![]),
        ValueVariant::Schedule(bytes) => (Some(hex::encode(bytes)), vec![]),
        ValueVariant::Button => (None, vec![]),
        ValueVariant::List(items, selected) => (
            Some(selected.to_string()),
            items
                .iter()
                .map(|item| ItemXml {
                    value: item.value,
                    label: item.label.clone(),
                })
                .collect(),
        ),
    }
}

fn parse_value(value_type: ValueType, raw: &Option<String>, items: &[ItemXml]) -> Option<ValueVariant> {
    let raw = raw.as_ref()?;
    Some(match value_type {
        ValueType::Bool => ValueVariant::Bool(raw.parse().ok()?),
        ValueType::Byte => ValueVariant::Byte(raw.parse().ok()?),
        ValueType::Short => ValueVariant::Short(raw.parse().ok()?),
        ValueType::Int => ValueVariant::Int(raw.parse().ok()?),
        ValueType::Decimal => ValueVariant::Decimal(raw.parse().ok()?),
        ValueType::String => ValueVariant::String(raw.clone()),
        ValueType::Raw => ValueVariant::Raw(hex::decode(raw).ok()?),
        ValueType::Schedule => ValueVariant::Schedule(hex::decode(raw).ok()?),
        ValueType::Button => ValueVariant::Button,
        ValueType::List => ValueVariant::List(
            items
                .iter()
                .map(|item| ValueListItem {
                    value: item.value,
                    label: item.label.clone(),
                })
                .collect(),
            raw.parse().ok()?,
        ),
    })
}

/// Serializes every known node and value into the XML document described in
/// spec §6.
pub fn to_xml(nodes: &NodeTable, values: &ValueRegistry) -> Result<String> {
    let home_id = values.home_id();
    let mut doc = DriverXml::default();

    for node_id in nodes.all_ids() {
        let Some(node) = nodes.get_clone(node_id) else {
            continue;
        };

        let mut command_classes = Vec::new();
        for (&cc, info) in node.command_classes.iter() {
            let value_ids: Vec<ValueId> = values
                .all_for_node(node_id)
                .into_iter()
                .filter(|v| v.command_class == cc)
                .collect();

            let mut xml_values = Vec::new();
            for value_id in value_ids {
                let Some(current) = values.get(&value_id) else {
                    continue;
                };
                let (value, items) = format_value(&current);
                xml_values.push(ValueXml {
                    genre: value_id.genre as u8,
                    instance: value_id.instance,
                    index: value_id.index,
                    value_type: value_id.value_type as u8,
                    label: None,
                    units: None,
                    read_only: false,
                    value,
                    items,
                });
            }

            command_classes.push(CommandClassXml {
                id: cc as u16,
                version: info.version,
                instances: info.instance_count,
                values: xml_values,
            });
        }

        doc.nodes.push(NodeXml {
            id: node.id.as_u8(),
            generic: node.device_class.generic,
            specific: node.device_class.specific,
            query_stage: format_query_stage(node.query_stage),
            command_classes,
        });
    }

    let _ = home_id;
    quick_xml::se::to_string(&doc).map_err(|e| Error::Internal(e.to_string()))
}

/// Loads a previously-written document, populating `nodes`/`values` so the
/// `CacheLoad` stage (spec §4.4) can skip re-querying anything already on
/// file.
pub fn load_xml(
    xml: &str,
    home_id: zwave_core::definitions::HomeId,
    nodes: &NodeTable,
    values: &ValueRegistry,
) -> Result<()> {
    let doc: DriverXml = quick_xml::de::from_str(xml).map_err(|e| Error::Internal(e.to_string()))?;

    for node_xml in doc.nodes {
        let node_id = NodeId::new(node_xml.id);
        if !nodes.contains(node_id) {
            continue;
        }
        nodes.with_mut(node_id, |node| {
            node.query_stage = parse_query_stage(&node_xml.query_stage);
        });

        for cc_xml in &node_xml.command_classes {
            let Ok(cc) = CommandClasses::try_from(cc_xml.id) else {
                continue;
            };
            nodes.with_mut(node_id, |node| {
                node.command_classes.insert(
                    cc,
                    crate::node::NodeCommandClassInfo {
                        version: cc_xml.version,
                        instance_count: cc_xml.instances,
                    },
                );
            });

            for value_xml in &cc_xml.values {
                let Ok(genre) = Genre::try_from(value_xml.genre) else {
                    continue;
                };
                let Ok(value_type) = ValueType::try_from(value_xml.value_type) else {
                    continue;
                };
                let value_id = ValueId::new(
                    home_id,
                    node_id,
                    genre,
                    cc,
                    value_xml.instance,
                    value_xml.index,
                    value_type,
                );
                values.ensure(value_id, ValueMetadata::builder().build());
                if let Some(variant) = parse_value(value_type, &value_xml.value, &value_xml.items) {
                    values.on_report(&value_id, variant);
                }
            }
        }
    }

    Ok(())
}

pub fn write_to_dir(dir: &Path, xml: &str) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::Internal(e.to_string()))?;
    std::fs::write(dir.join("cache.xml"), xml).map_err(|e| Error::Internal(e.to_string()))
}

pub fn read_from_dir(dir: &Path) -> Result<Option<String>> {
    let path = dir.join("cache.xml");
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| Error::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeState;
    use zwave_core::definitions::{DeviceClass, HomeId, NodeCapabilities};

    fn home() -> HomeId {
        HomeId::new(0xdead_beef)
    }

    fn sample() -> (NodeTable, ValueRegistry) {
        let nodes = NodeTable::new();
        let mut node = NodeState::new(NodeId::new(2), NodeCapabilities::default(), DeviceClass {
            basic: 4,
            generic: 0x10,
            specific: 0x01,
        });
        node.command_classes.insert(
            CommandClasses::BinarySwitch,
            crate::node::NodeCommandClassInfo {
                version: 1,
                instance_count: 1,
            },
        );
        nodes.insert(node);

        let values = ValueRegistry::new(home());
        let value_id = ValueId::new(
            home(),
            NodeId::new(2),
            Genre::User,
            CommandClasses::BinarySwitch,
            0,
            0,
            ValueType::Bool,
        );
        values.ensure(value_id, ValueMetadata::builder().label("Switch").build());
        values.on_report(&value_id, ValueVariant::Bool(true));

        (nodes, values)
    }

    #[test]
    fn round_trips_nodes_and_values_through_xml() {
        let (nodes, values) = sample();
        let xml = to_xml(&nodes, &values).unwrap();
        assert!(xml.contains("id=\"2\""));

        let loaded_nodes = NodeTable::new();
        loaded_nodes.insert(NodeState::new(
            NodeId::new(2),
            NodeCapabilities::default(),
            DeviceClass::default(),
        ));
        let loaded_values = ValueRegistry::new(home());
        load_xml(&xml, home(), &loaded_nodes, &loaded_values).unwrap();

        let value_id = ValueId::new(
            home(),
            NodeId::new(2),
            Genre::User,
            CommandClasses::BinarySwitch,
            0,
            0,
            ValueType::Bool,
        );
        assert_eq!(loaded_values.get(&value_id), Some(ValueVariant::Bool(true)));
        assert_eq!(
            loaded_nodes
                .get_clone(NodeId::new(2))
                .unwrap()
                .command_classes
                .get(&CommandClasses::BinarySwitch)
                .unwrap()
                .version,
            1
        );
    }

    #[test]
    fn writes_and_reads_back_the_cache_file() {
        let dir = std::env::temp_dir().join(format!(
            "zwave-driver-persistence-test-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);

        let (nodes, values) = sample();
        let xml = to_xml(&nodes, &values).unwrap();
        write_to_dir(&dir, &xml).unwrap();

        let read_back = read_from_dir(&dir).unwrap();
        assert_eq!(read_back.as_deref(), Some(xml.as_str()));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_cache_file_returns_none() {
        let dir = std::env::temp_dir().join(format!(
            "zwave-driver-persistence-test-missing-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        assert!(read_from_dir(&dir).unwrap().is_none());
    }
}
