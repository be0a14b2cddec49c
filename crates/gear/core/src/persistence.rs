//! JSON codec for gearsets and prerequisite trees.
//!
//! Every node carries a `"type"` discriminator (`"atom"`, `"and"`, `"or"`).
//! Documents are validated structurally before they are decoded so a bad
//! discriminator or a missing key is reported precisely, with the path of
//! the offending node.

use serde_json::Value;
use thiserror::Error;

use crate::gear::Gearset;
use crate::ids::ItemId;
use crate::prerequisite::{NodeError, NodeKind, PrerequisiteNode};

const NODE_KEYS: [&str; 3] = ["id", "item_id", "item_name"];

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{field}` at {path}")]
    MissingField { field: &'static str, path: String },

    #[error("unknown node type `{found}` at {path}")]
    UnknownNodeType { found: String, path: String },

    #[error("expected a JSON array of gearsets")]
    NotAnArray,

    #[error(transparent)]
    Node(#[from] NodeError),
}

pub fn gearset_to_json(gearset: &Gearset) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(gearset)?)
}

pub fn gearset_from_json(json: &str) -> Result<Gearset, PersistenceError> {
    let value: Value = serde_json::from_str(json)?;
    decode_gearset(value)
}

pub fn node_to_json(node: &PrerequisiteNode) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(node)?)
}

pub fn node_from_json(json: &str) -> Result<PrerequisiteNode, PersistenceError> {
    let value: Value = serde_json::from_str(json)?;
    check_node(&value, "$")?;
    Ok(serde_json::from_value(value)?)
}

/// Decodes a JSON array of gearsets entry by entry.
///
/// Only a document that is not an array fails as a whole; each entry gets
/// its own result.
pub fn gearsets_from_json_array(
    json: &str,
) -> Result<Vec<Result<Gearset, PersistenceError>>, PersistenceError> {
    let Value::Array(entries) = serde_json::from_str(json)? else {
        return Err(PersistenceError::NotAnArray);
    };
    Ok(entries.into_iter().map(decode_gearset).collect())
}

fn decode_gearset(value: Value) -> Result<Gearset, PersistenceError> {
    for field in ["id", "name"] {
        if value.get(field).is_none() {
            return Err(PersistenceError::MissingField {
                field,
                path: "$".to_owned(),
            });
        }
    }
    if let Some(Value::Array(pieces)) = value.get("gearpieces") {
        for (index, piece) in pieces.iter().enumerate() {
            if let Some(tree) = piece.get("prerequisites").filter(|v| !v.is_null()) {
                check_node(tree, &format!("$.gearpieces[{index}].prerequisites"))?;
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

fn check_node(value: &Value, path: &str) -> Result<(), PersistenceError> {
    let Some(tag) = value.get("type") else {
        return Err(PersistenceError::MissingField {
            field: "type",
            path: path.to_owned(),
        });
    };
    let kind = tag
        .as_str()
        .and_then(|s| s.parse::<NodeKind>().ok())
        .ok_or_else(|| PersistenceError::UnknownNodeType {
            found: tag.to_string().trim_matches('"').to_owned(),
            path: path.to_owned(),
        })?;
    for field in NODE_KEYS {
        if value.get(field).is_none() {
            return Err(PersistenceError::MissingField {
                field,
                path: path.to_owned(),
            });
        }
    }

    let children = value
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if kind != NodeKind::Atom && children.is_empty() {
        let item_id = value
            .get("item_id")
            .and_then(Value::as_u64)
            .and_then(|raw| u32::try_from(raw).ok())
            .map(ItemId)
            .unwrap_or_default();
        return Err(NodeError::EmptyComposite { kind, item_id }.into());
    }
    for (index, child) in children.iter().enumerate() {
        check_node(child, &format!("{path}.children[{index}]"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{ClassJob, Gearpiece, GearpieceSlot};
    use crate::prerequisite::SourceType;

    fn sample_tree() -> PrerequisiteNode {
        let token = |n| PrerequisiteNode::atom(ItemId(28), format!("Token {n}"), SourceType::Loot);
        let mut tree = PrerequisiteNode::atom(ItemId(42), "Weapon", SourceType::Upgrade)
            .with_children(vec![
                PrerequisiteNode::any_of(
                    ItemId(0),
                    "",
                    SourceType::Unknown,
                    vec![
                        PrerequisiteNode::all_of(
                            ItemId(0),
                            "",
                            SourceType::Unknown,
                            vec![token(1), token(2)],
                        )
                        .unwrap(),
                        PrerequisiteNode::atom(ItemId(7), "Coffer", SourceType::Coffer),
                    ],
                )
                .unwrap(),
            ]);
        tree.assign_item_id(ItemId(28));
        tree.children_mut()[0].children_mut()[1].set_collected(true, true);
        tree
    }

    #[test]
    fn node_round_trip_keeps_shape_and_state() {
        let tree = sample_tree();
        let json = node_to_json(&tree).unwrap();
        assert!(json.contains(r#""type":"or""#));

        let decoded = node_from_json(&json).unwrap();

        assert_eq!(decoded.group_key(), tree.group_key());
        assert_eq!(decoded, tree);
    }

    #[test]
    fn gearset_round_trip() {
        let gearset = Gearset::new("Savage", ClassJob::Drg).with_priority(3).with_gearpiece(
            Gearpiece::new(ItemId(42), "Weapon", GearpieceSlot::MainHand)
                .with_prerequisites(sample_tree()),
        );

        let decoded = gearset_from_json(&gearset_to_json(&gearset).unwrap()).unwrap();

        assert_eq!(decoded, gearset);
    }

    #[test]
    fn unknown_discriminator_is_reported_with_path() {
        let json = r#"{"type":"atom","id":"00000000-0000-0000-0000-000000000001","item_id":1,
            "item_name":"x","children":[{"type":"xor","id":"00000000-0000-0000-0000-000000000002",
            "item_id":2,"item_name":"y"}]}"#;

        match node_from_json(json) {
            Err(PersistenceError::UnknownNodeType { found, path }) => {
                assert_eq!(found, "xor");
                assert_eq!(path, "$.children[0]");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_reported() {
        let json = r#"{"type":"atom","id":"00000000-0000-0000-0000-000000000001","item_name":"x"}"#;
        assert!(matches!(
            node_from_json(json),
            Err(PersistenceError::MissingField { field: "item_id", .. })
        ));

        let json = r#"{"id":"00000000-0000-0000-0000-000000000001","item_id":1,"item_name":"x"}"#;
        assert!(matches!(
            node_from_json(json),
            Err(PersistenceError::MissingField { field: "type", .. })
        ));
    }

    #[test]
    fn empty_composite_is_rejected() {
        let json = r#"{"type":"and","id":"00000000-0000-0000-0000-000000000001","item_id":5,
            "item_name":"x","children":[]}"#;
        assert!(matches!(
            node_from_json(json),
            Err(PersistenceError::Node(NodeError::EmptyComposite { kind: NodeKind::And, .. }))
        ));
    }

    #[test]
    fn array_entries_fail_independently() {
        let good = gearset_to_json(&Gearset::new("ok", ClassJob::Whm)).unwrap();
        let json = format!(r#"[{good}, {{"name":"no id"}}, {good}]"#);

        let results = gearsets_from_json_array(&json).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(PersistenceError::MissingField { field: "id", .. })
        ));
        assert!(results[2].is_ok());
        assert!(matches!(
            gearsets_from_json_array("{}"),
            Err(PersistenceError::NotAnArray)
        ));
    }
}
