use thiserror::Error;

use super::NodeKind;
use crate::ids::ItemId;

/// Errors raised while constructing prerequisite trees.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("{kind} node for item {item_id} needs at least one child")]
    EmptyComposite { kind: NodeKind, item_id: ItemId },
}
