use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, NodeId};
use crate::types::ActionType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameAction {
    pub player_index: usize,
    pub action_type: ActionType,
    pub payload: ActionPayload,
}

impl GameAction {
    pub fn new(player_index: usize, action_type: ActionType) -> Self {
        Self {
            player_index,
            action_type,
            payload: ActionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn settlement(player_index: usize, node: NodeId) -> Self {
        Self::new(player_index, ActionType::BuildSettlement).with_payload(ActionPayload::Node(node))
    }

    pub fn road(player_index: usize, edge: EdgeId) -> Self {
        Self::new(player_index, ActionType::BuildRoad).with_payload(ActionPayload::Edge(edge))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionPayload {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}
