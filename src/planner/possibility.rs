use serde::{Deserialize, Serialize};

use crate::board::NodeId;
use crate::planner::arena::SnapshotId;
use crate::types::{DevelopmentCard, PieceType};

pub type PossibilityId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanAction {
    /// `node` is known for settlements placed by the plan, `None` for a
    /// piece saved up for without a spot picked yet.
    PlacePiece {
        piece: PieceType,
        node: Option<NodeId>,
    },
    BuyCard,
    PlayCard(DevelopmentCard),
}

/// One speculative step of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPossibility {
    pub action: PlanAction,
    /// Victory points gained.
    pub score: u32,
    /// Change of each [`PieceType::ALL`] estimate, in rolls.
    pub speed_deltas: [i32; 4],
    pub eta: u32,
    pub priority: u32,
    pub snapshot: SnapshotId,
    pub parent: Option<PossibilityId>,
    pub children: Vec<PossibilityId>,
}

impl BuildPossibility {
    pub fn new(action: PlanAction, snapshot: SnapshotId) -> Self {
        let score = match action {
            PlanAction::PlacePiece { piece, .. } => u32::from(piece.victory_points()),
            PlanAction::BuyCard | PlanAction::PlayCard(_) => 0,
        };
        Self {
            action,
            score,
            speed_deltas: [0; 4],
            eta: 0,
            priority: priority(score, 0),
            snapshot,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_eta(mut self, eta: u32) -> Self {
        self.eta = eta;
        self.priority = priority(self.score, eta);
        self
    }

    pub fn with_speed_deltas(mut self, speed_deltas: [i32; 4]) -> Self {
        self.speed_deltas = speed_deltas;
        self
    }
}

/// Points per thousand rolls.
pub fn priority(score: u32, eta: u32) -> u32 {
    score * 1000 / eta.max(1)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTree {
    nodes: Vec<BuildPossibility>,
}

impl PlanTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, mut possibility: BuildPossibility) -> PossibilityId {
        possibility.parent = None;
        possibility.children.clear();
        self.nodes.push(possibility);
        self.nodes.len() - 1
    }

    /// Attach `possibility` under `parent`; `None` if the parent is unknown.
    pub fn add_child(
        &mut self,
        parent: PossibilityId,
        mut possibility: BuildPossibility,
    ) -> Option<PossibilityId> {
        if parent >= self.nodes.len() {
            return None;
        }
        let id = self.nodes.len();
        possibility.parent = Some(parent);
        possibility.children.clear();
        self.nodes.push(possibility);
        self.nodes[parent].children.push(id);
        Some(id)
    }

    pub fn get(&self, id: PossibilityId) -> Option<&BuildPossibility> {
        self.nodes.get(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = PossibilityId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    pub fn children(&self, id: PossibilityId) -> &[PossibilityId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Ids from the root down to `id`.
    pub fn path(&self, id: PossibilityId) -> Vec<PossibilityId> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.get(id).map(|_| id);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.nodes[current].parent;
        }
        path.reverse();
        path
    }

    /// Child with the highest priority, the lower ETA breaking ties.
    pub fn best_child(&self, id: PossibilityId) -> Option<PossibilityId> {
        self.children(id).iter().copied().min_by(|a, b| {
            let (a, b) = (&self.nodes[*a], &self.nodes[*b]);
            b.priority.cmp(&a.priority).then(a.eta.cmp(&b.eta))
        })
    }
}
