//! Combat target selection.
//!
//! Fighting castes pick their target from the hostiles they can see:
//! highest [`target_priority`] first, nearest among equals. The actual
//! damage exchange is resolved by the tick cycle from the
//! [`AttackIntent`]s agents emit.

use formica_types::{AgentId, HostileId, HostileKind, Vec2};

/// A hostile as seen by an ant during the perception phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleHostile {
    /// The hostile's id.
    pub id: HostileId,
    /// Its species.
    pub kind: HostileKind,
    /// Its position at the start of the tick.
    pub position: Vec2,
}

/// A request to damage a hostile, resolved after all agents have acted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackIntent {
    /// The attacking ant.
    pub attacker: AgentId,
    /// The hostile being attacked.
    pub target: HostileId,
    /// Damage dealt if the target still exists.
    pub damage: u32,
}

/// Targeting priority of a species. Higher is attacked first.
pub const fn target_priority(kind: HostileKind) -> u8 {
    match kind {
        HostileKind::Spider => 3,
        HostileKind::RivalAnt => 2,
        HostileKind::Beetle => 1,
    }
}

/// Pick the hostile to engage from `hostiles`, or `None` if none is
/// within `vision_radius` of `position`.
pub fn select_target(
    position: Vec2,
    vision_radius: f32,
    hostiles: &[VisibleHostile],
) -> Option<VisibleHostile> {
    hostiles
        .iter()
        .map(|h| (h, position.distance(h.position)))
        .filter(|(_, dist)| *dist <= vision_radius)
        .max_by(|(a, da), (b, db)| {
            target_priority(a.kind)
                .cmp(&target_priority(b.kind))
                .then_with(|| db.total_cmp(da))
                .then_with(|| b.id.cmp(&a.id))
        })
        .map(|(h, _)| *h)
}
