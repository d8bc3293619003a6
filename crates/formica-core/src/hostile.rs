//! Hostile creatures: beetles, spiders, and rival ants.
//!
//! Hostiles are not driven by pheromones. Each tick a hostile picks the
//! nearest ant within its sight radius, drifts toward it, and bites it once
//! in range and off cooldown. Bites are returned to the tick cycle and
//! resolved after every hostile has moved.

use serde::{Deserialize, Serialize};

use formica_agents::NearbyAgent;
use formica_types::{AgentId, HostileId, HostileKind, Vec2};
use formica_world::GridMapper;

use crate::config::HostileConfig;

/// One hostile creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    /// Hostile id.
    pub id: HostileId,
    /// Species, which decides how eagerly soldiers target it.
    pub kind: HostileKind,
    /// Position in world units.
    pub position: Vec2,
    /// Remaining health.
    pub health: u32,
    /// Ticks until the next bite is allowed.
    pub bite_cooldown: u32,
}

impl Hostile {
    /// Spawn a hostile of `kind` at `position` with `health`.
    pub fn new(kind: HostileKind, position: Vec2, health: u32) -> Self {
        Self {
            id: HostileId::new(),
            kind,
            position,
            health,
            bite_cooldown: 0,
        }
    }

    /// Whether the hostile still has health.
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract `amount` health. Returns `true` if this killed the hostile.
    pub const fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }
}

/// A bite landed by a hostile, resolved by the tick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bite {
    /// The biting hostile.
    pub hostile: HostileId,
    /// The ant being bitten.
    pub agent: AgentId,
    /// Damage dealt.
    pub damage: u32,
}

/// Run one tick for `hostile` against the ants as they stood at the start
/// of the tick.
pub fn step_hostile(
    hostile: &mut Hostile,
    ants: &[NearbyAgent],
    config: &HostileConfig,
    mapper: &GridMapper,
    dt: f32,
) -> Option<Bite> {
    hostile.bite_cooldown = hostile.bite_cooldown.saturating_sub(1);

    let (prey, dist) = ants
        .iter()
        .map(|ant| (ant, hostile.position.distance(ant.position)))
        .filter(|(_, dist)| *dist <= config.sight_radius)
        .min_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)))?;

    if dist <= config.bite_range {
        if hostile.bite_cooldown > 0 {
            return None;
        }
        hostile.bite_cooldown = config.bite_cooldown_ticks;
        return Some(Bite {
            hostile: hostile.id,
            agent: prey.id,
            damage: config.bite_damage,
        });
    }

    let step = (config.move_speed * dt).min(dist);
    let heading = (prey.position - hostile.position).normalized();
    hostile.position = mapper.clamp_to_world(hostile.position + heading.scaled(step));
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use formica_world::FieldConfig;

    use super::*;

    fn mapper() -> GridMapper {
        GridMapper::new(&FieldConfig {
            tile_size: 10.0,
            sub_cells_per_tile: 1,
            width_tiles: 20,
            height_tiles: 20,
            colony_interior_radius: 1,
        })
        .unwrap()
    }

    fn ant(n: u128, x: f32) -> NearbyAgent {
        NearbyAgent {
            id: AgentId::from(Uuid::from_u128(n)),
            position: Vec2::new(x, 50.0),
            following: None,
        }
    }

    #[test]
    fn drifts_toward_nearest_ant() {
        let config = HostileConfig::default();
        let mut beetle = Hostile::new(HostileKind::Beetle, Vec2::new(50.0, 50.0), 10);
        let ants = [ant(1, 120.0), ant(2, 80.0)];
        let bite = step_hostile(&mut beetle, &ants, &config, &mapper(), 1.0);
        assert!(bite.is_none());
        assert!(beetle.position.x > 50.0);
        assert!(beetle.position.x <= 80.0);
    }

    #[test]
    fn ignores_ants_out_of_sight() {
        let config = HostileConfig {
            sight_radius: 10.0,
            ..HostileConfig::default()
        };
        let start = Vec2::new(50.0, 50.0);
        let mut spider = Hostile::new(HostileKind::Spider, start, 10);
        assert!(step_hostile(&mut spider, &[ant(1, 150.0)], &config, &mapper(), 1.0).is_none());
        assert_eq!(spider.position, start);
    }

    #[test]
    fn bites_in_range_on_cooldown() {
        let config = HostileConfig {
            bite_cooldown_ticks: 3,
            ..HostileConfig::default()
        };
        let mut rival = Hostile::new(HostileKind::RivalAnt, Vec2::new(50.0, 50.0), 10);
        let ants = [ant(7, 52.0)];
        let bites: Vec<Bite> = (0..7)
            .filter_map(|_| step_hostile(&mut rival, &ants, &config, &mapper(), 0.05))
            .collect();
        // Ticks 0, 3, and 6.
        assert_eq!(bites.len(), 3);
        assert!(bites.iter().all(|b| b.agent == AgentId::from(Uuid::from_u128(7))));
        assert!(bites.iter().all(|b| b.damage == config.bite_damage));
    }

    #[test]
    fn killing_blow_reported_once() {
        let mut beetle = Hostile::new(HostileKind::Beetle, Vec2::ZERO, 5);
        assert!(!beetle.take_damage(3));
        assert!(beetle.take_damage(3));
        assert!(!beetle.take_damage(3));
        assert!(!beetle.is_alive());
    }
}
