//! Whole-tick tests of the colony: trails, foraging, combat, and edits made
//! between ticks.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use formica_core::{Simulation, SimulationConfig, TickSummary};
use formica_types::{Cell, HostileKind, PheromoneKind, ResourceKind, Vec2};

/// 20x20 tiles of 8 units with one sub-cell per tile. The colony sits in
/// sub-cell (10, 10) with an interior of radius 1.
fn small_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.width_tiles = 20;
    config.world.height_tiles = 20;
    config.world.tile_size = 8.0;
    config.field.sub_cells_per_tile = 1;
    config.field.colony_interior_radius = 1;
    config.colony.center_x = 84.0;
    config.colony.center_y = 84.0;
    config
}

fn occupancy_total(sim: &Simulation) -> u64 {
    sim.engine().markers().map(|m| u64::from(m.occupancy())).sum()
}

#[test]
fn worker_carries_food_home_along_gather_trail() {
    let mut sim = Simulation::from_config(&small_config()).unwrap();
    let end = sim
        .draw_line(Some(Cell::new(12, 10)), Cell::new(18, 10), PheromoneKind::Gather)
        .unwrap();
    assert_eq!(end, Cell::new(18, 10));
    assert_eq!(sim.engine().get(end, PheromoneKind::Gather).unwrap().distance(), 7);

    let food_pos = sim.engine().mapper().sub_cell_to_world(end);
    sim.add_food_source(ResourceKind::Honeydew, food_pos, 50);
    sim.spawn_agent("worker", food_pos).unwrap();

    let mut summaries: Vec<TickSummary> = Vec::new();
    for _ in 0..200 {
        let summary = sim.tick().unwrap();
        let done = summary.delivered > 0;
        summaries.push(summary);
        if done {
            break;
        }
    }

    let harvested: u32 = summaries.iter().map(|s| s.harvested).sum();
    let delivered: u32 = summaries.iter().map(|s| s.delivered).sum();
    assert_eq!(harvested, 3);
    assert_eq!(delivered, 3);
    assert!(summaries.iter().all(|s| s.deaths.is_empty()));
    assert_eq!(sim.food().iter().next().unwrap().remaining, 47);
    // The worker let go of the trail when it reached the colony end.
    assert_eq!(occupancy_total(&sim), 0);
}

#[test]
fn worker_loaded_at_explore_trail_end_still_delivers() {
    let mut config = small_config();
    config.world.width_tiles = 40;
    config.world.height_tiles = 40;
    let mut sim = Simulation::from_config(&config).unwrap();
    let end = sim
        .draw_line(Some(Cell::new(12, 10)), Cell::new(30, 10), PheromoneKind::Explore)
        .unwrap();
    assert_eq!(end, Cell::new(30, 10));

    let food_pos = sim.engine().mapper().sub_cell_to_world(end);
    sim.add_food_source(ResourceKind::Seed, food_pos, 50);
    sim.spawn_agent("worker", food_pos).unwrap();

    let mut delivered = 0;
    for _ in 0..3000 {
        let summary = sim.tick().unwrap();
        assert!(summary.deaths.is_empty(), "worker died: {:?}", summary.deaths);
        delivered += summary.delivered;
        if delivered > 0 {
            break;
        }
    }
    assert_eq!(delivered, 3);
    assert_eq!(sim.food().iter().next().unwrap().remaining, 47);
}

#[test]
fn field_stays_consistent_while_edited_under_traffic() {
    let mut config = SimulationConfig::default();
    config.hostiles.bite_damage = 1;
    let mut sim = Simulation::from_config(&config).unwrap();
    let center = sim.engine().colony_center();

    sim.draw_line(Some(center.offset(4, 0)), center.offset(30, 0), PheromoneKind::Explore)
        .unwrap();
    sim.draw_line(Some(center.offset(0, 4)), center.offset(0, 30), PheromoneKind::Gather)
        .unwrap();
    sim.draw_line(Some(center.offset(-4, 0)), center.offset(-30, 0), PheromoneKind::Attack)
        .unwrap();
    let home = sim.colony().center();
    for (type_id, count) in [("worker", 4), ("scout", 3), ("soldier", 3)] {
        for _ in 0..count {
            sim.spawn_agent(type_id, home).unwrap();
        }
    }
    sim.spawn_hostile(HostileKind::Beetle, home + Vec2::new(-200.0, 0.0));
    sim.spawn_hostile(HostileKind::Spider, home + Vec2::new(0.0, 250.0));

    for tick in 0..300 {
        if tick == 100 {
            let removed = sim.remove_pheromone(center.offset(14, 0), PheromoneKind::Explore);
            assert_eq!(removed, 17);
        }
        if tick == 150 {
            assert!(sim.remove_all_pheromones(center.offset(0, 10)) > 0);
        }
        sim.tick().unwrap();

        assert!(sim.engine().first_inconsistent_marker().is_none());
        let agents = u64::try_from(sim.agent_count()).unwrap();
        assert!(occupancy_total(&sim) <= agents);
    }
}

#[test]
fn same_seed_replays_the_same_walk() {
    let run = || {
        let mut sim = Simulation::from_config(&small_config()).unwrap();
        sim.spawn_agent("scout", Vec2::new(40.0, 40.0)).unwrap();
        for _ in 0..100 {
            sim.tick().unwrap();
        }
        sim.snapshot().agents[0].position
    };
    assert_eq!(run(), run());
}
