#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use stigmergy::simulation::agent::{AgentState, StateTransition};
use stigmergy::simulation::error::SimulationError;
use stigmergy::simulation::geometric_utils::vec2;
use stigmergy::simulation::nest::{Nest, NestHandle, Rgba};
use stigmergy::simulation::params::Params;
use stigmergy::simulation::scent_field::MAX_GRID_CELLS;
use stigmergy::simulation::world::World;

fn create_test_params() -> Params {
    Params {
        box_width: 1000.0,
        box_height: 800.0,
        cell_size: 20.0,
        agents_per_nest: 1,
        detection_radius: 20.0,
        seed: Some(17),
        ..Params::default()
    }
}

fn two_nests() -> Vec<Nest> {
    vec![
        Nest::new(0, vec2(50.0, 50.0), Rgba::RED, 30.0),
        Nest::new(1, vec2(950.0, 50.0), Rgba::BLUE, 30.0),
    ]
}

#[test]
fn test_lone_colony_keeps_exploring() {
    let params = create_test_params();
    let nest = Nest::new(0, vec2(100.0, 100.0), Rgba::RED, 30.0);
    let mut world = World::with_nests(params, vec![nest]).expect("valid world");

    for _ in 0..1000 {
        world.tick(0.016);
    }

    let params = world.params().clone();
    let agent = &world.agents[0];
    assert_eq!(agent.state, AgentState::Exploring);
    assert!(agent.pos.iter().all(|v| v.is_finite()));
    assert!(agent.pos[0] >= 0.0 && agent.pos[0] <= params.box_width);
    assert!(agent.pos[1] >= 0.0 && agent.pos[1] <= params.box_height);
    assert!(world.event_log().events().is_empty());
    assert!(!world.field.is_empty());
    assert!((world.time - 16.0).abs() < 1.0e-2);
}

#[test]
fn test_foreign_scent_triggers_return() {
    let params = Params {
        agents_per_nest: 0,
        ..create_test_params()
    };
    let mut world = World::with_nests(params, two_nests()).expect("valid world");
    assert!(world.agents.is_empty());

    let index = world.spawn_agent(NestHandle(0)).expect("known nest");
    world.agents[index].pos = vec2(200.0, 60.0);
    world.field.insert(&vec2(205.0, 60.0), 1, 10.0);

    world.tick(0.016);

    let agent = &world.agents[index];
    assert_eq!(agent.state, AgentState::ReturningToNest);
    let home = world.home_of(agent).expect("home nest");
    let to_nest = &home.pos - &agent.pos;
    assert!(agent.velocity.dot(&to_nest) > 0.0);

    let events = world.event_log().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].agent, index);
    assert_eq!(events[0].owner_id, 0);
    assert_eq!(events[0].transition, StateTransition::FoundForeignScent);
    assert_eq!(world.count_in_state(AgentState::ReturningToNest), 1);
}

#[test]
fn test_spawn_agent_unknown_nest() {
    let mut world = World::with_nests(create_test_params(), two_nests()).expect("valid world");
    let before = world.agents.len();

    assert_eq!(world.spawn_agent(NestHandle(7)), None);
    assert_eq!(world.agents.len(), before);
    assert!(world.nest(NestHandle(7)).is_none());
}

#[test]
fn test_seeded_worlds_replay_identically() {
    let params = Params {
        agents_per_nest: 10,
        ..create_test_params()
    };
    let mut a = World::new(params.clone()).expect("valid world");
    let mut b = World::new(params).expect("valid world");

    for _ in 0..300 {
        a.tick(0.016);
        b.tick(0.016);
    }

    assert_eq!(a.nests().len(), b.nests().len());
    for (na, nb) in a.nests().iter().zip(b.nests()) {
        assert_eq!(na.pos, nb.pos);
    }
    for (x, y) in a.agents.iter().zip(&b.agents) {
        assert_eq!(x.pos, y.pos);
        assert_eq!(x.state, y.state);
    }
    assert_eq!(a.field.len(), b.field.len());
}

#[test]
fn test_default_placement_respects_margin() {
    let params = Params {
        n_nests: 5,
        agents_per_nest: 3,
        ..create_test_params()
    };
    let margin = params.nest_margin;
    let world = World::new(params.clone()).expect("valid world");

    assert_eq!(world.nests().len(), 5);
    assert_eq!(world.agents.len(), 15);
    for (i, nest) in world.nests().iter().enumerate() {
        assert_eq!(nest.id, i as u32);
        assert_eq!(nest.color, Rgba::PALETTE[i]);
        assert_eq!(nest.radius, params.nest_radius);
        assert!(nest.pos[0] >= margin && nest.pos[0] < params.box_width - margin);
        assert!(nest.pos[1] >= margin && nest.pos[1] < params.box_height - margin);
    }

    for agent in &world.agents {
        let home = world.home_of(agent).expect("home nest");
        assert_eq!(agent.pos, home.pos);
        assert_eq!(agent.owner_id, home.id);
        assert_eq!(agent.state, AgentState::Exploring);
    }
}

#[test]
fn test_palette_cycles() {
    let params = Params {
        n_nests: 7,
        agents_per_nest: 0,
        ..create_test_params()
    };
    let world = World::new(params).expect("valid world");
    assert_eq!(world.nests()[5].color, Rgba::PALETTE[0]);
    assert_eq!(world.nests()[6].color, Rgba::PALETTE[1]);
}

#[test]
fn test_invalid_params_rejected() {
    let params = Params {
        cell_size: 0.0,
        ..create_test_params()
    };
    assert!(matches!(
        World::new(params),
        Err(SimulationError::InvalidParams { field: "cell_size", .. })
    ));

    let params = Params {
        n_nests: 0,
        ..create_test_params()
    };
    assert!(matches!(
        World::new(params),
        Err(SimulationError::InvalidParams { field: "n_nests", .. })
    ));

    let params = Params {
        nest_margin: 500.0,
        ..create_test_params()
    };
    assert!(matches!(
        World::new(params),
        Err(SimulationError::InvalidParams { field: "nest_margin", .. })
    ));

    let params = Params {
        pheromone_decay_rate: -1.0,
        ..create_test_params()
    };
    assert!(World::with_nests(params, two_nests()).is_err());

    let duplicated = vec![
        Nest::new(3, vec2(100.0, 100.0), Rgba::RED, 30.0),
        Nest::new(3, vec2(500.0, 100.0), Rgba::BLUE, 30.0),
    ];
    assert!(matches!(
        World::with_nests(create_test_params(), duplicated),
        Err(SimulationError::InvalidParams { field: "nests", .. })
    ));
}

#[test]
fn test_zero_dt_changes_nothing() {
    let mut world = World::with_nests(create_test_params(), two_nests()).expect("valid world");
    world.tick(0.016);
    world.tick(0.016);

    let positions: Vec<_> = world.agents.iter().map(|a| a.pos.clone()).collect();
    let before: Vec<_> = world
        .samples()
        .map(|s| (s.pos.clone(), s.strength))
        .collect();

    world.tick(0.0);

    for (agent, pos) in world.agents.iter().zip(&positions) {
        assert_eq!(&agent.pos, pos);
    }
    // zero-length steps still deposit, so only compare the older samples
    for (pos, strength) in &before {
        let sample = world
            .samples()
            .find(|s| &s.pos == pos)
            .expect("sample survives");
        assert_eq!(sample.strength, *strength);
    }
    assert_eq!(world.field.len(), before.len() + world.agents.len());
}

#[test]
fn test_event_log_is_bounded() {
    let params = Params {
        agents_per_nest: 0,
        event_log_size: 3,
        ..create_test_params()
    };
    let mut world = World::with_nests(params, two_nests()).expect("valid world");

    for i in 0..5 {
        let index = world.spawn_agent(NestHandle(0)).expect("known nest");
        world.agents[index].pos = vec2(200.0 + i as f32 * 100.0, 300.0);
        world
            .field
            .insert(&vec2(205.0 + i as f32 * 100.0, 300.0), 1, 10.0);
    }
    world.tick(0.016);

    let events = world.event_log().events();
    assert_eq!(events.len(), 3);
    // newest first
    assert_eq!(events[0].agent, 4);
    assert_eq!(events[2].agent, 2);

    let recent: Vec<usize> = world.event_log().recent(2).map(|e| e.agent).collect();
    assert_eq!(recent, vec![4, 3]);
    assert!(events[0].description().contains("agent 4"));
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("stigmergy-{}-{name}", std::process::id()))
}

#[test]
fn test_load_params_from_file() {
    let path = temp_path("partial.json");
    std::fs::write(&path, r#"{ "box_width": 640.0, "n_nests": 3, "seed": 9 }"#)
        .expect("write temp file");

    let loaded = Params::load_from_file(&path);
    std::fs::remove_file(&path).ok();

    let params = loaded.expect("valid file");
    assert_eq!(params.box_width, 640.0);
    assert_eq!(params.n_nests, 3);
    assert_eq!(params.seed, Some(9));
    assert_eq!(params.box_height, Params::default().box_height);
}

#[test]
fn test_load_params_errors() {
    let path = temp_path("malformed.json");
    std::fs::write(&path, "{ box_width: ").expect("write temp file");
    let malformed = Params::load_from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(malformed, Err(SimulationError::Config(_))));

    let path = temp_path("invalid.json");
    std::fs::write(&path, r#"{ "cell_size": -2.0 }"#).expect("write temp file");
    let invalid = Params::load_from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(
        invalid,
        Err(SimulationError::InvalidParams { field: "cell_size", .. })
    ));

    let missing = Params::load_from_file(temp_path("does-not-exist.json"));
    assert!(matches!(missing, Err(SimulationError::Io(_))));
}

#[test]
fn test_oversized_grid_is_rejected() {
    let params = Params {
        box_width: 1.0e12,
        box_height: 1.0e12,
        cell_size: 1.0,
        ..create_test_params()
    };
    assert!(matches!(
        params.validate(),
        Err(SimulationError::InvalidParams { field: "cell_size", .. })
    ));

    let nest = Nest::new(0, vec2(100.0, 100.0), Rgba::RED, 30.0);
    assert!(matches!(
        World::with_nests(params, vec![nest]),
        Err(SimulationError::InvalidParams { field: "cell_size", .. })
    ));

    let path = temp_path("huge-grid.json");
    std::fs::write(&path, r#"{ "box_width": 1e9, "box_height": 1e9, "cell_size": 0.5 }"#)
        .expect("write temp file");
    let loaded = Params::load_from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(
        loaded,
        Err(SimulationError::InvalidParams { field: "cell_size", .. })
    ));
}

#[test]
fn test_grid_cell_cap_is_inclusive() {
    let side = (MAX_GRID_CELLS as f32).sqrt();
    let at_cap = Params {
        box_width: side,
        box_height: side,
        cell_size: 1.0,
        ..create_test_params()
    };
    assert!(at_cap.validate().is_ok());

    let over_cap = Params {
        box_width: side + 1.0,
        ..at_cap
    };
    assert!(matches!(
        over_cap.validate(),
        Err(SimulationError::InvalidParams { field: "cell_size", .. })
    ));
}

#[test]
fn test_agent_larger_than_arena_is_rejected() {
    let params = Params {
        box_width: 100.0,
        box_height: 100.0,
        nest_margin: 10.0,
        agent_size: 300.0,
        ..create_test_params()
    };
    assert!(matches!(
        World::new(params),
        Err(SimulationError::InvalidParams { field: "agent_size", .. })
    ));

    let params = Params {
        box_width: 400.0,
        box_height: 100.0,
        nest_margin: 10.0,
        agent_size: 100.0,
        ..create_test_params()
    };
    assert!(matches!(
        params.validate(),
        Err(SimulationError::InvalidParams { field: "agent_size", .. })
    ));
}

#[test]
fn test_large_agents_stay_inside_small_arena() {
    let params = Params {
        box_width: 100.0,
        box_height: 100.0,
        nest_margin: 10.0,
        nest_radius: 5.0,
        agent_size: 90.0,
        agents_per_nest: 4,
        ..create_test_params()
    };
    let half = params.agent_size / 2.0;
    let mut world = World::new(params).expect("valid world");

    for _ in 0..200 {
        world.tick(0.1);
        for agent in &world.agents {
            assert!(agent.pos[0] >= half && agent.pos[0] <= 100.0 - half);
            assert!(agent.pos[1] >= half && agent.pos[1] <= 100.0 - half);
        }
    }
}
