//! End-to-end play through real physics.

use flick_core::{
    AssetRegistry, Game, GameConfig, GamePhase, Level, LevelCatalog, LevelDescription,
    LevelEvent, Point, RecordingSurface,
};

const FRAME: f32 = 1.0 / 60.0;

fn corridor(coins: Vec<Point>, goal_x: f32) -> LevelDescription {
    LevelDescription {
        name: Some("corridor".to_string()),
        world_size: Default::default(),
        hero_position: Point::new(100.0, 240.0),
        goal_position: Point::new(goal_x, 240.0),
        coins,
        walls: Vec::new(),
        spikes: Vec::new(),
        attractors: Vec::new(),
        stars: vec![1, 2, 3],
        gravity: Point::new(0.0, 0.0),
    }
}

fn new_game(description: LevelDescription) -> Game {
    Game::new(
        description,
        GameConfig::default(),
        AssetRegistry::with_defaults(),
    )
    .unwrap()
}

/// Runs frames until the game leaves `Playing` or `seconds` pass.
fn play_for(game: &mut Game, seconds: f32) -> Vec<LevelEvent> {
    let mut events = Vec::new();
    let mut elapsed = 0.0;
    while elapsed < seconds && game.phase() == GamePhase::Playing {
        events.extend(game.update(FRAME));
        elapsed += FRAME;
    }
    events
}

#[test]
fn test_hero_resting_on_coin_collects_it() {
    let description = corridor(vec![Point::new(100.0, 240.0)], 400.0);
    let mut level = Level::build(&description, &GameConfig::default(), 1).unwrap();
    assert!(!level.goal_inserted());

    let events = level.step();
    assert!(matches!(
        events.as_slice(),
        [LevelEvent::CoinCollected { collected: 1, total: 1, .. }]
    ));
    assert!(level.goal_inserted());

    // Still overlapping the removed coin: nothing more happens
    for _ in 0..10 {
        assert!(level.step().is_empty());
    }
    assert_eq!(level.coins_collected(), 1);
}

#[test]
fn test_collect_then_reach_goal() {
    let mut game = new_game(corridor(vec![Point::new(160.0, 240.0)], 260.0));
    game.start();
    assert!(game.shoot([50.0, 240.0]));

    let events = play_for(&mut game, 10.0);
    assert_eq!(game.phase(), GamePhase::Won);
    assert_eq!(game.coins_collected(), 1);
    assert!(matches!(events.first(), Some(LevelEvent::CoinCollected { .. })));
    assert_eq!(events.last(), Some(&LevelEvent::Won));
    assert_eq!(game.stars(), 3);

    // Further updates do nothing once won
    let frame = game.level().world().current_frame();
    game.update(1.0);
    assert_eq!(game.level().world().current_frame(), frame);
}

#[test]
fn test_goal_closed_until_coins_collected() {
    // The coin sits behind the hero, the goal in front
    let mut game = new_game(corridor(vec![Point::new(40.0, 400.0)], 180.0));
    game.start();
    game.shoot([50.0, 240.0]);

    play_for(&mut game, 3.0);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(!game.level().goal_inserted());
    assert!(game.level().hero_position()[0] > 180.0);
}

#[test]
fn test_spike_loses_level() {
    let mut description = corridor(Vec::new(), 600.0);
    description.spikes.push(flick_core::level_data::SpikeDescription {
        x1: 200.0,
        y1: 200.0,
        x2: 200.0,
        y2: 280.0,
        flip: false,
    });
    let mut game = new_game(description);
    game.start();
    game.shoot([50.0, 240.0]);

    let events = play_for(&mut game, 10.0);
    assert_eq!(game.phase(), GamePhase::Lost);
    assert_eq!(events, [LevelEvent::Lost]);
    assert_eq!(game.stars(), 3);
}

#[test]
fn test_replay_after_win() {
    let mut game = new_game(corridor(Vec::new(), 180.0));
    game.start();
    for _ in 0..6 {
        game.shoot([50.0, 240.0]);
    }
    game.shoot([50.0, 240.0]);
    play_for(&mut game, 10.0);
    assert_eq!(game.phase(), GamePhase::Won);
    assert_eq!(game.shots(), 7);
    assert_eq!(game.stars(), 0);

    let old_ids = game.level().entity_ids().to_vec();
    game.replay().unwrap();
    assert_eq!(game.phase(), GamePhase::BeforeStart);
    assert_eq!(game.shots(), 0);
    assert_eq!(game.coins_collected(), 0);
    assert_eq!(game.level().hero_position(), [100.0, 240.0]);
    assert!(game.level().entity_ids().iter().all(|id| !old_ids.contains(id)));
    assert_eq!(game.level().world().current_frame(), 0);
}

#[test]
fn test_same_shots_same_result() {
    let catalog = LevelCatalog::builtin().unwrap();
    let description = catalog.get(2).unwrap().clone();

    let run = || {
        let mut game = new_game(description.clone());
        game.start();
        game.shoot([40.0, 40.0]);
        play_for(&mut game, 2.0);
        game.shoot([0.0, 60.0]);
        play_for(&mut game, 2.0);
        (game.level().world().compute_hash(), game.level().hero_position())
    };

    assert_eq!(run(), run());
}

#[test]
fn test_builtin_levels_build_and_draw() {
    let catalog = LevelCatalog::builtin().unwrap();
    for description in catalog.iter() {
        let mut game = new_game(description.clone());
        game.start();
        play_for(&mut game, 0.5);

        let mut surface = RecordingSurface::new();
        game.frame_drawn(&mut surface).unwrap();
        assert!(!surface.commands.is_empty(), "{}", description.display_name());
    }
}
