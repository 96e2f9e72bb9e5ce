use std::collections::HashSet;

use ratmaze_core::{Board, Category, Command, Event, GridCoord, Population};
use ratmaze_system_spawning::{Config, Quotas, Spawning};
use ratmaze_world::{self as world, query, World};

fn maintain(world: &mut World, spawning: &mut Spawning) -> Vec<Event> {
    let mut commands = Vec::new();
    spawning.handle(
        query::population(world),
        &query::board_view(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn fills_empty_board_to_quota() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(Quotas::default(), 0x5eed));

    let events = maintain(&mut world, &mut spawning);

    assert_eq!(
        query::population(&world),
        Population {
            protagonists: 1,
            walls: 25,
            goals: 1,
            adversaries: 3,
        }
    );
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::PieceSpawned { .. })));

    let origins: HashSet<GridCoord> = Category::ALL
        .iter()
        .flat_map(|category| query::pieces(&world, *category))
        .map(|piece| piece.origin)
        .collect();
    assert_eq!(origins.len(), 30, "every piece owns its slot");

    let board = query::board(&world);
    for origin in origins {
        assert!(board.fits(origin));
        assert!(board.is_aligned(origin));
    }
}

#[test]
fn spawns_in_category_order() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(Quotas::default(), 11));

    let events = maintain(&mut world, &mut spawning);
    let categories: Vec<Category> = events
        .iter()
        .filter_map(|event| match event {
            Event::PieceSpawned { category, .. } => Some(*category),
            _ => None,
        })
        .collect();

    let mut expected = vec![Category::Protagonist];
    expected.extend(std::iter::repeat(Category::Wall).take(25));
    expected.push(Category::Goal);
    expected.extend(std::iter::repeat(Category::Adversary).take(3));
    assert_eq!(categories, expected);
}

#[test]
fn full_population_emits_nothing() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(Quotas::default(), 3));
    let _ = maintain(&mut world, &mut spawning);

    let mut commands = Vec::new();
    spawning.handle(
        query::population(&world),
        &query::board_view(&world),
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn only_missing_pieces_are_replaced() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnPiece {
            category: Category::Adversary,
            origin: GridCoord::new(0, 0),
        },
        &mut events,
    );

    let mut spawning = Spawning::new(Config::new(Quotas::default(), 99));
    let mut commands = Vec::new();
    spawning.handle(
        query::population(&world),
        &query::board_view(&world),
        &mut commands,
    );

    let adversaries = commands
        .iter()
        .filter(|command| {
            matches!(
                command,
                Command::SpawnPiece {
                    category: Category::Adversary,
                    ..
                }
            )
        })
        .count();
    assert_eq!(adversaries, 2);
    assert_eq!(commands.len(), 29);
    assert!(commands.iter().all(|command| !matches!(
        command,
        Command::SpawnPiece {
            origin,
            ..
        } if *origin == GridCoord::new(0, 0)
    )));
}

#[test]
fn same_seed_places_pieces_identically() {
    let layout = |seed: u64| {
        let mut world = World::new();
        let mut spawning = Spawning::new(Config::new(Quotas::default(), seed));
        maintain(&mut world, &mut spawning)
    };

    assert_eq!(layout(42), layout(42));
    assert_ne!(layout(42), layout(43));
}

#[test]
fn crowded_board_still_finds_the_last_slot() {
    // Two by two slots, three of them pre-filled.
    let mut world = World::with_board(Board::new(10, 10, 5));
    let mut events = Vec::new();
    for origin in [(0, 0), (5, 0), (0, 5)] {
        world::apply(
            &mut world,
            Command::SpawnPiece {
                category: Category::Wall,
                origin: GridCoord::new(origin.0, origin.1),
            },
            &mut events,
        );
    }

    let mut spawning = Spawning::new(Config::new(Quotas::new(1, 0, 0, 0), 5));
    let _ = maintain(&mut world, &mut spawning);

    let protagonists = query::pieces(&world, Category::Protagonist);
    assert_eq!(protagonists.len(), 1);
    assert_eq!(protagonists[0].origin, GridCoord::new(5, 5));
}
