//! Session tests - the full turn loop: swap, cascade, deadlock shuffle, collection

use match3::core::{
    find_matches, has_possible_move, EngineConfig, Grid, Session, SessionError, SimpleRng,
    SwapOutcome,
};
use match3::types::Position;

fn play_hints(session: &mut Session, turns: u32) -> Vec<SwapOutcome> {
    (0..turns)
        .map(|_| {
            let swap = session.hint().expect("settled grid must have a move");
            session.try_swap(swap.a, swap.b).unwrap()
        })
        .collect()
}

#[test]
fn test_session_lifecycle() {
    let mut session = Session::new(EngineConfig::default(), SimpleRng::new(12345)).unwrap();
    let mut expected_collected = 0;

    for outcome in play_hints(&mut session, 30) {
        let SwapOutcome::Resolved(report) = outcome else {
            panic!("hint moves always match");
        };
        assert!(report.cleared >= 3);
        expected_collected += report.total_cleared();

        let grid = session.grid();
        assert!(find_matches(grid).is_empty());
        assert!(has_possible_move(grid));
        assert!(grid.is_compacted());
        assert_eq!(grid.empty_count(), 0);
    }

    assert_eq!(session.turns(), 30);
    assert_eq!(session.collected(), expected_collected);
}

#[test]
fn test_same_seed_replays_same_game() {
    let mut a = Session::new(EngineConfig::default(), SimpleRng::new(99)).unwrap();
    let mut b = Session::new(EngineConfig::default(), SimpleRng::new(99)).unwrap();
    assert_eq!(a.grid(), b.grid());

    assert_eq!(play_hints(&mut a, 15), play_hints(&mut b, 15));
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_rejected_swap_keeps_grid_and_rng() {
    let config = EngineConfig {
        rows: 3,
        cols: 3,
        palette_size: 4,
        ..EngineConfig::default()
    };
    let grid = Grid::parse(
        "AAB
         CDA
         BCD",
    )
    .unwrap();
    let mut session = Session::with_grid(config, grid.clone(), SimpleRng::new(5)).unwrap();
    let rng_before = session.rng().clone();

    let outcome = session
        .try_swap(Position::new(2, 0), Position::new(2, 1))
        .unwrap();
    assert!(matches!(outcome, SwapOutcome::Rejected { .. }));
    assert_eq!(session.grid(), &grid);
    assert_eq!(session.rng(), &rng_before);
    assert_eq!(session.collected(), 0);
}

#[test]
fn test_with_grid_drops_and_refills_holes() {
    let config = EngineConfig {
        rows: 3,
        cols: 3,
        palette_size: 4,
        ..EngineConfig::default()
    };
    // One hole already at the top of its column, one under a token
    let grid = Grid::parse(
        "A.C
         DB.
         CAB",
    )
    .unwrap();
    let session = Session::with_grid(config, grid, SimpleRng::new(5)).unwrap();

    let grid = session.grid();
    assert_eq!(grid.empty_count(), 0);
    assert!(grid.is_compacted());
    assert!(find_matches(grid).is_empty());
    assert!(has_possible_move(grid));
    assert_eq!(session.collected(), 0);
}

#[test]
fn test_with_grid_rejects_mismatched_dimensions() {
    let grid = Grid::parse("AB\nBA").unwrap();
    let err = Session::with_grid(EngineConfig::default(), grid, SimpleRng::new(1)).unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));
}

#[test]
fn test_with_grid_resolves_initial_matches_without_credit() {
    let config = EngineConfig {
        rows: 4,
        cols: 4,
        palette_size: 5,
        ..EngineConfig::default()
    };
    let grid = Grid::parse(
        "AAAB
         CDEB
         DECA
         EACD",
    )
    .unwrap();
    let session = Session::with_grid(config, grid, SimpleRng::new(8)).unwrap();

    assert!(find_matches(session.grid()).is_empty());
    assert!(has_possible_move(session.grid()));
    assert_eq!(session.collected(), 0);
}

#[test]
fn test_shuffle_budget_surfaces_as_session_error() {
    // No swap in this column lines up three of a kind, and no shuffle may run
    let config = EngineConfig {
        rows: 4,
        cols: 1,
        palette_size: 3,
        max_shuffles: Some(0),
        ..EngineConfig::default()
    };
    let grid = Grid::parse("A\nB\nC\nA").unwrap();
    let err = Session::with_grid(config, grid, SimpleRng::new(1)).unwrap_err();
    assert!(matches!(err, SessionError::Engine(_)));
}

#[test]
fn test_unplayable_line_is_refused_before_generation() {
    // An unbounded shuffle budget on a 1x3 board would never find a move
    for (rows, cols) in [(1, 3), (3, 1)] {
        let config = EngineConfig {
            rows,
            cols,
            palette_size: 3,
            ..EngineConfig::default()
        };
        let err = Session::new(config, SimpleRng::new(7)).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)), "{rows}x{cols}: {err}");
    }
}

#[test]
fn test_single_row_of_four_gets_a_playable_board() {
    let config = EngineConfig {
        rows: 1,
        cols: 4,
        palette_size: 3,
        ..EngineConfig::default()
    };
    let session = Session::new(config, SimpleRng::new(7)).unwrap();
    assert!(find_matches(session.grid()).is_empty());
    assert!(has_possible_move(session.grid()));
}
