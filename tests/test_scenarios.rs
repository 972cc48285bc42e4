//! End-to-end games against small hand-built boards.

use sweep_ai::game::play;
use sweep_ai::{Board, Engine, EngineConfig, Flag, ProbeResult, Report, Score, Status, Strategy};

fn probe_and_update(board: &mut Board, engine: &mut Engine, x: usize, y: usize) -> Status {
    let result = board.probe(x, y).unwrap();
    engine.update(x, y, result).unwrap()
}

#[test]
fn single_mine_in_corner_is_deduced() {
    for seed in 0..25 {
        let mut board = Board::from_mines(3, 3, &[(2, 2)], (0, 0)).unwrap();
        let mut engine = Engine::new(board.engine_config().with_seed(seed)).unwrap();
        let summary = play(&mut board, &mut engine, 9).unwrap();

        assert_eq!(summary.report, Report::BombLocations(vec![(2, 2)]), "seed {seed}");
        assert_eq!(summary.score, Score { correct: 1, total: 1, guessed: 1, won: true });
        assert_eq!(engine.cell(2, 2).map(|c| c.flag), Some(Flag::CertainBomb));
        assert_eq!(engine.bombs_hit(), 0);
    }
}

#[test]
fn first_probe_clears_the_corner() {
    let mut board = Board::from_mines(3, 3, &[(2, 2)], (0, 0)).unwrap();
    let mut engine = Engine::new(board.engine_config().with_seed(0)).unwrap();

    let status = probe_and_update(&mut board, &mut engine, 0, 0);
    for (x, y) in [(1, 0), (0, 1), (1, 1)] {
        assert_eq!(engine.cell(x, y).map(|c| c.flag), Some(Flag::Safe));
    }
    // (1,1) sees five unknown cells, more than either edge cell
    assert_eq!(status, Status::Next { x: 1, y: 1 });

    // (1,1) reports 1: every unknown cell around it now carries that risk
    probe_and_update(&mut board, &mut engine, 1, 1);
    for (x, y) in [(2, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
        let cell = engine.cell(x, y).unwrap();
        assert_eq!((cell.value, cell.flag), (1, Flag::Unknown));
    }
}

#[test]
fn no_mines_reports_a_clean_result() {
    let mut board = Board::from_mines(4, 4, &[], (2, 2)).unwrap();
    let mut engine = Engine::new(board.engine_config()).unwrap();

    let report = engine.finalize();
    assert_eq!(report, Report::BombLocations(vec![]));
    assert_eq!(board.verify(&report), Score { correct: 0, total: 0, guessed: 0, won: true });
}

#[test]
fn uniform_ranking_probes_riskiest_cell_first() {
    let mut board = Board::from_mines(6, 6, &[(4, 4)], (0, 0)).unwrap();
    let config = board
        .engine_config()
        .with_strategy(Strategy::UniformRiskRanking)
        .with_seed(17);
    let mut engine = Engine::new(config).unwrap();

    let (mut x, mut y) = engine.next_move().unwrap();
    loop {
        match probe_and_update(&mut board, &mut engine, x, y) {
            Status::Finished(report) => {
                assert_eq!(report, Report::HitTally { hits: 1 });
                break;
            }
            Status::Next { x: nx, y: ny } => {
                let grid = engine.grid();
                let top = grid
                    .cells
                    .iter()
                    .filter(|c| c.flag == Flag::Unknown)
                    .map(|c| c.value)
                    .max()
                    .unwrap();
                let chosen = engine.cell(nx, ny).unwrap();
                assert_eq!(chosen.flag, Flag::Unknown);
                assert_eq!(chosen.value, top, "picked ({nx}|{ny}) below the top risk {top}");
                (x, y) = (nx, ny);
            }
        }
    }
    assert!(!engine.is_active());
}

#[test]
fn uniform_ranking_opens_untouched_regions_on_the_scan_grid() {
    // Large empty board: after the corner opens, no unknown cell carries risk
    let mut board = Board::from_mines(9, 9, &[(8, 8)], (0, 0)).unwrap();
    let config = board
        .engine_config()
        .with_strategy(Strategy::UniformRiskRanking)
        .with_seed(1);
    let mut engine = Engine::new(config).unwrap();

    let status = probe_and_update(&mut board, &mut engine, 0, 0);
    // (1,1) is safe, (4,1) is the first scan cell with all nine kernel cells unknown
    assert_eq!(status, Status::Next { x: 4, y: 1 });
}

#[test]
fn end_game_on_bomb_stops_at_first_hit() {
    let mut board = Board::from_mines(4, 1, &[(3, 0)], (0, 0)).unwrap();
    board.end_game_on_bomb = true;
    let mut engine = Engine::new(board.engine_config().with_seed(5)).unwrap();
    let summary = play(&mut board, &mut engine, 10).unwrap();

    assert_eq!(summary.moves, 4);
    assert_eq!(summary.report, Report::BombLocations(vec![]));
    assert!(!summary.score.won);
    assert_eq!(engine.grid().count_flag(Flag::Hit), 0);
}

#[test]
fn fixture_board_plays_to_completion() {
    let json = r#"{"dim": "4,5", "safe": "0,0", "bombs": 2, "board": "00019000111110019100"}"#;
    let mut board = Board::from_json(json).unwrap();
    assert_eq!(board.num_bombs(), 2);

    for strategy in [Strategy::RiskFirstWithSafetyBias, Strategy::UniformRiskRanking] {
        for seed in 0..5 {
            let mut board = Board::from_json(json).unwrap();
            let config = board.engine_config().with_strategy(strategy).with_seed(seed);
            let mut engine = Engine::new(config).unwrap();
            let summary = play(&mut board, &mut engine, 20).unwrap();

            assert!(summary.moves <= 20);
            assert!(!engine.is_active());
            assert!(engine.identified() <= 2);
        }
    }
    assert_eq!(board.probe(0, 0).unwrap(), ProbeResult::Count(0));
}

#[test]
fn engine_rejects_probes_after_finishing() {
    let mut engine = Engine::new(EngineConfig::new(3, 3, (0, 0), 0)).unwrap();
    assert!(matches!(
        engine.update(0, 0, ProbeResult::Count(0)),
        Ok(Status::Finished(_))
    ));
    assert!(engine.update(1, 1, ProbeResult::Count(0)).is_err());
}
