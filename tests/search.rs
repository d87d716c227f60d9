use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;
use xqzero::encoder::{board_to_tensor, move_to_index, notation_to_move};
use xqzero::movegen::all_moves;
use xqzero::{
    Board, EngineError, Evaluation, Evaluator, EvaluatorError, MctsConfig, Piece, PieceKind, Position, Searcher,
    Side, Square, UniformEvaluator, ACTION_SPACE,
};

fn searcher(sims: u32) -> Searcher<UniformEvaluator> {
    Searcher::new(UniformEvaluator::new(), MctsConfig::default().with_simulations(sims)).unwrap()
}

/// Red chariot on a10 can take the Black king on d10.
fn capture_position() -> Position {
    let mut b = Board::empty();
    b.put(Square::new(9, 4), Piece::new(PieceKind::King, Side::Red));
    b.put(Square::new(0, 0), Piece::new(PieceKind::Chariot, Side::Red));
    b.put(Square::new(0, 3), Piece::new(PieceKind::King, Side::Black));
    board_to_tensor(&b, Side::Red)
}

#[test]
fn policy_covers_only_root_moves() {
    let pos = Position::startpos();
    let mut rng = SmallRng::seed_from_u64(1);
    let res = searcher(50).search(&pos, &mut rng).unwrap();

    assert_eq!(res.policy.len(), ACTION_SPACE);
    let sum: f32 = res.policy.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4, "policy sums to {sum}");

    let legal: HashSet<usize> = all_moves(&pos.board(), Side::Red).into_iter().map(move_to_index).collect();
    for (i, &p) in res.policy.iter().enumerate() {
        if p > 0.0 {
            assert!(legal.contains(&i), "mass on non-root action {i}");
        }
    }
    assert_eq!(res.simulations, 50);
}

#[test]
fn greedy_selection_is_deterministic() {
    let pos = Position::startpos();
    let s = searcher(40);
    let a = s.select_move(&pos, 0.0, &mut SmallRng::seed_from_u64(1)).unwrap();
    let b = s.select_move(&pos, 0.0, &mut SmallRng::seed_from_u64(2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sampling_is_seeded() {
    let pos = Position::startpos();
    let s = searcher(40);
    let a = s.select_move(&pos, 1.0, &mut SmallRng::seed_from_u64(5)).unwrap();
    let b = s.select_move(&pos, 1.0, &mut SmallRng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);

    let picks: HashSet<_> = (0..16u64)
        .map(|seed| s.select_move(&pos, 1.0, &mut SmallRng::seed_from_u64(seed)).unwrap())
        .collect();
    assert!(picks.len() > 1, "every seed chose the same move");
}

#[test]
fn negative_temperature_rejected() {
    let mut rng = SmallRng::seed_from_u64(0);
    let err = searcher(4).select_move(&Position::startpos(), -1.0, &mut rng);
    assert!(matches!(err, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn finds_king_capture() {
    let mut rng = SmallRng::seed_from_u64(3);
    let s = searcher(200);
    let pos = capture_position();
    let mv = s.select_move(&pos, 0.0, &mut rng).unwrap();
    assert_eq!(mv, notation_to_move("a10-d10").unwrap());

    let res = s.search(&pos, &mut rng).unwrap();
    assert!(res.root_value > 0.0, "root value {}", res.root_value);
}

#[test]
fn no_legal_moves() {
    let mut rng = SmallRng::seed_from_u64(0);
    let pos = board_to_tensor(&Board::empty(), Side::Black);
    assert!(matches!(searcher(10).search(&pos, &mut rng), Err(EngineError::NoLegalMoves)));
}

struct ShortPolicy;

impl Evaluator for ShortPolicy {
    fn evaluate(&self, _: &Position) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation { policy: vec![1.0; 100], value: 0.0 })
    }
}

#[test]
fn evaluator_contract_is_checked() {
    let s = Searcher::new(ShortPolicy, MctsConfig::default()).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    let err = s.search(&Position::startpos(), &mut rng);
    assert!(matches!(
        err,
        Err(EngineError::Evaluator(EvaluatorError::PolicyShape { expected: ACTION_SPACE, actual: 100 }))
    ));
}

/// All policy mass on a single action.
struct Peaked(usize);

impl Evaluator for Peaked {
    fn evaluate(&self, _: &Position) -> Result<Evaluation, EvaluatorError> {
        let mut policy = vec![0.0; ACTION_SPACE];
        policy[self.0] = 1.0;
        Ok(Evaluation { policy, value: 0.0 })
    }
}

#[test]
fn zero_mass_on_legal_moves_is_degenerate() {
    // the chariot cannot pass its own pawn on a4
    let illegal = move_to_index(notation_to_move("a1-a5").unwrap());
    let s = Searcher::new(Peaked(illegal), MctsConfig::default()).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    assert!(matches!(s.search(&Position::startpos(), &mut rng), Err(EngineError::DegeneratePriors)));
}

#[test]
fn statistics_table_lists_root_moves() {
    let s = searcher(30);
    let mut rng = SmallRng::seed_from_u64(9);
    let (_, tree) = s.search_with_tree(&Position::startpos(), &mut rng).unwrap();
    let table = s.statistics_string(&tree, 5);
    assert_eq!(table.lines().count(), 6);
    assert!(table.starts_with("|   move   |"));
}
