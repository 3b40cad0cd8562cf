use blokus::rules::is_legal_placement;
use blokus::{
    apply_move, bot_select_move, check_game_over, has_legal_move, legal_moves, Board, Coord,
    Difficulty, GameOverReason, Hand, Hands, PieceId, PlacedMove, Player,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn hand_of(count: usize) -> Hand {
    PieceId::all().take(count).collect()
}

fn full_board() -> Board {
    let row = "BYRG".repeat(5);
    std::iter::repeat(row)
        .take(20)
        .collect::<Vec<_>>()
        .join("\n")
        .parse()
        .expect("valid board")
}

#[test]
fn test_opening_monomino() {
    let board = Board::new();
    let hands = Hands::full();
    let mv = PlacedMove::new(PieceId::new(1).unwrap(), 0, Coord::new(0, 0)).unwrap();
    assert!(is_legal_placement(&board, &mv.shape, mv.origin, Player::Blue));

    let (board, hands) = apply_move(&board, &hands, &mv, Player::Blue);
    assert_eq!(board.get(Coord::new(0, 0)), Some(Player::Blue));
    assert_eq!(hands.get(Player::Blue).len(), 20);
    assert_eq!(hands.get(Player::Yellow).len(), 21);
    assert_eq!(Player::Blue.next(), Player::Yellow);
}

#[test]
fn test_apply_move_leaves_inputs_alone() {
    let board = Board::new();
    let hands = Hands::full();
    let mv = PlacedMove::new(PieceId::new(10).unwrap(), 1, Coord::new(19, 15)).unwrap();
    let (after, after_hands) = apply_move(&board, &hands, &mv, Player::Red);

    assert_eq!(board, Board::new());
    assert_eq!(hands.get(Player::Red).len(), 21);
    assert_eq!(after.occupied_count(Player::Red), 5);
    assert_eq!(after_hands.get(Player::Red).len(), 20);
}

#[test]
fn test_opening_moves_cover_start_corner() {
    let board = Board::new();
    let hands = Hands::full();
    for player in Player::ALL {
        let moves = legal_moves(&board, &hands, player);
        assert!(!moves.is_empty());
        let corner = player.start_corner();
        assert!(moves.iter().all(|mv| mv.cells().any(|c| c == corner)));
    }
}

#[test]
fn test_second_move_must_touch_corner_only() {
    let board = Board::new();
    let hands = Hands::full();
    let first = PlacedMove::new(PieceId::new(8).unwrap(), 0, Coord::new(0, 0)).unwrap();
    let (board, hands) = apply_move(&board, &hands, &first, Player::Blue);

    let moves = legal_moves(&board, &hands, Player::Blue);
    assert!(!moves.is_empty());
    for mv in &moves {
        assert!(mv.cells().all(|c| board.is_empty_at(c)));
        assert!(mv.cells().any(|c| c == Coord::new(2, 2)));
    }
    assert!(moves.iter().all(|mv| mv.piece != first.piece));
}

#[test]
fn test_empty_hand_has_no_legal_move() {
    let hands = Hands::from_hands([Hand::empty(), Hand::full(), Hand::full(), Hand::full()]);
    assert!(!has_legal_move(&Board::new(), &hands, Player::Blue));
    assert!(has_legal_move(&Board::new(), &hands, Player::Yellow));
}

#[test]
fn test_empty_hand_wins() {
    let hands = Hands::from_hands([Hand::full(), Hand::empty(), hand_of(1), Hand::full()]);
    let result = check_game_over(&hands, &Board::new()).expect("game over");
    assert_eq!(result.winner, Player::Yellow);
    assert_eq!(result.reason, GameOverReason::HandEmptied);
}

#[test]
fn test_all_stuck_fewest_pieces_wins() {
    let board = full_board();
    let hands = Hands::from_hands([hand_of(21), hand_of(5), hand_of(3), hand_of(3)]);
    let result = check_game_over(&hands, &board).expect("nobody can move");
    assert_eq!(result.winner, Player::Red);
    assert_eq!(result.reason, GameOverReason::AllPlayersStuck);
}

#[test]
fn test_game_continues_while_someone_can_move() {
    assert_eq!(check_game_over(&Hands::full(), &Board::new()), None);
}

#[test]
fn test_bots_pick_legal_moves() {
    let board = Board::new();
    let hands = Hands::full();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    for difficulty in Difficulty::ALL {
        let mv = bot_select_move(&board, &hands, Player::Green, difficulty, &mut rng)
            .expect("opening move exists");
        assert!(is_legal_placement(&board, &mv.shape, mv.origin, Player::Green));
    }
    assert!(bot_select_move(&full_board(), &hands, Player::Green, Difficulty::Hard, &mut rng).is_none());
}

#[test]
fn test_medium_bot_opens_with_five_squares() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let mv = bot_select_move(&Board::new(), &Hands::full(), Player::Blue, Difficulty::Medium, &mut rng)
        .unwrap();
    assert_eq!(mv.size(), 5);
}
