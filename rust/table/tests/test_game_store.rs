use felt_ai::StrategyKind;
use felt_engine::errors::{GameError, IllegalAction};
use felt_engine::game::{GameSnapshot, HandPhase};
use felt_engine::player::PlayerAction;
use felt_table::{
    GameId, GameOptions, GameStore, HUMAN_SEAT, SeatPolicy, StoreError, TableSettings,
    init_test_logging,
};
use tracing::Level;

const OPPONENTS: [StrategyKind; 3] = [
    StrategyKind::Conservative,
    StrategyKind::RiskTaker,
    StrategyKind::Mathematical,
];

fn store(seed: u64) -> GameStore {
    GameStore::new(TableSettings {
        rollouts: 20,
        seed: Some(seed),
        ..TableSettings::default()
    })
}

/// Check when possible, otherwise call.
fn passive_action(snapshot: &GameSnapshot) -> PlayerAction {
    let legal = snapshot
        .legal_actions
        .as_ref()
        .expect("legal actions for the seat to act");
    if legal.can_check {
        PlayerAction::Check
    } else {
        PlayerAction::Call
    }
}

/// Play `hands` hands passively from the human seat, collecting every
/// snapshot returned along the way.
fn play_passively(store: &GameStore, id: &GameId, first: GameSnapshot, hands: usize) -> Vec<GameSnapshot> {
    let mut snapshots = vec![first];
    let mut played = 0;
    while played < hands {
        let current = snapshots.last().cloned().expect("at least one snapshot");
        let next = if current.phase == HandPhase::Complete {
            played += 1;
            if played == hands {
                break;
            }
            match store.advance_to_next_hand(id) {
                Ok(s) => s,
                Err(StoreError::Game(GameError::NotEnoughPlayers { .. })) => break,
                Err(e) => panic!("advance failed: {e}"),
            }
        } else {
            assert_eq!(current.to_act, Some(HUMAN_SEAT));
            store
                .submit_action(id, HUMAN_SEAT, passive_action(&current))
                .expect("passive action is legal")
        };
        snapshots.push(next);
    }
    snapshots
}

#[test]
fn create_game_returns_the_human_view() {
    let store = store(3);
    let (id, snapshot) = store.create_game(4, &OPPONENTS).unwrap();
    assert_eq!(snapshot.players.len(), 4);
    assert_eq!(snapshot.hand_number, 1);
    assert!(snapshot.players[HUMAN_SEAT].hole_cards.is_some());
    assert!(snapshot.players[1..].iter().all(|p| p.hole_cards.is_none()));
    assert_eq!(store.active_games(), vec![id]);
}

#[test]
fn every_call_returns_with_the_human_to_act_or_the_hand_over() {
    let store = store(21);
    let (id, first) = store.create_game(4, &OPPONENTS).unwrap();
    let snapshots = play_passively(&store, &id, first, 10);
    for snap in &snapshots {
        assert!(
            snap.phase == HandPhase::Complete || snap.to_act == Some(HUMAN_SEAT),
            "{snap:?}"
        );
        let chips: u32 = snap.players.iter().map(|p| p.stack).sum::<u32>() + snap.pot;
        assert_eq!(chips, 4 * 1000);
    }
    let history = store.hand_history(&id).unwrap();
    assert!(!history.is_empty());
    for (i, record) in history.iter().enumerate() {
        assert_eq!(record.hand_number, i as u64 + 1);
    }
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed| {
        let store = store(seed);
        let (id, first) = store.create_game(4, &OPPONENTS).unwrap();
        let snapshots = play_passively(&store, &id, first, 6);
        let json: Vec<String> = snapshots
            .iter()
            .map(|s| serde_json::to_string(s).unwrap())
            .collect();
        (json, store.hand_history(&id).unwrap())
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn rejected_action_leaves_the_game_unchanged() {
    let logs = init_test_logging();
    let store = store(4);
    let (id, before) = store.create_game(3, &OPPONENTS[..2]).unwrap();
    assert_eq!(before.to_act, Some(HUMAN_SEAT));

    let err = store
        .submit_action(&id, HUMAN_SEAT, PlayerAction::RaiseTo(15))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Game(GameError::IllegalAction(IllegalAction::RaiseBelowMinimum {
            amount: 15,
            minimum: 20
        }))
    ));
    assert!(err.is_recoverable());
    assert_eq!(store.snapshot(&id, Some(HUMAN_SEAT)).unwrap(), before);

    let rejected = logs.find(Level::WARN, "rejected action");
    assert!(
        rejected
            .iter()
            .any(|e| e.field("game_id") == Some(id.as_str()))
    );
}

#[test]
fn bot_seats_cannot_be_submitted_for() {
    let store = store(4);
    let (id, _) = store.create_game(3, &OPPONENTS[..2]).unwrap();
    let err = store.submit_action(&id, 1, PlayerAction::Fold).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Game(GameError::IllegalAction(_))
    ));
}

#[test]
fn advancing_requires_a_finished_hand() {
    let store = store(4);
    let (id, snapshot) = store.create_game(3, &OPPONENTS[..2]).unwrap();
    assert_eq!(snapshot.phase, HandPhase::Betting);
    assert!(matches!(
        store.advance_to_next_hand(&id),
        Err(StoreError::Game(GameError::HandInProgress))
    ));

    let after_fold = store
        .submit_action(&id, HUMAN_SEAT, PlayerAction::Fold)
        .unwrap();
    assert_eq!(after_fold.phase, HandPhase::Complete);
    assert!(after_fold.last_result.is_some());
    let next = store.advance_to_next_hand(&id).unwrap();
    assert_eq!(next.hand_number, 2);
    assert_eq!(next.dealer, 1);
}

#[test]
fn showdown_reveals_only_unfolded_hands() {
    let store = store(17);
    let (id, first) = store.create_game(4, &OPPONENTS).unwrap();
    let snapshots = play_passively(&store, &id, first, 12);
    let history = store.hand_history(&id).unwrap();
    for (snap, record) in snapshots
        .iter()
        .filter(|s| s.phase == HandPhase::Complete)
        .zip(&history)
    {
        let shown: Vec<usize> = record.result.showdown.iter().map(|h| h.seat).collect();
        for player in snap.players.iter().filter(|p| p.seat != HUMAN_SEAT) {
            let visible = player.hole_cards.is_some();
            assert_eq!(visible, shown.contains(&player.seat), "{snap:?}");
        }
    }
}

#[test]
fn bot_decisions_carry_a_rationale() {
    let store = store(8);
    let (id, _) = store.create_game(4, &OPPONENTS).unwrap();
    store
        .submit_action(&id, HUMAN_SEAT, PlayerAction::Call)
        .unwrap();
    let decisions = store.bot_decisions(&id).unwrap();
    assert!(!decisions.is_empty());
    for d in &decisions {
        assert_ne!(d.seat, HUMAN_SEAT);
        assert_eq!(d.strategy, OPPONENTS[d.seat - 1]);
        assert!(!d.decision.rationale.is_empty());
        assert!((0.0..=1.0).contains(&d.decision.hand_strength));
    }
}

#[test]
fn custom_seating_puts_bots_anywhere() {
    let store = store(2);
    let options = GameOptions {
        seats: vec![
            SeatPolicy::Bot(StrategyKind::Bluffer),
            SeatPolicy::Bot(StrategyKind::Conservative),
            SeatPolicy::Human,
        ],
        ..GameOptions::all_bots(&[], store.settings())
    };
    let (id, snapshot) = store.create_game_with(options).unwrap();
    // seat 0 is a bot, so the default view is a spectator's
    assert!(snapshot.players.iter().all(|p| p.hole_cards.is_none()));
    let view = store.snapshot(&id, Some(2)).unwrap();
    assert!(view.players[2].hole_cards.is_some());
}

#[test]
fn unknown_and_deleted_games_are_not_found() {
    let store = store(1);
    let missing = "no-such-game".to_string();
    assert!(matches!(
        store.snapshot(&missing, None),
        Err(StoreError::NotFound(_))
    ));

    let (id, _) = store.create_game(2, &[StrategyKind::Bluffer]).unwrap();
    store.delete_game(&id).unwrap();
    assert!(matches!(
        store.submit_action(&id, HUMAN_SEAT, PlayerAction::Fold),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.delete_game(&id),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn bad_requests_are_rejected() {
    let store = store(1);
    assert!(matches!(
        store.create_game(1, &[]),
        Err(StoreError::Game(GameError::InvalidSetup(_)))
            | Err(StoreError::InvalidRequest(_))
    ));
    assert!(matches!(
        store.create_game(3, &[StrategyKind::Bluffer]),
        Err(StoreError::InvalidRequest(_))
    ));
}
