use felt_ai::{AIOpponent, DecisionContext, Strategy, StrategyKind};
use felt_engine::errors::GameError;
use felt_engine::game::{Game, TableConfig};
use felt_engine::player::SeatKind;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn table(seed: u64) -> (Game, Vec<Strategy>) {
    let game = Game::new(TableConfig {
        seats: vec![SeatKind::Bot; 4],
        seed: Some(seed),
        ..TableConfig::default()
    })
    .unwrap();
    let strategies = StrategyKind::ALL
        .iter()
        .map(|&kind| Strategy::new(kind, 20))
        .collect();
    (game, strategies)
}

#[test]
fn every_strategy_only_proposes_legal_actions() {
    for seed in 0..3u64 {
        let (mut game, strategies) = table(seed);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let total = game.total_chips();
        for _ in 0..40 {
            match game.start_hand() {
                Err(GameError::NotEnoughPlayers { .. }) => break,
                other => other.unwrap(),
            }
            while let Some(seat) = game.to_act() {
                let ctx = DecisionContext::for_seat(&game, seat).unwrap();
                let decision = strategies[seat].decide(&ctx, &mut rng);
                assert!((0.0..=1.0).contains(&decision.hand_strength));
                assert!(!decision.rationale.is_empty());
                game.apply_action(seat, decision.action)
                    .unwrap_or_else(|e| panic!("{} proposed {:?}: {e}", strategies[seat].name(), decision.action));
            }
            let stacks: u64 = game.players().iter().map(|p| u64::from(p.stack())).sum();
            assert_eq!(stacks, total);
        }
    }
}

#[test]
fn decisions_replay_with_the_same_seed() {
    let play = || {
        let (mut game, strategies) = table(77);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..10 {
            if game.start_hand().is_err() {
                break;
            }
            while let Some(seat) = game.to_act() {
                let ctx = DecisionContext::for_seat(&game, seat).unwrap();
                let action = strategies[seat].decide(&ctx, &mut rng).action;
                game.apply_action(seat, action).unwrap();
            }
        }
        game.take_completed_hands()
    };
    assert_eq!(play(), play());
}

#[test]
fn context_is_only_built_for_the_seat_to_act() {
    let (mut game, _) = table(1);
    assert_eq!(
        DecisionContext::for_seat(&game, 0),
        Err(GameError::NoHandInProgress)
    );
    game.start_hand().unwrap();
    let seat = game.to_act().unwrap();
    assert!(matches!(
        DecisionContext::for_seat(&game, (seat + 1) % 4),
        Err(GameError::IllegalAction(_))
    ));
    let ctx = DecisionContext::for_seat(&game, seat).unwrap();
    assert_eq!(ctx.pot, 15);
    assert_eq!(ctx.call_amount(), 10);
    assert!(ctx.board.is_empty());
}
