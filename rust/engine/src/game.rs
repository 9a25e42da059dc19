use serde::{Deserialize, Serialize};

use crate::betting::BettingRound;
use crate::cards::Card;
use crate::deck::Deck;
use crate::equity::score_showdown;
use crate::errors::{GameError, IllegalAction, InvariantViolation};
use crate::hand::HandStrength;
use crate::logger::{
    ActionKind, ActionRecord, HandRecord, HandResult, SeatCards, ShownHand, Street,
};
use crate::player::{Player, PlayerAction, PlayerStatus, SeatKind, STARTING_STACK};
use crate::pot::{PotAward, PotManager};
use crate::rules::{LegalActions, ValidatedAction};

pub const MAX_SEATS: usize = 10;

/// Table parameters fixed for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub seats: Vec<SeatKind>,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Deck seed; drawn from OS entropy when absent
    pub seed: Option<u64>,
}

impl TableConfig {
    /// One human in seat 0 followed by `bots` algorithmic seats.
    pub fn human_vs_bots(bots: usize) -> Self {
        let mut seats = vec![SeatKind::Human];
        seats.extend(std::iter::repeat(SeatKind::Bot).take(bots));
        Self {
            seats,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(2..=MAX_SEATS).contains(&self.seats.len()) {
            return Err(GameError::InvalidSetup(format!(
                "seat count must be between 2 and {MAX_SEATS}, got {}",
                self.seats.len()
            )));
        }
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(GameError::InvalidSetup(
                "blinds must satisfy 0 < small_blind <= big_blind".into(),
            ));
        }
        if self.starting_stack < self.big_blind {
            return Err(GameError::InvalidSetup(
                "starting_stack must cover the big blind".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: vec![SeatKind::Human, SeatKind::Bot],
            starting_stack: STARTING_STACK,
            small_blind: 5,
            big_blind: 10,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandPhase {
    NotStarted,
    Betting,
    Complete,
}

/// Drives one game through repeated hands: blinds, dealing, betting rounds,
/// pot resolution and button rotation. All player and hand state is owned
/// here; callers only see read-only views and snapshots.
#[derive(Debug, Clone)]
pub struct Game {
    config: TableConfig,
    seed: u64,
    players: Vec<Player>,
    deck: Deck,
    board: Vec<Card>,
    street: Street,
    dealer: usize,
    hand_number: u64,
    phase: HandPhase,
    round: Option<BettingRound>,
    pot: u32,
    total_chips: u64,
    starting_stacks: Vec<u32>,
    actions: Vec<ActionRecord>,
    last_result: Option<HandResult>,
    completed: Vec<HandRecord>,
    aborted: Option<InvariantViolation>,
}

impl Game {
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_deck(config, Deck::new_with_seed(seed), seed)
    }

    /// Build a game around a specific deck, e.g. [`Deck::stacked`].
    pub fn with_deck(config: TableConfig, deck: Deck, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let players: Vec<Player> = config
            .seats
            .iter()
            .enumerate()
            .map(|(seat, &kind)| Player::new(seat, kind, config.starting_stack))
            .collect();
        let total_chips = players.iter().map(|p| u64::from(p.stack())).sum();
        Ok(Self {
            seed,
            players,
            deck,
            board: Vec::with_capacity(5),
            street: Street::Preflop,
            dealer: 0,
            hand_number: 0,
            phase: HandPhase::NotStarted,
            round: None,
            pot: 0,
            total_chips,
            starting_stacks: Vec::new(),
            actions: Vec::new(),
            last_result: None,
            completed: Vec::new(),
            aborted: None,
            config,
        })
    }

    /// Seat the table with uneven stacks before the first hand, e.g. to
    /// resume a drill from a given position.
    pub fn set_stacks(&mut self, stacks: &[u32]) -> Result<(), GameError> {
        if self.phase != HandPhase::NotStarted {
            return Err(GameError::InvalidSetup(
                "stacks can only be set before the first hand".into(),
            ));
        }
        if stacks.len() != self.players.len() {
            return Err(GameError::InvalidSetup(format!(
                "expected {} stacks, got {}",
                self.players.len(),
                stacks.len()
            )));
        }
        self.players = self
            .config
            .seats
            .iter()
            .zip(stacks)
            .enumerate()
            .map(|(seat, (&kind, &stack))| Player::new(seat, kind, stack))
            .collect();
        self.total_chips = stacks.iter().map(|&s| u64::from(s)).sum();
        Ok(())
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn dealer(&self) -> usize {
        self.dealer
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn phase(&self) -> HandPhase {
        self.phase
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn big_blind(&self) -> u32 {
        self.config.big_blind
    }
    pub fn total_chips(&self) -> u64 {
        self.total_chips
    }
    pub fn last_result(&self) -> Option<&HandResult> {
        self.last_result.as_ref()
    }
    pub fn is_hand_complete(&self) -> bool {
        self.phase == HandPhase::Complete
    }

    pub fn current_bet(&self) -> u32 {
        self.round.as_ref().map(BettingRound::current_bet).unwrap_or(0)
    }

    pub fn to_act(&self) -> Option<usize> {
        self.round.as_ref().and_then(BettingRound::to_act)
    }

    /// Cards left in the deck this hand.
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn burnt_count(&self) -> usize {
        self.deck.burnt().len()
    }

    /// Seats able to play another hand.
    pub fn funded_seats(&self) -> usize {
        self.players.iter().filter(|p| p.stack() > 0).count()
    }

    /// Drain completed-hand records not yet collected.
    pub fn take_completed_hands(&mut self) -> Vec<HandRecord> {
        std::mem::take(&mut self.completed)
    }

    pub fn legal_actions(&self, seat: usize) -> Result<LegalActions, GameError> {
        self.ensure_betting()?;
        let player = self
            .players
            .get(seat)
            .ok_or(IllegalAction::UnknownSeat { seat })?;
        if !player.is_active() {
            return Err(IllegalAction::SeatNotActive { seat }.into());
        }
        let round = self.round.as_ref().ok_or(GameError::NoHandInProgress)?;
        Ok(round.legal_actions(player))
    }

    /// Start the next hand: move the button, deal, post blinds and open
    /// pre-flop betting.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        if let Some(v) = &self.aborted {
            return Err(GameError::Aborted(v.clone()));
        }
        if self.phase == HandPhase::Betting {
            return Err(GameError::HandInProgress);
        }
        for p in &mut self.players {
            p.reset_for_hand();
        }
        let funded = self.funded_seats();
        if funded < 2 {
            return Err(GameError::NotEnoughPlayers { funded });
        }

        if self.hand_number > 0 || self.players[self.dealer].status() == PlayerStatus::Eliminated {
            self.dealer = self.next_funded(self.dealer);
        }
        self.hand_number += 1;
        self.street = Street::Preflop;
        self.board.clear();
        self.actions.clear();
        self.pot = 0;
        self.last_result = None;
        self.starting_stacks = self.players.iter().map(Player::stack).collect();
        self.phase = HandPhase::Betting;

        tracing::debug!(
            hand_number = self.hand_number,
            dealer = self.dealer,
            funded,
            "starting hand"
        );

        if let Err(v) = self.deal_and_post_blinds(funded) {
            return Err(self.abort(v));
        }
        self.settle()
    }

    fn deal_and_post_blinds(&mut self, funded: usize) -> Result<(), InvariantViolation> {
        self.deck.reset();
        let order = self.funded_from(self.dealer + 1);
        let holes = self.deck.deal_hole_cards(order.len())?;
        for (&seat, cards) in order.iter().zip(holes) {
            self.players[seat].give_cards(cards);
        }

        let (sb, bb) = if funded == 2 {
            (self.dealer, self.next_funded(self.dealer))
        } else {
            let sb = self.next_funded(self.dealer);
            (sb, self.next_funded(sb))
        };
        self.post_blind(sb, self.config.small_blind, ActionKind::SmallBlind);
        self.post_blind(bb, self.config.big_blind, ActionKind::BigBlind);

        self.round = Some(BettingRound::open(
            Street::Preflop,
            &self.players,
            self.next_funded(bb),
            self.config.big_blind,
            self.config.big_blind,
        ));
        self.check_conservation()
    }

    fn post_blind(&mut self, seat: usize, amount: u32, kind: ActionKind) {
        let moved = self.players[seat].commit(amount);
        self.pot += moved;
        self.actions.push(ActionRecord {
            seat,
            street: Street::Preflop,
            action: kind,
            amount: moved,
            all_in: self.players[seat].status() == PlayerStatus::AllIn,
        });
    }

    /// Apply an action for `seat`. Rejected actions leave the game unchanged.
    pub fn apply_action(&mut self, seat: usize, action: PlayerAction) -> Result<(), GameError> {
        self.ensure_betting()?;
        let street = self.street;
        let stack_before = self.players.get(seat).map(Player::stack).unwrap_or(0);
        let round = self.round.as_mut().ok_or(GameError::NoHandInProgress)?;
        let validated = match round.apply(&mut self.players, seat, action) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(hand_number = self.hand_number, seat, ?action, error = %e, "rejected action");
                return Err(e.into());
            }
        };

        let player = &self.players[seat];
        let moved = stack_before - player.stack();
        self.pot += moved;
        let (kind, amount) = match validated {
            ValidatedAction::Fold => (ActionKind::Fold, 0),
            ValidatedAction::Check => (ActionKind::Check, 0),
            ValidatedAction::Call(chips) => (ActionKind::Call, chips),
            ValidatedAction::RaiseTo { to, .. } => (ActionKind::RaiseTo, to),
        };
        self.actions.push(ActionRecord {
            seat,
            street,
            action: kind,
            amount,
            all_in: player.status() == PlayerStatus::AllIn,
        });
        tracing::debug!(hand_number = self.hand_number, seat, ?street, ?kind, amount, pot = self.pot, "action");

        if let Err(v) = self.check_conservation() {
            return Err(self.abort(v));
        }
        self.settle()
    }

    fn ensure_betting(&self) -> Result<(), GameError> {
        if let Some(v) = &self.aborted {
            return Err(GameError::Aborted(v.clone()));
        }
        match self.phase {
            HandPhase::Betting => Ok(()),
            HandPhase::Complete => Err(GameError::HandAlreadyComplete),
            HandPhase::NotStarted => Err(GameError::NoHandInProgress),
        }
    }

    /// Advance past finished rounds: award the pot if one player is left,
    /// otherwise deal streets until someone must act or the hand reaches
    /// showdown.
    fn settle(&mut self) -> Result<(), GameError> {
        let outcome = self.settle_inner();
        outcome.map_err(|v| self.abort(v))
    }

    fn settle_inner(&mut self) -> Result<(), InvariantViolation> {
        loop {
            let contenders: Vec<usize> = self
                .players
                .iter()
                .filter(|p| p.in_hand())
                .map(Player::seat)
                .collect();
            if let [winner] = contenders.as_slice() {
                self.return_uncalled();
                return self.award_uncontested(*winner);
            }
            if !self.round.as_ref().is_some_and(BettingRound::is_complete) {
                return Ok(());
            }
            if self.street == Street::River {
                self.return_uncalled();
                return self.showdown();
            }

            self.street = self.street.next();
            for p in &mut self.players {
                p.reset_for_street();
            }
            self.deck.burn()?;
            self.deck
                .deal_community(&mut self.board, self.street.cards_dealt())?;
            tracing::debug!(hand_number = self.hand_number, street = ?self.street, board = ?self.board, "street dealt");
            self.round = Some(BettingRound::open(
                self.street,
                &self.players,
                (self.dealer + 1) % self.players.len(),
                self.config.big_blind,
                0,
            ));
        }
    }

    /// Hand back the part of the single largest contribution that no other
    /// seat matched. Folded seats count toward the matched level.
    fn return_uncalled(&mut self) {
        let mut contributions: Vec<(u32, usize)> = self
            .players
            .iter()
            .map(|p| (p.hand_contribution(), p.seat()))
            .collect();
        contributions.sort_unstable_by(|a, b| b.cmp(a));
        let &[(top, seat), (second, _), ..] = contributions.as_slice() else {
            return;
        };
        if top <= second {
            return;
        }
        let returned = self.players[seat].return_chips(top - second);
        self.pot -= returned;
        tracing::debug!(hand_number = self.hand_number, seat, amount = returned, "uncalled chips returned");
    }

    fn award_uncontested(&mut self, winner: usize) -> Result<(), InvariantViolation> {
        let amount = self.pot;
        self.players[winner].add_chips(amount);
        self.pot = 0;
        let result = HandResult {
            hand_number: self.hand_number,
            winners: vec![winner],
            pots: vec![PotAward {
                pot_index: 0,
                amount,
                shares: vec![(winner, amount)],
            }],
            showdown: Vec::new(),
        };
        self.finish_hand(result)
    }

    fn showdown(&mut self) -> Result<(), InvariantViolation> {
        self.street = Street::Showdown;
        let mut strengths: Vec<(usize, HandStrength)> = Vec::new();
        let mut shown = Vec::new();
        for p in self.players.iter().filter(|p| p.in_hand()) {
            let Some(cards) = p.hole_cards() else {
                continue;
            };
            let strength = score_showdown(&cards, &self.board);
            strengths.push((p.seat(), strength));
            shown.push(ShownHand {
                seat: p.seat(),
                cards,
                category: strength.category,
                score: strength.score(),
            });
        }

        let pots = PotManager::from_players(&self.players);
        if pots.total() != self.pot {
            return Err(InvariantViolation::UnassignedPot {
                amount: self.pot.abs_diff(pots.total()),
            });
        }
        let order = self.seats_from(self.dealer + 1);
        let awards = pots.distribute(&strengths, &order)?;

        let mut winners = Vec::new();
        for award in &awards {
            for &(seat, chips) in &award.shares {
                self.players[seat].add_chips(chips);
                if chips > 0 && !winners.contains(&seat) {
                    winners.push(seat);
                }
            }
        }
        self.pot = 0;
        let result = HandResult {
            hand_number: self.hand_number,
            winners,
            pots: awards,
            showdown: shown,
        };
        self.finish_hand(result)
    }

    fn finish_hand(&mut self, result: HandResult) -> Result<(), InvariantViolation> {
        self.phase = HandPhase::Complete;
        self.round = None;
        self.check_conservation()?;

        let record = HandRecord {
            hand_number: self.hand_number,
            seed: self.seed,
            dealer: self.dealer,
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            starting_stacks: self.starting_stacks.clone(),
            hole_cards: self
                .players
                .iter()
                .filter_map(|p| {
                    p.hole_cards().map(|cards| SeatCards {
                        seat: p.seat(),
                        cards,
                    })
                })
                .collect(),
            actions: self.actions.clone(),
            board: self.board.clone(),
            result: result.clone(),
            final_stacks: self.players.iter().map(Player::stack).collect(),
            ts: None,
        };
        tracing::info!(
            hand_number = self.hand_number,
            winners = ?result.winners,
            showdown = !result.showdown.is_empty(),
            "hand complete"
        );
        self.completed.push(record);
        self.last_result = Some(result);
        Ok(())
    }

    fn check_conservation(&self) -> Result<(), InvariantViolation> {
        let actual = self.players.iter().map(|p| u64::from(p.stack())).sum::<u64>()
            + u64::from(self.pot);
        if actual != self.total_chips {
            return Err(InvariantViolation::ChipConservation {
                expected: self.total_chips,
                actual,
            });
        }
        Ok(())
    }

    fn abort(&mut self, violation: InvariantViolation) -> GameError {
        tracing::error!(
            hand_number = self.hand_number,
            error = %violation,
            "invariant violated, aborting game"
        );
        self.round = None;
        self.aborted = Some(violation.clone());
        GameError::Invariant(violation)
    }

    /// All seats in table order starting at `start`.
    fn seats_from(&self, start: usize) -> Vec<usize> {
        let n = self.players.len();
        (0..n).map(|i| (start + i) % n).collect()
    }

    /// Seats dealt into the current hand, starting at `start`.
    fn funded_from(&self, start: usize) -> Vec<usize> {
        self.seats_from(start)
            .into_iter()
            .filter(|&s| self.players[s].status() != PlayerStatus::Eliminated)
            .collect()
    }

    fn next_funded(&self, seat: usize) -> usize {
        self.funded_from(seat + 1).first().copied().unwrap_or(seat)
    }

    /// Read-only view for `viewer`. Hole cards are included only for the
    /// viewer's own seat, or for every non-folded seat once the hand has
    /// reached showdown.
    pub fn snapshot(&self, viewer: Option<usize>) -> GameSnapshot {
        let at_showdown = self.street == Street::Showdown;
        let players = self
            .players
            .iter()
            .map(|p| {
                let visible = Some(p.seat()) == viewer || (at_showdown && p.in_hand());
                PlayerSnapshot {
                    seat: p.seat(),
                    kind: p.kind(),
                    stack: p.stack(),
                    status: p.status(),
                    street_bet: p.street_bet(),
                    hand_contribution: p.hand_contribution(),
                    hole_cards: if visible { p.hole_cards() } else { None },
                }
            })
            .collect();
        let legal_actions = viewer
            .filter(|&seat| self.to_act() == Some(seat))
            .and_then(|seat| self.legal_actions(seat).ok());
        GameSnapshot {
            hand_number: self.hand_number,
            phase: self.phase,
            street: self.street,
            dealer: self.dealer,
            pot: self.pot,
            current_bet: self.current_bet(),
            to_act: self.to_act(),
            board: self.board.clone(),
            players,
            viewer,
            legal_actions,
            last_result: self.last_result.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub seat: usize,
    pub kind: SeatKind,
    pub stack: u32,
    pub status: PlayerStatus,
    pub street_bet: u32,
    pub hand_contribution: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole_cards: Option<[Card; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub hand_number: u64,
    pub phase: HandPhase,
    pub street: Street,
    pub dealer: usize,
    pub pot: u32,
    pub current_bet: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_act: Option<usize>,
    pub board: Vec<Card>,
    pub players: Vec<PlayerSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_actions: Option<LegalActions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<HandResult>,
}
