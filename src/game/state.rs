//! Match state: the single owner of the pool, the players, and the
//! root random source.
//!
//! Every mutation goes through `&mut Match`, which is the one
//! serialization point the shared pool needs. `SharedMatch` puts a match
//! behind a mutex for hosts that serve players from several threads.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};

use super::action::PlayerAction;
use super::player::Player;
use crate::cards::Catalog;
use crate::combat::{CombatEngine, CombatOutcome};
use crate::core::{GameConfig, GameError, GameResult, GameRng, PlayerId, PlayerMap};
use crate::economy::CardPool;

/// One running match.
///
/// ```
/// use std::sync::Arc;
/// use tavern_core::cards::{CardRegistry, CardTemplate, TemplateId};
/// use tavern_core::core::{GameConfig, PlayerId};
/// use tavern_core::game::{Match, PlayerAction};
///
/// let mut registry = CardRegistry::new();
/// for id in 1..=5 {
///     registry.register(CardTemplate::minion(TemplateId::new(id), "Recruit", 1, 2, 2)).unwrap();
/// }
///
/// let mut game = Match::new(GameConfig::default(), Arc::new(registry), 2, 42);
/// game.start_recruit();
///
/// let me = PlayerId::new(0);
/// game.apply(me, PlayerAction::Buy { index: 0 }).unwrap();
/// game.apply(me, PlayerAction::Place { hand_index: 0, position: 0, target: None }).unwrap();
/// assert_eq!(game.player(me).unwrap().board().len(), 1);
/// ```
pub struct Match {
    config: GameConfig,
    catalog: Arc<dyn Catalog>,
    pool: CardPool,
    players: PlayerMap<Player>,
    rng: GameRng,
    turn: u32,
}

impl Match {
    /// Seat `player_count` players. The pool draws from the first fork
    /// of the root generator.
    pub fn new(config: GameConfig, catalog: Arc<dyn Catalog>, player_count: usize, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let pool = CardPool::new(Arc::clone(&catalog), &config.pool, rng.fork());
        let players = PlayerMap::new(player_count, |id| Player::new(id, &config.economy));
        debug!("match seeded {seed} with {player_count} players, {} copies in pool", pool.total());
        Self {
            config,
            catalog,
            pool,
            players,
            rng,
            turn: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current recruit turn; 0 before the first one.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn pool(&self) -> &CardPool {
        &self.pool
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter()
    }

    /// Seats still in the match.
    #[must_use]
    pub fn living_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|(_, p)| !p.is_eliminated())
            .map(|(id, _)| id)
            .collect()
    }

    /// Run one player command against the match.
    pub fn apply(&mut self, id: PlayerId, action: PlayerAction) -> GameResult<()> {
        let player = self.players.get_mut(id).ok_or(GameError::UnknownPlayer)?;
        if player.is_eliminated() {
            return Err(GameError::PlayerEliminated);
        }
        let pool = &mut self.pool;
        debug!("{id}: {action:?}");

        match action {
            PlayerAction::Buy { index } => player.buy_card(index, pool),
            PlayerAction::Sell { index } => player.sell_minion(index, pool),
            PlayerAction::Place {
                hand_index,
                position,
                target,
            } => player.place_minion(hand_index, position, target, pool),
            PlayerAction::Remove { index } => player.remove_minion(index),
            PlayerAction::Upgrade => player.upgrade(),
            PlayerAction::Refresh => player.refresh(pool),
            PlayerAction::ToggleFreeze => {
                player.toggle_freeze();
                Ok(())
            }
            PlayerAction::ReorderBoard(permutation) => player.reorder_board(&permutation),
            PlayerAction::ReorderShop(permutation) => player.reorder_shop(&permutation),
            PlayerAction::PlaySpell { hand_index, target } => player.play_spell(hand_index, target, pool),
            PlayerAction::DiscoverPick { index } => player.discover_pick(index, pool),
        }
    }

    /// Open the next recruit phase for every living player.
    pub fn start_recruit(&mut self) {
        self.turn += 1;
        for (_, player) in self.players.iter_mut() {
            if !player.is_eliminated() {
                player.start_turn(self.turn, &mut self.pool);
            }
        }
        info!("recruit turn {} begins", self.turn);
    }

    /// Close the recruit phase: pending discovers are forced.
    pub fn end_recruit(&mut self) {
        for (_, player) in self.players.iter_mut() {
            if !player.is_eliminated() {
                player.end_turn(&mut self.pool);
            }
        }
    }

    /// Fight `a` against `b` on a fresh fork of the root generator and
    /// charge the loser. An eliminated loser's cards go back to the pool.
    pub fn resolve_combat(&mut self, a: PlayerId, b: PlayerId) -> GameResult<CombatOutcome> {
        if a == b {
            return Err(GameError::UnknownPlayer);
        }
        let first = self.players.get(a).ok_or(GameError::UnknownPlayer)?;
        let second = self.players.get(b).ok_or(GameError::UnknownPlayer)?;

        let engine = CombatEngine::new(
            first.combatant(),
            second.combatant(),
            Arc::clone(&self.catalog),
            &self.config.combat,
            self.rng.fork(),
        );
        let outcome = engine.run();

        if let Some(loser) = outcome.loser().and_then(|id| self.players.get_mut(id)) {
            loser.take_damage(outcome.damage());
            if loser.is_eliminated() {
                info!("{} eliminated", loser.id());
                loser.release_cards(&mut self.pool);
            }
        }
        Ok(outcome)
    }
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Match")
            .field("turn", &self.turn)
            .field("players", &self.players)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// A match shared between connection handlers.
///
/// Cloning shares the same match. Each call holds the lock for the
/// whole operation, so pool draws and returns never interleave.
#[derive(Clone, Debug)]
pub struct SharedMatch {
    inner: Arc<Mutex<Match>>,
}

impl SharedMatch {
    #[must_use]
    pub fn new(game: Match) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    pub fn apply(&self, id: PlayerId, action: PlayerAction) -> GameResult<()> {
        self.with(|game| game.apply(id, action))
    }

    /// Run `f` with exclusive access to the match.
    pub fn with<R>(&self, f: impl FnOnce(&mut Match) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
