//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the registry and every piece of session state,
//! processes player commands, runs all systems and produces
//! `GameStateSnapshot`s. Completely headless, so a test can drive it tick by
//! tick with a seeded RNG and a scripted loader.

use std::collections::{BTreeMap, VecDeque};

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use rampart_core::commands::PlayerCommand;
use rampart_core::config::GameConfig;
use rampart_core::enums::{AlertLevel, DefenderKind, GamePhase};
use rampart_core::error::{CommandError, CommandResult, ConfigError};
use rampart_core::events::{Alert, EffectEvent};
use rampart_core::state::{EconomyView, GameStateSnapshot};
use rampart_core::types::{Position, SimTime};
use rampart_waves::profiles::AttackerProfile;

use crate::economy::Ledger;
use crate::loader::{
    AssetKind, InstantLoader, LoadCompletion, LoadRequest, LoadTicket, ResourceLoader,
};
use crate::path::Path;
use crate::placement;
use crate::registry::Registry;
use crate::systems;
use crate::systems::snapshot::SnapshotInputs;
use crate::systems::strike::StrikeCountdown;
use crate::systems::wave_spawner::WaveState;

/// A creation waiting on the resource loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingCreation {
    Defender {
        kind: DefenderKind,
        position: Position,
        /// Refunded if the load fails.
        cost: u32,
    },
    Attacker {
        wave: u32,
    },
}

/// The simulation engine. Owns the registry and all sim state.
pub struct SimulationEngine {
    config: GameConfig,
    path: Path,
    registry: Registry,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    ledger: Ledger,
    waves: WaveState,
    strike: Option<StrikeCountdown>,

    loader: Box<dyn ResourceLoader>,
    pending: BTreeMap<LoadTicket, PendingCreation>,
    next_ticket: u64,
    completion_buffer: Vec<LoadCompletion>,

    command_queue: VecDeque<PlayerCommand>,
    leaked_buffer: Vec<Entity>,
    effects: Vec<EffectEvent>,
    alerts: Vec<Alert>,
}

impl SimulationEngine {
    /// Create an engine for `config`, materializing entities through `loader`.
    pub fn new(config: GameConfig, loader: Box<dyn ResourceLoader>) -> Result<Self, ConfigError> {
        config.validate()?;
        let path = Path::new(config.level.path.clone())
            .ok_or_else(|| ConfigError::Invalid("level path needs at least 2 waypoints".into()))?;
        Ok(Self {
            registry: Registry::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ledger: Ledger::new(&config.economy),
            waves: WaveState::default(),
            strike: None,
            loader,
            pending: BTreeMap::new(),
            next_ticket: 0,
            completion_buffer: Vec::new(),
            command_queue: VecDeque::new(),
            leaked_buffer: Vec::new(),
            effects: Vec::new(),
            alerts: Vec::new(),
            path,
            config,
        })
    }

    /// Engine whose loads complete at the start of the next tick.
    pub fn with_instant_loader(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new(config, Box::new(InstantLoader::new()))
    }

    // --- Command surface ---

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Request a defender at `position`. Gold is debited now; the defender
    /// enters the registry when its visual finishes loading. A rejected
    /// placement leaves all state untouched.
    pub fn place(&mut self, kind: DefenderKind, position: Position) -> CommandResult<LoadTicket> {
        if self.phase == GamePhase::GameOver {
            return Err(CommandError::GameOver);
        }
        let cost = self.config.defenders.stats(kind).cost;
        placement::validate(
            &position,
            &self.path,
            &self.config.placement,
            &self.config.level.structures,
            self.occupied_slots(),
        )
        .map_err(CommandError::InvalidPlacement)?;
        self.ledger.try_debit(cost)?;

        let ticket = self.request_load(
            AssetKind::Defender(kind),
            PendingCreation::Defender {
                kind,
                position,
                cost,
            },
        );
        debug!(?kind, x = position.x, y = position.y, cost, "placement requested");
        Ok(ticket)
    }

    /// Start the next wave. Returns `false` (a no-op) unless the director is
    /// idle.
    pub fn start_next_wave(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.waves.start(&self.config.waves)
    }

    /// Flip between running and paused. Game over is left alone.
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::GameOver => GamePhase::GameOver,
        };
        self.phase
    }

    /// Pay for the full-map strike. It resolves after the configured delay.
    pub fn trigger_strike(&mut self) -> CommandResult<()> {
        if self.phase == GamePhase::GameOver {
            return Err(CommandError::GameOver);
        }
        if self.strike.is_some() {
            return Err(CommandError::StrikePending);
        }
        self.ledger.try_debit(self.config.combat.strike_cost)?;
        self.strike = Some(StrikeCountdown {
            remaining_ticks: self.config.combat.strike_delay_ticks,
        });
        debug!(
            delay_ticks = self.config.combat.strike_delay_ticks,
            "strike triggered"
        );
        Ok(())
    }

    /// Discard all session state. Outstanding loads are forgotten and their
    /// late completions ignored.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.time = SimTime::default();
        self.phase = GamePhase::Running;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.ledger = Ledger::new(&self.config.economy);
        self.waves = WaveState::default();
        self.strike = None;
        self.pending.clear();
        self.effects.clear();
        self.alerts.clear();
        info!(seed = self.config.seed, "simulation reset");
    }

    /// Apply every load completion the loader has ready. Runs regardless of
    /// pause, so creations that finish while paused are inserted at once.
    pub fn pump_loads(&mut self) {
        let mut completions = std::mem::take(&mut self.completion_buffer);
        self.loader.drain_completed(&mut completions);
        for completion in completions.drain(..) {
            self.apply_completion(completion);
        }
        self.completion_buffer = completions;
    }

    // --- Tick ---

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.pump_loads();
        self.process_commands();

        if self.phase == GamePhase::Running {
            self.run_systems();
            self.time.advance();
        }

        let inputs = SnapshotInputs {
            time: &self.time,
            phase: self.phase,
            ledger: &self.ledger,
            waves: &self.waves,
            pending_creations: self.pending.len() as u32,
            strike: self.strike,
            alerts: std::mem::take(&mut self.alerts),
            effects: std::mem::take(&mut self.effects),
        };
        systems::snapshot::build_snapshot(&self.registry, inputs)
    }

    /// Build a snapshot of the current state without consuming effects or
    /// alerts.
    pub fn snapshot(&self) -> GameStateSnapshot {
        let inputs = SnapshotInputs {
            time: &self.time,
            phase: self.phase,
            ledger: &self.ledger,
            waves: &self.waves,
            pending_creations: self.pending.len() as u32,
            strike: self.strike,
            alerts: self.alerts.clone(),
            effects: self.effects.clone(),
        };
        systems::snapshot::build_snapshot(&self.registry, inputs)
    }

    // --- Accessors ---

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn economy(&self) -> EconomyView {
        self.ledger.view()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn waves(&self) -> &WaveState {
        &self.waves
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pending_creations(&self) -> usize {
        self.pending.len()
    }

    pub fn strike(&self) -> Option<StrikeCountdown> {
        self.strike
    }

    // --- Test helpers ---

    /// Insert an attacker of `wave` at the path start, bypassing the loader.
    #[cfg(test)]
    pub fn spawn_test_attacker(&mut self, wave: u32) -> Entity {
        self.spawn_test_attacker_at(wave, 0, 0.0)
    }

    /// Insert an attacker part-way along the path, bypassing the loader.
    #[cfg(test)]
    pub fn spawn_test_attacker_at(&mut self, wave: u32, path_index: usize, progress: f64) -> Entity {
        let profile = AttackerProfile::for_wave(wave, &self.config.waves);
        self.registry.insert_attacker_at(
            &profile,
            &self.config.combat,
            &self.path,
            path_index,
            progress,
            rampart_core::types::VisualHandle(0),
        )
    }

    /// Insert a defender directly, skipping placement rules and cost.
    #[cfg(test)]
    pub fn spawn_test_defender(&mut self, kind: DefenderKind, position: Position) -> Entity {
        let stats = *self.config.defenders.stats(kind);
        self.registry.insert_defender(
            kind,
            position,
            &stats,
            rampart_core::types::VisualHandle(0),
        )
    }

    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!(%err, "queued command rejected");
                self.push_alert(AlertLevel::Warning, err.to_string());
            }
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) -> CommandResult<()> {
        match command {
            PlayerCommand::Place { kind, position } => self.place(kind, position).map(|_| ()),
            PlayerCommand::StartNextWave => {
                self.start_next_wave();
                Ok(())
            }
            PlayerCommand::TogglePause => {
                self.toggle_pause();
                Ok(())
            }
            PlayerCommand::TriggerStrike => self.trigger_strike(),
            PlayerCommand::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now_ms = self.time.elapsed_ms();

        // 1. Pending full-map strike
        systems::strike::run(
            &mut self.strike,
            &mut self.registry,
            &self.path,
            &mut self.ledger,
            &mut self.effects,
        );

        // 2. Movement; leaked attackers cost one life each
        systems::movement::run(
            self.registry.world_mut(),
            &self.path,
            self.time.dt(),
            &mut self.leaked_buffer,
        );
        for &entity in &self.leaked_buffer {
            if self.registry.remove_attacker(entity) {
                self.ledger.lose_life();
            }
        }
        if self.ledger.is_depleted() {
            self.enter_game_over();
            return;
        }

        // 3. Targeting
        systems::targeting::run(self.registry.world_mut());

        // 4. Fire control
        let shots = systems::fire_control::run(&mut self.registry, now_ms, &mut self.effects);
        self.ledger.record_shots(shots);

        // 5. Projectiles, hits, damage
        let report = systems::projectiles::run(
            &mut self.registry,
            self.config.combat.hit_radius,
            &mut self.ledger,
            &mut self.effects,
        );
        trace!(
            tick = self.time.tick,
            shots,
            hits = report.hits,
            kills = report.kills,
            expired = report.expired,
            "combat"
        );

        // 6. Wave director
        let director = systems::wave_spawner::run(
            &mut self.waves,
            &self.config.waves,
            self.registry.attacker_count(),
            &mut self.rng,
        );
        if director.request_spawn {
            self.waves.pending += 1;
            let wave = self.waves.number;
            self.request_load(AssetKind::Attacker, PendingCreation::Attacker { wave });
        }
        if let Some(bonus) = director.completion_bonus {
            let wave = self.waves.number;
            self.ledger.credit_bonus(bonus);
            self.effects.push(EffectEvent::WaveComplete { wave, bonus });
            self.push_alert(
                AlertLevel::Info,
                format!("wave {wave} cleared, bonus {bonus}"),
            );
        }

    }

    /// Lives are gone: nothing else runs this tick or after it.
    fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        info!(
            tick = self.time.tick,
            score = self.ledger.score(),
            "game over"
        );
        self.push_alert(AlertLevel::Critical, "all lives lost".to_string());
    }

    fn request_load(&mut self, asset: AssetKind, creation: PendingCreation) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(ticket, creation);
        self.loader.request(LoadRequest::new(ticket, asset));
        ticket
    }

    fn apply_completion(&mut self, completion: LoadCompletion) {
        let Some(creation) = self.pending.remove(&completion.ticket) else {
            trace!(ticket = completion.ticket.0, "completion for discarded ticket");
            return;
        };
        match (creation, completion.result) {
            (PendingCreation::Defender { kind, position, .. }, Ok(visual)) => {
                let stats = *self.config.defenders.stats(kind);
                self.registry.insert_defender(kind, position, &stats, visual);
                debug!(?kind, x = position.x, y = position.y, "defender placed");
            }
            (PendingCreation::Defender { kind, cost, .. }, Err(err)) => {
                self.ledger.refund(cost);
                warn!(%err, ?kind, cost, "defender load failed, cost refunded");
                self.push_alert(AlertLevel::Warning, err.to_string());
            }
            (PendingCreation::Attacker { wave }, Ok(visual)) => {
                self.waves.pending = self.waves.pending.saturating_sub(1);
                let profile = AttackerProfile::for_wave(wave, &self.config.waves);
                self.registry
                    .insert_attacker(&profile, &self.config.combat, &self.path, visual);
                self.waves.spawned += 1;
            }
            (PendingCreation::Attacker { wave }, Err(err)) => {
                // Not counted; the director re-rolls the slot.
                self.waves.pending = self.waves.pending.saturating_sub(1);
                warn!(%err, wave, "attacker load failed");
            }
        }
    }

    /// Positions of placed defenders plus placements still loading.
    fn occupied_slots(&self) -> Vec<Position> {
        let mut slots: Vec<Position> = self
            .registry
            .defenders()
            .into_iter()
            .filter_map(|e| self.registry.position(e))
            .collect();
        slots.extend(self.pending.values().filter_map(|creation| match creation {
            PendingCreation::Defender { position, .. } => Some(*position),
            PendingCreation::Attacker { .. } => None,
        }));
        slots
    }

    fn push_alert(&mut self, level: AlertLevel, message: String) {
        self.alerts.push(Alert {
            level,
            message,
            tick: self.time.tick,
        });
    }
}
