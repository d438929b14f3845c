use lg_core::geometry::sanitize_dt;
use lg_core::{
    ActorComponent, ActorState, BallComponent, BallState, ComponentSet, DragSway, Entity,
    EntityId, EntityKind, PhysicsBody, Vec2, World,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actor::{self, ActorSystem};
use crate::ball::{self, BallSystem};
use crate::bed::BedSystem;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::drag::{self, ActiveDrag};
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEventKind};
use crate::holding::{self, HoldingSyncSystem};
use crate::interaction::InteractionSystem;
use crate::motion::MotionSystem;
use crate::system::System;
use crate::view::{self, EntityView};

/// The top-level simulation orchestrator.
///
/// Owns the world, clock, RNG, event log, registered systems, and the
/// pointer drag. Drives the tick loop; every tick runs motion, actors,
/// balls, beds, interactions, any custom systems, and finally the holding
/// sync, in that order.
pub struct Simulation {
    world: World,
    config: SimConfig,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
    drag: Option<ActiveDrag>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("entities", &self.world.entity_count())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .field("drag", &self.drag)
            .finish()
    }
}

impl Simulation {
    /// Create a simulation over an existing world.
    pub fn new(world: World, config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let events = EventLog::new(config.max_events);
        info!(
            "simulation created: {}x{} world, seed {}",
            world.width(),
            world.height(),
            config.seed
        );
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(MotionSystem),
            Box::new(ActorSystem),
            Box::new(BallSystem),
            Box::new(BedSystem),
            Box::new(InteractionSystem),
            Box::new(HoldingSyncSystem),
        ];
        Self {
            world,
            config,
            clock: SimClock::new(),
            rng,
            events,
            systems,
            drag: None,
            initialized: false,
        }
    }

    /// An empty world sized by `config`.
    pub fn with_config(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let world = World::new(config.world_width, config.world_height)?;
        Ok(Self::new(world, config))
    }

    /// One little guy, one ball, and one bed.
    pub fn with_default_scene(config: SimConfig) -> SimResult<Self> {
        let mut sim = Self::with_config(config)?;
        sim.spawn_actor(Vec2::new(380.0, 270.0))?;
        sim.spawn_ball(Vec2::new(200.0, 200.0))?;
        sim.spawn_bed(Vec2::new(600.0, 100.0))?;
        Ok(sim)
    }

    fn context(&mut self) -> SimContext<'_> {
        SimContext {
            world: &mut self.world,
            clock: &self.clock,
            config: &self.config,
            events: &mut self.events,
            rng: &mut self.rng,
        }
    }

    // -----------------------------------------------------------------------
    // Spawning
    // -----------------------------------------------------------------------

    fn spawn(&mut self, entity: Entity) -> SimResult<EntityId> {
        let kind = entity.kind;
        let id = self.world.add_entity(entity)?;
        debug!("spawned {kind} {id}");
        self.context().emit(
            SimEventKind::Spawned { entity: id, kind },
            format!("{kind} {id} spawned"),
        );
        Ok(id)
    }

    fn motion_components(&self) -> ComponentSet {
        ComponentSet {
            physics: Some(PhysicsBody::new()),
            sway: Some(DragSway::new(self.config.sway.smoothing_window)),
            ..ComponentSet::default()
        }
    }

    /// Add a little guy with its bottom-left corner at `position`.
    pub fn spawn_actor(&mut self, position: Vec2) -> SimResult<EntityId> {
        let dwell = self.config.actor.idle_time.at(self.rng.random());
        let components = ComponentSet {
            actor: Some(ActorComponent::new(dwell)),
            ..self.motion_components()
        };
        let entity = Entity::new(EntityKind::Actor, "Little Guy")
            .at(position)
            .with_size(self.config.actor.size)
            .with_components(components);
        self.spawn(entity)
    }

    /// Add a ball with its bottom-left corner at `position`.
    pub fn spawn_ball(&mut self, position: Vec2) -> SimResult<EntityId> {
        let components = ComponentSet {
            ball: Some(BallComponent::default()),
            ..self.motion_components()
        };
        let entity = Entity::new(EntityKind::Ball, "Ball")
            .at(position)
            .with_size(self.config.ball.size)
            .with_components(components);
        self.spawn(entity)
    }

    /// Add a bed with its bottom-left corner at `position`.
    pub fn spawn_bed(&mut self, position: Vec2) -> SimResult<EntityId> {
        let entity = Entity::new(EntityKind::Bed, "Bed")
            .at(position)
            .with_size(self.config.bed.size)
            .with_components(self.motion_components());
        self.spawn(entity)
    }

    /// Remove an entity, first severing its holding pairs so the other side
    /// reacts as if let go.
    pub fn despawn(&mut self, id: EntityId) -> SimResult<()> {
        self.world.entity(id)?;
        if self.drag.is_some_and(|d| d.entity == id) {
            self.drag = None;
        }
        {
            let mut ctx = self.context();
            holding::release_held(&mut ctx, id);
            holding::release_from_holder(&mut ctx, id);
        }
        let (entity, _) = self.world.remove_entity(id)?;
        debug!("despawned {} {id}", entity.kind);
        self.context().emit(
            SimEventKind::Despawned { entity: id },
            format!("{id} is removed"),
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Systems and ticking
    // -----------------------------------------------------------------------

    /// Register a custom system. Custom systems run after the built-in
    /// interaction phase and before held entities are synced to their holders.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        let at = self.systems.len().saturating_sub(1);
        self.systems.insert(at, Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.init(&mut self.context());
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick of `dt` seconds.
    ///
    /// `dt` is sanitized first: negative or non-finite values become zero
    /// and anything above the configured `max_step` is clamped to it.
    pub fn tick(&mut self, dt: f32) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        let dt = sanitize_dt(dt, self.config.max_step);
        self.clock.advance(dt);

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = system.tick(&mut self.context());
            self.systems[i] = system;
            result?;
        }
        Ok(())
    }

    /// Advance the simulation by `n` ticks of `dt` seconds each.
    pub fn run(&mut self, n: u64, dt: f32) -> SimResult<()> {
        for _ in 0..n {
            self.tick(dt)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// The entity a press at `point` would pick up.
    pub fn pick_at(&self, point: Vec2) -> Option<EntityId> {
        drag::pick_at(&self.world, point)
    }

    /// Pick `id` up with the pointer at `point`, letting go of whatever was
    /// dragged before.
    pub fn begin_drag(&mut self, id: EntityId, point: Vec2) -> SimResult<()> {
        if self.world.entity(id)?.components.sway.is_none() {
            return Err(SimError::NotDraggable(id));
        }
        if self.drag.is_some() {
            self.end_drag()?;
        }
        let active = drag::begin_drag(&mut self.context(), id, point)?;
        self.drag = Some(active);
        Ok(())
    }

    /// Press at `point`: pick up whatever is there. Returns the picked entity.
    pub fn press(&mut self, point: Vec2) -> SimResult<Option<EntityId>> {
        let Some(id) = self.pick_at(point) else {
            return Ok(None);
        };
        self.begin_drag(id, point)?;
        Ok(Some(id))
    }

    /// Move the dragged entity with the pointer.
    pub fn drag_to(&mut self, point: Vec2) -> SimResult<()> {
        let active = self.drag.ok_or(SimError::NoActiveDrag)?;
        drag::drag_to(&mut self.world, &active, point)?;
        Ok(())
    }

    /// Let go of the dragged entity.
    pub fn end_drag(&mut self) -> SimResult<()> {
        let active = self.drag.take().ok_or(SimError::NoActiveDrag)?;
        drag::end_drag(&mut self.context(), active)
    }

    /// The entity under the pointer, if a drag is in progress.
    pub fn dragged(&self) -> Option<EntityId> {
        self.drag.map(|d| d.entity)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The simulated world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, bypassing the state machines.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The run's configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Behavioural state of actor `id`.
    pub fn actor_state(&self, id: EntityId) -> Option<ActorState> {
        actor::component(&self.world, id).map(|a| a.state)
    }

    /// Lifecycle state of ball `id`.
    pub fn ball_state(&self, id: EntityId) -> Option<BallState> {
        ball::component(&self.world, id).map(|b| b.state)
    }

    /// What `holder` holds.
    pub fn held_by(&self, holder: EntityId) -> Option<EntityId> {
        self.world.holding().held_by(holder)
    }

    /// Who holds `held`.
    pub fn holder_of(&self, held: EntityId) -> Option<EntityId> {
        self.world.holding().holder_of(held)
    }

    /// Draw snapshot of every entity, back to front.
    pub fn views(&self) -> Vec<EntityView> {
        view::views(&self.world)
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Extract the world, consuming the simulation.
    pub fn into_world(self) -> World {
        self.world
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Range;
    use crate::event::SimEvent;

    const DT: f32 = 1.0 / 60.0;

    /// A config whose actors stay idle until told otherwise.
    fn calm_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.actor.idle_time = Range::new(1000.0, 1000.0);
        config
    }

    fn empty(config: SimConfig) -> Simulation {
        Simulation::with_config(config).unwrap()
    }

    fn hold(sim: &mut Simulation, holder: EntityId, held: EntityId) -> bool {
        holding::start_holding(&mut sim.context(), holder, held)
    }

    fn ball_transitions(sim: &Simulation, id: EntityId) -> Vec<(u64, BallState)> {
        sim.events()
            .events()
            .iter()
            .filter_map(|e: &SimEvent| match e.kind {
                SimEventKind::BallStateChanged { entity, to, .. } if entity == id => {
                    Some((e.tick, to))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_scene_spawns_one_of_each() {
        let sim = Simulation::with_default_scene(SimConfig::default()).unwrap();
        assert_eq!(sim.world().count_of_kind(EntityKind::Actor), 1);
        assert_eq!(sim.world().count_of_kind(EntityKind::Ball), 1);
        assert_eq!(sim.world().count_of_kind(EntityKind::Bed), 1);
        assert_eq!(sim.current_tick(), 0);
        assert_eq!(sim.events().len(), 3);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SimConfig::default().with_max_step(-1.0);
        assert!(matches!(
            Simulation::with_config(config),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn tick_sanitizes_dt() {
        let mut sim = empty(SimConfig::default());
        sim.tick(5.0).unwrap();
        assert_eq!(sim.clock().dt(), 0.1);
        sim.tick(f32::NAN).unwrap();
        assert_eq!(sim.clock().dt(), 0.0);
        sim.tick(-1.0).unwrap();
        assert_eq!(sim.clock().dt(), 0.0);
        assert_eq!(sim.current_tick(), 3);
    }

    #[test]
    fn empty_world_no_crash() {
        let mut sim = empty(SimConfig::default());
        sim.run(100, DT).unwrap();
        assert_eq!(sim.current_tick(), 100);
    }

    #[test]
    fn holding_transfers_to_new_holder() {
        let mut sim = empty(calm_config());
        let a = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();
        let b = sim.spawn_actor(Vec2::new(500.0, 0.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(300.0, 300.0)).unwrap();

        assert!(hold(&mut sim, a, ball));
        assert_eq!(sim.holder_of(ball), Some(a));
        assert!(hold(&mut sim, b, ball));
        assert_eq!(sim.holder_of(ball), Some(b));
        assert_eq!(sim.held_by(a), None);
        assert_eq!(sim.held_by(b), Some(ball));
        assert!(sim.world().holding().is_consistent());
    }

    #[test]
    fn mismatched_kinds_cannot_hold() {
        let mut sim = empty(calm_config());
        let ball = sim.spawn_ball(Vec2::new(10.0, 10.0)).unwrap();
        let bed = sim.spawn_bed(Vec2::new(300.0, 0.0)).unwrap();
        assert!(!hold(&mut sim, bed, ball));
        assert!(!hold(&mut sim, ball, bed));
        assert!(sim.world().holding().is_empty());
    }

    #[test]
    fn held_entity_sits_at_hold_position_after_tick() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(200.0, 50.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(150.0, 60.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));
        sim.run(30, DT).unwrap();
        assert_eq!(sim.ball_state(ball), Some(BallState::Carried));

        sim.world_mut().set_position(guy, Vec2::new(400.0, 120.0)).unwrap();
        sim.tick(DT).unwrap();

        let expected = holding::hold_position(sim.world(), guy, ball).unwrap();
        assert_eq!(sim.world().get_entity(ball).unwrap().position(), expected);
        assert_eq!(expected, Vec2::new(390.0, 140.0));
    }

    #[test]
    fn catch_glides_then_carries() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(200.0, 0.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(100.0, 0.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));
        assert_eq!(sim.ball_state(ball), Some(BallState::BeingCaught));

        sim.run(10, DT).unwrap();
        let x = sim.world().get_entity(ball).unwrap().position().x;
        assert!(x > 100.0 && x < 190.0, "ball mid-glide at {x}");
        assert_eq!(sim.ball_state(ball), Some(BallState::BeingCaught));

        sim.run(10, DT).unwrap();
        assert_eq!(sim.ball_state(ball), Some(BallState::Carried));
    }

    #[test]
    fn resting_ball_snaps_to_pondering_actor() {
        let mut config = calm_config();
        config.actor.ponder_time = Range::new(1000.0, 1000.0);
        let mut sim = empty(config);
        let guy = sim.spawn_actor(Vec2::new(200.0, 0.0)).unwrap();
        actor::set_state(&mut sim.context(), guy, ActorState::Pondering);
        let ball = sim.spawn_ball(Vec2::new(250.0, 0.0)).unwrap();

        sim.tick(DT).unwrap();
        assert_eq!(sim.holder_of(ball), Some(guy));
        assert_eq!(sim.ball_state(ball), Some(BallState::BeingCaught));

        sim.run(20, DT).unwrap();
        assert_eq!(sim.ball_state(ball), Some(BallState::Carried));
    }

    #[test]
    fn ball_tossed_from_the_floor_settles_and_snaps() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(200.0, 0.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(270.0, 0.0)).unwrap();
        crate::motion::launch(&mut sim.context(), ball, Vec2::new(0.0, 150.0));

        for _ in 0..600 {
            sim.tick(DT).unwrap();
            if sim.holder_of(ball).is_some() {
                break;
            }
        }
        assert_eq!(sim.holder_of(ball), Some(guy));
        assert!(!sim.world().get_entity(ball).unwrap().has_active_physics());
    }

    #[test]
    fn arc_drop_near_idle_actor_is_caught_again() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(300.0, 100.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(300.0, 100.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));
        sim.run(30, DT).unwrap();
        assert_eq!(sim.ball_state(ball), Some(BallState::Carried));

        let dropped = holding::drop_with_physics(&mut sim.context(), guy);
        assert_eq!(dropped, Some(ball));
        assert_eq!(sim.ball_state(ball), Some(BallState::Free));
        let from = sim.events().total();

        for _ in 0..600 {
            sim.tick(DT).unwrap();
            if sim.ball_state(ball) == Some(BallState::Carried) {
                break;
            }
        }
        assert_eq!(sim.ball_state(ball), Some(BallState::Carried));
        assert_eq!(sim.holder_of(ball), Some(guy));

        let recent: Vec<(u64, BallState)> = ball_transitions(&sim, ball)
            .into_iter()
            .filter(|(tick, _)| *tick > 30)
            .collect();
        let caught = recent
            .iter()
            .find(|(_, s)| *s == BallState::BeingCaught)
            .map(|(t, _)| *t)
            .unwrap();
        let carried = recent
            .iter()
            .find(|(_, s)| *s == BallState::Carried)
            .map(|(t, _)| *t)
            .unwrap();
        let glide = (carried - caught) as f32 * DT;
        assert!(glide <= sim.config().ball.catch_duration + DT, "glide took {glide}");
        assert!(sim.events().since(from).iter().any(|e| matches!(
            e.kind,
            SimEventKind::HoldingStarted { held, .. } if held == ball
        )));
    }

    #[test]
    fn zero_throw_probability_never_throws() {
        let mut config = SimConfig::default().with_seed(11);
        config.actor.throw_probability = 0.0;
        config.actor.idle_time = Range::new(0.2, 0.5);
        let mut sim = empty(config);
        let guy = sim.spawn_actor(Vec2::new(300.0, 100.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(300.0, 100.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));

        sim.run(6000, 0.05).unwrap();

        assert!(
            !sim.events()
                .events()
                .iter()
                .any(|e| matches!(e.kind, SimEventKind::Thrown { .. }))
        );
        assert!(!sim.events().events().iter().any(|e| matches!(
            e.kind,
            SimEventKind::ActorStateChanged {
                to: ActorState::Throwing,
                ..
            }
        )));
        assert_eq!(sim.holder_of(ball), Some(guy));
    }

    #[test]
    fn certain_throw_launches_ball_and_sets_cooldown() {
        let mut config = SimConfig::default().with_seed(3);
        config.actor.throw_probability = 1.0;
        config.actor.idle_time = Range::new(0.5, 0.5);
        let mut sim = empty(config);
        let guy = sim.spawn_actor(Vec2::new(300.0, 100.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(300.0, 100.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));

        let mut thrown = false;
        for _ in 0..200 {
            sim.tick(0.05).unwrap();
            if sim.actor_state(guy) == Some(ActorState::Throwing) {
                thrown = true;
                break;
            }
        }
        assert!(thrown);
        assert_eq!(sim.holder_of(ball), None);
        assert_eq!(sim.ball_state(ball), Some(BallState::Free));
        assert!(sim.world().get_entity(ball).unwrap().has_active_physics());
        let cooldown = actor::component(sim.world(), guy).unwrap().pickup_cooldown;
        assert!(cooldown > 1.9);
    }

    #[test]
    fn bed_drag_evicts_sleeper_before_moving() {
        let mut sim = empty(calm_config());
        let bed = sim.spawn_bed(Vec2::new(600.0, 0.0)).unwrap();
        let guy = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();
        assert!(hold(&mut sim, bed, guy));
        assert_eq!(sim.actor_state(guy), Some(ActorState::SleepingInBed));
        let sleeping_at = sim.world().get_entity(guy).unwrap().position();
        assert_eq!(sleeping_at, Vec2::new(610.0, 10.0));

        sim.begin_drag(bed, Vec2::new(630.0, 40.0)).unwrap();
        assert_eq!(sim.holder_of(guy), None);
        assert_eq!(sim.actor_state(guy), Some(ActorState::Idle));

        sim.drag_to(Vec2::new(200.0, 300.0)).unwrap();
        sim.tick(DT).unwrap();
        assert_eq!(sim.world().get_entity(guy).unwrap().position(), sleeping_at);
        assert_eq!(
            sim.world().get_entity(bed).unwrap().position(),
            Vec2::new(170.0, 260.0)
        );
    }

    #[test]
    fn dragged_bed_carries_actor_until_let_go() {
        let mut sim = empty(calm_config());
        let bed = sim.spawn_bed(Vec2::new(600.0, 0.0)).unwrap();
        let guy = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();

        sim.begin_drag(bed, Vec2::new(630.0, 40.0)).unwrap();
        sim.drag_to(Vec2::new(130.0, 40.0)).unwrap();
        sim.tick(DT).unwrap();
        assert_eq!(sim.holder_of(guy), Some(bed));
        assert_eq!(sim.actor_state(guy), Some(ActorState::CarriedByBed));

        sim.drag_to(Vec2::new(330.0, 140.0)).unwrap();
        sim.tick(DT).unwrap();
        let expected = holding::hold_position(sim.world(), bed, guy).unwrap();
        assert_eq!(sim.world().get_entity(guy).unwrap().position(), expected);
        assert_eq!(sim.actor_state(guy), Some(ActorState::CarriedByBed));

        sim.end_drag().unwrap();
        assert_eq!(sim.holder_of(guy), None);
        assert_eq!(sim.actor_state(guy), Some(ActorState::Idle));
        let cooldown = actor::component(sim.world(), guy).unwrap().bed_cooldown;
        assert!(cooldown > 0.0);

        sim.tick(DT).unwrap();
        assert_eq!(sim.holder_of(guy), None);
    }

    #[test]
    fn later_mood_replaces_longer_bubble() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();
        crate::mood::offer(&mut sim.context(), guy, crate::mood::SLEEPING.lasting(60.0));
        let short = crate::mood::MoodCue {
            mood: lg_core::Mood::Excited,
            chance: 1.0,
            duration: 0.5,
        };
        crate::mood::offer(&mut sim.context(), guy, short);

        let bubble = actor::component(sim.world(), guy).unwrap().mood.unwrap();
        assert_eq!(bubble.mood, lg_core::Mood::Excited);
        assert!(bubble.remaining <= 0.5);
    }

    #[test]
    fn actor_dropped_on_bed_falls_asleep() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();
        let bed = sim.spawn_bed(Vec2::new(400.0, 0.0)).unwrap();

        sim.begin_drag(guy, Vec2::new(120.0, 48.0)).unwrap();
        assert_eq!(sim.actor_state(guy), Some(ActorState::PickedUp));
        sim.drag_to(Vec2::new(430.0, 60.0)).unwrap();
        sim.end_drag().unwrap();

        assert_eq!(sim.holder_of(guy), Some(bed));
        assert_eq!(sim.actor_state(guy), Some(ActorState::SleepingInBed));
        assert_eq!(sim.dragged(), None);
    }

    #[test]
    fn sleeper_wakes_after_sleep_time_with_cooldown() {
        let mut config = calm_config();
        config.actor.bed_sleep_time = 1.0;
        let mut sim = empty(config);
        let bed = sim.spawn_bed(Vec2::new(400.0, 0.0)).unwrap();
        let guy = sim.spawn_actor(Vec2::new(410.0, 10.0)).unwrap();
        assert!(hold(&mut sim, bed, guy));

        sim.run(30, 0.05).unwrap();

        assert_eq!(sim.holder_of(guy), None);
        assert_eq!(sim.actor_state(guy), Some(ActorState::Idle));
        let cooldown = actor::component(sim.world(), guy).unwrap().bed_cooldown;
        assert!(cooldown > 9.0);
    }

    #[test]
    fn dragging_actor_drops_its_ball() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(300.0, 100.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(300.0, 100.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));
        sim.run(30, DT).unwrap();

        sim.begin_drag(guy, Vec2::new(320.0, 148.0)).unwrap();
        assert_eq!(sim.held_by(guy), None);
        assert_eq!(sim.ball_state(ball), Some(BallState::Free));
        assert!(sim.world().get_entity(ball).unwrap().has_active_physics());
        assert!(sim.world().get_entity(guy).unwrap().is_dragged());

        sim.end_drag().unwrap();
        assert_eq!(sim.actor_state(guy), Some(ActorState::Idle));
        assert!(!sim.world().get_entity(guy).unwrap().is_dragged());
    }

    #[test]
    fn fast_release_throws_ball() {
        let mut sim = empty(calm_config());
        let ball = sim.spawn_ball(Vec2::new(100.0, 100.0)).unwrap();
        sim.begin_drag(ball, Vec2::new(110.0, 110.0)).unwrap();
        assert_eq!(sim.ball_state(ball), Some(BallState::PickedUp));
        for step in 1..=5 {
            sim.drag_to(Vec2::new(110.0 + 10.0 * step as f32, 110.0)).unwrap();
            sim.tick(DT).unwrap();
        }
        sim.end_drag().unwrap();

        assert_eq!(sim.ball_state(ball), Some(BallState::Free));
        let entity = sim.world().get_entity(ball).unwrap();
        let body = entity.components.physics.as_ref().unwrap();
        assert!(body.is_active());
        assert!(body.velocity().x > 100.0);
        assert!(body.velocity().y >= 50.0);
    }

    #[test]
    fn drag_api_errors() {
        let mut sim = empty(calm_config());
        assert!(matches!(sim.end_drag(), Err(SimError::NoActiveDrag)));
        assert!(matches!(
            sim.drag_to(Vec2::ZERO),
            Err(SimError::NoActiveDrag)
        ));
        assert!(matches!(
            sim.begin_drag(EntityId(99), Vec2::ZERO),
            Err(SimError::Core(_))
        ));
        let bare = sim
            .world_mut()
            .add_entity(Entity::new(EntityKind::Ball, "Pebble").with_size(Vec2::new(5.0, 5.0)))
            .unwrap();
        assert!(matches!(
            sim.begin_drag(bare, Vec2::ZERO),
            Err(SimError::NotDraggable(_))
        ));
    }

    #[test]
    fn second_drag_ends_the_first() {
        let mut sim = empty(calm_config());
        let a = sim.spawn_ball(Vec2::new(100.0, 100.0)).unwrap();
        let b = sim.spawn_ball(Vec2::new(500.0, 100.0)).unwrap();
        sim.begin_drag(a, Vec2::new(110.0, 110.0)).unwrap();
        sim.begin_drag(b, Vec2::new(510.0, 110.0)).unwrap();
        assert_eq!(sim.dragged(), Some(b));
        assert_eq!(sim.ball_state(a), Some(BallState::Free));
        assert!(!sim.world().get_entity(a).unwrap().is_dragged());
    }

    #[test]
    fn pick_prefers_ball_over_actor() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(110.0, 10.0)).unwrap();
        assert_eq!(sim.pick_at(Vec2::new(115.0, 15.0)), Some(ball));
        assert_eq!(sim.pick_at(Vec2::new(130.0, 50.0)), Some(guy));
        assert_eq!(sim.pick_at(Vec2::new(700.0, 500.0)), None);
    }

    #[test]
    fn press_picks_and_drags() {
        let mut sim = empty(calm_config());
        let bed = sim.spawn_bed(Vec2::new(100.0, 0.0)).unwrap();
        assert_eq!(sim.press(Vec2::new(130.0, 40.0)).unwrap(), Some(bed));
        assert_eq!(sim.dragged(), Some(bed));
        assert_eq!(sim.press(Vec2::new(700.0, 500.0)).unwrap(), None);
    }

    #[test]
    fn despawn_releases_pairs() {
        let mut sim = empty(calm_config());
        let guy = sim.spawn_actor(Vec2::new(300.0, 100.0)).unwrap();
        let ball = sim.spawn_ball(Vec2::new(300.0, 100.0)).unwrap();
        assert!(hold(&mut sim, guy, ball));

        sim.despawn(guy).unwrap();
        assert_eq!(sim.holder_of(ball), None);
        assert_eq!(sim.ball_state(ball), Some(BallState::Free));
        assert!(sim.world().get_entity(guy).is_none());
        assert!(sim.despawn(guy).is_err());
        assert!(
            sim.events()
                .events()
                .iter()
                .any(|e| e.kind == SimEventKind::Despawned { entity: guy })
        );
    }

    #[test]
    fn custom_system_registration() {
        #[derive(Debug)]
        struct CustomSystem {
            ticked: bool,
        }
        impl System for CustomSystem {
            fn name(&self) -> &str {
                "custom"
            }
            fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
                self.ticked = true;
                Ok(())
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        let mut sim = empty(SimConfig::default());
        sim.add_system(CustomSystem { ticked: false });
        sim.tick(DT).unwrap();

        let custom = sim.get_system::<CustomSystem>().unwrap();
        assert!(custom.ticked);
        let names: Vec<&str> = sim.systems.iter().map(|s| s.name()).collect();
        assert_eq!(names.last(), Some(&"holding-sync"));
        assert_eq!(names[names.len() - 2], "custom");
    }

    #[test]
    fn failing_system_surfaces_error() {
        #[derive(Debug)]
        struct Broken;
        impl System for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
                Err(SimError::SystemError("boom".into()))
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        let mut sim = empty(SimConfig::default());
        sim.add_system(Broken);
        assert!(matches!(sim.tick(DT), Err(SimError::SystemError(_))));
        assert!(sim.get_system::<Broken>().is_some());
    }

    #[test]
    fn deterministic_with_same_seed() {
        let run = || {
            let mut sim =
                Simulation::with_default_scene(SimConfig::default().with_seed(123)).unwrap();
            sim.run(1800, DT).unwrap();
            let log: Vec<String> = sim
                .events()
                .events()
                .iter()
                .map(|e| e.description.clone())
                .collect();
            let positions: Vec<Vec2> = sim.views().iter().map(|v| v.position).collect();
            (log, positions)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn long_run_keeps_invariants() {
        let mut sim = Simulation::with_default_scene(SimConfig::default().with_seed(5)).unwrap();
        let bounds = sim.world().bounds();
        for _ in 0..6000 {
            sim.tick(DT).unwrap();
            assert!(sim.world().holding().is_consistent());
            for entity in sim.world().entities() {
                let p = entity.position();
                assert!(p.x >= 0.0 && p.y >= 0.0);
                assert!(p.x + entity.size.x <= bounds.x + 1e-3);
                assert!(p.y + entity.size.y <= bounds.y + 1e-3);
            }
        }
    }

    #[test]
    fn views_are_back_to_front() {
        let sim = Simulation::with_default_scene(SimConfig::default()).unwrap();
        let views = sim.views();
        let kinds: Vec<EntityKind> = views.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Bed, EntityKind::Actor, EntityKind::Ball]
        );
    }
}
