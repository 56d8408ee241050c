//! Month navigation
//!
//! The discrete control loop over the table: one live simulation at a
//! time, rebuilt from scratch whenever the month changes. Navigation
//! validates the target row before touching anything, so a bad row or a
//! step past either end of the table leaves the current world running.
//!
//! One quirk is deliberate: the first navigation collapses wall_length to
//! zero and it stays collapsed until reset(), so every month after the
//! first is sieved only by the floor.

use crate::config::SimConfig;
use crate::data::{DataTable, RowFields};
use crate::error::{Error, Result};
use crate::scale;
use crate::scene::build_scene;
use crate::sim::{SimPhase, Simulation, StepMetrics, StepRunner};

/// Makes a fresh runner for every (re)build
pub type RunnerFactory = Box<dyn FnMut() -> Box<dyn StepRunner>>;

/// Owns the table, the month cursor and the live simulation
pub struct MonthNavigator {
    table: DataTable,
    cfg: SimConfig,
    base_seed: u64,
    make_runner: RunnerFactory,
    month: usize,
    wall_length: f32,
    sim: Option<Simulation>,
}

impl std::fmt::Debug for MonthNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonthNavigator")
            .field("table", &self.table)
            .field("cfg", &self.cfg)
            .field("base_seed", &self.base_seed)
            .field("month", &self.month)
            .field("wall_length", &self.wall_length)
            .finish_non_exhaustive()
    }
}

impl MonthNavigator {
    /// Boot the session at month 0: full-length walls, no balls falling.
    ///
    /// Fails if the config is unusable, the table is empty, or month 0
    /// itself is malformed.
    pub fn new(
        table: DataTable,
        cfg: SimConfig,
        base_seed: u64,
        make_runner: RunnerFactory,
    ) -> Result<Self> {
        cfg.validate()?;
        let wall_length = cfg.wall_length;
        let mut nav = Self {
            table,
            cfg,
            base_seed,
            make_runner,
            month: 0,
            wall_length,
            sim: None,
        };
        let fields = nav.table.fields(0)?;
        nav.rebuild(0, &fields, false)?;
        Ok(nav)
    }

    pub fn month(&self) -> usize {
        self.month
    }

    pub fn month_count(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn wall_length(&self) -> f32 {
        self.wall_length
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    /// Latest step metrics of the live simulation
    pub fn metrics(&self) -> StepMetrics {
        self.sim
            .as_ref()
            .map(|sim| sim.metrics())
            .unwrap_or_default()
    }

    pub fn phase(&self) -> SimPhase {
        self.sim
            .as_ref()
            .map(|sim| sim.phase())
            .unwrap_or(SimPhase::Idle)
    }

    /// Step the live simulation once
    pub fn step(&mut self) -> Option<StepMetrics> {
        self.sim.as_mut()?.step()
    }

    /// Move to the next month and drop its batch of balls
    pub fn advance(&mut self) -> Result<()> {
        self.navigate(self.month as i64 + 1)
    }

    /// Move to the previous month and drop its batch of balls
    pub fn retreat(&mut self) -> Result<()> {
        self.navigate(self.month as i64 - 1)
    }

    /// Back to month 0 with full-length walls, as if freshly booted
    pub fn reset(&mut self) -> Result<()> {
        self.wall_length = self.cfg.wall_length;
        let fields = self.table.fields(0)?;
        self.rebuild(0, &fields, false)
    }

    /// Validate the target month, then tear the old world down and build
    /// the new one. Any validation failure leaves the session untouched.
    fn navigate(&mut self, target: i64) -> Result<()> {
        let fields = self.table.fields(target)?;
        if fields.spawn_count < 0 {
            return Err(Error::InvalidSpawnCount {
                count: fields.spawn_count,
            });
        }
        // Navigation clears the previous layout by collapsing the walls
        self.wall_length = 0.0;
        self.rebuild(target as usize, &fields, true)
    }

    /// Last-writer-wins rebuild: teardown strictly before the new create
    fn rebuild(&mut self, month: usize, fields: &RowFields, spawn: bool) -> Result<()> {
        let fraction = scale(
            fields.price,
            self.cfg.price_min,
            self.cfg.price_max,
            self.cfg.bar_fraction_at_min,
            self.cfg.bar_fraction_at_max,
        )?;

        if let Some(mut old) = self.sim.take() {
            old.teardown();
        }

        let scene = build_scene(self.cfg.width, self.cfg.height, self.wall_length, fraction);
        let mut sim = Simulation::create(&self.cfg, self.base_seed.wrapping_add(month as u64));
        sim.seed(&scene)?;
        sim.start((self.make_runner)())?;
        let spawned = if spawn {
            sim.spawn(fields.spawn_count, self.cfg.width, self.cfg.spawn_height_fraction)?
        } else {
            0
        };

        self.sim = Some(sim);
        self.month = month;
        log::info!(
            "month {month} live: price {:.1}, bar fraction {fraction:.4}, {spawned} balls",
            fields.price
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingRunner;

    impl StepRunner for CountingRunner {
        fn start(&mut self) {}
        fn stop(&mut self) {}
        fn rate(&self) -> f32 {
            60.0
        }
    }

    fn factory() -> RunnerFactory {
        Box::new(|| Box::new(CountingRunner))
    }

    fn counting_factory() -> (RunnerFactory, Rc<Cell<usize>>) {
        let created = Rc::new(Cell::new(0));
        let handle = created.clone();
        let factory: RunnerFactory = Box::new(move || {
            handle.set(handle.get() + 1);
            Box::new(CountingRunner)
        });
        (factory, created)
    }

    fn month_row(price: &str, count: &str) -> crate::data::DataRow {
        vec![
            json!("label"),
            json!(""),
            json!(""),
            json!(price),
            json!(count),
            json!(""),
        ]
    }

    fn table() -> DataTable {
        DataTable::from_values(vec![
            month_row("71.3", "12"),
            month_row("80.0", "5"),
            month_row("103.9", "20"),
        ])
    }

    fn navigator() -> MonthNavigator {
        MonthNavigator::new(table(), SimConfig::default(), 99, factory()).unwrap()
    }

    #[test]
    fn test_boot_is_month_zero_with_full_walls_and_no_balls() {
        let nav = navigator();
        assert_eq!(nav.month(), 0);
        assert_eq!(nav.wall_length(), 500.0);
        assert_eq!(nav.phase(), SimPhase::Running);
        let world = nav.simulation().unwrap().world();
        assert_eq!(world.barrier_count(), 9);
        assert_eq!(world.ball_count(), 0);
        // Boot keeps the side walls at full height
        assert_eq!(world.barriers()[7].pos.y, 350.0);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let err = MonthNavigator::new(
            DataTable::from_values(vec![]),
            SimConfig::default(),
            99,
            factory(),
        )
        .unwrap_err();
        assert_eq!(err, Error::MonthOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let mut cfg = SimConfig::default();
        cfg.price_max = cfg.price_min;
        let err = MonthNavigator::new(table(), cfg, 99, factory()).unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { .. }));
    }

    #[test]
    fn test_advance_collapses_walls_and_drops_the_batch() {
        let mut nav = navigator();
        nav.advance().unwrap();
        assert_eq!(nav.month(), 1);
        assert_eq!(nav.wall_length(), 0.0);
        let world = nav.simulation().unwrap().world();
        assert_eq!(world.barrier_count(), 9);
        assert_eq!(world.ball_count(), 5);
        // Collapsed layout: zero-length bars and walls, full floor
        assert_eq!(world.barriers()[0].shape, crate::sim::BodyShape::Rect {
            half: glam::Vec2::new(0.0, 12.5)
        });
    }

    #[test]
    fn test_each_navigation_gets_a_fresh_runner() {
        let (factory, created) = counting_factory();
        let mut nav = MonthNavigator::new(table(), SimConfig::default(), 99, factory).unwrap();
        assert_eq!(created.get(), 1);
        nav.advance().unwrap();
        assert_eq!(created.get(), 2);
        nav.retreat().unwrap();
        assert_eq!(created.get(), 3);
    }

    #[test]
    fn test_retreat_from_month_zero_changes_nothing() {
        let mut nav = navigator();
        let err = nav.retreat().unwrap_err();
        assert_eq!(err, Error::MonthOutOfRange { index: -1, len: 3 });
        assert_eq!(nav.month(), 0);
        assert_eq!(nav.wall_length(), 500.0);
        assert_eq!(nav.phase(), SimPhase::Running);
        assert_eq!(nav.simulation().unwrap().world().barrier_count(), 9);
    }

    #[test]
    fn test_advance_past_the_last_month_changes_nothing() {
        let mut nav = navigator();
        nav.advance().unwrap();
        nav.advance().unwrap();
        assert_eq!(nav.month(), 2);
        let balls_before = nav.simulation().unwrap().world().ball_count();

        let err = nav.advance().unwrap_err();
        assert_eq!(err, Error::MonthOutOfRange { index: 3, len: 3 });
        assert_eq!(nav.month(), 2);
        assert_eq!(nav.simulation().unwrap().world().ball_count(), balls_before);
        assert_eq!(nav.phase(), SimPhase::Running);
    }

    #[test]
    fn test_malformed_target_month_changes_nothing() {
        let mut nav = MonthNavigator::new(
            DataTable::from_values(vec![month_row("71.3", "12"), month_row("n/a", "5")]),
            SimConfig::default(),
            99,
            factory(),
        )
        .unwrap();

        let err = nav.advance().unwrap_err();
        assert!(matches!(err, Error::MalformedRow { row: 1, column: 3, .. }), "{err:?}");
        assert_eq!(nav.month(), 0);
        assert_eq!(nav.wall_length(), 500.0);
        assert_eq!(nav.phase(), SimPhase::Running);
    }

    #[test]
    fn test_negative_ball_count_changes_nothing() {
        let mut nav = MonthNavigator::new(
            DataTable::from_values(vec![month_row("71.3", "12"), month_row("80.0", "-4")]),
            SimConfig::default(),
            99,
            factory(),
        )
        .unwrap();

        let err = nav.advance().unwrap_err();
        assert_eq!(err, Error::InvalidSpawnCount { count: -4 });
        assert_eq!(nav.month(), 0);
        assert_eq!(nav.wall_length(), 500.0);
    }

    #[test]
    fn test_walls_stay_collapsed_after_the_first_navigation() {
        let mut nav = navigator();
        nav.advance().unwrap();
        nav.advance().unwrap();
        assert_eq!(nav.wall_length(), 0.0);
        nav.retreat().unwrap();
        assert_eq!(nav.wall_length(), 0.0);
    }

    #[test]
    fn test_reset_restores_the_boot_state() {
        let mut nav = navigator();
        nav.advance().unwrap();
        nav.advance().unwrap();
        nav.reset().unwrap();
        assert_eq!(nav.month(), 0);
        assert_eq!(nav.wall_length(), 500.0);
        let world = nav.simulation().unwrap().world();
        assert_eq!(world.ball_count(), 0);
        // Bars are back at month 0's full price-derived length
        let fraction = crate::scale(71.3, 52.0, 108.0, 0.23, 0.1).unwrap();
        let crate::sim::BodyShape::Rect { half } = world.barriers()[0].shape else {
            panic!("expected a rect");
        };
        assert!((half.x - 500.0 * fraction / 2.0).abs() < 1e-3, "got {}", half.x);
    }

    #[test]
    fn test_stepping_through_the_navigator() {
        let mut nav = navigator();
        nav.advance().unwrap();
        let metrics = nav.step().unwrap();
        assert_eq!(metrics.bodies, 14);
        assert_eq!(metrics.step_rate, 60.0);
        assert_eq!(nav.metrics(), metrics);
    }

    #[test]
    fn test_same_seed_same_month_same_balls() {
        let mut a = MonthNavigator::new(table(), SimConfig::default(), 7, factory()).unwrap();
        let mut b = MonthNavigator::new(table(), SimConfig::default(), 7, factory()).unwrap();
        a.advance().unwrap();
        b.advance().unwrap();
        for _ in 0..30 {
            a.step();
            b.step();
        }
        let xs_a: Vec<glam::Vec2> = a
            .simulation()
            .unwrap()
            .world()
            .balls()
            .iter()
            .map(|x| x.pos)
            .collect();
        let xs_b: Vec<glam::Vec2> = b
            .simulation()
            .unwrap()
            .world()
            .balls()
            .iter()
            .map(|x| x.pos)
            .collect();
        assert_eq!(xs_a, xs_b);
    }

    #[test]
    fn test_retreat_reseeds_the_earlier_month() {
        let mut nav = navigator();
        nav.advance().unwrap();
        nav.advance().unwrap();
        nav.retreat().unwrap();
        assert_eq!(nav.month(), 1);
        // Month 1 drops its own batch again
        assert_eq!(nav.simulation().unwrap().world().ball_count(), 5);
    }
}
