//! Breadfall demo binary
//!
//! Steps the sieve through each month of a table (a JSON file passed as
//! the first argument, or a small built-in sample) and prints the
//! HUD-facing counters. Rendering is someone else's job; this just shows
//! the numbers a renderer would draw.

use std::cell::Cell;
use std::time::{Duration, Instant};

use serde_json::json;

use breadfall::consts::STEP_DT;
use breadfall::{DataTable, MonthNavigator, SimConfig, StepRunner};

/// Wall-clock runner. The simulation asks for the rate exactly once per
/// step, so the spacing between rate() calls is the real frame interval.
struct FrameRunner {
    running: bool,
    prev: Cell<Option<Instant>>,
}

impl FrameRunner {
    fn new() -> Self {
        Self {
            running: false,
            prev: Cell::new(None),
        }
    }
}

impl StepRunner for FrameRunner {
    fn start(&mut self) {
        self.running = true;
        self.prev.set(None);
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn rate(&self) -> f32 {
        if !self.running {
            return 0.0;
        }
        let now = Instant::now();
        let rate = match self.prev.get() {
            Some(prev) => {
                let dt = (now - prev).as_secs_f32();
                if dt > 0.0 { 1.0 / dt } else { 0.0 }
            }
            None => 0.0,
        };
        self.prev.set(Some(now));
        rate
    }
}

/// A year of sample months: [label, item, currency, price, balls, note]
fn sample_table() -> DataTable {
    let rows = [
        ("2019-01", "71.3", "12"),
        ("2019-02", "72.1", "8"),
        ("2019-03", "74.9", "16"),
        ("2019-04", "78.2", "11"),
        ("2019-05", "80.0", "5"),
        ("2019-06", "83.6", "19"),
        ("2019-07", "87.4", "14"),
        ("2019-08", "90.1", "9"),
        ("2019-09", "94.8", "22"),
        ("2019-10", "99.5", "13"),
        ("2019-11", "103.9", "17"),
        ("2019-12", "107.2", "25"),
    ];
    DataTable::from_values(
        rows.iter()
            .map(|(label, price, count)| {
                vec![
                    json!(label),
                    json!("bread, white, sliced"),
                    json!("pence"),
                    json!(price),
                    json!(count),
                    json!(""),
                ]
            })
            .collect(),
    )
}

fn month_label(nav: &MonthNavigator) -> String {
    nav.table()
        .row(nav.month())
        .and_then(|row| row.first())
        .and_then(|cell| cell.as_str())
        .unwrap_or("?")
        .to_owned()
}

/// Run the live month for a while, printing the counters twice a second
fn run_month(nav: &mut MonthNavigator, frames: usize) {
    let label = month_label(nav);
    for frame in 0..frames {
        std::thread::sleep(Duration::from_secs_f32(STEP_DT));
        if let Some(metrics) = nav.step() {
            if (frame + 1) % 30 == 0 {
                println!(
                    "  [{label}] bodies {:>3}  step rate {:>6.1}",
                    metrics.bodies, metrics.step_rate
                );
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let table = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading table from {path}");
            DataTable::from_json_str(&std::fs::read_to_string(&path)?)?
        }
        None => {
            log::info!("no table given, using the built-in sample");
            sample_table()
        }
    };
    let seed = 0xB4EADu64;
    let mut nav = MonthNavigator::new(
        table,
        SimConfig::default(),
        seed,
        Box::new(|| Box::new(FrameRunner::new())),
    )?;

    println!("breadfall: {} months, seed {seed:#x}", nav.month_count());
    println!("[{}] walls up, nothing falling yet", month_label(&nav));
    run_month(&mut nav, 30);

    // Walk the months; a rejected navigation keeps the current month live
    loop {
        match nav.advance() {
            Ok(()) => run_month(&mut nav, 60),
            Err(err) => {
                log::info!("navigation stops: {err}");
                break;
            }
        }
    }
    println!(
        "[{}] last month reached, {} bodies live",
        month_label(&nav),
        nav.metrics().bodies
    );

    nav.reset()?;
    let balls = nav
        .simulation()
        .map(|sim| sim.world().ball_count())
        .unwrap_or(0);
    println!("[{}] reset: walls back up, {balls} balls", month_label(&nav));

    Ok(())
}
