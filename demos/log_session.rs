//! Record a short demo session into ./demo-volume and print the layout.
//!
//! Run with: `cargo run --example log_session`

use laplog::{Clock, FsVolume, LoggerConfig, SessionLogger, SystemClock};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laplog=debug".into()),
        )
        .init();

    let mut logger =
        SessionLogger::new(FsVolume::new("demo-volume"), SystemClock::new(), LoggerConfig::default())?;
    logger.init()?;
    let session = logger.start_new_session()?;
    println!("started session S{}", session);

    // Simulated race: three laps and a reaction capture for driver 1.
    let laps = [45_230u32, 44_810, 45_002];
    let mut best = u32::MAX;
    for (i, lap_ms) in laps.iter().enumerate() {
        best = best.min(*lap_ms);
        logger.log_lap(1, i as u16 + 1, *lap_ms, best, laps.len() as u16);
    }
    logger.log_rt(1, 412, 412);

    // Housekeeping loop: drain everything and refresh the summary.
    let now = logger.clock().uptime_ms();
    logger.tick(now + 400);
    logger.tick(now + 2_400);

    let stats = logger
        .driver_stats(1)
        .ok_or_else(|| anyhow::anyhow!("driver slot 1 missing"))?;
    println!(
        "driver 1: {} laps, best {} ms (lap {}), best RT {} ms, dropped {}",
        stats.lap_count,
        stats.best_lap_ms,
        stats.best_lap_index,
        stats.best_rt_ms,
        logger.dropped_lines()
    );
    println!("wrote demo-volume/LAPLOG/sessions/S{}/", session);
    Ok(())
}
