use anyhow::Result;
use clap::Parser;
use growth_common::{SessionSnapshot, SimulationConfig};
use growth_engine::SimulationController;
use log::{debug, error, info, trace};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Headless batch runner for the microbial colony growth engine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override [timing].total_steps from the config
    #[arg(long)]
    steps: Option<u32>,

    /// Override the dispersal RNG seed for a replayable run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Colony Growth Engine...");

    // --- Load Configuration ---
    let config = SimulationConfig::load(&args.config)?;
    let params = config.get_sim_params();
    debug!("Simulation Parameters: {:#?}", params);

    let total_steps = args.steps.unwrap_or(config.timing.total_steps);
    let record_interval_steps = config.timing.record_interval_steps.max(1);
    let seed = args.seed.or(config.dispersal.seed);

    // --- Initialize Session ---
    let mut controller = SimulationController::new(params, seed)?;
    info!(
        "Session initialized: {0}x{0} lattice, agitation every {1} steps.",
        params.dimension, params.agitation_interval
    );

    // --- Initial Snapshot (step = 0) ---
    let mut recorded: Vec<SessionSnapshot> = Vec::new();
    recorded.push(controller.snapshot());

    info!("Starting simulation loop for {} steps...", total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        controller.tick();
        let step_duration = step_start_time.elapsed();

        // Print status periodically
        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status =
            current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step == total_steps - 1;

        if should_print_status || is_record_step || is_last_step {
            info!(
                "Step [{}/{}] | Population static/brownian/agitation: {}/{}/{} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                controller.static_run().lattice.population(),
                controller.brownian_run().lattice.population(),
                controller.agitation_run().lattice.population(),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;

            if is_record_step || is_last_step {
                recorded.push(controller.snapshot());
            }
        } else {
            trace!(
                "Step [{}/{}] completed in {:.2} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds ({} recorded snapshots).",
        total_duration.as_secs_f64(),
        recorded.len()
    );

    // --- Report Growth Metrics ---
    let final_snapshot = controller.snapshot();
    for run in [
        &final_snapshot.static_run,
        &final_snapshot.brownian_run,
        &final_snapshot.agitation_run,
    ] {
        info!(
            "{:?}: max growth rate {:.3} /step | doubling time {:.2} steps",
            run.mode, run.metrics.max_rate, run.metrics.doubling_time
        );
    }

    // --- Save Growth Histories ---
    if config.output.save_histories {
        let filename = format!("{}_histories.csv", config.output.base_filename);
        let mut writer = csv::Writer::from_path(&filename)?;
        writer.write_record(["step", "log_nb_static", "log_nb_brownian", "log_nb_agitation"])?;
        for idx in 0..final_snapshot.static_run.history.len() {
            writer.write_record([
                final_snapshot.static_run.history[idx].step.to_string(),
                format!("{:.6}", final_snapshot.static_run.history[idx].log_population),
                format!("{:.6}", final_snapshot.brownian_run.history[idx].log_population),
                format!("{:.6}", final_snapshot.agitation_run.history[idx].log_population),
            ])?;
        }
        writer.flush()?;
        info!("Growth histories saved to {}", filename);
    } else {
        info!("Skipping history export as per config (save_histories is false).");
    }

    // --- Save Recorded Snapshots ---
    if config.output.save_snapshots {
        let output_format = config.output.format.as_deref().unwrap_or("json");
        save_snapshots(output_format, &config.output.base_filename, &recorded)?;
    } else {
        info!("Skipping snapshot export as per config (save_snapshots is false).");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Writes the recorded snapshots in the configured serialization format.
fn save_snapshots(format: &str, base_filename: &str, recorded: &[SessionSnapshot]) -> Result<()> {
    match format {
        "json" => {
            let filename = format!("{}_snapshots.json", base_filename);
            let json_string = serde_json::to_string(recorded)?;
            File::create(&filename)?.write_all(json_string.as_bytes())?;
            info!(
                "All snapshots saved to {} ({} KB)",
                filename,
                json_string.len() / 1024
            );
        }
        "bincode" => {
            let filename = format!("{}_snapshots.bin", base_filename);
            bincode::serialize_into(File::create(&filename)?, recorded)?;
            info!("All snapshots saved to {} (binary format)", filename);
        }
        "messagepack" => {
            let filename = format!("{}_snapshots.msgpack", base_filename);
            let mut file = File::create(&filename)?;
            rmp_serde::encode::write(&mut file, recorded)?;
            info!("All snapshots saved to {} (MessagePack format)", filename);
        }
        other => {
            error!("Unknown output format: {}. Using JSON instead.", other);
            save_snapshots("json", base_filename, recorded)?;
        }
    }
    Ok(())
}
