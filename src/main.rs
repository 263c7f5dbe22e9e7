use clap::Parser;
use log::{error, info};
use rangefinder::{
    args::{CommandTask, RangefinderArgs},
    ConfigurationManager, CsvFormatter, JsonFormatter, PipelineConfig, PlotRenderer, Reading,
    RecordLog, SignalProcessor,
};
use std::path::PathBuf;
use std::process::ExitCode;

// Example:
// RUST_LOG=info cargo run -- process
//                            --input  received_sensor_readings.json
//                            --plot   static/plot.svg
//                            --csv    run.csv

fn main() -> ExitCode {
    env_logger::init();
    let args = RangefinderArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: RangefinderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => ConfigurationManager::from_file(path)?.into_config(),
        None => PipelineConfig::default(),
    };
    let data_path = |input: Option<PathBuf>| input.unwrap_or_else(|| PathBuf::from(&config.output.data_path));
    let plot_path = |plot: Option<PathBuf>| plot.unwrap_or_else(|| PathBuf::from(&config.output.plot_path));

    match args.command {
        CommandTask::Process(cmd) => {
            let input = data_path(cmd.input);
            let plot = plot_path(cmd.plot);
            let processor = SignalProcessor::new(config.clone())?;

            let series = processor.process_file(&input)?;
            PlotRenderer::new().write_to(&series, &plot)?;
            if let Some(csv) = cmd.csv {
                CsvFormatter::new().write_to(&series, csv)?;
            }
            if let Some(json) = cmd.json {
                JsonFormatter::new().write_to(&series, json)?;
            }
            info!("Run complete: {} samples plotted to {}", series.len(), plot.display());
        }
        CommandTask::Clear(cmd) => {
            RecordLog::new(data_path(cmd.input)).clear(plot_path(cmd.plot))?;
        }
        CommandTask::Append(cmd) => {
            if ![cmd.distance, cmd.angle, cmd.time].iter().all(|v| v.is_finite()) {
                return Err("reading values must be finite".into());
            }
            let reading = Reading::new(cmd.distance, cmd.angle, cmd.time);
            RecordLog::new(data_path(cmd.input)).append(&reading)?;
        }
        CommandTask::Config(cmd) => {
            let mut manager = ConfigurationManager::new();
            manager.update_config(config.clone())?;
            manager.save_to_file(&cmd.out)?;
            info!("Wrote configuration to {}", cmd.out.display());
        }
    }
    Ok(())
}
