use hrmsfeat::tables::read_peak_table;
use tracing::{
    info,
    instrument,
};

use crate::cli::{
    AlignArgs,
    PickArgs,
    RunArgs,
    WriteTemplateArgs,
};
use crate::config::{
    CONFIG_TEMPLATE,
    PipelineConfig,
};
use crate::error::CliError;
use crate::processing::{
    SamplePeaks,
    align_samples,
    check_unique_samples,
    pick_files,
    sample_name,
};

/// Main function for the 'pick' subcommand.
#[instrument(skip_all)]
pub fn main_pick(args: PickArgs) -> Result<(), CliError> {
    let config =
        PipelineConfig::load(args.config.as_deref())?.with_overrides(args.workers, None, None)?;
    let samples = pick_files(&args.inputs, &config, &args.output_dir)?;
    info!(
        "Wrote {} peak tables to {}",
        samples.len(),
        args.output_dir.display()
    );
    Ok(())
}

/// Main function for the 'align' subcommand.
#[instrument(skip_all)]
pub fn main_align(args: AlignArgs) -> Result<(), CliError> {
    let config = PipelineConfig::load(args.config.as_deref())?.with_overrides(
        None,
        args.value.map(Into::into),
        args.isotope_ratios,
    )?;
    check_unique_samples(&args.tables)?;
    let samples = args
        .tables
        .iter()
        .map(|path| -> Result<SamplePeaks, CliError> {
            let peaks = read_peak_table(path)?;
            info!("Read {} peaks from {}", peaks.len(), path.display());
            Ok(SamplePeaks {
                sample: sample_name(path),
                peaks,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    align_samples(&samples, &config, &args.output_dir)?;
    Ok(())
}

/// Main function for the 'run' subcommand.
#[instrument(skip_all)]
pub fn main_run(args: RunArgs) -> Result<(), CliError> {
    let config = PipelineConfig::load(args.config.as_deref())?.with_overrides(
        args.workers,
        args.value.map(Into::into),
        args.isotope_ratios,
    )?;
    let samples = pick_files(&args.inputs, &config, &args.output_dir)?;
    let matrix_path = align_samples(&samples, &config, &args.output_dir)?;
    println!("Wrote feature matrix to: {}", matrix_path.display());
    Ok(())
}

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let config_path = target_dir.join("config_template.json");
    std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    println!("Wrote config template to: {}", config_path.display());
    Ok(())
}
