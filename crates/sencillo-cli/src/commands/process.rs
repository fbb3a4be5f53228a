//! Offline WAV processing through one engine.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;
use sencillo_core::{Engine, EngineWithParams, PeakReader, ProcessSpec, linear_to_db};
use sencillo_effects::{EngineRegistry, GainMeterStage};

use crate::config::{ConfigError, ParamFile, apply_param, parse_key_val, parse_value};
use crate::wav::{Audio, read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Engine id (see `sencillo engines`)
    #[arg(short, long)]
    engine: Option<String>,

    /// Parameter file (TOML)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Engine parameter, e.g. "feedback=0.4" (repeatable, overrides the file)
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    block_size: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value_t = 32)]
    bit_depth: u16,
}

type BoxedEngine = Box<dyn EngineWithParams + Send>;

/// Create the engine, keeping a meter handle for the gain stage.
fn build_engine(
    registry: &EngineRegistry,
    id: &str,
) -> Result<(BoxedEngine, Option<PeakReader>), ConfigError> {
    if id == "gain-meter" {
        let stage = GainMeterStage::new();
        let reader = stage.peak_reader();
        return Ok((Box::new(stage), Some(reader)));
    }
    let engine = registry
        .create(id)
        .ok_or_else(|| ConfigError::UnknownEngine(id.to_string()))?;
    Ok((engine, None))
}

fn run_blocks(engine: &mut BoxedEngine, audio: &mut Audio, block_size: usize) -> anyhow::Result<()> {
    let frames = audio.frames();
    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut block: Vec<&mut [f32]> = audio
            .channels
            .iter_mut()
            .map(|c| &mut c[start..end])
            .collect();
        engine
            .process(&mut block)
            .with_context(|| format!("processing failed at frame {start}"))?;
        start = end;
    }
    Ok(())
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        bail!("unsupported bit depth {} (use 16, 24 or 32)", args.bit_depth);
    }
    let block_size = args.block_size as usize;

    let file = match &args.params {
        Some(path) => ParamFile::load(path)?,
        None => ParamFile::default(),
    };
    let id = args
        .engine
        .clone()
        .or_else(|| file.engine.clone())
        .ok_or(ConfigError::MissingEngine)?;

    let registry = EngineRegistry::new();
    let (mut engine, meter) = build_engine(&registry, &id)?;

    for (name, &value) in &file.params {
        apply_param(engine.as_mut(), &id, name, value)?;
    }
    for (name, raw) in &args.param {
        let value = parse_value(name, raw)?;
        apply_param(engine.as_mut(), &id, name, value)?;
    }

    tracing::info!(path = %args.input.display(), "reading input");
    let mut audio = read_wav(&args.input)?;
    let channels = audio.channels.len();
    println!(
        "Input: {} frames, {} channel(s), {} Hz, {:.2}s",
        audio.frames(),
        channels,
        audio.sample_rate,
        audio.frames() as f32 / audio.sample_rate as f32
    );

    if channels < engine.min_channels() {
        bail!(
            "engine '{id}' needs at least {} channels, input has {channels}",
            engine.min_channels()
        );
    }

    engine
        .prepare(&ProcessSpec::new(
            audio.sample_rate as f32,
            block_size,
            channels,
        ))
        .with_context(|| format!("failed to prepare engine '{id}'"))?;

    let input_peak = audio.peak();
    tracing::info!(engine = %id, block_size, "processing");
    run_blocks(&mut engine, &mut audio, block_size)?;
    engine.release();
    let output_peak = audio.peak();

    println!();
    println!("Stats:");
    println!("  Input:  Peak {:.1} dB", linear_to_db(input_peak));
    println!("  Output: Peak {:.1} dB", linear_to_db(output_peak));
    if let Some(meter) = meter {
        let (left, right) = meter.take();
        println!(
            "  Meter:  L {:.1} dB, R {:.1} dB",
            linear_to_db(left),
            linear_to_db(right)
        );
    }

    tracing::info!(path = %args.output.display(), bits = args.bit_depth, "writing output");
    write_wav(&args.output, &audio, args.bit_depth)?;
    println!();
    println!("Wrote {}", args.output.display());

    Ok(())
}
