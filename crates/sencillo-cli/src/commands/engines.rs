//! Engine listing and parameter tables.

#![allow(clippy::print_literal)] // Table headers use literal strings

use clap::Args;
use sencillo_core::{EngineWithParams, ParamScale};
use sencillo_effects::EngineRegistry;

#[derive(Args)]
pub struct EnginesArgs {
    /// Show the parameters of one engine
    #[arg(value_name = "ENGINE")]
    engine: Option<String>,
}

pub fn run(args: EnginesArgs) -> anyhow::Result<()> {
    let registry = EngineRegistry::new();

    let Some(id) = &args.engine else {
        println!("Available Engines");
        println!("=================");
        println!();
        for desc in registry.all_engines() {
            println!(
                "  {:15} {:11} - {}",
                desc.id,
                desc.category.name(),
                desc.description
            );
        }
        println!();
        println!("Use 'sencillo engines <id>' for parameter details.");
        return Ok(());
    };

    let desc = registry
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown engine: {id}"))?;
    let engine = registry
        .create(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown engine: {id}"))?;

    println!("{}", desc.name);
    println!("{}", "=".repeat(desc.name.len()));
    println!();
    println!("{}", desc.description);
    println!();
    println!("Parameters:");
    println!();
    println!(
        "  {:12}  {:16}  {:>10}  {}",
        "Name", "Id", "Default", "Range"
    );
    println!(
        "  {:12}  {:16}  {:>10}  {}",
        "----", "--", "-------", "-----"
    );

    for i in 0..engine.engine_param_count() {
        let Some(p) = engine.engine_param_info(i) else {
            continue;
        };
        let unit = p.unit.suffix();
        let scale = match p.scale {
            ParamScale::Linear => "",
            ParamScale::Logarithmic => " (log)",
        };
        println!(
            "  {:12}  {:16}  {:>10}  {} - {}{}{}",
            p.name,
            p.string_id,
            format!("{}{unit}", p.default),
            p.min,
            p.max,
            unit,
            scale
        );
    }

    println!();
    println!("Example:");
    println!();
    if let Some(first) = engine.engine_param_info(0) {
        println!(
            "  sencillo process input.wav output.wav --engine {} --param \"{}={}\"",
            desc.id,
            first.name.to_lowercase(),
            first.default
        );
    }

    Ok(())
}
