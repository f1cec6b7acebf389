/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When AppConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use docpress_app::config::{AppConfig, ZERO_ADDRESS};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to DocPress Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a new configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let mut config = AppConfig::default();

    println!("\n{}", style("--- Wallet ---").bold());
    let modes = vec![
        "JSON-RPC node (wallet-managed accounts)",
        "Demo (in-memory wallet and contract)",
        "None",
    ];
    let mode = Select::with_theme(&theme)
        .with_prompt("Wallet provider")
        .items(&modes)
        .default(0)
        .interact()?;

    match mode {
        0 => {
            let rpc_url: String = Input::with_theme(&theme)
                .with_prompt("RPC URL")
                .default("http://127.0.0.1:8545".to_string())
                .validate_with(|input: &String| -> Result<(), String> {
                    input
                        .parse::<url::Url>()
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                })
                .interact_text()?;
            config.wallet.rpc_url = Some(rpc_url);
        }
        1 => config.wallet.demo = true,
        _ => {}
    }

    println!("\n{}", style("--- Contract ---").bold());
    config.contract.address = Input::with_theme(&theme)
        .with_prompt("Certificate contract address")
        .default(ZERO_ADDRESS.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            input
                .parse::<docpress_adapter::Address>()
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
        .interact_text()?;

    config.contract.confirmations = Input::with_theme(&theme)
        .with_prompt("Confirmations to wait for")
        .default(1u64)
        .validate_with(|input: &u64| -> Result<(), &'static str> {
            if *input >= 1 { Ok(()) } else { Err("must be at least 1") }
        })
        .interact_text()?;

    config.explorer_url = Input::with_theme(&theme)
        .with_prompt("Block explorer URL")
        .default(config.explorer_url.clone())
        .interact_text()?;

    println!("\n{}", style("--- Session ---").bold());
    let instant_login = Confirm::with_theme(&theme)
        .with_prompt("Skip the simulated login delay?")
        .default(false)
        .interact()?;
    if instant_login {
        config.auth.simulated_latency_ms = 0;
    }

    config.validate().context("generated configuration is invalid")?;
    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
