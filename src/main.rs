use clap::{Parser, Subcommand};
use log::{debug, info};
use reconstitute::config::Config;
use reconstitute::dose::{self, DoseUnit, FillIndicator, Quantity, SyringeSize};
use reconstitute::input::{self, Action, CalculatorState, InputEvent};
use reconstitute::optimizer::OptimizerForm;

#[derive(Parser)]
#[command(name = "reconstitute")]
#[command(about = "Peptide reconstitution and syringe dose calculator", long_about = None)]
struct Cli {
    /// TOML file with calculator defaults
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute concentration, volume per dose and syringe reading
    Calc {
        /// Dose, optionally with its unit (e.g. "250mcg", "0.25 mg")
        #[arg(short, long)]
        dose: Option<String>,

        /// Unit for a bare dose number (mg or mcg)
        #[arg(short, long)]
        unit: Option<String>,

        /// Vial strength in mg, optionally suffixed "mg"
        #[arg(short, long)]
        strength: Option<String>,

        /// Diluent volume in mL, optionally suffixed "mL"
        #[arg(short = 'w', long)]
        volume: Option<String>,

        /// Syringe capacity in units (30, 50 or 100)
        #[arg(short = 'y', long)]
        syringe: Option<u32>,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// How much diluent to add so one dose reads exactly 10 units
    Optimize {
        /// Dose in mg
        dose: String,

        /// Vial strength in mg
        strength: String,
    },

    /// List the preset values offered for each input
    Presets {
        /// Dose unit for the dose presets (mg or mcg)
        #[arg(short, long, default_value = "mg")]
        unit: String,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let result = match cli.command {
        Commands::Calc {
            dose,
            unit,
            strength,
            volume,
            syringe,
            json,
        } => load_config(cli.config.as_deref()).and_then(|config| {
            let request = CalcRequest {
                dose,
                unit,
                strength,
                volume,
                syringe,
            };
            calculate(&config, &request, json)
        }),
        Commands::Optimize { dose, strength } => optimize(&dose, &strength),
        Commands::Presets { unit } => list_presets(&unit),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct CalcRequest {
    dose: Option<String>,
    unit: Option<String>,
    strength: Option<String>,
    volume: Option<String>,
    syringe: Option<u32>,
}

fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path);
            Ok(Config::load_from_file(path)?)
        }
        None => Ok(Config::empty()),
    }
}

fn calculate(
    config: &Config,
    request: &CalcRequest,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config, request)?;
    let snapshot = state.snapshot(config.warnings.low_reading_units);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    // Print advisories if any
    if snapshot.validation.has_issues() {
        eprintln!("{}", snapshot.validation);
    }

    println!(
        "Dose:            {} ({} mg)",
        dose::format_labeled(snapshot.display_dose, snapshot.dose_unit.label()),
        dose::format_amount(state.dose.value())
    );
    println!(
        "Vial strength:   {}",
        dose::format_labeled(state.strength.value(), "mg")
    );
    println!(
        "Diluent:         {}",
        dose::format_labeled(state.volume.value(), "mL")
    );
    println!("Syringe:         {}", snapshot.syringe);
    println!();
    println!("Concentration:   {} mg/mL", snapshot.formatted.concentration);
    println!("Volume per dose: {} mL", snapshot.formatted.volume_per_dose);
    println!("Syringe reading: {} units", snapshot.formatted.syringe_reading);
    println!();
    println!("{}", render_bar(&snapshot.fill, 40));

    Ok(())
}

/// Replay the command-line inputs through the same transitions the
/// browser page uses, failing hard on anything that would be ignored there.
fn build_state(
    config: &Config,
    request: &CalcRequest,
) -> Result<CalculatorState, Box<dyn std::error::Error>> {
    let mut state = config.initial_state()?;

    if let Some(unit) = &request.unit {
        let unit: DoseUnit = unit.parse()?;
        state.apply(Action::SetDoseUnit { unit });
    }

    if let Some(text) = &request.dose {
        let (value, unit) = dose::parse_dose_expression(text)?;
        if let Some(unit) = unit {
            state.apply(Action::SetDoseUnit { unit });
        }
        state.apply(Action::Input {
            quantity: Quantity::Dose,
            event: InputEvent::CustomTextChanged(value.to_string()),
        });
    }

    for (quantity, text) in [
        (Quantity::Strength, &request.strength),
        (Quantity::Volume, &request.volume),
    ] {
        if let Some(text) = text {
            let value = dose::parse_measure(quantity, text)?;
            state.apply(Action::Input {
                quantity,
                event: InputEvent::CustomTextChanged(value.to_string()),
            });
        }
    }

    if let Some(units) = request.syringe {
        let syringe = SyringeSize::try_from(units)?;
        state.apply(Action::SetSyringe { syringe });
    }

    // Values that parse but cannot be combined are kept as text only
    for quantity in Quantity::ALL {
        if let Some(reason) = state.ignored_custom_text(quantity) {
            return Err(format!("Invalid {}: {}", quantity, reason).into());
        }
    }

    debug!("Final state: {:?}", state);
    Ok(state)
}

/// Text stand-in for the syringe illustration
fn render_bar(fill: &FillIndicator, width: usize) -> String {
    let filled = (fill.ratio() * width as f64).round() as usize;
    let filled = filled.min(width);
    let marker = if fill.overflow { " (past the last mark)" } else { "" };
    format!(
        "[{}{}] {}{}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        dose::format_amount(fill.safe_units),
        marker
    )
}

fn optimize(dose_text: &str, strength_text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut form = OptimizerForm::new();
    form.dose_text = dose_text.to_string();
    form.strength_text = strength_text.to_string();

    form.calculate()
        .map_err(|e| format!("{} ({})", reconstitute::optimizer::INVALID_INPUT_MESSAGE, e))?;

    if let Some(summary) = form.summary() {
        println!("{}", summary);
    }

    Ok(())
}

fn list_presets(unit: &str) -> Result<(), Box<dyn std::error::Error>> {
    let unit: DoseUnit = unit.parse()?;

    for quantity in Quantity::ALL {
        let label = input::display_unit_label(quantity, unit);
        let values: Vec<String> = input::presets_for(quantity, unit)
            .iter()
            .map(|&v| dose::format_labeled(v, label))
            .collect();
        println!("{:<15} {}", format!("{}:", quantity), values.join("  "));
    }

    Ok(())
}
