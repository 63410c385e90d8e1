use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pdg_api::{ApiConfig, Entity, Particle, PdgApi, PdgError, PdgResult, Resolution};
use pdg_core::pdg_round;
use pdg_store::MemoryStore;

const DATASET_ENV: &str = "PDG_DATASET";

#[derive(Parser)]
#[command(name = "pdg-cli")]
#[command(about = "PDG CLI - Look up particle data from a PDG dataset", long_about = None)]
struct Cli {
    /// Dataset file (YAML or JSON); defaults to $PDG_DATASET
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// API configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fail on ambiguous values instead of picking one
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dataset metadata and available editions
    Info,
    /// Look up a PDG Identifier and show its best summary value
    Get {
        /// PDG Identifier, optionally with edition (e.g. S008M/2024)
        pdgid: String,
        #[arg(long)]
        edition: Option<String>,
    },
    /// Mass of a particle in GeV
    Mass(ParticleArgs),
    /// Width of a particle in GeV
    Width(ParticleArgs),
    /// Mean lifetime of a particle in seconds
    Lifetime(ParticleArgs),
    /// List exclusive branching fractions and their decay products
    Decays {
        #[command(flatten)]
        particle: ParticleArgs,
        /// Include indented sub-decay modes
        #[arg(long)]
        subdecays: bool,
    },
    /// Round a value and its error following the PDG rounding rules
    Round {
        value: f64,
        error: f64,
    },
}

#[derive(clap::Args)]
struct ParticleArgs {
    /// Particle PDG Identifier (e.g. S008), or a name with --name
    particle: String,
    /// Treat the argument as a particle name such as pi+
    #[arg(long)]
    name: bool,
    /// MC particle number selecting the charge state
    #[arg(long)]
    mcid: Option<i64>,
    #[arg(long)]
    edition: Option<String>,
}

fn main() -> PdgResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Commands::Round { value, error } = cli.command {
        return cmd_round(value, error);
    }

    let api = open_api(cli.dataset.as_deref(), cli.config.as_deref(), cli.strict)?;
    let ctx = api.context();

    match cli.command {
        Commands::Info => cmd_info(&api),
        Commands::Get { pdgid, edition } => cmd_get(&api, &pdgid, edition.as_deref(), ctx),
        Commands::Mass(args) => {
            let particle = find_particle(&api, &args)?;
            print_quantity("mass", &particle, particle.mass(ctx)?, particle.mass_error(ctx)?, "GeV")
        }
        Commands::Width(args) => {
            let particle = find_particle(&api, &args)?;
            print_quantity("width", &particle, particle.width(ctx)?, particle.width_error(ctx)?, "GeV")
        }
        Commands::Lifetime(args) => {
            let particle = find_particle(&api, &args)?;
            print_quantity(
                "lifetime",
                &particle,
                particle.lifetime(ctx)?,
                particle.lifetime_error(ctx)?,
                "s",
            )
        }
        Commands::Decays {
            particle,
            subdecays,
        } => cmd_decays(&api, &particle, subdecays, ctx),
        Commands::Round { .. } => Ok(()),
    }
}

fn open_api(
    dataset: Option<&Path>,
    config: Option<&Path>,
    strict: bool,
) -> PdgResult<PdgApi<MemoryStore>> {
    let path = match dataset {
        Some(path) => path.to_path_buf(),
        None => std::env::var_os(DATASET_ENV)
            .map(PathBuf::from)
            .ok_or_else(|| PdgError::InvalidArgument {
                what: format!("no dataset given; pass --dataset or set {DATASET_ENV}"),
            })?,
    };
    let mut config = match config {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::default(),
    };
    config.strict |= strict;

    let store = MemoryStore::open(&path)?;
    PdgApi::new(store, config)
}

fn find_particle<'a>(
    api: &'a PdgApi<MemoryStore>,
    args: &ParticleArgs,
) -> PdgResult<Particle<'a, MemoryStore>> {
    let edition = args.edition.as_deref();
    if args.name {
        api.particle_by_name(&args.particle, true, edition)
    } else {
        api.particle(&args.particle, edition, args.mcid)
    }
}

fn cmd_info(api: &PdgApi<MemoryStore>) -> PdgResult<()> {
    for key in api.info_keys()? {
        let value = api.info(&key)?.unwrap_or_default();
        println!("{key:>16}: {value}");
    }
    println!("{:>16}: {}", "editions", api.editions()?.join(", "));
    Ok(())
}

fn cmd_get(
    api: &PdgApi<MemoryStore>,
    pdgid: &str,
    edition: Option<&str>,
    ctx: Resolution,
) -> PdgResult<()> {
    let entity = api.resolve(pdgid, edition)?;
    println!("{} - {}", entity.pdgid(), entity.description()?);

    match &entity {
        Entity::Particle(particle) => {
            println!("  Name: {}", particle.name()?);
            if let Some(mcid) = particle.mcid()? {
                println!("  MC ID: {mcid}");
            }
            if let Some(charge) = particle.charge()? {
                println!("  Charge: {charge}");
            }
            for property in particle.masses(true)? {
                println!("  {} {}", property.pdgid(), property.description()?);
            }
        }
        Entity::Property(_) | Entity::BranchingFraction(_) => {
            let Some(property) = entity.as_property() else {
                return Ok(());
            };
            match property.best_summary(ctx, false)? {
                Some(best) => {
                    let value = best.value().map(|v| v.to_string()).unwrap_or_default();
                    let error = best.error().map(|e| format!(" +- {e}")).unwrap_or_default();
                    println!("  Best value: {value}{error} {}", best.units());
                    if !best.value_type().is_empty() {
                        println!("  Type: {}", best.value_type());
                    }
                }
                None => println!("  No summary value in this edition"),
            }
        }
    }
    Ok(())
}

fn print_quantity(
    quantity: &str,
    particle: &Particle<'_, MemoryStore>,
    value: Option<f64>,
    error: Option<f64>,
    units: &str,
) -> PdgResult<()> {
    let name = particle.name()?;
    match (value, error) {
        (Some(value), Some(error)) if error > 0.0 => {
            let (value, error) = pdg_round(value, error)?;
            println!("{name} {quantity}: {value} +- {error} {units}");
        }
        (Some(value), _) => println!("{name} {quantity}: {value} {units}"),
        (None, _) => println!("{name} {quantity}: not defined"),
    }
    Ok(())
}

fn cmd_decays(
    api: &PdgApi<MemoryStore>,
    args: &ParticleArgs,
    subdecays: bool,
    ctx: Resolution,
) -> PdgResult<()> {
    let particle = find_particle(api, args)?;
    println!("Decays of {}:", particle.name()?);
    for mode in particle.exclusive_branching_fractions(subdecays, true)? {
        let indent = "  ".repeat(mode.subdecay_level()? as usize + 1);
        let value = match mode.best_summary(ctx, false)? {
            Some(best) if best.is_limit() => format!("limit {}", best.display_value_text()),
            Some(best) => best.value().map(|v| v.to_string()).unwrap_or_default(),
            None => String::new(),
        };
        let products: Vec<String> = mode
            .decay_products()?
            .iter()
            .map(|p| {
                if p.multiplier > 1 {
                    format!("{} {}", p.multiplier, p.item.name())
                } else {
                    p.item.name().to_string()
                }
            })
            .collect();
        println!("{indent}{}: {}  [{value}]", mode.description()?, products.join(" "));
    }
    Ok(())
}

fn cmd_round(value: f64, error: f64) -> PdgResult<()> {
    let (value, error) = pdg_round(value, error)?;
    println!("{value} +- {error}");
    Ok(())
}
