use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use card_pricer::booster::{self, PackConfiguration, PullRates, SimulationParams, SimulationSummary};
use card_pricer::endpoints::{ProgressObserver, ProgressPacing};
use card_pricer::format::format_currency;
use card_pricer::models::Grade;
use card_pricer::{CardPricer, ResultsTable, RowGrid};

#[derive(Parser, Debug)]
#[command(name = "card-pricer", version, about = "Price a trading-card collection across grading tiers")]
struct Cli {
    /// Pricing API base URL
    #[arg(long, env = "CARD_PRICER_API_URL", global = true)]
    api_base: Option<String>,

    /// Directory for downloaded files
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write card_template.csv
    Template,

    /// Validate and submit a card CSV
    Submit {
        /// CSV with cardName,cardId,holo,reverse_holo,first_edition,card_count
        csv: PathBuf,

        /// Skip the simulated progress delay
        #[arg(long)]
        no_delay: bool,
    },

    /// Fetch and total the results of the last submission
    Results {
        /// Write results.csv after applying exclusions
        #[arg(long)]
        export: bool,

        /// Zero-based records to exclude from totals
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<usize>,

        /// Record to expand with a variant lookup
        #[arg(long)]
        expand: Option<usize>,

        /// Grade selections for estimated totals, e.g. `0=PSA 10`
        #[arg(long = "select")]
        selections: Vec<String>,
    },

    /// Monte-Carlo pack-opening value estimate
    Simulate {
        #[arg(long, default_value = "36")]
        packs: u32,

        #[arg(long, default_value = "4.99")]
        price: f64,

        #[arg(long, default_value = "1000")]
        runs: u32,

        /// Pack preset for the sample pack (standard, premium)
        #[arg(long, default_value = "standard")]
        preset: String,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Renders submit progress as a single rewritten terminal line.
struct TerminalProgress;

impl ProgressObserver for TerminalProgress {
    fn progress(&mut self, percent: u8) {
        let filled = percent as usize / 5;
        eprint!("\rLoading please wait... [{:<20}] {:>3}%", "#".repeat(filled), percent);
    }

    fn finish(&mut self) {
        eprintln!();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_pricer(cli: &Cli, pacing: ProgressPacing) -> card_pricer::Result<CardPricer> {
    let mut builder = CardPricer::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .pacing(pacing);
    if let Some(base) = &cli.api_base {
        builder = builder.api_base(base);
    }
    if let Some(dir) = &cli.download_dir {
        builder = builder.download_dir(dir);
    }
    builder.build()
}

fn run(cli: Cli) -> card_pricer::Result<()> {
    match &cli.command {
        Commands::Template => {
            let pricer = build_pricer(&cli, ProgressPacing::default())?;
            let path = pricer.download_template()?;
            println!("Template written to {}", path.display());
        }
        Commands::Submit { csv, no_delay } => {
            let pacing = if *no_delay {
                ProgressPacing::disabled()
            } else {
                ProgressPacing::default()
            };
            let pricer = build_pricer(&cli, pacing)?;
            let mut grid = RowGrid::new();
            grid.import_csv(csv)?;
            let receipt = pricer.submit(&grid, &mut TerminalProgress)?;
            println!(
                "{}",
                receipt.message.as_deref().unwrap_or("Data submitted successfully")
            );
        }
        Commands::Results {
            export,
            exclude,
            expand,
            selections,
        } => {
            let pricer = build_pricer(&cli, ProgressPacing::default())?;
            let mut table = ResultsTable::default();
            if !pricer.load_results(&mut table) {
                return Err(card_pricer::PricerError::NotFound(
                    table.error().unwrap_or("results unavailable").to_string(),
                ));
            }
            for &i in exclude {
                table.toggle_exclude(i, false)?;
            }
            for sel in selections {
                let (idx, grade) = parse_selection(sel)?;
                table.select_grade(idx, Some(grade))?;
            }
            if let Some(i) = expand {
                let state = pricer.expand(&mut table, *i)?;
                tracing::info!(record = i, ?state, "expanded record");
            }
            print_table(&table);
            if *export {
                let path = pricer.download_results(&table)?;
                println!("Results written to {}", path.display());
            }
        }
        Commands::Simulate {
            packs,
            price,
            runs,
            preset,
            seed,
        } => {
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(*s),
                None => StdRng::from_entropy(),
            };
            let config = PackConfiguration::preset(preset)?;
            let sample = booster::open_pack(&config, &mut rng);
            let labels: Vec<&str> = sample.iter().map(|r| r.label()).collect();
            println!("Sample {} pack: {}", preset, labels.join(", "));

            let params = SimulationParams {
                pack_price: *price,
                packs: *packs,
                runs: *runs,
            };
            let results = booster::run_simulations(&params, &PullRates::default(), &mut rng)?;
            match SimulationSummary::from_runs(&results) {
                Some(s) => {
                    println!("Runs:            {}", s.runs);
                    println!("Average value:   {}", format_currency(s.avg_value));
                    println!("Average ROI:     {:.1}%", s.avg_roi);
                    println!("Profitable runs: {:.1}%", s.profitable_percentage);
                    println!("Secret rares:    {:.2} per run", s.avg_secret_rares);
                    println!("Ultra rares:     {:.2} per run", s.avg_ultra_rares);
                }
                None => println!("No simulation runs requested"),
            }
        }
    }
    Ok(())
}

fn parse_selection(raw: &str) -> card_pricer::Result<(usize, Grade)> {
    let invalid = || {
        card_pricer::PricerError::InvalidArgument(format!(
            "selection '{}' must look like INDEX=GRADE",
            raw
        ))
    };
    let (idx, grade) = raw.split_once('=').ok_or_else(invalid)?;
    let idx = idx.trim().parse::<usize>().map_err(|_| invalid())?;
    let grade = Grade::from_label(grade).ok_or_else(invalid)?;
    Ok((idx, grade))
}

fn print_table(table: &ResultsTable) {
    let shown = [Grade::Ungraded, Grade::Grade9, Grade::Psa10, Grade::Bgs10];
    print!("{:<3} {:<28} {:<10} {:>5}", "", "Card", "ID", "Count");
    for g in shown {
        print!(" {:>12}", g.label());
    }
    println!();

    for (i, r) in table.records().iter().enumerate() {
        let mark = if r.is_excluded { "x" } else { " " };
        print!("{:<3} {:<28} {:<10} {:>5}", format!("{}{}", i, mark), r.card, r.id, r.card_count);
        for g in shown {
            print!(" {:>12}", r.grades.get(g));
        }
        println!();
        for v in r.variants.variants() {
            println!("      -> {} ({}) x{:.2}", v.name, v.type_field, v.price_modifier);
        }
    }

    let totals = table.totals();
    print!("{:<3} {:<28} {:<10} {:>5}", "", "Totals:", "", totals.card_count);
    for g in shown {
        print!(" {:>12}", format_currency(totals.get(g)));
    }
    println!();

    let estimated = table.estimated_totals();
    if estimated.card_count > 0 {
        let sum: f64 = estimated.by_grade.values().sum();
        println!("Estimated value at selected grades: {}", format_currency(sum));
    }
}
