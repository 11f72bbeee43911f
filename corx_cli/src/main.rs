use clap::{Parser, Subcommand};
use corx_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "corx")]
#[command(about = "Co-prescription recommendation assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the association rules file
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Override the prescription records file
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Override the export output directory
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive prescription assistant for clinicians
    Doctor,

    /// Interactive pharmacy inventory assistant
    Pharmacy,

    /// One-shot recommendation lookup for a drug
    Recommend {
        /// Drug name to look up
        drug: String,

        /// Print every matching rule ranked by support
        #[arg(long)]
        ranked: bool,
    },

    /// List the distinct drugs in the catalog
    Drugs,
}

/// The two front-end variants sharing one session loop
#[derive(Clone, Copy, PartialEq, Eq)]
enum Variant {
    Doctor,
    Pharmacy,
}

impl Variant {
    fn mode(self) -> RecommendMode {
        match self {
            Variant::Doctor => RecommendMode::Best,
            Variant::Pharmacy => RecommendMode::Ranked,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Variant::Doctor => "Doctor Prescription Assistant",
            Variant::Pharmacy => "Pharmacy Inventory Optimizer",
        }
    }

    fn list_noun(self) -> &'static str {
        match self {
            Variant::Doctor => "prescription",
            Variant::Pharmacy => "inventory",
        }
    }

    fn filename(self) -> &'static str {
        match self {
            Variant::Doctor => PRESCRIPTION_FILENAME,
            Variant::Pharmacy => INVENTORY_FILENAME,
        }
    }
}

/// Resolved source and output locations (config defaults, flag overrides)
struct Locations {
    rules: PathBuf,
    records: PathBuf,
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    corx_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let locations = Locations {
        rules: cli.rules.unwrap_or_else(|| config.data.rules_path.clone()),
        records: cli
            .records
            .unwrap_or_else(|| config.data.records_path.clone()),
        out_dir: cli.out_dir.unwrap_or_else(|| config.export.out_dir.clone()),
    };

    match cli.command {
        Commands::Doctor => cmd_session(Variant::Doctor, &locations),
        Commands::Pharmacy => cmd_session(Variant::Pharmacy, &locations),
        Commands::Recommend { drug, ranked } => cmd_recommend(&locations, &drug, ranked),
        Commands::Drugs => cmd_drugs(&locations),
    }
}

fn cmd_session(variant: Variant, locations: &Locations) -> Result<()> {
    let store = RuleStore::shared(&locations.rules)?;
    let catalog = DrugCatalog::shared(&locations.records)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("{}", variant.title());
    println!();

    let mut patient = Patient::default();
    if variant == Variant::Doctor {
        println!("Patient information:");
        patient = prompt_patient(&mut input)?;
        println!();
    }

    let mut session = Session::new(variant.mode());
    let mut last_added: Option<String> = None;

    print_command_help(variant);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break; // EOF ends the session
        }
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));

        match cmd {
            "" => continue,

            "add" => {
                let drug = rest.trim();
                if !drug.is_empty() && !catalog.contains(drug) {
                    eprintln!("{} is not in the drug catalog.", drug);
                    continue;
                }
                match session.add(drug, store) {
                    Ok(()) => {
                        println!("{} added to the {}.", drug, variant.list_noun());
                        last_added = Some(drug.to_string());
                        print_recommendations(variant, &session, last_added.as_deref());
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }

            "accept" => {
                // Accepted companions come from rule consequents, which may
                // not appear in the record-derived catalog
                let drug = rest.trim();
                match session.accept(drug, store) {
                    Ok(()) => {
                        println!("{} added to the {}.", drug, variant.list_noun());
                        last_added = Some(drug.to_string());
                        print_recommendations(variant, &session, last_added.as_deref());
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }

            "change" => match rest.split_once("->") {
                Some((original, alternative)) => {
                    let original = original.trim();
                    let alternative = alternative.trim();
                    if !alternative.is_empty() && !catalog.contains(alternative) {
                        eprintln!("{} is not in the drug catalog.", alternative);
                        continue;
                    }
                    match session.change(original, alternative, store) {
                        Ok(()) => {
                            println!("{} added to the {}.", alternative, variant.list_noun());
                            last_added = Some(alternative.to_string());
                            print_recommendations(variant, &session, last_added.as_deref());
                        }
                        Err(e) => eprintln!("{}", e),
                    }
                }
                None => eprintln!("Usage: change <original> -> <alternative>"),
            },

            "remove" => {
                let drug = rest.trim();
                if session.remove(drug) {
                    println!("{} removed from the {}.", drug, variant.list_noun());
                } else {
                    println!("{} is not in the {} list.", drug, variant.list_noun());
                }
            }

            "list" => print_list(variant, &session),

            "drugs" => {
                for name in catalog.sorted_names() {
                    println!("  {}", name);
                }
            }

            "patient" if variant == Variant::Doctor => {
                println!("Patient information:");
                patient = prompt_patient(&mut input)?;
            }

            "export" => {
                let result = match variant {
                    Variant::Doctor => prescription_pdf(&patient, &session),
                    Variant::Pharmacy => inventory_pdf(&session),
                };
                match result {
                    Ok(bytes) => {
                        std::fs::create_dir_all(&locations.out_dir)?;
                        let path = locations.out_dir.join(variant.filename());
                        std::fs::write(&path, bytes)?;
                        println!("✓ Exported {}", path.display());
                    }
                    Err(e @ Error::Validation(_)) => eprintln!("{}", e),
                    Err(e) => return Err(e),
                }
            }

            "quit" | "exit" => break,

            _ => print_command_help(variant),
        }
    }

    Ok(())
}

fn cmd_recommend(locations: &Locations, drug: &str, ranked: bool) -> Result<()> {
    let store = RuleStore::shared(&locations.rules)?;

    if ranked {
        let matches = recommend_ranked(drug, store);
        if matches.is_empty() {
            println!("No recommendations found for {}.", drug);
        } else {
            for rec in &matches {
                println!("{} (Support: {:.2})", rec.joined_consequents(), rec.support);
            }
        }
    } else {
        match recommend_best(drug, store) {
            Some(rec) => println!(
                "{} -> {} (Support: {:.2})",
                drug,
                rec.primary_consequent().unwrap_or("-"),
                rec.support
            ),
            None => println!("No recommendations found for {}.", drug),
        }
    }

    Ok(())
}

fn cmd_drugs(locations: &Locations) -> Result<()> {
    let catalog = DrugCatalog::shared(&locations.records)?;

    println!(
        "{} distinct drugs from {} prescription records",
        catalog.drugs.len(),
        catalog.records.len()
    );
    for name in catalog.sorted_names() {
        println!("{}", name);
    }

    Ok(())
}

fn print_command_help(variant: Variant) {
    println!("─────────────────────────────────────────");
    println!("Commands:");
    println!("  add <drug>                      add a drug to the {}", variant.list_noun());
    println!("  accept <drug>                   accept a recommended companion drug");
    println!("  change <original> -> <alt>      record an alternative for a drug");
    println!("  remove <drug>                   remove a drug from the {}", variant.list_noun());
    println!("  list                            show the current {}", variant.list_noun());
    println!("  drugs                           list the drug catalog");
    if variant == Variant::Doctor {
        println!("  patient                         re-enter patient information");
    }
    println!("  export                          write {} to the output directory", variant.filename());
    println!("  quit                            end the session");
    println!("─────────────────────────────────────────");
}

fn print_recommendations(variant: Variant, session: &Session, last_added: Option<&str>) {
    match variant {
        Variant::Doctor => {
            println!("Recommendations:");
            for (drug, result) in session.recommendations() {
                match result {
                    RecommendationResult::Best(rec) => println!(
                        "  {} -> {} (Support: {:.2})",
                        drug,
                        rec.primary_consequent().unwrap_or("-"),
                        rec.support
                    ),
                    RecommendationResult::None => {
                        println!("  No recommendations found for {}.", drug)
                    }
                    RecommendationResult::Ranked(_) => {}
                }
            }
        }

        Variant::Pharmacy => {
            let Some(drug) = last_added else { return };
            match session.cached(drug) {
                Some(RecommendationResult::Ranked(recs)) => {
                    println!("Recommended drugs to stock along with {}:", drug);
                    for rec in recs {
                        println!(
                            "  {} (Support: {:.2})",
                            rec.joined_consequents(),
                            rec.support
                        );
                    }
                }
                Some(RecommendationResult::None) => {
                    println!("No recommendations found for {}.", drug)
                }
                _ => {}
            }
        }
    }
}

fn print_list(variant: Variant, session: &Session) {
    match variant {
        Variant::Doctor => println!("Current Medicines List:"),
        Variant::Pharmacy => println!("Current Inventory:"),
    }
    if session.is_empty() {
        match variant {
            Variant::Doctor => println!("  No medicines added yet."),
            Variant::Pharmacy => println!("  No drugs in the inventory yet."),
        }
    } else {
        for drug in session.entries() {
            println!("  - {}", drug);
        }
    }
}

fn prompt_patient(input: &mut impl BufRead) -> Result<Patient> {
    Ok(Patient {
        full_name: prompt_line(input, "Full name: ")?,
        email: prompt_line(input, "Email: ")?,
        telephone: prompt_line(input, "Telephone: ")?,
    })
}

fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
