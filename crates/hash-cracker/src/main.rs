use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use hash_cracker::config::{self, DEFAULT_ALPHABET, DEFAULT_FAILURE_MARKER};
use hash_cracker::model::{export_to_json, export_to_markdown};
use hash_cracker::utils::{ensure_dir, log::init_tracing_subscriber};
use hash_cracker::{
    hex_digest, Algorithm, BruteForce, Cracker, Error, HttpLoginOracle, Keyspace, MatchReport,
    Oracle, Result, SearchResult, Wordlist,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

const OUTPUT_DIR: &str = "output/hash-cracker";

fn main() -> Result<()> {
    let cli = Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .subcommand(
            Command::new("hash")
                .about("Print the digests of a password")
                .arg(
                    Arg::new("password")
                        .help("The password to hash")
                        .value_name("PASSWORD")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("crack")
                .about("Search the passwords behind MD5 / SHA-256 digests")
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .value_name("HASH")
                        .action(ArgAction::Append)
                        .help("Digest to crack, 32 (md5) or 64 (sha256) hex chars, repeatable"),
                )
                .arg(
                    Arg::new("targets-file")
                        .long("targets-file")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("File with one digest per line"),
                )
                .arg(
                    Arg::new("stop-when-found")
                        .long("stop-when-found")
                        .action(ArgAction::SetTrue)
                        .help("Stop once every target is found, skip the rest of the keyspace"),
                )
                .args(keyspace_args())
                .args(run_args()),
        )
        .subcommand(
            Command::new("login")
                .about("Search the password of an account behind an HTML login form")
                .arg(
                    Arg::new("url")
                        .long("url")
                        .value_name("URL")
                        .required(true)
                        .help("The login form action"),
                )
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .value_name("USERNAME")
                        .default_value("admin"),
                )
                .arg(
                    Arg::new("failure-marker")
                        .long("failure-marker")
                        .value_name("TEXT")
                        .default_value(DEFAULT_FAILURE_MARKER)
                        .help("Text of the page shown on a failed login"),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .value_name("MS")
                        .value_parser(value_parser!(u64))
                        .default_value("0")
                        .help("Pause of each worker after a trial"),
                )
                .args(keyspace_args())
                .args(run_args()),
        )
        .arg_required_else_help(true)
        .get_matches();

    match cli.subcommand() {
        Some(("hash", args)) => {
            if let Some(password) = args.get_one::<String>("password") {
                for algo in Algorithm::ALL {
                    println!("{:8}{}", algo.name(), hex_digest(algo, password.as_bytes()));
                }
            }
        }

        Some(("crack", args)) => {
            let run = Run::start(args)?;

            let literals: Vec<String> = args
                .get_many::<String>("target")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            let targets_file = args.get_one::<PathBuf>("targets-file");
            let targets = config::load_targets(&literals, targets_file.map(PathBuf::as_path))?;

            let keyspace = keyspace_from(args)?;
            let cracker = cracker_from(args)?.stop_when_found(args.get_flag("stop-when-found"));

            let result = search(&cracker, keyspace.as_ref(), &targets)?;
            run.export(&result, &format!("{} targets", targets.len()))?;
        }

        Some(("login", args)) => {
            let run = Run::start(args)?;

            let (Some(url), Some(username)) = (
                args.get_one::<String>("url"),
                args.get_one::<String>("username"),
            ) else {
                return Err(Error::CliUsage("--url and --username are required".into()));
            };
            let mut oracle = HttpLoginOracle::new(url, username);
            if let Some(marker) = args.get_one::<String>("failure-marker") {
                oracle = oracle.failure_marker(marker);
            }
            if let Some(delay) = args.get_one::<u64>("delay-ms") {
                oracle = oracle.delay(Duration::from_millis(*delay));
            }

            let keyspace = keyspace_from(args)?;
            // a single account, nothing left to search after the first hit
            let cracker = cracker_from(args)?.stop_when_found(true);

            let result = search(&cracker, keyspace.as_ref(), &oracle)?;
            run.export(&result, &format!("{}@{}", username, url))?;
        }

        // fallback if a cmd is not handled (should not possible)
        _ => {
            error!("{:12} - Command not handled, exit program", "CLI ERROR");
            return Err(Error::CliUsage("Command not handled".into()));
        }
    }

    Ok(())
}

// region:        --- Shared args

fn keyspace_args() -> Vec<Arg> {
    vec![
        Arg::new("alphabet")
            .long("alphabet")
            .value_name("SYMBOLS")
            .default_value(DEFAULT_ALPHABET)
            .help("Symbols of the brute force keyspace, in order"),
        Arg::new("length")
            .short('l')
            .long("length")
            .value_name("LENGTH")
            .value_parser(value_parser!(usize))
            .default_value("5")
            .help("Length of the brute force candidates"),
        Arg::new("wordlist")
            .long("wordlist")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Try the lines of a file instead of brute forcing"),
    ]
}

fn run_args() -> Vec<Arg> {
    vec![
        Arg::new("workers")
            .short('w')
            .long("workers")
            .value_name("N")
            .value_parser(value_parser!(usize))
            .help("Number of workers, defaults to the number of CPU cores"),
        Arg::new("logs")
            .short('s')
            .long("logs")
            .action(ArgAction::SetTrue)
            .help("Save logs into a .log file"),
        Arg::new("output")
            .short('o')
            .long("output")
            .help("Output format")
            .value_name("OUTPUT")
            .value_parser(["json", "md", "both", "none"])
            .default_value("none"),
    ]
}

fn keyspace_from(args: &ArgMatches) -> Result<Box<dyn Keyspace>> {
    if let Some(path) = args.get_one::<PathBuf>("wordlist") {
        return Ok(Box::new(Wordlist::from_file(path)?));
    }

    let alphabet = args
        .get_one::<String>("alphabet")
        .map(String::as_str)
        .unwrap_or(DEFAULT_ALPHABET);
    let length = args
        .get_one::<usize>("length")
        .copied()
        .unwrap_or(config::DEFAULT_LENGTH);
    Ok(Box::new(BruteForce::new(alphabet, length)?))
}

fn cracker_from(args: &ArgMatches) -> Result<Cracker> {
    let workers = args
        .get_one::<usize>("workers")
        .copied()
        .unwrap_or_else(config::default_workers);
    Cracker::new(workers)
}

// endregion:     --- Shared args

// region:        --- Run

/// Output location and format of one invocation.
struct Run {
    output_dir: PathBuf,
    filename: String,
    format: String,
}

impl Run {
    fn start(args: &ArgMatches) -> Result<Self> {
        // create filename
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let filename = format!("{}", timestamp);

        let save_logs = args.get_flag("logs");
        let format = args
            .get_one::<String>("output")
            .cloned()
            .unwrap_or_else(|| "none".to_string());

        // create output dir
        let output_dir = PathBuf::from(OUTPUT_DIR);
        if save_logs || format != "none" {
            ensure_dir(&output_dir)?;
        }

        init_tracing_subscriber(save_logs, &output_dir, &filename);
        info!("Run {}", timestamp);

        Ok(Self {
            output_dir,
            filename,
            format,
        })
    }

    fn export(&self, result: &SearchResult, title: &str) -> Result<()> {
        if self.format == "both" || self.format == "json" {
            let json_path = self.path("json");
            export_to_json(result, &json_path)?;
            println!("Result written to {}", json_path.display());
        }

        if self.format == "both" || self.format == "md" {
            let md_path = self.path("md");
            export_to_markdown(result, title, &md_path)?;
            println!("Result written to {}", md_path.display());
        }
        Ok(())
    }

    fn path(&self, extension: &str) -> PathBuf {
        Path::new(&self.output_dir)
            .join(&self.filename)
            .with_extension(extension)
    }
}

// endregion:     --- Run

fn search<O: Oracle + ?Sized>(
    cracker: &Cracker,
    keyspace: &dyn Keyspace,
    oracle: &O,
) -> Result<SearchResult> {
    // Ctrl+C
    let cancel = cracker.cancel_token();
    if let Err(err) = ctrlc::set_handler(move || {
        eprintln!("\n[!] Stopping...");
        cancel.cancel();
    }) {
        warn!("Ctrl+C handler not installed: {}", err);
    }

    println!(
        "Searching {} candidates with {} workers (Ctrl+C to stop)",
        keyspace.len(),
        cracker.workers()
    );

    let result = cracker.run(keyspace, oracle, |report| {
        println!("{}", found_line(report));
    })?;

    if result.stopped_early {
        println!(
            "Search stopped, {} of {} candidates tried",
            result.candidates_tried(),
            result.keyspace_size
        );
    } else if result.matches.is_empty() {
        println!("Search complete, no match found");
    } else {
        println!("Search complete, {} found", result.matches.len());
    }
    if result.failed_trials() > 0 {
        println!("{} trials failed", result.failed_trials());
    }
    println!("Total time: {:?}", result.elapsed);

    Ok(result)
}

/// Workers are numbered from 1 on the terminal, exports keep the partition
/// ids.
fn found_line(report: &MatchReport) -> String {
    format!(
        "Worker {} - password found: {} ({} ms)",
        report.worker_id + 1,
        report.candidate,
        report.elapsed.as_millis()
    )
}
