use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use white_jersey::actions::{self, ActionError, NewBet, Outcome, Verdict};
use white_jersey::config::{self, Config};
use white_jersey::output;
use white_jersey::records::{ActivityKind, DrinkType, TripRecords};
use white_jersey::scoring::{self, ScoringConfig};
use white_jersey::store::{load_records, JsonStore, StoreError};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_NO_USER: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFLICT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_REJECTED: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Format {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ResultArg {
    Win,
    Loss,
}

impl From<ResultArg> for Outcome {
    fn from(arg: ResultArg) -> Self {
        match arg {
            ResultArg::Win => Outcome::Win,
            ResultArg::Loss => Outcome::Loss,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VerdictArg {
    Guilty,
    Innocent,
}

impl From<VerdictArg> for Verdict {
    fn from(arg: VerdictArg) -> Self {
        match arg {
            VerdictArg::Guilty => Verdict::Guilty,
            VerdictArg::Innocent => Verdict::Innocent,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum DrinkArg {
    #[default]
    Guinness,
    Jameson,
    Other,
}

impl From<DrinkArg> for DrinkType {
    fn from(arg: DrinkArg) -> Self {
        match arg {
            DrinkArg::Guinness => DrinkType::Guinness,
            DrinkArg::Jameson => DrinkType::Jameson,
            DrinkArg::Other => DrinkType::Other,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Rules,
    Inquiries,
    Bets,
    Drinks,
    SideBets,
    MvpVotes,
    Quotes,
    Photos,
}

impl From<KindArg> for ActivityKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Rules => ActivityKind::Rule,
            KindArg::Inquiries => ActivityKind::Inquiry,
            KindArg::Bets => ActivityKind::Bet,
            KindArg::Drinks => ActivityKind::Drink,
            KindArg::SideBets => ActivityKind::SideBet,
            KindArg::MvpVotes => ActivityKind::MvpVote,
            KindArg::Quotes => ActivityKind::Quote,
            KindArg::Photos => ActivityKind::Photo,
        }
    }
}

/// Parse fractional odds such as "5/1" or "5-1"
fn parse_odds(s: &str) -> Result<(u32, u32), String> {
    let (num, den) = s
        .split_once('/')
        .or_else(|| s.split_once('-'))
        .ok_or_else(|| format!("odds must look like 5/1, got '{}'", s))?;
    let num = num.trim().parse().map_err(|_| format!("invalid odds numerator '{}'", num))?;
    let den = den.trim().parse().map_err(|_| format!("invalid odds denominator '{}'", den))?;
    Ok((num, den))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the leaderboard (default if no subcommand)
    Leaderboard {
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Show how a participant's score adds up
    Receipt { user: String },
    /// Show Daily MVP winners and the Quote of the Trip
    Awards,
    /// List everyone's Steward's Rule
    Rules,
    /// List records of one kind with the index numbers other commands take
    List {
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Write a default config file
    Init,
    /// Submit your Steward's Rule (required before anything else)
    Rule { text: String },
    /// File a Steward's Inquiry against another participant
    Inquiry {
        accused: String,
        /// The rule they broke
        #[arg(short, long)]
        rule: String,
        #[arg(short, long)]
        evidence: String,
    },
    /// Vote on an open inquiry
    VoteInquiry {
        index: usize,
        #[arg(value_enum)]
        verdict: VerdictArg,
    },
    /// Close an inquiry you filed
    CloseInquiry { index: usize },
    /// Place a race bet
    Bet {
        race: u32,
        horse: String,
        stake: f64,
        /// Fractional odds, e.g. 5/1
        #[arg(value_parser = parse_odds)]
        odds: (u32, u32),
    },
    /// Settle one of your pending bets
    SettleBet {
        index: usize,
        #[arg(value_enum)]
        result: ResultArg,
    },
    /// Log a drink
    Drink {
        #[arg(value_name = "PUB")]
        pub_name: String,
        #[arg(value_enum, default_value_t = DrinkArg::Guinness)]
        kind: DrinkArg,
    },
    /// Offer a side bet
    SideBet {
        description: String,
        stake: f64,
        /// Name who takes the other side
        #[arg(short, long)]
        taker: Option<String>,
    },
    /// Take the other side of an open side bet
    TakeSideBet { index: usize },
    /// Settle a side bet you are part of ("win" means the creator won)
    SettleSideBet {
        index: usize,
        #[arg(value_enum)]
        result: ResultArg,
    },
    /// Vote for a day's MVP
    Mvp {
        nominee: String,
        /// Day voted for, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Submit a quote
    Quote { speaker: String, text: String },
    /// Vote for a quote
    VoteQuote { index: usize },
    /// Add a photo
    Photo {
        url: String,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// Like a photo
    LikePhoto { index: usize },
}

#[derive(Parser, Debug)]
#[command(name = "white-jersey")]
#[command(about = "Trip leaderboard: rules, inquiries, bets, pints and glory", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/white-jersey/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to trip data file (overrides data_file in config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Who is acting, for commands that record something
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(error: StoreError) -> ! {
    let code = match &error {
        StoreError::Conflict { .. } => EXIT_CONFLICT,
        StoreError::Action(_) => EXIT_REJECTED,
        _ => EXIT_STORE,
    };
    eprintln!("Error: {:#}", anyhow::Error::new(error));
    std::process::exit(code);
}

fn read_records(store: &JsonStore) -> TripRecords {
    load_records(store).unwrap_or_else(|e| fail(e))
}

/// Run an action against the store, exiting on rejection or store failure.
fn apply<T>(store: &JsonStore, mutation: impl FnMut(&mut TripRecords) -> Result<T, ActionError>) -> T {
    store.update(mutation).unwrap_or_else(|e| fail(e))
}

fn acting_user(user: &Option<String>) -> String {
    match user.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            eprintln!("This command records something. Say who you are with --user <name>.");
            std::process::exit(EXIT_NO_USER);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Leaderboard {
        format: Format::default(),
    });

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::get_config_path);

    if let Commands::Init = command {
        if let Err(e) = config::write_default_config(&config_path) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", config_path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config: Config = match config::load_config(Some(config_path.clone())) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let effective_scoring: ScoringConfig = config.scoring();
    if let Err(errors) = scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = config::resolve_data_path(cli.data.map(PathBuf::from), &config, &config_path);
    tracing::debug!(config = %config_path.display(), data = %data_path.display(), "paths resolved");
    let store = JsonStore::new(data_path);
    let use_colors = output::should_use_colors();
    let now = Utc::now();

    match command {
        Commands::Leaderboard { format } => {
            let records = read_records(&store);
            let board = scoring::calculate_leaderboard(&records, &effective_scoring);
            match format {
                Format::Table => println!("{}", output::format_leaderboard(&board, use_colors)),
                Format::Tsv => {
                    let tsv = output::format_tsv(&board);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                Format::Json => match output::format_json(&board) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to render JSON: {}", e);
                        std::process::exit(EXIT_STORE);
                    }
                },
            }
        }
        Commands::Receipt { user } => {
            let records = read_records(&store);
            let board = scoring::calculate_leaderboard(&records, &effective_scoring);
            match board.iter().find(|entry| entry.user == user) {
                Some(entry) => println!("{}", output::format_receipt(entry, use_colors)),
                None => {
                    eprintln!("{} is not on the leaderboard. Submit a rule first.", user);
                    std::process::exit(EXIT_REJECTED);
                }
            }
        }
        Commands::Awards => {
            let records = read_records(&store);
            let dedupe = effective_scoring.mvp_dedupe_per_voter.unwrap_or(false);
            let mvps = scoring::daily_mvp_winners(&records.mvp_votes, dedupe);
            let quote = scoring::quote_of_the_trip(&records.quotes);
            println!("{}", output::format_awards(&mvps, quote, use_colors));
        }
        Commands::Rules => {
            let records = read_records(&store);
            println!("{}", output::format_rules(&records.rules));
        }
        Commands::List { kind } => {
            let records = read_records(&store);
            println!("{}", output::format_rows(&records, kind.into()));
        }
        // Handled before the config is loaded
        Commands::Init => {}
        Commands::Rule { text } => {
            let user = acting_user(&cli.user);
            let index = apply(&store, |records| actions::submit_rule(records, &user, &text, now));
            println!("Rule #{} recorded. Welcome to the trip, {}.", index, user);
        }
        Commands::Inquiry {
            accused,
            rule,
            evidence,
        } => {
            let user = acting_user(&cli.user);
            let index = apply(&store, |records| {
                actions::file_inquiry(records, &user, &accused, &rule, &evidence, now)
            });
            println!("Inquiry #{} filed against {}.", index, accused);
        }
        Commands::VoteInquiry { index, verdict } => {
            let user = acting_user(&cli.user);
            apply(&store, |records| actions::vote_inquiry(records, index, &user, verdict.into()));
            println!("Vote recorded on inquiry #{}.", index);
        }
        Commands::CloseInquiry { index } => {
            let user = acting_user(&cli.user);
            apply(&store, |records| actions::close_inquiry(records, index, &user));
            println!("Inquiry #{} closed.", index);
        }
        Commands::Bet {
            race,
            horse,
            stake,
            odds: (odds_num, odds_den),
        } => {
            let user = acting_user(&cli.user);
            let index = apply(&store, |records| {
                let slip = NewBet {
                    race,
                    horse: horse.clone(),
                    stake,
                    odds_num,
                    odds_den,
                };
                actions::place_bet(records, &user, slip, now)
            });
            println!("Bet #{} placed: race {}, {} @ {}/{}.", index, race, horse, odds_num, odds_den);
        }
        Commands::SettleBet { index, result } => {
            let user = acting_user(&cli.user);
            let payout = apply(&store, |records| actions::settle_bet(records, index, &user, result.into()));
            match result {
                ResultArg::Win => println!("Bet #{} won. Payout {:.2}.", index, payout),
                ResultArg::Loss => println!("Bet #{} lost.", index),
            }
        }
        Commands::Drink { pub_name, kind } => {
            let user = acting_user(&cli.user);
            let drink_type: DrinkType = kind.into();
            apply(&store, |records| actions::log_drink(records, &user, &pub_name, drink_type, now));
            println!("{} at {} logged. Sláinte.", drink_type, pub_name);
        }
        Commands::SideBet {
            description,
            stake,
            taker,
        } => {
            let user = acting_user(&cli.user);
            let index = apply(&store, |records| {
                actions::create_side_bet(records, &user, &description, stake, taker.as_deref(), now)
            });
            println!("Side bet #{} offered.", index);
        }
        Commands::TakeSideBet { index } => {
            let user = acting_user(&cli.user);
            apply(&store, |records| actions::take_side_bet(records, index, &user));
            println!("You took side bet #{}.", index);
        }
        Commands::SettleSideBet { index, result } => {
            let user = acting_user(&cli.user);
            apply(&store, |records| actions::settle_side_bet(records, index, &user, result.into()));
            println!("Side bet #{} settled.", index);
        }
        Commands::Mvp { nominee, day } => {
            let user = acting_user(&cli.user);
            let day = day.unwrap_or_else(|| Local::now().date_naive());
            apply(&store, |records| actions::cast_mvp_vote(records, &user, &nominee, day, now));
            println!("MVP vote for {} on {} recorded.", nominee, day);
        }
        Commands::Quote { speaker, text } => {
            let user = acting_user(&cli.user);
            let index = apply(&store, |records| actions::submit_quote(records, &user, &speaker, &text, now));
            println!("Quote #{} submitted.", index);
        }
        Commands::VoteQuote { index } => {
            let user = acting_user(&cli.user);
            let votes = apply(&store, |records| actions::vote_quote(records, index, &user));
            println!("Quote #{} now has {} votes.", index, votes);
        }
        Commands::Photo { url, caption } => {
            let user = acting_user(&cli.user);
            let index = apply(&store, |records| actions::add_photo(records, &user, &caption, &url, now));
            println!("Photo #{} added.", index);
        }
        Commands::LikePhoto { index } => {
            let user = acting_user(&cli.user);
            let likes = apply(&store, |records| actions::like_photo(records, index, &user));
            println!("Photo #{} now has {} likes.", index, likes);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
