//! Acronym Puzzles - CLI
//!
//! Plays and administers acronym puzzles against a JSON catalog.

use acronym_puzzles::{
    auth::{IdentityResolver, StaticResolver, TokenFileResolver, authenticate, with_identity},
    commands::run_audit,
    config::Settings,
    core::{GameMode, UserId},
    logging,
    output::{
        print_audit_report, print_card, print_categories, print_endless_batch, print_evaluation,
        print_level_window, print_progress, print_scores,
    },
    service::{
        ApiError, Clock, FixedClock, GameService, SystemClock,
        types::{
            DailyRequest, EndlessRequest, EndlessSubmitRequest, GuessRequest, LevelsRequest,
            ProgressRequest, PuzzleRef,
        },
    },
    store::{Catalog, MemoryStore},
};
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "acronym_puzzles",
    about = "Acronym sentence puzzles: guess scoring, levels, endless and daily modes",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog: 'sample' (default, built in) or path to a JSON catalog file
    #[arg(short, long, global = true, default_value = "sample", env = "ACRONYM_CATALOG")]
    catalog: String,

    /// Settings file (JSON)
    #[arg(long, global = true, env = "ACRONYM_CONFIG")]
    config: Option<PathBuf>,

    /// Access token for player commands
    #[arg(short, long, global = true, env = "ACRONYM_TOKEN")]
    token: Option<String>,

    /// Play as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Log filter, e.g. 'debug' or 'acronym_puzzles=trace'
    #[arg(long, global = true)]
    log: Option<String>,

    /// Print raw JSON responses
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories (personalised when a token is given)
    Categories {
        /// Add endless high scores or daily badges: endless, daily
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<GameMode>,
    },

    /// Count the puzzles in a category
    Count { slug: String },

    /// Show a puzzle's acronym and clue
    Puzzle { slug: String, level: i64 },

    /// Reveal a puzzle's solution
    Solution { slug: String, level: i64 },

    /// Score a guess
    Guess {
        slug: String,
        level: i64,
        /// The guessed sentence
        message: String,
    },

    /// Browse levels (defaults to the page around your next unsolved level)
    Levels {
        slug: String,

        #[arg(long)]
        center: Option<i64>,

        #[arg(long)]
        after: Option<i64>,

        #[arg(long)]
        before: Option<i64>,
    },

    /// Record a finished puzzle
    #[command(allow_negative_numbers = true)]
    Submit {
        slug: String,
        level: i64,
        score: i64,

        /// Game mode: levelup, endless, daily
        #[arg(short, long, default_value = "levelup", value_parser = parse_mode)]
        mode: GameMode,

        /// Serialized attempt history
        #[arg(short, long)]
        attempts: Option<String>,
    },

    /// Draw a random batch of puzzles
    Endless {
        slug: String,

        /// Positions already played, comma separated
        #[arg(short = 'x', long, value_delimiter = ',', allow_negative_numbers = true)]
        exclude: Vec<i64>,
    },

    /// Submit an endless run score
    #[command(allow_negative_numbers = true)]
    EndlessSubmit { slug: String, score: i64 },

    /// Show your endless high scores
    Scores,

    /// Show today's puzzle
    Daily { slug: String },

    /// Validate every puzzle in the catalog
    Audit,
}

impl Commands {
    /// Whether the command writes progress or scores
    const fn mutates(&self) -> bool {
        matches!(self, Self::Submit { .. } | Self::EndlessSubmit { .. })
    }
}

fn parse_mode(name: &str) -> Result<GameMode, String> {
    GameMode::from_name(name).ok_or_else(|| format!("unknown game mode '{name}'"))
}

/// Where the catalog comes from, based on the -c flag
enum CatalogSource {
    Sample,
    File(PathBuf),
}

impl CatalogSource {
    fn from_arg(arg: &str) -> Self {
        match arg {
            "sample" => Self::Sample,
            path => Self::File(PathBuf::from(path)),
        }
    }

    fn load(&self) -> Result<Catalog> {
        Ok(match self {
            Self::Sample => Catalog::sample()?,
            Self::File(path) => Catalog::load(path)?,
        })
    }

    fn resolver(&self, catalog: &Catalog, settings: &Settings) -> Box<dyn IdentityResolver> {
        match self {
            Self::Sample => Box::new(StaticResolver::new(catalog.tokens.clone())),
            Self::File(path) => Box::new(TokenFileResolver::new(path, settings.key_ttl())),
        }
    }
}

type Service = GameService<MemoryStore, FixedClock>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    logging::init(cli.log.as_deref(), &settings.log)?;

    let source = CatalogSource::from_arg(&cli.catalog);
    let mut catalog = source.load()?;
    let resolver = source.resolver(&catalog, &settings);

    if matches!(cli.command, Commands::Audit) {
        return run_audit_command(&catalog, cli.json);
    }

    let today = cli.today.unwrap_or_else(|| SystemClock.today());
    let service = GameService::with_clock(
        MemoryStore::from_catalog(&catalog),
        FixedClock(today),
        settings,
    );
    let header = cli.token.as_deref().map(|token| format!("Bearer {token}"));
    let session = Session {
        service: &service,
        resolver: resolver.as_ref(),
        header: header.as_deref(),
        json: cli.json,
    };

    let mutates = cli.command.mutates();
    session.run(cli.command)?;

    if mutates && let CatalogSource::File(path) = &source {
        save_catalog(&service, &mut catalog, path)?;
    }
    Ok(())
}

struct Session<'a> {
    service: &'a Service,
    resolver: &'a dyn IdentityResolver,
    header: Option<&'a str>,
    json: bool,
}

impl Session<'_> {
    fn run(&self, command: Commands) -> Result<()> {
        let service = self.service;
        match command {
            Commands::Categories { mode } => {
                // Anonymous listings are allowed; a bad token is still an error
                let user = self
                    .header
                    .map(|_| authenticate(self.header, self.resolver))
                    .transpose()
                    .map_err(|err| api_error(err.into()))?;
                let categories = service.categories(user.as_ref(), mode).map_err(api_error)?;
                self.emit(&categories, |categories| print_categories(categories))
            }
            Commands::Count { slug } => {
                let count = service.puzzle_count(&slug).map_err(api_error)?;
                self.emit(&count, |count| println!("{}", count.count))
            }
            Commands::Puzzle { slug, level } => {
                let card = service
                    .puzzle(&PuzzleRef { slug, level_num: level })
                    .map_err(api_error)?;
                self.emit(&card, print_card)
            }
            Commands::Solution { slug, level } => {
                let solution = service
                    .solution(&PuzzleRef { slug, level_num: level })
                    .map_err(api_error)?;
                self.emit(&solution, |solution| println!("{}", solution.solution))
            }
            Commands::Guess {
                slug,
                level,
                message,
            } => {
                let request = GuessRequest {
                    puzzle: PuzzleRef { slug, level_num: level },
                    message: Some(message.clone()),
                };
                let evaluation = service.guess(&request).map_err(api_error)?;
                self.emit(&evaluation, |evaluation| print_evaluation(&message, evaluation))
            }
            Commands::Levels {
                slug,
                center,
                after,
                before,
            } => {
                let request = LevelsRequest {
                    slug,
                    after_position: after,
                    before_position: before,
                    center_position: center,
                };
                let window = self.as_player(|user| service.levels(user, &request))?;
                self.emit(&window, print_level_window)
            }
            Commands::Submit {
                slug,
                level,
                score,
                mode,
                attempts,
            } => {
                let request = ProgressRequest {
                    slug,
                    level_num: level,
                    score,
                    game_mode: mode,
                    attempts_data: attempts,
                };
                let response = self.as_player(|user| service.submit_progress(user, &request))?;
                self.emit(&response, print_progress)
            }
            Commands::Endless { slug, exclude } => {
                let request = EndlessRequest {
                    slug,
                    last_position: exclude,
                };
                let batch = self.as_player(|user| service.endless_levels(user, &request))?;
                self.emit(&batch, print_endless_batch)
            }
            Commands::EndlessSubmit { slug, score } => {
                let request = EndlessSubmitRequest { slug, score };
                let response = self.as_player(|user| service.endless_submit(user, &request))?;
                self.emit(&response, |response| {
                    println!("High score: {}", response.high_score);
                })
            }
            Commands::Scores => {
                let scores = self.as_player(|user| service.endless_scores(user))?;
                self.emit(&scores, |scores| print_scores(scores))
            }
            Commands::Daily { slug } => {
                let card = service.daily(&DailyRequest { slug }).map_err(api_error)?;
                self.emit(&card, print_card)
            }
            Commands::Audit => Err(anyhow!("audit runs without a session")),
        }
    }

    /// Run a player command as the token's owner
    fn as_player<T>(&self, handler: impl FnOnce(&UserId) -> Result<T, ApiError>) -> Result<T> {
        with_identity(self.header, self.resolver, handler).map_err(api_error)
    }

    fn emit<T: Serialize>(&self, value: &T, pretty: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            pretty(value);
        }
        Ok(())
    }
}

fn api_error(err: ApiError) -> anyhow::Error {
    anyhow!("{} (status {})", err, err.status())
}

fn run_audit_command(catalog: &Catalog, json: bool) -> Result<()> {
    let report = run_audit(catalog, !json);
    if json {
        let issues: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        print_audit_report(&report);
    }
    if !report.is_clean() {
        bail!("catalog has {} issue(s)", report.issues.len());
    }
    Ok(())
}

fn save_catalog(service: &Service, catalog: &mut Catalog, path: &Path) -> Result<()> {
    service.store().write_into(catalog)?;
    catalog.save(path)?;
    info!(path = %path.display(), "catalog saved");
    Ok(())
}
