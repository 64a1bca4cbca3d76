use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use maia_board::{
    App, Configuration, Device, Fen, HttpClient, ModelType, Notice, PredictionApi, Settings,
    Severity, START_FEN, render,
};

#[derive(Parser, Debug)]
#[command(name = "maia-board", version, about = "Console client for a Maia2 prediction server")]
struct Cli {
    /// Base URL of the prediction API (overrides MAIA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the server whether a model is loaded
    Status,
    /// Load a model on the server
    Init(ModelArgs),
    /// Predict moves for a position
    Predict(PredictArgs),
    /// Validate a FEN with the server
    Validate { fen: String },
    /// Render a position locally
    Show {
        #[arg(default_value = START_FEN)]
        fen: String,
    },
    /// Print a standalone HTML page for a position
    Html {
        #[arg(default_value = START_FEN)]
        fen: String,
    },
    /// Interactive session
    Console(ParamArgs),
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    #[arg(long, default_value = "rapid")]
    model_type: ModelType,
    #[arg(long, default_value = "cpu")]
    device: Device,
}

#[derive(Args, Debug, Clone)]
struct ParamArgs {
    #[command(flatten)]
    model: ModelArgs,
    #[arg(long, default_value_t = 1500)]
    elo_self: u32,
    #[arg(long, default_value_t = 1500)]
    elo_opponent: u32,
    #[arg(long, default_value_t = 5)]
    top_k: u32,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long, default_value = START_FEN)]
    fen: String,
    /// Initialize the model first if the server has none loaded
    #[arg(long)]
    init: bool,
    #[command(flatten)]
    params: ParamArgs,
}

impl ParamArgs {
    fn configuration(&self) -> Result<Configuration> {
        Ok(Configuration::new(
            self.model.model_type,
            self.model.device,
            self.elo_self,
            self.elo_opponent,
            self.top_k,
        )?)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(url) = cli.api_url {
        settings = settings.with_api_url(url)?;
    }

    match cli.command {
        Command::Show { fen } => {
            let fen: Fen = fen.parse()?;
            print!("{}", render::text::board(&fen));
        }
        Command::Html { fen } => {
            let fen: Fen = fen.parse()?;
            print!("{}", render::html::page(&fen, None));
        }
        command => run_remote(command, &settings)?,
    }
    Ok(())
}

fn run_remote(command: Command, settings: &Settings) -> Result<()> {
    let client = HttpClient::new(settings)?;
    tracing::info!(api_url = client.base_url(), "using prediction server");

    match command {
        Command::Status => {
            let status = client.status()?;
            println!(
                "{}",
                if status.success && status.initialized {
                    "Modèle prêt"
                } else {
                    "Non initialisé"
                }
            );
        }
        Command::Init(args) => {
            let mut config = Configuration::default();
            config.set_model_type(args.model_type);
            config.set_device(args.device);
            let mut app = App::new(client, config);
            app.set_busy_observer(show_loading);
            app.initialize();
            let ok = app.is_initialized();
            print_notices(app.take_notices());
            if !ok {
                bail!("model initialization failed");
            }
        }
        Command::Validate { fen } => {
            let response = client.validate_fen(&fen)?;
            let message = response.message.unwrap_or_default();
            if response.valid {
                println!("valide {message}");
            } else {
                bail!("FEN invalide: {message}");
            }
        }
        Command::Predict(args) => {
            let mut app = App::new(client, args.params.configuration()?);
            app.set_busy_observer(show_loading);
            app.check_status();
            if !app.is_initialized() && args.init {
                app.initialize();
            }
            if args.fen != START_FEN {
                app.load_fen(&args.fen);
                if app.fen() != args.fen.trim() {
                    print_notices(app.take_notices());
                    bail!("position rejected");
                }
            }
            app.predict();
            print_notices(app.take_notices());
            let Some(result) = app.prediction() else {
                bail!("no prediction");
            };
            print!("{}", render::text::board(app.position()));
            print!("{}", render::text::prediction(Some(result)));
        }
        Command::Console(params) => {
            let mut app = App::new(client, params.configuration()?);
            app.set_busy_observer(show_loading);
            app.check_status();
            console(&mut app).context("console session ended")?;
        }
        Command::Show { .. } | Command::Html { .. } => unreachable!("handled locally"),
    }
    Ok(())
}

fn show_loading(label: Option<&'static str>) {
    if let Some(label) = label {
        eprintln!("… {label}");
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        let tag = match notice.severity {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warning => "attention",
            Severity::Error => "erreur",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}

const HELP: &str = "\
Commandes:
  init                 initialiser le modèle
  predict              prédire les coups pour la position actuelle
  load <fen>           charger une position
  reset                revenir à la position initiale
  set model <rapid|blitz> | device <cpu|gpu> | elo <n> | oppo <n> | topk <n>
  show                 afficher l'échiquier et les résultats
  help                 cette aide
  quit                 quitter";

/// Read commands from stdin until `quit` or end of input.
fn console<C: PredictionApi>(app: &mut App<C>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print_notices(app.take_notices());
    redraw(app);
    println!("{HELP}");

    loop {
        print!("[{}] > ", app.phase());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));

        match cmd {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "help" => println!("{HELP}"),
            "init" => app.initialize(),
            "predict" => app.predict(),
            "load" => app.load_fen(rest),
            "reset" => app.reset(),
            "show" => {}
            "set" => set_param(app, rest),
            other => println!("Commande inconnue: {other}"),
        }

        print_notices(app.take_notices());
        if matches!(cmd, "predict" | "load" | "reset" | "show") {
            redraw(app);
        }
    }
}

fn redraw<C: PredictionApi>(app: &App<C>) {
    print!("{}", render::text::board(app.position()));
    print!("{}", render::text::prediction(app.prediction()));
}

fn set_param<C: PredictionApi>(app: &mut App<C>, args: &str) {
    let (key, value) = args.split_once(' ').unwrap_or((args, ""));
    let value = value.trim();
    let config = app.config_mut();

    let outcome: Result<()> = match key {
        "model" => value.parse().map(|m| config.set_model_type(m)).map_err(Into::into),
        "device" => value.parse().map(|d| config.set_device(d)).map_err(Into::into),
        "elo" => parse_number(value).and_then(|n| Ok(config.set_elo_self(n)?)),
        "oppo" => parse_number(value).and_then(|n| Ok(config.set_elo_opponent(n)?)),
        "topk" => parse_number(value).and_then(|n| Ok(config.set_top_k(n)?)),
        _ => Err(anyhow::anyhow!("paramètre inconnu '{key}'")),
    };

    match outcome {
        Ok(()) => println!("{key} = {value}"),
        Err(e) => println!("Erreur: {e}"),
    }
}

fn parse_number(value: &str) -> Result<u32> {
    value
        .parse()
        .with_context(|| format!("nombre attendu, reçu '{value}'"))
}
