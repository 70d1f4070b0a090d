use clap::Parser;
use diagnox::{build_predictor, DatasetFiles, DatasetLoader, ForestConfig, RestApi};
use diagnox_storage::{DEFAULT_DOCTORS_FILE, DEFAULT_INCIDENCE_FILE, DEFAULT_SPECIALTY_FILE};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Symptom-to-disease prediction service
#[derive(Parser, Debug)]
#[command(name = "diagnox")]
#[command(about = "Ranks likely diseases from reported symptoms", long_about = None)]
struct Args {
    /// HTTP port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// HTTP bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the CSV tables
    #[arg(short, long, env = "DIAGNOX_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Disease-by-symptom incidence table
    #[arg(long, env = "DIAGNOX_INCIDENCE_FILE", default_value = DEFAULT_INCIDENCE_FILE)]
    incidence_file: String,

    /// Disease to specialty table
    #[arg(long, env = "DIAGNOX_SPECIALTY_FILE", default_value = DEFAULT_SPECIALTY_FILE)]
    specialty_file: String,

    /// Doctor table
    #[arg(long, env = "DIAGNOX_DOCTORS_FILE", default_value = DEFAULT_DOCTORS_FILE)]
    doctors_file: String,

    /// Number of trees in the forest
    #[arg(long, env = "DIAGNOX_TREES", default_value_t = 100)]
    trees: usize,

    /// Seed for the train/test split and the forest
    #[arg(long, env = "DIAGNOX_SEED", default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for the startup accuracy check (0 disables it)
    #[arg(long, env = "DIAGNOX_TEST_SIZE", default_value_t = 0.10)]
    test_size: f64,

    /// Log level
    #[arg(long, env = "DIAGNOX_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.trees == 0 {
        anyhow::bail!("--trees must be at least 1");
    }
    if !(0.0..1.0).contains(&args.test_size) {
        anyhow::bail!("--test-size must be in [0, 1), got {}", args.test_size);
    }

    info!("Starting Diagnox v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.port);

    let files = DatasetFiles {
        incidence: args.incidence_file.clone(),
        specialty: args.specialty_file.clone(),
        doctors: args.doctors_file.clone(),
    };
    let datasets = DatasetLoader::new(&args.data_dir, files).load()?;

    let config = ForestConfig {
        n_trees: args.trees,
        seed: args.seed,
        ..ForestConfig::default()
    };
    let (predictor, _report) = build_predictor(datasets, &config, args.test_size)?;
    let predictor = Arc::new(predictor);
    info!("Model ready: {:?}", predictor);

    let host = args.host.clone();
    let http_port = args.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(predictor, host, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Diagnox started successfully");
    info!("HTTP API: http://localhost:{}/", args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
