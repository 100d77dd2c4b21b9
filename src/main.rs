use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tipflow::application::payments::PaymentService;
use tipflow::application::settlement::TipSettlement;
use tipflow::config::{DEFAULT_CALLBACK_URL, DEFAULT_CURRENCY, PaymentConfig, SettlementConfig};
use tipflow::domain::ports::{NotifierBox, PaymentProviderBox, TipLedgerBox};
use tipflow::domain::tip::TipRequest;
use tipflow::infrastructure::in_memory::{
    InMemoryCreatorDirectory, InMemoryPaymentAttemptStore, InMemoryTipLedger,
};
use tipflow::infrastructure::notify::{LogNotifier, WebhookNotifier};
use tipflow::infrastructure::payment::{HttpPaymentProvider, SimulatedPaymentProvider};
use tipflow::interfaces::csv::load_directory;
use tipflow::interfaces::http::error::ApiError;
use tipflow::interfaces::http::handlers::TipResponse;
use tipflow::interfaces::http::{AppState, router};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Settle a single tip and print the JSON response
    Settle(SettleArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Creators CSV file (handle,display_name,email,wallet_address)
    #[arg(long, env = "TIPFLOW_CREATORS")]
    creators: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "TIPFLOW_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Currency code stamped on every tip
    #[arg(long, env = "TIPFLOW_CURRENCY", default_value = DEFAULT_CURRENCY)]
    currency: String,

    /// Webhook that delivers creator notifications. Logs them when absent.
    #[arg(long, env = "TIPFLOW_NOTIFY_WEBHOOK")]
    notify_webhook: Option<String>,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long, env = "TIPFLOW_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "TIPFLOW_PORT", default_value_t = 3000)]
    port: u16,

    /// Base URL of the wallet payment provider. Simulated when absent.
    #[arg(long, env = "TIPFLOW_PAYMENT_PROVIDER_URL")]
    payment_provider_url: Option<String>,

    /// URL the provider calls back with payment completion
    #[arg(long, env = "TIPFLOW_CALLBACK_URL", default_value = DEFAULT_CALLBACK_URL)]
    callback_url: String,
}

#[derive(Args)]
struct SettleArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long)]
    handle: String,

    #[arg(long)]
    amount: Decimal,

    #[arg(long)]
    message: Option<String>,

    #[arg(long)]
    tipper_name: Option<String>,

    #[arg(long)]
    tipper_email: Option<String>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tipflow=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_ledger(db_path: Option<PathBuf>) -> Result<TipLedgerBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let ledger = tipflow::infrastructure::rocksdb::RocksDbTipLedger::open(path)
                .into_diagnostic()?;
            Ok(Box::new(ledger))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryTipLedger::new()))
        }
        None => Ok(Box::new(InMemoryTipLedger::new())),
    }
}

fn notifier(webhook: Option<String>) -> Result<NotifierBox> {
    match webhook {
        Some(url) => Ok(Box::new(WebhookNotifier::new(url).into_diagnostic()?)),
        None => Ok(Box::new(LogNotifier)),
    }
}

/// Builds the settlement path. The directory is returned so `serve` can share it.
async fn settlement(common: CommonArgs) -> Result<(TipSettlement, InMemoryCreatorDirectory)> {
    let directory = load_directory(&common.creators).await.into_diagnostic()?;
    info!(creators = directory.len().await, "creator directory loaded");

    let settlement = TipSettlement::new(
        Box::new(directory.clone()),
        open_ledger(common.db_path)?,
        notifier(common.notify_webhook)?,
        SettlementConfig {
            currency: common.currency,
            ..Default::default()
        },
    );
    Ok((settlement, directory))
}

async fn serve(args: ServeArgs) -> Result<()> {
    let currency = args.common.currency.clone();
    let (settlement, directory) = settlement(args.common).await?;

    let provider: PaymentProviderBox = match args.payment_provider_url {
        Some(url) => Box::new(HttpPaymentProvider::new(url).into_diagnostic()?),
        None => {
            info!("no payment provider configured, using simulated payments");
            Box::new(SimulatedPaymentProvider::new())
        }
    };
    let payments = PaymentService::new(
        Box::new(directory),
        provider,
        Box::new(InMemoryPaymentAttemptStore::new()),
        PaymentConfig {
            currency,
            callback_url: args.callback_url,
        },
    );

    let app = router(AppState::new(settlement, payments));
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .into_diagnostic()?;
    info!("tipflow listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

async fn settle(args: SettleArgs) -> Result<ExitCode> {
    let (settlement, _) = settlement(args.common).await?;

    let request = TipRequest {
        creator_handle: args.handle,
        amount: args.amount,
        message: args.message,
        tipper_name: args.tipper_name,
        tipper_email: args.tipper_email,
        payment_id: None,
    };

    let (body, code) = match settlement.settle_tip(request).await {
        Ok(confirmation) => (
            serde_json::to_string(&TipResponse::from(confirmation)),
            ExitCode::SUCCESS,
        ),
        Err(e) => {
            let (_, body) = ApiError(e).status_and_body();
            (serde_json::to_string(&body), ExitCode::FAILURE)
        }
    };
    println!("{}", body.into_diagnostic()?);
    Ok(code)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    init_tracing();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await.map(|_| ExitCode::SUCCESS),
        Command::Settle(args) => settle(args).await,
    }
}
