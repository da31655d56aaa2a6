use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use card_relay::adapters::{api_app, FirebaseDocumentStore, StripePaymentAdapter, WalletAppState};
use card_relay::config::AppConfig;
use tokio::signal;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    card_relay::init_tracing(&config.server.log_level, config.server.log_json);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    let payment_provider = StripePaymentAdapter::new(config.payment.stripe_config())?;
    let document_store = FirebaseDocumentStore::new(config.document_store.firebase_config()?)?;

    let state = WalletAppState {
        payment_provider: Arc::new(payment_provider),
        document_store: Arc::new(document_store),
        default_currency: config.payment.charge_currency()?,
    };

    let app = api_app(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        live_mode = config.payment.is_live_mode(),
        "Card relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }

    tokio::time::sleep(Duration::from_millis(250)).await;
}
