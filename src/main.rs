use anyhow::Context;
use medhub::{
    api,
    cli::{output::Output, repl, Cli, Commands},
    utils::telemetry,
    AppState, HubConfig, RoleRegistry,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = match HubConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("Failed to load {}: {}", cli.config.display(), e));
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    telemetry::init(level, config.server.log_format);
    // The subscriber did not exist while the file was read
    if cli.config.exists() {
        tracing::info!(path = %cli.config.display(), "Loaded configuration");
    } else {
        tracing::info!(path = %cli.config.display(), "No configuration file, using defaults");
    }

    match cli.command() {
        Commands::Config { validate } => show_config(&cli, &config, *validate, &output),
        Commands::Roles => {
            let registry = RoleRegistry::with_overrides(&config.role_overrides());
            repl::print_roles(&registry, &output);
            output.newline();
            Ok(())
        }
        Commands::Chat => chat(config, &output).await,
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            serve(config, &host, port, &output).await
        }
    }
}

fn show_config(cli: &Cli, config: &HubConfig, validate: bool, output: &Output) -> anyhow::Result<()> {
    output.header("Configuration");
    output.kv("File", &cli.config.display().to_string());
    output.kv("Server", &format!("{}:{}", config.server.host, config.server.port));
    output.kv("Model", config.provider.model());
    output.kv("API key env", config.provider.api_key_env());
    output.kv(
        "Hand-off delay",
        &format!("{} ms", config.hub.handoff_delay_ms),
    );
    output.kv("Welcome message", if config.hub.welcome { "on" } else { "off" });
    for key in config.roles.keys() {
        output.list_item(&format!("override: roles.{}", key));
    }

    if validate {
        output.newline();
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn build_state(config: HubConfig) -> anyhow::Result<AppState> {
    AppState::from_config(config).context("Failed to initialize the delegation hub")
}

async fn chat(config: HubConfig, output: &Output) -> anyhow::Result<()> {
    output.banner();
    let state = build_state(config)?;

    let stdin = std::io::stdin();
    repl::run(&state.controller, output, stdin.lock())
        .await
        .context("Chat loop failed")?;

    output.info("Goodbye");
    Ok(())
}

async fn serve(config: HubConfig, host: &str, port: u16, output: &Output) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let state = build_state(config)?;
    let app = api::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    output.banner();
    output.success(&format!("Listening on http://{}", addr));
    tracing::info!(%addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
