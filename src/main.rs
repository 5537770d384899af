use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(
    name = "phpscope",
    version,
    about = "PHP language server: project symbol index, goto-definition, references, hover"
)]
struct Cli {
    /// Transport carrying editor messages.
    #[arg(long, value_enum, default_value = "stdio")]
    transport: Transport,
}

#[derive(ValueEnum, Copy, Clone)]
enum Transport {
    Stdio,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _guard = phpscope::logging::init_logging("lsp");

    let result = match cli.transport {
        Transport::Stdio => phpscope::lsp::run_server().await,
    };

    if let Err(e) = result {
        tracing::error!("transport failed: {}", e);
        std::process::exit(1);
    }
}
