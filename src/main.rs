use clap::Parser;

use shop_order::config::RuntimeConfig;
use shop_order::runtime::ServiceRuntime;

/// Shop order microservice node.
#[derive(Parser)]
#[command(name = "shop-order")]
struct Args {
    /// Deployment host; the configuration store, registry, and tracing
    /// collector addresses are derived from it.
    #[arg(long, default_value = "127.0.0.1")]
    ip: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match RuntimeConfig::for_host(&args.ip) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid runtime configuration: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = ServiceRuntime::new(config).run().await {
        // The tracing pipeline may not have survived to this point, so
        // the fatal cause goes to stderr as well.
        tracing::error!(error = %format!("{err:#}"), "service terminated");
        eprintln!("service terminated: {err:#}");
        std::process::exit(1);
    }
}
