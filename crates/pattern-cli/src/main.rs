use pattern_lens::{build_cli, resolve_config, run};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let config = resolve_config(&matches)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(version = pattern_lens::VERSION, "pattern-lens starting");

    let report = run(&matches, &config).await?;
    if report.success {
        print!("{}", report.body);
        Ok(())
    } else {
        eprint!("{}", report.body);
        std::process::exit(1);
    }
}
