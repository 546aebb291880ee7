use anyhow::Context;

use ledgerkit_infra::{AppConfig, config, export};

fn main() -> anyhow::Result<()> {
    let config_path = config::config_path_from_env();
    let (config, created) = AppConfig::load_or_init(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    ledgerkit_observability::init(config.debug);

    if created {
        tracing::info!(path = %config_path.display(), "wrote default config");
    }
    tracing::info!(
        app = %config.app,
        version = config.version,
        languages = ?config.languages,
        "starting demo"
    );

    let audit_path = export::audit_path_from_env();
    let stdout = std::io::stdout();
    ledgerkit_cli::app::run(stdout.lock(), audit_path.as_deref())?;

    Ok(())
}
