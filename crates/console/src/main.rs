use anyhow::Context;
use careadmin_client::ClientConfig;
use careadmin_console::appbar::AppBar;
use careadmin_console::cli::Cli;
use careadmin_console::{App, TerminalPrompt, commands};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    careadmin_observability::init();

    let config = ClientConfig::from_env();
    if config.base_url().is_empty() {
        tracing::warn!(context = ?config.context, "no API base URL configured; requests use relative paths");
    }

    let prompt = TerminalPrompt { assume_yes: cli.yes };
    let app = App::from_config(&config, Box::new(prompt)).context("initialising client")?;

    commands::run(&app, cli.command, cli.output).await?;

    if let Some(bar) = AppBar::mount(app.storage.as_ref(), &app.route()) {
        eprintln!("{}", bar.render());
    }

    if app.toasts.had_error() {
        std::process::exit(1);
    }
    Ok(())
}
