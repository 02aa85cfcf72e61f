//! Atelier binary entry point.

use std::sync::Arc;

use atelier::chat::{ChatEvent, ChatStatus};
use atelier::cli::Cli;
use atelier::config::AtelierConfig;
use atelier::refine::ImageRefinement;
use atelier::store::display_url;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AtelierConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // Print the conversation as it happens
    let sink = Arc::new(|event: ChatEvent| match event {
        ChatEvent::MessageAppended { message, .. } => {
            println!("from: {}", message.from());
            println!("--------------------");
            println!("{}", message.text());
            if let Some(image) = message.image() {
                println!("[image] {}", display_url(&image.url));
            }
            println!("--------------------");
            println!();
        }
        ChatEvent::ImageSaved { path, url } => {
            println!("download image from {} to {}", display_url(&url), path.display());
        }
        ChatEvent::Finished { .. } => {}
    });

    let refinement = ImageRefinement::from_config(&config)?.with_event_sink(sink);
    let outcome = refinement.run().await?;

    match outcome.status {
        ChatStatus::Approved => println!("Approved after {} rounds.", outcome.rounds),
        ChatStatus::RoundLimitReached => {
            println!("No approval within {} rounds.", outcome.rounds)
        }
    }
    if let Some(path) = &outcome.image_path {
        println!("Image: {}", path.display());
    }
    println!(
        "Tokens: {} in / {} out",
        outcome.usage.input_tokens, outcome.usage.output_tokens
    );
    Ok(())
}
