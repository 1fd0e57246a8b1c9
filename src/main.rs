use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod classifier;
mod lexicon;
mod statistics;

use api::Templates;
use classifier::Classifier;
use lexicon::LexiconClassifier;
use statistics::Aggregator;

#[derive(Parser)]
#[command(name = "sentiment-meter")]
#[command(about = "Score text sentiment and keep running statistics")]
struct Args {
    #[arg(long, env = "BIND", default_value = "0.0.0.0")]
    bind: String,

    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Directory containing sentiment.html and clock.html
    #[arg(long, env = "TEMPLATES_DIR", default_value = "templates")]
    templates: PathBuf,

    /// JSON lexicon replacing the built-in word list
    #[arg(long, env = "LEXICON_PATH")]
    lexicon: Option<PathBuf>,

    /// Largest accepted /analyze body in bytes
    #[arg(long, env = "MAX_BODY", default_value_t = api::DEFAULT_MAX_BODY)]
    max_body: usize,

    /// Tokens read by the classifier, the rest of the text is ignored
    #[arg(long, default_value_t = lexicon::DEFAULT_MAX_TOKENS)]
    max_tokens: usize,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("INFO"));

    let args = Args::parse();

    let templates = args
        .templates
        .canonicalize()
        .with_context(|| format!("Invalid templates directory {}", args.templates.display()))?;
    log::info!("Serving pages from {}", templates.display());

    let model = LexiconClassifier::load(args.lexicon.as_deref(), args.max_tokens)
        .context("Failed to load sentiment model")?;
    let words = model.lexicon().word_count();
    match &args.lexicon {
        Some(path) => log::info!("Loaded lexicon from {}: words={}", path.display(), words),
        None => log::info!("Loaded built-in lexicon: words={}", words),
    }
    let classifier = web::Data::from(Arc::new(model) as Arc<dyn Classifier>);
    let aggregator = web::Data::new(Aggregator::new());
    let templates = web::Data::new(Templates(templates));
    let max_body = args.max_body;

    log::info!("Starting HTTP server at http://{}:{}", args.bind, args.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(classifier.clone())
            .app_data(aggregator.clone())
            .app_data(templates.clone())
            .app_data(web::JsonConfig::default().limit(max_body))
            .configure(api::configure)
    })
    .bind((args.bind.as_str(), args.port))?
    .run()
    .await?;

    Ok(())
}
