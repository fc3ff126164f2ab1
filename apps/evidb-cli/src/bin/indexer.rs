use std::env;
use std::io;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use evidb_core::config::Config;
use evidb_core::corpus::load_documents;
use evidb_tfidf::{build_index, TfidfBuilder, TfidfParams};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e}"); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let corpus_path = args.first().map(PathBuf::from).unwrap_or_else(|| settings.data.corpus_file());
    let index_path = args.get(1).map(PathBuf::from).unwrap_or_else(|| settings.data.index_file());

    println!("🔧 evidb-indexer\n===============");
    println!("Corpus: {}", corpus_path.display());
    println!("Index:  {}", index_path.display());

    let documents = load_documents(&corpus_path)?;
    let params = TfidfParams::from(&settings.index);
    info!(?params, "fitting tf-idf model");
    let builder = TfidfBuilder::new(params).with_progress(true);
    let index = build_index(&documents, &builder)?;
    index.save(&index_path)?;

    println!("✅ Index built: {} documents, vocabulary of {} terms", index.len(), index.model().vocab_size());
    Ok(())
}
