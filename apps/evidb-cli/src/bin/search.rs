use std::env;
use std::io::{self, Write};

use tracing_subscriber::EnvFilter;

use evidb_core::config::{Config, ConfirmPolicy};
use evidb_core::types::ResultRecord;
use evidb_engine::FilteredSearchEngine;
use evidb_filter::{confirmer_for, FilterTier};

const SNIPPET_CHARS: usize = 500;

#[derive(Debug, PartialEq)]
struct Options {
    query: Option<String>,
    k: usize,
    interactive: bool,
    basic: bool,
    confirm: Option<ConfirmPolicy>,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [-k N] [--basic] [--yes|--no] <query words...>\n       {prog} --interactive [-k N] [--basic] [--yes|--no]\nExample: {prog} 'montessori attention study'"
    )
}

fn is_exit_keyword(input: &str) -> bool {
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}

/// Errors carry the message to print before exiting with status 1.
fn parse_args(prog: &str, args: &[String], default_k: usize) -> Result<Options, String> {
    let mut opts = Options { query: None, k: default_k, interactive: false, basic: false, confirm: None };
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-i" | "--interactive" => opts.interactive = true,
            "--basic" => opts.basic = true,
            "--yes" | "-y" => opts.confirm = Some(ConfirmPolicy::Always),
            "--no" | "-n" => opts.confirm = Some(ConfirmPolicy::Never),
            "-k" => {
                let value = iter.next().ok_or_else(|| format!("-k needs a value\n{}", usage(prog)))?;
                opts.k = match value.parse::<usize>() {
                    Ok(k) if k >= 1 => k,
                    _ => return Err(format!("-k must be a positive integer, got '{value}'\n{}", usage(prog))),
                };
            }
            _ => words.push(arg.as_str()),
        }
    }
    if !words.is_empty() { opts.query = Some(words.join(" ")); }
    if opts.query.is_none() && !opts.interactive {
        return Err(format!("Query needed!\n{}", usage(prog)));
    }
    Ok(opts)
}

fn print_results(results: &[ResultRecord]) {
    for (i, r) in results.iter().enumerate() {
        println!("\n--- Result {} ---", i + 1);
        println!("Score: {:.4}", r.score);
        println!("Source: {} ({})", r.source_title, r.source_type);
        println!("Evidence Type: {}", r.evidence_type.as_deref().unwrap_or("-"));
        if let Some(approach) = &r.approach { println!("Approach: {approach}"); }
        if let Some(domain) = &r.domain { println!("Domain: {domain}"); }
        let text = if r.raw_text.is_empty() { &r.text } else { &r.raw_text };
        let snippet: String = text.chars().take(SNIPPET_CHARS).collect();
        println!("Text: {snippet}...");
    }
}

fn run_query(engine: &FilteredSearchEngine, query: &str, k: usize, basic: bool) -> anyhow::Result<()> {
    println!("\n=== QUERY: {query} ===");
    let results: Vec<ResultRecord> = if basic {
        engine.search_unfiltered(query, k)?.collect()
    } else {
        let outcome = engine.search_with_report(query, k)?;
        if !outcome.filters.is_empty() {
            println!("\t** attempting filters: {} **", outcome.filters);
        }
        match outcome.tier {
            FilterTier::Full => println!("\t** filters valid! proceeding... **"),
            FilterTier::ApproachOnly | FilterTier::Relaxed => println!(
                "\t** filters invalid! reverting to approach={} **",
                outcome.filters.approach.as_deref().unwrap_or("none")
            ),
            FilterTier::Declined => println!("\t** filters skipped **"),
            FilterTier::Unfiltered => {}
        }
        outcome.results.collect()
    };
    if results.is_empty() { println!("\nNo results."); }
    print_results(&results);
    println!("\n=== END SEARCH ===\n");
    Ok(())
}

fn interactive_loop(engine: &FilteredSearchEngine, k: usize, basic: bool) -> anyhow::Result<()> {
    println!("Enter a query, or 'q' to quit.");
    loop {
        print!("search> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 { break; }
        let input = input.trim();
        if input.is_empty() { continue; }
        if is_exit_keyword(input) { break; }
        if let Err(e) = run_query(engine, input, k, basic) { eprintln!("❌ Search error: {e:#}"); }
    }
    println!("👋 Goodbye!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e}"); e })?;
    let settings = config.settings()?;

    let mut args: Vec<String> = env::args().collect();
    let prog = if args.is_empty() { "evidb-search".to_string() } else { args.remove(0) };
    let opts = match parse_args(&prog, &args, settings.search.default_k) {
        Ok(opts) => opts,
        Err(msg) => { eprintln!("{msg}"); std::process::exit(1); }
    };

    let policy = opts.confirm.unwrap_or(settings.search.confirm);
    let engine = FilteredSearchEngine::from_config(&config, confirmer_for(policy))?;

    if let Some(query) = &opts.query {
        run_query(&engine, query, opts.k, opts.basic)?;
    }
    if opts.interactive {
        interactive_loop(&engine, opts.k, opts.basic)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> { items.iter().map(|s| (*s).to_string()).collect() }

    #[test]
    fn words_join_into_one_query() {
        let opts = parse_args("evidb-search", &args(&["montessori", "attention", "study"]), 5).expect("parse");
        assert_eq!(opts.query.as_deref(), Some("montessori attention study"));
        assert_eq!(opts.k, 5);
        assert!(!opts.interactive);
    }

    #[test]
    fn flags_override_defaults() {
        let opts = parse_args("evidb-search", &args(&["-k", "3", "--basic", "--no", "pink", "tower"]), 5).expect("parse");
        assert_eq!(opts, Options {
            query: Some("pink tower".to_string()),
            k: 3,
            interactive: false,
            basic: true,
            confirm: Some(ConfirmPolicy::Never),
        });
        let opts = parse_args("evidb-search", &args(&["-i", "--yes"]), 5).expect("parse");
        assert!(opts.interactive && opts.query.is_none());
        assert_eq!(opts.confirm, Some(ConfirmPolicy::Always));
    }

    #[test]
    fn bad_k_is_rejected() {
        assert!(parse_args("evidb-search", &args(&["-k", "0", "q"]), 5).is_err());
        assert!(parse_args("evidb-search", &args(&["-k", "many", "q"]), 5).is_err());
        assert!(parse_args("evidb-search", &args(&["query", "-k"]), 5).is_err());
    }

    #[test]
    fn missing_query_without_interactive_reports_usage() {
        let msg = parse_args("evidb-search", &args(&[]), 5).expect_err("no query");
        assert!(msg.starts_with("Query needed!"));
        assert!(msg.contains("Usage: evidb-search"));
        let msg = parse_args("evidb-search", &args(&["-k", "3", "--basic"]), 5).expect_err("flags only");
        assert!(msg.contains("Usage: evidb-search"));
        assert!(parse_args("evidb-search", &args(&["--interactive"]), 5).is_ok());
    }

    #[test]
    fn exit_keywords_end_the_interactive_loop() {
        for word in ["q", "Q", "quit", "QUIT", "Quit"] {
            assert!(is_exit_keyword(word), "{word} should exit");
        }
        for word in ["", "query", "qq", "quit now", "pink tower"] {
            assert!(!is_exit_keyword(word), "{word} should search");
        }
    }
}
