use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use url::Url;

use wayfind::{
    AdmissionPolicy, BayesArtifact, BlendedScorer, ClassifierScorer, FeatureWeights, HttpFetcher,
    LexicalScorer, PageGraph, RelevanceScorer, SearchConfig, SearchReport, Searcher,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let term = Term::stdout();
    print_banner();

    loop {
        println!();
        let options = vec![
            "Live best-first search",
            "Offline graph search",
            "Build an offline graph from a live crawl",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to run?")
            .items(&options)
            .default(0)
            .interact_on(&term)?;

        let outcome = match selection {
            0 => run_live_search(&term).await,
            1 => run_offline_search(&term),
            2 => build_offline_graph(&term).await,
            3 => {
                println!("{}", "Goodbye!".bright_blue());
                break;
            }
            _ => unreachable!(),
        };

        if let Err(e) = outcome {
            eprintln!("{} {e:#}", "error:".bright_red().bold());
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "╔══════════════════════════════════════╗".bright_cyan());
    println!("{}", "║        wayfind : web goal search     ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════╝".bright_cyan());
}

async fn run_live_search(term: &Term) -> Result<()> {
    let theme = ColorfulTheme::default();

    let seed: String = Input::with_theme(&theme)
        .with_prompt("Seed URL to begin searching from")
        .interact_text_on(term)?;

    let target_phrase: String = Input::with_theme(&theme)
        .with_prompt("Target phrase to find")
        .interact_text_on(term)?;

    let topic: String = Input::with_theme(&theme)
        .with_prompt("Topic description (optional)")
        .allow_empty(true)
        .interact_text_on(term)?;

    let base_domain: String = Input::with_theme(&theme)
        .with_prompt("Base domain override (empty = derive from seed)")
        .allow_empty(true)
        .interact_text_on(term)?;

    let max_pages: usize = Input::with_theme(&theme)
        .with_prompt("Maximum pages to visit")
        .default(200)
        .interact_text_on(term)?;

    let max_children: usize = Input::with_theme(&theme)
        .with_prompt("Maximum child links per page")
        .default(100)
        .interact_text_on(term)?;

    let timeout_seconds: u64 = Input::with_theme(&theme)
        .with_prompt("Per-request timeout (seconds)")
        .default(5)
        .interact_text_on(term)?;

    let depth_penalty: f64 = Input::with_theme(&theme)
        .with_prompt("Depth penalty per level")
        .default(75.0)
        .interact_text_on(term)?;

    let admission = match Select::with_theme(&theme)
        .with_prompt("Child admission policy")
        .items(&["Streaming cap (page order)", "Rank then cap (top-K by score)"])
        .default(0)
        .interact_on(term)?
    {
        0 => AdmissionPolicy::Streaming,
        _ => AdmissionPolicy::RankThenCap,
    };

    let mut config = SearchConfig::new(seed, target_phrase.clone())
        .with_max_pages(max_pages)
        .with_max_children(max_children)
        .with_timeout(Duration::from_secs(timeout_seconds))
        .with_depth_penalty(depth_penalty)
        .with_admission(admission);
    if !topic.trim().is_empty() {
        config = config.with_topic(topic.trim());
    }
    if !base_domain.trim().is_empty() {
        config = config.with_base_domain(base_domain.trim());
    }

    let scorer = choose_scorer(term, &target_phrase, config.topic_description.as_deref())?;
    let fetcher = HttpFetcher::new(config.timeout);

    println!();
    println!("{}", "Running search...".bright_yellow());

    let report = Searcher::new(fetcher, scorer, config).run().await?;
    print_report(&report);
    Ok(())
}

/// Pick and build the scoring strategy.
fn choose_scorer(
    term: &Term,
    target_phrase: &str,
    topic: Option<&str>,
) -> Result<Box<dyn RelevanceScorer>> {
    let theme = ColorfulTheme::default();

    let choice = Select::with_theme(&theme)
        .with_prompt("Relevance scorer")
        .items(&[
            "Lexical, anchor-heavy preset {4,2,0,1}",
            "Lexical, with-body preset {5,3,2,1}",
            "Classifier artifact (JSON)",
        ])
        .default(0)
        .interact_on(term)?;

    let scorer: Box<dyn RelevanceScorer> = match choice {
        0 | 1 => {
            let weights = if choice == 0 {
                FeatureWeights::ANCHOR_HEAVY
            } else {
                FeatureWeights::WITH_BODY
            };
            match topic {
                Some(topic) => Box::new(BlendedScorer::new(topic, target_phrase, weights)),
                None => Box::new(LexicalScorer::from_text(target_phrase, weights)),
            }
        }
        _ => {
            let path: String = Input::with_theme(&theme)
                .with_prompt("Path to classifier artifact")
                .interact_text_on(term)?;
            let artifact = BayesArtifact::load(&path)
                .with_context(|| format!("loading classifier artifact from {path}"))?;
            Box::new(ClassifierScorer::new(artifact))
        }
    };

    Ok(scorer)
}

fn print_report(report: &SearchReport) {
    println!();
    match &report.path {
        Some(path) => {
            println!(
                "{} {}",
                "Target phrase FOUND at:".bright_green().bold(),
                report.goal.as_ref().map(Url::as_str).unwrap_or_default()
            );
            println!("Path from seed to target:");
            for step in path {
                println!("  {step}");
            }
        }
        None => {
            println!("{}", "Target phrase NOT found.".bright_red().bold());
            println!("Stop reason   : {}", report.termination.label());
        }
    }
    println!("Pages visited : {}", report.pages_visited);
    println!("Time taken    : {:.2} seconds", report.elapsed.as_secs_f64());
}

fn run_offline_search(term: &Term) -> Result<()> {
    let theme = ColorfulTheme::default();

    let path: String = Input::with_theme(&theme)
        .with_prompt("Path to a saved graph (JSON)")
        .interact_text_on(term)?;
    let graph = PageGraph::load(&path).with_context(|| format!("loading graph from {path}"))?;
    println!(
        "Loaded graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let start: String = Input::with_theme(&theme)
        .with_prompt("Start node")
        .interact_text_on(term)?;

    let goal: String = Input::with_theme(&theme)
        .with_prompt("Goal node or description")
        .interact_text_on(term)?;

    let keyword: String = Input::with_theme(&theme)
        .with_prompt("Scoring keyword")
        .default(goal.clone())
        .interact_text_on(term)?;

    let scores = graph.heuristic_scores(&keyword, FeatureWeights::WITH_BODY);

    let started = std::time::Instant::now();
    let path_found = graph.best_first(&start, &goal, &scores);
    let elapsed = started.elapsed();

    println!();
    match path_found {
        Some(steps) => {
            println!("{}", "Goal reached.".bright_green().bold());
            println!("Path from start to goal:");
            for step in &steps {
                println!("  {step}");
            }
        }
        None => println!("{}", "Goal NOT reached.".bright_red().bold()),
    }
    println!("Time taken    : {:.4} seconds", elapsed.as_secs_f64());
    Ok(())
}

async fn build_offline_graph(term: &Term) -> Result<()> {
    let theme = ColorfulTheme::default();

    let seed: String = Input::with_theme(&theme)
        .with_prompt("Seed URL to crawl from")
        .interact_text_on(term)?;
    let seed = Url::parse(seed.trim()).context("invalid seed URL")?;

    let depth: usize = Input::with_theme(&theme)
        .with_prompt("Crawl depth")
        .default(2)
        .interact_text_on(term)?;

    let timeout_seconds: u64 = Input::with_theme(&theme)
        .with_prompt("Per-request timeout (seconds)")
        .default(5)
        .interact_text_on(term)?;

    let output: String = Input::with_theme(&theme)
        .with_prompt("Output file")
        .default("crawled_graph.json".to_string())
        .interact_text_on(term)?;

    if std::path::Path::new(&output).exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!("{output} exists, overwrite?"))
            .default(false)
            .interact_on(term)?
    {
        return Ok(());
    }

    println!("{}", "Crawling...".bright_yellow());
    let fetcher = HttpFetcher::new(Duration::from_secs(timeout_seconds));
    let graph = PageGraph::from_crawl(&fetcher, &seed, depth).await;

    graph
        .save(&output)
        .with_context(|| format!("saving graph to {output}"))?;
    println!(
        "{} {} nodes, {} edges written to {}",
        "Done:".bright_green().bold(),
        graph.node_count(),
        graph.edge_count(),
        output
    );
    Ok(())
}
