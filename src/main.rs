//! motcache: guess the hidden French encyclopedia article
//!
//! Words are masked; guess them one by one, then guess the title to win.

mod api;
mod config;
mod game;
mod puzzle;
mod similarity;
mod source;
mod storage;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use eyre::{Result, WrapErr};
use log::{info, warn};

use api::{GameService, GuessStatus, PuzzleView, TokenView};
use config::Config;
use game::GameRules;
use puzzle::lemma::{FileLexicon, LemmaResolver};
use puzzle::PuzzleSession;
use similarity::backend::{LexicalBackend, Word2VecBackend};
use similarity::SimilarityModel;
use source::DocumentFetcher;
use storage::PuzzleStore;

fn main() -> Result<()> {
    env_logger::init();

    let config = parse_opts(Config::from_env());

    let lemmas = build_lemma_resolver(&config);
    let model = build_similarity_model(&config);

    let store = if config.use_cache {
        match PuzzleStore::open() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("[storage] Puzzle cache unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    let title = match &config.articles_file {
        Some(path) => {
            source::pick_article_title(path).wrap_err("could not pick an article title")?
        }
        None => config.article_title.clone(),
    };

    let fetcher = config.corpus_dir.clone().map(source::DirectoryFetcher::new);
    let doc = source::load_document(
        &title,
        fetcher.as_ref().map(|f| f as &dyn DocumentFetcher),
        store.as_ref(),
    );

    let rules = GameRules {
        min_guess_length: config.min_guess_length,
        min_label_score: config.min_label_score,
    };
    let session = PuzzleSession::build(&doc, &lemmas, &model);
    let service = GameService::new(session, lemmas, model, rules);

    play(&service)
}

fn parse_opts(mut config: Config) -> Config {
    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .about("Word-masking guessing game over French encyclopedia intros")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("article")
                .long("article")
                .value_name("TITLE")
                .help("Article title to load from the corpus"),
        )
        .arg(
            Arg::new("articles-file")
                .long("articles-file")
                .value_name("PATH")
                .help("Pick a random article title from this file (one per line)"),
        )
        .arg(
            Arg::new("corpus")
                .long("corpus")
                .value_name("DIR")
                .help("Local corpus directory of <slug>.json documents"),
        )
        .arg(
            Arg::new("vectors")
                .long("vectors")
                .value_name("PATH")
                .help("word2vec-format vector table for similarity scoring"),
        )
        .arg(
            Arg::new("lexicon")
                .long("lexicon")
                .value_name("PATH")
                .help("form<TAB>lemma lexicon file for lemmatization"),
        )
        .arg(
            Arg::new("no-cache")
                .long("no-cache")
                .action(ArgAction::SetTrue)
                .help("Skip the on-disk puzzle cache"),
        )
        .get_matches();

    if let Some(title) = matches.get_one::<String>("article") {
        config.article_title = title.clone();
    }
    if let Some(path) = matches.get_one::<String>("articles-file") {
        config.articles_file = Some(PathBuf::from(path));
    }
    if let Some(dir) = matches.get_one::<String>("corpus") {
        config.corpus_dir = Some(PathBuf::from(dir));
    }
    if let Some(path) = matches.get_one::<String>("vectors") {
        config.vectors_path = Some(PathBuf::from(path));
    }
    if let Some(path) = matches.get_one::<String>("lexicon") {
        config.lexicon_path = Some(PathBuf::from(path));
    }
    if matches.get_flag("no-cache") {
        config.use_cache = false;
    }
    config
}

fn build_lemma_resolver(config: &Config) -> LemmaResolver {
    match &config.lexicon_path {
        Some(path) => match FileLexicon::from_path(path) {
            Ok(lexicon) => {
                info!("[lemma] Lexicon ready ({} forms).", lexicon.len());
                LemmaResolver::new(Box::new(lexicon))
            }
            Err(e) => {
                warn!("[lemma] Lexicon unavailable ({}). Using rule fallback.", e);
                LemmaResolver::without_lexicon()
            }
        },
        None => LemmaResolver::without_lexicon(),
    }
}

fn build_similarity_model(config: &Config) -> SimilarityModel {
    if let Some(path) = &config.vectors_path {
        match Word2VecBackend::from_path(path) {
            Ok(backend) => {
                info!("[similarity] Vector table ready ({} words).", backend.len());
                return SimilarityModel::new(Box::new(backend));
            }
            Err(e) => warn!("[similarity] Vector table unavailable ({}).", e),
        }
    }
    if config.lexical_vectors {
        info!("[similarity] Using lexical character-ngram vectors.");
        return SimilarityModel::new(Box::new(LexicalBackend::new()));
    }
    warn!("[similarity] No vector backend configured. Scores will be null.");
    SimilarityModel::disabled()
}

fn play(service: &GameService) -> Result<()> {
    let view = service.puzzle();
    let mut revealed_title: BTreeMap<usize, String> = BTreeMap::new();
    let mut revealed_body: BTreeMap<usize, String> = BTreeMap::new();

    println!(
        "motcache : dévoilez l'article caché ({} mots).",
        view.total_words
    );
    println!("Commandes : !titre <proposition> pour deviner le titre, !quit pour quitter.");
    render(&view, &revealed_title, &revealed_body);

    loop {
        let input: String = dialoguer::Input::new()
            .with_prompt("mot")
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "!quit" || input == "!q" {
            break;
        }
        if let Some(guess) = input.strip_prefix("!titre") {
            let response = service.guess_title(guess);
            if response.solved {
                println!(
                    "Bravo ! Le titre était : {}",
                    response.title.unwrap_or_default()
                );
                break;
            }
            println!("Ce n'est pas le titre.");
            continue;
        }

        let response = service.guess(input);
        match response.status {
            GuessStatus::Invalid => println!("Proposition trop courte."),
            GuessStatus::Unknown => println!("Mot inconnu du dictionnaire."),
            GuessStatus::Hit => {
                let count = response.positions.len();
                if let Some(texts) = response.revealed_texts {
                    revealed_body.extend(texts);
                }
                if let Some(texts) = response.title_revealed_texts {
                    revealed_title.extend(texts);
                }
                println!("Trouvé ! {} position(s) dévoilée(s).", count);
                render(&view, &revealed_title, &revealed_body);
            }
            GuessStatus::Miss => {
                if let Some(texts) = response.title_revealed_texts {
                    revealed_title.extend(texts);
                }
                match response.similarity {
                    Some(best) => println!("Raté. Similarité max : {:.3}", best),
                    None => println!("Raté."),
                }
                let labels = response.word_scores.map_or(0, |s| s.len());
                if labels > 0 {
                    println!("{} mot(s) proche(s) dans le texte.", labels);
                }
            }
        }
    }
    Ok(())
}

fn render(
    view: &PuzzleView,
    revealed_title: &BTreeMap<usize, String>,
    revealed_body: &BTreeMap<usize, String>,
) {
    println!();
    println!(
        "TITRE : {}",
        render_stream(&view.title_tokens, revealed_title)
    );
    println!();
    println!("{}", render_stream(&view.tokens, revealed_body));
    println!();
}

/// Render a masked stream: revealed words show their surface form, hidden
/// words show one block per character, separators pass through.
fn render_stream(tokens: &[TokenView], revealed: &BTreeMap<usize, String>) -> String {
    let mut out = String::new();
    for (pos, token) in tokens.iter().enumerate() {
        match token {
            TokenView::Word { len } => match revealed.get(&pos) {
                Some(text) => out.push_str(text),
                None => out.extend(std::iter::repeat('▁').take(*len)),
            },
            TokenView::Sep { v } => out.push_str(v),
        }
    }
    out
}
