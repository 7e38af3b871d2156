//! Lyra command line: build the index offline, then ask questions.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lyra_agents::ResearchPipeline;
use lyra_core::Llm;
use lyra_model::OpenAIResponsesClient;
use lyra_rag::{
    FixedSizeChunker, HybridRetriever, LlmReranker, OpenAIEmbeddingProvider, Retriever, cache,
    corpus, format_context,
};

mod config;

use config::Config;

/// Retrieval depth for direct answers.
const DIRECT_TOP_K: usize = 5;

const ANSWER_SYSTEM: &str = "You are a careful analyst of song lyrics.

Answer the question using ONLY the provided context. Quote lyric fragments
verbatim and cite the song they come from. If the context does not contain
enough to answer, say so plainly instead of guessing.";

#[derive(Parser)]
#[command(name = "lyra", version, about = "Grounded research over a song-lyrics corpus")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the corpus, embed it, and persist the chunk index.
    BuildIndex,
    /// Ask a question against the persisted index.
    Ask {
        /// The question to research.
        question: String,
        /// Run the full multi-stage pipeline instead of a one-shot answer.
        #[arg(long)]
        deep: bool,
        /// Print the pipeline's diagnostic trace after the report.
        #[arg(long)]
        show_trace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::BuildIndex => build_index(&config).await,
        Command::Ask { question, deep, show_trace } => {
            ask(&config, &question, deep, show_trace).await
        }
    }
}

async fn build_index(config: &Config) -> Result<()> {
    let raw = fs::read_to_string(&config.corpus_path)
        .with_context(|| format!("failed to read corpus at {:?}", config.corpus_path))?;

    let documents = corpus::parse_corpus(&raw);
    anyhow::ensure!(
        !documents.is_empty(),
        "corpus at {:?} produced no documents; check its format",
        config.corpus_path
    );

    let embedder = OpenAIEmbeddingProvider::new(config.api_key.clone())?
        .with_model(config.embed_model.clone(), config.embed_dimensions);
    let chunker = FixedSizeChunker::default();

    let index = lyra_rag::ChunkIndex::build(&documents, &chunker, &embedder).await?;
    index.persist(&config.persist_dir)?;

    println!(
        "Indexed {} documents into {} chunks under {:?}",
        documents.len(),
        index.len(),
        config.persist_dir
    );
    Ok(())
}

async fn make_retriever(config: &Config) -> Result<(Arc<dyn Retriever>, Arc<OpenAIResponsesClient>)> {
    let index = cache::load_or_init(&config.persist_dir).await?;

    // A query embedded with a different model than the index was built with
    // degrades retrieval silently, so flag it loudly.
    if index.meta().embed_model != config.embed_model {
        warn!(
            index_model = %index.meta().embed_model,
            query_model = %config.embed_model,
            "embedding model mismatch between index and configuration"
        );
    }

    let embedder = Arc::new(
        OpenAIEmbeddingProvider::new(config.api_key.clone())?
            .with_model(config.embed_model.clone(), config.embed_dimensions),
    );
    let llm = Arc::new(OpenAIResponsesClient::new(config.api_key.clone(), config.model.clone())?);
    let reranker = Arc::new(LlmReranker::new(llm.clone()));

    Ok((Arc::new(HybridRetriever::new(index, embedder, reranker)), llm))
}

async fn ask(config: &Config, question: &str, deep: bool, show_trace: bool) -> Result<()> {
    let (retriever, llm) = make_retriever(config).await?;

    if deep {
        let pipeline = ResearchPipeline::new(llm, retriever);
        let state = pipeline.run(question).await?;

        if let Some(report) = &state.final_report {
            println!("{report}");
        }
        if show_trace {
            println!("\n--- trace ---");
            for line in state.logs() {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let chunks = retriever.retrieve(question, DIRECT_TOP_K).await?;
    if chunks.is_empty() {
        println!("No relevant lyrics found for that question.");
        return Ok(());
    }

    let context = format_context(&chunks);
    let user = format!("Context:\n{context}\n\nQuestion:\n{question}");
    let answer = llm.generate(ANSWER_SYSTEM, &user).await?;
    println!("{answer}");
    Ok(())
}
