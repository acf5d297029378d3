//! griot CLI
//!
//! A command-line client for the cultural-knowledge service: ask questions
//! (optionally enriched with audio/image files), browse and contribute
//! knowledge, and render the assembled knowledge graph.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use griot_client::{ServiceClient, StatusPoller};
use griot_core::{GraphAssembler, LayoutEngine, NewKnowledge, NodeKind};
use griot_session::{
    compare_concepts, Attachment, AudioInput, CaptureController, PromotionController,
    PromotionState, QueryOrchestrator,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// griot - an interactive client for the cultural-knowledge network
#[derive(Parser)]
#[command(name = "griot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service base URL (defaults to GRIOT_API_URL or http://localhost:8000)
    #[arg(long)]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the knowledge base a question
    Ask {
        /// Question text (reads from stdin if not provided)
        question: Option<String>,

        /// Audio file to transcribe into the question
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Image file to analyze as question context
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Language code for transcription
        #[arg(short, long, default_value = "en")]
        language: String,

        /// If the answer comes from the web, promote it under this culture
        #[arg(long)]
        promote_to: Option<String>,
    },

    /// Render the knowledge graph assembled from stored entries
    Graph {
        /// Restrict to one culture
        #[arg(short, long)]
        culture: Option<String>,

        /// Maximum entries to fetch
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Also list every edge
        #[arg(short, long)]
        edges: bool,
    },

    /// List stored knowledge entries
    List {
        /// Restrict to one culture
        #[arg(short, long)]
        culture: Option<String>,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a single knowledge entry
    Show {
        /// Entry id
        id: String,
    },

    /// Compare two cultural concepts side by side
    Compare {
        /// First concept, e.g. "Ubuntu (Zulu)"
        first: String,

        /// Second concept, e.g. "Sankofa (Akan)"
        second: String,
    },

    /// List all cultures in the knowledge base
    Cultures,

    /// Contribute knowledge (text, optionally with audio/image files)
    Contribute {
        /// Knowledge text (reads from stdin if neither text nor files given)
        content: Option<String>,

        /// Culture of origin
        #[arg(short = 'C', long)]
        culture: String,

        /// Category (proverb, story, ritual, ...)
        #[arg(short = 'k', long, default_value = "proverb")]
        category: String,

        /// Source attribution
        #[arg(short, long)]
        source: Option<String>,

        /// Language code
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Audio file carrying oral tradition
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Image file of a cultural artifact or symbol
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Show agent/orchestrator network status
    Status {
        /// Keep polling and print every change
        #[arg(short, long)]
        watch: bool,
    },

    /// Interactive mode
    Interactive,
}

/// Terminal sessions attach audio from files; no live device exists here
struct NoMicrophone;

impl AudioInput for NoMicrophone {
    fn start(&mut self) -> std::result::Result<(), String> {
        Err("no audio-capture device is available in a terminal session; use --audio <file>".into())
    }

    fn stop(&mut self) -> std::result::Result<Vec<u8>, String> {
        Err("no recording in progress".into())
    }

    fn cancel(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = match cli.api_url {
        Some(url) => ServiceClient::new(url),
        None => ServiceClient::from_env(),
    };

    info!("Using knowledge service at: {}", client.base_url());

    let service_ok = client.health().await.unwrap_or(false);
    if !service_ok {
        eprintln!("Error: knowledge service is not reachable.");
        eprintln!("  Service: {}", client.base_url());
        eprintln!("Set GRIOT_API_URL or pass --api-url to point elsewhere.");
        anyhow::bail!("Knowledge service unavailable");
    }

    match cli.command {
        Commands::Ask {
            question,
            audio,
            image,
            language,
            promote_to,
        } => {
            cmd_ask(client, question, audio, image, language, promote_to).await?;
        }
        Commands::Graph {
            culture,
            limit,
            edges,
        } => {
            cmd_graph(client, culture, limit, edges).await?;
        }
        Commands::List { culture, limit } => {
            cmd_list(client, culture, limit).await?;
        }
        Commands::Show { id } => {
            cmd_show(client, id).await?;
        }
        Commands::Compare { first, second } => {
            cmd_compare(client, first, second).await?;
        }
        Commands::Cultures => {
            cmd_cultures(client).await?;
        }
        Commands::Contribute {
            content,
            culture,
            category,
            source,
            language,
            audio,
            image,
        } => {
            cmd_contribute(client, content, culture, category, source, language, audio, image)
                .await?;
        }
        Commands::Status { watch } => {
            cmd_status(client, watch).await?;
        }
        Commands::Interactive => {
            cmd_interactive(client).await?;
        }
    }

    Ok(())
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Attachment::from_file_bytes(file_name, bytes))
}

fn read_stdin_lines(prompt: &str) -> String {
    eprintln!("{}", prompt);
    let stdin = io::stdin();
    let lines: Vec<String> = stdin.lock().lines().map_while(|l| l.ok()).collect();
    lines.join("\n")
}

async fn cmd_ask(
    client: ServiceClient,
    question: Option<String>,
    audio: Option<PathBuf>,
    image: Option<PathBuf>,
    language: String,
    promote_to: Option<String>,
) -> Result<()> {
    let question = match question {
        Some(q) => q,
        None if audio.is_none() && image.is_none() => {
            read_stdin_lines("Enter your question (Ctrl+D to finish):")
        }
        None => String::new(),
    };

    let mut capture = CaptureController::new(NoMicrophone);
    if let Some(path) = audio.as_deref() {
        capture.select_audio_file(read_attachment(path)?);
    }
    if let Some(path) = image.as_deref() {
        capture.select_image_file(read_attachment(path)?);
    }

    let mut orchestrator = QueryOrchestrator::new(client.clone());
    orchestrator.set_question(question);

    let (audio_attachment, image_attachment) = capture.take_attachments();
    if audio_attachment.is_some() || image_attachment.is_some() {
        println!("Enriching question from attachments...");
        orchestrator
            .enrich(audio_attachment, image_attachment, &language)
            .await?;

        if let Some(message) = &orchestrator.session().error_message {
            println!("⚠ Enrichment problem: {}", message);
        }
        if let Some(transcript) = &orchestrator.session().transcript {
            println!("Transcript: {}", transcript);
        }
    }

    if !orchestrator.session().submittable() {
        anyhow::bail!("Nothing to ask: provide a question, or an attachment that enriches into one");
    }

    println!("Question: {}\n", orchestrator.session().question);

    let result = match orchestrator.submit().await {
        Ok(result) => result.clone(),
        Err(e) => {
            anyhow::bail!("Query failed: {}", e.detail());
        }
    };

    print_answer(&result);

    if result.used_web_fallback {
        match (promote_to, PromotionController::for_answer(client, &result)) {
            (Some(culture), Some(mut promotion)) => {
                promotion.reveal();
                match promotion.submit(&culture, None, None).await {
                    Ok(()) => println!("\n✓ Answer added to the knowledge base under '{}'", culture),
                    Err(e) => println!("\n✗ Promotion failed: {}", e.detail()),
                }
            }
            _ => {
                println!(
                    "\nThis answer came from the web. Re-run with --promote-to <culture> to \
                     preserve it, or use `promote` in interactive mode."
                );
            }
        }
    }

    Ok(())
}

fn print_answer(result: &griot_core::AnswerResult) {
    println!("Answer:\n{}\n", result.answer);

    if !result.cultural_context.is_empty() {
        println!("Cultural context: {}", result.cultural_context.join(", "));
    }

    if !result.sources.is_empty() {
        println!("Sources:");
        for source in &result.sources {
            println!("  • {}", source);
        }
    }

    if !result.reasoning_chain.is_empty() {
        println!("\nReasoning chain ({} steps):", result.reasoning_chain.len());
        for (i, step) in result.reasoning_chain.iter().enumerate() {
            println!("  {}. {}", i + 1, step.display_action());
            if !step.result.is_empty() {
                println!("     {}", step.result);
            }
            for detail in step.details.iter().take(3) {
                let text = match detail.as_str() {
                    Some(s) => s.to_string(),
                    None => {
                        let rendered = detail.to_string();
                        rendered.chars().take(60).collect()
                    }
                };
                println!("     - {}", text);
            }
        }
    }
}

async fn cmd_graph(
    client: ServiceClient,
    culture: Option<String>,
    limit: usize,
    show_edges: bool,
) -> Result<()> {
    let entries = client.list_knowledge(culture.as_deref(), limit).await?;

    if entries.is_empty() {
        println!("No knowledge entries found. Contribute some with: griot contribute");
        return Ok(());
    }

    let mut graph = GraphAssembler::assemble(&entries);
    LayoutEngine::layout(&mut graph);

    println!(
        "Knowledge graph: {} entries -> {} nodes, {} edges\n",
        entries.len(),
        graph.nodes.len(),
        graph.edges.len()
    );

    println!("Cultures ({}):", graph.culture_count());
    for node in graph.nodes_of_kind(NodeKind::Culture) {
        println!(
            "  ◉ {} - {} entries  ({:.0}, {:.0})",
            node.label, node.member_count, node.position.x, node.position.y
        );
    }

    println!("\nConcepts ({}):", graph.count_kind(NodeKind::Concept));
    for node in graph.nodes_of_kind(NodeKind::Concept) {
        let cultures: Vec<_> = node.associated_cultures.iter().cloned().collect();
        println!(
            "  ▣ {} - found in: {}  ({:.0}, {:.0})",
            node.display_label(),
            cultures.join(", "),
            node.position.x,
            node.position.y
        );
    }

    println!("\nThemes ({}):", graph.count_kind(NodeKind::Theme));
    for node in graph.nodes_of_kind(NodeKind::Theme) {
        let cultures: Vec<_> = node.associated_cultures.iter().cloned().collect();
        println!(
            "  ◈ {} - found in: {}  ({:.0}, {:.0})",
            node.display_label(),
            cultures.join(", "),
            node.position.x,
            node.position.y
        );
    }

    if show_edges {
        println!("\nEdges:");
        for edge in &graph.edges {
            println!("  {} -> {} [{}]", edge.source_id, edge.target_id, edge.relation);
        }
    }

    Ok(())
}

async fn cmd_list(client: ServiceClient, culture: Option<String>, limit: usize) -> Result<()> {
    let entries = client.list_knowledge(culture.as_deref(), limit).await?;

    if entries.is_empty() {
        println!("No knowledge entries found.");
        return Ok(());
    }

    println!("Knowledge entries ({}):\n", entries.len());

    for entry in entries {
        let id = entry.id.as_deref().unwrap_or("(no id)");
        let preview: String = entry.content.chars().take(80).collect();
        println!("• [{}] [{}] {}", entry.culture, entry.category, id);
        println!(
            "  {}{}",
            preview,
            if entry.content.chars().count() > 80 { "..." } else { "" }
        );
        println!();
    }

    Ok(())
}

async fn cmd_show(client: ServiceClient, id: String) -> Result<()> {
    let entry = client.get_knowledge(&id).await?;

    println!("Culture: {}", entry.culture);
    println!("Category: {}", entry.category);
    if let Some(source) = &entry.source {
        println!("Source: {}", source);
    }
    if !entry.concepts.is_empty() {
        println!("Concepts: {}", entry.concepts.join(", "));
    }
    if !entry.themes.is_empty() {
        println!("Themes: {}", entry.themes.join(", "));
    }
    println!();
    println!("{}", entry.content);

    if let Some(symbolic) = &entry.symbolic_representation {
        println!("\nSymbolic representation:\n{}", symbolic);
    }
    if let Some(hash) = &entry.ipfs_hash {
        println!("\nIPFS hash: {}", hash);
    }

    Ok(())
}

async fn cmd_compare(client: ServiceClient, first: String, second: String) -> Result<()> {
    println!("Comparing wisdom: {} vs {}\n", first, second);

    let comparison = match compare_concepts(&client, &first, &second).await {
        Ok(comparison) => comparison,
        Err(e) => anyhow::bail!("Comparison failed: {}", e.detail()),
    };

    for side in [&comparison.first, &comparison.second] {
        println!("=== {} ===", side.concept);
        println!("{}\n", side.answer.answer);
        if !side.answer.cultural_context.is_empty() {
            println!("Cultural context: {}", side.answer.cultural_context.join(", "));
        }
        if !side.answer.sources.is_empty() {
            println!("Sources:");
            for source in &side.answer.sources {
                println!("  • {}", source);
            }
        }
        println!();
    }

    Ok(())
}

async fn cmd_cultures(client: ServiceClient) -> Result<()> {
    let cultures = client.list_cultures().await?;

    if cultures.is_empty() {
        println!("No cultures recorded yet.");
        return Ok(());
    }

    println!("Cultures ({}):", cultures.len());
    for culture in cultures {
        println!("  • {}", culture);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_contribute(
    client: ServiceClient,
    content: Option<String>,
    culture: String,
    category: String,
    source: Option<String>,
    language: String,
    audio: Option<PathBuf>,
    image: Option<PathBuf>,
) -> Result<()> {
    if culture.trim().is_empty() {
        anyhow::bail!("Culture cannot be empty");
    }

    let multimodal = audio.is_some() || image.is_some();

    let content = match content {
        Some(c) => c,
        None if multimodal => String::new(),
        None => read_stdin_lines("Enter the knowledge content (Ctrl+D to finish):"),
    };

    if !multimodal {
        if content.trim().is_empty() {
            anyhow::bail!("Knowledge content cannot be empty");
        }

        let mut knowledge = NewKnowledge::new(content, culture, category).with_language(language);
        if let Some(source) = source {
            knowledge = knowledge.with_source(source);
        }

        let id = client.ingest(&knowledge).await?;
        match id {
            Some(id) => println!("✓ Knowledge preserved: {}", id),
            None => println!("✓ Knowledge preserved"),
        }
        return Ok(());
    }

    let mut capture = CaptureController::new(NoMicrophone);
    if let Some(path) = audio.as_deref() {
        capture.select_audio_file(read_attachment(path)?);
    }
    if let Some(path) = image.as_deref() {
        capture.select_image_file(read_attachment(path)?);
    }

    let (audio_attachment, image_attachment) = capture.take_attachments();
    let modalities = usize::from(!content.trim().is_empty())
        + usize::from(audio_attachment.is_some())
        + usize::from(image_attachment.is_some());

    println!("Contributing across {} modalities...", modalities);

    let id = client
        .ingest_multimodal(
            if content.trim().is_empty() { None } else { Some(content.as_str()) },
            &culture,
            &category,
            source.as_deref(),
            &language,
            audio_attachment.map(|a| (a.file_name, a.bytes)),
            image_attachment.map(|a| (a.file_name, a.bytes)),
        )
        .await?;

    match id {
        Some(id) => println!("✓ Multi-modal knowledge preserved: {}", id),
        None => println!("✓ Multi-modal knowledge preserved"),
    }

    Ok(())
}

fn print_status(status: &griot_client::AgentNetworkStatus) {
    match &status.orchestrator {
        Some(orchestrator) => {
            println!("Orchestrator: {} [{}]", orchestrator.name, orchestrator.status);
            if !orchestrator.address.is_empty() {
                println!("  Address: {}", orchestrator.address);
            }
        }
        None => println!("Direct agent mode (no orchestrator)"),
    }

    for (key, agent) in &status.agents {
        let agent_type = agent.agent_type.as_deref().unwrap_or("agent");
        println!("  • {} ({}): {} [{}]", key, agent_type, agent.name, agent.status);
    }

    if let Some(mode) = &status.mode {
        println!("Mode: {}", mode);
    }
    if let Some(network) = &status.network {
        println!("Network: {}", network);
    }
    println!("Pending requests: {}", status.pending_requests);
}

async fn cmd_status(client: ServiceClient, watch: bool) -> Result<()> {
    if !watch {
        let status = client.agent_status().await?;
        print_status(&status);
        return Ok(());
    }

    println!("Watching agent status (Ctrl+C to stop)...\n");
    let mut poller = StatusPoller::start(client, StatusPoller::DEFAULT_INTERVAL);

    loop {
        tokio::select! {
            snapshot = poller.changed() => {
                match snapshot {
                    Some(status) => {
                        print_status(&status);
                        println!();
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    poller.stop();
    Ok(())
}

async fn cmd_interactive(client: ServiceClient) -> Result<()> {
    println!("griot - Interactive Mode");
    println!("Commands: ask, graph, list, cultures, promote, status, help, quit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut last_promotion: Option<PromotionController<ServiceClient>> = None;

    loop {
        print!("griot> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let parts: Vec<&str> = line.trim().splitn(2, ' ').collect();
        let cmd = parts.first().copied().unwrap_or("");
        let arg = parts.get(1).copied().unwrap_or("");

        match cmd {
            "" => continue,

            "ask" | "a" => {
                if arg.is_empty() {
                    println!("Usage: ask <question>");
                    continue;
                }
                let mut orchestrator = QueryOrchestrator::new(client.clone());
                orchestrator.set_question(arg);
                match orchestrator.submit().await {
                    Ok(result) => {
                        let result = result.clone();
                        print_answer(&result);
                        if result.used_web_fallback {
                            println!(
                                "\nThis answer came from the web. Preserve it with: \
                                 promote <culture> [category]"
                            );
                            last_promotion =
                                PromotionController::for_answer(client.clone(), &result);
                            if let Some(promotion) = last_promotion.as_mut() {
                                promotion.reveal();
                            }
                        } else {
                            last_promotion = None;
                        }
                    }
                    Err(e) => println!("Error: {}", e.detail()),
                }
            }

            "promote" | "p" => {
                let Some(promotion) = last_promotion.as_mut() else {
                    println!("Nothing to promote: ask a question that falls back to the web first.");
                    continue;
                };
                if promotion.state() == PromotionState::Added {
                    println!("Already added to the knowledge base.");
                    continue;
                }
                let mut words = arg.split_whitespace();
                let culture = words.next().unwrap_or("");
                let category = words.next();
                match promotion.submit(culture, category, None).await {
                    Ok(()) => println!("✓ Added to the knowledge base under '{}'", culture),
                    Err(e) => println!("Error: {}", e.detail()),
                }
            }

            "graph" | "g" => {
                let culture = if arg.is_empty() { None } else { Some(arg.to_string()) };
                if let Err(e) = cmd_graph(client.clone(), culture, 50, false).await {
                    println!("Error: {}", e);
                }
            }

            "list" | "l" => {
                let culture = if arg.is_empty() { None } else { Some(arg.to_string()) };
                if let Err(e) = cmd_list(client.clone(), culture, 10).await {
                    println!("Error: {}", e);
                }
            }

            "cultures" | "c" => {
                if let Err(e) = cmd_cultures(client.clone()).await {
                    println!("Error: {}", e);
                }
            }

            "status" => match client.agent_status().await {
                Ok(status) => print_status(&status),
                Err(e) => println!("Error: {}", e),
            },

            "help" | "h" | "?" => {
                println!("Commands:");
                println!("  ask <question>              - Ask the knowledge base");
                println!("  promote <culture> [category] - Preserve the last web answer");
                println!("  graph [culture]             - Render the knowledge graph");
                println!("  list [culture]              - List knowledge entries");
                println!("  cultures                    - List cultures");
                println!("  status                      - Agent network status");
                println!("  quit                        - Exit");
            }

            "quit" | "q" | "exit" => {
                println!("Goodbye!");
                break;
            }

            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", cmd);
            }
        }

        println!();
    }

    Ok(())
}
