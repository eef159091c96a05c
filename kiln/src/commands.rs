use std::io::{self, Write};

use anyhow::Context;
use kiln_config::OllamaConfig;
use kiln_ollama::{AUTO_MODEL, GenerationConfig, ModelCatalogEntry, OllamaClient, select_latest};
use tokio::io::AsyncReadExt;

use crate::args::AskArgs;
use crate::transcript::Transcript;

/// Send one prompt and print the reply to stdout
pub async fn ask(client: &OllamaClient, defaults: &OllamaConfig, args: AskArgs) -> anyhow::Result<()> {
    let raw = match args.prompt {
        Some(prompt) => prompt,
        None => read_stdin().await?,
    };
    let prompt = raw.trim();
    anyhow::ensure!(!prompt.is_empty(), "no prompt given on the command line or stdin");

    let model = args
        .model
        .or_else(|| defaults.model.clone())
        .unwrap_or_else(|| AUTO_MODEL.to_owned());
    let stream = defaults.stream && !args.no_stream;

    let transcript = args.transcript_dir.as_deref().map(|dir| Transcript::new(dir, prompt));
    if let Some(transcript) = &transcript {
        transcript.save_input(prompt).await?;
    }

    let mut write_error = None;
    let config = GenerationConfig::new(model)
        .streaming(stream)
        .with_options(args.sampling.into())
        .on_fragment(|fragment| {
            if write_error.is_none()
                && let Err(e) = write_fragment(fragment)
            {
                write_error = Some(e);
            }
        });

    let reply = client.chat_with_config(prompt, config).await?;

    if let Some(e) = write_error {
        return Err(e).context("failed to write reply to stdout");
    }

    if let Some(transcript) = &transcript {
        let path = transcript.save_output(&reply).await?;
        tracing::debug!(path = %path.display(), "saved transcript");
    }

    let mut stdout = io::stdout().lock();
    if stream {
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{reply}")?;
    }
    stdout.flush()?;

    Ok(())
}

/// Print the model catalog, marking the model auto-selection would pick
pub async fn models(client: &OllamaClient) -> anyhow::Result<()> {
    let models = client.list_models().await?;
    if models.is_empty() {
        eprintln!("no models available; pull one with `ollama pull <model>`");
        return Ok(());
    }

    let latest = select_latest(&models).map(|m| m.name.as_str());
    let width = models.iter().map(|m| m.name.len()).max().unwrap_or(0);

    let mut stdout = io::stdout().lock();
    for model in &models {
        let marker = if Some(model.name.as_str()) == latest { '*' } else { ' ' };
        writeln!(stdout, "{marker} {}", format_entry(model, width))?;
    }
    stdout.flush()?;

    Ok(())
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut prompt = String::new();
    tokio::io::stdin()
        .read_to_string(&mut prompt)
        .await
        .context("failed to read prompt from stdin")?;
    Ok(prompt)
}

fn write_fragment(fragment: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(fragment.as_bytes())?;
    stdout.flush()
}

fn format_entry(model: &ModelCatalogEntry, width: usize) -> String {
    let modified = model
        .modified_at
        .map_or_else(|| "-".to_owned(), |t| t.strftime("%Y-%m-%d %H:%M").to_string());

    format!(
        "{:<width$}  {modified:<16}  {:>8}  {:<6}  {}",
        model.name,
        human_size(model.size),
        model.details.parameter_size,
        model.details.quantization_level,
    )
}

#[allow(clippy::cast_precision_loss)]
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1000 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1000.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = *next;
    }

    format!("{value:.1} {unit}")
}
