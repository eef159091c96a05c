use std::path::{Path, PathBuf};

use anyhow::Context;

const MAX_SLUG_LEN: usize = 40;

/// Paired `.input`/`.output` files for one `ask` call
///
/// The input is written before the request is sent and the output only
/// after it succeeds, so a lone `.input` marks a failed call.
#[derive(Debug)]
pub struct Transcript {
    base: PathBuf,
}

impl Transcript {
    /// Name the transcript after the current local time and the prompt
    pub fn new(dir: &Path, prompt: &str) -> Self {
        let timestamp = jiff::Zoned::now().strftime("%Y-%m-%dT%H:%M:%S").to_string();
        Self {
            base: dir.join(format!("{timestamp}_{}", slug(prompt))),
        }
    }

    pub async fn save_input(&self, prompt: &str) -> anyhow::Result<PathBuf> {
        if let Some(dir) = self.base.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create transcript directory {}", dir.display()))?;
        }
        self.write("input", prompt).await
    }

    pub async fn save_output(&self, reply: &str) -> anyhow::Result<PathBuf> {
        self.write("output", reply).await
    }

    async fn write(&self, extension: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.base.with_extension(extension);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Lowercase, underscore-separated file name stem derived from the prompt
fn slug(prompt: &str) -> String {
    let mut slug = String::with_capacity(MAX_SLUG_LEN);
    let mut pending_sep = false;

    for c in prompt.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let trimmed = slug.trim_end_matches('_');
    if trimmed.is_empty() {
        "empty_prompt".to_owned()
    } else {
        trimmed.to_owned()
    }
}
