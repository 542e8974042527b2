use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Error;
use crate::types::{Chunk, Document};

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 1200 }
    }
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self { chunking_config: ChunkingConfig { max_chars: max_chars.max(1) } }
    }

    pub fn load_documents(&self, data_dir: &Path) -> Result<Vec<Document>> {
        let files = self.list_txt_files(data_dir)?;
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut docs = Vec::with_capacity(files.len());
        for file_path in &files {
            let content = self.read_file_content(file_path)?;
            let filename = file_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            let id = strip_txt_extension(&filename).to_string();
            debug!(doc = %id, chars = content.chars().count(), "loaded document");
            docs.push(Document { id, filename, content });
        }
        info!(documents = docs.len(), dir = %data_dir.display(), "loaded corpus");
        Ok(docs)
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let docs = self.load_documents(data_dir)?;
        let chunks = self.chunk_documents(&docs);
        info!(documents = docs.len(), chunks = chunks.len(), "chunked corpus");
        Ok(chunks)
    }

    pub fn chunk_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        docs.iter().flat_map(|d| self.chunk_content(&d.id, &d.content)).collect()
    }

    /// Paragraph-aware packing. Paragraphs are buffered (each followed by a
    /// blank line) until the next one would overflow `max_chars`; oversized
    /// paragraphs are sliced, the first slice topping up whatever room the
    /// buffer has left.
    pub fn chunk_content(&self, doc_id: &str, content: &str) -> Vec<Chunk> {
        let max = self.chunking_config.max_chars;
        let mut out = Vec::new();
        let mut push = |text: &str| {
            let text = text.trim();
            if text.is_empty() { return; }
            let index = out.len();
            out.push(Chunk::new(doc_id, index, text));
        };

        let mut buffer = String::new();
        let mut buffer_len = 0usize;
        for para in split_paragraphs(content) {
            let para_text = format!("{para}\n\n");
            let para_len = para_text.chars().count();

            if para_len > max {
                let mut start = 0;
                if buffer_len > 0 {
                    let space_left = max.saturating_sub(buffer_len);
                    if space_left > 0 {
                        buffer.push_str(char_slice(&para_text, 0, space_left));
                        start = space_left;
                    }
                    push(&buffer);
                    buffer.clear();
                    buffer_len = 0;
                }
                while start < para_len {
                    let end = start + max;
                    push(char_slice(&para_text, start, end));
                    start = end;
                }
                continue;
            }

            if buffer_len + para_len <= max {
                buffer.push_str(&para_text);
                buffer_len += para_len;
            } else {
                if buffer_len > 0 { push(&buffer); }
                buffer = para_text;
                buffer_len = para_len;
            }
        }
        if buffer_len > 0 { push(&buffer); }
        out
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    fn list_txt_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(Error::NotFound(format!("corpus directory {}", root.display())).into());
        }
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = entry.with_context(|| format!("listing {}", root.display()))?;
            if !entry.file_type().is_file() { continue; }
            let is_txt = entry.path().extension().and_then(|s| s.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("txt"));
            if is_txt { txt_files.push(entry.path().to_path_buf()); }
        }
        txt_files.sort();
        Ok(txt_files)
    }
}

fn strip_txt_extension(filename: &str) -> &str {
    let cut = filename.len().saturating_sub(4);
    match filename.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".txt") => &filename[..cut],
        _ => filename,
    }
}

/// Paragraphs are separated by a newline, optional whitespace, and another
/// newline. Returned paragraphs are trimmed and non-empty.
fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut paragraphs);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut paragraphs);
    paragraphs
}

fn flush_paragraph(lines: &mut Vec<&str>, out: &mut Vec<String>) {
    let para = lines.join("\n");
    let para = para.trim();
    if !para.is_empty() { out.push(para.to_string()); }
    lines.clear();
}

fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    &s[byte_at(start)..byte_at(end)]
}
