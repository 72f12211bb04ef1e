use chrono::{DateTime, Local};
use futures::future::{self, FutureExt};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Tool, ToolDescriptor, ToolFuture};

const SYSTEM_PROMPT: &str = "You are a helpful note-taking assistant. You can help users:

1. Save important information and notes
2. Look back over previously saved notes
3. Find notes that mention a topic
4. Keep track of ideas and information

Available note operations:
- SAVE:text - Append a new note (ADD:text works too)
- LIST - Show all notes, oldest first
- SEARCH:term - Show notes that contain a term
- COUNT - Report how many notes are stored

Notes are never edited or deleted once saved, so write each one so it stands on its own.
Keep note content concise but comprehensive.";

const USAGE: &str = "Format: SAVE:text, LIST, SEARCH:term, COUNT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub timestamp: DateTime<Local>,
}

/// Append-only log of notes, one JSON object per line
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, text: &str) -> io::Result<Note> {
        let note = Note {
            text: text.to_string(),
            timestamp: Local::now(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(&note)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        debug!(path = %self.path.display(), "appended note");
        Ok(note)
    }

    /// All notes in the order they were written. A missing file is an empty log.
    pub fn read_all(&self) -> io::Result<Vec<Note>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut notes = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Note>(line) {
                Ok(note) => notes.push(note),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = number + 1,
                    "skipping malformed note: {}",
                    e
                ),
            }
        }
        Ok(notes)
    }

    pub fn search(&self, term: &str) -> io::Result<Vec<Note>> {
        let needle = term.to_lowercase();
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|note| note.text.to_lowercase().contains(&needle))
            .collect())
    }
}

fn format_notes(header: &str, notes: &[Note]) -> String {
    let mut out = format!("{}\n{}\n\n", header, "=".repeat(40));
    for (i, note) in notes.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] {}\n",
            i + 1,
            note.timestamp.format("%Y-%m-%d %H:%M:%S"),
            note.text
        ));
    }
    out
}

pub struct NoteTakingTool {
    descriptor: ToolDescriptor,
    store: NoteStore,
}

impl NoteTakingTool {
    pub fn new(store: NoteStore) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "Note Taking".to_string(),
                description: "Store, organize, retrieve, and manage notes and information."
                    .to_string(),
                version: "1.0".to_string(),
                kind: "NoteTakingTool",
                system_prompt: SYSTEM_PROMPT.to_string(),
            },
            store,
        }
    }

    pub fn run_command(&self, input: &str) -> String {
        let command = input.trim();
        if command.is_empty() {
            return format!("Please specify a note operation.\n{}", USAGE);
        }

        let (action, params) = match command.split_once(':') {
            Some((action, params)) => (action.trim().to_uppercase(), Some(params.trim())),
            None => (command.to_uppercase(), None),
        };

        match action.as_str() {
            "SAVE" | "ADD" => match params {
                None => "Invalid format. Use SAVE:your note text".to_string(),
                Some("") => "Note text cannot be empty.\nFormat: SAVE:your note text".to_string(),
                Some(text) => match self.store.append(text) {
                    Ok(_) => "Note saved successfully!".to_string(),
                    Err(e) => format!("Error saving note: {}", e),
                },
            },
            "LIST" => match self.store.read_all() {
                Ok(notes) if notes.is_empty() => "No notes found.".to_string(),
                Ok(notes) => format_notes("Your Notes:", &notes),
                Err(e) => format!("Error reading notes: {}", e),
            },
            "SEARCH" => match params {
                None => "Invalid format. Use SEARCH:term".to_string(),
                Some("") => "Search term cannot be empty.\nFormat: SEARCH:term".to_string(),
                Some(term) => match self.store.search(term) {
                    Ok(notes) if notes.is_empty() => format!("No notes matching '{}'.", term),
                    Ok(notes) => format_notes(&format!("Notes matching '{}':", term), &notes),
                    Err(e) => format!("Error reading notes: {}", e),
                },
            },
            "COUNT" => match self.store.read_all() {
                Ok(notes) if notes.len() == 1 => "You have 1 note.".to_string(),
                Ok(notes) => format!("You have {} notes.", notes.len()),
                Err(e) => format!("Error reading notes: {}", e),
            },
            other => format!(
                "Unknown action: {}\nAvailable: SAVE, LIST, SEARCH, COUNT",
                other
            ),
        }
    }
}

impl Tool for NoteTakingTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn execute<'a>(&'a self, input: &'a str) -> ToolFuture<'a> {
        future::ready(self.run_command(input)).boxed()
    }
}
