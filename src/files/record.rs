use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::Metadata;

/// Metadata (and optionally the content) of one file, built on demand.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub name: String,
    #[serde(rename = "create_date")]
    pub created_at: DateTime<Local>,
    #[serde(rename = "edit_date", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Local>>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileRecord {
    pub fn from_metadata(name: impl Into<String>, meta: &Metadata) -> std::io::Result<Self> {
        let modified = meta.modified()?;
        // Birth time is missing on some filesystems (most Linux setups before
        // statx); the record then reports the last modification instead.
        let created = meta.created().unwrap_or(modified);
        Ok(Self {
            name: name.into(),
            created_at: DateTime::<Local>::from(created),
            modified_at: Some(DateTime::<Local>::from(modified)),
            size: meta.len(),
            content: None,
        })
    }

    pub fn with_content(mut self, bytes: &[u8]) -> Self {
        self.content = Some(decode_text(bytes));
        self
    }
}

/// UTF-8 when valid, Windows-1252 otherwise.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => bytes.iter().map(|&b| windows_1252(b)).collect(),
    }
}

fn windows_1252(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
        '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
        '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
        '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
    ];
    match byte {
        0x80..=0x9F => HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}
