use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ordered, append-only list of recorded chunks for one session
#[derive(Debug, Default)]
pub struct ChunkList {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl ChunkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Empty chunks are ignored; returns whether it was kept.
    pub fn push(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
        true
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Drop every chunk without producing a file
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_bytes = 0;
    }

    /// Concatenate all chunks into one blob, leaving the list empty
    pub fn take_blob(&mut self, mime_type: &str) -> RecordedBlob {
        let mut data = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks.drain(..) {
            data.extend_from_slice(&chunk);
        }
        self.total_bytes = 0;

        RecordedBlob {
            mime_type: mime_type.to_string(),
            data,
        }
    }
}

/// A finished recording, ready to be downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBlob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl RecordedBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Metadata for a delivered recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadReceipt {
    /// Where the file ended up
    pub location: String,
    /// File name offered to the user
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub chunk_count: usize,
    pub delivered_at: DateTime<Utc>,
}
