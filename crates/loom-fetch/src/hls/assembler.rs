use bytes::{Bytes, BytesMut};
use tracing::{info, warn};

use crate::config::DownloadBudget;
use crate::error::Result;

/// Contiguous media produced by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBuffer {
    data: Bytes,
}

impl MediaBuffer {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Concatenates downloaded segments in order and enforces the size cap.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    chunks: Vec<Bytes>,
    total: u64,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: Bytes) {
        self.total += chunk.len() as u64;
        self.chunks.push(chunk);
    }

    pub fn total_bytes(&self) -> u64 {
        self.total
    }

    pub fn finish(self, budget: &DownloadBudget) -> Result<MediaBuffer> {
        if let Err(e) = budget.ensure_within(self.total) {
            warn!(
                total = self.total,
                limit = budget.max_total_bytes,
                "Assembled stream too large"
            );
            return Err(e);
        }

        let mut data = BytesMut::with_capacity(self.total as usize);
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }
        info!(
            segments = self.chunks.len(),
            bytes = self.total,
            "Assembled stream"
        );
        Ok(MediaBuffer {
            data: data.freeze(),
        })
    }

    pub fn assemble(chunks: Vec<Bytes>, budget: &DownloadBudget) -> Result<MediaBuffer> {
        let mut assembler = Self::new();
        for chunk in chunks {
            assembler.push(chunk);
        }
        assembler.finish(budget)
    }
}
