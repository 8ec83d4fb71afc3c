use crate::domain::{ParsedRecord, Record};
use crate::error::Result;

/// Turns one record into a standalone document and back.
pub trait DocumentCodec: Send + Sync {
    fn encode(&self, record: &Record) -> Result<Vec<u8>>;
    fn decode(&self, doc: &[u8]) -> Result<ParsedRecord>;
}

pub mod xml;
