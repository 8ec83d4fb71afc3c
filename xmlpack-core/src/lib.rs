#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod random;
pub mod stats;
pub mod timing;

pub mod codec;
pub mod generate;

pub mod pack {
    pub mod writer;
}

pub mod read {
    pub mod reader;
}

pub mod aggregate;
pub mod pipeline;
pub mod pool;

// Re-exports: stable API surface
pub use codec::DocumentCodec;
pub use codec::xml::XmlCodec;
pub use config::PipelineConfig;
pub use domain::{ArchiveHandle, ParsedRecord, Record};
pub use generate::RecordGenerator;
pub use pack::writer::{build_archive, pack_members};
pub use pipeline::{Phase, Pipeline};
pub use read::reader::{list_members, read_all, read_member};
