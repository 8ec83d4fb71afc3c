// xmlpack_core/src/domain.rs
use serde::Serialize;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectEntry {
    pub name: String,
}

/// A freshly generated record, before encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub level: u32,
    pub objects: Vec<ObjectEntry>,
}

impl Record {
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }
}

/// A record as read back from a document. `level` stays the text the encoder wrote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ParsedRecord {
    pub id: String,
    pub level: String,
    pub object_names: Vec<String>,
}

impl From<&Record> for ParsedRecord {
    fn from(r: &Record) -> Self {
        Self {
            id: r.id.clone(),
            level: r.level.to_string(),
            object_names: r.object_names().map(str::to_owned).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveHandle {
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRow {
    pub name: String,
    pub c_size: u64,
    pub u_size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevelRow {
    pub id: String,
    pub level: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectRow {
    pub id: String,
    pub object_name: String,
}
