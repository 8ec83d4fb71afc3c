use crate::domain::{LevelRow, ObjectRow, ParsedRecord};
use crate::error::Result;
use crate::pool::WorkerPool;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const LEVELS_FILE: &str = "levels.csv";
pub const OBJECTS_FILE: &str = "objects.csv";
const LEVELS_HEADER: [&str; 2] = ["id", "level"];
const OBJECTS_HEADER: [&str; 2] = ["id", "object_name"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tables {
    pub levels: Vec<LevelRow>,
    pub objects: Vec<ObjectRow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableArtifacts {
    pub levels_path: PathBuf,
    pub levels_rows: usize,
    pub objects_path: PathBuf,
    pub objects_rows: usize,
}

pub fn level_rows(batch: &[ParsedRecord]) -> Vec<LevelRow> {
    batch
        .iter()
        .map(|r| LevelRow {
            id: r.id.clone(),
            level: r.level.clone(),
        })
        .collect()
}

pub fn object_rows(batch: &[ParsedRecord]) -> Vec<ObjectRow> {
    batch
        .iter()
        .flat_map(|r| {
            r.object_names.iter().map(move |n| ObjectRow {
                id: r.id.clone(),
                object_name: n.clone(),
            })
        })
        .collect()
}

/// Builds both tables. The two partitions run side by side, each mapping the
/// batches in parallel; per-batch pieces are concatenated in batch order.
pub fn partition(pool: &WorkerPool, batches: &[Vec<ParsedRecord>]) -> Tables {
    let (levels, objects) = pool.join(
        || {
            batches
                .par_iter()
                .map(|b| level_rows(b))
                .collect::<Vec<_>>()
                .concat()
        },
        || {
            batches
                .par_iter()
                .map(|b| object_rows(b))
                .collect::<Vec<_>>()
                .concat()
        },
    );
    Tables { levels, objects }
}

fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<usize> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    // header written explicitly so empty tables still get one
    w.write_record(header)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(rows.len())
}

/// Writes `levels.csv` and `objects.csv` into `dir`.
pub fn write_tables(tables: &Tables, dir: &Path) -> Result<TableArtifacts> {
    let levels_path = dir.join(LEVELS_FILE);
    let objects_path = dir.join(OBJECTS_FILE);
    let levels_rows = write_csv(&levels_path, &LEVELS_HEADER, &tables.levels)?;
    let objects_rows = write_csv(&objects_path, &OBJECTS_HEADER, &tables.objects)?;
    tracing::debug!(levels_rows, objects_rows, dir = %dir.display(), "tables written");
    Ok(TableArtifacts {
        levels_path,
        levels_rows,
        objects_path,
        objects_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, level: &str, objs: &[&str]) -> ParsedRecord {
        ParsedRecord {
            id: id.into(),
            level: level.into(),
            object_names: objs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn batches() -> Vec<Vec<ParsedRecord>> {
        vec![
            vec![rec("a", "1", &["a1", "a2"]), rec("b", "2", &["b1"])],
            vec![],
            vec![rec("c", "3", &["c1", "c2", "c3"])],
        ]
    }

    #[test]
    fn partitions_keep_batch_record_object_order() {
        let pool = WorkerPool::new(Some(3)).unwrap();
        let t = partition(&pool, &batches());

        let lv: Vec<(&str, &str)> = t
            .levels
            .iter()
            .map(|r| (r.id.as_str(), r.level.as_str()))
            .collect();
        assert_eq!(lv, vec![("a", "1"), ("b", "2"), ("c", "3")]);

        let ob: Vec<(&str, &str)> = t
            .objects
            .iter()
            .map(|r| (r.id.as_str(), r.object_name.as_str()))
            .collect();
        assert_eq!(
            ob,
            vec![
                ("a", "a1"),
                ("a", "a2"),
                ("b", "b1"),
                ("c", "c1"),
                ("c", "c2"),
                ("c", "c3")
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let pool = WorkerPool::new(Some(2)).unwrap();
        let t = partition(&pool, &[vec![rec("x", "1", &["o"]), rec("x", "5", &["p"])]]);
        assert_eq!(t.levels.len(), 2);
        assert_eq!(t.objects.len(), 2);
    }

    #[test]
    fn csv_files_have_headers_and_no_index() {
        let dir = tempfile::tempdir().unwrap();
        let pool = WorkerPool::new(Some(2)).unwrap();
        let t = partition(&pool, &batches());
        let a = write_tables(&t, dir.path()).unwrap();
        assert_eq!(a.levels_rows, 3);
        assert_eq!(a.objects_rows, 6);

        let levels = std::fs::read_to_string(&a.levels_path).unwrap();
        assert_eq!(levels, "id,level\na,1\nb,2\nc,3\n");
        let objects = std::fs::read_to_string(&a.objects_path).unwrap();
        assert!(objects.starts_with("id,object_name\na,a1\na,a2\nb,b1\n"));
        assert_eq!(objects.lines().count(), 7);
    }

    #[test]
    fn empty_tables_still_get_headers() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_tables(&Tables::default(), dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(a.levels_path).unwrap(), "id,level\n");
        assert_eq!(
            std::fs::read_to_string(a.objects_path).unwrap(),
            "id,object_name\n"
        );
    }
}
