use crate::config::PipelineConfig;
use crate::domain::{ObjectEntry, Record};
use crate::error::Result;
use crate::random;

#[derive(Clone, Copy, Debug)]
pub struct GeneratorParams {
    pub token_bytes: usize,
    pub name_length: usize,
    pub objects_max: u32,
    pub level_max: u32,
}

impl From<&PipelineConfig> for GeneratorParams {
    fn from(c: &PipelineConfig) -> Self {
        Self {
            token_bytes: c.token_bytes,
            name_length: c.name_length,
            objects_max: c.objects_max,
            level_max: c.level_max,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RecordGenerator {
    params: GeneratorParams,
}

impl RecordGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    /// Lazily yields `count` independent records. Nothing is drawn until the
    /// iterator is advanced, and every call produces a new batch.
    pub fn generate(&self, count: usize) -> impl Iterator<Item = Result<Record>> + '_ {
        (0..count).map(move |_| self.one())
    }

    pub fn one(&self) -> Result<Record> {
        let p = &self.params;
        let n_objects = random::one_to(p.objects_max)?;
        let objects = (0..n_objects)
            .map(|_| {
                Ok(ObjectEntry {
                    name: random::token_urlsafe(p.name_length)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Record {
            id: random::token_hex(p.token_bytes)?,
            level: random::one_to(p.level_max)?,
            objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(objects_max: u32, level_max: u32) -> GeneratorParams {
        GeneratorParams {
            token_bytes: 8,
            name_length: 6,
            objects_max,
            level_max,
        }
    }

    #[test]
    fn yields_exactly_count_records_within_bounds() {
        let g = RecordGenerator::new(params(4, 9));
        let recs: Vec<Record> = g.generate(200).collect::<Result<_>>().unwrap();
        assert_eq!(recs.len(), 200);
        for r in &recs {
            assert_eq!(r.id.len(), 16);
            assert!((1..=9).contains(&r.level));
            assert!((1..=4).contains(&r.objects.len()));
            assert!(r.objects.iter().all(|o| o.name.len() == 8));
        }
    }

    #[test]
    fn degenerate_bounds_pin_values() {
        let g = RecordGenerator::new(params(1, 1));
        for r in g.generate(20) {
            let r = r.unwrap();
            assert_eq!(r.level, 1);
            assert_eq!(r.objects.len(), 1);
        }
    }

    #[test]
    fn batches_are_not_repeated() {
        let g = RecordGenerator::new(params(3, 100));
        let a: Vec<Record> = g.generate(5).collect::<Result<_>>().unwrap();
        let b: Vec<Record> = g.generate(5).collect::<Result<_>>().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_count_is_empty() {
        let g = RecordGenerator::new(params(3, 3));
        assert_eq!(g.generate(0).count(), 0);
    }
}
