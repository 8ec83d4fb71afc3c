use crate::aggregate::{self, TableArtifacts};
use crate::codec::DocumentCodec;
use crate::codec::xml::XmlCodec;
use crate::config::PipelineConfig;
use crate::domain::{ArchiveHandle, ParsedRecord};
use crate::error::{Result, XmlpackError};
use crate::generate::{GeneratorParams, RecordGenerator};
use crate::pack::writer::build_archive;
use crate::pool::WorkerPool;
use crate::read::reader::read_all;
use crate::stats::RunReport;
use crate::timing::PhaseTimer;

/// Where the pipeline stands between phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Built,
    Read,
    Done,
    Failed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Built => "built",
            Phase::Read => "read",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

/// Drives build → read → aggregate. Phases run strictly one after another;
/// work inside a phase is spread over the worker pool.
pub struct Pipeline {
    cfg: PipelineConfig,
    pool: WorkerPool,
    codec: Box<dyn DocumentCodec>,
    generator: RecordGenerator,
    phase: Phase,
    archives: Vec<ArchiveHandle>,
    batches: Vec<Vec<ParsedRecord>>,
    artifacts: Option<TableArtifacts>,
    report: RunReport,
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Result<Self> {
        Self::with_codec(cfg, Box::new(XmlCodec))
    }

    pub fn with_codec(cfg: PipelineConfig, codec: Box<dyn DocumentCodec>) -> Result<Self> {
        cfg.validate()?;
        std::fs::create_dir_all(&cfg.out_dir)?;
        let pool = WorkerPool::new(cfg.workers)?;
        let report = RunReport {
            workers: pool.threads(),
            ..Default::default()
        };
        Ok(Self {
            generator: RecordGenerator::new(GeneratorParams::from(&cfg)),
            cfg,
            pool,
            codec,
            phase: Phase::Idle,
            archives: Vec::new(),
            batches: Vec::new(),
            artifacts: None,
            report,
        })
    }

    /// Starts from archives that already exist on disk; the next phase is `read`.
    pub fn from_archives(cfg: PipelineConfig, archives: Vec<ArchiveHandle>) -> Result<Self> {
        let mut p = Self::new(cfg)?;
        p.report.archives = archives.len();
        p.archives = archives;
        p.phase = Phase::Built;
        Ok(p)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    pub fn archives(&self) -> &[ArchiveHandle] {
        &self.archives
    }

    pub fn batches(&self) -> &[Vec<ParsedRecord>] {
        &self.batches
    }

    pub fn artifacts(&self) -> Option<&TableArtifacts> {
        self.artifacts.as_ref()
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Checks that `requested` may start now and marks the pipeline failed
    /// until the phase completes.
    fn enter(&mut self, requested: &'static str, from: Phase) -> Result<()> {
        if self.phase != from {
            return Err(XmlpackError::InvalidPhase {
                requested,
                current: self.phase.as_str(),
            });
        }
        self.phase = Phase::Failed;
        Ok(())
    }

    pub fn build(&mut self) -> Result<&[ArchiveHandle]> {
        self.enter("build", Phase::Idle)?;
        let timer = PhaseTimer::start("build");

        let out_dir = self.cfg.out_dir.as_path();
        let per_archive = self.cfg.records_per_archive;
        let generator = &self.generator;
        let codec = self.codec.as_ref();
        let indices: Vec<usize> = (0..self.cfg.archive_count).collect();
        let handles = self.pool.map_ordered("build", indices, |i| {
            build_archive(out_dir, i, per_archive, generator, codec)
        })?;

        self.report.build_secs = timer.elapsed().as_secs_f64();
        self.report.archives = handles.len();
        tracing::info!(archives = handles.len(), per_archive, "archives built");
        self.archives = handles;
        self.phase = Phase::Built;
        Ok(&self.archives)
    }

    pub fn read(&mut self) -> Result<&[Vec<ParsedRecord>]> {
        self.enter("read", Phase::Built)?;
        let timer = PhaseTimer::start("read");

        let codec = self.codec.as_ref();
        let inputs: Vec<&ArchiveHandle> = self.archives.iter().collect();
        let batches = self
            .pool
            .map_ordered("read", inputs, |h| read_all(&h.path, codec))?;

        self.report.read_secs = timer.elapsed().as_secs_f64();
        self.report.records = batches.iter().map(Vec::len).sum();
        tracing::info!(
            archives = batches.len(),
            records = self.report.records,
            "archives read"
        );
        self.batches = batches;
        self.phase = Phase::Read;
        Ok(&self.batches)
    }

    pub fn aggregate(&mut self) -> Result<&TableArtifacts> {
        self.enter("aggregate", Phase::Read)?;
        let timer = PhaseTimer::start("aggregate");

        let tables = aggregate::partition(&self.pool, &self.batches);
        let artifacts = aggregate::write_tables(&tables, &self.cfg.out_dir)?;

        self.report.aggregate_secs = timer.elapsed().as_secs_f64();
        self.report.level_rows = artifacts.levels_rows;
        self.report.object_rows = artifacts.objects_rows;
        self.report.levels_path = Some(artifacts.levels_path.clone());
        self.report.objects_path = Some(artifacts.objects_path.clone());
        self.phase = Phase::Done;
        Ok(self.artifacts.insert(artifacts))
    }

    /// Runs every remaining phase in order.
    pub fn run(&mut self) -> Result<RunReport> {
        if self.phase == Phase::Idle {
            self.build()?;
        }
        self.read()?;
        self.aggregate()?;
        Ok(self.report.clone())
    }
}
