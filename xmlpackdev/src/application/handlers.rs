use std::path::{Path, PathBuf};

use crate::presentation::cli::ConfigArgs;
use xmlpack_core::error::{Result, XmlpackError};
use xmlpack_core::stats::RunReport;
use xmlpack_core::{ArchiveHandle, Pipeline, PipelineConfig, XmlCodec, list_members, read_member};

/// Defaults, then the optional JSON file, then individual flags.
pub fn resolve_config(args: &ConfigArgs) -> Result<PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(v) = &args.out_dir {
        cfg.out_dir = v.clone();
    }
    if let Some(v) = args.archive_count {
        cfg.archive_count = v;
    }
    if let Some(v) = args.records_per_archive {
        cfg.records_per_archive = v;
    }
    if let Some(v) = args.token_bytes {
        cfg.token_bytes = v;
    }
    if let Some(v) = args.name_length {
        cfg.name_length = v;
    }
    if let Some(v) = args.objects_max {
        cfg.objects_max = v;
    }
    if let Some(v) = args.level_max {
        cfg.level_max = v;
    }
    if args.workers.is_some() {
        cfg.workers = args.workers;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let s = serde_json::to_string_pretty(report)
            .map_err(|e| XmlpackError::Encode(format!("report: {e}")))?;
        println!("{s}");
        return Ok(());
    }
    println!(
        "archives={} records={} workers={}",
        report.archives, report.records, report.workers
    );
    println!(
        "build={:.3}s read={:.3}s aggregate={:.3}s",
        report.build_secs, report.read_secs, report.aggregate_secs
    );
    if let Some(p) = &report.levels_path {
        println!("{}  {} rows", p.display(), report.level_rows);
    }
    if let Some(p) = &report.objects_path {
        println!("{}  {} rows", p.display(), report.object_rows);
    }
    Ok(())
}

pub fn handle_run(args: &ConfigArgs, json: bool) -> Result<()> {
    let mut pipeline = Pipeline::new(resolve_config(args)?)?;
    let report = pipeline.run()?;
    print_report(&report, json)
}

pub fn handle_build(args: &ConfigArgs) -> Result<()> {
    let mut pipeline = Pipeline::new(resolve_config(args)?)?;
    for h in pipeline.build()? {
        println!("{}", h.path.display());
    }
    Ok(())
}

fn handles_for(paths: Vec<PathBuf>) -> Vec<ArchiveHandle> {
    paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| ArchiveHandle {
            index,
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            path,
        })
        .collect()
}

pub fn handle_aggregate(archives: Vec<PathBuf>, args: &ConfigArgs, json: bool) -> Result<()> {
    let cfg = resolve_config(args)?;
    let mut pipeline = Pipeline::from_archives(cfg, handles_for(archives))?;
    let report = pipeline.run()?;
    print_report(&report, json)
}

pub fn handle_list(archive: &Path) -> Result<()> {
    for m in list_members(archive)? {
        println!("{:<12} u={:<8} c={}", m.name, m.u_size, m.c_size);
    }
    Ok(())
}

pub fn handle_show(archive: &Path, member: &str) -> Result<()> {
    let r = read_member(archive, member, &XmlCodec)?;
    println!("id     {}", r.id);
    println!("level  {}", r.level);
    for name in &r.object_names {
        println!("object {name}");
    }
    Ok(())
}
