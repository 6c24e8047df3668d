//! Output sinks: JSON-lines cycle records and the tabular run summary.

use anyhow::{Context, Result};
use polars::prelude::*;
use rainbow::api::{Cycle, CycleSink, FlipGraph};
use serde::Serialize;
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One accepted cycle as written to the JSON-lines file.
#[derive(Debug, Serialize)]
pub struct CycleRecord<'a> {
    pub ordinal: usize,
    pub start: usize,
    pub nodes: Vec<&'a str>,
    pub labels: Vec<&'a str>,
}

/// Appends one JSON record per accepted cycle. Node and label names are
/// rendered once up front so the sink does not depend on the graph's payload
/// types.
pub struct JsonlSink<W: Write + Send> {
    out: W,
    node_names: Vec<String>,
    label_names: Vec<String>,
}

impl JsonlSink<BufWriter<File>> {
    /// Open `path` in append mode; earlier records are kept.
    pub fn append<N: Display, L: Display>(path: &Path, graph: &FlipGraph<N, L>) -> Result<Self> {
        ensure_parent(path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file), graph))
    }
}

impl<W: Write + Send> JsonlSink<W> {
    pub fn new<N: Display, L: Display>(out: W, graph: &FlipGraph<N, L>) -> Self {
        Self {
            out,
            node_names: graph.nodes().iter().map(|n| n.to_string()).collect(),
            label_names: graph.labels().iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> CycleSink for JsonlSink<W> {
    fn accept(&mut self, ordinal: usize, cycle: &Cycle) -> io::Result<()> {
        let record = CycleRecord {
            ordinal,
            start: cycle.start().0,
            nodes: cycle
                .nodes()
                .map(|n| self.node_names[n.0].as_str())
                .collect(),
            labels: cycle
                .labels()
                .map(|l| self.label_names[l.0].as_str())
                .collect(),
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        // Records must survive a crash later in the run.
        self.out.flush()
    }
}

/// Summary row per accepted cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub ordinal: u32,
    pub length: u32,
    pub first_node: String,
    pub distinct_nodes: u32,
}

pub fn summary_rows<N: Display, L>(graph: &FlipGraph<N, L>, cycles: &[Cycle]) -> Vec<SummaryRow> {
    cycles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut ids: Vec<usize> = c.nodes().map(|n| n.0).collect();
            ids.sort_unstable();
            ids.dedup();
            SummaryRow {
                ordinal: i as u32 + 1,
                length: c.len() as u32,
                first_node: graph.node(c.start()).to_string(),
                distinct_nodes: ids.len() as u32,
            }
        })
        .collect()
}

/// Write the summary table; `.parquet` paths get Parquet, anything else CSV.
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    ensure_parent(path)?;
    let mut df = df!(
        "ordinal" => rows.iter().map(|r| r.ordinal).collect::<Vec<_>>(),
        "length" => rows.iter().map(|r| r.length).collect::<Vec<_>>(),
        "first_node" => rows.iter().map(|r| r.first_node.clone()).collect::<Vec<_>>(),
        "distinct_nodes" => rows.iter().map(|r| r.distinct_nodes).collect::<Vec<_>>(),
    )?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if is_parquet(path) {
        ParquetWriter::new(&mut file).finish(&mut df)?;
    } else {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
    }
    tracing::info!(rows = df.height(), path = %path.display(), "summary_written");
    Ok(())
}

/// Aggregate a summary table written by [`write_summary`]: cycle count plus
/// mean and max length.
pub fn summarize(path: &Path) -> Result<DataFrame> {
    let lf = if is_parquet(path) {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    let df = lf
        .select([
            col("ordinal").count().alias("cycles"),
            col("length").mean().alias("mean_length"),
            col("length").max().alias("max_length"),
        ])
        .collect()
        .with_context(|| format!("aggregating {}", path.display()))?;
    Ok(df)
}

fn is_parquet(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "parquet")
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}
