mod output;
mod provenance;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rainbow::api::*;
use serde_json::{json, Value};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::output::{summarize, summary_rows, write_summary, JsonlSink};
use crate::provenance::{current_git_rev, write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "rainbow")]
#[command(about = "Search flip graphs for rainbow cycles")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// k-subsets of {1..n}, labeled by transpositions
    Subsets {
        #[arg(long)]
        n: u32,
        #[arg(long)]
        k: u32,
        #[command(flatten)]
        search: SearchOpts,
    },
    /// All triangulations of a convex n-gon, labeled by flipped diagonals
    Polygon {
        #[arg(long)]
        n: usize,
        #[command(flatten)]
        search: SearchOpts,
    },
    /// Triangulations read from a text file (`V` point line, one edge list per line)
    Triangulations {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        search: SearchOpts,
    },
    /// Check a candidate k-subset cycle, e.g. `--cycle 1-2,1-3,2-3`
    CheckSubsets {
        #[arg(long)]
        n: u32,
        #[arg(long)]
        k: u32,
        #[arg(long, default_value_t = 1)]
        r: usize,
        #[arg(long)]
        cycle: String,
    },
    /// Print build provenance, or aggregate a summary table
    Report {
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(Args, Clone, Debug)]
struct SearchOpts {
    /// Required multiplicity of every label
    #[arg(long, default_value_t = 1)]
    r: usize,
    /// Number of evenly spaced start nodes
    #[arg(long, default_value_t = 5)]
    starts: usize,
    /// Start from every node
    #[arg(long, conflicts_with_all = ["shared_label", "start"])]
    all_starts: bool,
    /// Start from the nodes entered by the rarest label
    #[arg(long, conflicts_with = "start")]
    shared_label: bool,
    /// Explicit start node id (repeatable)
    #[arg(long)]
    start: Vec<usize>,
    /// Keep searching after the first cycle per start
    #[arg(long)]
    exhaustive: bool,
    /// Shuffle outgoing arcs with this seed
    #[arg(long)]
    seed: Option<u64>,
    /// Append accepted cycles as JSON lines
    #[arg(long)]
    out: Option<PathBuf>,
    /// Write a per-cycle summary table (.csv or .parquet)
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl SearchOpts {
    fn arc_order(&self) -> ArcOrder {
        self.seed
            .map_or(ArcOrder::Insertion, |seed| ArcOrder::Shuffled { seed })
    }

    fn run_cfg(&self) -> RunCfg {
        let starts = if self.all_starts {
            StartPolicy::All
        } else if self.shared_label {
            StartPolicy::SharedLabel
        } else if !self.start.is_empty() {
            StartPolicy::Explicit(self.start.iter().copied().map(NodeId).collect())
        } else {
            StartPolicy::EvenlySpaced(self.starts)
        };
        RunCfg {
            r: self.r,
            starts,
            mode: if self.exhaustive {
                SearchMode::Exhaustive
            } else {
                SearchMode::FirstFound
            },
        }
    }

    fn params(&self) -> Value {
        json!({
            "r": self.r,
            "starts": format!("{:?}", self.run_cfg().starts),
            "exhaustive": self.exhaustive,
            "seed": self.seed,
        })
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Subsets { n, k, search } => subsets(n, k, &search),
        Action::Polygon { n, search } => polygon(n, &search),
        Action::Triangulations { input, search } => triangulations(&input, &search),
        Action::CheckSubsets { n, k, r, cycle } => check_subsets(n, k, r, &cycle),
        Action::Report { summary } => report(summary.as_deref()),
    }
}

fn subsets(n: u32, k: u32, opts: &SearchOpts) -> Result<()> {
    tracing::info!(n, k, r = opts.r, "subsets");
    let graph = subset_flip_graph(n, k, opts.arc_order())?;
    let report = run_search("subsets", &graph, opts, json!({ "n": n, "k": k }))?;
    audit(&KSubsetRule { n, k }, &graph, &report, opts.r)
}

fn polygon(n: usize, opts: &SearchOpts) -> Result<()> {
    tracing::info!(n, r = opts.r, "polygon");
    if n < 4 {
        bail!("a convex polygon needs at least 4 vertices to have a flip (got {n})");
    }
    let points = convex_polygon(n);
    let tris = convex_triangulations(n);
    let graph = triangulation_flip_graph(&points, &tris, opts.arc_order())?;
    let report = run_search("polygon", &graph, opts, json!({ "n": n }))?;
    audit(&TriangulationRule::new(points, &tris), &graph, &report, opts.r)
}

fn triangulations(input: &Path, opts: &SearchOpts) -> Result<()> {
    tracing::info!(input = %input.display(), r = opts.r, "triangulations");
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let (points, tris) =
        parse_triangulations(&text).with_context(|| format!("parsing {}", input.display()))?;
    let graph = triangulation_flip_graph(&points, &tris, opts.arc_order())?;
    let params = json!({ "input": input.to_string_lossy(), "points": points.len() });
    let report = run_search("triangulations", &graph, opts, params)?;
    audit(&TriangulationRule::new(points, &tris), &graph, &report, opts.r)
}

/// Run the multi-start search, stream accepted cycles to `--out`, print them,
/// and write the optional summary and provenance.
fn run_search<N, L>(
    command: &'static str,
    graph: &FlipGraph<N, L>,
    opts: &SearchOpts,
    domain: Value,
) -> Result<RunReport>
where
    N: Display + Sync,
    L: Display + Sync,
{
    tracing::info!(
        nodes = graph.node_count(),
        labels = graph.label_count(),
        arcs = graph.arc_count(),
        "graph_built"
    );
    let cfg = opts.run_cfg();
    let mut sink = opts
        .out
        .as_deref()
        .map(|path| JsonlSink::append(path, graph))
        .transpose()?;
    let report = find_rainbow_cycles(
        graph,
        &cfg,
        sink.as_mut().map(|s| s as &mut dyn CycleSink),
    )?;

    let stats = report.stats();
    tracing::info!(
        accepted = report.cycles.len(),
        emitted = stats.emitted,
        arcs_tried = stats.arcs_tried,
        backtracks = stats.backtracks,
        "run_finished"
    );
    if report.cycles.is_empty() {
        println!("no rainbow cycle found");
    }
    for (i, c) in report.cycles.iter().enumerate() {
        println!("#{} {}", i + 1, render(graph, c));
    }

    if let Some(summary) = opts.summary.as_deref() {
        write_summary(summary, &summary_rows(graph, &report.cycles))?;
    }
    let outputs: Vec<&Path> = opts
        .out
        .as_deref()
        .into_iter()
        .chain(opts.summary.as_deref())
        .collect();
    if let Some(&first) = outputs.first() {
        let mut params = opts.params();
        params["domain"] = domain;
        let payload = Payload::new(command, params).with_results(json!({
            "accepted": report.cycles.len(),
            "emitted": stats.emitted,
            "arcs_tried": stats.arcs_tried,
        }));
        let path = write_sidecar(first, &outputs, &payload)?;
        tracing::info!(path = %path.display(), "provenance_written");
    }
    Ok(report)
}

/// `node -label-> node ...` in walk order.
fn render<N: Display, L: Display>(graph: &FlipGraph<N, L>, cycle: &Cycle) -> String {
    let mut s = String::new();
    for a in cycle.arcs() {
        s.push_str(&format!("{} -{}-> ", graph.node(a.from), graph.label(a.label)));
    }
    s.push_str(&graph.node(cycle.start()).to_string());
    s
}

/// Re-check every accepted cycle against the domain rule.
fn audit<R>(
    rule: &R,
    graph: &FlipGraph<R::Node, R::Label>,
    report: &RunReport,
    r: usize,
) -> Result<()>
where
    R: FlipRule,
    R::Node: Clone,
{
    for (i, c) in report.cycles.iter().enumerate() {
        let walk: Vec<R::Node> = graph.cycle_nodes(c).into_iter().cloned().collect();
        check_rainbow_cycle(rule, &walk, r).map_err(|v| anyhow!("cycle #{}: {v}", i + 1))?;
    }
    Ok(())
}

/// Parse `1-2,1-3,2-3` into subsets.
fn parse_subset_cycle(text: &str) -> Result<Vec<Subset>> {
    text.split(',')
        .map(|chunk| {
            let elems = chunk
                .split('-')
                .map(|x| {
                    x.trim()
                        .parse::<u32>()
                        .with_context(|| format!("bad element {x:?} in {chunk:?}"))
                })
                .collect::<Result<Vec<u32>>>()?;
            Ok(Subset::new(elems))
        })
        .collect()
}

fn check_subsets(n: u32, k: u32, r: usize, cycle: &str) -> Result<()> {
    let walk = parse_subset_cycle(cycle)?;
    tracing::info!(n, k, r, len = walk.len(), "check_subsets");
    match check_rainbow_cycle(&KSubsetRule { n, k }, &walk, r) {
        Ok(()) => {
            println!("rainbow cycle ({} nodes, r = {r})", walk.len());
            Ok(())
        }
        Err(v) => bail!("not a rainbow cycle: {v}"),
    }
}

fn report(summary: Option<&Path>) -> Result<()> {
    match summary {
        Some(path) => {
            let df = summarize(path)?;
            println!("{df}");
        }
        None => {
            let obj = json!({
                "code_rev": current_git_rev(),
                "version": rainbow::VERSION,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_cycle_text() {
        let walk = parse_subset_cycle("1-2, 3-1 ,2-3").unwrap();
        assert_eq!(walk[1], Subset::new(vec![1, 3]));
        assert!(check_subsets(3, 2, 1, "1-2,1-3,2-3").is_ok());
        assert!(check_subsets(5, 2, 1, "1-2,1-3,2-3").is_err());
        assert!(parse_subset_cycle("1-x").is_err());
    }

    #[test]
    fn search_opts_pick_the_policy() {
        let cmd = Cmd::try_parse_from([
            "rainbow",
            "subsets",
            "--n",
            "5",
            "--k",
            "2",
            "--start",
            "3",
            "--start",
            "7",
            "--exhaustive",
        ])
        .unwrap();
        let Action::Subsets { search, .. } = cmd.action else {
            panic!("wrong subcommand");
        };
        let cfg = search.run_cfg();
        assert_eq!(
            cfg.starts,
            StartPolicy::Explicit(vec![NodeId(3), NodeId(7)])
        );
        assert_eq!(cfg.mode, SearchMode::Exhaustive);

        let cmd = Cmd::try_parse_from(["rainbow", "polygon", "--n", "6"]).unwrap();
        let Action::Polygon { search, .. } = cmd.action else {
            panic!("wrong subcommand");
        };
        assert_eq!(search.run_cfg(), RunCfg::default());
        assert_eq!(search.arc_order(), ArcOrder::Insertion);

        assert!(Cmd::try_parse_from([
            "rainbow",
            "polygon",
            "--n",
            "6",
            "--all-starts",
            "--shared-label"
        ])
        .is_err());
    }

    #[test]
    fn render_walks_back_to_start() {
        let g = subset_flip_graph(3, 1, ArcOrder::Insertion).unwrap();
        let c = search(&g, NodeId(0), 1).unwrap();
        assert_eq!(render(&g, &c), "{1} -(1 2)-> {2} -(2 3)-> {3} -(1 3)-> {1}");
    }
}
