use anyhow::{anyhow, Result};
use log::{debug, info};
use rcpsp::problem::Problem;
use std::borrow::Cow;

use crate::Graph;

pub fn graph(args: Graph) -> Result<()> {
    let problem = super::load_problem(&args.psp_problem_file)?;

    let name = args
        .psp_problem_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!("Creating graph for instance: {name}");

    let edges = Edges::new(&name, &problem)?;

    let mut output_file = std::fs::File::create(&args.output)?;
    dot::render(&edges, &mut output_file)?;

    info!("Wrote graphviz dot file to: {:?}", args.output);

    Ok(())
}

type Nd = usize;
type Ed = (usize, usize);

struct Edges {
    graph_id: dot::Id<'static>,
    node_ids: Vec<dot::Id<'static>>,
    durations: Vec<usize>,
    edges: Vec<Ed>,
}

impl Edges {
    fn new(name: &str, problem: &Problem) -> Result<Self> {
        let jobs = problem.number_of_jobs();

        let graph_id = dot::Id::new(graph_name(name))
            .map_err(|()| anyhow!("{name:?} is not a valid graph id"))?;
        let node_ids = (0..jobs)
            .map(|job| {
                dot::Id::new(format!("N{}", job + 1))
                    .map_err(|()| anyhow!("failed to label graph node {}", job + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            graph_id,
            node_ids,
            durations: (0..jobs).map(|job| problem.duration(job)).collect(),
            edges: (0..jobs)
                .flat_map(|job| {
                    problem
                        .successors(job)
                        .iter()
                        .map(move |&successor| (job, successor))
                })
                .collect(),
        })
    }
}

/// Graphviz ids are limited to `[A-Za-z_][A-Za-z0-9_]*`.
fn graph_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    match sanitized.chars().next() {
        Some(first) if !first.is_ascii_digit() => sanitized,
        _ => format!("G{sanitized}"),
    }
}

impl<'a> dot::Labeller<'a, Nd, Ed> for Edges {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new(self.graph_id.as_slice()).expect("graph id was validated on construction")
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        dot::Id::new(self.node_ids[*n].as_slice()).expect("node id was validated on construction")
    }

    fn node_label(&'a self, n: &Nd) -> dot::LabelText<'a> {
        dot::LabelText::label(format!("{} ({})", *n + 1, self.durations[*n]))
    }
}

impl<'a> dot::GraphWalk<'a, Nd, Ed> for Edges {
    fn nodes(&self) -> dot::Nodes<'a, Nd> {
        Cow::Owned((0..self.durations.len()).collect())
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        Cow::Borrowed(&self.edges[..])
    }

    fn source(&self, e: &Ed) -> Nd {
        e.0
    }

    fn target(&self, e: &Ed) -> Nd {
        e.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_names_are_valid_ids() {
        assert_eq!(graph_name("j301_1"), "j301_1");
        assert_eq!(graph_name("demo.bas"), "demo_bas");
        assert_eq!(graph_name("30-1"), "G30_1");
        assert_eq!(graph_name(""), "G");
    }

    #[test]
    fn renders_every_precedence() {
        let problem = Problem::new(
            vec![1],
            vec![0, 3, 4, 0],
            vec![vec![0], vec![1], vec![1], vec![0]],
            vec![vec![1, 2], vec![3], vec![3], vec![]],
        )
        .unwrap();
        let edges = Edges::new("pair", &problem).unwrap();

        let mut output = Vec::new();
        dot::render(&edges, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.starts_with("digraph pair {"));
        assert!(output.contains("N3[label=\"3 (4)\"];"));
        for edge in ["N1 -> N2", "N1 -> N3", "N2 -> N4", "N3 -> N4"] {
            assert!(output.contains(edge), "missing {edge} in {output}");
        }
    }
}
