use anyhow::{Context, Result};
use log::info;
use rcpsp::scheduler;

use crate::Benchmark;

pub fn benchmark(benchmark: Benchmark) -> Result<()> {
    if !benchmark.psp_problem_file_folder.is_dir() {
        anyhow::bail!("psp_problem_file_folder is not a directory")
    }

    let mut paths = benchmark
        .psp_problem_file_folder
        .read_dir()?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.retain(|path| path.is_file());
    paths.sort();

    let options = benchmark.grasp.options();

    let scheduling_results = paths
        .iter()
        .map(|path| -> Result<String> {
            let problem = super::load_problem(path)?;
            let best = scheduler(&problem, &options)
                .with_context(|| format!("failed to schedule {}", path.display()))?;
            info!("{}: {}", path.display(), best.duration());

            Ok(format!("{path:?}: {}", best.duration()))
        })
        .collect::<Result<Vec<_>>>()?;

    std::fs::write(&benchmark.output, scheduling_results.join("\n"))
        .with_context(|| format!("failed to write {}", benchmark.output.display()))?;

    Ok(())
}
