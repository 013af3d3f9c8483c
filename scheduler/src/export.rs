use std::collections::BTreeSet;
use std::fmt;

use rcpsp::{schedule::Schedule, sources_load::ResourceTimeline};

/// Number of decimal digits of `n`.
fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Tasks are shown with their 1-based psp lib job number, free units as 0.
fn cell(timeline: &ResourceTimeline, t: usize, unit: usize) -> usize {
    timeline.usage(t, unit).map_or(0, |task| task + 1)
}

/// Occupancy tables of every resource, one row per time slot up to the last used one.
pub struct Table<'a>(pub &'a Schedule);

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (resource, timeline) in self.0.timelines().iter().enumerate() {
            writeln!(f, "Resource {}:", resource + 1)?;
            write_table(f, timeline)?;
            writeln!(f)?;
        }

        Ok(())
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, timeline: &ResourceTimeline) -> fmt::Result {
    let t_max = timeline.occupied_until();
    let capacity = timeline.capacity();

    let largest_label = (0..t_max)
        .flat_map(|t| (0..capacity).map(move |unit| (t, unit)))
        .map(|(t, unit)| cell(timeline, t, unit))
        .max()
        .unwrap_or(0);

    let time_width = digits(t_max.max(1)) + 1;
    let unit_width = digits(capacity).max(digits(largest_label));

    write!(f, "{:>time_width$} |", "t")?;
    for unit in 0..capacity {
        write!(f, " {unit:>unit_width$}")?;
    }
    writeln!(
        f,
        "\n{}|{}",
        "-".repeat(time_width + 1),
        "-".repeat(capacity * (unit_width + 1) + 1)
    )?;

    for t in 0..t_max {
        write!(f, "{t:>time_width$} |")?;
        for unit in 0..capacity {
            write!(f, " {:>unit_width$}", cell(timeline, t, unit))?;
        }
        writeln!(f)?;
    }

    Ok(())
}

/// A gnuplot script drawing the occupancy of every resource, one plot per resource.
///
/// Every used cell becomes a unit square coloured by its task.
pub struct GnuplotScript<'a>(pub &'a Schedule);

impl fmt::Display for GnuplotScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timelines = self.0.timelines();

        writeln!(f, "set multiplot layout {},1", timelines.len())?;
        for (resource, timeline) in timelines.iter().enumerate() {
            if resource > 0 {
                writeln!(f, "unset object")?;
            }
            writeln!(f, "set title 'Resource {}'", resource + 1)?;
            write_plot(f, timeline)?;
        }
        writeln!(f, "unset multiplot")
    }
}

fn write_plot(f: &mut fmt::Formatter<'_>, timeline: &ResourceTimeline) -> fmt::Result {
    let t_max = timeline.occupied_until().max(1);
    let capacity = timeline.capacity();

    writeln!(f, "set key outside")?;
    writeln!(f, "set xtics {}", digits(t_max).pow(2))?;
    writeln!(f, "set ytics {}", digits(capacity).pow(2))?;
    writeln!(f, "set xrange [0:{t_max}]")?;
    writeln!(f, "set yrange [0:{capacity}]")?;
    writeln!(f, "set size ratio {}", capacity as f64 / t_max as f64)?;

    let mut tasks = BTreeSet::new();
    let mut object = 0;

    for t in 0..timeline.horizon() {
        for unit in 0..capacity {
            let label = cell(timeline, t, unit);
            if label == 0 {
                continue;
            }

            object += 1;
            writeln!(
                f,
                "set object {object} rectangle from {t},{unit} to {},{} fillstyle noborder fillcolor lt {label}",
                t + 1,
                unit + 1
            )?;
            tasks.insert(label);
        }
    }

    // NaN plots draw nothing but give every task a legend entry
    write!(f, "plot NaN notitle")?;
    for label in tasks {
        write!(f, ", NaN linecolor {label} title '{label}'")?;
    }
    writeln!(f)
}
