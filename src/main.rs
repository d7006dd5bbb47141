// diff-tool: ranks call edges unique to a supergraph by likely genuine
// reachability, against a paired subgraph.

use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::Parser;

use difftool::cli::{Cli, OutputFormat};
use difftool::driver::{self, DiffConfig};
use difftool::output;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = DiffConfig {
        max_iterations: cli.max_iterations,
        top_n: cli.top_n,
    };
    let cancel = AtomicBool::new(false);

    let report = driver::run(&cli.super_dir, &cli.sub_dir, &config, &cancel)
        .with_context(|| format!("while diffing {} against {}", cli.super_dir.display(), cli.sub_dir.display()))?;

    match cli.output {
        OutputFormat::Human => {
            if cli.top_n != 0 {
                output::header("ranked edges");
                for &edge in &report.ranked {
                    output::ranked_edge(&report.supergraph, edge);
                }
            }
        }
        OutputFormat::Json => {
            output::print_json_report(&report.supergraph, &report.subgraph, &report.ranked);
        }
    }

    if let Some(path) = &cli.methods_csv {
        output::write_methods_csv(&report.supergraph, path)
            .with_context(|| format!("while writing {}", path.display()))?;
        output::info(&format!("wrote {}", path.display()));
    }

    Ok(())
}
