//! Development tasks: man pages and shell completions for `autoria`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for autoria")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages (one per subcommand)
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/completions")]
        out: PathBuf,
        /// Shells to generate for (all when omitted)
        #[arg(long, value_enum)]
        shell: Vec<Shell>,
    },
}

fn main() -> anyhow::Result<()> {
    match Xtask::parse().task {
        Task::Man { out } => generate_man(&out),
        Task::Completions { out, shell } => {
            let shells = if shell.is_empty() {
                Shell::value_variants().to_vec()
            } else {
                shell
            };
            generate_completions(&out, &shells)
        }
    }
}

fn generate_man(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let cmd = autoria::command();
    clap_mangen::generate_to(cmd, out)
        .with_context(|| format!("failed to write man pages to {}", out.display()))?;
    println!("man pages written to {}", out.display());
    Ok(())
}

fn generate_completions(out: &Path, shells: &[Shell]) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut cmd = autoria::command();
    for &shell in shells {
        let path = clap_complete::generate_to(shell, &mut cmd, "autoria", out)
            .with_context(|| format!("failed to write {shell} completions"))?;
        println!("{shell}: {}", path.display());
    }
    Ok(())
}
