//! The `eval` command

use anyhow::Context;
use clap::Args;

use xmode_core::{get_effective_mode, Mode};

/// Arguments for the eval command
#[derive(Args)]
pub struct EvalArgs {
    /// Starting mode, octal (644) or rwx (rw-r--r--)
    #[clap(allow_hyphen_values = true)]
    pub mode: String,

    /// Symbolic expression to apply
    #[clap(allow_hyphen_values = true)]
    pub expression: String,
}

fn parse_base(text: &str) -> Result<Mode, xmode_core::FormatError> {
    if text.chars().all(|c| c.is_ascii_digit()) || text.starts_with("0o") {
        Mode::from_octal_str(text)
    } else {
        Mode::from_rwx_str(text)
    }
}

/// Implementation of the eval command
pub fn execute(args: &EvalArgs) -> anyhow::Result<()> {
    let base = parse_base(&args.mode).with_context(|| format!("invalid mode '{}'", args.mode))?;
    let mode = get_effective_mode(base, &args.expression)
        .with_context(|| format!("invalid expression '{}'", args.expression))?;

    println!("{} {}", mode, mode.to_rwx_string());
    Ok(())
}
