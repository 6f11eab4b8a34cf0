use super::romfile::{self, RomFormat};
use crate::assembler::{
    self,
    emit::{self, Emitted, Layout},
};
use anyhow::Context;
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "lsasm", about = "Assembler for the ls gate-computer CPU")]
pub struct Command {
    /// Text encoding for the emitted ROM words.
    #[structopt(short = "f", long, default_value = "hex", possible_values = &RomFormat::NAMES)]
    format: RomFormat,

    /// Emit one full-width word file instead of the ALPHA/BETA bank pair.
    #[structopt(long)]
    single: bool,

    #[structopt(name = "SRC", parse(from_os_str))]
    in_src: PathBuf,

    /// Base name for the output files; defaults to the source file stem.
    #[structopt(name = "OUTBASE")]
    out_base: Option<String>,
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&cmd.in_src)
        .with_context(|| format!("could not read source file '{}'", cmd.in_src.display()))?;

    let assembly = assembler::assemble(&source);
    for diag in &assembly.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diag);
    }

    let out_base = match cmd.out_base {
        Some(base) => base,
        None => cmd
            .in_src
            .file_stem()
            .context("source path has no file name")?
            .to_string_lossy()
            .into_owned(),
    };

    let layout = if cmd.single { Layout::Single } else { Layout::Split };

    println!("Compiled {} instructions", assembly.program.len());

    match emit::emit(&assembly.program, layout) {
        Emitted::Split(banks) => {
            for (bank, data) in banks.iter() {
                let path = format!("{}_{}.out", out_base, bank.suffix());
                romfile::write_half_words(&path, data, cmd.format)
                    .with_context(|| format!("could not write ROM file '{}'", path))?;
                println!("Generated {} ROM: {}", bank.suffix(), path);
            }
        }
        Emitted::Single(words) => {
            let path = format!("{}.out", out_base);
            romfile::write_words(&path, &words, cmd.format)
                .with_context(|| format!("could not write ROM file '{}'", path))?;
            println!("Generated ROM: {}", path);
        }
    }

    Ok(())
}
