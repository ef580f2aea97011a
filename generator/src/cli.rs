use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(value_parser, help = "The GIR document to generate bindings for")]
    pub input: PathBuf,

    #[clap(
        long,
        help = "Dependency GIR documents to preload before the input, in order"
    )]
    pub preload: Vec<PathBuf>,

    #[clap(long, help = "File listing names to omit from emission, one per line")]
    pub exclusions: Option<PathBuf>,

    #[clap(
        long,
        help = "File listing constant names whose literal is emitted unconverted"
    )]
    pub verbatim_constants: Option<PathBuf>,

    #[clap(
        short = 'o',
        long,
        help = "Directory for per-kind output files; stdout when absent"
    )]
    pub output_dir: Option<PathBuf>,

    #[clap(
        long,
        default_value_t = 0,
        help = "Worker threads for emission (0 = one per CPU)"
    )]
    pub jobs: usize,
}
