use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::pipeline::Chunk;

/// Routes emitted chunks to their destination: one file per declaration
/// kind under `output_dir`, or a concatenated stream on stdout. File
/// layout beyond this split is someone else's decision.
pub fn route(chunks: &[Chunk], namespace: &str, output_dir: Option<&Path>) -> io::Result<()> {
    match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            for chunk in chunks {
                if chunk.text.is_empty() {
                    continue;
                }
                let path = dir.join(format!("{namespace}-{}.swift", chunk.kind.label()));
                fs::write(&path, &chunk.text)?;
                info!(path = %path.display(), "wrote");
            }
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for chunk in chunks {
                if chunk.text.is_empty() {
                    continue;
                }
                writeln!(out, "// MARK: {} ({namespace})", chunk.kind.label())?;
                out.write_all(chunk.text.as_bytes())?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
