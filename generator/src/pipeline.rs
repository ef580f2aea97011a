use std::panic::{catch_unwind, AssertUnwindSafe};

use crossbeam_channel::unbounded;
use tracing::debug;

use crate::swift::{self, GeneratorContext};

/// The independent declaration categories emission fans out over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EmitKind {
    Support,
    Aliases,
    Constants,
    Enumerations,
    Bitfields,
    Records,
    Classes,
    Interfaces,
    Functions,
}

impl EmitKind {
    pub const ALL: [EmitKind; 9] = [
        EmitKind::Support,
        EmitKind::Aliases,
        EmitKind::Constants,
        EmitKind::Enumerations,
        EmitKind::Bitfields,
        EmitKind::Records,
        EmitKind::Classes,
        EmitKind::Interfaces,
        EmitKind::Functions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EmitKind::Support => "support",
            EmitKind::Aliases => "aliases",
            EmitKind::Constants => "constants",
            EmitKind::Enumerations => "enumerations",
            EmitKind::Bitfields => "bitfields",
            EmitKind::Records => "records",
            EmitKind::Classes => "classes",
            EmitKind::Interfaces => "interfaces",
            EmitKind::Functions => "functions",
        }
    }
}

/// One category's emitted text, produced into a task-private buffer and
/// handed to the collector.
#[derive(Debug)]
pub struct Chunk {
    pub kind: EmitKind,
    pub text: String,
}

fn emit_kind(ctx: &GeneratorContext, kind: EmitKind) -> String {
    match kind {
        EmitKind::Support => swift::support_prelude(ctx.namespace),
        EmitKind::Aliases => swift::enums::emit_aliases(ctx),
        EmitKind::Constants => swift::enums::emit_constants(ctx),
        EmitKind::Enumerations => swift::enums::emit_enumerations(ctx),
        EmitKind::Bitfields => swift::enums::emit_bitfields(ctx),
        EmitKind::Records => swift::record::emit_records(ctx),
        EmitKind::Classes => swift::record::emit_classes(ctx),
        EmitKind::Interfaces => swift::record::emit_interfaces(ctx),
        EmitKind::Functions => swift::functions::emit_functions(ctx),
    }
}

/// Fans the declaration categories out over a worker pool. Every task only
/// reads the frozen registry and writes its own buffer; results funnel
/// through a single collector channel, and the scope join is the barrier
/// before any output routing. A failing task reports a diagnostic and
/// leaves its siblings untouched.
pub fn generate(ctx: &GeneratorContext, workers: usize) -> Vec<Chunk> {
    let workers = if workers == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        workers
    }
    .min(EmitKind::ALL.len());

    let (task_tx, task_rx) = unbounded::<EmitKind>();
    let (result_tx, result_rx) = unbounded::<Chunk>();
    for kind in EmitKind::ALL {
        task_tx.send(kind).unwrap();
    }
    drop(task_tx);

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok(kind) = task_rx.recv() {
                    debug!(worker, kind = kind.label(), "emitting");
                    match catch_unwind(AssertUnwindSafe(|| emit_kind(ctx, kind))) {
                        Ok(text) => {
                            let _ = result_tx.send(Chunk { kind, text });
                        }
                        Err(_) => ctx.diags.report(
                            kind.label(),
                            "emission task failed; the output is missing this section",
                        ),
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut chunks: Vec<Chunk> = result_rx.into_iter().collect();
    chunks.sort_by_key(|chunk| chunk.kind);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use sg_gir::{Diagnostics, Namespace, Registry};

    #[test]
    fn all_categories_complete_in_deterministic_order() {
        let namespace = Namespace::default();
        let snapshot = Registry::new().freeze();
        let diags = Diagnostics::new();
        let exclusions = HashSet::new();
        let verbatim = HashSet::new();
        let ctx = GeneratorContext {
            snapshot: &snapshot,
            namespace: &namespace,
            diags: &diags,
            exclusions: &exclusions,
            verbatim_constants: &verbatim,
        };

        for workers in [1, 4] {
            let chunks = generate(&ctx, workers);
            let kinds: Vec<EmitKind> = chunks.iter().map(|c| c.kind).collect();
            assert_eq!(kinds, EmitKind::ALL.to_vec(), "workers = {workers}");
        }
    }
}
