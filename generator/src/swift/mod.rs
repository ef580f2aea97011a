use std::collections::HashSet;

use sg_gir::{Diagnostics, Namespace, RegistrySnapshot, Thing};

use crate::gtkdoc;

pub mod accessors;
pub mod constructors;
pub mod enums;
pub mod functions;
pub mod names;
pub mod record;
pub mod signal;

/// Shared, read-only state for all emitters. Every field is a borrow of
/// post-barrier data, so one context can serve concurrent emission tasks.
pub struct GeneratorContext<'a> {
    pub snapshot: &'a RegistrySnapshot,
    pub namespace: &'a Namespace,
    pub diags: &'a Diagnostics,
    /// Names to omit from emission; omissions leave a commented marker.
    pub exclusions: &'a HashSet<String>,
    /// Constant names whose literal is emitted unconverted.
    pub verbatim_constants: &'a HashSet<String>,
}

impl GeneratorContext<'_> {
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    /// Doc comment plus availability attributes for a declaration.
    pub fn documentation(&self, thing: &Thing, indent: &str) -> String {
        let mut out = String::new();
        if !thing.doc.is_empty() {
            for line in gtkdoc::transcode(&thing.doc).lines() {
                if line.is_empty() {
                    out.push_str(&format!("{indent}///\n"));
                } else {
                    out.push_str(&format!("{indent}/// {line}\n"));
                }
            }
        }
        if let Some(version) = thing.version.as_deref() {
            out.push_str(&format!("{indent}/// - Since: {version}\n"));
        }
        if let Some(message) = thing.deprecated.as_deref() {
            let message = flatten_message(message);
            out.push_str(&format!(
                "{indent}@available(*, deprecated, message: \"{message}\")\n"
            ));
        }
        out
    }
}

fn flatten_message(message: &str) -> String {
    message
        .replace('"', "\\\"")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Declarations every generated module relies on: the error wrapper for
/// throwing calls, the closure holder and the low-level generic subscribe
/// operation used by the signal bridge and its fallback path.
pub fn support_prelude(namespace: &Namespace) -> String {
    format!(
        r#"// Support declarations for the generated {name} bindings.

import CGLib

/// Error thrown for native calls that report a `GError`.
public struct {name}Error: Error {{
    public let message: String

    public init(_ error: UnsafeMutablePointer<GError>) {{
        message = String(cString: error.pointee.message)
        g_error_free(error)
    }}
}}

/// Type-erased box keeping a subscriber's closure alive for the duration
/// of a signal connection.
public final class SignalClosureHolder<S, R> {{
    public let call: S
    public init(_ call: S) {{ self.call = call }}

    /// Retained opaque pointer handed to the native callback as user data.
    public var opaque: gpointer {{
        Unmanaged.passRetained(self).toOpaque()
    }}
}}

/// Low-level subscribe operation; typed wrappers funnel into this, and it
/// remains the fallback for events no typed wrapper is generated for.
@discardableResult
public func connectSignal(
    named name: String,
    pointer: UnsafeMutableRawPointer,
    handler: GCallback,
    data: gpointer,
    destroy: @escaping GClosureNotify
) -> Int {{
    Int(g_signal_connect_data(pointer, name, handler, data, destroy, GConnectFlags(rawValue: 0)))
}}
"#,
        name = namespace.name
    )
}
