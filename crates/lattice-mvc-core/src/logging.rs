//! Logging and debugging facilities for Lattice MVC.
//!
//! This module provides:
//! - Target names for filtering the `tracing` events emitted by each registry
//! - A human-readable dump of one core's actors and subscriptions
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Lattice MVC uses the `tracing` crate for instrumentation. Installing a
//! subscriber is up to the application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("lattice_mvc_core::view=trace")
//!         .init();
//! }
//! ```
//!
//! # Core Dumps
//!
//! ```
//! use lattice_mvc_core::CoreRegistry;
//! use lattice_mvc_core::logging::CoreDebug;
//!
//! let registry = CoreRegistry::new();
//! let facade = registry.facade("app").unwrap();
//! let dump = CoreDebug::new().format_core(&facade);
//! assert!(dump.starts_with("Core 'app'"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::facade::Facade;
use crate::multiton::CoreRegistry;

/// Span names used throughout Lattice MVC for tracing.
pub mod span_names {
    /// Notification delivery span.
    pub const NOTIFY: &str = "notify_observers";
    /// Performance measurement span.
    pub const PERF: &str = "perf";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "lattice_mvc_core";
    /// Keyed instance maps.
    pub const MULTITON: &str = "lattice_mvc_core::multiton";
    /// Proxy registry target.
    pub const MODEL: &str = "lattice_mvc_core::model";
    /// Mediator registry and notification delivery target.
    pub const VIEW: &str = "lattice_mvc_core::view";
    /// Command registry target.
    pub const CONTROLLER: &str = "lattice_mvc_core::controller";
    /// Core lifecycle target.
    pub const FACADE: &str = "lattice_mvc_core::facade";
    /// Notifier binding target.
    pub const NOTIFIER: &str = "lattice_mvc_core::notifier";
    /// Performance spans opened by [`PerfSpan`](super::PerfSpan).
    pub const PERF: &str = "lattice_mvc::perf";
}

/// Style options for core dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line sections.
    Compact,
}

/// Configuration for core dump output.
#[derive(Debug, Clone)]
pub struct CoreFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to list each mediator's notification interests.
    pub show_interests: bool,
    /// Whether to show the subscription table with observer counts.
    pub show_observers: bool,
    /// Whether to show empty sections.
    pub show_empty: bool,
}

impl Default for CoreFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_interests: true,
            show_observers: true,
            show_empty: true,
        }
    }
}

impl CoreFormatOptions {
    /// Options for minimal output: actor names only.
    pub fn minimal() -> Self {
        Self {
            show_interests: false,
            show_observers: false,
            show_empty: false,
            ..Default::default()
        }
    }
}

/// Debug utility for inspecting cores.
#[derive(Debug, Clone, Default)]
pub struct CoreDebug {
    options: CoreFormatOptions,
}

impl CoreDebug {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: CoreFormatOptions) -> Self {
        Self { options }
    }

    /// Format every core of `registry`, sorted by key.
    pub fn format_registry(&self, registry: &CoreRegistry) -> String {
        let keys = registry.core_keys();
        let mut output = String::new();
        writeln!(output, "Core Registry ({} cores):", keys.len()).expect("write to String");
        if keys.is_empty() {
            output.push_str("  (empty)\n");
        }
        for key in keys {
            if let Some(facade) = registry.facades().get(&key) {
                output.push_str(&self.format_core(&facade));
            }
        }
        output
    }

    /// Format the proxies, mediators, subscriptions and commands of one core.
    pub fn format_core(&self, facade: &Facade) -> String {
        let model = facade.model();
        let view = facade.view();
        let controller = facade.controller();

        let proxies: Vec<(String, Vec<String>)> = model
            .proxy_names()
            .into_iter()
            .map(|name| (name, Vec::new()))
            .collect();

        let mediators: Vec<(String, Vec<String>)> = view
            .mediator_names()
            .into_iter()
            .map(|name| {
                let interests = match (self.options.show_interests, view.retrieve_mediator(&name)) {
                    (true, Some(mediator)) => mediator.list_notification_interests(),
                    _ => Vec::new(),
                };
                (name, interests)
            })
            .collect();

        let observers: Vec<(String, Vec<String>)> = if self.options.show_observers {
            view.notification_names()
                .into_iter()
                .map(|name| {
                    let label = format!("{name} ({} observers)", view.observer_count(&name));
                    (label, Vec::new())
                })
                .collect()
        } else {
            Vec::new()
        };

        let commands: Vec<(String, Vec<String>)> = controller
            .command_names()
            .into_iter()
            .map(|name| (name, Vec::new()))
            .collect();

        let mut sections = vec![("Proxies", proxies), ("Mediators", mediators)];
        if self.options.show_observers {
            sections.push(("Subscriptions", observers));
        }
        sections.push(("Commands", commands));
        if !self.options.show_empty {
            sections.retain(|(_, entries)| !entries.is_empty());
        }

        let mut output = String::new();
        writeln!(output, "Core '{}'", facade.key()).expect("write to String");
        let section_count = sections.len();
        for (i, (title, entries)) in sections.into_iter().enumerate() {
            self.format_section(title, &entries, i + 1 == section_count, &mut output);
        }
        output
    }

    fn format_section(
        &self,
        title: &str,
        entries: &[(String, Vec<String>)],
        is_last: bool,
        output: &mut String,
    ) {
        if self.options.style == TreeStyle::Compact {
            let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
            writeln!(output, "- {title}: [{}]", names.join(", ")).expect("write to String");
            return;
        }

        writeln!(output, "{}{title} ({})", self.connector(is_last), entries.len())
            .expect("write to String");
        let indent = self.continuation(is_last);
        for (i, (name, children)) in entries.iter().enumerate() {
            let entry_last = i + 1 == entries.len();
            writeln!(output, "{indent}{}{name}", self.connector(entry_last)).expect("write to String");
            let child_indent = format!("{indent}{}", self.continuation(entry_last));
            for (j, child) in children.iter().enumerate() {
                let connector = self.connector(j + 1 == children.len());
                writeln!(output, "{child_indent}{connector}{child}").expect("write to String");
            }
        }
    }

    fn connector(&self, is_last: bool) -> &'static str {
        match (self.options.style, is_last) {
            (TreeStyle::Ascii, false) => "+-- ",
            (TreeStyle::Ascii, true) => "`-- ",
            (TreeStyle::Unicode, false) => "\u{251c}\u{2500}\u{2500} ",
            (TreeStyle::Unicode, true) => "\u{2514}\u{2500}\u{2500} ",
            (TreeStyle::Compact, _) => "- ",
        }
    }

    fn continuation(&self, is_last: bool) -> &'static str {
        match (self.options.style, is_last) {
            (_, true) | (TreeStyle::Compact, _) => "    ",
            (TreeStyle::Ascii, false) => "|   ",
            (TreeStyle::Unicode, false) => "\u{2502}   ",
        }
    }
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, span_names::PERF, operation);
        Self {
            _span: span.entered(),
        }
    }
}

/// Trace-level event on the core target.
#[macro_export]
macro_rules! mvc_trace {
    ($($arg:tt)*) => {
        $crate::__private::tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Debug-level event on the core target.
#[macro_export]
macro_rules! mvc_debug {
    ($($arg:tt)*) => {
        $crate::__private::tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Warn-level event on the core target.
#[macro_export]
macro_rules! mvc_warn {
    ($($arg:tt)*) => {
        $crate::__private::tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
