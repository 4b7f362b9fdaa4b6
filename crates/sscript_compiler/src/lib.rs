//! sscript_compiler: the multi-file front-end driver.
//!
//! The host feeds compilation units through [`Compiler::parse_file`]; each
//! unit's top-level import and export-from statements enqueue newly
//! discovered module paths onto a work-list the host drains with
//! [`Compiler::next_file`]. [`Compiler::finish`] hands back the completed
//! [`Program`].
//!
//! No I/O happens here: resolving a dequeued path to source text is the
//! host's job.

use std::collections::VecDeque;

use bumpalo::Bump;
use rustc_hash::{FxHashMap, FxHashSet};
use sscript_ast::node::{Source, Statement};
use sscript_ast::types::SourceId;
use sscript_core::intern::Interner;
use sscript_diagnostics::DiagnosticCollection;
use sscript_parser::Parser;

/// The completed front-end output: every parsed source plus the shared
/// diagnostic store.
pub struct Program<'a> {
    sources: Vec<Source<'a>>,
    pub diagnostics: DiagnosticCollection,
    pub interner: Interner,
}

impl<'a> Program<'a> {
    /// All sources, in parse order.
    pub fn sources(&self) -> &[Source<'a>] {
        &self.sources
    }

    /// Look up a source by its normalized path.
    pub fn get_source(&self, normalized_path: &str) -> Option<&Source<'a>> {
        self.sources
            .iter()
            .find(|s| s.normalized_path == normalized_path)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// The front-end driver. One instance per compilation job; not thread
/// safe.
pub struct Compiler<'a> {
    arena: &'a Bump,
    interner: Interner,
    /// Parsed sources, in parse order.
    sources: Vec<Source<'a>>,
    /// normalized path -> source id, for duplicate detection.
    source_index: FxHashMap<String, SourceId>,
    diagnostics: DiagnosticCollection,
    /// Pending module paths discovered but not yet parsed.
    backlog: VecDeque<String>,
    /// Every normalized path ever parsed or enqueued.
    seenlog: FxHashSet<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            interner: Interner::new(),
            sources: Vec::new(),
            source_index: FxHashMap::default(),
            diagnostics: DiagnosticCollection::new(),
            backlog: VecDeque::new(),
            seenlog: FxHashSet::default(),
        }
    }

    /// Parse one compilation unit into the program.
    ///
    /// Panics if the normalized form of `path` collides with an already
    /// parsed source; callers must pre-deduplicate or accept the failure.
    pub fn parse_file(&mut self, text: &str, path: &str, is_entry: bool) {
        let normalized_path = sscript_path::normalize_path(path);
        assert!(
            !self.source_index.contains_key(&normalized_path),
            "duplicate source: {}",
            normalized_path
        );
        self.seenlog.insert(normalized_path.clone());

        let parser = Parser::new(self.arena, self.interner.clone(), &normalized_path, text);
        let (statements, diagnostics) = parser.parse_statements();
        self.diagnostics.extend(diagnostics);

        let id = SourceId(self.sources.len() as u32);
        let mut source = Source::new(
            path.to_string(),
            normalized_path.clone(),
            text.to_string(),
            is_entry,
            id,
        );
        for statement in statements {
            match &statement {
                Statement::Import(import) => {
                    self.enqueue(import.internal_path.clone());
                }
                Statement::Export(export) => {
                    if let Some(dependency) = &export.internal_path {
                        self.enqueue(dependency.clone());
                    }
                }
                _ => {}
            }
            source.push_statement(statement);
        }
        self.source_index.insert(normalized_path, id);
        self.sources.push(source);
    }

    /// Enqueue a discovered dependency unless it was already seen.
    fn enqueue(&mut self, normalized_path: String) {
        if self.seenlog.insert(normalized_path.clone()) {
            self.backlog.push_back(normalized_path);
        }
    }

    /// Dequeue the next discovered dependency path, or `None` when the
    /// backlog is drained. A path is never returned twice.
    pub fn next_file(&mut self) -> Option<String> {
        self.backlog.pop_front()
    }

    /// Finish the job and return the accumulated program.
    ///
    /// Panics if the backlog has not been drained; call `next_file` until
    /// it returns `None` first.
    pub fn finish(self) -> Program<'a> {
        assert!(self.backlog.is_empty(), "backlog is not empty");
        Program {
            sources: self.sources,
            diagnostics: self.diagnostics,
            interner: self.interner,
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }
}
