//! Per-document emission state.
//!
//! A [`CodegenContext`] pairs the schema being rendered with an indented
//! line buffer and the set of helper functions already requested.

use pw_schema::ContractSchema;
use rustc_hash::FxHashSet;

const BANNER: &str =
    "// ---------------------------------------------------------------------------";

/// Emission state for one Solidity or JSON document.
pub struct CodegenContext<'a> {
    /// The contract being rendered.
    pub schema: &'a ContractSchema,
    /// Nesting depth, four spaces per level.
    indent: usize,
    output: String,
    /// Helper functions requested so far, emitted once at the end.
    generated_helpers: FxHashSet<String>,
}

impl<'a> CodegenContext<'a> {
    pub fn new(schema: &'a ContractSchema) -> Self {
        Self {
            schema,
            indent: 0,
            output: String::with_capacity(16 * 1024),
            generated_helpers: FxHashSet::default(),
        }
    }

    /// The contract identifier derived from the schema name.
    ///
    /// Solidity identifiers only contain alphanumerics, `_` and `$`, and
    /// cannot start with a digit.
    pub fn contract_name(&self) -> String {
        let mut result = String::with_capacity(self.schema.name.len() + 1);
        for c in self.schema.name.chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                result.push(c);
            }
        }
        if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
            result.insert(0, '_');
        }
        result
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "unbalanced close");
        self.indent = self.indent.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write one indented line.
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write a line and indent what follows, for `... {` openers.
    pub fn open(&mut self, s: &str) {
        self.writeln(s);
        self.indent();
    }

    /// Dedent and close a block.
    pub fn close(&mut self) {
        self.dedent();
        self.writeln("}");
    }

    /// Blank line.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Section banner comment.
    pub fn banner(&mut self, title: &str) {
        self.writeln(BANNER);
        self.writeln(&format!("// {title}"));
        self.writeln(BANNER);
        self.newline();
    }

    /// Hand back the buffer, leaving the context empty.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Whether `name` was requested by an emitter.
    pub fn has_helper(&self, name: &str) -> bool {
        self.generated_helpers.contains(name)
    }

    /// Request helper `name`; it is emitted once.
    pub fn mark_helper(&mut self, name: impl Into<String>) {
        self.generated_helpers.insert(name.into());
    }
}
