//! Pretty-print dispatch tables
//!
//! A dispatch table maps a value to the printer that should render it.
//! Entries are scanned in rank order (user entries outrank built-ins,
//! then higher priority wins); a value that is a cons with a known head
//! symbol takes a fast path through a per-symbol map, which wins unless
//! some strictly higher-ranked general entry also accepts the value.

pub mod typespec;

use crate::error::{Error, Result};
use crate::printers;
use crate::reader::read_one;
use crate::stream::PrettyStream;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;
use typespec::{parse_type_spec, SpecError, TypeEnv, TypeSpec};

/// A printer taken from a dispatch table
pub type PrinterFn = Rc<dyn Fn(&mut PrettyStream<'_>, &Value) -> Result<()>>;

/// Type test of an entry. A deferred test covers a specifier that
/// referenced an unknown name at installation time: it matches nothing
/// until the type environment has moved and the specifier parses.
#[derive(Clone)]
enum Test {
    Compiled(TypeSpec),
    Deferred(RefCell<DeferredTest>),
}

#[derive(Clone)]
struct DeferredTest {
    source: Value,
    tried_generation: u64,
    compiled: Option<TypeSpec>,
}

/// One dispatch table entry
#[derive(Clone)]
pub struct DispatchEntry {
    spec_source: Value,
    test: Test,
    priority: i32,
    initial: bool,
    printer: PrinterFn,
}

impl DispatchEntry {
    /// Rank key: user entries sort above all initial entries, then higher
    /// priority wins
    fn rank(&self) -> (bool, i32) {
        (!self.initial, self.priority)
    }

    fn accepts(&self, object: &Value, env: &TypeEnv) -> bool {
        match &self.test {
            Test::Compiled(spec) => spec.matches(object),
            Test::Deferred(state) => {
                let mut state = state.borrow_mut();
                if state.compiled.is_none() && state.tried_generation != env.generation() {
                    state.tried_generation = env.generation();
                    if let Ok(spec) = parse_type_spec(&state.source, env) {
                        state.compiled = Some(spec);
                    }
                }
                match &state.compiled {
                    Some(spec) => spec.matches(object),
                    None => false,
                }
            }
        }
    }
}

/// A pretty-print dispatch table
#[derive(Clone)]
pub struct DispatchTable {
    /// General entries, kept sorted by rank, best first
    entries: Vec<DispatchEntry>,
    /// Fast path for conses with a known head symbol
    cons_entries: HashMap<String, DispatchEntry>,
    env: Rc<RefCell<TypeEnv>>,
    frozen: bool,
}

impl DispatchTable {
    /// An empty, mutable table
    pub fn empty() -> Self {
        DispatchTable {
            entries: Vec::new(),
            cons_entries: HashMap::new(),
            env: Rc::new(RefCell::new(TypeEnv::new())),
            frozen: false,
        }
    }

    /// The initial table: the built-in printers for lists, vectors and
    /// reader sugar
    pub fn initial() -> Self {
        let mut table = Self::empty();
        table
            .install("(cons symbol)", Some(Rc::new(printers::print_call)), 0, true)
            .expect("built-in specs parse");
        table
            .install("cons", Some(Rc::new(printers::print_list)), -5, true)
            .expect("built-in specs parse");
        table
            .install("vector", Some(Rc::new(printers::print_vector)), 0, true)
            .expect("built-in specs parse");
        table
            .install(
                "(cons (eql quote))",
                Some(Rc::new(printers::print_quote)),
                0,
                true,
            )
            .expect("built-in specs parse");
        table
            .install(
                "(cons (eql quasiquote))",
                Some(Rc::new(printers::print_quasiquote)),
                0,
                true,
            )
            .expect("built-in specs parse");
        table
            .install(
                "(cons (eql unquote))",
                Some(Rc::new(printers::print_unquote)),
                0,
                true,
            )
            .expect("built-in specs parse");
        table
            .install(
                "(cons (eql unquote-splicing))",
                Some(Rc::new(printers::print_unquote_splicing)),
                0,
                true,
            )
            .expect("built-in specs parse");
        table
    }

    /// The standard table: the initial printers, frozen. Mutation attempts
    /// return `StandardTableFrozen`; copy it instead.
    pub fn standard() -> Self {
        let mut table = Self::initial();
        table.frozen = true;
        table
    }

    /// Deep copy suitable for mutation, never frozen
    pub fn copy(&self) -> Self {
        let mut copy = self.clone();
        copy.frozen = false;
        copy
    }

    /// Define a named type specifier in this table's environment. Deferred
    /// entries waiting on the name become live on their next use.
    pub fn define_type(&self, name: &str, spec_source: &str) -> Result<()> {
        let spec = read_one(spec_source)?;
        self.env.borrow_mut().define(name, spec);
        Ok(())
    }

    /// Look up the printer for `object`. `None` means no entry accepts it
    /// and the caller should fall back to the plain printer.
    pub fn lookup(&self, object: &Value) -> Option<PrinterFn> {
        let env = self.env.borrow();
        let cons_entry = object
            .cons_head()
            .and_then(|head| self.cons_entries.get(head));
        for entry in &self.entries {
            if let Some(cons_entry) = cons_entry {
                if entry.rank() <= cons_entry.rank() {
                    return Some(cons_entry.printer.clone());
                }
            }
            if entry.accepts(object, &env) {
                return Some(entry.printer.clone());
            }
        }
        cons_entry.map(|entry| entry.printer.clone())
    }

    /// Install `printer` for the values matching `spec` (or remove the
    /// entry for `spec` when `printer` is `None`).
    ///
    /// A structurally invalid specifier fails with `InvalidTypeSpec`. A
    /// specifier referencing an unknown named type is installed deferred,
    /// with a warning; it matches nothing until the name is defined.
    pub fn set(&mut self, spec: &str, printer: Option<PrinterFn>, priority: i32) -> Result<()> {
        self.install(spec, printer, priority, false)
    }

    fn install(
        &mut self,
        spec: &str,
        printer: Option<PrinterFn>,
        priority: i32,
        initial: bool,
    ) -> Result<()> {
        if self.frozen {
            return Err(Error::StandardTableFrozen);
        }
        let source = read_one(spec).map_err(|_| Error::InvalidTypeSpec {
            spec: spec.to_string(),
        })?;
        let parsed = parse_type_spec(&source, &self.env.borrow());
        match parsed {
            Ok(compiled) => {
                if let Some(heads) = compiled.cons_head_symbols() {
                    for head in heads {
                        self.cons_entries.remove(&head);
                        if let Some(printer) = &printer {
                            let test = TypeSpec::ConsHead(Box::new(TypeSpec::Eql(
                                Value::symbol(&head),
                            )));
                            self.cons_entries.insert(
                                head,
                                DispatchEntry {
                                    spec_source: source.clone(),
                                    test: Test::Compiled(test),
                                    priority,
                                    initial,
                                    printer: printer.clone(),
                                },
                            );
                        }
                    }
                    Ok(())
                } else {
                    self.replace_entry(source, Test::Compiled(compiled), printer, priority, initial);
                    Ok(())
                }
            }
            Err(SpecError::Unknown(name)) => {
                warn!(
                    spec = %spec,
                    name = %name,
                    "type specifier references an unknown type; deferring"
                );
                let generation = self.env.borrow().generation();
                let test = Test::Deferred(RefCell::new(DeferredTest {
                    source: source.clone(),
                    tried_generation: generation,
                    compiled: None,
                }));
                self.replace_entry(source, test, printer, priority, initial);
                Ok(())
            }
            Err(SpecError::Invalid) => Err(Error::InvalidTypeSpec {
                spec: spec.to_string(),
            }),
        }
    }

    /// Remove any entry with the same specifier, then insert behind all
    /// entries of equal or higher rank
    fn replace_entry(
        &mut self,
        source: Value,
        test: Test,
        printer: Option<PrinterFn>,
        priority: i32,
        initial: bool,
    ) {
        self.entries.retain(|e| e.spec_source != source);
        let Some(printer) = printer else { return };
        let entry = DispatchEntry {
            spec_source: source,
            test,
            priority,
            initial,
            printer,
        };
        let position = self
            .entries
            .iter()
            .position(|e| entry.rank() > e.rank())
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::initial()
    }
}

/// Look up the printer for `object`. Always returns a callable printer;
/// the flag reports whether a specialized entry matched (when false, the
/// returned printer is the plain fallback).
pub fn pprint_dispatch(object: &Value, table: &DispatchTable) -> (PrinterFn, bool) {
    match table.lookup(object) {
        Some(printer) => (printer, true),
        None => (Rc::new(printers::output_ugly), false),
    }
}

/// Install `printer` for `spec` in `table`; `None` removes the entry
pub fn set_pprint_dispatch(
    spec: &str,
    printer: Option<PrinterFn>,
    priority: i32,
    table: &mut DispatchTable,
) -> Result<()> {
    table.set(spec, printer, priority)
}

/// Deep copy of `table`, suitable for mutation
pub fn copy_pprint_dispatch(table: &DispatchTable) -> DispatchTable {
    table.copy()
}
