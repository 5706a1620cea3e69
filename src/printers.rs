//! Object printers
//!
//! `output_object` is the entry the engine hands values to: it consults
//! the stream's dispatch table and falls back to the plain writer. The
//! printers below are the initial table's data, plus the fill / linear /
//! tabular convenience emitters that custom printers build on.

use crate::config::PrinterConfig;
use crate::error::Result;
use crate::stream::{with_pretty_stream, IndentKind, NewlineKind, PrettyStream, TabKind};
use crate::value::Value;
use std::fmt;

/// Print `object` through the stream's dispatch table
pub fn output_object(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    let table = stream.dispatch();
    match table.lookup(object) {
        Some(printer) => printer(stream, object),
        None => output_ugly(stream, object),
    }
}

/// Plain, single-line fallback rendering
pub fn output_ugly(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    stream.write_str(&object.to_string())
}

/// Pretty-print one object to `target`, wrapping it in a pretty stream
pub fn output_pretty(
    target: &mut dyn fmt::Write,
    object: &Value,
    config: &PrinterConfig,
) -> Result<()> {
    with_pretty_stream(target, config, |stream| output_object(stream, object))
}

/// The items of a list-like value, with its dotted tail if any
fn list_parts(object: &Value) -> Option<(&[Value], Option<&Value>)> {
    match object {
        Value::List(items) => Some((items, None)),
        Value::DottedList(items, tail) => Some((items, Some(tail))),
        _ => None,
    }
}

fn print_tail(stream: &mut PrettyStream<'_>, tail: Option<&Value>) -> Result<()> {
    if let Some(tail) = tail {
        stream.write_str(" . ")?;
        output_object(stream, tail)?;
    }
    Ok(())
}

/// Fill-style emitter: items separated by a space and a fill break, so
/// as many fit per line as the margin allows
pub fn pprint_fill(stream: &mut PrettyStream<'_>, object: &Value, parens: bool) -> Result<()> {
    let Some((items, tail)) = list_parts(object) else {
        return output_ugly(stream, object);
    };
    let (prefix, suffix) = if parens { (Some("("), ")") } else { (None, "") };
    stream.start_logical_block(prefix, false, suffix)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            stream.write_char(' ')?;
            stream.newline(NewlineKind::Fill)?;
        }
        output_object(stream, item)?;
    }
    print_tail(stream, tail)?;
    stream.end_logical_block()
}

/// Linear emitter: either everything on one line or one item per line
pub fn pprint_linear(stream: &mut PrettyStream<'_>, object: &Value, parens: bool) -> Result<()> {
    let Some((items, tail)) = list_parts(object) else {
        return output_ugly(stream, object);
    };
    let (prefix, suffix) = if parens { (Some("("), ")") } else { (None, "") };
    stream.start_logical_block(prefix, false, suffix)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            stream.write_char(' ')?;
            stream.newline(NewlineKind::Linear)?;
        }
        output_object(stream, item)?;
    }
    print_tail(stream, tail)?;
    stream.end_logical_block()
}

/// Tabular emitter: items in columns every `colinc` characters from the
/// section start
pub fn pprint_tabular(
    stream: &mut PrettyStream<'_>,
    object: &Value,
    parens: bool,
    colinc: Option<usize>,
) -> Result<()> {
    let colinc = colinc.unwrap_or(16);
    let Some((items, tail)) = list_parts(object) else {
        return output_ugly(stream, object);
    };
    let (prefix, suffix) = if parens { (Some("("), ")") } else { (None, "") };
    stream.start_logical_block(prefix, false, suffix)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            stream.write_char(' ')?;
            stream.tab(TabKind::SectionRelative, 0, colinc);
            stream.newline(NewlineKind::Fill)?;
        }
        output_object(stream, item)?;
    }
    print_tail(stream, tail)?;
    stream.end_logical_block()
}

// ----- initial-table printers ---------------------------------------------

/// General list printer
pub fn print_list(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    pprint_fill(stream, object, true)
}

/// Call-form printer: `(head arg …)` with wrapped arguments aligned
/// under the first one
pub fn print_call(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    let Some((items, tail)) = list_parts(object) else {
        return output_ugly(stream, object);
    };
    let Some(head) = items.first() else {
        return output_ugly(stream, object);
    };
    stream.start_logical_block(Some("("), false, ")")?;
    output_object(stream, head)?;
    if items.len() > 1 {
        stream.write_char(' ')?;
        stream.indent(IndentKind::Current, 0);
        for (i, item) in items[1..].iter().enumerate() {
            if i > 0 {
                stream.write_char(' ')?;
                stream.newline(NewlineKind::Fill)?;
            }
            output_object(stream, item)?;
        }
    }
    print_tail(stream, tail)?;
    stream.end_logical_block()
}

/// Vector printer: `#(…)` filled like a list
pub fn print_vector(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    let Value::Vector(items) = object else {
        return output_ugly(stream, object);
    };
    stream.start_logical_block(Some("#("), false, ")")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            stream.write_char(' ')?;
            stream.newline(NewlineKind::Fill)?;
        }
        output_object(stream, item)?;
    }
    stream.end_logical_block()
}

/// The form a sugar printer abbreviates, when it has the two-element shape
fn sugar_argument(object: &Value) -> Option<&Value> {
    match object {
        Value::List(items) if items.len() == 2 => Some(&items[1]),
        _ => None,
    }
}

pub fn print_quote(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    match sugar_argument(object) {
        Some(form) => {
            stream.write_char('\'')?;
            output_object(stream, form)
        }
        None => print_list(stream, object),
    }
}

pub fn print_quasiquote(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    match sugar_argument(object) {
        Some(form) => {
            stream.write_char('`')?;
            output_object(stream, form)
        }
        None => print_list(stream, object),
    }
}

/// `,form` — arms the one-shot hook so a following `@` or `.` cannot
/// fuse into a splicing or dotted sigil
pub fn print_unquote(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    match sugar_argument(object) {
        Some(form) => {
            stream.write_char(',')?;
            stream.set_char_out_hook(|ch| ch == '@' || ch == '.');
            output_object(stream, form)
        }
        None => print_list(stream, object),
    }
}

pub fn print_unquote_splicing(stream: &mut PrettyStream<'_>, object: &Value) -> Result<()> {
    match sugar_argument(object) {
        Some(form) => {
            stream.write_str(",@")?;
            output_object(stream, form)
        }
        None => print_list(stream, object),
    }
}
