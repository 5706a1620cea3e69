//! Type specifiers
//!
//! Dispatch entries select values by type specifier, itself written as an
//! s-expression: `symbol`, `(cons (eql defun))`, `(or integer float)`,
//! `(not atom)` and so on. Specifiers are parsed against a type
//! environment of user-defined names; a specifier that references an
//! unknown name cannot be compiled yet, which the dispatch table handles
//! with a deferred checker.

use crate::value::Value;
use std::collections::HashMap;

/// Failure modes of specifier parsing
#[derive(Debug, Clone, PartialEq)]
pub enum SpecError {
    /// Structurally unparseable; fatal
    Invalid,
    /// Well-formed but references a name the type environment does not
    /// know (yet)
    Unknown(String),
}

/// A compiled type specifier
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// `t`
    Top,
    /// `nil` / `null`
    Null,
    Atom,
    Symbol,
    Keyword,
    Integer,
    Float,
    Number,
    Str,
    Character,
    Cons,
    List,
    Vector,
    Eql(Value),
    Member(Vec<Value>),
    /// `(cons HEAD)`: a cons whose first element matches HEAD
    ConsHead(Box<TypeSpec>),
    And(Vec<TypeSpec>),
    Or(Vec<TypeSpec>),
    Not(Box<TypeSpec>),
}

impl TypeSpec {
    pub fn matches(&self, object: &Value) -> bool {
        match self {
            TypeSpec::Top => true,
            TypeSpec::Null => matches!(object, Value::Nil),
            TypeSpec::Atom => !object.is_cons(),
            TypeSpec::Symbol => matches!(object, Value::Symbol(_)),
            TypeSpec::Keyword => matches!(object, Value::Keyword(_)),
            TypeSpec::Integer => matches!(object, Value::Int(_)),
            TypeSpec::Float => matches!(object, Value::Float(_)),
            TypeSpec::Number => matches!(object, Value::Int(_) | Value::Float(_)),
            TypeSpec::Str => matches!(object, Value::Str(_)),
            TypeSpec::Character => matches!(object, Value::Char(_)),
            TypeSpec::Cons => object.is_cons(),
            TypeSpec::List => {
                matches!(object, Value::Nil | Value::List(_) | Value::DottedList(_, _))
            }
            TypeSpec::Vector => matches!(object, Value::Vector(_)),
            TypeSpec::Eql(v) => object == v,
            TypeSpec::Member(vs) => vs.iter().any(|v| object == v),
            TypeSpec::ConsHead(head) => {
                let items = match object {
                    Value::List(items) => items,
                    Value::DottedList(items, _) => items,
                    _ => return false,
                };
                items.first().is_some_and(|first| head.matches(first))
            }
            TypeSpec::And(parts) => parts.iter().all(|p| p.matches(object)),
            TypeSpec::Or(parts) => parts.iter().any(|p| p.matches(object)),
            TypeSpec::Not(inner) => !inner.matches(object),
        }
    }

    /// The head symbols this specifier keys on, when it has the
    /// cons-with-known-head shape (`(cons (eql S))`, `(cons (member S…))`
    /// or a union of those)
    pub fn cons_head_symbols(&self) -> Option<Vec<String>> {
        match self {
            TypeSpec::ConsHead(head) => match head.as_ref() {
                TypeSpec::Eql(Value::Symbol(s)) => Some(vec![s.clone()]),
                TypeSpec::Member(vs) => vs
                    .iter()
                    .map(|v| match v {
                        Value::Symbol(s) => Some(s.clone()),
                        _ => None,
                    })
                    .collect(),
                _ => None,
            },
            TypeSpec::Or(parts) => {
                let mut symbols = Vec::new();
                for part in parts {
                    symbols.extend(part.cons_head_symbols()?);
                }
                Some(symbols)
            }
            _ => None,
        }
    }
}

/// User-defined named type specifiers. The generation counter moves on
/// every definition so deferred checkers know when to retry.
#[derive(Debug, Default)]
pub struct TypeEnv {
    defs: HashMap<String, Value>,
    generation: u64,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Define (or redefine) a named specifier
    pub fn define(&mut self, name: &str, spec: Value) {
        self.defs.insert(name.to_string(), spec);
        self.generation += 1;
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.defs.get(name)
    }
}

const MAX_EXPANSION_DEPTH: usize = 32;

/// Parse a specifier expression against the environment
pub fn parse_type_spec(spec: &Value, env: &TypeEnv) -> Result<TypeSpec, SpecError> {
    parse_at_depth(spec, env, 0)
}

fn parse_at_depth(spec: &Value, env: &TypeEnv, depth: usize) -> Result<TypeSpec, SpecError> {
    if depth > MAX_EXPANSION_DEPTH {
        return Err(SpecError::Invalid);
    }
    match spec {
        Value::Symbol(name) => parse_name(name, env, depth),
        Value::List(items) => {
            let head = match items.first() {
                Some(Value::Symbol(s)) => s.as_str(),
                _ => return Err(SpecError::Invalid),
            };
            let args = &items[1..];
            match head {
                "eql" => match args {
                    [v] => Ok(TypeSpec::Eql(v.clone())),
                    _ => Err(SpecError::Invalid),
                },
                "member" => Ok(TypeSpec::Member(args.to_vec())),
                "cons" => match args {
                    [] => Ok(TypeSpec::Cons),
                    [car] => Ok(TypeSpec::ConsHead(Box::new(parse_at_depth(
                        car,
                        env,
                        depth + 1,
                    )?))),
                    // Only an unconstrained tail is supported
                    [car, Value::Symbol(t)] if t == "t" => Ok(TypeSpec::ConsHead(
                        Box::new(parse_at_depth(car, env, depth + 1)?),
                    )),
                    _ => Err(SpecError::Invalid),
                },
                "and" => Ok(TypeSpec::And(parse_all(args, env, depth)?)),
                "or" => Ok(TypeSpec::Or(parse_all(args, env, depth)?)),
                "not" => match args {
                    [inner] => Ok(TypeSpec::Not(Box::new(parse_at_depth(
                        inner,
                        env,
                        depth + 1,
                    )?))),
                    _ => Err(SpecError::Invalid),
                },
                _ => Err(SpecError::Invalid),
            }
        }
        _ => Err(SpecError::Invalid),
    }
}

fn parse_all(args: &[Value], env: &TypeEnv, depth: usize) -> Result<Vec<TypeSpec>, SpecError> {
    args.iter()
        .map(|a| parse_at_depth(a, env, depth + 1))
        .collect()
}

fn parse_name(name: &str, env: &TypeEnv, depth: usize) -> Result<TypeSpec, SpecError> {
    match name {
        "t" => Ok(TypeSpec::Top),
        "nil" | "null" => Ok(TypeSpec::Null),
        "atom" => Ok(TypeSpec::Atom),
        "symbol" => Ok(TypeSpec::Symbol),
        "keyword" => Ok(TypeSpec::Keyword),
        "integer" => Ok(TypeSpec::Integer),
        "float" => Ok(TypeSpec::Float),
        "number" => Ok(TypeSpec::Number),
        "string" => Ok(TypeSpec::Str),
        "character" => Ok(TypeSpec::Character),
        "cons" => Ok(TypeSpec::Cons),
        "list" => Ok(TypeSpec::List),
        "vector" => Ok(TypeSpec::Vector),
        _ => match env.lookup(name) {
            Some(def) => parse_at_depth(def, env, depth + 1),
            None => Err(SpecError::Unknown(name.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_one;

    fn parse(src: &str) -> Result<TypeSpec, SpecError> {
        parse_type_spec(&read_one(src).unwrap(), &TypeEnv::new())
    }

    #[test]
    fn parses_atoms_and_compounds() {
        assert_eq!(parse("integer"), Ok(TypeSpec::Integer));
        assert!(matches!(parse("(cons symbol)"), Ok(TypeSpec::ConsHead(_))));
        assert!(matches!(parse("(or integer float)"), Ok(TypeSpec::Or(_))));
    }

    #[test]
    fn unknown_name_is_distinguished_from_invalid() {
        assert_eq!(
            parse("frobnicate"),
            Err(SpecError::Unknown("frobnicate".to_string()))
        );
        assert_eq!(parse("(eql)"), Err(SpecError::Invalid));
        assert_eq!(parse("42"), Err(SpecError::Invalid));
    }

    #[test]
    fn named_types_expand_through_the_environment() {
        let mut env = TypeEnv::new();
        env.define("scalar", read_one("(or integer float string)").unwrap());
        let spec = parse_type_spec(&read_one("scalar").unwrap(), &env).unwrap();
        assert!(spec.matches(&Value::Int(3)));
        assert!(!spec.matches(&Value::symbol("x")));
    }

    #[test]
    fn cons_head_symbols_of_unions() {
        let spec = parse("(or (cons (eql let)) (cons (member if when)))").unwrap();
        let mut heads = spec.cons_head_symbols().unwrap();
        heads.sort();
        assert_eq!(heads, vec!["if", "let", "when"]);
    }

    #[test]
    fn cons_head_matching() {
        let spec = parse("(cons (eql foo))").unwrap();
        assert!(spec.matches(&Value::list(vec![Value::symbol("foo"), Value::Int(1)])));
        assert!(!spec.matches(&Value::list(vec![Value::symbol("bar")])));
        assert!(!spec.matches(&Value::Int(1)));
    }
}
