//! The compiled format tree (spec.md §2, §4.2–§4.5).
//!
//! A format string is compiled once into a `FormatTree` and can then be
//! walked against many different argument lists. Grounded on
//! `original_source/tsio.cpp`'s `Format::copyToFormat`/`skipToFormat`,
//! reshaped from "interpret while scanning" into an upfront tree so the
//! same compiled result is reusable (spec.md §2's requirement).

use crate::error::FormatError;
use crate::spec::{parse_spec, Flags, FormatSpec, Scanner};

/// One node in a compiled format chain.
///
/// `prefix` is the literal run of bytes emitted verbatim immediately
/// before this node's directive. A node with `spec.specifier == 0` is a
/// trailing terminal: it carries only a prefix and ends the chain.
#[derive(Debug)]
pub struct FormatNode {
    pub prefix: Vec<u8>,
    pub spec: FormatSpec,
    /// Byte offset of the `%` that introduced this node, for runtime
    /// (argument-shape/arity/scope) error messages. Meaningless for a
    /// trailing terminal node, which has no `%`.
    pub offset: usize,
    /// The nested chain for a structural opener (`%{`, `%[`, `%<`).
    pub child: Option<Box<FormatNode>>,
    pub next: Option<Box<FormatNode>>,
}

impl FormatNode {
    pub fn is_terminal(&self) -> bool {
        self.spec.specifier == 0
    }
}

#[derive(Debug)]
pub struct FormatTree {
    pub root: FormatNode,
}

/// Compile `format` into a reusable tree.
pub fn compile(format: &str) -> Result<FormatTree, FormatError> {
    let bytes = format.as_bytes();
    let mut scanner = Scanner::new(bytes);
    let root = compile_chain(&mut scanner, format, None)?;

    if !scanner.at_end() {
        return Err(FormatError::parse(
            format,
            scanner.pos(),
            "trailing content after a complete directive chain",
        ));
    }

    Ok(FormatTree { root })
}

fn matching_close(open: u8) -> u8 {
    match open {
        b'{' => b'}',
        b'[' => b']',
        b'<' => b'>',
        _ => unreachable!("caller already checked is_structural_open"),
    }
}

fn compile_chain(
    scanner: &mut Scanner<'_>,
    source: &str,
    expected_close: Option<u8>,
) -> Result<FormatNode, FormatError> {
    let prefix = scan_prefix(scanner);

    if scanner.peek().is_none() {
        if expected_close.is_some() {
            return Err(FormatError::parse(
                source,
                scanner.pos(),
                "format string ends with an unclosed structural group",
            ));
        }

        return Ok(FormatNode {
            prefix,
            spec: FormatSpec::default(),
            offset: scanner.pos(),
            child: None,
            next: None,
        });
    }

    let percent_pos = scanner.pos();
    scanner.bump(); // the '%'
    let spec = parse_spec(scanner, source)?;

    if FormatSpec::is_structural_close(spec.specifier) {
        return match expected_close {
            Some(c) if c == spec.specifier => Ok(FormatNode {
                prefix,
                spec,
                offset: percent_pos,
                child: None,
                next: None,
            }),
            _ => Err(FormatError::parse(
                source,
                percent_pos,
                format!(
                    "'%{}' does not close any open structural group",
                    spec.specifier as char
                ),
            )),
        };
    }

    let mut spec = spec;
    let child = if FormatSpec::is_structural_open(spec.specifier) {
        let close = matching_close(spec.specifier);
        let child = compile_chain(scanner, source, Some(close))?;

        // Tuple destructuring (spec.md §4.5): if any direct body node
        // used a `$`-index, the whole tuple switches to positional-child
        // mode, where every child's own index picks its field.
        if spec.specifier == b'<' && any_child_has_position(&child) {
            spec.flags.insert(Flags::POSITIONAL_CHILDREN);
        }

        Some(Box::new(child))
    } else {
        None
    };

    let next = compile_chain(scanner, source, expected_close)?;

    Ok(FormatNode {
        prefix,
        spec,
        offset: percent_pos,
        child,
        next: Some(Box::new(next)),
    })
}

/// Walks the direct body chain (stopping at the closer) looking for a
/// `$`-indexed child.
fn any_child_has_position(head: &FormatNode) -> bool {
    let mut cur = head;
    loop {
        if FormatSpec::is_structural_close(cur.spec.specifier) {
            return false;
        }
        if cur.spec.position != 0 {
            return true;
        }
        match &cur.next {
            Some(next) => cur = next,
            None => return false,
        }
    }
}

fn scan_prefix(scanner: &mut Scanner<'_>) -> Vec<u8> {
    let start = scanner.pos();

    while let Some(b) = scanner.peek() {
        if b == b'%' {
            break;
        }
        scanner.bump();
    }

    scanner.slice(start, scanner.pos()).to_vec()
}
