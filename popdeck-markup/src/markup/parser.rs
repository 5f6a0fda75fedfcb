//! Block parser
//!
//! A single-pass, line-oriented state machine. Lines are preprocessed
//! (comments stripped with quote-aware scanning, tabs expanded, trailing
//! whitespace trimmed), then fed through a stack of frames, one per open
//! container. Dedent comparison is non-strict: a line at exactly a frame's
//! declared indent closes that frame, which is what lets sibling keys and
//! items continue a parent instead of nesting further.

use super::error::SyntaxError;
use super::flow::{find_separator, find_unquoted};
use super::scalars::{decode_key, parse_scalar};
use super::value::{Mapping, Value};

/// Parse a full document into its root mapping.
pub fn parse(source: &str) -> Result<Value, SyntaxError> {
    let mut stack = vec![Frame::root()];
    for line in preprocess(source) {
        close_frames(&mut stack, line.indent);
        resolve_pending(&mut stack, &line);
        dispatch(&mut stack, &line)?;
    }
    while stack.len() > 1 {
        close_top(&mut stack);
    }
    let mut root = match stack.pop() {
        Some(frame) => frame,
        None => Frame::root(),
    };
    if let Some(pending) = root.pending.take() {
        if let Value::Mapping(map) = &mut root.container {
            map.insert(pending.key, Value::Mapping(Mapping::new()));
        }
    }
    Ok(root.container)
}

/// One significant input line after preprocessing.
struct Line {
    /// 1-based position in the original source, for error reporting.
    number: usize,
    indent: isize,
    content: String,
}

/// How a frame's container joins its parent when the frame closes.
enum Attachment {
    Root,
    Key(String),
    Element,
}

/// A key seen with no inline value, awaiting a nested block.
struct PendingKey {
    key: String,
    indent: isize,
}

/// One open container. The parent is implicit in stack position; each frame
/// exclusively owns the value it is building.
struct Frame {
    container: Value,
    indent: isize,
    pending: Option<PendingKey>,
    attach: Attachment,
}

impl Frame {
    fn root() -> Self {
        Frame {
            container: Value::Mapping(Mapping::new()),
            indent: -1,
            pending: None,
            attach: Attachment::Root,
        }
    }

    fn mapping(indent: isize, attach: Attachment) -> Self {
        Frame {
            container: Value::Mapping(Mapping::new()),
            indent,
            pending: None,
            attach,
        }
    }

    fn sequence(indent: isize, attach: Attachment) -> Self {
        Frame {
            container: Value::Sequence(Vec::new()),
            indent,
            pending: None,
            attach,
        }
    }
}

/// Strip comments and trailing whitespace, expand tabs, skip blanks, and
/// measure indentation. Line numbers stay tied to the original source.
fn preprocess(source: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let expanded = raw.replace('\t', "  ");
        let stripped = match find_unquoted(&expanded, '#') {
            Some(pos) => &expanded[..pos],
            None => expanded.as_str(),
        };
        let stripped = stripped.trim_end();
        let content = stripped.trim_start();
        if content.is_empty() {
            continue;
        }
        let indent = stripped.chars().take_while(|c| c.is_whitespace()).count();
        lines.push(Line {
            number: index + 1,
            indent: indent as isize,
            content: content.to_string(),
        });
    }
    lines
}

/// Close every frame the current line is not nested inside (non-strict).
fn close_frames(stack: &mut Vec<Frame>, indent: isize) {
    while stack.len() > 1 {
        let should_close = stack
            .last()
            .map_or(false, |frame| frame.indent >= indent);
        if !should_close {
            break;
        }
        close_top(stack);
    }
}

/// Pop the top frame, resolving its dangling pending key to an empty
/// mapping, and attach its container into the parent.
fn close_top(stack: &mut Vec<Frame>) {
    let mut frame = match stack.pop() {
        Some(frame) if !stack.is_empty() => frame,
        Some(frame) => {
            stack.push(frame);
            return;
        }
        None => return,
    };
    if let Some(pending) = frame.pending.take() {
        if let Value::Mapping(map) = &mut frame.container {
            map.insert(pending.key, Value::Mapping(Mapping::new()));
        }
    }
    // the frame kinds match their attachments by construction
    if let Some(parent) = stack.last_mut() {
        match frame.attach {
            Attachment::Root => {}
            Attachment::Key(key) => {
                if let Value::Mapping(map) = &mut parent.container {
                    map.insert(key, frame.container);
                }
            }
            Attachment::Element => {
                if let Value::Sequence(items) = &mut parent.container {
                    items.push(frame.container);
                }
            }
        }
    }
}

/// Resolve a pending key against the current line: a deeper line opens the
/// nested container it announces, anything else pins the key to an empty
/// mapping.
fn resolve_pending(stack: &mut Vec<Frame>, line: &Line) {
    let Some(top) = stack.last_mut() else {
        return;
    };
    let Some(pending) = top.pending.take() else {
        return;
    };
    if line.indent > pending.indent {
        let attach = Attachment::Key(pending.key);
        let frame = if line.content.starts_with('-') {
            Frame::sequence(pending.indent, attach)
        } else {
            Frame::mapping(pending.indent, attach)
        };
        stack.push(frame);
    } else if let Value::Mapping(map) = &mut top.container {
        map.insert(pending.key, Value::Mapping(Mapping::new()));
    }
}

fn dispatch(stack: &mut Vec<Frame>, line: &Line) -> Result<(), SyntaxError> {
    if line.content.starts_with('-') {
        sequence_item(stack, line)
    } else {
        mapping_entry(stack, line)
    }
}

fn sequence_item(stack: &mut Vec<Frame>, line: &Line) -> Result<(), SyntaxError> {
    let top_is_sequence = matches!(
        stack.last().map(|frame| &frame.container),
        Some(Value::Sequence(_))
    );
    if !top_is_sequence {
        return Err(SyntaxError::ListItemOutsideSequence { line: line.number });
    }

    let rest = line.content[1..].trim();
    if rest.is_empty() {
        // a lone dash: open an empty mapping element for the indented
        // block that follows
        stack.push(Frame::mapping(line.indent, Attachment::Element));
        return Ok(());
    }

    match find_separator(rest) {
        Some(split_at) => {
            let raw_key = rest[..split_at].trim();
            if raw_key.is_empty() {
                return Err(SyntaxError::MissingKey { line: line.number });
            }
            let key = decode_key(raw_key);
            let value_part = rest[split_at + 1..].trim();
            let mut frame = Frame::mapping(line.indent, Attachment::Element);
            if value_part.is_empty() {
                frame.pending = Some(PendingKey {
                    key,
                    indent: line.indent,
                });
            } else if let Value::Mapping(map) = &mut frame.container {
                map.insert(key, parse_scalar(value_part)?);
            }
            // the element frame stays open so sibling keys at greater
            // indent attach to the same element
            stack.push(frame);
        }
        None => {
            let value = parse_scalar(rest)?;
            if let Some(frame) = stack.last_mut() {
                if let Value::Sequence(items) = &mut frame.container {
                    items.push(value);
                }
            }
        }
    }
    Ok(())
}

fn mapping_entry(stack: &mut Vec<Frame>, line: &Line) -> Result<(), SyntaxError> {
    let Some(split_at) = find_separator(&line.content) else {
        return Err(SyntaxError::MalformedLine { line: line.number });
    };
    let raw_key = line.content[..split_at].trim();
    if raw_key.is_empty() {
        return Err(SyntaxError::MissingKey { line: line.number });
    }
    let key = decode_key(raw_key);
    let value_part = line.content[split_at + 1..].trim();

    let Some(top) = stack.last_mut() else {
        return Ok(());
    };
    let Value::Mapping(map) = &mut top.container else {
        return Err(SyntaxError::KeyInsideSequence { line: line.number });
    };
    if value_part.is_empty() {
        top.pending = Some(PendingKey {
            key,
            indent: line.indent,
        });
    } else {
        map.insert(key, parse_scalar(value_part)?);
    }
    Ok(())
}
