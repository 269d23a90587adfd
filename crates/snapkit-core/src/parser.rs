//! Parser for the scene text format → `SceneGraph`.
//!
//! Built on `winnow` 0.7. The format exists so that scenes can be described
//! without a rendering host (test fixtures, the browser bridge):
//!
//! ```text
//! viewport @desktop {
//!   x: 0 y: 0 w: 1440 h: 900
//!   frame @hero { x: 40 y: 40 w: 300 h: 200 }
//!   text @title { x: 40 y: 300 w: 200 h: 40 locked }
//! }
//! ```

use crate::id::NodeId;
use crate::model::*;
use petgraph::graph::NodeIndex;
use winnow::combinator::{alt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a scene document into a `SceneGraph`.
#[must_use = "parsing result should be used"]
pub fn parse_scene(input: &str) -> Result<SceneGraph, String> {
    let mut graph = SceneGraph::new();
    let mut rest = input;

    skip_ws_and_comments(&mut rest);

    while !rest.is_empty() {
        if !starts_with_node_keyword(rest) {
            let line = rest.lines().next().unwrap_or_default();
            return Err(format!("Unexpected input: `{}`", line.trim()));
        }
        let parsed = parse_node
            .parse_next(&mut rest)
            .map_err(|e| format!("Node parse error: {e}"))?;
        let root = graph.root;
        insert_node_recursive(&mut graph, root, parsed)?;
        skip_ws_and_comments(&mut rest);
    }

    log::debug!("parsed scene with {} nodes", graph.id_index.len() - 1);
    Ok(graph)
}

#[derive(Debug)]
struct ParsedNode {
    id: NodeId,
    kind: NodeKind,
    frame: Option<Frame>,
    locked: bool,
    children: Vec<ParsedNode>,
}

fn insert_node_recursive(
    graph: &mut SceneGraph,
    parent: NodeIndex,
    parsed: ParsedNode,
) -> Result<(), String> {
    if graph.index_of(parsed.id).is_some() {
        return Err(format!("Duplicate node id {}", parsed.id));
    }
    let mut node = SceneNode::new(parsed.id, parsed.kind);
    node.frame = parsed.frame;
    node.locked = parsed.locked;
    let idx = graph.add_node(parent, node);

    for child in parsed.children {
        insert_node_recursive(graph, idx, child)?;
    }
    Ok(())
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with('#') {
            match input.find('\n') {
                Some(pos) => *input = &input[pos + 1..],
                None => *input = "",
            }
            continue;
        }
        if *input == before {
            break;
        }
    }
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '-').parse_next(input)
}

fn parse_node_id(input: &mut &str) -> ModalResult<NodeId> {
    preceded('@', parse_identifier)
        .map(NodeId::intern)
        .parse_next(input)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f32>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

const NODE_KEYWORDS: [&str; 5] = ["viewport", "frame", "group", "text", "image"];

/// A node keyword followed by whitespace, `@` or `{` (so a property that
/// happens to start with a keyword is not mistaken for a child).
fn starts_with_node_keyword(input: &str) -> bool {
    NODE_KEYWORDS.iter().any(|kw| {
        input.starts_with(kw)
            && input[kw.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || c == '@' || c == '{')
    })
}

// ─── Node parser ─────────────────────────────────────────────────────────

fn parse_node(input: &mut &str) -> ModalResult<ParsedNode> {
    let kind = alt((
        "viewport".value(NodeKind::Viewport),
        "frame".value(NodeKind::Frame),
        "group".value(NodeKind::Group),
        "text".value(NodeKind::Text),
        "image".value(NodeKind::Image),
    ))
    .parse_next(input)?;

    skip_ws_and_comments(input);

    let id = if input.starts_with('@') {
        parse_node_id.parse_next(input)?
    } else {
        NodeId::with_prefix(kind.keyword())
    };

    skip_ws_and_comments(input);
    let _ = '{'.parse_next(input)?;

    let mut x: Option<f32> = None;
    let mut y: Option<f32> = None;
    let mut width: Option<f32> = None;
    let mut height: Option<f32> = None;
    let mut locked = false;
    let mut children = Vec::new();

    skip_ws_and_comments(input);

    while !input.starts_with('}') {
        if input.is_empty() {
            return Err(ErrMode::Cut(ContextError::new()));
        }
        if starts_with_node_keyword(input) {
            children.push(parse_node.parse_next(input)?);
        } else {
            let name = parse_identifier.parse_next(input)?;
            if name == "locked" {
                locked = true;
            } else {
                skip_ws_and_comments(input);
                let _ = ':'.parse_next(input)?;
                skip_ws_and_comments(input);
                let value = parse_number.parse_next(input)?;
                match name {
                    "x" => x = Some(value),
                    "y" => y = Some(value),
                    "w" => width = Some(value),
                    "h" => height = Some(value),
                    _ => return Err(ErrMode::Backtrack(ContextError::new())),
                }
            }
            if input.starts_with(';') {
                *input = &input[1..];
            }
        }
        skip_ws_and_comments(input);
    }

    let _ = '}'.parse_next(input)?;

    let frame = match (width, height) {
        (Some(w), Some(h)) => Some(Frame::new(x.unwrap_or(0.0), y.unwrap_or(0.0), w, h)),
        _ => None,
    };

    Ok(ParsedNode {
        id,
        kind,
        frame,
        locked,
        children,
    })
}
