//! Tree diagram parser.
//!
//! The first non-blank line names the root directory. Every following line is
//! one entry; its parent is found with an ancestor stack of open directories.
//! How deep a line sits is decided by a [`DepthPolicy`]:
//!
//! ```text
//! my-app/                 my-app/
//! ├── src/                  src/
//! │   └── main.rs             main.rs
//! └── Cargo.toml            Cargo.toml
//! ```
//!
//! The left form is measured by counting `│   ` markers, the right form by
//! comparing indentation columns.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FormatIssue, ParseError};
use crate::model::{NodeId, NodeKind, Tree};

/// Box drawing characters removed from every entry.
const GLYPHS: &[char] = &['│', '├', '└', '─'];
/// Vertical bar of a depth marker; it must be followed by three blanks.
const MARKER_BAR: char = '│';
const SEPARATOR: char = '/';
const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthPolicy {
    /// `Markers` when any entry contains a box drawing glyph, `Indentation`
    /// otherwise. Decided once for the whole document.
    #[default]
    Auto,
    /// Depth is the number of leading `│   ` markers. Lines without markers
    /// attach to the root.
    Markers,
    /// Offside rule on the column where the entry name starts.
    Indentation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub depth: DepthPolicy,
    /// Reject empty names and over-deep entries instead of tolerating them.
    pub strict: bool,
}

struct Open {
    id: NodeId,
    column: usize,
}

/// Parses a diagram with the default options.
pub fn parse(text: &str) -> Result<Tree, ParseError> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Tree, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let (root_line, first) = lines.next().ok_or(ParseError::EmptyInput)?;
    let head = first.split_once(SEPARATOR).map_or(first, |(head, _)| head);
    let root_name = strip_glyphs(head);
    if options.strict && root_name.is_empty() {
        return Err(ParseError::InvalidFormat {
            line: root_line,
            reason: FormatIssue::EmptyName,
        });
    }

    let body: Vec<(usize, &str)> = lines.collect();
    let policy = match options.depth {
        DepthPolicy::Auto if body.iter().any(|(_, l)| l.contains(GLYPHS)) => {
            DepthPolicy::Markers
        }
        DepthPolicy::Auto => DepthPolicy::Indentation,
        other => other,
    };

    let mut tree = Tree::with_root(root_name, Some(root_line));
    let mut stack = vec![Open {
        id: tree.root,
        column: name_column(first),
    }];

    for (line, raw) in body {
        match policy {
            DepthPolicy::Indentation => {
                let column = name_column(raw);
                while stack.len() > 1 && stack.last().is_some_and(|o| o.column >= column) {
                    stack.pop();
                }
            }
            _ => {
                let depth = marker_depth(raw);
                if depth < stack.len() {
                    stack.truncate(depth + 1);
                } else if options.strict {
                    return Err(ParseError::InvalidFormat {
                        line,
                        reason: FormatIssue::TooDeep {
                            depth,
                            open: stack.len() - 1,
                        },
                    });
                } else {
                    warn!(line, depth, "entry nested too deep, attached to deepest directory");
                }
            }
        }

        let token = strip_glyphs(raw);
        let kind = if token.contains(SEPARATOR) {
            NodeKind::Dir
        } else {
            NodeKind::File
        };
        let name = token.trim_end_matches(SEPARATOR).trim_end();
        if name.is_empty() {
            if options.strict {
                return Err(ParseError::InvalidFormat {
                    line,
                    reason: FormatIssue::EmptyName,
                });
            }
            warn!(line, "entry has an empty name");
        }

        // The root is never popped.
        let parent = stack.last().map_or(tree.root, |o| o.id);
        let id = tree.push_child(parent, name.to_string(), kind, Some(line));
        if kind.is_dir() {
            stack.push(Open {
                id,
                column: name_column(raw),
            });
        }
    }

    debug!(
        ?policy,
        nodes = tree.len(),
        files = tree.file_count(),
        root = %tree.name(),
        "parsed tree diagram"
    );
    Ok(tree)
}

fn strip_glyphs(s: &str) -> String {
    s.chars()
        .filter(|c| !GLYPHS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Counts leading `│` + three blanks markers. Blanks may be any whitespace
/// since `tree(1)` pads with non-breaking spaces.
fn marker_depth(line: &str) -> usize {
    let mut chars = line.trim_start().chars().peekable();
    let mut depth = 0;
    while chars.next_if_eq(&MARKER_BAR).is_some() {
        for _ in 0..3 {
            if chars.next_if(|c| c.is_whitespace()).is_none() {
                return depth;
            }
        }
        depth += 1;
    }
    depth
}

/// Column at which the entry name starts, skipping whitespace and glyphs.
fn name_column(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace() || GLYPHS.contains(c))
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PLAIN_DIAGRAM: &str = "root/\n  file1.txt\n  dir1/\n    file2.txt\n  file3.txt";
    const GLYPH_DIAGRAM: &str = "root/\n├── file1.txt\n├── dir1/\n│   └── file2.txt\n└── file3.txt";

    fn shape(tree: &Tree) -> Vec<(usize, String, bool)> {
        tree.walk()
            .map(|(d, n)| (d, n.name.clone(), n.is_dir()))
            .collect()
    }

    fn child_names(tree: &Tree, id: NodeId) -> Vec<String> {
        tree.children(id).map(|n| n.name.clone()).collect()
    }

    #[rstest]
    #[case("root/", "root")]
    #[case("root", "root")]
    #[case("  my-app/  ", "my-app")]
    #[case("invalid input", "invalid input")]
    #[case("\n\n   \nroot/\n\n", "root")]
    fn root_only_input_yields_childless_directory(#[case] input: &str, #[case] name: &str) {
        let tree = parse(input).unwrap();
        let root = tree.root_node();
        assert_eq!(root.name, name);
        assert!(root.is_dir());
        assert!(root.children.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t\n")]
    fn blank_input_is_rejected(#[case] input: &str) {
        assert_eq!(parse(input), Err(ParseError::EmptyInput));
    }

    #[test]
    fn root_name_stops_at_first_separator() {
        let tree = parse("root/sub/\n").unwrap();
        assert_eq!(tree.name(), "root");
    }

    #[test]
    fn plain_indentation_nests_by_column() {
        let tree = parse(PLAIN_DIAGRAM).unwrap();
        assert_eq!(child_names(&tree, tree.root), vec!["file1.txt", "dir1", "file3.txt"]);
        let dir1 = tree.children(tree.root).nth(1).unwrap();
        assert!(dir1.is_dir());
        assert_eq!(child_names(&tree, dir1.id), vec!["file2.txt"]);
    }

    #[test]
    fn glyph_diagram_matches_plain_indentation() {
        let glyphs = parse(GLYPH_DIAGRAM).unwrap();
        let plain = parse(PLAIN_DIAGRAM).unwrap();
        assert_eq!(shape(&glyphs), shape(&plain));
    }

    #[test]
    fn markers_policy_attaches_plain_lines_to_root() {
        let options = ParseOptions {
            depth: DepthPolicy::Markers,
            ..Default::default()
        };
        let tree = parse_with(PLAIN_DIAGRAM, &options).unwrap();
        assert_eq!(
            child_names(&tree, tree.root),
            vec!["file1.txt", "dir1", "file2.txt", "file3.txt"]
        );
    }

    #[test]
    fn sibling_directories_are_not_nested() {
        let tree = parse("root/\n├── a/\n├── b/\n└── c/").unwrap();
        assert_eq!(child_names(&tree, tree.root), vec!["a", "b", "c"]);
        assert!(tree.children(tree.root).all(|n| n.is_dir() && n.children.is_empty()));
    }

    #[test]
    fn deep_glyph_diagram() {
        let input = "my-react-app/
  ├── public/
  │   ├── index.html
  │   └── manifest.json
  ├── src/
  │   ├── components/
  │   │   └── App.js
  │   └── index.js
  └── README.md";
        let tree = parse(input).unwrap();
        assert_eq!(
            shape(&tree),
            vec![
                (0, "my-react-app".into(), true),
                (1, "public".into(), true),
                (2, "index.html".into(), false),
                (2, "manifest.json".into(), false),
                (1, "src".into(), true),
                (2, "components".into(), true),
                (3, "App.js".into(), false),
                (2, "index.js".into(), false),
                (1, "README.md".into(), false),
            ]
        );
    }

    #[test]
    fn indentation_policy_reads_tree_command_output() {
        let input = "app/\n├── lib/\n│   └── a.rs\n└── src/\n    └── main.rs\n";
        let options = ParseOptions {
            depth: DepthPolicy::Indentation,
            ..Default::default()
        };
        let tree = parse_with(input, &options).unwrap();
        let src = tree.children(tree.root).nth(1).unwrap();
        assert_eq!(child_names(&tree, src.id), vec!["main.rs"]);
    }

    #[test]
    fn non_breaking_space_markers_count() {
        let tree = parse("root/\n├── d/\n│\u{a0}\u{a0} └── f\n").unwrap();
        let d = tree.children(tree.root).next().unwrap();
        assert_eq!(child_names(&tree, d.id), vec!["f"]);
    }

    #[test]
    fn over_deep_line_attaches_to_deepest_open_directory() {
        let tree = parse("root/\n├── a/\n│   │   │   └── deep.txt").unwrap();
        let a = tree.children(tree.root).next().unwrap();
        assert_eq!(child_names(&tree, a.id), vec!["deep.txt"]);
    }

    #[test]
    fn over_deep_line_under_file_uses_open_directory() {
        let tree = parse("root/\n├── a.txt\n│   └── b.txt").unwrap();
        assert_eq!(child_names(&tree, tree.root), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn empty_name_is_tolerated() {
        let tree = parse("root/\n├── \n└── a.txt").unwrap();
        assert_eq!(child_names(&tree, tree.root), vec!["", "a.txt"]);
    }

    #[rstest]
    #[case("root/\n├── \n", 2, FormatIssue::EmptyName)]
    #[case("root/\n\n├── a/\n│   │   └── x", 4, FormatIssue::TooDeep { depth: 2, open: 1 })]
    #[case("/\n", 1, FormatIssue::EmptyName)]
    fn strict_mode_reports_line(
        #[case] input: &str,
        #[case] line: usize,
        #[case] reason: FormatIssue,
    ) {
        let options = ParseOptions {
            strict: true,
            ..Default::default()
        };
        assert_eq!(
            parse_with(input, &options),
            Err(ParseError::InvalidFormat { line, reason })
        );
    }

    #[test]
    fn separator_anywhere_marks_directory() {
        let tree = parse("root/\n├── src/bin/\n└── notes / \n").unwrap();
        let kids: Vec<_> = tree
            .children(tree.root)
            .map(|n| (n.name.as_str(), n.is_dir()))
            .collect();
        assert_eq!(kids, vec![("src/bin", true), ("notes", true)]);
    }

    #[test]
    fn crlf_and_line_numbers() {
        let tree = parse("root/\r\n\r\n├── a.txt\r\n").unwrap();
        let a = tree.children(tree.root).next().unwrap();
        assert_eq!(a.name, "a.txt");
        assert_eq!(a.line, Some(3));
        assert_eq!(tree.root_node().line, Some(1));
    }

    #[test]
    fn files_never_have_children() {
        let tree = parse("root/\n  a.txt\n    b.txt\n").unwrap();
        assert!(tree.nodes.iter().filter(|n| !n.is_dir()).all(|n| n.children.is_empty()));
        assert_eq!(child_names(&tree, tree.root), vec!["a.txt", "b.txt"]);
    }
}
