#![forbid(unsafe_code)]

//! Command-line argument parsing for the `lingtree` binary.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `LINGTREE_*` prefix.

use std::env;
use std::process;

use lingtree_core::LayoutOptions;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
lingtree — constituent tree diagrams as SVG

USAGE:
    lingtree [OPTIONS] [EXPRESSION]

    EXPRESSION is a bracket-notation constituent tree, for example
    \"(S (NP (D the) (N cat)) (VP sat))\". Pass '-' or no expression
    to read the tree from stdin.

OPTIONS:
    --spacing=MODE       Horizontal spacing: 'text' (default), 'even', 'leaves'
    --align=MODE         Vertical alignment: 'top', 'center' (default),
                         'bottom', 'full'
    --font-size=N        Font size in px (default: 16)
    --relative-units     Emit em units instead of px
    --no-leaf-edges      Suppress edges down to leaf nodes
    --align-leaves       Place all leaves at the lowest level of the tree
    --debug              Render the measurement grid and node outlines
    --triangle=PATH      Draw a triangle edge above the node at PATH, a
                         comma-separated daughter index list (repeatable)
    --set=KEY=VALUE      Set any layout option by name
    --out=FILE           Write the SVG to FILE instead of stdout
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    LINGTREE_SPACING     Override --spacing
    LINGTREE_ALIGN       Override --align
    LINGTREE_FONT_SIZE   Override --font-size";

/// Parsed command-line options.
#[derive(Default)]
pub struct Opts {
    /// Bracket-notation tree expression; `None` reads stdin.
    pub expression: Option<String>,
    /// Layout options assembled from env vars and flags.
    pub options: LayoutOptions,
    /// Paths of nodes that get a triangle edge from their mother.
    pub triangles: Vec<Vec<isize>>,
    /// Output file; `None` prints to stdout.
    pub out: Option<String>,
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags. Bad environment values are ignored;
    /// bad flag values exit with the error on stderr.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Ok(val) = env::var("LINGTREE_SPACING") {
            let _ = opts.options.set("horiz_spacing", &val);
        }
        if let Ok(val) = env::var("LINGTREE_ALIGN") {
            let _ = opts.options.set("vert_align", &val);
        }
        if let Ok(val) = env::var("LINGTREE_FONT_SIZE") {
            let _ = opts.options.set("font_size", &val);
        }

        // Parse command-line args (override env vars)
        let args: Vec<String> = env::args().skip(1).collect();
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("lingtree {VERSION}");
                    process::exit(0);
                }
                "--relative-units" => {
                    opts.options.relative_units = true;
                }
                "--no-leaf-edges" => {
                    opts.options.leaf_edges = false;
                }
                "--align-leaves" => {
                    opts.options.leaf_nodes_align = true;
                }
                "--debug" => {
                    opts.options.debug = true;
                }
                // '-' names stdin, which is already the default
                "-" => {}
                other => {
                    if let Some(val) = other.strip_prefix("--spacing=") {
                        if let Err(e) = opts.options.set("horiz_spacing", val) {
                            eprintln!("{e}");
                            process::exit(1);
                        }
                    } else if let Some(val) = other.strip_prefix("--align=") {
                        if let Err(e) = opts.options.set("vert_align", val) {
                            eprintln!("{e}");
                            process::exit(1);
                        }
                    } else if let Some(val) = other.strip_prefix("--font-size=") {
                        if let Err(e) = opts.options.set("font_size", val) {
                            eprintln!("{e}");
                            process::exit(1);
                        }
                    } else if let Some(val) = other.strip_prefix("--triangle=") {
                        match parse_path(val) {
                            Some(path) => opts.triangles.push(path),
                            None => {
                                eprintln!("Invalid --triangle value: {val}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(pair) = other.strip_prefix("--set=") {
                        match pair.split_once('=') {
                            Some((key, value)) => {
                                if let Err(e) = opts.options.set(key, value) {
                                    eprintln!("{e}");
                                    process::exit(1);
                                }
                            }
                            None => {
                                eprintln!("Invalid --set value (expected KEY=VALUE): {pair}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--out=") {
                        opts.out = Some(val.to_string());
                    } else if other.starts_with('-') {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    } else if opts.expression.is_none() {
                        opts.expression = Some(other.to_string());
                    } else {
                        eprintln!("Unexpected extra argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
            i += 1;
        }

        opts
    }
}

/// Parse a comma-separated daughter index list, e.g. `0,1,-1`.
///
/// Returns `None` for an empty path or any non-integer segment.
pub(crate) fn parse_path(s: &str) -> Option<Vec<isize>> {
    if s.trim().is_empty() {
        return None;
    }
    s.split(',').map(|part| part.trim().parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert!(opts.expression.is_none());
        assert!(opts.triangles.is_empty());
        assert!(opts.out.is_none());
        assert!(!opts.options.debug);
        assert!(opts.options.leaf_edges);
        assert!(!opts.options.relative_units);
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_covers_flags() {
        assert!(HELP_TEXT.contains("--spacing=MODE"));
        assert!(HELP_TEXT.contains("--align=MODE"));
        assert!(HELP_TEXT.contains("--triangle=PATH"));
        assert!(HELP_TEXT.contains("--set=KEY=VALUE"));
        assert!(HELP_TEXT.contains("--out=FILE"));
        assert!(HELP_TEXT.contains("--relative-units"));
        assert!(HELP_TEXT.contains("--no-leaf-edges"));
    }

    #[test]
    fn help_text_contains_env_vars() {
        assert!(HELP_TEXT.contains("LINGTREE_SPACING"));
        assert!(HELP_TEXT.contains("LINGTREE_ALIGN"));
        assert!(HELP_TEXT.contains("LINGTREE_FONT_SIZE"));
    }

    #[test]
    fn paths_parse_as_comma_separated_indices() {
        assert_eq!(parse_path("0"), Some(vec![0]));
        assert_eq!(parse_path("0,1,-1"), Some(vec![0, 1, -1]));
        assert_eq!(parse_path(" 1 , 2 "), Some(vec![1, 2]));
        assert_eq!(parse_path(""), None);
        assert_eq!(parse_path("0,x"), None);
        assert_eq!(parse_path("0,,1"), None);
    }
}
