#![forbid(unsafe_code)]

//! Render a bracket-notation constituent tree to SVG.

use std::fs;
use std::io::Read;
use std::process;

use lingtree_core::{EdgeStyle, TreeLayout, parse_tree};

mod cli;

fn main() {
    let opts = cli::Opts::parse();
    if let Err(e) = run(opts) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(opts: cli::Opts) -> Result<(), String> {
    let source = match opts.expression {
        Some(expr) => expr,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| e.to_string())?;
            buf
        }
    };
    let tree = parse_tree(&source).map_err(|e| e.to_string())?;
    let mut layout = TreeLayout::new(tree, opts.options);
    for path in &opts.triangles {
        layout
            .set_edge_style(path, EdgeStyle::triangle())
            .map_err(|e| e.to_string())?;
    }
    let svg = layout.svg_string();
    match opts.out {
        Some(file) => fs::write(&file, svg).map_err(|e| format!("{file}: {e}"))?,
        None => println!("{svg}"),
    }
    Ok(())
}
