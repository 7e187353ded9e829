// Command-line application to take moves back from a position

use clap::Parser;
use retrochess::{diagram, Position, RawBoard, Retraction, Retro};
use retrochess_efn::DefaultGlyphs;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(author, version, about = "Retract moves from a chess position")]
struct Cli {
    /// Starting position in FEN
    #[arg(
        long,
        default_value = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    )]
    fen: String,

    /// Do not print the diagram after each retraction
    #[arg(long)]
    quiet: bool,
}

fn show(position: &RawBoard) {
    match diagram::position_efn(position) {
        Ok(efn) => println!("{}", efn.diagram.pretty(&DefaultGlyphs)),
        Err(e) => println!("Cannot draw the diagram: {}", e),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let start = match <RawBoard as Position>::from_fen(&cli.fen) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Bad position: {}", e);
            std::process::exit(1);
        }
    };
    let mut retro = Retro::new(start);
    let mut stdin = io::stdin().lock();

    loop {
        if !cli.quiet {
            show(retro.position());
        }
        println!("{}", retro.position().as_fen());
        print!("Retraction (e.g. e4e2, d6e5xep, b8a7xR=): ");
        io::stdout().flush().unwrap();

        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();
        if s.is_empty() {
            continue;
        }

        let request: Retraction = match s.parse() {
            Ok(r) => r,
            Err(e) => {
                println!("Bad retraction: {}", e);
                println!();
                continue;
            }
        };
        if let Err(e) = retro.retract(request) {
            println!("Rejected: {}", e);
        }
        println!();
    }
}
