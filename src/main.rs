use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use autoeq::{
    compare, subset_witness, Alphabet, DeterministicAutomaton, Error, FiniteAutomaton, Limits,
    Regex, Side, Verdict,
};
use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use colored::Colorize;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(name = "autoeq", version)]
#[command(about = "Decide whether two regular expressions denote the same language")]
struct Args {
    /// First expression; both are read from the first two lines of stdin when omitted
    regex_a: Option<String>,

    /// Second expression
    regex_b: Option<String>,

    /// Alphabet symbols. By default the symbols written in either expression,
    /// plus printable ASCII and whitespace when `.` is used
    #[arg(short, long)]
    alphabet: Option<String>,

    /// Check whether the first language is contained in the second instead
    #[arg(long)]
    subset: bool,

    /// Give up when a determinized automaton needs more states
    #[arg(long, value_name = "N")]
    max_dfa_states: Option<usize>,

    /// Give up when the product search visits more state pairs
    #[arg(long, value_name = "N")]
    max_product_states: Option<usize>,

    /// Write Graphviz sources of all automata into this directory
    #[arg(long, value_name = "DIR")]
    dot: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn limits(&self) -> Limits {
        Limits {
            max_dfa_states: self.max_dfa_states,
            max_product_states: self.max_product_states,
        }
    }

    fn expressions(&self) -> color_eyre::Result<(String, String)> {
        match (&self.regex_a, &self.regex_b) {
            (Some(a), Some(b)) => Ok((a.clone(), b.clone())),
            (None, None) => {
                let mut lines = io::stdin().lock().lines();
                let a = lines.next().transpose()?.unwrap_or_default();
                let b = lines.next().transpose()?.unwrap_or_default();
                Ok((a, b))
            }
            _ => bail!("either give both expressions or none"),
        }
    }
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Compile `expr`, dumping both automata into `dot_dir` when requested.
fn build(
    name: &str,
    expr: &str,
    alphabet: &Alphabet,
    limits: &Limits,
    dot_dir: Option<&Path>,
) -> color_eyre::Result<DeterministicAutomaton> {
    let regex = Regex::parse(expr, alphabet).map_err(Error::from)?;
    let nfa = FiniteAutomaton::from_regex(&regex);
    let dfa = DeterministicAutomaton::from_nfa(&nfa, alphabet, limits)?;
    info!(
        "{}: {} -> {} nfa states -> {} dfa states",
        name,
        regex,
        nfa.state_count(),
        dfa.state_count()
    );

    if let Some(dir) = dot_dir {
        fs::create_dir_all(dir).wrap_err_with(|| format!("cannot create {}", dir.display()))?;
        for (suffix, source) in [("nfa", nfa.to_dot()?), ("dfa", dfa.to_dot()?)] {
            let path = dir.join(format!("{}_{}.dot", name, suffix));
            fs::write(&path, source).wrap_err_with(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
    }

    Ok(dfa)
}

fn run(args: &Args) -> color_eyre::Result<ExitCode> {
    let (regex_a, regex_b) = args.expressions()?;
    let alphabet = match &args.alphabet {
        Some(symbols) => Alphabet::new(symbols.chars()),
        None => {
            Alphabet::from_exprs(&[regex_a.as_str(), regex_b.as_str()]).map_err(Error::from)?
        }
    };
    info!("alphabet: {}", alphabet);

    let limits = args.limits();
    let dot_dir = args.dot.as_deref();
    let a = build("a", &regex_a, &alphabet, &limits, dot_dir)?;
    let b = build("b", &regex_b, &alphabet, &limits, dot_dir)?;

    if args.subset {
        return Ok(match subset_witness(&a, &b, &limits)? {
            None => {
                println!("{}", "subset".green());
                ExitCode::SUCCESS
            }
            Some(witness) => {
                println!("{}: {:?} is accepted only by A", "not a subset".red(), witness);
                ExitCode::from(1)
            }
        });
    }

    Ok(match compare(&a, &b, &limits)? {
        Verdict::Equivalent => {
            println!("{}", "equivalent".green());
            ExitCode::SUCCESS
        }
        Verdict::Different {
            witness,
            accepted_by,
        } => {
            let side = match accepted_by {
                Side::Left => "A",
                Side::Right => "B",
            };
            println!("{}: {:?} is accepted only by {}", "not equivalent".red(), witness, side);
            ExitCode::from(1)
        }
    })
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();

    TermLogger::init(
        level(args.verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    match run(&args) {
        Ok(code) => Ok(code),
        // Library errors are reported plainly, without a backtrace
        Err(report) => match report.downcast_ref::<Error>() {
            Some(error) => {
                eprintln!("{}: {}", "error".red().bold(), error);
                if let Error::Syntax(syntax) = error {
                    eprintln!("  {}", syntax.highlight());
                }
                Ok(ExitCode::from(2))
            }
            None => Err(report),
        },
    }
}
