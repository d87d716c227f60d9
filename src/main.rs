use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;
use xqzero::encoder::board_to_tensor;
use xqzero::game::{play_game_from, PlayParams};
use xqzero::movegen::{all_moves, parse_legal_move};
use xqzero::{Board, Evaluator, MaterialEvaluator, MctsConfig, Searcher, Side, UniformEvaluator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Xiangqi move search with evaluator-guided MCTS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a position and print the chosen move
    Search {
        #[command(flatten)]
        position: PositionArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// Sampling temperature; 0 picks the most visited move
        #[arg(long, default_value_t = 0.0)]
        temperature: f32,
        /// Print root statistics
        #[arg(long)]
        verbose: bool,
    },
    /// List the moves available to the side to move
    Moves {
        #[command(flatten)]
        position: PositionArgs,
        /// Only check whether this move (e.g. h3-e3) is legal
        #[arg(long)]
        check: Option<String>,
    },
    /// Play the engine against itself and print the game record as JSON
    Play {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        #[arg(long, default_value_t = 1.0)]
        temperature: f32,
        /// Plies played at --temperature before switching to greedy
        #[arg(long, default_value_t = 0)]
        temperature_plies: usize,
        /// Write the record here instead of stdout
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct PositionArgs {
    /// Board layout file (10 lines of 9 cells); standard opening if omitted
    #[arg(long)]
    layout: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = SideArg::Red)]
    side: SideArg,
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
    /// JSON search config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    simulations: Option<u32>,
    #[arg(long)]
    c_puct: Option<f32>,
    #[arg(long)]
    dirichlet_alpha: Option<f32>,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = EvaluatorKind::Material)]
    evaluator: EvaluatorKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    Red,
    Black,
}

impl From<SideArg> for Side {
    fn from(s: SideArg) -> Side {
        match s {
            SideArg::Red => Side::Red,
            SideArg::Black => Side::Black,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EvaluatorKind {
    Uniform,
    Material,
}

impl PositionArgs {
    fn board(&self) -> Result<Board> {
        match &self.layout {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read layout: {}", path.display()))?;
                Ok(Board::from_layout(&text)?)
            }
            None => Ok(Board::startpos()),
        }
    }
}

impl SearchArgs {
    fn config(&self) -> Result<MctsConfig> {
        let mut cfg = match &self.config {
            Some(path) => MctsConfig::from_json_file(path)?,
            None => MctsConfig::default(),
        };
        if let Some(n) = self.simulations { cfg.num_simulations = n; }
        if let Some(c) = self.c_puct { cfg.c_puct = c; }
        if let Some(a) = self.dirichlet_alpha { cfg.dirichlet_alpha = a; }
        Ok(cfg)
    }

    fn searcher(&self) -> Result<Searcher<Box<dyn Evaluator>>> {
        let evaluator: Box<dyn Evaluator> = match self.evaluator {
            EvaluatorKind::Uniform => Box::new(UniformEvaluator::new()),
            EvaluatorKind::Material => Box::new(MaterialEvaluator::default()),
        };
        Ok(Searcher::new(evaluator, self.config()?)?)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Search { position, search, temperature, verbose } => {
            let board = position.board()?;
            let pos = board_to_tensor(&board, position.side.into());
            let searcher = search.searcher()?;
            let mut rng = SmallRng::seed_from_u64(search.seed);

            println!("{board}");
            let start = Instant::now();
            let (result, tree) = searcher.search_with_tree(&pos, &mut rng)?;
            let elapsed = start.elapsed().as_secs_f32();
            let index = xqzero::mcts::pick_action(&result.policy, temperature, &mut rng)?;
            let mv = xqzero::encoder::index_to_move(index);

            if verbose {
                println!("{}", searcher.statistics_string(&tree, 10));
                println!(
                    "Total rollouts: {}, c_puct: {}, value: {:.3}, nodes: {}, elapsed: {:.2}s, NPS: {:.1}",
                    result.simulations,
                    searcher.config().c_puct,
                    result.root_value,
                    result.tree_size,
                    elapsed,
                    result.simulations as f32 / elapsed.max(f32::EPSILON)
                );
            }
            println!("bestmove {mv}");
        }
        Command::Moves { position, check } => {
            let board = position.board()?;
            let side: Side = position.side.into();
            match check {
                Some(text) => {
                    let mv = parse_legal_move(&board, side, &text)?;
                    println!("{mv} is legal for {side}");
                }
                None => {
                    let moves = all_moves(&board, side);
                    println!("{} moves for {side}:", moves.len());
                    let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                    println!("{}", list.join(" "));
                }
            }
        }
        Command::Play { search, max_plies, temperature, temperature_plies, json } => {
            let searcher = search.searcher()?;
            let mut rng = SmallRng::seed_from_u64(search.seed);
            let params = PlayParams { max_plies, temperature, temperature_plies };

            let pb = ProgressBar::new(max_plies as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} plies {msg}")?
                    .progress_chars("#>-"),
            );
            let record = play_game_from(&searcher, &xqzero::Position::startpos(), &params, &mut rng, |_, mv| {
                pb.set_message(mv.to_string());
                pb.inc(1);
            })?;
            pb.finish_and_clear();

            let text = serde_json::to_string_pretty(&record)?;
            match json {
                Some(path) => {
                    std::fs::write(&path, text).with_context(|| format!("write record: {}", path.display()))?;
                    println!("{} plies, {:?} -> {}", record.plies, record.outcome, path.display());
                }
                None => println!("{text}"),
            }
        }
    }
    Ok(())
}
