use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use xqzero::perft::{divide, perft, perft_split};
use xqzero::{Board, Side};

#[derive(clap::Parser, Debug)]
#[command(name = "perft", about = "Perft driver for the Xiangqi move generator")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// Layout file; standard opening if omitted
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Start with Black to move
    #[arg(long, default_value_t = false)]
    black: bool,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print node counts per root move
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let base = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("read layout: {}", path.display()))?;
            Board::from_layout(&text)?
        }
        None => Board::startpos(),
    };
    let side = if args.black { Side::Black } else { Side::Red };

    if args.divide {
        for (mv, nodes) in divide(&base, side, args.depth) {
            println!("{mv}: {nodes}");
        }
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let (nodes, dt) = pool.install(|| {
        let t0 = Instant::now();
        let nodes = if args.threads <= 1 {
            perft(&base, side, args.depth)
        } else {
            perft_split(&base, side, args.depth)
        };
        (nodes, t0.elapsed().as_secs_f64())
    });

    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}
