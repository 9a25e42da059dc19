//! Usage: cargo run -p felt-table --bin felt-sim -- --hands 100 --seed 7

use std::io;

fn main() {
    felt_table::init_logging();
    let code = felt_table::sim::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
