#![warn(clippy::all)]
#[macro_use]
extern crate log;

use std::env;
use std::io;
use std::process;

use tagclean::{Cleaner, Error, Preset};

fn run() -> Result<(), Error> {
    let preset = match env::args().nth(1) {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::Basic,
    };
    debug!("cleaning stdin with the {} preset", preset);

    Cleaner::from(preset).sanitize_fragment(&mut io::stdin(), &mut io::stdout())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
