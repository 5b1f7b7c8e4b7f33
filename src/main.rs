#![warn(clippy::all)]

use std::io::{self, Write as _};

use structopt::StructOpt;

use cchef::{Console, Opt, Result};

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let stdout = io::stdout();
    let mut cnsl = Console::term();
    opt.run(&mut stdout.lock(), &mut cnsl).map_err(|err| {
        io::stdout().flush().expect("Could not flush stdout");
        eprintln!();
        err
    })
}
