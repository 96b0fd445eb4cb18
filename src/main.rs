//! Demo driver: feed `left right weight` triples on stdin, one per line,
//! and get the stacked set plus its maximum weight back. Blank lines and
//! `#` comments are skipped. `RUST_LOG=trace` replays every insertion step.

use std::error::Error;
use std::io::{self, BufRead};

use strata::range::WeightedRange;
use strata::set::RangeSet;

fn parse_triple(line: &str) -> Result<(i64, i64, i64), Box<dyn Error>> {
    let mut fields = line.split_whitespace();
    let mut next = || -> Result<i64, Box<dyn Error>> {
        let field = fields.next().ok_or("expected `left right weight`")?;
        Ok(field.parse()?)
    };
    Ok((next()?, next()?, next()?))
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let mut set = RangeSet::new();

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (left, right, weight) = parse_triple(line)?;
        set.add(WeightedRange::new(left, right, weight)?)?;
    }

    print!("{set}");
    println!("max: {}", set.max());

    Ok(())
}
