// Insert-storm benchmark - measures add() wall-clock cost at a few sizes.

use std::time::Instant;

use strata::range::WeightedRange;
use strata::set::RangeSet;

/// Deterministic xorshift so runs are comparable.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

fn main() {
    for &inserts in &[1_000usize, 5_000, 20_000] {
        let mut rng = XorShift(0x5eed);
        let mut set = RangeSet::new();

        let start = Instant::now();
        for _ in 0..inserts {
            let left = (rng.next() % 10_000) as i64;
            let len = (rng.next() % 50) as i64;
            let weight = (rng.next() % 9) as i64 - 4;
            set.add(WeightedRange::new(left, left + len, weight).unwrap())
                .unwrap();
        }
        let elapsed = start.elapsed();

        println!(
            "{inserts} inserts: {elapsed:?} total, {:?} per insert, {} members",
            elapsed / inserts as u32,
            set.ranges().len(),
        );
    }
}
