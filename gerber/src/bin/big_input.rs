use std::time::Instant;

use gerber::{Dfa, Nfa, Simulate};

/// `(0|1)*1(0|1)(0|1)(0|1)`: the fourth symbol from the end is a 1.
fn fourth_from_last() -> Nfa<u8> {
    let bit = || Nfa::literal(0).union(Nfa::literal(1));
    bit()
        .star()
        .concat(Nfa::literal(1))
        .concat(bit())
        .concat(bit())
        .concat(bit())
}

pub fn main() -> Result<(), gerber::Error> {
    let nfa = fourth_from_last();
    let dfa = Dfa::from_nfa(&nfa);
    let minimized = dfa.minimize()?;
    println!(
        "nfa: {} states, dfa: {} states, minimized: {} states",
        nfa.num_states(),
        dfa.num_states(),
        minimized.num_states()
    );

    let mut test = vec![1; 30_000_000];
    test.extend([0, 0, 0]);

    let start = Instant::now();
    assert!(minimized.simulate_slice(&test));
    test.push(1);
    assert!(!minimized.simulate_slice(&test));
    println!("Big Input (dfa) {:?}", start.elapsed());

    let start = Instant::now();
    assert!(nfa.simulate_slice(&test[..test.len() - 1]));
    println!("Big Input (nfa) {:?}", start.elapsed());
    Ok(())
}
