use rs_markov_core::model::engine::MarkovEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows load diagnostics, RUST_LOG=warn shows gram misses
    env_logger::init();

    // Load the transition table: context window of 2 symbols over a
    // 4 note alphabet. 'open_cached' would also write a .bin sibling
    // for faster loading next session.
    let mut engine = MarkovEngine::open("./data/melody.csv", 2, 4)?;

    // Dump the configuration, alphabet, gram labels and every weight cell
    for line in engine.report_state() {
        println!("{}", line);
    }

    // Construction fails fast on a non-positive order
    match MarkovEngine::open("./data/melody.csv", 0, 4) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Order 0 is invalid: {}", e),
    }

    // ... and on a missing file
    match MarkovEngine::open("./data/missing.csv", 2, 4) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("The file is missing: {}", e),
    }

    // Each trigger draws one symbol and slides the gram window
    for i in 0..16 {
        let symbol = engine.trigger()?;
        println!(
            "Trigger {}: symbol {} (gram {:?})",
            i + 1,
            symbol,
            engine.current_gram().unwrap_or("")
        );
    }

    // Back to the first loaded gram
    engine.reset();
    println!("After reset, current gram: {:?}", engine.current_gram());

    Ok(())
}
