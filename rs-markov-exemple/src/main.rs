use rs_markov_core::{MarkovConfig, MarkovModel, SamplingMode};

const SAMPLE: &str = "It was the best of times, it was the worst of times, it was the age of wisdom, \
it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity, \
it was the season of Light, it was the season of Darkness, it was the spring of hope, \
it was the winter of despair.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows training summaries, RUST_LOG=trace every re-seed
    env_logger::init();

    // Windows of 4 characters, stacks shuffled before each draw
    let mut model = MarkovModel::new(MarkovConfig::new(4, true))?;
    model.train(SAMPLE);
    println!("{} windows learned", model.key_count());

    // Each call resumes from where the previous one stopped.
    // Every '\n' in the output marks a re-seed from the sample's first window
    for i in 0..3 {
        println!("Generated text {}: {}", i + 1, model.generate(120, SAMPLE));
    }

    // The default sampling mode consumes observations: the model runs dry
    let leftover = model.generate(200, SAMPLE);
    println!("Separators after exhaustion: {}", leftover.matches('\n').count());

    // 'Preserve' never removes observations, so output does not degrade
    let config = MarkovConfig::new(4, true).with_sampling(SamplingMode::Preserve);
    let mut model = MarkovModel::new(config)?;
    model.train(SAMPLE);
    println!("Preserved: {}", model.generate(200, SAMPLE));

    // Without shuffling the output is fully reproducible
    let mut model = MarkovModel::new(MarkovConfig::new(1, false))?;
    model.train("aabb");
    println!("Deterministic: {:?}", model.generate(3, "a"));

    // A zero window is rejected at construction
    match MarkovModel::new(MarkovConfig::new(0, true)) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Window width 0 is invalid: {e}"),
    }

    Ok(())
}
