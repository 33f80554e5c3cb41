use std::fs;

use anyhow::Context;
use clap::Parser;

use trash_classifier::config::ClassifyArgs;
use trash_classifier::logging;

fn main() -> anyhow::Result<()> {
    let args = ClassifyArgs::parse();
    logging::init();

    let classifier = args.model.load()?;
    let bytes = fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;
    let prediction = classifier
        .classify(&bytes)
        .with_context(|| format!("failed to classify {}", args.image.display()))?;

    if args.json {
        println!("{}", serde_json::to_string(&prediction)?);
    } else {
        println!("Suggested label: {}", prediction.label);
        println!("Confidence: {:.2} %", prediction.confidence * 100.0);
    }
    Ok(())
}
