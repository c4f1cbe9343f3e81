use anyhow::{Context, Result};
use transform::{TransformConfig, Transformer};

/// File-in, XML-out runner: `stixgen bundle.json > package.xml`.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: stixgen <bundle.json>")?;
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read bundle file {}", path))?;

    let bundle = payload::parse_bundle(&json)?;
    let transformer = Transformer::new(TransformConfig::default());
    let output = transformer.transform(&bundle)?;

    for skipped in &output.skipped {
        tracing::warn!(
            observable_id = %skipped.observable_id,
            reason = %skipped.reason,
            "Observable skipped"
        );
    }

    println!("{}", output.xml);
    Ok(())
}
