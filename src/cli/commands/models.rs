//! List models command.

use anyhow::Result;
use candleflow_models::ModelRegistry;

pub async fn run() -> Result<()> {
    let registry = ModelRegistry::new();

    println!("Available Models");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    let mut models = registry.list();
    models.sort_by(|a, b| a.name.cmp(&b.name));

    for info in models {
        println!("  {} ", info.name);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", info.default_config);
        println!();
    }

    println!("Use --models <name,...> with the run command to select models.");

    Ok(())
}
