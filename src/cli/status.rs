use anyhow::{Context, Result};

use wheatstone::client::{Backend, BackendConfig, HttpBackend};
use wheatstone::device::Reconciler;

/// Poll the backend once and print what the control panel would show
pub fn run(config: BackendConfig, json: bool) -> Result<()> {
    let url = config.base_url.clone();
    let backend = HttpBackend::new(config)?;
    let report = backend
        .status()
        .with_context(|| format!("Failed to poll {}", url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut reconciler = Reconciler::new();
    reconciler.apply(&report);

    #[cfg(feature = "colorized_output")]
    println!("{}", console::style(format!("Backend {}", url)).bold().cyan());
    #[cfg(not(feature = "colorized_output"))]
    println!("Backend {}", url);

    println!("{}", reconciler.panel());
    Ok(())
}
