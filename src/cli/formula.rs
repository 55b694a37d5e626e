use anyhow::Result;

use wheatstone::formula::{format_voltage, resolve_excitation, BridgeReading, Formula};

/// Evaluate both ΔR formulas for one reading and print them
pub fn run(us: &str, ug: f64, r0: f64, offset: f64) -> Result<()> {
    if !ug.is_finite() || !r0.is_finite() || !offset.is_finite() {
        anyhow::bail!("Ug, R0 and the offset must be finite numbers");
    }

    let excitation = resolve_excitation(Some(us));
    let reading = BridgeReading::new(excitation, ug, r0);

    println!("Us:          {:.4} V", excitation);
    println!("Ug:          {}", format_voltage(Some(ug)));
    println!("R0:          {} Ω", r0);
    if offset != 0.0 {
        println!("Offset:      {:.4} Ω", offset);
    }
    println!("ΔR (linear): {}", Formula::Linear.evaluate(&reading, offset));
    println!("ΔR (exact):  {}", Formula::Exact.evaluate(&reading, offset));

    Ok(())
}
