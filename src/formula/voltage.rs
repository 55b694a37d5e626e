/// Read-out text shown while the voltmeter is offline.
pub const NO_READING: &str = "---- V";

/// Render a voltage for display.
///
/// Magnitudes below one volt are shown in millivolts with two decimals, larger
/// ones in volts with four decimals. A missing reading renders as `0.0000 V`.
pub fn format_voltage(volts: Option<f64>) -> String {
    match volts {
        None => "0.0000 V".to_string(),
        Some(v) if v.abs() < 1.0 => format!("{:.2} mV", v * 1000.0),
        Some(v) => format!("{:.4} V", v),
    }
}

/// Voltage text as stored in a table cell: [`format_voltage`] without the space,
/// e.g. `10.00mV`.
pub fn format_voltage_cell(volts: Option<f64>) -> String {
    format_voltage(volts).replacen(' ', "", 1)
}
