use super::*;

#[test]
fn test_linear_scenario() {
    let reading = BridgeReading::new(2.0, 0.01, 400.0);
    let value = Formula::Linear.evaluate(&reading, 0.0);
    assert_eq!(value.to_string(), "8.0000");
    assert!((value.value().unwrap() - 8.0).abs() < 1e-12);
}

#[test]
fn test_exact_scenario() {
    let reading = BridgeReading::new(2.0, 0.01, 400.0);
    let value = Formula::Exact.evaluate(&reading, 0.0);
    assert_eq!(value.to_string(), "8.0808");
    let expected = 4.0 * 0.01 * 400.0 / 1.98;
    assert!((value.value().unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_exact_degenerate_denominator() {
    let reading = BridgeReading::new(2.0, 1.0, 400.0);
    assert_eq!(Formula::Exact.evaluate(&reading, 0.0), DerivedValue::Err);
    assert_eq!(Formula::Exact.evaluate(&reading, 0.0).to_string(), "Err");
    // linear is unaffected: 2·R0
    assert_eq!(Formula::Linear.evaluate(&reading, 0.0).value(), Some(800.0));
}

#[test]
fn test_exact_near_threshold() {
    // |d| = 0.00005 < 1e-4
    assert_eq!(exact(2.0, 0.999975, 100.0), None);
    // |d| = 0.0002 >= 1e-4
    assert!(exact(2.0, 0.9999, 100.0).is_some());
}

#[test]
fn test_offset_is_subtracted_before_rounding() {
    let reading = BridgeReading::new(2.0, 0.01, 400.0);
    let value = Formula::Linear.evaluate(&reading, 0.00004);
    // 8.0 - 0.00004 = 7.99996 → "8.0000"
    assert_eq!(value.to_string(), "8.0000");
    let value = Formula::Linear.evaluate(&reading, 0.5);
    assert_eq!(value.to_string(), "7.5000");
}

#[test]
fn test_sentinel_ignores_offset() {
    let reading = BridgeReading::new(2.0, 1.0, 50.0);
    assert!(Formula::Exact.evaluate(&reading, 3.0).is_err());
}

#[test]
fn test_resolve_excitation() {
    assert_eq!(resolve_excitation(None), DEFAULT_EXCITATION_VOLTS);
    assert_eq!(resolve_excitation(Some("")), DEFAULT_EXCITATION_VOLTS);
    assert_eq!(resolve_excitation(Some("abc")), DEFAULT_EXCITATION_VOLTS);
    assert_eq!(resolve_excitation(Some("0")), DEFAULT_EXCITATION_VOLTS);
    assert_eq!(resolve_excitation(Some("-3")), DEFAULT_EXCITATION_VOLTS);
    assert_eq!(resolve_excitation(Some("5")), 5.0);
    assert_eq!(resolve_excitation(Some(" 3.3 V")), 3.3);
}

#[test]
fn test_format_voltage() {
    assert_eq!(format_voltage(None), "0.0000 V");
    assert_eq!(format_voltage(Some(0.01)), "10.00 mV");
    assert_eq!(format_voltage(Some(-0.5)), "-500.00 mV");
    assert_eq!(format_voltage(Some(1.0)), "1.0000 V");
    assert_eq!(format_voltage(Some(-2.5)), "-2.5000 V");
    assert_eq!(format_voltage_cell(Some(0.01)), "10.00mV");
    assert_eq!(format_voltage_cell(Some(1.25)), "1.2500V");
}

#[test]
fn test_parse_number() {
    assert_eq!(parse_number("8.0808"), Some(8.0808));
    assert_eq!(parse_number("  -1.5"), Some(-1.5));
    assert_eq!(parse_number("10.00mV"), Some(10.0));
    assert_eq!(parse_number("1.2500V"), Some(1.25));
    assert_eq!(parse_number("400"), Some(400.0));
    assert_eq!(parse_number(".5"), Some(0.5));
    assert_eq!(parse_number("1e3x"), Some(1000.0));
    assert_eq!(parse_number("2e"), Some(2.0));
    assert_eq!(parse_number("Err"), None);
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("."), None);
    assert_eq!(parse_number("-"), None);
    assert_eq!(parse_number("abc12"), None);
}

#[test]
fn test_parse_number_rejects_non_finite() {
    assert_eq!(parse_number("inf"), None);
    assert_eq!(parse_number("NaN V"), None);
    assert_eq!(parse_number("1e400"), None);
    assert_eq!(parse_number("+2.5 Ω"), Some(2.5));
    assert_eq!(parse_number("-0.25e-1mV"), Some(-0.025));
}

#[test]
fn test_parse_integer() {
    assert_eq!(parse_integer("450"), Some(450));
    assert_eq!(parse_integer(" 450.7 Ω"), Some(450));
    assert_eq!(parse_integer("-20"), Some(-20));
    assert_eq!(parse_integer("+7x"), Some(7));
    assert_eq!(parse_integer(""), None);
    assert_eq!(parse_integer("ohms"), None);
    assert_eq!(parse_integer(".5"), None);
}
