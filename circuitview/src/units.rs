//! Parameter Unit Formatting
//!
//! Turns a raw parameter value and its key into a display string. The key
//! picks the unit family; the family decides scaling and precision. This
//! table is the only place unit scaling is defined:
//!
//! | key (lower-cased)  | family      | display                                   |
//! |--------------------|-------------|-------------------------------------------|
//! | `l`                | length      | scientific, 4 decimals, `m`               |
//! | `r`, `nr`          | resistance  | `Ω` / `kΩ` / `MΩ`, 1 decimal              |
//! | `c`, `nc`          | capacitance | `fF` / `pF` / `nF` / `µF`, else scientific `F` |
//! | `dc`, `v…`         | voltage     | 2 decimals, `V`                           |
//! | `nfin`             | count       | integer                                   |
//! | anything else      | generic     | scientific below 1e-3 / above 1e4, else 3 decimals |
//!
//! Values that do not parse as numbers are returned unchanged.

use serde_json::Value;

/// SPICE magnitude suffixes as the netlist backend applies them (case-sensitive)
const SPICE_SUFFIXES: &[(&str, f64)] = &[
    ("meg", 1e6),
    ("f", 1e-15),
    ("p", 1e-12),
    ("n", 1e-9),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("m", 1e-3),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
];

/// Resistance units: divisor, unit
const RESISTANCE_UNITS: &[(f64, &str)] = &[(1.0, "Ω"), (1e3, "kΩ"), (1e6, "MΩ")];

/// Capacitance bands: multiplier, unit. The first band's 1.0 is the floor.
const CAPACITANCE_BANDS: &[(f64, &str)] = &[(1e12, "fF"), (1e9, "pF"), (1e6, "nF")];
/// Above the nF band only values that display as 1.0 keep a unit
const CAPACITANCE_TOP: (f64, &str) = (1e3, "µF");

/// A raw parameter value as carried in a source record
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric reading of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v).filter(|v| v.is_finite()),
            ParamValue::Text(s) => parse_numeric(s),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{}", v),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&Value> for ParamValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Number(n) => n
                .as_f64()
                .map(ParamValue::Number)
                .unwrap_or_else(|| ParamValue::Text(n.to_string())),
            Value::String(s) => ParamValue::Text(s.clone()),
            other => ParamValue::Text(other.to_string()),
        }
    }
}

/// Physical family a parameter key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Length,
    Resistance,
    Capacitance,
    Voltage,
    Count,
    Generic,
}

impl UnitFamily {
    /// Exact keys win over the `v` prefix, which wins over the generic fallback
    pub fn for_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "l" => UnitFamily::Length,
            "r" | "nr" => UnitFamily::Resistance,
            "c" | "nc" => UnitFamily::Capacitance,
            "dc" => UnitFamily::Voltage,
            "nfin" => UnitFamily::Count,
            k if k.starts_with('v') => UnitFamily::Voltage,
            _ => UnitFamily::Generic,
        }
    }

    pub fn format(&self, v: f64) -> String {
        match self {
            UnitFamily::Length => format!("{} m", to_exponential(v, 4)),
            UnitFamily::Resistance => format_resistance(v),
            UnitFamily::Capacitance => format_capacitance(v),
            UnitFamily::Voltage => format!("{:.2} V", v),
            UnitFamily::Count => format!("{}", v.round() as i64),
            UnitFamily::Generic => {
                let a = v.abs();
                if a < 1e-3 || a > 1e4 {
                    to_exponential(v, 2)
                } else {
                    format!("{:.3}", v)
                }
            }
        }
    }
}

/// Format a parameter value for display
pub fn format_param(key: &str, raw: impl Into<ParamValue>) -> String {
    let raw = raw.into();
    match raw.as_f64() {
        Some(v) => UnitFamily::for_key(key).format(v),
        None => raw.to_string(),
    }
}

// Bands are picked on the value as displayed, so 999.96 Ω reads 1.0 kΩ
fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn format_resistance(v: f64) -> String {
    let a = v.abs();
    let (scale, unit) = RESISTANCE_UNITS
        .iter()
        .copied()
        .find(|&(scale, _)| round_tenth(a / scale) < 1000.0)
        .unwrap_or((1e6, "MΩ"));
    format!("{:.1} {}", v / scale, unit)
}

fn format_capacitance(v: f64) -> String {
    let a = v.abs();
    if round_tenth(a * CAPACITANCE_BANDS[0].0) >= 1.0 {
        if let Some(&(scale, unit)) = CAPACITANCE_BANDS
            .iter()
            .find(|&&(scale, _)| round_tenth(a * scale) < 1000.0)
        {
            return format!("{:.1} {}", v * scale, unit);
        }
        let (scale, unit) = CAPACITANCE_TOP;
        if round_tenth(a * scale) <= 1.0 {
            return format!("{:.1} {}", v * scale, unit);
        }
    }
    format!("{} F", to_exponential(v, 2))
}

/// Scientific notation with an explicitly signed exponent, e.g. `4.5000e-8`, `1.23e+5`
pub fn to_exponential(v: f64, digits: usize) -> String {
    let s = format!("{:.*e}", digits, v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}

/// Parse a plain or SPICE-suffixed number (`1500`, `2.5e-12`, `45n`, `1.5k`)
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v).filter(|v| v.is_finite());
    }

    for &(suffix, scale) in SPICE_SUFFIXES {
        if let Some(number) = s.strip_suffix(suffix) {
            if number.is_empty() || !number.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '+')) {
                continue;
            }
            if let Ok(v) = number.parse::<f64>() {
                return Some(v * scale).filter(|v| v.is_finite());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documented_examples() {
        assert_eq!(format_param("r", 1500), "1.5 kΩ");
        assert_eq!(format_param("c", 2.5e-12), "2.5 fF");
        assert_eq!(format_param("nfin", 4), "4");
        assert_eq!(format_param("vdc", 1.8), "1.80 V");
        assert_eq!(format_param("gain", "not-a-number"), "not-a-number");
    }

    #[test]
    fn test_length() {
        assert_eq!(format_param("l", 4.5e-8), "4.5000e-8 m");
        assert_eq!(format_param("L", 2e-7), "2.0000e-7 m");
    }

    #[test]
    fn test_resistance_scaling() {
        assert_eq!(format_param("r", 470.0), "470.0 Ω");
        assert_eq!(format_param("nR", 2_200_000.0), "2.2 MΩ");
        assert_eq!(format_param("r", 1000), "1.0 kΩ");
    }

    #[test]
    fn test_rounding_promotes_unit() {
        assert_eq!(format_param("r", 999.96), "1.0 kΩ");
        assert_eq!(format_param("r", 999.94), "999.9 Ω");
        assert_eq!(format_param("r", 999_960.0), "1.0 MΩ");
        assert_eq!(format_param("r", -999.96), "-1.0 kΩ");
        assert_eq!(format_param("c", 9.9999e-10), "1.0 pF");
        assert_eq!(format_param("c", 9.99996e-4), "1.0 µF");
        assert_eq!(format_param("c", 9.9999e-13), "1.0 fF");
    }

    #[test]
    fn test_capacitance_bands() {
        assert_eq!(format_param("c", 3.3e-9), "3.3 pF");
        assert_eq!(format_param("nc", 4.7e-6), "4.7 nF");
        assert_eq!(format_param("c", 1e-3), "1.0 µF");
        assert_eq!(format_param("c", 5e-15), "5.00e-15 F");
        assert_eq!(format_param("c", 0.01), "1.00e-2 F");
    }

    #[test]
    fn test_voltage_keys() {
        assert_eq!(format_param("dc", 0.9), "0.90 V");
        assert_eq!(format_param("vbias", "1.2"), "1.20 V");
        assert_eq!(format_param("VDD", 3), "3.00 V");
    }

    #[test]
    fn test_count_rounds() {
        assert_eq!(format_param("nfin", 3.6), "4");
        assert_eq!(format_param("nfin", "12"), "12");
    }

    #[test]
    fn test_generic() {
        assert_eq!(format_param("gain", 42.0), "42.000");
        assert_eq!(format_param("ugbw", 1.2e9), "1.20e+9");
        assert_eq!(format_param("power", 2.5e-4), "2.50e-4");
        assert_eq!(format_param("pm", 10000.0), "10000.000");
    }

    #[test]
    fn test_spice_suffixes() {
        assert_eq!(parse_numeric("45n"), Some(45.0 * 1e-9));
        assert_eq!(parse_numeric("1.5k"), Some(1500.0));
        assert_eq!(parse_numeric("2meg"), Some(2e6));
        assert_eq!(parse_numeric("3M"), Some(3e6));
        assert_eq!(format_param("r", "10k"), "10.0 kΩ");
    }

    #[test]
    fn test_non_numeric_passthrough() {
        assert_eq!(format_param("l", "lmin*2"), "lmin*2");
        assert_eq!(format_param("r", "NaN"), "NaN");
        assert_eq!(format_param("r", "inf"), "inf");
        assert_eq!(format_param("dc", "m"), "m");
        assert_eq!(format_param("gain", ""), "");
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(format_param("r", &json!(1500)), "1.5 kΩ");
        assert_eq!(format_param("r", &json!("1500")), "1.5 kΩ");
        assert_eq!(format_param("flags", &json!([1, 2])), "[1,2]");
        assert_eq!(format_param("enabled", &json!(true)), "true");
    }

    #[test]
    fn test_to_exponential() {
        assert_eq!(to_exponential(0.0, 2), "0.00e+0");
        assert_eq!(to_exponential(-123456.0, 2), "-1.23e+5");
    }
}
