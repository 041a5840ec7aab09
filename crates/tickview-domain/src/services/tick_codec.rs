use serde::{Deserialize, Serialize};

/// Positions of the fields we read from the semicolon-delimited `tick`
/// string. The recorder owns this layout; `v1` is what it currently writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickLayout {
    pub price_field: usize,
    pub vwap_field: usize,
}

impl TickLayout {
    pub const V1: TickLayout = TickLayout {
        price_field: 0,
        vwap_field: 4,
    };

    pub fn min_fields(&self) -> usize {
        self.price_field.max(self.vwap_field) + 1
    }
}

impl Default for TickLayout {
    fn default() -> Self {
        Self::V1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedTickPolicy {
    #[default]
    Error,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickFields {
    pub price: f64,
    pub reported_vwap: f64,
}

/// Extracts price and reported VWAP from one encoded tick.
///
/// Errors carry a reason only; the caller knows the line number.
pub fn decode_tick_fields(raw: &str, layout: &TickLayout) -> Result<TickFields, String> {
    let fields: Vec<&str> = raw.split(';').collect();
    if fields.len() < layout.min_fields() {
        return Err(format!(
            "expected at least {} ';'-separated fields, got {} in {raw:?}",
            layout.min_fields(),
            fields.len()
        ));
    }

    let price = parse_field(fields[layout.price_field], "price")?;
    let reported_vwap = parse_field(fields[layout.vwap_field], "vwap")?;
    Ok(TickFields {
        price,
        reported_vwap,
    })
}

fn parse_field(value: &str, name: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("{name} field is not a number: {value:?}"))?;
    if !parsed.is_finite() {
        return Err(format!("{name} field is not finite: {value:?}"));
    }
    Ok(parsed)
}
