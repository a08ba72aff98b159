use log::{debug, warn};

use crate::ldf::core::tokens;
use crate::types::{
    node_attributes::{LinNodeAttributes, ProductId},
    version::LinVersion,
};

/// Decode a `key = value` line nested in a node's attribute block and apply it.
/// Examples: `configured_NAD = 0x01`, `product_id = 0x1E, 0x01, 0`, `P2_min = 50 ms`
///
/// Unknown keys are ignored; a known key with an unreadable value leaves the field untouched.
pub(crate) fn decode_attribute(attrs: &mut LinNodeAttributes, line: &str) {
    let Some((key, value)) = line.split_once('=') else {
        warn!("dropping node attribute '{line}' of '{}'", attrs.name);
        return;
    };
    let key: &str = key.trim();
    let value: &str = value.trim();

    let applied: bool = match key {
        "LIN_protocol" => LinVersion::from_ldf_token(value)
            .map(|v| attrs.protocol = Some(v))
            .is_some(),
        "configured_NAD" => tokens::parse_u8(value)
            .map(|v| attrs.configured_nad = v)
            .is_some(),
        "initial_NAD" => tokens::parse_u8(value)
            .map(|v| attrs.initial_nad = Some(v))
            .is_some(),
        "product_id" => decode_product_id(value)
            .map(|p| attrs.product_id = p)
            .is_some(),
        "response_error" => {
            let signal: &str = value.trim();
            if tokens::is_identifier(signal) {
                attrs.response_error = Some(signal.to_string());
                true
            } else {
                false
            }
        }
        "fault_state_signals" => {
            attrs.fault_state_signals = tokens::identifier_list(value);
            true
        }
        "P2_min" => decode_ms(value).map(|v| attrs.p2_min_ms = v).is_some(),
        "ST_min" => decode_ms(value).map(|v| attrs.st_min_ms = v).is_some(),
        "N_As_timeout" => decode_ms(value).map(|v| attrs.n_as_timeout_ms = v).is_some(),
        "N_Cr_timeout" => decode_ms(value).map(|v| attrs.n_cr_timeout_ms = v).is_some(),
        other => {
            debug!("ignoring node attribute '{other}' of '{}'", attrs.name);
            true
        }
    };

    if !applied {
        warn!("unreadable node attribute '{line}' of '{}'", attrs.name);
    }
}

/// `<supplier>, <function> [, <variant>]`
fn decode_product_id(value: &str) -> Option<ProductId> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let supplier_id: u16 = tokens::parse_u16(parts.first()?)?;
    let function_id: u16 = tokens::parse_u16(parts.get(1)?)?;
    let variant: u8 = match parts.get(2) {
        Some(v) => tokens::parse_u8(v)?,
        None => 0,
    };
    Some(ProductId {
        supplier_id,
        function_id,
        variant,
    })
}

fn decode_ms(value: &str) -> Option<f64> {
    tokens::parse_f64(tokens::strip_unit(value, "ms")).filter(|v| *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_attributes() {
        let mut attrs: LinNodeAttributes = LinNodeAttributes::new("Door");
        for line in [
            "LIN_protocol = \"2.1\"",
            "configured_NAD = 0x01",
            "initial_NAD = 0x02",
            "product_id = 0x1E, 0x0100, 3",
            "response_error = DoorErr",
            "fault_state_signals = A, B",
            "P2_min = 100 ms",
            "ST_min = 20 ms",
            "N_As_timeout = 500 ms",
            "N_Cr_timeout = 600 ms",
        ] {
            decode_attribute(&mut attrs, line);
        }

        assert_eq!(attrs.protocol, Some(LinVersion::V2_1));
        assert_eq!(attrs.configured_nad, 1);
        assert_eq!(attrs.initial_nad, Some(2));
        assert_eq!(
            attrs.product_id,
            ProductId {
                supplier_id: 0x1E,
                function_id: 0x100,
                variant: 3
            }
        );
        assert_eq!(attrs.response_error.as_deref(), Some("DoorErr"));
        assert_eq!(attrs.fault_state_signals, vec!["A", "B"]);
        assert_eq!(attrs.p2_min_ms, 100.0);
        assert_eq!(attrs.st_min_ms, 20.0);
        assert_eq!(attrs.n_as_timeout_ms, 500.0);
        assert_eq!(attrs.n_cr_timeout_ms, 600.0);
    }

    #[test]
    fn test_decode_attributes_lenient() {
        let mut attrs: LinNodeAttributes = LinNodeAttributes::new("Door");
        decode_attribute(&mut attrs, "configured_NAD = 0x1FF");
        decode_attribute(&mut attrs, "supplier = 3");
        decode_attribute(&mut attrs, "P2_min");
        decode_attribute(&mut attrs, "product_id = 0x1E, 0x1");
        assert_eq!(attrs.configured_nad, 0xFF);
        assert_eq!(attrs.p2_min_ms, 50.0);
        assert_eq!(attrs.product_id.function_id, 1);
        assert_eq!(attrs.product_id.variant, 0);
    }
}
