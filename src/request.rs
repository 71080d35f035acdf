//! Request-boundary handling for the HTTP-facing layer.
//!
//! Form fields arrive as loosely typed strings. This module turns them into a
//! [`GeneratorSpec`] and a [`BitSelection`] for the engine, and shapes the
//! JSON answer returned upward:
//!
//! ```json
//! {"status": "SUCCESS", "message": "Decoding is done.", "found": true, "decoded": "..."}
//! {"status": "BAD_BITS", "message": "Bits arrays must be unique integers between 0 and 7."}
//! ```
//!
//! A request that could not run (missing key, bad bit arrays, unknown
//! generator) is a [`RequestError`]; a request that ran and found nothing is a
//! success with `found: false`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stego::{
    BitPositions, BitSelection, Carrier, DecodeResult, GeneratorSpec, GeneratorStrategy,
    LsbCount, PixelBitSelection, StegoEngine, StegoError,
};

/// Highest accepted `lsb_count` parameter. The codec uses `param + 1`.
pub const MAX_LSB_COUNT_PARAM: u8 = LsbCount::MAX - 1;

/// Errors that stop a request before the codec can run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0}")]
    MissingFields(String),

    #[error("{0}")]
    BadBits(String),

    #[error("{0}")]
    BadGenerator(String),

    #[error("{0}")]
    BadCarrier(String),

    #[error("{0}")]
    PayloadTooLarge(String),
}

impl RequestError {
    /// Status code string sent to the client.
    pub fn status(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "MISSING_FIELDS",
            Self::BadBits(_) => "BAD_BITS",
            Self::BadGenerator(_) => "BAD_GENERATOR",
            Self::BadCarrier(_) => "BAD_CARRIER",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
        }
    }

    fn bad_bits() -> Self {
        Self::BadBits("Bits arrays must be unique integers between 0 and 7.".to_string())
    }
}

impl From<StegoError> for RequestError {
    fn from(err: StegoError) -> Self {
        match err {
            StegoError::InvalidBitSelection(_)
            | StegoError::InvalidBitCount(_)
            | StegoError::InvalidDomain => Self::BadBits(err.to_string()),
            StegoError::UnknownStrategy(_) => Self::BadGenerator(err.to_string()),
            StegoError::PayloadTooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            StegoError::CarrierTooLarge { .. } | StegoError::InvalidCarrier(_) => {
                Self::BadCarrier(err.to_string())
            }
        }
    }
}

/// Raw form parameters shared by the encode and decode routes.
///
/// Bit arrays are JSON text (`"[0, 1]"`); `lsb_count` is a decimal string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StegoParams {
    pub secret_key: Option<String>,
    pub generator_type: Option<String>,
    pub r_bits: Option<String>,
    pub g_bits: Option<String>,
    pub b_bits: Option<String>,
    pub lsb_count: Option<String>,
}

/// Typed engine inputs produced from [`StegoParams`].
#[derive(Debug, Clone)]
pub struct StegoRequest {
    pub generator: GeneratorSpec,
    pub selection: BitSelection,
}

impl StegoParams {
    /// Validates the parameters against the carrier they will be applied to.
    pub fn resolve(&self, carrier: &Carrier) -> Result<StegoRequest, RequestError> {
        let key = match self.secret_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(RequestError::MissingFields(
                    "Required fields are missing.".to_string(),
                ))
            }
        };

        let selection = self.selection(carrier)?;

        Ok(StegoRequest {
            generator: GeneratorSpec::new(self.strategy()?, key),
            selection,
        })
    }

    /// Bit selection for the carrier's shape, without looking at the key.
    pub fn selection(&self, carrier: &Carrier) -> Result<BitSelection, RequestError> {
        Ok(match carrier {
            Carrier::Pixels(_) => BitSelection::Pixel(self.pixel_selection()?),
            Carrier::Samples(_) => BitSelection::Sample(self.sample_selection()?),
        })
    }

    /// Absent means linear; anything present must name a known strategy.
    fn strategy(&self) -> Result<GeneratorStrategy, RequestError> {
        match self.generator_type.as_deref() {
            None => Ok(GeneratorStrategy::Linear),
            Some(name) => name.parse::<GeneratorStrategy>().map_err(RequestError::from),
        }
    }

    fn pixel_selection(&self) -> Result<PixelBitSelection, RequestError> {
        let r = parse_bits(self.r_bits.as_deref())?;
        let g = parse_bits(self.g_bits.as_deref())?;
        let b = parse_bits(self.b_bits.as_deref())?;

        if r.is_empty() && g.is_empty() && b.is_empty() {
            return Err(RequestError::MissingFields(
                "At least one bit array should be provided.".to_string(),
            ));
        }

        let channels = [r, g, b]
            .iter()
            .map(|bits| BitPositions::from_positions(bits).map_err(|_| RequestError::bad_bits()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PixelBitSelection::new(channels))
    }

    fn sample_selection(&self) -> Result<LsbCount, RequestError> {
        let raw = self.lsb_count.as_deref().unwrap_or("0").trim();
        let param: u8 = raw.parse().map_err(|_| lsb_count_error())?;
        if param > MAX_LSB_COUNT_PARAM {
            return Err(lsb_count_error());
        }
        Ok(LsbCount::new(param + 1)?)
    }
}

fn lsb_count_error() -> RequestError {
    RequestError::BadBits(format!(
        "lsb_count must be an integer between 0 and {}.",
        MAX_LSB_COUNT_PARAM
    ))
}

/// Parses a JSON array of bit positions. Missing or blank means empty.
///
/// Only JSON integers in `0..=7` are accepted; floats, strings and nested
/// values are rejected. Duplicates are caught by [`BitPositions`].
fn parse_bits(raw: Option<&str>) -> Result<Vec<u8>, RequestError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    let values: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|_| RequestError::bad_bits())?;

    values
        .iter()
        .map(|value| match value.as_u64() {
            Some(bit) if bit <= 7 => Ok(bit as u8),
            _ => Err(RequestError::bad_bits()),
        })
        .collect()
}

/// JSON body returned by the decode route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<Option<String>>,
    /// HTTP status code for the web layer; not part of the body.
    #[serde(skip)]
    pub http_status: u16,
}

impl DecodeResponse {
    pub fn success(result: &DecodeResult) -> Self {
        Self {
            status: "SUCCESS",
            message: "Decoding is done.".to_string(),
            found: Some(result.found),
            decoded: Some(result.text().map(|text| text.into_owned())),
            http_status: 200,
        }
    }

    pub fn error(err: &RequestError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
            found: None,
            decoded: None,
            http_status: 400,
        }
    }
}

/// Runs a decode request end to end and builds the response.
pub fn handle_decode(engine: &StegoEngine, carrier: &Carrier, params: &StegoParams) -> DecodeResponse {
    let outcome = params.resolve(carrier).and_then(|request| {
        engine
            .decode(carrier, &request.generator, &request.selection)
            .map_err(RequestError::from)
    });

    match outcome {
        Ok(result) => DecodeResponse::success(&result),
        Err(err) => {
            log::warn!("decode request rejected: {} ({})", err.status(), err);
            DecodeResponse::error(&err)
        }
    }
}

/// Runs an encode request and returns the modified carrier.
pub fn handle_encode(
    engine: &StegoEngine,
    carrier: &Carrier,
    params: &StegoParams,
    payload: &[u8],
) -> Result<Carrier, RequestError> {
    let request = params.resolve(carrier)?;
    Ok(engine.encode(carrier, &request.generator, &request.selection, payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::{PixelGrid, SampleStream};

    fn image() -> Carrier {
        PixelGrid::zeroed(32, 32, 3).unwrap().into()
    }

    fn audio() -> Carrier {
        SampleStream::I16(vec![0; 4096]).into()
    }

    fn params(key: &str) -> StegoParams {
        StegoParams {
            secret_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    fn with_bits(key: &str, r: &str, g: &str, b: &str) -> StegoParams {
        StegoParams {
            r_bits: Some(r.to_string()),
            g_bits: Some(g.to_string()),
            b_bits: Some(b.to_string()),
            ..params(key)
        }
    }

    #[test]
    fn test_missing_key() {
        let mut p = with_bits("", "[0]", "[]", "[]");
        assert!(matches!(p.resolve(&image()), Err(RequestError::MissingFields(_))));
        p.secret_key = None;
        assert!(matches!(p.resolve(&image()), Err(RequestError::MissingFields(_))));
    }

    #[test]
    fn test_all_bit_arrays_empty() {
        let p = with_bits("k", "[]", "[]", "[]");
        let err = p.resolve(&image()).unwrap_err();
        assert_eq!(err.status(), "MISSING_FIELDS");
        assert!(params("k").resolve(&image()).is_err());
    }

    #[test]
    fn test_bad_bits() {
        for (r, g, b) in [
            ("[0,2,2]", "[]", "[]"),
            ("[8]", "[]", "[]"),
            ("[-1]", "[]", "[]"),
            ("[1.5]", "[]", "[]"),
            ("[\"1\"]", "[]", "[]"),
            ("0", "[]", "[]"),
            ("[0]", "not json", "[]"),
        ] {
            let err = with_bits("k", r, g, b).resolve(&image()).unwrap_err();
            assert_eq!(err, RequestError::bad_bits(), "r={} g={} b={}", r, g, b);
        }
    }

    #[test]
    fn test_valid_pixel_selection() {
        let request = with_bits("k", "[0,1,2]", "[]", "[7]").resolve(&image()).unwrap();
        let BitSelection::Pixel(selection) = request.selection else {
            panic!("expected pixel selection");
        };
        assert_eq!(selection.bits_per_pixel(), 4);
        assert_eq!(request.generator.strategy, GeneratorStrategy::Linear);
        assert_eq!(request.generator.key, b"k");
    }

    #[test]
    fn test_generator_type() {
        let mut p = with_bits("k", "[0]", "[]", "[]");
        p.generator_type = Some("keyed".to_string());
        assert_eq!(p.resolve(&image()).unwrap().generator.strategy, GeneratorStrategy::Keyed);

        p.generator_type = Some("fibonacci".to_string());
        let err = p.resolve(&image()).unwrap_err();
        assert_eq!(err.status(), "BAD_GENERATOR");
    }

    #[test]
    fn test_lsb_count_offset() {
        let mut p = params("k");
        let request = p.resolve(&audio()).unwrap();
        assert_eq!(request.selection, BitSelection::Sample(LsbCount::new(1).unwrap()));

        p.lsb_count = Some("6".to_string());
        let request = p.resolve(&audio()).unwrap();
        assert_eq!(request.selection, BitSelection::Sample(LsbCount::new(7).unwrap()));
    }

    #[test]
    fn test_lsb_count_out_of_range() {
        for raw in ["7", "-1", "abc", "300"] {
            let p = StegoParams {
                lsb_count: Some(raw.to_string()),
                ..params("k")
            };
            let err = p.resolve(&audio()).unwrap_err();
            assert_eq!(err.status(), "BAD_BITS", "lsb_count={}", raw);
        }
    }

    #[test]
    fn test_handle_decode_not_found_is_success() {
        let engine = StegoEngine::default();
        let response = handle_decode(&engine, &image(), &with_bits("k", "[0]", "[]", "[]"));

        assert_eq!(response.status, "SUCCESS");
        assert_eq!(response.found, Some(false));
        assert_eq!(response.http_status, 200);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["found"], false);
        assert!(json["decoded"].is_null());
        assert!(json.get("http_status").is_none());
    }

    #[test]
    fn test_handle_decode_error_shape() {
        let engine = StegoEngine::default();
        let response = handle_decode(&engine, &image(), &with_bits("k", "[9]", "[]", "[]"));

        assert_eq!(response.http_status, 400);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "BAD_BITS");
        assert!(json.get("found").is_none());
        assert!(json.get("decoded").is_none());
    }

    #[test]
    fn test_encode_then_decode_through_params() {
        let engine = StegoEngine::default();
        let mut p = with_bits("secret", "[0]", "[0]", "[]");
        p.generator_type = Some("keyed".to_string());

        let hidden = handle_encode(&engine, &image(), &p, "hola".as_bytes()).unwrap();
        let response = handle_decode(&engine, &hidden, &p);

        assert_eq!(response.found, Some(true));
        assert_eq!(response.decoded, Some(Some("hola".to_string())));
    }

    #[test]
    fn test_params_from_form_map() {
        let form = serde_json::json!({
            "secret_key": "secret",
            "generator_type": "keyed",
            "r_bits": "[0,1]",
            "g_bits": "[]",
            "b_bits": "[2]",
        });
        let p: StegoParams = serde_json::from_value(form).unwrap();
        assert_eq!(p.lsb_count, None);

        let request = p.resolve(&image()).unwrap();
        assert_eq!(request.generator.strategy, GeneratorStrategy::Keyed);
        assert_eq!(request.generator.key, b"secret".to_vec());
        assert_eq!(
            request.selection,
            BitSelection::Pixel(PixelBitSelection::rgb(&[0, 1], &[], &[2]).unwrap())
        );

        let engine = StegoEngine::default();
        let hidden = handle_encode(&engine, &image(), &p, b"form").unwrap();
        let response = handle_decode(&engine, &hidden, &p);
        assert_eq!(response.decoded, Some(Some("form".to_string())));
    }

    #[test]
    fn test_params_from_audio_form_map() {
        let form = serde_json::json!({"secret_key": "k", "lsb_count": "2"});
        let p: StegoParams = serde_json::from_value(form).unwrap();
        assert_eq!(
            p.resolve(&audio()).unwrap().selection,
            BitSelection::Sample(LsbCount::new(3).unwrap())
        );
    }

    #[test]
    fn test_handle_encode_too_large() {
        let engine = StegoEngine::default();
        let p = with_bits("k", "[0]", "[]", "[]");
        let err = handle_encode(&engine, &image(), &p, &[0u8; 1024]).unwrap_err();
        assert_eq!(err.status(), "PAYLOAD_TOO_LARGE");
    }
}
