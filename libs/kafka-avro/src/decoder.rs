use std::sync::Arc;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use kafka_avro_api::{DecodedMessage, SchemaRegistry};

use crate::error::AvroError;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

/// Standard alphabet, padding optional, trailing bits tolerated: consumers
/// hand over whatever their transport produced.
const BASE64: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// URL-safe alphabet (`-`, `_`), tried when the standard one rejects the text.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decode with the standard alphabet, falling back to URL-safe. The standard
/// error is reported when both fail.
fn decode_base64(text: &str, part: &'static str) -> Result<Vec<u8>, AvroError> {
    BASE64
        .decode(text)
        .or_else(|source| BASE64_URL.decode(text).map_err(|_| source))
        .map_err(|source| AvroError::Base64 { part, source })
}

/// Decode side of the codec: binary → embedded schema id → object.
///
/// Stateless apart from the registry handle; independent of the producer.
pub struct AvroDecoder {
    registry: Arc<dyn SchemaRegistry>,
}

impl AvroDecoder {
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Decode base64 text key and optional payload.
    ///
    /// A missing payload yields `payload: None` without a registry call.
    pub async fn decode_message(
        &self,
        encoded_key: &str,
        encoded_payload: Option<&str>,
    ) -> Result<DecodedMessage, AvroError> {
        let key = decode_base64(encoded_key, "key")?;
        let payload = encoded_payload
            .map(|p| decode_base64(p, "payload"))
            .transpose()?;

        self.decode_raw(&key, payload.as_deref()).await
    }

    /// Decode raw broker bytes. Key and payload are decoded concurrently.
    pub async fn decode_raw(
        &self,
        key: &[u8],
        payload: Option<&[u8]>,
    ) -> Result<DecodedMessage, AvroError> {
        match payload {
            None => {
                let key = self.registry.decode(key).await?;
                Ok(DecodedMessage { key, payload: None })
            }
            Some(payload) => {
                let (key, payload) =
                    tokio::try_join!(self.registry.decode(key), self.registry.decode(payload))?;
                Ok(DecodedMessage {
                    key,
                    payload: Some(payload),
                })
            }
        }
    }
}
