use scraper::{ElementRef, Html, Selector};

use crate::config::{Config, DecodePolicy};
use crate::data_models::{MetadataPayload, ResultRecord};
use crate::error::{DecodeError, LookupError};

/// Pulls result records out of a search results page. Every element whose
/// class list contains the marker carries one JSON payload as its text.
pub struct Extractor {
    selector: Selector,
    policy: DecodePolicy,
    ascii_only: bool,
}

impl Extractor {
    pub fn new(marker: &str, policy: DecodePolicy, ascii_only: bool) -> Result<Extractor, LookupError> {
        let selector = Selector::parse(&format!(".{marker}"))
            .map_err(|e| LookupError::Config(format!("marker {marker:?}: {e}")))?;
        Ok(Extractor {
            selector,
            policy,
            ascii_only,
        })
    }

    pub fn from_config(config: &Config) -> Result<Extractor, LookupError> {
        Self::new(&config.marker, config.decode_policy, config.ascii_only)
    }

    /// Decode the page and hand each record to `emit` in document order.
    ///
    /// Lenient extraction streams: a record is emitted as soon as it is
    /// decoded and bad payloads are skipped. Strict extraction decodes every
    /// payload first so a failure never follows already emitted records.
    ///
    /// Returns the number of records emitted.
    pub fn extract_each<F>(&self, html: &str, mut emit: F) -> Result<usize, LookupError>
    where
        F: FnMut(ResultRecord) -> Result<(), LookupError>,
    {
        let document = Html::parse_document(html);
        let nodes: Vec<ElementRef> = document.select(&self.selector).collect();
        log::info!("found {} metadata nodes", nodes.len());
        if nodes.is_empty() {
            return Err(LookupError::NoResults);
        }

        match self.policy {
            DecodePolicy::Strict => {
                let records = nodes
                    .iter()
                    .enumerate()
                    .map(|(index, node)| {
                        self.decode_node(node)
                            .map_err(|source| LookupError::Decode { index, source })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let count = records.len();
                for record in records {
                    emit(record)?;
                }
                Ok(count)
            }
            DecodePolicy::Lenient => {
                let mut count = 0;
                for (index, node) in nodes.iter().enumerate() {
                    match self.decode_node(node) {
                        Ok(record) => {
                            emit(record)?;
                            count += 1;
                        }
                        Err(e) => {
                            log::warn!("skipping result {index}: {e}");
                        }
                    }
                }
                if count == 0 {
                    log::warn!("none of the {} metadata nodes decoded", nodes.len());
                }
                Ok(count)
            }
        }
    }

    pub fn extract(&self, html: &str) -> Result<Vec<ResultRecord>, LookupError> {
        let mut records = Vec::new();
        self.extract_each(html, |record| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }

    fn decode_node(&self, node: &ElementRef) -> Result<ResultRecord, DecodeError> {
        let raw = node.text().collect::<String>();
        let record = ResultRecord::from(decode_payload(&raw)?);
        if self.ascii_only {
            Ok(record.into_ascii())
        } else {
            Ok(record)
        }
    }
}

pub fn decode_payload(raw: &str) -> Result<MetadataPayload, DecodeError> {
    Ok(serde_json::from_str(raw.trim())?)
}
