use std::io::Write;

use crate::config::Config;
use crate::error::LookupError;
use crate::extractor::Extractor;
use crate::fetcher::Fetcher;
use crate::output::XmlEmitter;
use crate::query::SearchRequest;

/// One configured image search: query in, XML document out.
pub struct ImageSearch {
    config: Config,
    fetcher: Fetcher,
    extractor: Extractor,
}

impl ImageSearch {
    pub fn new(config: Config) -> Result<ImageSearch, LookupError> {
        let fetcher = Fetcher::new(config.timeout)?;
        let extractor = Extractor::from_config(&config)?;
        Ok(ImageSearch {
            config,
            fetcher,
            extractor,
        })
    }

    pub fn request_for(&self, query: &str) -> SearchRequest {
        SearchRequest::new(&self.config.endpoint, query, self.config.query_encoding)
    }

    /// Run the lookup and write a complete document to `sink`.
    ///
    /// A lookup failure is written as the document's `<Error>` element and
    /// then returned; the only failure that leaves the document incomplete
    /// is the sink itself failing, reported as `LookupError::Io`.
    pub async fn run<W: Write>(&self, query: &str, sink: W) -> Result<(), LookupError> {
        let mut emitter = XmlEmitter::begin(sink)?;

        let outcome = match self.fetcher.fetch(&self.request_for(query)).await {
            Ok(html) => self
                .extractor
                .extract_each(&html, |record| Ok(emitter.result(&record)?)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(count) => {
                log::info!("emitted {count} results");
                emitter.finish()?;
                Ok(())
            }
            Err(LookupError::Io(e)) => Err(LookupError::Io(e)),
            Err(e) => {
                emitter.error(&e.document_message())?;
                Err(e)
            }
        }
    }
}

/// Write a document holding only `error`, for failures that happen before a
/// search can be built (bad arguments or configuration).
pub fn write_error_document<W: Write>(sink: W, error: &LookupError) -> Result<(), LookupError> {
    XmlEmitter::begin(sink)?.error(&error.document_message())?;
    Ok(())
}
