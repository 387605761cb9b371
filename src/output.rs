use std::io::{self, Write};

use quick_xml::de::DeError;
use quick_xml::escape::escape;
use serde::Deserialize;

use crate::data_models::ResultRecord;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>"#;

/// Writes the output document element by element. The declaration and the
/// opening root go out on `begin`; `finish` or `error` close the root.
///
/// Every element is flushed as soon as it is written so a consumer reading
/// the pipe sees results as they are decoded.
pub struct XmlEmitter<W: Write> {
    sink: W,
}

impl<W: Write> XmlEmitter<W> {
    pub fn begin(mut sink: W) -> io::Result<XmlEmitter<W>> {
        writeln!(sink, "{XML_DECLARATION}")?;
        writeln!(sink, "<Output>")?;
        sink.flush()?;
        Ok(XmlEmitter { sink })
    }

    pub fn result(&mut self, record: &ResultRecord) -> io::Result<()> {
        let sink = &mut self.sink;
        writeln!(sink, "\t<Result>")?;
        writeln!(sink, "\t\t<Title>{}</Title>", escape(&record.title))?;
        writeln!(sink, "\t\t<Description>{}</Description>", escape(&record.description))?;
        writeln!(sink, "\t\t<Url>{}</Url>", escape(&record.url))?;
        writeln!(sink, "\t\t<Height>{}</Height>", record.height)?;
        writeln!(sink, "\t\t<Width>{}</Width>", record.width)?;
        writeln!(sink, "\t\t<Type>{}</Type>", escape(&record.kind))?;
        writeln!(sink, "\t</Result>")?;
        sink.flush()
    }

    /// Write the single error element and close the document.
    pub fn error(mut self, message: &str) -> io::Result<W> {
        writeln!(self.sink, "<Error>{}</Error>", escape(message))?;
        self.finish()
    }

    pub fn finish(mut self) -> io::Result<W> {
        writeln!(self.sink, "</Output>")?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// A parsed output document: either an error or a list of results.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename = "Output")]
pub struct OutputDocument {
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Result", default)]
    pub results: Vec<ResultRecord>,
}

impl OutputDocument {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Read a document produced by [`XmlEmitter`] back into records.
pub fn parse_document(xml: &str) -> Result<OutputDocument, DeError> {
    quick_xml::de::from_str(xml)
}
